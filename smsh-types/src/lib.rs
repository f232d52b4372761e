use anyhow::Result;
use libc::{STDERR_FILENO, STDOUT_FILENO};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::os::unix::io::FromRawFd;
use std::os::unix::io::RawFd;
use thiserror::Error;

/// smsh specific error types
#[derive(Error, Debug)]
pub enum SmshError {
    #[error("Process execution failed: {message}")]
    Process { message: String },

    #[error("cannot open {path} for {operation}: {source}")]
    File {
        operation: String,
        path: String,
        source: std::io::Error,
    },

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("job table full ({capacity} jobs)")]
    JobTableFull { capacity: usize },

    #[error("pid {0} is already tracked")]
    DuplicateJob(Pid),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("System call failed: {0}")]
    System(#[from] nix::Error),
}

pub type SmshResult<T> = std::result::Result<T, SmshError>;

/// Where built-in commands write their output.
#[derive(Clone)]
pub struct Context {
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }

    pub fn write_stdout(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res?;
        Ok(())
    }

    pub fn write_stderr(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.errfile) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res?;
        Ok(())
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("outfile", &self.outfile)
            .field("errfile", &self.errfile)
            .finish()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
    Running(Pid),
}

impl ExitStatus {
    /// Exit code to hand back to the operating system. A detached job counts as success.
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::ExitedWith(code) => *code,
            ExitStatus::Running(_) => 0,
        }
    }
}

/// Terminal status of a foreground job, as reported by the `status` builtin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ForegroundOutcome {
    Exited(i32),
    Signaled(Signal),
}

impl Default for ForegroundOutcome {
    fn default() -> Self {
        ForegroundOutcome::Exited(0)
    }
}

impl ForegroundOutcome {
    /// Shell-style exit code: the exit status, or 128 plus the signal number.
    pub fn exit_code(&self) -> i32 {
        match self {
            ForegroundOutcome::Exited(code) => *code,
            ForegroundOutcome::Signaled(signal) => 128 + *signal as i32,
        }
    }
}

impl std::fmt::Display for ForegroundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForegroundOutcome::Exited(code) => write!(f, "exited with status {code}"),
            ForegroundOutcome::Signaled(signal) => {
                write!(f, "terminated by signal {}", *signal as i32)
            }
        }
    }
}

/// The most recent foreground job. `pid` stays `None` until the first one finishes.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct LastForeground {
    pub pid: Option<Pid>,
    pub outcome: ForegroundOutcome,
}
