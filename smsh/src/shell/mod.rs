pub mod eval;
pub mod job;
pub mod job_table;

pub use job_table::{JOB_TABLE_CAPACITY, JobTable};

use crate::process::signal::{ignore_signal, install_sigtstp_handler};
use crate::process::{FOREGROUND_ONLY, ForegroundOnly, Job, reap_all};
use anyhow::Result;
use nix::sys::signal::Signal;
use nix::unistd::{Pid, getpid};
use smsh_types::{Context, ExitStatus, LastForeground};
use std::io::Write;
use tracing::{debug, warn};

pub const APP_NAME: &str = "smsh";
pub const PROMPT: &str = ": ";

pub struct Shell {
    pub pid: Pid,
    pub exited: Option<ExitStatus>,
    pub(crate) jobs: JobTable,
    pub(crate) last_foreground: LastForeground,
    mode: &'static ForegroundOnly,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("pid", &self.pid)
            .field("jobs", &self.jobs.len())
            .field("foreground_only", &self.mode.is_set())
            .finish()
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// A shell driven by the process-wide foreground-only flag that SIGTSTP toggles.
    pub fn new() -> Self {
        Self::with_mode(&FOREGROUND_ONLY)
    }

    pub fn with_mode(mode: &'static ForegroundOnly) -> Self {
        Shell {
            pid: getpid(),
            exited: None,
            jobs: JobTable::new(),
            last_foreground: LastForeground::default(),
            mode,
        }
    }

    /// SIGINT is ignored by the shell itself; SIGTSTP toggles foreground-only mode.
    pub fn set_signals(&mut self) {
        if let Err(e) = ignore_signal(Signal::SIGINT) {
            warn!("Failed to ignore SIGINT: {}", e);
        }
        if let Err(e) = install_sigtstp_handler() {
            warn!("Failed to install SIGTSTP handler: {}", e);
        }
        debug!("Signal handlers setup completed");
    }

    pub fn print_error(&self, msg: String) {
        let mut stderr = std::io::stderr();
        writeln!(stderr, "{msg}").ok();
        stderr.flush().ok();
    }

    pub fn eval_str(&mut self, ctx: &Context, input: &str) -> Result<ExitStatus> {
        eval::eval_str(self, ctx, input)
    }

    pub fn is_foreground_only(&self) -> bool {
        self.mode.is_set()
    }

    pub fn last_foreground(&self) -> LastForeground {
        self.last_foreground
    }

    pub fn check_job_state(&mut self) -> Vec<Job> {
        job::check_job_state(self)
    }

    /// Blocks until every child is reaped, then marks the shell as finished.
    pub fn exit(&mut self) {
        debug!("exit: waiting for {} tracked background jobs", self.jobs.len());
        let reaped = reap_all();
        debug!("exit: reaped {} children", reaped);
        self.jobs = JobTable::new();
        self.exited = Some(ExitStatus::ExitedWith(0));
    }
}
