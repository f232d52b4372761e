use nix::errno::Errno;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use nix::unistd::execvp;
use smsh_types::{SmshError, SmshResult};
use std::convert::Infallible;
use std::ffi::CString;

use super::redirect::Redirect;
use crate::parser::ParsedCommand;

/// Everything the child needs to become the requested program.
///
/// The argument vector is converted to C strings before forking; the child only
/// builds the pointer array `execvp` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub(crate) cmd: String,
    pub(crate) argv: Vec<CString>,
    pub(crate) redirects: Vec<Redirect>,
    pub(crate) foreground: bool,
}

impl Process {
    pub fn new(command: &ParsedCommand, foreground: bool) -> SmshResult<Self> {
        let argv = command
            .argv
            .iter()
            .map(|a| {
                CString::new(a.as_str()).map_err(|e| SmshError::Process {
                    message: format!("invalid argument {a:?}: {e}"),
                })
            })
            .collect::<SmshResult<Vec<_>>>()?;

        let mut redirects = Vec::new();
        if let Some(input) = &command.input {
            redirects.push(Redirect::Input(input.clone()));
        }
        if let Some(output) = &command.output {
            redirects.push(Redirect::StdoutOutput(output.clone()));
        }

        Ok(Process {
            cmd: command.cmdline(),
            argv,
            redirects,
            foreground,
        })
    }

    pub fn get_cmd(&self) -> &str {
        &self.cmd
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    fn set_signals(&self) -> SmshResult<()> {
        let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
        let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        unsafe {
            sigaction(Signal::SIGTSTP, &ignore)?;
            // The Rust runtime ignores SIGPIPE in the shell; programs expect the default.
            sigaction(Signal::SIGPIPE, &default)?;
        }
        // Background children keep the shell's ignored SIGINT.
        if self.foreground {
            unsafe {
                sigaction(Signal::SIGINT, &default)?;
            }
        }
        Ok(())
    }

    /// Runs in the forked child: signal dispositions, redirection, then exec.
    /// Only returns if one of those steps failed.
    pub fn launch(&self) -> SmshResult<Infallible> {
        self.set_signals()?;

        for redirect in &self.redirects {
            redirect.apply()?;
        }

        let Some(program) = self.argv.first() else {
            return Err(SmshError::Process {
                message: "empty command".to_string(),
            });
        };

        match execvp(program, &self.argv) {
            Ok(never) => match never {},
            Err(Errno::ENOENT) => Err(SmshError::CommandNotFound(
                program.to_string_lossy().into_owned(),
            )),
            Err(err) => Err(SmshError::Process {
                message: format!("{}: {}", program.to_string_lossy(), err.desc()),
            }),
        }
    }
}
