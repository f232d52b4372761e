use anyhow::{Context as _, Result};
use libc::STDERR_FILENO;
use nix::unistd::{ForkResult, Pid, fork, write};
use std::io::Write;
use tracing::debug;

use super::process::Process;
use crate::shell::APP_NAME;

/// Forks and turns the child into `process`. Returns the child's pid in the parent.
///
/// A child that cannot finish its launch reports the reason on stderr and exits
/// with status 1; the shell itself is never affected.
pub(crate) fn fork_process(process: &Process) -> Result<Pid> {
    debug!(
        "🍴 FORK: about to fork '{}' foreground:{}",
        process.get_cmd(),
        process.is_foreground()
    );
    // Pending prompt output must not be duplicated into the child.
    std::io::stdout().flush().context("failed flush stdout")?;

    let pid = unsafe { fork().context("fork failed")? };

    match pid {
        ForkResult::Parent { child } => {
            debug!("🍴 FORK: parent - child pid: {}", child);
            Ok(child)
        }
        ForkResult::Child => {
            let err = match process.launch() {
                Ok(never) => match never {},
                Err(err) => err,
            };
            // Raw write: the stderr lock may have been held by another thread at fork time.
            let msg = format!("{APP_NAME}: {err}\n");
            let _ = write(STDERR_FILENO, msg.as_bytes());
            unsafe { libc::_exit(1) }
        }
    }
}
