use nix::unistd::Pid;
use tracing::debug;

use super::state::{Origin, ProcessState};

/// One spawned child and what the shell knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub origin: Origin,
    pub state: ProcessState,
    pub cmd: String,
}

impl Job {
    pub fn new(pid: Pid, origin: Origin, cmd: String) -> Self {
        Job {
            pid,
            origin,
            state: ProcessState::Running,
            cmd,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        debug!(
            "job pid:{} '{}' {:?} -> {:?}",
            self.pid, self.cmd, self.state, state
        );
        self.state = state;
    }

    /// Completion notice printed by the reap sweep, `None` while the job runs.
    pub fn completion_notice(&self) -> Option<String> {
        match self.state {
            ProcessState::Running => None,
            ProcessState::Completed(code) => Some(format!(
                "Background process, pid {}, exited with status {}\n",
                self.pid, code
            )),
            ProcessState::Signaled(signal) => Some(format!(
                "The background process, pid {}, was terminated by signal: {}\n",
                self.pid, signal as i32
            )),
        }
    }
}
