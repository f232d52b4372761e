use nix::sys::signal::Signal;
use smsh_types::ForegroundOutcome;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProcessState {
    Running,
    Completed(i32),
    Signaled(Signal),
}

impl ProcessState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessState::Running)
    }

    /// Terminal states map onto what `status` reports; `Running` has no outcome yet.
    pub fn outcome(&self) -> Option<ForegroundOutcome> {
        match self {
            ProcessState::Running => None,
            ProcessState::Completed(code) => Some(ForegroundOutcome::Exited(*code)),
            ProcessState::Signaled(signal) => Some(ForegroundOutcome::Signaled(*signal)),
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProcessState::Running => formatter.write_str("running"),
            ProcessState::Completed(code) => write!(formatter, "exited with status {code}"),
            ProcessState::Signaled(signal) => {
                write!(formatter, "terminated by signal {}", *signal as i32)
            }
        }
    }
}

/// Whether the shell waited for the job or detached from it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Origin {
    Foreground,
    Background,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!ProcessState::Running.is_terminal());
        assert!(ProcessState::Completed(0).is_terminal());
        assert!(ProcessState::Signaled(Signal::SIGKILL).is_terminal());
    }

    #[test]
    fn outcome_mapping() {
        assert_eq!(ProcessState::Running.outcome(), None);
        assert_eq!(
            ProcessState::Completed(2).outcome(),
            Some(ForegroundOutcome::Exited(2))
        );
        assert_eq!(
            ProcessState::Signaled(Signal::SIGINT).outcome(),
            Some(ForegroundOutcome::Signaled(Signal::SIGINT))
        );
    }

    #[test]
    fn display() {
        assert_eq!(ProcessState::Running.to_string(), "running");
        assert_eq!(
            ProcessState::Completed(1).to_string(),
            "exited with status 1"
        );
        assert_eq!(
            ProcessState::Signaled(Signal::SIGKILL).to_string(),
            "terminated by signal 9"
        );
    }
}
