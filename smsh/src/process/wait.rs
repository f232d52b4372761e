use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::{debug, error, warn};

use super::job::Job;
use super::state::ProcessState;
use crate::shell::JobTable;

/// Maps a terminal wait status onto a process state.
fn terminal_state(status: WaitStatus) -> Option<ProcessState> {
    match status {
        WaitStatus::Exited(pid, code) => {
            debug!("WAIT_PID_EXITED: Process {} exited with status: {}", pid, code);
            Some(ProcessState::Completed(code))
        }
        WaitStatus::Signaled(pid, signal, core_dumped) => {
            debug!(
                "WAIT_PID_SIGNALED: Process {} killed by signal: {:?}, core_dumped: {}",
                pid, signal, core_dumped
            );
            Some(ProcessState::Signaled(signal))
        }
        WaitStatus::StillAlive => None,
        status => {
            debug!("WAIT_PID_OTHER: non-terminal status {:?}", status);
            None
        }
    }
}

/// Non-blocking status check of one child. `Ok(None)` while it is still running.
pub fn poll_pid(pid: Pid) -> nix::Result<Option<ProcessState>> {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(status) => return Ok(terminal_state(status)),
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Blocks until `pid` exits or is killed. Only that child's status is consumed.
pub fn wait_foreground(pid: Pid) -> nix::Result<ProcessState> {
    debug!("WAIT_FOREGROUND_START: waiting for pid {}", pid);
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if let Some(state) = terminal_state(status) {
                    return Ok(state);
                }
            }
            Err(Errno::EINTR) => {
                debug!("WAIT_FOREGROUND_EINTR: interrupted, waiting again for {}", pid);
            }
            Err(err) => {
                error!("WAIT_FOREGROUND_ERROR: waitpid({}) failed: {}", pid, err);
                return Err(err);
            }
        }
    }
}

/// Polls every tracked background job once. Finished jobs are removed from the
/// table and returned in the order they were observed; nothing here blocks.
pub fn reap_sweep(jobs: &mut JobTable) -> Vec<Job> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let pids: Vec<Pid> = jobs.pids().collect();
    let mut reaped = Vec::new();

    for pid in pids {
        match poll_pid(pid) {
            Ok(None) => {}
            Ok(Some(state)) => {
                if let Some(job) = jobs.get_mut(pid) {
                    job.set_state(state);
                }
                if let Some(job) = jobs.remove(pid) {
                    reaped.push(job);
                }
            }
            Err(Errno::ECHILD) => {
                warn!("REAP_SWEEP_ECHILD: pid {} is no longer our child, dropping it", pid);
                jobs.remove(pid);
            }
            Err(err) => {
                error!("REAP_SWEEP_ERROR: waitpid({}) failed: {}", pid, err);
            }
        }
    }

    debug!(
        "REAP_SWEEP_DONE: {} reaped, {} still running",
        reaped.len(),
        jobs.len()
    );
    reaped
}

/// Waits for every child of this process, tracked or not, until none remain.
/// Returns how many were reaped.
pub fn reap_all() -> usize {
    let mut count = 0;
    loop {
        match waitpid(Pid::from_raw(-1), None) {
            Ok(status) => {
                if terminal_state(status).is_some() {
                    count += 1;
                }
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => break,
            Err(err) => {
                error!("REAP_ALL_ERROR: waitpid(-1) failed: {}", err);
                break;
            }
        }
    }
    debug!("REAP_ALL_DONE: reaped {} children", count);
    count
}
