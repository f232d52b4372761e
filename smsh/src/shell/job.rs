use crate::process::{Job, reap_sweep};
use crate::shell::Shell;
use std::io::Write;
use tracing::debug;

/// Runs one reap sweep and prints a completion notice for every job it reclaimed.
pub fn check_job_state(shell: &mut Shell) -> Vec<Job> {
    // Fast path: no jobs to check
    if shell.jobs.is_empty() {
        return Vec::new();
    }

    debug!(
        "CHECK_JOB_STATE_START: total background jobs: {}",
        shell.jobs.len()
    );

    let completed = reap_sweep(&mut shell.jobs);

    let mut stdout = std::io::stdout().lock();
    for job in &completed {
        if let Some(notice) = job.completion_notice() {
            stdout.write_all(notice.as_bytes()).ok();
        }
    }
    stdout.flush().ok();

    debug!(
        "CHECK_JOB_STATE_COMPLETE: {} jobs completed, {} jobs remaining",
        completed.len(),
        shell.jobs.len()
    );
    completed
}
