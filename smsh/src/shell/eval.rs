use crate::parser::{self, ParsedCommand};
use crate::process::fork::fork_process;
use crate::process::{Job, Origin, Process, wait_foreground};
use crate::shell::{APP_NAME, Shell};
use anyhow::Result;
use nix::unistd::Pid;
use smsh_types::{Context, ExitStatus, LastForeground};
use std::io::Write;
use tracing::{debug, error};

/// Evaluates one input line: built-ins run in the shell, everything else is dispatched.
pub fn eval_str(shell: &mut Shell, ctx: &Context, input: &str) -> Result<ExitStatus> {
    let Some(cmd) = parser::parse_line(input, shell.pid)? else {
        return Ok(ExitStatus::ExitedWith(0));
    };

    if let Some(builtin) = smsh_builtin::get_command(cmd.program()) {
        debug!("builtin '{}' argv:{:?}", cmd.program(), cmd.argv);
        let status = builtin(ctx, cmd.argv.clone(), shell);
        if shell.exited.is_none() {
            shell.check_job_state();
        }
        return Ok(status);
    }

    Ok(launch(shell, &cmd))
}

/// Runs one external command to completion (foreground) or detaches it
/// (background), then sweeps finished background jobs.
pub fn launch(shell: &mut Shell, cmd: &ParsedCommand) -> ExitStatus {
    let background = cmd.background && !shell.is_foreground_only();
    debug!(
        "start job '{}' requested_background:{} background:{} input:{:?} output:{:?}",
        cmd.cmdline(),
        cmd.background,
        background,
        cmd.input,
        cmd.output
    );

    let status = if background && shell.jobs.is_full() {
        shell.print_error(format!(
            "{APP_NAME}: job table full ({} jobs), command not started",
            shell.jobs.capacity()
        ));
        ExitStatus::ExitedWith(1)
    } else {
        match Process::new(cmd, !background) {
            Ok(process) => match fork_process(&process) {
                Ok(pid) if background => put_in_background(shell, pid, &process),
                Ok(pid) => put_in_foreground(shell, pid, &process),
                Err(err) => {
                    shell.print_error(format!("{APP_NAME}: {err:#}"));
                    ExitStatus::ExitedWith(1)
                }
            },
            Err(err) => {
                shell.print_error(format!("{APP_NAME}: {err}"));
                ExitStatus::ExitedWith(1)
            }
        }
    };

    shell.check_job_state();
    status
}

fn put_in_foreground(shell: &mut Shell, pid: Pid, process: &Process) -> ExitStatus {
    let mut job = Job::new(pid, Origin::Foreground, process.get_cmd().to_string());

    match wait_foreground(pid) {
        Ok(state) => {
            job.set_state(state);
            let Some(outcome) = state.outcome() else {
                return ExitStatus::Running(pid);
            };
            shell.last_foreground = LastForeground {
                pid: Some(pid),
                outcome,
            };
            if let smsh_types::ForegroundOutcome::Signaled(_) = outcome {
                let mut stdout = std::io::stdout();
                writeln!(stdout, "{outcome}").ok();
                stdout.flush().ok();
            }
            debug!("job '{}' completed: {}", job.cmd, job.state);
            ExitStatus::ExitedWith(outcome.exit_code())
        }
        Err(err) => {
            error!("failed to wait for '{}' pid:{}: {}", job.cmd, pid, err);
            shell.print_error(format!("{APP_NAME}: wait for pid {pid} failed: {err}"));
            ExitStatus::ExitedWith(1)
        }
    }
}

fn put_in_background(shell: &mut Shell, pid: Pid, process: &Process) -> ExitStatus {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "background pid is {pid}").ok();
    stdout.flush().ok();

    if let Err(err) = shell.jobs.insert(pid, process.get_cmd()) {
        shell.print_error(format!("{APP_NAME}: {err}"));
    }
    ExitStatus::Running(pid)
}
