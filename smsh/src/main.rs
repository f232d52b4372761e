use anyhow::{Context as _, Result};
use clap::Parser;
use smsh::errors::display_user_error;
use smsh::repl::Repl;
use smsh::shell::Shell;
use smsh_types::{Context, ExitStatus};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run a single command line and exit
    #[arg(short, long)]
    command: Option<String>,

    /// Where to write diagnostic logs (filter with SMSH_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.log_file.clone()) {
        eprintln!("Failed to initialize tracing: {err:#}");
        return ExitCode::FAILURE;
    }

    let mut shell = Shell::new();
    shell.set_signals();
    let ctx = Context::new();
    debug!("start shell pid:{}", shell.pid);

    match cli.command.as_deref() {
        Some(command) => execute_command(&mut shell, &ctx, command),
        None => run_interactive(&mut shell, ctx),
    }
}

fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file.unwrap_or_else(|| std::env::temp_dir().join("smsh.log"));
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("SMSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}

fn exit_code(status: ExitStatus) -> ExitCode {
    ExitCode::from((status.code() & 0xff) as u8)
}

fn execute_command(shell: &mut Shell, ctx: &Context, command: &str) -> ExitCode {
    let status = match shell.eval_str(ctx, command) {
        Ok(status) => {
            debug!("run command mode {:?} : {:?}", command, status);
            status
        }
        Err(err) => {
            display_user_error(&err);
            ExitStatus::ExitedWith(1)
        }
    };
    if shell.exited.is_none() {
        shell.exit();
    }
    exit_code(status)
}

fn run_interactive(shell: &mut Shell, ctx: Context) -> ExitCode {
    let stdin = std::io::stdin();
    let mut repl = Repl::new(shell, ctx);
    match repl.run(stdin.lock()) {
        Ok(status) => exit_code(status),
        Err(err) => {
            display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}
