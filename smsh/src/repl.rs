use crate::errors::display_user_error;
use crate::parser;
use crate::shell::{PROMPT, Shell};
use anyhow::{Context as _, Result};
use smsh_types::{Context, ExitStatus};
use std::io::{BufRead, ErrorKind, Write};
use tracing::{debug, warn};

pub struct Repl<'a> {
    pub shell: &'a mut Shell,
    ctx: Context,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell, ctx: Context) -> Self {
        Repl { shell, ctx }
    }

    fn print_prompt(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(PROMPT.as_bytes())?;
        stdout.flush().context("failed flush prompt")?;
        Ok(())
    }

    /// Reads and runs lines until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<ExitStatus> {
        loop {
            if let Some(status) = self.shell.exited {
                debug!("shell exited: {:?}", status);
                return Ok(status);
            }

            if let Err(err) = self.print_prompt() {
                warn!("failed to print prompt: {:#}", err);
            }

            let mut buf = Vec::new();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    debug!("end of input, exiting");
                    self.shell.exit();
                    continue;
                }
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    // Unreadable input ends the session like end of input does.
                    display_user_error(&anyhow::Error::new(err).context("failed read input"));
                    self.shell.exit();
                    continue;
                }
            }
            let line = String::from_utf8_lossy(&buf);

            if parser::is_ignored(&line) {
                continue;
            }

            debug!("input: {:?}", line.trim_end());
            if let Err(err) = self.shell.eval_str(&self.ctx, &line) {
                display_user_error(&err);
            }
        }
    }
}
