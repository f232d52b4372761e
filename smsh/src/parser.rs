use nix::unistd::Pid;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use smsh_types::{SmshError, SmshResult};
use tracing::debug;

#[derive(Parser)]
#[grammar = "shell.pest"]
pub struct ShellParser;

/// One external command line after tokenizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub argv: Vec<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub background: bool,
}

impl ParsedCommand {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn cmdline(&self) -> String {
        self.argv.join(" ")
    }
}

/// Blank lines and `#` comments never reach the dispatcher.
pub fn is_ignored(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Replaces every `$$` with the shell's process id.
pub fn expand_pid(input: &str, pid: Pid) -> String {
    input.replace("$$", &pid.to_string())
}

/// Parses one input line. Returns `None` for lines that should be skipped.
pub fn parse_line(line: &str, pid: Pid) -> SmshResult<Option<ParsedCommand>> {
    if is_ignored(line) {
        return Ok(None);
    }
    let expanded = expand_pid(line.trim(), pid);
    parse_command(&expanded).map(Some)
}

pub fn parse_command(input: &str) -> SmshResult<ParsedCommand> {
    let mut pairs =
        ShellParser::parse(Rule::command, input).map_err(|e| SmshError::Parse(e.to_string()))?;

    let mut cmd = ParsedCommand::default();
    if let Some(command) = pairs.next() {
        for pair in command.into_inner() {
            match pair.as_rule() {
                Rule::word => cmd.argv.push(pair.as_str().to_string()),
                Rule::redirect_in => cmd.input = redirect_path(pair),
                Rule::redirect_out => cmd.output = redirect_path(pair),
                Rule::background => cmd.background = true,
                _ => {}
            }
        }
    }

    if cmd.argv.is_empty() {
        return Err(SmshError::Parse(format!("missing command name: {input}")));
    }
    debug!("parsed {:?} -> {:?}", input, cmd);
    Ok(cmd)
}

fn redirect_path(pair: Pair<Rule>) -> Option<String> {
    pair.into_inner()
        .find(|inner| inner.as_rule() == Rule::word)
        .map(|word| word.as_str().to_string())
}
