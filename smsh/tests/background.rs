use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

fn spawn_smsh() -> Child {
    Command::new(env!("CARGO_BIN_EXE_smsh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn smsh")
}

fn feed(mut child: Child, lines: &[&str]) -> std::process::Output {
    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        for line in lines {
            writeln!(stdin, "{line}").unwrap();
        }
        writeln!(stdin, "exit").unwrap();
    }
    child.wait_with_output().expect("Failed to read output")
}

fn run_smsh(lines: &[&str]) -> std::process::Output {
    feed(spawn_smsh(), lines)
}

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    format!("sh {}", path.display())
}

/// Pulls the pid out of `background pid is <pid>`.
fn announced_pids(stdout: &str) -> Vec<i32> {
    stdout
        .match_indices("background pid is ")
        .filter_map(|(idx, marker)| {
            stdout[idx + marker.len()..]
                .split(|c: char| !c.is_ascii_digit())
                .next()
                .and_then(|pid| pid.parse().ok())
        })
        .collect()
}

#[test]
fn finished_background_job_is_reported_once() {
    let output = run_smsh(&["true &", "sleep 1", "echo done"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let pids = announced_pids(&stdout);
    assert_eq!(pids.len(), 1, "stdout: {stdout}");
    let notice = format!("Background process, pid {}, exited with status 0\n", pids[0]);
    assert_eq!(stdout.matches(&notice).count(), 1, "stdout: {stdout}");
}

#[test]
fn background_exit_code_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let line = format!("{} &", write_script(dir.path(), "three.sh", "exit 3\n"));

    let output = run_smsh(&[&line, "sleep 1"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let pids = announced_pids(&stdout);
    assert_eq!(pids.len(), 1, "stdout: {stdout}");
    assert!(
        stdout.contains(&format!(
            "Background process, pid {}, exited with status 3",
            pids[0]
        )),
        "stdout: {stdout}"
    );
}

#[test]
fn signaled_background_job_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let line = format!("{} &", write_script(dir.path(), "term.sh", "kill -TERM $$\n"));

    let output = run_smsh(&[&line, "sleep 1"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let pids = announced_pids(&stdout);
    assert_eq!(pids.len(), 1, "stdout: {stdout}");
    assert!(
        stdout.contains(&format!(
            "The background process, pid {}, was terminated by signal: 15\n",
            pids[0]
        )),
        "stdout: {stdout}"
    );
}

#[test]
fn ampersand_inside_a_line_is_an_argument() {
    let output = run_smsh(&["echo a & b"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("a & b\n"), "stdout: {stdout}");
    assert!(announced_pids(&stdout).is_empty(), "stdout: {stdout}");
}

#[test]
fn exit_waits_for_running_background_jobs() {
    let started = Instant::now();
    let output = run_smsh(&["sleep 1 &"]);
    let elapsed = started.elapsed();

    assert!(output.status.success(), "output: {:?}", output);
    assert!(
        elapsed >= Duration::from_millis(900),
        "exit returned after {elapsed:?}"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Background process"), "stdout: {stdout}");
}

#[test]
fn dollar_dollar_expands_to_shell_pid() {
    let child = spawn_smsh();
    let shell_pid = child.id();
    let output = feed(child, &["echo pid-$$-end"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains(&format!("pid-{shell_pid}-end")),
        "stdout: {stdout}"
    );
}
