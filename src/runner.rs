use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// repository-locating variables that would override `current_dir` (set inside git hooks)
const GIT_LOCATION_ENV: [&str; 5] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
    "GIT_OBJECT_DIRECTORY",
];

/// captured result of a single external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// true iff the process ran to completion with exit code zero
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// false when the process could not be started (or was killed on timeout)
    pub launched: bool,
}

impl CommandOutput {
    /// output for a command that never produced an exit status
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            launched: false,
        }
    }

    fn from_output(output: &Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            launched: true,
        }
    }
}

/// the only I/O boundary the inspector depends on
///
/// implementations must never panic or propagate launch errors; every failure
/// is folded into a `CommandOutput` with `success == false`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], working_dir: &Path) -> CommandOutput;
}

/// runs commands as real child processes (argument vector, no shell)
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn command(program: &str, args: &[&str], working_dir: &Path) -> Command {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(working_dir)
            // keep diagnostics in english so they can be classified
            .env("LC_ALL", "C")
            .stdin(Stdio::null());
        for var in GIT_LOCATION_ENV {
            command.env_remove(var);
        }
        command
    }

    fn run_with_timeout(
        program: &str,
        args: &[&str],
        working_dir: &Path,
        timeout: Duration,
    ) -> CommandOutput {
        let mut child = match Self::command(program, args, working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return CommandOutput::launch_failure(format!("failed to run {program}: {e}")),
        };

        // drain both pipes while waiting so a chatty child can't fill them and stall
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        match child.wait_timeout(timeout) {
            Ok(Some(status)) => CommandOutput {
                success: status.success(),
                stdout: collect(stdout),
                stderr: collect(stderr),
                launched: true,
            },
            Ok(None) => {
                kill(&mut child);
                let _ = collect(stdout);
                let _ = collect(stderr);
                CommandOutput::launch_failure(format!(
                    "{program} timed out after {}s",
                    timeout.as_secs()
                ))
            }
            Err(e) => {
                kill(&mut child);
                CommandOutput::launch_failure(format!("failed to wait for {program}: {e}"))
            }
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], working_dir: &Path) -> CommandOutput {
        if let Some(timeout) = self.timeout {
            return Self::run_with_timeout(program, args, working_dir, timeout);
        }

        match Self::command(program, args, working_dir).output() {
            Ok(output) => CommandOutput::from_output(&output),
            Err(e) => CommandOutput::launch_failure(format!("failed to run {program}: {e}")),
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        crate::warning!("failed to kill child process: {}", e);
    }
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let output = SystemRunner::default().run(
            "git-readiness-definitely-not-installed",
            &["--version"],
            dir.path(),
        );

        assert!(!output.success);
        assert!(!output.launched);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.contains("git-readiness-definitely-not-installed"));
    }

    #[test]
    fn test_missing_working_dir_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let output = SystemRunner::new(Some(Duration::from_secs(5))).run("sh", &["-c", "true"], &missing);

        assert!(!output.success);
        assert!(!output.launched);
        assert!(!output.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_stderr_and_exit_code() {
        let dir = TempDir::new().unwrap();
        let output = SystemRunner::default().run(
            "sh",
            &["-c", "echo out; echo err >&2; exit 3"],
            dir.path(),
        );

        assert!(!output.success);
        assert!(output.launched);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let output = SystemRunner::new(Some(Duration::from_secs(10))).run("ls", &[], dir.path());

        assert!(output.success);
        assert!(output.stdout.contains("marker.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_slow_command() {
        let dir = TempDir::new().unwrap();
        let output =
            SystemRunner::new(Some(Duration::from_secs(1))).run("sleep", &["5"], dir.path());

        assert!(!output.success);
        assert!(!output.launched);
        assert!(output.stderr.contains("timed out after 1s"), "{}", output.stderr);
    }
}
