use crate::constants::TIMESTAMP_FORMAT;
use crate::{status, warning};
use std::cell::Cell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// local wall-clock timestamp used for log lines and report headers
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// append-only activity log, echoed to the terminal
///
/// logging never fails the run: the first write error is reported as a
/// warning and later lines are only echoed.
#[derive(Debug)]
pub struct ActivityLog {
    path: Option<PathBuf>,
    broken: Cell<bool>,
}

impl ActivityLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            broken: Cell::new(false),
        }
    }

    pub fn log(&self, message: &str) {
        let line = format!("{}: {}", timestamp(), message);
        status!("{}", line);

        let Some(path) = &self.path else {
            return;
        };
        if self.broken.get() {
            return;
        }
        if let Err(e) = append_line(path, &line) {
            self.broken.set(true);
            warning!("failed to write activity log {}: {}", path.display(), e);
        }
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}
