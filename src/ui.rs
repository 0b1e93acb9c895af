use colored::Colorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// terminal message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Status,
    Warning,
    Error,
}

/// suppress info and status output (warnings and errors are always shown)
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn emit(level: Level, message: &str) {
    let quiet = QUIET.load(Ordering::Relaxed);
    match level {
        Level::Info if !quiet => {
            let _ = writeln!(io::stdout(), "{message}");
        }
        Level::Status if !quiet => {
            let _ = writeln!(io::stdout(), "{}", message.green());
        }
        Level::Warning => {
            let _ = writeln!(io::stderr(), "{}", message.yellow());
        }
        Level::Error => {
            let _ = writeln!(io::stderr(), "{}", message.red());
        }
        Level::Info | Level::Status => {}
    }
}

#[macro_export]
macro_rules! warning {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::ui::emit($crate::ui::Level::Warning, &format!($fmt $(, $($arg)*)?))
    };
    ($expr:expr) => {
        $crate::ui::emit($crate::ui::Level::Warning, &format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::ui::emit($crate::ui::Level::Error, &format!($fmt $(, $($arg)*)?))
    };
    ($expr:expr) => {
        $crate::ui::emit($crate::ui::Level::Error, &format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! status {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::ui::emit($crate::ui::Level::Status, &format!($fmt $(, $($arg)*)?))
    };
    ($expr:expr) => {
        $crate::ui::emit($crate::ui::Level::Status, &format!("{}", $expr))
    };
}

#[macro_export]
macro_rules! info {
    () => {
        $crate::ui::emit($crate::ui::Level::Info, "")
    };
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::ui::emit($crate::ui::Level::Info, &format!($fmt $(, $($arg)*)?))
    };
    ($expr:expr) => {
        $crate::ui::emit($crate::ui::Level::Info, &format!("{}", $expr))
    };
}
