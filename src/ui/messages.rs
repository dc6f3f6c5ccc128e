//! One-line status messages for the maintenance commands.

use crate::utils::colors::{BLUE, BOLD, GREEN, RED, RESET, YELLOW};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Info => (BLUE, "ℹ️"),
            Level::Success => (GREEN, "✅"),
            Level::Warning => (YELLOW, "⚠️"),
            Level::Error => (RED, "❌"),
        }
    }
}

fn render(level: Level, msg: impl Display) -> String {
    let (colour, icon) = level.style();
    format!("{colour}{BOLD}{icon}{RESET} {msg}")
}

pub fn info(msg: impl Display) {
    println!("{}", render(Level::Info, msg));
}

pub fn success(msg: impl Display) {
    println!("{}", render(Level::Success, msg));
}

pub fn warning(msg: impl Display) {
    println!("{}", render(Level::Warning, msg));
}

/// Errors go to stderr.
pub fn error(msg: impl Display) {
    eprintln!("{}", render(Level::Error, msg));
}
