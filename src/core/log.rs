use crate::db::log::{LogEntry, load_log};
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;

const OP_WIDTH: usize = 60;

/// Colour of an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "event_create" | "volunteer_register" | "profile_create" | "user_register" => {
            Colour::Green
        }
        "event_delete" | "volunteer_unregister" | "volunteer_cleanup" => Colour::Red,
        "event_update" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)`, cut to `width` visible characters.
fn op_target_label(entry: &LogEntry, width: usize) -> (String, String) {
    let rest = if entry.target.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.target)
    };

    let visible = entry.operation.chars().count() + rest.chars().count();
    if visible <= width {
        return (entry.operation.clone(), rest);
    }

    let keep = width.saturating_sub(3);
    let op: String = entry.operation.chars().take(keep).collect();
    let rest_keep = keep.saturating_sub(op.chars().count());
    let mut rest: String = rest.chars().take(rest_keep).collect();
    rest.push_str("...");
    (op, rest)
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(entries: &[LogEntry]) -> Vec<String> {
        let op_w = entries
            .iter()
            .map(|e| {
                let (op, rest) = op_target_label(e, OP_WIDTH);
                op.chars().count() + rest.chars().count()
            })
            .max()
            .unwrap_or(10);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        let dates: Vec<String> = entries
            .iter()
            .map(|e| {
                chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone())
            })
            .collect();
        let date_w = dates.iter().map(String::len).max().unwrap_or(0);

        entries
            .iter()
            .zip(dates)
            .map(|(entry, date)| {
                let (op, rest) = op_target_label(entry, OP_WIDTH);
                let padding =
                    " ".repeat(op_w.saturating_sub(op.chars().count() + rest.chars().count()));
                let colored = color_for_operation(&entry.operation).paint(op);

                format!(
                    "{:>id_w$}: {:<date_w$} | {}{}{} => {}",
                    entry.id,
                    date,
                    colored,
                    rest,
                    padding,
                    entry.message,
                    id_w = id_w,
                    date_w = date_w
                )
            })
            .collect()
    }

    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = load_log(conn)?;

        println!("📜 Internal log:\n");
        if entries.is_empty() {
            println!("(empty)");
            return Ok(());
        }

        for line in Self::render(&entries) {
            println!("{line}");
        }
        Ok(())
    }
}
