use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW, colorize_optional};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbStats {
    pub users: i64,
    pub events: i64,
    pub registrations: i64,
    pub profiles: i64,
    pub first_event: Option<String>,
    pub last_event: Option<String>,
}

fn count(conn: &Connection, table: &str) -> AppResult<i64> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?)
}

pub fn collect_stats(conn: &Connection) -> AppResult<DbStats> {
    let first_event: Option<String> = conn
        .query_row(
            "SELECT date FROM events ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_event: Option<String> = conn
        .query_row(
            "SELECT date FROM events ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DbStats {
        users: count(conn, "users")?,
        events: count(conn, "events")?,
        registrations: count(conn, "volunteer_registrations")?,
        profiles: count(conn, "volunteer_profiles")?,
        first_event,
        last_event,
    })
}

pub fn print_db_info(conn: &Connection, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let stats = collect_stats(conn)?;
    for (label, value) in [
        ("Users", stats.users),
        ("Events", stats.events),
        ("Volunteer registrations", stats.registrations),
        ("Volunteer profiles", stats.profiles),
    ] {
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, value, RESET);
    }

    //
    // 3) EVENT DATE RANGE
    //
    println!("{}• Event dates:{}", CYAN, RESET);
    println!("    from: {}", colorize_optional(stats.first_event.as_deref()));
    println!("    to:   {}", colorize_optional(stats.last_event.as_deref()));

    println!();
    Ok(())
}
