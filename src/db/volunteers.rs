//! Volunteer registration queries.

use crate::db::codec::decode_timestamp;
use crate::errors::AppResult;
use crate::models::volunteer::Registration;
use crate::utils::time::to_storage;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_registration(row: &Row) -> rusqlite::Result<Registration> {
    let registered_at: String = row.get("registered_at")?;
    Ok(Registration {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        user_id: row.get("user_id")?,
        position: row.get("position")?,
        registered_at: decode_timestamp(&registered_at, 4)?,
        user_name: None,
        user_email: None,
    })
}

/// Registration plus registrant name/email (joined from `users`).
fn map_registration_with_user(row: &Row) -> rusqlite::Result<Registration> {
    let mut reg = map_registration(row)?;
    reg.user_name = row.get("user_name")?;
    reg.user_email = row.get("user_email")?;
    Ok(reg)
}

pub fn insert_registration(
    conn: &Connection,
    event_id: &str,
    user_id: i64,
    position: &str,
    registered_at: &DateTime<Utc>,
) -> AppResult<Registration> {
    let reg = conn.query_row(
        "INSERT INTO volunteer_registrations (event_id, user_id, position, registered_at)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, event_id, user_id, position, registered_at",
        params![event_id, user_id, position, to_storage(registered_at)],
        map_registration,
    )?;
    Ok(reg)
}

pub fn registration_exists(
    conn: &Connection,
    event_id: &str,
    user_id: i64,
    position: &str,
) -> AppResult<bool> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM volunteer_registrations
              WHERE event_id = ?1 AND user_id = ?2 AND position = ?3",
            params![event_id, user_id, position],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}

/// Delete the registration for the exact triple. Returns the number of rows
/// removed (0 or 1).
pub fn delete_registration(
    conn: &Connection,
    event_id: &str,
    user_id: i64,
    position: &str,
) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM volunteer_registrations
          WHERE event_id = ?1 AND user_id = ?2 AND position = ?3",
        params![event_id, user_id, position],
    )?;
    Ok(n)
}

/// Registrations of one event with registrant details, oldest first.
pub fn registrations_for_event(conn: &Connection, event_id: &str) -> AppResult<Vec<Registration>> {
    let mut stmt = conn.prepare_cached(
        "SELECT vr.id, vr.event_id, vr.user_id, vr.position, vr.registered_at,
                u.name AS user_name, u.email AS user_email
           FROM volunteer_registrations vr
           JOIN users u ON vr.user_id = u.id
          WHERE vr.event_id = ?1
          ORDER BY vr.registered_at ASC, vr.id ASC",
    )?;
    let rows = stmt.query_map([event_id], map_registration_with_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every registration on events owned by `owner`, with the event title,
/// ordered by event date then registration time.
pub fn registrations_for_owner(
    conn: &Connection,
    owner: i64,
) -> AppResult<Vec<(String, Registration)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT vr.id, vr.event_id, vr.user_id, vr.position, vr.registered_at,
                u.name AS user_name, u.email AS user_email, e.title AS event_title
           FROM volunteer_registrations vr
           JOIN users u ON vr.user_id = u.id
           JOIN events e ON vr.event_id = e.id
          WHERE e.user_id = ?1
          ORDER BY e.date ASC, e.id ASC, vr.registered_at ASC, vr.id ASC",
    )?;
    let rows = stmt.query_map([owner], |row| {
        Ok((row.get("event_title")?, map_registration_with_user(row)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
