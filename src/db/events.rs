//! Event queries. Every function maps to a single SQL statement; sequencing
//! and transactions are the caller's concern (`core::events`).

use crate::db::codec::{decode_label_column, decode_timestamp, encode_label_list};
use crate::errors::AppResult;
use crate::models::event::{Event, EventChanges, EventFilter, NewEvent};
use crate::utils::time::{now_storage, to_storage};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

const EVENT_COLUMNS: &str =
    "id, title, date, location, description, image, volunteer_positions, user_id";

pub fn map_event(row: &Row) -> rusqlite::Result<Event> {
    let id: String = row.get("id")?;
    let date_str: String = row.get("date")?;
    let volunteer_positions = decode_label_column(row.get_ref("volunteer_positions")?, &id);

    Ok(Event {
        date: decode_timestamp(&date_str, 2)?,
        volunteer_positions,
        id,
        title: row.get("title")?,
        location: row.get("location")?,
        description: row.get("description")?,
        image: row.get("image")?,
        user_id: row.get("user_id")?,
    })
}

fn collect(conn: &Connection, sql: &str, args: &[Value]) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_event(
    conn: &Connection,
    id: &str,
    input: &NewEvent,
    owner: Option<i64>,
) -> AppResult<Event> {
    let now = now_storage();
    let sql = format!(
        "INSERT INTO events (id, title, date, location, description, image, volunteer_positions, user_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
         RETURNING {EVENT_COLUMNS}"
    );

    let event = conn.query_row(
        &sql,
        params![
            id,
            input.title,
            to_storage(&input.date),
            input.location,
            input.description,
            input.image,
            encode_label_list(&input.volunteer_positions),
            owner,
            now,
        ],
        map_event,
    )?;
    Ok(event)
}

/// All events, soonest first.
pub fn list_events(conn: &Connection) -> AppResult<Vec<Event>> {
    collect(
        conn,
        &format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, created_at ASC"),
        &[],
    )
}

pub fn find_event(conn: &Connection, id: &str) -> AppResult<Option<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_event).optional()?)
}

pub fn list_events_by_owner(conn: &Connection, owner: i64) -> AppResult<Vec<Event>> {
    collect(
        conn,
        &format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE user_id = ?1 ORDER BY date ASC, created_at ASC"
        ),
        &[Value::Integer(owner)],
    )
}

/// Owner of an event: `None` if the event does not exist, `Some(None)` if it
/// exists without an owner.
pub fn event_owner(conn: &Connection, id: &str) -> AppResult<Option<Option<i64>>> {
    Ok(conn
        .query_row("SELECT user_id FROM events WHERE id = ?1", [id], |row| {
            row.get::<_, Option<i64>>(0)
        })
        .optional()?)
}

/// Merge the provided fields into the stored event. Fields left `None` keep
/// their stored value. Returns `None` when the event does not exist.
pub fn update_event_fields(
    conn: &Connection,
    id: &str,
    changes: &EventChanges,
) -> AppResult<Option<Event>> {
    let sql = format!(
        "UPDATE events
            SET title               = COALESCE(?2, title),
                date                = COALESCE(?3, date),
                location            = COALESCE(?4, location),
                description         = COALESCE(?5, description),
                image               = COALESCE(?6, image),
                volunteer_positions = COALESCE(?7, volunteer_positions),
                updated_at          = ?8
          WHERE id = ?1
          RETURNING {EVENT_COLUMNS}"
    );

    let event = conn
        .query_row(
            &sql,
            params![
                id,
                changes.title,
                changes.date.as_ref().map(to_storage),
                changes.location,
                changes.description,
                changes.image,
                changes.volunteer_positions.as_deref().map(encode_label_list),
                now_storage(),
            ],
            map_event,
        )
        .optional()?;
    Ok(event)
}

/// Delete an event and return its last representation. Registrations go
/// with it through `ON DELETE CASCADE`.
pub fn delete_event(conn: &Connection, id: &str) -> AppResult<Option<Event>> {
    let sql = format!("DELETE FROM events WHERE id = ?1 RETURNING {EVENT_COLUMNS}");
    Ok(conn.query_row(&sql, [id], map_event).optional()?)
}

/// Case-insensitive substring match on title, description and location.
pub fn search_events(conn: &Connection, term: &str) -> AppResult<Vec<Event>> {
    let pattern = like_pattern(term);
    collect(
        conn,
        &format!(
            "SELECT {EVENT_COLUMNS} FROM events
              WHERE title LIKE ?1 ESCAPE '\\'
                 OR description LIKE ?1 ESCAPE '\\'
                 OR location LIKE ?1 ESCAPE '\\'
              ORDER BY date ASC, created_at ASC"
        ),
        &[Value::Text(pattern)],
    )
}

pub fn filter_events(conn: &Connection, filter: &EventFilter) -> AppResult<Vec<Event>> {
    let mut sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1=1");
    let mut args: Vec<Value> = Vec::new();

    if let Some(from) = &filter.date_from {
        args.push(Value::Text(to_storage(from)));
        sql.push_str(&format!(" AND date >= ?{}", args.len()));
    }

    if let Some(to) = &filter.date_to {
        args.push(Value::Text(to_storage(to)));
        sql.push_str(&format!(" AND date <= ?{}", args.len()));
    }

    if let Some(location) = &filter.location {
        args.push(Value::Text(like_pattern(location)));
        sql.push_str(&format!(" AND location LIKE ?{} ESCAPE '\\'", args.len()));
    }

    sql.push_str(" ORDER BY date ASC, created_at ASC");
    collect(conn, &sql, &args)
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
