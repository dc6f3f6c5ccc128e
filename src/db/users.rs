use crate::errors::AppResult;
use crate::models::user::{NewUser, User, UserCredentials};
use crate::utils::time::now_storage;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

pub fn insert_user(conn: &Connection, input: &NewUser) -> AppResult<User> {
    let user = conn.query_row(
        "INSERT INTO users (name, email, password, created_at)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, name, email",
        params![input.name, input.email, input.password_hash, now_storage()],
        map_user,
    )?;
    Ok(user)
}

pub fn find_user(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    Ok(conn
        .query_row(
            "SELECT id, name, email FROM users WHERE id = ?1",
            [id],
            map_user,
        )
        .optional()?)
}

/// User with password hash, for authentication only.
pub fn find_credentials(conn: &Connection, email: &str) -> AppResult<Option<UserCredentials>> {
    Ok(conn
        .query_row(
            "SELECT id, name, email, password FROM users WHERE email = ?1",
            [email],
            |row| {
                Ok(UserCredentials {
                    user: map_user(row)?,
                    password_hash: row.get("password")?,
                })
            },
        )
        .optional()?)
}

pub fn email_exists(conn: &Connection, email: &str) -> AppResult<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM users WHERE email = ?1 LIMIT 1", [email], |_| {
            Ok(())
        })
        .optional()?
        .is_some())
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
