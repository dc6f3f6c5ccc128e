//! User accounts: registration and password login.

use crate::db::log::audit_quiet;
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::user::{NewUser, User};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rusqlite::{Connection, TransactionBehavior};

pub const EMAIL_TAKEN: &str = "Email already registered";

/// Argon2id PHC string for `password`.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Other(format!("password hashing failed: {e}")))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a PHC string");
            false
        }
    }
}

pub struct AccountLogic;

impl AccountLogic {
    /// Create an account. The email must not be registered yet.
    pub fn register(conn: &mut Connection, name: &str, email: &str, password: &str) -> AppResult<User> {
        if users::email_exists(conn, email)? {
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }

        let password_hash = hash_password(password)?;
        let input = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let user = match users::insert_user(&tx, &input) {
            Ok(user) => user,
            Err(e) if e.is_unique_violation() => {
                return Err(AppError::Conflict(EMAIL_TAKEN.into()));
            }
            Err(e) => return Err(e),
        };
        audit_quiet(&tx, "user_register", &user.id.to_string(), &user.email);
        tx.commit()?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn login(conn: &Connection, email: &str, password: &str) -> AppResult<User> {
        let Some(creds) = users::find_credentials(conn, email)? else {
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &creds.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        Ok(creds.user)
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> AppResult<User> {
        users::find_user(conn, id)?.ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub fn get_by_email(conn: &Connection, email: &str) -> AppResult<User> {
        users::find_credentials(conn, email)?
            .map(|c| c.user)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub fn email_exists(conn: &Connection, email: &str) -> AppResult<bool> {
        users::email_exists(conn, email)
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<User>> {
        users::list_users(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn hash_round_trips_and_rejects_wrong_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "plaintext"));
    }

    #[test]
    fn register_then_login() {
        let mut conn = setup();
        let user = AccountLogic::register(&mut conn, "Ann", "ann@x.io", "secret1").unwrap();
        assert_eq!(user.email, "ann@x.io");

        let stored: String = conn
            .query_row("SELECT password FROM users WHERE id = ?1", [user.id], |r| r.get(0))
            .unwrap();
        assert_ne!(stored, "secret1");

        assert_eq!(AccountLogic::login(&conn, "ann@x.io", "secret1").unwrap(), user);
        assert!(matches!(
            AccountLogic::login(&conn, "ann@x.io", "nope"),
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            AccountLogic::login(&conn, "ghost@x.io", "secret1"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let mut conn = setup();
        AccountLogic::register(&mut conn, "Ann", "ann@x.io", "secret1").unwrap();
        match AccountLogic::register(&mut conn, "Other", "ann@x.io", "secret2") {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, EMAIL_TAKEN),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn lookups() {
        let mut conn = setup();
        AccountLogic::register(&mut conn, "Zed", "z@x.io", "secret1").unwrap();
        let ann = AccountLogic::register(&mut conn, "Ann", "a@x.io", "secret1").unwrap();

        assert_eq!(AccountLogic::get_by_id(&conn, ann.id).unwrap(), ann);
        assert_eq!(AccountLogic::get_by_email(&conn, "a@x.io").unwrap(), ann);
        assert!(AccountLogic::email_exists(&conn, "z@x.io").unwrap());
        let names: Vec<String> = AccountLogic::list(&conn)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ann", "Zed"]);
    }
}
