use crate::db::log::audit_quiet;
use crate::db::profiles as store;
use crate::db::users::find_user;
use crate::errors::{AppError, AppResult};
use crate::models::profile::{NewProfile, PublicVolunteer, VolunteerProfile};
use rusqlite::{Connection, TransactionBehavior};

pub const PROFILE_EXISTS: &str = "Volunteer profile already exists";

pub struct ProfileLogic;

impl ProfileLogic {
    /// One profile per user.
    pub fn create(
        conn: &mut Connection,
        user_id: i64,
        input: &NewProfile,
    ) -> AppResult<VolunteerProfile> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if find_user(&tx, user_id)?.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }

        if store::find_profile(&tx, user_id)?.is_some() {
            return Err(AppError::Conflict(PROFILE_EXISTS.into()));
        }

        let profile = match store::insert_profile(&tx, user_id, input) {
            Ok(p) => p,
            Err(e) if e.is_unique_violation() => {
                return Err(AppError::Conflict(PROFILE_EXISTS.into()));
            }
            Err(e) => return Err(e),
        };

        audit_quiet(&tx, "profile_create", &user_id.to_string(), "Volunteer profile created");
        tx.commit()?;
        Ok(profile)
    }

    pub fn get(conn: &Connection, user_id: i64) -> AppResult<Option<VolunteerProfile>> {
        store::find_profile(conn, user_id)
    }

    pub fn list_public(conn: &Connection) -> AppResult<Vec<PublicVolunteer>> {
        store::list_public_profiles(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_pending_migrations(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO users (name, email, password, created_at) VALUES ('A', 'a@x.io', 'h', 'now');",
        )
        .unwrap();
        conn
    }

    fn input() -> NewProfile {
        NewProfile {
            skills: vec!["First aid".into(), "Cooking".into()],
            age: 30,
            gender: "female".into(),
            contact_email: "a@x.io".into(),
        }
    }

    #[test]
    fn create_once_then_conflict() {
        let mut conn = setup();
        assert!(ProfileLogic::get(&conn, 1).unwrap().is_none());

        let p = ProfileLogic::create(&mut conn, 1, &input()).unwrap();
        assert_eq!(p.skills, vec!["First aid", "Cooking"]);
        assert!(p.is_public);
        assert_eq!(ProfileLogic::get(&conn, 1).unwrap(), Some(p));

        match ProfileLogic::create(&mut conn, 1, &input()) {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, PROFILE_EXISTS),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_user_is_not_a_duplicate() {
        let mut conn = setup();
        match ProfileLogic::create(&mut conn, 99, &input()) {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "User not found"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(ProfileLogic::get(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn foreign_key_failure_is_not_a_unique_violation() {
        let conn = setup();
        let err: AppError = store::insert_profile(&conn, 99, &input()).unwrap_err();
        assert!(matches!(err, AppError::Db(_)));
        assert!(!err.is_unique_violation());

        store::insert_profile(&conn, 1, &input()).unwrap();
        let dup = store::insert_profile(&conn, 1, &input()).unwrap_err();
        assert!(dup.is_unique_violation());
    }

    #[test]
    fn public_listing_hides_contact_details() {
        let mut conn = setup();
        ProfileLogic::create(&mut conn, 1, &input()).unwrap();

        let public = ProfileLogic::list_public(&conn).unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].age, 30);
        assert_eq!(public[0].gender, "female");
    }
}
