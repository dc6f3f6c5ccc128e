//! Volunteer registration rules: uniqueness, cleanup of dropped positions,
//! and the per-event / per-owner listings.

use crate::db::events::find_event;
use crate::db::log::audit_quiet;
use crate::db::users::find_user;
use crate::db::volunteers as store;
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::volunteer::{EventVolunteers, Registration};
use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};

pub const DUPLICATE_REGISTRATION: &str = "You are already registered for this position";

pub struct VolunteerLogic;

impl VolunteerLogic {
    /// Register `user_id` for `position` on `event_id`.
    ///
    /// The event must exist and currently offer the position, and the
    /// (event, user, position) triple must be new. Checks and insert run in
    /// one immediate transaction; the UNIQUE index backs the duplicate check.
    pub fn register(
        conn: &mut Connection,
        event_id: &str,
        user_id: i64,
        position: &str,
    ) -> AppResult<Registration> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let event =
            find_event(&tx, event_id)?.ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        if !event.offers_position(position) {
            return Err(AppError::Validation(FieldErrors::single(
                "position",
                "Position is not offered by this event",
            )));
        }

        if find_user(&tx, user_id)?.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }

        if store::registration_exists(&tx, event_id, user_id, position)? {
            return Err(AppError::Conflict(DUPLICATE_REGISTRATION.into()));
        }

        let reg = match store::insert_registration(&tx, event_id, user_id, position, &Utc::now()) {
            Ok(reg) => reg,
            Err(e) if e.is_unique_violation() => {
                return Err(AppError::Conflict(DUPLICATE_REGISTRATION.into()));
            }
            Err(e) => return Err(e),
        };

        audit_quiet(
            &tx,
            "volunteer_register",
            event_id,
            &format!("User {user_id} registered as '{position}'"),
        );
        tx.commit()?;

        Ok(reg)
    }

    /// Remove the registration for the exact triple. `Ok(false)` means there
    /// was nothing to remove.
    pub fn unregister(
        conn: &Connection,
        event_id: &str,
        user_id: i64,
        position: &str,
    ) -> AppResult<bool> {
        let removed = store::delete_registration(conn, event_id, user_id, position)? > 0;
        if removed {
            audit_quiet(
                conn,
                "volunteer_unregister",
                event_id,
                &format!("User {user_id} left '{position}'"),
            );
        }
        Ok(removed)
    }

    /// Delete every registration of `event_id` whose position is not in
    /// `new_positions`. Must run before the new list is stored. Returns the
    /// number of registrations removed.
    pub fn cleanup_removed_positions(
        conn: &Connection,
        event_id: &str,
        new_positions: &[String],
    ) -> AppResult<usize> {
        let current = store::registrations_for_event(conn, event_id)?;

        let mut removed = 0;
        for reg in current
            .iter()
            .filter(|r| !new_positions.iter().any(|p| p == &r.position))
        {
            removed += store::delete_registration(conn, event_id, reg.user_id, &reg.position)?;
        }

        if removed > 0 {
            audit_quiet(
                conn,
                "volunteer_cleanup",
                event_id,
                &format!("Removed {removed} registration(s) for dropped positions"),
            );
        }
        Ok(removed)
    }

    /// Registrations of one event, oldest first. Registrant emails are only
    /// included when `include_email` is set (authenticated callers).
    pub fn list_by_event(
        conn: &Connection,
        event_id: &str,
        include_email: bool,
    ) -> AppResult<Vec<Registration>> {
        let mut regs = store::registrations_for_event(conn, event_id)?;
        if !include_email {
            for r in &mut regs {
                r.user_email = None;
            }
        }
        Ok(regs)
    }

    /// Registrations across every event owned by `owner`, one bucket per
    /// event, buckets in event-date order.
    pub fn list_grouped_by_owner(conn: &Connection, owner: i64) -> AppResult<Vec<EventVolunteers>> {
        let rows = store::registrations_for_owner(conn, owner)?;

        let mut buckets: Vec<EventVolunteers> = Vec::new();
        for (title, reg) in rows {
            match buckets.last_mut() {
                Some(b) if b.event_id == reg.event_id => b.volunteers.push(reg),
                _ => buckets.push(EventVolunteers {
                    event_id: reg.event_id.clone(),
                    event_title: title,
                    volunteers: vec![reg],
                }),
            }
        }
        Ok(buckets)
    }
}
