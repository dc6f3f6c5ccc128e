//! Event rules: creation, ownership-checked mutation and deletion, listings.

use crate::core::volunteers::VolunteerLogic;
use crate::db::events as store;
use crate::db::log::audit_quiet;
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::event::{Event, EventChanges, EventFilter, NewEvent, Ownership};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

pub struct EventLogic;

impl EventLogic {
    pub fn create(conn: &Connection, owner: i64, input: &NewEvent) -> AppResult<Event> {
        let id = Uuid::new_v4().to_string();
        let event = store::insert_event(conn, &id, input, Some(owner))?;

        audit_quiet(conn, "event_create", &event.id, &format!("Created '{}'", event.title));
        tracing::info!(event_id = %event.id, owner, "event created");
        Ok(event)
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<Event>> {
        store::list_events(conn)
    }

    pub fn get(conn: &Connection, id: &str) -> AppResult<Event> {
        store::find_event(conn, id)?.ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    pub fn list_by_owner(conn: &Connection, owner: i64) -> AppResult<Vec<Event>> {
        store::list_events_by_owner(conn, owner)
    }

    pub fn search(conn: &Connection, term: &str) -> AppResult<Vec<Event>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::BadRequest("Search term is required".into()));
        }
        store::search_events(conn, term)
    }

    pub fn filter(conn: &Connection, filter: &EventFilter) -> AppResult<Vec<Event>> {
        store::filter_events(conn, filter)
    }

    pub fn check_ownership(conn: &Connection, id: &str, user_id: i64) -> AppResult<Ownership> {
        Ok(match store::event_owner(conn, id)? {
            None => Ownership::Missing,
            Some(Some(owner)) if owner == user_id => Ownership::Owner,
            Some(_) => Ownership::NotOwner,
        })
    }

    pub fn is_owner(conn: &Connection, id: &str, user_id: i64) -> AppResult<bool> {
        Ok(Self::check_ownership(conn, id, user_id)? == Ownership::Owner)
    }

    fn require_owner(conn: &Connection, id: &str, user_id: i64, action: &str) -> AppResult<()> {
        match Self::check_ownership(conn, id, user_id)? {
            Ownership::Owner => Ok(()),
            Ownership::Missing => Err(AppError::NotFound("Event not found".into())),
            Ownership::NotOwner => Err(AppError::Forbidden(format!(
                "You can only {action} your own events"
            ))),
        }
    }

    /// Apply a partial update on behalf of `user_id`.
    ///
    /// When the position list changes, registrations for positions that are
    /// no longer offered are removed first, while the old list is still
    /// stored. Ownership check, cleanup and update share one immediate
    /// transaction.
    pub fn update(
        conn: &mut Connection,
        id: &str,
        user_id: i64,
        changes: &EventChanges,
    ) -> AppResult<Event> {
        if changes.is_empty() {
            return Err(AppError::Validation(FieldErrors::single(
                "body",
                "At least one field must be provided",
            )));
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Self::require_owner(&tx, id, user_id, "update")?;

        let mut removed = 0;
        if let Some(positions) = &changes.volunteer_positions {
            removed = VolunteerLogic::cleanup_removed_positions(&tx, id, positions)?;
        }

        let event = store::update_event_fields(&tx, id, changes)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        let mut message = format!("Updated '{}'", event.title);
        if removed > 0 {
            message.push_str(&format!(", dropped {removed} registration(s)"));
        }
        audit_quiet(&tx, "event_update", id, &message);
        tx.commit()?;

        tracing::info!(event_id = %id, removed_registrations = removed, "event updated");
        Ok(event)
    }

    /// Delete an event owned by `user_id`; its registrations cascade.
    pub fn delete(conn: &mut Connection, id: &str, user_id: i64) -> AppResult<Event> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Self::require_owner(&tx, id, user_id, "delete")?;

        let event = store::delete_event(&tx, id)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        audit_quiet(&tx, "event_delete", id, &format!("Deleted '{}'", event.title));
        tx.commit()?;

        tracing::info!(event_id = %id, "event deleted");
        Ok(event)
    }
}
