//! Reservation Lifecycle Manager
//!
//! 预订生命周期的全部写路径都走这里：
//!
//! - **create**: 校验 → 可用性检查 → 事务性落库 → 通知扇出
//! - **update**: 仅 pending/confirmed 可改；时间窗/桌台变更重跑可用性
//!   检查 (排除自身)；`type` 创建后不可变
//! - **update_status**: 状态机校验 → CAS 落库 → 追加审计条目 → 通知
//!
//! # 状态机
//!
//! ```text
//! pending ──→ confirmed ──→ completed
//!    │             │
//!    └──→ cancelled ←┘          (cancelled / completed 为终态)
//! ```
//!
//! 可用性检查与插入之间的竞态由 repository 层的事务重查关闭；
//! 这里的预检查只是为了给客户端友好的冲突详情。

use crate::db::models::{
    NotificationDraft, Reservation, ReservationCreate, ReservationFilter, ReservationUpdate,
    StatusChange, StatusUpdateRequest,
};
use crate::db::repository::{
    LocationRepository, RepoError, ReservationRepository, parse_record_id,
};
use crate::notifications::NotificationDispatcher;
use chrono::Utc;
use shared::{NotificationType, ReservationStatus, ReservationType};
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use super::availability::AvailabilityChecker;
use super::error::{ReservationError, ReservationResult};
use super::validate;

pub struct ReservationManager {
    db: Surreal<Db>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl ReservationManager {
    pub fn new(db: Surreal<Db>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { db, dispatcher }
    }

    fn repo(&self) -> ReservationRepository {
        ReservationRepository::new(self.db.clone())
    }

    fn checker(&self) -> AvailabilityChecker {
        AvailabilityChecker::new(self.db.clone())
    }

    /// Create a reservation; public requests pass `created_by = None`
    pub async fn create(
        &self,
        input: ReservationCreate,
        created_by: Option<RecordId>,
    ) -> ReservationResult<Reservation> {
        validate::validate_create(&input)?;

        match input.kind {
            ReservationType::Table => {
                let availability = self
                    .checker()
                    .check(&input.location, input.date, &input.time_slot, None)
                    .await?;
                let mut location_tables = availability.available.clone();
                location_tables.extend(availability.occupied.iter().cloned());
                validate::validate_tables_belong(&input.tables, &location_tables)?;

                let occupied = availability.occupied_among(&input.tables);
                if !occupied.is_empty() {
                    return Err(ReservationError::TableConflict { occupied });
                }
            }
            ReservationType::Event | ReservationType::FullVenue => {
                // Table-level occupancy does not block a whole-venue
                // booking, but two whole-venue bookings must not overlap
                LocationRepository::new(self.db.clone())
                    .require_active(&input.location)
                    .await?;
                if self
                    .checker()
                    .venue_conflict(&input.location, input.date, &input.time_slot, None)
                    .await?
                {
                    return Err(ReservationError::VenueConflict);
                }
            }
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: None,
            location: input.location.clone(),
            kind: input.kind,
            tables: input.tables.clone(),
            customer: input.customer,
            date: input.date,
            time_slot: input.time_slot.clone(),
            guests: input.guests,
            event_details: input.event_details,
            status: ReservationStatus::Pending,
            status_history: vec![StatusChange {
                status: ReservationStatus::Pending,
                changed_by: created_by.clone(),
                changed_at: now,
                reason: None,
            }],
            created_by,
            updated_by: None,
            confirmed_by: None,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = match self.repo().create_checked(reservation).await {
            Ok(created) => created,
            // Lost the race against a concurrent create: report the same
            // conflict the pre-check would have produced
            Err(RepoError::Conflict(_)) => {
                return Err(self
                    .conflict_details(input.kind, &input.location, input.date, &input.time_slot, &input.tables, None)
                    .await);
            }
            Err(e) => return Err(e.into()),
        };

        // The write is acknowledged before any notification is attempted;
        // dispatch failures are logged inside the dispatcher and never
        // bubble up
        self.dispatcher.dispatch(new_reservation_draft(&created)).await;

        Ok(created)
    }

    pub async fn get(&self, id: &str) -> ReservationResult<Reservation> {
        self.repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReservationError::NotFound(format!("Reservation {} not found", id)))
    }

    pub async fn list(&self, filter: &ReservationFilter) -> ReservationResult<Vec<Reservation>> {
        Ok(self.repo().find_filtered(filter).await?)
    }

    /// Partial update of a pending/confirmed reservation
    ///
    /// Changing the window or the table set re-runs the availability
    /// check, excluding the reservation's own id.
    pub async fn update(
        &self,
        id: &str,
        patch: ReservationUpdate,
        acting_admin: &RecordId,
    ) -> ReservationResult<Reservation> {
        use validator::Validate;
        patch
            .validate()
            .map_err(|e| ReservationError::Validation(e.to_string()))?;

        let current = self.get(id).await?;
        if current.status.is_terminal() {
            return Err(ReservationError::Rule(format!(
                "Reservation in status {} can no longer be modified",
                current.status
            )));
        }
        let own_id = current
            .id
            .clone()
            .ok_or_else(|| ReservationError::NotFound(format!("Reservation {} not found", id)))?;

        let mut merged = current.clone();
        if let Some(date) = patch.date {
            merged.date = date;
        }
        if let Some(slot) = patch.time_slot {
            validate::validate_slot(&slot)?;
            merged.time_slot = slot;
        }
        if let Some(tables) = patch.tables {
            merged.tables = tables
                .iter()
                .map(|t| parse_record_id(t, "table").map_err(ReservationError::from))
                .collect::<ReservationResult<Vec<_>>>()?;
        }
        if let Some(guests) = patch.guests {
            validate::validate_guests(guests)?;
            merged.guests = guests;
        }
        if let Some(customer) = patch.customer {
            validate::validate_customer(&customer)?;
            merged.customer = customer;
        }
        if let Some(details) = patch.event_details {
            merged.event_details = Some(details);
        }
        merged.updated_by = Some(acting_admin.clone());

        if merged.kind == ReservationType::Table && merged.tables.is_empty() {
            return Err(ReservationError::Validation(
                "Table reservations require at least one table".to_string(),
            ));
        }

        let window_changed = merged.date != current.date
            || merged.time_slot != current.time_slot
            || merged.tables != current.tables;
        if window_changed {
            match merged.kind {
                ReservationType::Table => {
                    let availability = self
                        .checker()
                        .check(&merged.location, merged.date, &merged.time_slot, Some(&own_id))
                        .await?;
                    let mut location_tables = availability.available.clone();
                    location_tables.extend(availability.occupied.iter().cloned());
                    validate::validate_tables_belong(&merged.tables, &location_tables)?;

                    let occupied = availability.occupied_among(&merged.tables);
                    if !occupied.is_empty() {
                        return Err(ReservationError::TableConflict { occupied });
                    }
                }
                ReservationType::Event | ReservationType::FullVenue => {
                    if self
                        .checker()
                        .venue_conflict(&merged.location, merged.date, &merged.time_slot, Some(&own_id))
                        .await?
                    {
                        return Err(ReservationError::VenueConflict);
                    }
                }
            }
        }

        match self.repo().update_checked(&own_id, &merged).await {
            Ok(updated) => Ok(updated),
            Err(RepoError::Conflict(_)) => Err(self
                .conflict_details(
                    merged.kind,
                    &merged.location,
                    merged.date,
                    &merged.time_slot,
                    &merged.tables,
                    Some(&own_id),
                )
                .await),
            Err(e) => Err(e.into()),
        }
    }

    /// Transition the reservation status under audit control
    pub async fn update_status(
        &self,
        id: &str,
        request: StatusUpdateRequest,
        acting_admin: &RecordId,
    ) -> ReservationResult<Reservation> {
        validate::validate_reason(&request.reason)?;

        let current = self.get(id).await?;
        let from = current.status;
        if !from.can_transition_to(request.status) {
            return Err(ReservationError::InvalidTransition {
                from,
                to: request.status,
            });
        }
        let own_id = current
            .id
            .clone()
            .ok_or_else(|| ReservationError::NotFound(format!("Reservation {} not found", id)))?;

        let now = Utc::now();
        let entry = StatusChange {
            status: request.status,
            changed_by: Some(acting_admin.clone()),
            changed_at: now,
            reason: request.reason.clone(),
        };
        let (confirmed_by, confirmed_at) = if request.status == ReservationStatus::Confirmed {
            (Some(acting_admin), Some(now))
        } else {
            (None, None)
        };

        let updated = match self
            .repo()
            .update_status(&own_id, from, entry, confirmed_by, confirmed_at)
            .await
        {
            Ok(updated) => updated,
            // A concurrent transition won the CAS; report against the
            // status that actually holds now
            Err(RepoError::Conflict(_)) => {
                let actual = self.get(id).await.map(|r| r.status).unwrap_or(from);
                return Err(ReservationError::InvalidTransition {
                    from: actual,
                    to: request.status,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(draft) = status_change_draft(&updated) {
            self.dispatcher.dispatch(draft).await;
        }

        Ok(updated)
    }

    /// Hard delete (admin only)
    pub async fn delete(&self, id: &str) -> ReservationResult<bool> {
        self.get(id).await?;
        Ok(self.repo().delete(id).await?)
    }

    /// Reconstruct the detailed conflict after losing the storage race
    async fn conflict_details(
        &self,
        kind: ReservationType,
        location: &RecordId,
        date: chrono::NaiveDate,
        slot: &shared::TimeSlot,
        tables: &[RecordId],
        exclude: Option<&RecordId>,
    ) -> ReservationError {
        if kind == ReservationType::Table {
            if let Ok(availability) = self.checker().check(location, date, slot, exclude).await {
                let occupied = availability.occupied_among(tables);
                if !occupied.is_empty() {
                    return ReservationError::TableConflict { occupied };
                }
            }
        }
        ReservationError::VenueConflict
    }
}

fn new_reservation_draft(reservation: &Reservation) -> NotificationDraft {
    NotificationDraft {
        kind: NotificationType::ReservationNew,
        title: "New reservation".to_string(),
        message: format!(
            "{} {} booked {} {} for {} guests",
            reservation.customer.first_name,
            reservation.customer.last_name,
            reservation.date,
            reservation.time_slot,
            reservation.guests,
        ),
        reservation: reservation.id.clone(),
        location: Some(reservation.location.clone()),
        recipient: None,
    }
}

/// Notification for a status change; `completed` is silent
fn status_change_draft(reservation: &Reservation) -> Option<NotificationDraft> {
    let (kind, title) = match reservation.status {
        ReservationStatus::Confirmed => (
            NotificationType::ReservationConfirmed,
            "Reservation confirmed",
        ),
        ReservationStatus::Cancelled => (
            NotificationType::ReservationCancelled,
            "Reservation cancelled",
        ),
        ReservationStatus::Pending | ReservationStatus::Completed => return None,
    };
    Some(NotificationDraft {
        kind,
        title: title.to_string(),
        message: format!(
            "Reservation for {} {} on {} {} is now {}",
            reservation.customer.first_name,
            reservation.customer.last_name,
            reservation.date,
            reservation.time_slot,
            reservation.status,
        ),
        reservation: reservation.id.clone(),
        location: Some(reservation.location.clone()),
        recipient: None,
    })
}
