//! Availability Checker
//!
//! 给定门店、日期和时间窗，把该门店的桌台划分为 available / occupied。
//! 纯读操作，不修改任何状态。

use crate::db::models::{DiningTable, Reservation};
use crate::db::repository::{DiningTableRepository, LocationRepository, ReservationRepository};
use chrono::NaiveDate;
use serde::Serialize;
use shared::TimeSlot;
use std::collections::HashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::{ReservationError, ReservationResult};

/// Partition of a location's tables for a time window
#[derive(Debug, Serialize)]
pub struct Availability {
    pub available: Vec<DiningTable>,
    pub occupied: Vec<DiningTable>,
}

impl Availability {
    /// Ids of requested tables that are occupied, for conflict messages
    pub fn occupied_among(&self, requested: &[surrealdb::RecordId]) -> Vec<String> {
        let occupied: HashSet<String> = self
            .occupied
            .iter()
            .filter_map(|t| t.id.as_ref().map(|id| id.to_string()))
            .collect();
        requested
            .iter()
            .map(|t| t.to_string())
            .filter(|id| occupied.contains(id))
            .collect()
    }
}

#[derive(Clone)]
pub struct AvailabilityChecker {
    db: Surreal<Db>,
}

impl AvailabilityChecker {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Partition the location's active tables into available / occupied
    ///
    /// A table counts as occupied when some pending/confirmed reservation
    /// overlaps the window and either references it or blocks the whole
    /// venue (`event` / `full_venue`). Cancelled and completed
    /// reservations never block. `exclude` omits one reservation from the
    /// scan (rechecking during an update of that same reservation).
    pub async fn check(
        &self,
        location_id: &surrealdb::RecordId,
        date: NaiveDate,
        slot: &TimeSlot,
        exclude: Option<&surrealdb::RecordId>,
    ) -> ReservationResult<Availability> {
        slot.validate()
            .map_err(|e| ReservationError::Validation(e.to_string()))?;

        let locations = LocationRepository::new(self.db.clone());
        locations.require_active(location_id).await?;

        let tables = DiningTableRepository::new(self.db.clone())
            .find_by_location(location_id)
            .await?;

        let blocking = ReservationRepository::new(self.db.clone())
            .find_blocking(location_id, date, exclude)
            .await?;
        let overlapping: Vec<&Reservation> = blocking
            .iter()
            .filter(|r| r.time_slot.overlaps(slot))
            .collect();

        // A venue-wide reservation occupies every table without naming any
        let venue_blocked = overlapping.iter().any(|r| r.kind.occupies_venue());
        let occupied_ids: HashSet<String> = overlapping
            .iter()
            .flat_map(|r| r.tables.iter().map(|t| t.to_string()))
            .collect();

        let (occupied, available) = tables.into_iter().partition(|table| {
            venue_blocked
                || table
                    .id
                    .as_ref()
                    .is_some_and(|id| occupied_ids.contains(&id.to_string()))
        });

        Ok(Availability {
            available,
            occupied,
        })
    }

    /// Whether another venue-wide reservation overlaps the window
    ///
    /// Used when creating `event` / `full_venue` reservations: table-level
    /// occupancy does not block those, but two whole-venue bookings for
    /// the same window must be rejected.
    pub async fn venue_conflict(
        &self,
        location_id: &surrealdb::RecordId,
        date: NaiveDate,
        slot: &TimeSlot,
        exclude: Option<&surrealdb::RecordId>,
    ) -> ReservationResult<bool> {
        let blocking = ReservationRepository::new(self.db.clone())
            .find_blocking(location_id, date, exclude)
            .await?;
        Ok(blocking
            .iter()
            .any(|r| r.kind.occupies_venue() && r.time_slot.overlaps(slot)))
    }
}
