//! Reservation Repository
//!
//! 预订数据访问层。可用性判断在 manager / checker 层完成；
//! 这里负责的是**并发安全**：
//!
//! - `create_checked` / `update_checked` 在单个数据库事务里重查冲突，
//!   两个并发请求不可能都通过检查并都落库 (双重预订竞态在存储层关闭)。
//! - `update_status` 用 compare-and-swap 保证状态迁移串行化。
//!
//! 事务内用 THROW 标记失败原因，错误串回流后由 [`classify_error`] 分类。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Reservation, ReservationFilter, StatusChange};
use chrono::{DateTime, NaiveDate, Utc};
use shared::{ReservationStatus, ReservationType};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "reservation";

// THROW markers surfaced from transactional statements
const ERR_OVERLAP: &str = "reservation_overlap";
const ERR_MISSING: &str = "reservation_missing";
const ERR_STATUS_CHANGED: &str = "reservation_status_changed";

/// Conflict filter fragment for the given reservation kind
///
/// - `table` 预订与「整场预订 或 共享任一桌台的预订」冲突
/// - `event` / `full_venue` 只与其他整场预订冲突 (桌台级占用不拦截创建)
fn clash_condition(kind: ReservationType) -> &'static str {
    match kind {
        ReservationType::Table => {
            "(`type` IN ['event', 'full_venue'] OR tables CONTAINSANY $tables)"
        }
        _ => "`type` IN ['event', 'full_venue']",
    }
}

/// Map THROW markers back to typed repository errors
fn classify_error(e: surrealdb::Error) -> RepoError {
    let msg = e.to_string();
    if msg.contains(ERR_OVERLAP) {
        RepoError::Conflict("Reservation window conflicts with an existing booking".to_string())
    } else if msg.contains(ERR_STATUS_CHANGED) {
        RepoError::Conflict("Reservation status changed concurrently".to_string())
    } else if msg.contains(ERR_MISSING) {
        RepoError::NotFound("Reservation not found".to_string())
    } else {
        RepoError::Database(msg)
    }
}

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = parse_record_id(id, "reservation")?;
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// List reservations, optionally filtered by location / date / status
    pub async fn find_filtered(&self, filter: &ReservationFilter) -> RepoResult<Vec<Reservation>> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.location.is_some() {
            conditions.push("location = $location");
        }
        if filter.date.is_some() {
            conditions.push("date = $date");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }

        let mut sql = String::from("SELECT * FROM reservation");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY date, time_slot.start");

        let mut query = self.base.db().query(sql);
        if let Some(location) = &filter.location {
            let thing = parse_record_id(location, "location")?;
            query = query.bind(("location", thing.to_string()));
        }
        if let Some(date) = filter.date {
            query = query.bind(("date", date));
        }
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }

        let reservations: Vec<Reservation> = query.await?.take(0)?;
        Ok(reservations)
    }

    /// Reservations that may block tables for a location/date
    ///
    /// Cancelled / completed never block. Overlap against a concrete
    /// window is decided by the caller via `TimeSlot::overlaps`.
    pub async fn find_blocking(
        &self,
        location: &RecordId,
        date: NaiveDate,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Vec<Reservation>> {
        let mut sql = String::from(
            "SELECT * FROM reservation WHERE location = $location AND date = $date \
             AND status IN ['pending', 'confirmed']",
        );
        if exclude.is_some() {
            sql.push_str(" AND id != $exclude");
        }

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("location", location.to_string()))
            .bind(("date", date));
        if let Some(exclude) = exclude {
            query = query.bind(("exclude", exclude.clone()));
        }

        let reservations: Vec<Reservation> = query.await?.take(0)?;
        Ok(reservations)
    }

    /// Insert a reservation, re-checking for conflicts inside one transaction
    ///
    /// The caller has already run the availability check for a friendly
    /// error; this re-check is what makes concurrent duplicates impossible.
    pub async fn create_checked(&self, mut reservation: Reservation) -> RepoResult<Reservation> {
        let key = uuid::Uuid::new_v4().simple().to_string();
        let rid = RecordId::from((TABLE, key.as_str()));
        reservation.id = None;

        let sql = format!(
            "BEGIN TRANSACTION;\n\
             LET $clash = (SELECT VALUE id FROM reservation \
                WHERE location = $location AND date = $date \
                AND status IN ['pending', 'confirmed'] \
                AND time_slot.start < $end AND time_slot.end > $start \
                AND {});\n\
             IF array::len($clash) > 0 {{ THROW '{}' }};\n\
             CREATE type::thing('reservation', $key) CONTENT $data;\n\
             COMMIT TRANSACTION;",
            clash_condition(reservation.kind),
            ERR_OVERLAP,
        );

        let tables: Vec<String> = reservation.tables.iter().map(|t| t.to_string()).collect();
        let response = self
            .base
            .db()
            .query(sql)
            .bind(("location", reservation.location.to_string()))
            .bind(("date", reservation.date))
            .bind(("start", reservation.time_slot.start.clone()))
            .bind(("end", reservation.time_slot.end.clone()))
            .bind(("tables", tables))
            .bind(("key", key))
            .bind(("data", reservation))
            .await?;
        response.check().map_err(classify_error)?;

        let created: Option<Reservation> = self.base.db().select(rid).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Apply field changes, re-checking window conflicts in one transaction
    ///
    /// `merged` is the already-loaded reservation with the patch applied by
    /// the manager. Its own id is excluded from the conflict scan so a
    /// reschedule never collides with itself.
    pub async fn update_checked(
        &self,
        id: &RecordId,
        merged: &Reservation,
    ) -> RepoResult<Reservation> {
        let sql = format!(
            "BEGIN TRANSACTION;\n\
             LET $r = (SELECT * FROM ONLY $thing);\n\
             IF $r = NONE {{ THROW '{}' }};\n\
             LET $clash = (SELECT VALUE id FROM reservation \
                WHERE location = $location AND date = $date \
                AND status IN ['pending', 'confirmed'] AND id != $thing \
                AND time_slot.start < $end AND time_slot.end > $start \
                AND {});\n\
             IF array::len($clash) > 0 {{ THROW '{}' }};\n\
             UPDATE $thing SET date = $date, time_slot = $time_slot, tables = $tables, \
                guests = $guests, customer = $customer, event_details = $event_details, \
                updated_by = $updated_by, updated_at = $now;\n\
             COMMIT TRANSACTION;",
            ERR_MISSING,
            clash_condition(merged.kind),
            ERR_OVERLAP,
        );

        let tables: Vec<String> = merged.tables.iter().map(|t| t.to_string()).collect();
        let response = self
            .base
            .db()
            .query(sql)
            .bind(("thing", id.clone()))
            .bind(("location", merged.location.to_string()))
            .bind(("date", merged.date))
            .bind(("start", merged.time_slot.start.clone()))
            .bind(("end", merged.time_slot.end.clone()))
            .bind(("time_slot", merged.time_slot.clone()))
            .bind(("tables", tables))
            .bind(("guests", merged.guests))
            .bind(("customer", merged.customer.clone()))
            .bind(("event_details", merged.event_details.clone()))
            .bind(("updated_by", merged.updated_by.as_ref().map(|a| a.to_string())))
            .bind(("now", Utc::now()))
            .await?;
        response.check().map_err(classify_error)?;

        let updated: Option<Reservation> = self.base.db().select(id.clone()).await?;
        updated.ok_or_else(|| RepoError::NotFound("Reservation not found".to_string()))
    }

    /// Transition status with compare-and-swap on the expected current status
    ///
    /// Appends one history entry; the caller has already validated the
    /// transition against the state machine.
    pub async fn update_status(
        &self,
        id: &RecordId,
        expected: ReservationStatus,
        entry: StatusChange,
        confirmed_by: Option<&RecordId>,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Reservation> {
        let confirm_clause = if confirmed_by.is_some() {
            ", confirmed_by = $confirmed_by, confirmed_at = $confirmed_at"
        } else {
            ""
        };
        let sql = format!(
            "BEGIN TRANSACTION;\n\
             LET $current = (SELECT VALUE status FROM ONLY $thing);\n\
             IF $current = NONE {{ THROW '{}' }};\n\
             IF $current != $expected {{ THROW '{}' }};\n\
             UPDATE $thing SET status = $status, status_history += $entry, \
                updated_by = $updated_by, updated_at = $now{};\n\
             COMMIT TRANSACTION;",
            ERR_MISSING, ERR_STATUS_CHANGED, confirm_clause,
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("thing", id.clone()))
            .bind(("expected", expected))
            .bind(("status", entry.status))
            .bind(("updated_by", entry.changed_by.as_ref().map(|a| a.to_string())))
            .bind(("now", Utc::now()))
            .bind(("entry", entry));
        if let Some(admin) = confirmed_by {
            query = query
                .bind(("confirmed_by", admin.to_string()))
                .bind(("confirmed_at", confirmed_at));
        }

        let response = query.await?;
        response.check().map_err(classify_error)?;

        let updated: Option<Reservation> = self.base.db().select(id.clone()).await?;
        updated.ok_or_else(|| RepoError::NotFound("Reservation not found".to_string()))
    }

    /// Hard delete a reservation
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, "reservation")?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
