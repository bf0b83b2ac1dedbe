//! Reservation input validation
//!
//! Schema-level constraints (lengths, ranges) come from the `validator`
//! derives on the DTOs; the rules here are the business checks the
//! lifecycle manager runs before touching storage.

use crate::db::models::{Customer, DiningTable, ReservationCreate};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};
use shared::{ReservationType, TimeSlot};
use std::collections::HashSet;
use surrealdb::RecordId;
use validator::Validate;

use super::error::{ReservationError, ReservationResult};

/// Validate a create payload before any storage access
///
/// 日期允许是过去 (管理员补录历史预订)，因此这里不做未来性检查。
pub fn validate_create(input: &ReservationCreate) -> ReservationResult<()> {
    input
        .validate()
        .map_err(|e| ReservationError::Validation(e.to_string()))?;
    validate_customer(&input.customer)?;
    validate_slot(&input.time_slot)?;

    match input.kind {
        ReservationType::Table => {
            if input.tables.is_empty() {
                return Err(ReservationError::Validation(
                    "Table reservations require at least one table".to_string(),
                ));
            }
        }
        // Whole-venue kinds may come without table references
        ReservationType::Event | ReservationType::FullVenue => {}
    }
    Ok(())
}

pub fn validate_customer(customer: &Customer) -> ReservationResult<()> {
    validate_required_text(&customer.first_name, "customer.first_name", MAX_SHORT_TEXT_LEN)
        .map_err(|e| ReservationError::Validation(e.to_string()))?;
    validate_required_text(&customer.last_name, "customer.last_name", MAX_SHORT_TEXT_LEN)
        .map_err(|e| ReservationError::Validation(e.to_string()))?;
    validate_required_text(&customer.phone, "customer.phone", MAX_SHORT_TEXT_LEN)
        .map_err(|e| ReservationError::Validation(e.to_string()))?;
    Ok(())
}

pub fn validate_slot(slot: &TimeSlot) -> ReservationResult<()> {
    slot.validate()
        .map_err(|e| ReservationError::Validation(e.to_string()))
}

pub fn validate_guests(guests: u32) -> ReservationResult<()> {
    if guests < 1 {
        return Err(ReservationError::Validation(
            "guests must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_reason(reason: &Option<String>) -> ReservationResult<()> {
    validate_optional_text(reason, "reason", MAX_NOTE_LEN)
        .map_err(|e| ReservationError::Validation(e.to_string()))
}

/// Every requested table must be an active table of the location
pub fn validate_tables_belong(
    requested: &[RecordId],
    location_tables: &[DiningTable],
) -> ReservationResult<()> {
    let known: HashSet<String> = location_tables
        .iter()
        .filter_map(|t| t.id.as_ref().map(|id| id.to_string()))
        .collect();
    for table in requested {
        if !known.contains(&table.to_string()) {
            return Err(ReservationError::Validation(format!(
                "Table {} does not belong to this location",
                table
            )));
        }
    }
    Ok(())
}
