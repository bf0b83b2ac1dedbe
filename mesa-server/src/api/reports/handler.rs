//! Daily Report Handlers
//!
//! 按门店+日期聚合预订数据。实时计算，不落库。

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, ReservationStatus};

use crate::core::ServerState;
use crate::db::models::ReservationFilter;
use crate::db::repository::{LocationRepository, ReservationRepository, parse_record_id};
use crate::utils::{AppError, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    pub location: String,
    pub date: NaiveDate,
}

/// Aggregated picture of one location's day
#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub location: String,
    pub date: NaiveDate,
    pub total_reservations: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
    /// Guests across pending + confirmed + completed reservations
    pub expected_guests: u64,
}

/// GET /api/reports/daily?location=&date= - 单日报表
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyReportQuery>,
) -> AppResult<Json<ApiResponse<DailyReport>>> {
    let location = parse_record_id(&query.location, "location")?;
    LocationRepository::new(state.get_db())
        .find_by_id(&query.location)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Location {} not found", query.location)))?;

    let reservations = ReservationRepository::new(state.get_db())
        .find_filtered(&ReservationFilter {
            location: Some(query.location.clone()),
            date: Some(query.date),
            status: None,
        })
        .await?;

    let mut report = DailyReport {
        location: location.to_string(),
        date: query.date,
        total_reservations: reservations.len(),
        pending: 0,
        confirmed: 0,
        cancelled: 0,
        completed: 0,
        expected_guests: 0,
    };
    for reservation in &reservations {
        match reservation.status {
            ReservationStatus::Pending => report.pending += 1,
            ReservationStatus::Confirmed => report.confirmed += 1,
            ReservationStatus::Cancelled => report.cancelled += 1,
            ReservationStatus::Completed => report.completed += 1,
        }
        if reservation.status != ReservationStatus::Cancelled {
            report.expected_guests += u64::from(reservation.guests);
        }
    }

    Ok(ok(report))
}
