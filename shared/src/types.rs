//! Common types for the shared crate
//!
//! Domain enums and the reservation time window used across the framework.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reservation lifecycle status
///
/// | 状态 | 说明 |
/// |------|------|
/// | pending | 初始状态，等待确认 |
/// | confirmed | 已确认 |
/// | cancelled | 已取消 (终态) |
/// | completed | 已完成 (终态) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Allowed transitions:
    ///
    /// - pending → confirmed | cancelled
    /// - confirmed → cancelled | completed
    ///
    /// Same-state "transitions" are rejected; a status update must change
    /// the status.
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation kind
///
/// `event` and `full_venue` reservations occupy every table of the
/// location for their window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationType {
    Table,
    Event,
    FullVenue,
}

impl ReservationType {
    /// Whether this kind blocks the whole venue for its window
    pub fn occupies_venue(&self) -> bool {
        matches!(self, Self::Event | Self::FullVenue)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Event => "event",
            Self::FullVenue => "full_venue",
        }
    }
}

impl fmt::Display for ReservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining table zone (区域)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableZone {
    MainHall,
    Garden,
    Vip,
    Bar,
}

/// Admin role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    Manager,
    Staff,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// In-app notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ReservationNew,
    ReservationConfirmed,
    ReservationCancelled,
    System,
}

/// Permission type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission(pub String);

impl Permission {
    /// Check if this permission grants access to the given resource action
    pub fn grants(&self, action: &str) -> bool {
        if self.0 == "all" {
            return true;
        }
        if self.0.ends_with(":*") {
            let prefix = &self.0[..self.0.len() - 2];
            return action.starts_with(prefix);
        }
        self.0 == action
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time slot validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeSlotError {
    #[error("Invalid time format: {0} (expected HH:MM)")]
    BadFormat(String),

    #[error("Time slot start {start} must be before end {end}")]
    Unordered { start: String, end: String },
}

/// Reservation time window, half-open `[start, end)`
///
/// Bounds are zero-padded `"HH:MM"` strings; because the format is fixed
/// width, lexicographic comparison is chronological comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Validate format and ordering (`start < end`; equal bounds rejected)
    pub fn validate(&self) -> Result<(), TimeSlotError> {
        for bound in [&self.start, &self.end] {
            if !is_hh_mm(bound) {
                return Err(TimeSlotError::BadFormat(bound.clone()));
            }
        }
        if self.start >= self.end {
            return Err(TimeSlotError::Unordered {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok(())
    }

    /// Half-open interval overlap test
    ///
    /// `[a.start, a.end)` and `[b.start, b.end)` overlap iff
    /// `a.start < b.end && b.start < a.end`. Back-to-back windows
    /// (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn is_hh_mm(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return false;
    }
    if ![b[0], b[1], b[3], b[4]].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hour = (b[0] - b'0') * 10 + (b[1] - b'0');
    let min = (b[3] - b'0') * 10 + (b[4] - b'0');
    hour < 24 && min < 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));

        // 终态不允许任何迁移
        for target in [Pending, Confirmed, Cancelled, Completed] {
            assert!(!Cancelled.can_transition_to(target));
            assert!(!Completed.can_transition_to(target));
        }

        // Same-state is not a transition
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn slot_overlap_half_open() {
        let a = TimeSlot::new("18:00", "20:00");
        assert!(a.overlaps(&TimeSlot::new("19:00", "21:00")));
        assert!(a.overlaps(&TimeSlot::new("18:30", "19:30")));
        assert!(a.overlaps(&TimeSlot::new("17:00", "18:01")));

        // Touching boundaries do not overlap
        assert!(!a.overlaps(&TimeSlot::new("20:00", "22:00")));
        assert!(!a.overlaps(&TimeSlot::new("16:00", "18:00")));
    }

    #[test]
    fn slot_validation() {
        assert!(TimeSlot::new("09:00", "17:00").validate().is_ok());
        assert_eq!(
            TimeSlot::new("18:00", "18:00").validate(),
            Err(TimeSlotError::Unordered {
                start: "18:00".into(),
                end: "18:00".into(),
            })
        );
        assert!(TimeSlot::new("20:00", "18:00").validate().is_err());
        assert!(matches!(
            TimeSlot::new("9:00", "17:00").validate(),
            Err(TimeSlotError::BadFormat(_))
        ));
        assert!(matches!(
            TimeSlot::new("25:00", "26:00").validate(),
            Err(TimeSlotError::BadFormat(_))
        ));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&ReservationType::FullVenue).unwrap(),
            "\"full_venue\""
        );
    }

    #[test]
    fn permission_grants() {
        assert!(Permission("all".into()).grants("reservations:manage"));
        assert!(Permission("reservations:*".into()).grants("reservations:read"));
        assert!(Permission("reservations:read".into()).grants("reservations:read"));
        assert!(!Permission("reservations:read".into()).grants("reservations:manage"));
    }
}
