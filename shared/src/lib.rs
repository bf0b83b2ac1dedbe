//! Shared types for the Mesa reservation framework
//!
//! Common types used by the server and its clients: domain enums,
//! the reservation time-window type, the uniform API response envelope
//! and the auth DTOs.

pub mod client;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use response::ApiResponse;
pub use types::{
    AdminRole, NotificationType, Permission, ReservationStatus, ReservationType, TableZone,
    TimeSlot, TimeSlotError,
};
