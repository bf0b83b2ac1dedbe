//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod admin;
pub mod refresh_token;

// Venue
pub mod dining_table;
pub mod location;

// Menu
pub mod menu;

// Reservations
pub mod reservation;

// Notifications
pub mod notification;

// Re-exports
pub use admin::{Admin, AdminCreate, AdminId, AdminUpdate};
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use location::{Location, LocationCreate, LocationId, LocationUpdate};
pub use menu::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};
pub use notification::{Notification, NotificationDraft};
pub use refresh_token::RefreshToken;
pub use reservation::{
    Customer, Reservation, ReservationCreate, ReservationFilter, ReservationId, ReservationUpdate,
    StatusChange, StatusUpdateRequest,
};
