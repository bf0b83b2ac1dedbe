//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.
//! These types are shared between mesa-server and the admin panel client.

use serde::{Deserialize, Serialize};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived JWT access token
    pub token: String,
    /// Opaque refresh token; rotated on every refresh
    pub refresh_token: String,
    pub user: UserInfo,
}

/// Refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout request (revokes the refresh token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Location scope; empty means every location
    #[serde(default)]
    pub locations: Vec<String>,
}
