//! Authentication Handlers
//!
//! Handles login, token refresh, logout and the current-user endpoint.
//!
//! 刷新令牌是 256-bit 随机串，库中只存 SHA-256 摘要；
//! 每次刷新都轮换 (吊销旧令牌、签发新令牌)。

use std::time::Duration;

use axum::{Json, extract::State, http::HeaderMap};
use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use crate::AppError;
use crate::auth::{CurrentUser, permissions::permissions_for_role};
use crate::core::ServerState;
use crate::db::models::{Admin, RefreshToken};
use crate::db::repository::{AdminRepository, RefreshTokenRepository};
use crate::security_log;
use crate::utils::{AppResult, ok, ok_with_message};
use shared::ApiResponse;
use shared::client::{LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Authenticates admin credentials, returns a JWT access token plus a
/// rotating refresh token.
pub async fn login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let username = req.username.clone();

    // Lockout window after repeated failures
    if state.login_throttle.is_locked(&username) {
        security_log!("WARN", "login_throttled", username = username.clone());
        return Err(AppError::forbidden(
            "Too many failed login attempts, try again later".to_string(),
        ));
    }

    let admins = AdminRepository::new(state.get_db());
    let admin = admins
        .find_by_username(&username)
        .await
        .map_err(|e| AppError::database(format!("Query failed: {}", e)))?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let admin = match admin {
        Some(admin) => {
            if !admin.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = admin
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                state.login_throttle.record_failure(&username);
                security_log!("WARN", "login_failed", username = username.clone());
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            admin
        }
        None => {
            state.login_throttle.record_failure(&username);
            security_log!("WARN", "login_failed", username = username.clone());
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    state.login_throttle.clear(&username);

    let response = issue_tokens(&state, &admin, &headers).await?;

    tracing::info!(
        user_id = %response.user.id,
        username = %admin.username,
        role = %admin.role,
        "Admin logged in successfully"
    );

    Ok(ok(response))
}

/// Refresh handler - rotates the refresh token and issues a new JWT
pub async fn refresh(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let tokens = RefreshTokenRepository::new(state.get_db());
    let hash = digest(&req.refresh_token);

    let stored = tokens
        .find_by_hash(&hash)
        .await
        .map_err(|e| AppError::database(format!("Query failed: {}", e)))?
        .ok_or_else(|| AppError::invalid_token("Unknown refresh token"))?;

    // Revoked-or-expired is never valid, regardless of anything else
    let now = Utc::now();
    if stored.revoked {
        security_log!("WARN", "refresh_revoked", admin = stored.admin.to_string());
        return Err(AppError::invalid_token("Refresh token revoked"));
    }
    if !stored.is_valid(now) {
        return Err(AppError::token_expired());
    }

    let admins = AdminRepository::new(state.get_db());
    let admin = admins
        .find_by_id(&stored.admin.to_string())
        .await
        .map_err(|e| AppError::database(format!("Query failed: {}", e)))?
        .ok_or_else(|| AppError::invalid_token("Admin no longer exists"))?;
    if !admin.is_active {
        return Err(AppError::forbidden("Account has been disabled".to_string()));
    }

    // Rotation: the presented token is spent either way
    tokens
        .revoke(&hash)
        .await
        .map_err(|e| AppError::database(format!("Failed to revoke token: {}", e)))?;

    let response = issue_tokens(&state, &admin, &headers).await?;
    Ok(ok(response))
}

/// Logout handler - revokes the presented refresh token
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<LogoutRequest>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let tokens = RefreshTokenRepository::new(state.get_db());
    tokens
        .revoke(&digest(&req.refresh_token))
        .await
        .map_err(|e| AppError::database(format!("Failed to revoke token: {}", e)))?;

    tracing::info!(username = %user.username, "Admin logged out");
    Ok(ok_with_message(true, "Logged out"))
}

/// Current user info (from the validated token)
pub async fn me(user: CurrentUser) -> AppResult<Json<ApiResponse<UserInfo>>> {
    Ok(ok(UserInfo {
        id: user.id.clone(),
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        role: user.role.to_string(),
        permissions: user.permissions.iter().map(|p| p.to_string()).collect(),
        locations: user.locations.clone(),
    }))
}

/// Generate the JWT + refresh token pair for an authenticated admin
async fn issue_tokens(
    state: &ServerState,
    admin: &Admin,
    headers: &HeaderMap,
) -> AppResult<LoginResponse> {
    let admin_id = admin
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("Admin record has no id".to_string()))?;
    let permissions = permissions_for_role(admin.role);
    let locations: Vec<String> = admin.locations.iter().map(|l| l.to_string()).collect();

    let token = state
        .get_jwt_service()
        .generate_token(
            &admin_id,
            &admin.username,
            &admin.display_name,
            admin.role.as_str(),
            &permissions,
            &locations,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    let refresh_token = generate_opaque_token()?;
    let record = RefreshToken {
        id: None,
        token_hash: digest(&refresh_token),
        admin: admin
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Admin record has no id".to_string()))?,
        expires_at: Utc::now() + chrono::Duration::days(state.config.refresh_token_ttl_days),
        revoked: false,
        revoked_at: None,
        ip_address: header_string(headers, "x-forwarded-for"),
        user_agent: header_string(headers, "user-agent"),
        created_at: Utc::now(),
    };
    RefreshTokenRepository::new(state.get_db())
        .create(record)
        .await
        .map_err(|e| AppError::database(format!("Failed to store refresh token: {}", e)))?;

    Ok(LoginResponse {
        token,
        refresh_token,
        user: UserInfo {
            id: admin_id,
            username: admin.username.clone(),
            display_name: admin.display_name.clone(),
            role: admin.role.to_string(),
            permissions,
            locations,
        },
    })
}

/// 256-bit random token, hex encoded
fn generate_opaque_token() -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("Failed to generate refresh token".to_string()))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 hex digest of a token
fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
