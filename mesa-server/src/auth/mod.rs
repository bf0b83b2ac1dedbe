//! 认证授权模块
//!
//! 提供 JWT 认证、权限管理和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_permission`] - 权限检查中间件
//! - [`LoginThrottle`] - 登录失败限流

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;
pub mod throttle;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_auth, require_permission};
pub use throttle::LoginThrottle;

use shared::{AdminRole, Permission};
use surrealdb::RecordId;

/// Authenticated admin context injected by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: AdminRole,
    pub permissions: Vec<Permission>,
    /// Location scope as "location:id" strings; empty = all locations
    pub locations: Vec<String>,
}

impl CurrentUser {
    /// Single authorization check: does this actor hold the permission?
    pub fn has_permission(&self, action: &str) -> bool {
        self.permissions.iter().any(|p| p.grants(action))
    }

    pub fn is_admin(&self) -> bool {
        self.role == AdminRole::Admin
    }

    /// Location-scope gate; empty scope covers every location
    pub fn can_access_location(&self, location: &RecordId) -> bool {
        self.locations.is_empty() || self.locations.iter().any(|l| l == &location.to_string())
    }

    /// The actor's admin record id
    pub fn record_id(&self) -> Result<RecordId, crate::AppError> {
        self.id
            .parse()
            .map_err(|_| crate::AppError::internal(format!("Malformed admin id: {}", self.id)))
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: AdminRole = claims.role.parse()?;
        let permissions = claims
            .permissions
            .split(',')
            .filter(|p| !p.is_empty())
            .map(|p| Permission(p.to_string()))
            .collect();
        let locations = claims
            .locations
            .split(',')
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            display_name: claims.display_name,
            role,
            permissions,
            locations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(permissions: &[&str], locations: &[&str]) -> CurrentUser {
        CurrentUser {
            id: "admin:root".to_string(),
            username: "root".to_string(),
            display_name: "Root".to_string(),
            role: AdminRole::Manager,
            permissions: permissions.iter().map(|p| Permission(p.to_string())).collect(),
            locations: locations.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn permission_checks() {
        let staff = user(&["reservations:read"], &[]);
        assert!(staff.has_permission("reservations:read"));
        assert!(!staff.has_permission("reservations:manage"));

        let root = user(&["all"], &[]);
        assert!(root.has_permission("reservations:manage"));
    }

    #[test]
    fn location_scope() {
        let loc: RecordId = "location:down_town".parse().unwrap();
        assert!(user(&[], &[]).can_access_location(&loc));
        assert!(user(&[], &["location:down_town"]).can_access_location(&loc));
        assert!(!user(&[], &["location:uptown"]).can_access_location(&loc));
    }
}
