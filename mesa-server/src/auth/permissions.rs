//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! ## 设计原则
//! - 单一授权接缝：角色 → 权限集在这里定义一次，
//!   路由守卫统一走 `require_permission`，不做散落的角色字符串比较
//! - `all` 是超级权限；`x:*` 通配一个资源的全部操作
//! - 门店范围是权限之外的第二道闸 (`CurrentUser::can_access_location`)

use shared::AdminRole;

/// 全部可授予权限
pub const ALL_PERMISSIONS: &[&str] = &[
    "reservations:read",    // 查看预订
    "reservations:manage",  // 创建/修改/状态迁移/删除预订
    "tables:read",          // 查看桌台
    "tables:manage",        // 桌台管理
    "locations:manage",     // 门店管理
    "menu:manage",          // 菜单管理
    "notifications:read",   // 查看通知
    "notifications:manage", // 已读/删除通知
    "reports:view",         // 报表查看
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[
    "admins:manage", // 账号管理
    "all",           // 超级权限
];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 经理角色默认权限（全部可配置权限）
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    "reservations:read",
    "reservations:manage",
    "tables:read",
    "tables:manage",
    "locations:manage",
    "menu:manage",
    "notifications:read",
    "notifications:manage",
    "reports:view",
];

/// 员工角色默认权限（只读）
pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[
    "reservations:read",
    "tables:read",
    "notifications:read",
];

/// Permission set granted to a role
pub fn permissions_for_role(role: AdminRole) -> Vec<String> {
    let set: &[&str] = match role {
        AdminRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        AdminRole::Manager => DEFAULT_MANAGER_PERMISSIONS,
        AdminRole::Staff => DEFAULT_STAFF_PERMISSIONS,
    };
    set.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gets_wildcard() {
        assert_eq!(permissions_for_role(AdminRole::Admin), vec!["all"]);
    }

    #[test]
    fn staff_is_read_only() {
        let perms = permissions_for_role(AdminRole::Staff);
        assert!(perms.iter().all(|p| p.ends_with(":read")));
    }
}
