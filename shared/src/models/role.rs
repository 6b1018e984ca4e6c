//! Role Model

use serde::{Deserialize, Serialize};

/// Coarse permission level stored in `user_roles`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "app_role", rename_all = "snake_case"))]
pub enum Role {
    Admin,
    Manager,
    OrderHandler,
    /// Accounts without a `user_roles` row are customers
    #[default]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::OrderHandler => "order_handler",
            Role::Customer => "customer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Admins, managers and order handlers see the staff dashboard
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager | Role::OrderHandler)
    }

    pub fn permissions(&self) -> RolePermissions {
        RolePermissions {
            is_admin: self.is_admin(),
            is_staff: self.is_staff(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "order_handler" => Ok(Role::OrderHandler),
            "customer" => Ok(Role::Customer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// UI-level permission booleans derived from a role
///
/// Authorization is still enforced server-side; these only drive what the
/// storefront shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RolePermissions {
    pub is_admin: bool,
    pub is_staff: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_admin_and_staff() {
        let perms = Role::Admin.permissions();
        assert!(perms.is_admin);
        assert!(perms.is_staff);
    }

    #[test]
    fn test_staff_roles() {
        for role in [Role::Manager, Role::OrderHandler] {
            let perms = role.permissions();
            assert!(!perms.is_admin, "{role} must not be admin");
            assert!(perms.is_staff, "{role} must be staff");
        }
    }

    #[test]
    fn test_customer_has_no_elevated_permissions() {
        assert_eq!(Role::Customer.permissions(), RolePermissions::default());
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_role_serde_and_parse() {
        assert_eq!(
            serde_json::to_string(&Role::OrderHandler).unwrap(),
            "\"order_handler\""
        );
        assert_eq!("manager".parse::<Role>(), Ok(Role::Manager));
        assert!("owner".parse::<Role>().is_err());
    }
}
