use serde::{Deserialize, Serialize};

use tradedesk_core::RoleId;

use crate::GrantedPermission;

/// Name of the distinguished role that bypasses route and action checks.
pub const ADMIN: &str = "Admin";
pub const SALES_AGENT: &str = "Sales Agent";
pub const LOGISTICS_AGENT: &str = "Logistics Agent";
pub const ACCOUNTANT: &str = "Accountant";

/// A named bundle of permissions, as attached to an identity by the server.
///
/// Order of `permissions` carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<GrantedPermission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<GrantedPermission>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Exact codename membership test over this role's snapshot.
    pub fn grants(&self, codename: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p.codename.as_str() == codename)
    }

    pub fn is_admin(&self) -> bool {
        self.name == ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Permission;

    #[test]
    fn deserializes_server_shape() {
        let json = serde_json::json!({
            "id": RoleId::new(),
            "name": "Logistics Agent",
            "permissions": [
                { "id": 7, "codename": "view_shipment", "name": "Can view shipment" },
                { "id": 8, "codename": "change_shipment", "name": "Can change shipment" }
            ]
        });

        let role: Role = serde_json::from_value(json).unwrap();
        assert_eq!(role.name, LOGISTICS_AGENT);
        assert!(role.grants("view_shipment"));
        assert!(role.grants("change_shipment"));
        assert!(!role.grants("delete_shipment"));
        assert_eq!(role.permissions[0].name.as_deref(), Some("Can view shipment"));
    }

    #[test]
    fn integer_primary_keys_are_accepted() {
        let json = serde_json::json!({
            "id": 3,
            "name": "Sales Agent",
            "permissions": [{ "id": 12, "codename": "add_sale" }]
        });

        let role: Role = serde_json::from_value(json).unwrap();
        assert_eq!(role.id, RoleId::from(3_i64));
        assert!(role.grants("add_sale"));
    }

    #[test]
    fn missing_permissions_field_means_none() {
        let json = serde_json::json!({ "id": RoleId::new(), "name": "Accountant" });
        let role: Role = serde_json::from_value(json).unwrap();
        assert!(role.permissions.is_empty());
    }

    #[test]
    fn grants_is_byte_exact() {
        let role = Role::new(SALES_AGENT).with_permissions([Permission::ViewSale]);
        assert!(role.grants("view_sale"));
        assert!(!role.grants("VIEW_SALE"));
        assert!(!role.grants("view_sale "));
    }

    #[test]
    fn only_exact_admin_name_is_admin() {
        assert!(Role::new("Admin").is_admin());
        assert!(!Role::new("admin").is_admin());
        assert!(!Role::new("Administrator").is_admin());
    }
}
