//! Which roles may open which back-office routes.

use std::collections::BTreeSet;

use tradedesk_auth::roles::{ACCOUNTANT, LOGISTICS_AGENT, SALES_AGENT};

use crate::guard::GuardConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteRule {
    prefix: String,
    allowed_roles: BTreeSet<String>,
}

/// Route prefix table. The longest matching prefix wins; routes no rule
/// matches are open to Admin only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    login_path: Option<String>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Role assignments of the standard back-office sections.
    pub fn back_office() -> Self {
        Self::new()
            .allow("/dashboard", [SALES_AGENT, LOGISTICS_AGENT, ACCOUNTANT])
            .allow("/shipments", [LOGISTICS_AGENT])
            .allow("/sales", [SALES_AGENT])
            .allow("/customers", [SALES_AGENT, ACCOUNTANT])
            .allow("/payments", [SALES_AGENT, ACCOUNTANT])
            .allow("/purchases", [LOGISTICS_AGENT, ACCOUNTANT])
            .allow("/suppliers", [LOGISTICS_AGENT, ACCOUNTANT])
            .allow("/ledger", [ACCOUNTANT])
            .allow("/currency", [SALES_AGENT, LOGISTICS_AGENT, ACCOUNTANT])
    }

    pub fn allow<I, S>(mut self, prefix: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefix = normalize(&prefix.into());
        let allowed_roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        match self.rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => rule.allowed_roles.extend(allowed_roles),
            None => self.rules.push(RouteRule {
                prefix,
                allowed_roles,
            }),
        }
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Roles allowed on `path` (besides Admin).
    pub fn allowed_roles(&self, path: &str) -> BTreeSet<String> {
        let path = normalize(path);
        self.rules
            .iter()
            .filter(|r| matches_prefix(&path, &r.prefix))
            .max_by_key(|r| r.prefix.len())
            .map(|r| r.allowed_roles.clone())
            .unwrap_or_default()
    }

    pub fn guard_config(&self, path: &str) -> GuardConfig {
        let config = GuardConfig::new(self.allowed_roles(path));
        match &self.login_path {
            Some(login) => config.with_login_path(login.clone()),
            None => config,
        }
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(roles: &[&str]) -> BTreeSet<String> {
        roles.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn nested_paths_inherit_section_roles() {
        let policy = RoutePolicy::back_office();
        assert_eq!(policy.allowed_roles("/shipments"), set(&[LOGISTICS_AGENT]));
        assert_eq!(policy.allowed_roles("/shipments/42/edit"), set(&[LOGISTICS_AGENT]));
        assert_eq!(policy.allowed_roles("/shipments/"), set(&[LOGISTICS_AGENT]));
    }

    #[test]
    fn prefix_must_end_at_segment_boundary() {
        let policy = RoutePolicy::back_office();
        assert!(policy.allowed_roles("/salesreport").is_empty());
        assert_eq!(policy.allowed_roles("/sales/new"), set(&[SALES_AGENT]));
    }

    #[test]
    fn longest_prefix_wins() {
        let policy = RoutePolicy::new()
            .allow("/ledger", [ACCOUNTANT])
            .allow("/ledger/costs", [LOGISTICS_AGENT]);
        assert_eq!(policy.allowed_roles("/ledger/costs/9"), set(&[LOGISTICS_AGENT]));
        assert_eq!(policy.allowed_roles("/ledger/entries"), set(&[ACCOUNTANT]));
    }

    #[test]
    fn unknown_routes_are_admin_only() {
        let policy = RoutePolicy::back_office();
        assert!(policy.allowed_roles("/users").is_empty());
        assert!(policy.allowed_roles("/").is_empty());
    }

    #[test]
    fn repeated_allow_merges_roles() {
        let policy = RoutePolicy::new()
            .allow("ledger/", [ACCOUNTANT])
            .allow("/ledger", [SALES_AGENT]);
        assert_eq!(policy.allowed_roles("/ledger"), set(&[ACCOUNTANT, SALES_AGENT]));
    }

    #[test]
    fn guard_config_carries_login_path() {
        let config = RoutePolicy::back_office()
            .with_login_path("/auth/login")
            .guard_config("/payments/3");
        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.allowed_roles, set(&[SALES_AGENT, ACCOUNTANT]));
    }
}
