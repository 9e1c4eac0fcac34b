//! `tradedesk-console` — headless session check against a TradeDesk API.
//!
//! Resolves the session for `TRADEDESK_AUTH_TOKEN`, verifies the permission
//! catalog, then prints the guard decision for each route given on the
//! command line (default: every back-office section) as one JSON line.

use std::sync::Arc;

use anyhow::Context;

use tradedesk_client::{ApiClient, ClientConfig, hydrate_session, verify_permission_catalog};
use tradedesk_session::{RecordingNavigator, RoutePolicy, RouteGuard, SessionCredential, SessionStore};

const DEFAULT_ROUTES: &[&str] = &[
    "/dashboard",
    "/shipments",
    "/sales",
    "/customers",
    "/payments",
    "/purchases",
    "/suppliers",
    "/ledger",
    "/currency",
    "/users",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tradedesk_observability::init();

    let config = ClientConfig::from_env().context("loading client configuration")?;
    tracing::info!(api_url = %config.api_url, "starting tradedesk console");

    let store = SessionStore::new();
    match std::env::var("TRADEDESK_AUTH_TOKEN") {
        Ok(token) => {
            let credential = SessionCredential::new(token).context("TRADEDESK_AUTH_TOKEN")?;
            store.rotate_credential(Some(credential));
        }
        Err(_) => tracing::info!("no TRADEDESK_AUTH_TOKEN set; requests go out unauthenticated"),
    }

    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::authenticated(config.clone(), store.handle(), Arc::clone(&navigator))?;

    if let Err(e) = hydrate_session(&client, &store).await {
        tracing::warn!(error = %e, "session not resolved");
    }

    match verify_permission_catalog(&client).await {
        Ok(report) if !report.is_in_sync() => {
            println!("{}", serde_json::json!({ "catalog": report }));
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "permission catalog not verified"),
    }

    let routes: Vec<String> = std::env::args().skip(1).collect();
    let routes: Vec<String> = if routes.is_empty() {
        DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect()
    } else {
        routes
    };

    let policy = RoutePolicy::back_office().with_login_path(config.login_path.clone());
    let session = store.handle();
    for route in routes {
        let mut guard = RouteGuard::new(policy.guard_config(&route), Arc::clone(&navigator));
        let outcome = guard.render_session(&session);
        println!("{}", serde_json::json!({ "route": route, "decision": outcome }));
    }

    for navigation in navigator.history() {
        tracing::debug!(?navigation, "recorded navigation");
    }

    Ok(())
}
