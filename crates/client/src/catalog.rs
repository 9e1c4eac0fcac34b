use serde::Deserialize;

use tradedesk_auth::{CatalogReport, validate_catalog};

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    codename: String,
}

/// The registry comes either as a bare list or as a paginated page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    List(Vec<CatalogEntry>),
    Page { results: Vec<CatalogEntry> },
}

impl CatalogPayload {
    fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            CatalogPayload::List(entries) | CatalogPayload::Page { results: entries } => entries,
        }
    }
}

/// Check the client's permission catalog against the server registry.
///
/// Intended to run once at startup. Drift is logged and reported; it does not
/// fail the call.
pub async fn verify_permission_catalog(client: &ApiClient) -> Result<CatalogReport, ApiError> {
    let payload: CatalogPayload = client.get(&client.config().catalog_path).await?;
    let entries = payload.into_entries();
    let report = validate_catalog(entries.iter().map(|e| e.codename.as_str()));

    if report.is_in_sync() {
        tracing::info!(count = entries.len(), "permission catalog in sync");
    } else {
        tracing::warn!(
            missing_on_server = ?report.missing_on_server,
            unknown_to_client = ?report.unknown_to_client,
            "permission catalog drift; affected checks will deny"
        );
    }

    Ok(report)
}
