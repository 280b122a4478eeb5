use std::path::Path;

use careslot_core::{catalog::ProviderCatalog, models::provider::Provider};
use eyre::{Result, WrapErr};
use tracing::info;

/// Loads and validates the provider directory from a JSON array on disk.
pub async fn load_provider_catalog(path: impl AsRef<Path>) -> Result<ProviderCatalog> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("failed to read provider catalog {}", path.display()))?;

    let providers: Vec<Provider> = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("failed to parse provider catalog {}", path.display()))?;

    let catalog = ProviderCatalog::new(providers)
        .wrap_err_with(|| format!("invalid provider catalog {}", path.display()))?;

    info!(path = %path.display(), providers = catalog.len(), "loaded provider catalog");
    Ok(catalog)
}
