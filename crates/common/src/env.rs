//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists and is writable at startup.

use std::path::Path;
use tracing::{info, warn};

/// Create `data_dir` if missing; warn when it is read-only, since every
/// save would then fail.
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;

    let meta = tokio::fs::metadata(data_dir).await?;
    if meta.permissions().readonly() {
        warn!(%data_dir, "data directory is read-only; saves will fail");
    } else {
        info!(data_dir = %Path::new(data_dir).display(), "data directory ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_env_creates_nested_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir()
            .join(format!("repairshop_env_{}", uuid::Uuid::new_v4()))
            .join("nested");
        let dir_str = dir.to_string_lossy().to_string();
        ensure_env(&dir_str).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(dir.parent().unwrap_or(&dir)).await;
        Ok(())
    }
}
