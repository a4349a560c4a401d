use std::path::PathBuf;

use models::EntityKind;
use serde_json::Value;
use tracing::info;

use super::json_doc_store::JsonDocStore;
use crate::errors::ServiceError;

/// Untyped access to the entity files, keyed by entity name.
///
/// Backs the HTTP pass-through: bodies are checked against the entity's
/// typed shape but written verbatim, so fields the server does not know
/// about survive a round trip.
#[derive(Clone)]
pub struct RawDocStore {
    data_dir: PathBuf,
    pretty: bool,
}

impl RawDocStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P, pretty: bool) -> Self {
        Self { data_dir: data_dir.into(), pretty }
    }

    pub fn resolve(&self, name: &str) -> Result<EntityKind, ServiceError> {
        Ok(name.parse::<EntityKind>()?)
    }

    fn store(&self, kind: EntityKind) -> JsonDocStore<Value> {
        JsonDocStore::new(kind.name(), self.data_dir.join(kind.file_name()), kind.default_value())
            .with_pretty(self.pretty)
            .with_check(move |value| Ok(kind.validate(value)?))
    }

    pub async fn get(&self, name: &str) -> Result<Value, ServiceError> {
        let kind = self.resolve(name)?;
        self.store(kind).get().await
    }

    pub async fn save(&self, name: &str, body: Value) -> Result<(), ServiceError> {
        let kind = self.resolve(name)?;
        self.store(kind).save(&body).await?;
        info!(entity = %kind, "document replaced via pass-through");
        Ok(())
    }
}
