use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, warn};
use quiz_core::model::{QuestionSet, QuestionSetId};

use crate::repository::{QuestionSetEntry, QuestionSetRepository, StorageError};

const EXTENSION: &str = "json";

/// Question sets stored as `<dir>/<id>.json` documents.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    dir: PathBuf,
}

impl JsonDirectorySource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &QuestionSetId) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", id.as_str()))
    }
}

fn parse_set(raw: &str) -> Result<QuestionSet, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl QuestionSetRepository for JsonDirectorySource {
    async fn load_set(&self, id: &QuestionSetId) -> Result<QuestionSet, StorageError> {
        let path = self.path_for(id);
        debug!("reading question set from {}", path.display());
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Connection(e.to_string()),
            })?;
        parse_set(&raw)
    }

    async fn list_sets(&self) -> Result<Vec<QuestionSetEntry>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Connection(e.to_string())),
        };

        let mut out = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| QuestionSetId::new(stem).ok())
            else {
                continue;
            };

            // A broken file still shows up in the catalog; loading it reports the error.
            let title = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => parse_set(&raw).ok().and_then(|set| set.title),
                Err(e) => {
                    warn!("cannot read {}: {e}", path.display());
                    None
                }
            };
            out.push(QuestionSetEntry::new(id, title.as_deref()));
        }

        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }
}
