use std::path::{Path, PathBuf};

use entity::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::{response::IntoResponse, FetchNotionError};

/// JSON files under one directory, one per page and one per block collection.
#[derive(Clone, Debug)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub async fn read_page(
        &self,
        page_id: &str,
    ) -> Result<Option<PageEntity>, FetchNotionError> {
        self.read(&self.path("page", page_id)).await
    }

    pub async fn write_page(
        &self,
        page: &PageEntity,
    ) -> Result<(), FetchNotionError> {
        self.write(&self.path("page", &page.id), page).await
    }

    /// Returns the stored collection only if it was fetched for the same
    /// last edited time.
    pub async fn read_blocks(
        &self,
        request: &FetchBlocksRequestEntity,
    ) -> Result<Option<BlockCollectionEntity>, FetchNotionError> {
        let blocks: Option<BlockCollectionEntity> =
            self.read(&self.path("blocks", &request.block_id)).await?;

        Ok(blocks.filter(|blocks| blocks.answers(request)))
    }

    pub async fn write_blocks(
        &self,
        blocks: &BlockCollectionEntity,
    ) -> Result<(), FetchNotionError> {
        self.write(&self.path("blocks", &blocks.block_id), blocks)
            .await
    }

    /// Notion accepts ids with or without dashes, so both map to one file.
    fn path(&self, kind: &str, id: &str) -> PathBuf {
        let id: String =
            id.chars().filter(char::is_ascii_alphanumeric).collect();
        self.dir.join(format!("{}-{}.json", kind, id))
    }

    async fn read<T: DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Option<T>, FetchNotionError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(e) => {
                return Err(FetchNotionError::StdIoError {
                    source: e,
                    message: format!("failed to read {}", path.display()),
                })
            }
        };

        match serde_json::from_str::<T>(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(
                    task = "read cache",
                    path = %path.display(),
                    error = e.to_string(),
                );
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), FetchNotionError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .into_response("failed to create cache dir")?;

        let json = serde_json::to_string_pretty(value)
            .into_response("failed to serialize cache entry")?;

        tokio::fs::write(path, json)
            .await
            .into_response(&format!("failed to write {}", path.display()))
    }
}
