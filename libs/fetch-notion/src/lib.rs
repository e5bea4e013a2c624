use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use entity::prelude::*;
use notion_client::{endpoints::Client, NotionClientError};
use toml::{map::Map, Value};
use tracing::info;

mod block;
mod cache;
mod client;
mod memory;
mod page;
mod response;

pub use cache::Cache;
pub use client::NotionApi;
pub use memory::MemorySource;
pub use page::{page_from_json, twemoji_url};

use client::ClientApi;
use response::IntoResponse;

#[derive(Debug, thiserror::Error)]
pub enum FetchNotionError {
    #[error("{message}: {source}")]
    StdIoError {
        source: std::io::Error,
        message: String,
    },
    #[error("{message}: {source}")]
    SerdeJsonError {
        source: serde_json::Error,
        message: String,
    },
    #[error("{message}: {source}")]
    NotionClientError {
        source: Box<NotionClientError>,
        message: String,
    },
    #[error("{message}")]
    Option { message: String },
    #[error("{id} was not found")]
    NotFound { id: String },
}

/// Where page and block content comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(
        &self,
        request: &FetchPageRequestEntity,
    ) -> Result<PageEntity, FetchNotionError>;

    async fn fetch_blocks(
        &self,
        request: &FetchBlocksRequestEntity,
    ) -> Result<BlockCollectionEntity, FetchNotionError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub pause_millis: u64,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pause_millis: 350,
            cache_dir: None,
        }
    }
}

pub fn init_config(
    config: &Map<String, Value>,
) -> Result<Config, FetchNotionError> {
    let Some(notion) = config.get("notion") else {
        return Ok(Config::default());
    };

    let pause_millis = match notion.get("pause_millis") {
        Some(value) => value
            .as_integer()
            .filter(|millis| *millis >= 0)
            .into_response("failed to parse pause_millis config")?
            as u64,
        None => Config::default().pause_millis,
    };

    let cache_dir = match notion.get("cache_dir") {
        Some(value) => Some(PathBuf::from(
            value
                .as_str()
                .into_response("failed to parse cache_dir config")?,
        )),
        None => None,
    };

    Ok(Config {
        pause_millis,
        cache_dir,
    })
}

/// Notion API backed [`ContentSource`], with an optional on-disk cache.
pub struct NotionSource {
    api: Box<dyn NotionApi>,
    cache: Option<Cache>,
}

impl NotionSource {
    pub fn new(
        token: String,
        config: Config,
    ) -> Result<Self, FetchNotionError> {
        let client =
            Client::new(token).map_err(|e| FetchNotionError::Option {
                message: format!("failed to build notion client: {}", e),
            })?;
        let api = ClientApi {
            client,
            pause: Duration::from_millis(config.pause_millis),
        };

        Ok(Self::with_api(api, config.cache_dir.map(Cache::new)))
    }

    pub fn with_api(
        api: impl NotionApi + 'static,
        cache: Option<Cache>,
    ) -> Self {
        Self {
            api: Box::new(api),
            cache,
        }
    }
}

#[async_trait]
impl ContentSource for NotionSource {
    async fn fetch_page(
        &self,
        request: &FetchPageRequestEntity,
    ) -> Result<PageEntity, FetchNotionError> {
        if let (Some(cache), LastEditedTimeEntity::Known(last_edited_time)) =
            (&self.cache, &request.last_edited_time)
        {
            if let Some(page) = cache.read_page(&request.page_id).await? {
                if &page.last_edited_time == last_edited_time {
                    info!(
                        task = "fetch page",
                        page_id = page.id,
                        cache = "hit"
                    );
                    return Ok(page);
                }
            }
        }

        let page = self.api.retrieve_page(&request.page_id).await?;
        info!(
            task = "fetch page",
            page_id = page.id,
            last_edited_time = page.last_edited_time,
        );

        if let Some(cache) = &self.cache {
            cache.write_page(&page).await?;
        }

        Ok(page)
    }

    async fn fetch_blocks(
        &self,
        request: &FetchBlocksRequestEntity,
    ) -> Result<BlockCollectionEntity, FetchNotionError> {
        if let Some(cache) = &self.cache {
            if let Some(blocks) = cache.read_blocks(request).await? {
                info!(
                    task = "fetch blocks",
                    block_id = request.block_id,
                    cache = "hit"
                );
                return Ok(blocks);
            }
        }

        let results = self.api.retrieve_blocks(&request.block_id).await?;
        let blocks = BlockCollectionEntity {
            block_id: request.block_id.clone(),
            last_edited_time: request.last_edited_time.clone(),
            results,
        };

        if let Some(cache) = &self.cache {
            cache.write_blocks(&blocks).await?;
        }

        Ok(blocks)
    }
}
