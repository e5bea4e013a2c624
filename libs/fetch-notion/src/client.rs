use std::time::Duration;

use async_trait::async_trait;
use entity::prelude::*;
use notion_client::endpoints::Client;
use serde_json::Value;

use crate::{block, page, FetchNotionError};

/// The two Notion API calls a [`crate::NotionSource`] is built on.
#[async_trait]
pub trait NotionApi: Send + Sync {
    async fn retrieve_page(
        &self,
        page_id: &str,
    ) -> Result<PageEntity, FetchNotionError>;

    /// All blocks under `block_id`, children inlined.
    async fn retrieve_blocks(
        &self,
        block_id: &str,
    ) -> Result<Vec<Value>, FetchNotionError>;
}

pub(crate) struct ClientApi {
    pub(crate) client: Client,
    pub(crate) pause: Duration,
}

#[async_trait]
impl NotionApi for ClientApi {
    async fn retrieve_page(
        &self,
        page_id: &str,
    ) -> Result<PageEntity, FetchNotionError> {
        page::retrieve(&self.client, page_id).await
    }

    async fn retrieve_blocks(
        &self,
        block_id: &str,
    ) -> Result<Vec<Value>, FetchNotionError> {
        block::fetch_all(&self.client, block_id, self.pause).await
    }
}
