use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use entity::prelude::*;

use crate::{ContentSource, FetchNotionError};

/// Serves fixed pages and block collections from memory.
///
/// Block collections are keyed by block id and last edited time, so a
/// request carrying a stale timestamp is answered with `NotFound`.
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: HashMap<String, PageEntity>,
    blocks: HashMap<(String, String), BlockCollectionEntity>,
    requests: Mutex<Vec<FetchBlocksRequestEntity>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: PageEntity) -> Self {
        self.pages.insert(page.id.clone(), page);
        self
    }

    pub fn with_blocks(mut self, blocks: BlockCollectionEntity) -> Self {
        self.blocks.insert(
            (blocks.block_id.clone(), blocks.last_edited_time.clone()),
            blocks,
        );
        self
    }

    /// Blocks requests received so far, in order.
    pub fn blocks_requests(&self) -> Vec<FetchBlocksRequestEntity> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch_page(
        &self,
        request: &FetchPageRequestEntity,
    ) -> Result<PageEntity, FetchNotionError> {
        self.pages
            .get(&request.page_id)
            .cloned()
            .ok_or_else(|| FetchNotionError::NotFound {
                id: request.page_id.clone(),
            })
    }

    async fn fetch_blocks(
        &self,
        request: &FetchBlocksRequestEntity,
    ) -> Result<BlockCollectionEntity, FetchNotionError> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        self.blocks
            .get(&(request.block_id.clone(), request.last_edited_time.clone()))
            .cloned()
            .ok_or_else(|| FetchNotionError::NotFound {
                id: request.block_id.clone(),
            })
    }
}
