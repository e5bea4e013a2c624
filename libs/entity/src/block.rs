use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered top-level blocks of a page, children nested under `<type>.children`.
///
/// `results` holds Notion block objects in their wire format. Nothing but the
/// renderer looks inside them.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct BlockCollection {
    pub block_id: String,
    pub last_edited_time: String,
    pub results: Vec<Value>,
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct FetchBlocksRequest {
    pub block_id: String,
    pub last_edited_time: String,
}

impl BlockCollection {
    /// True when this collection was fetched for exactly this request.
    pub fn answers(&self, request: &FetchBlocksRequest) -> bool {
        self.block_id == request.block_id
            && self.last_edited_time == request.last_edited_time
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_answers() {
        let blocks = BlockCollection {
            block_id: "id123".to_string(),
            last_edited_time: "T1".to_string(),
            results: vec![json!({"type": "divider", "divider": {}})],
        };

        assert!(blocks.answers(&FetchBlocksRequest {
            block_id: "id123".to_string(),
            last_edited_time: "T1".to_string(),
        }));
        assert!(!blocks.answers(&FetchBlocksRequest {
            block_id: "id123".to_string(),
            last_edited_time: "T2".to_string(),
        }));
        assert!(!blocks.answers(&FetchBlocksRequest {
            block_id: "other".to_string(),
            last_edited_time: "T1".to_string(),
        }));
    }
}
