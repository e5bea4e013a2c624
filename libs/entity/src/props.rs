use serde::{Deserialize, Serialize};

use crate::block::BlockCollection;

/// Static props of the homepage, produced once per build.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Props {
    pub icon: String,
    pub logo: String,
    pub blocks: BlockCollection,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_desilialize() {
        // Arrange
        let text = json!({
            "icon": "b.svg",
            "logo": "a.png",
            "blocks": {
                "block_id": "id123",
                "last_edited_time": "T1",
                "results": [{"type": "paragraph", "paragraph": {"rich_text": []}}]
            }
        })
        .to_string();

        // Act
        let props = serde_json::from_str::<Props>(&text);

        // Assert
        let props = props.unwrap();
        assert_eq!(props.icon, "b.svg");
        assert_eq!(props.blocks.block_id, "id123");
        assert_eq!(props.blocks.results.len(), 1);
    }
}
