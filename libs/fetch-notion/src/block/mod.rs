use std::time::Duration;

use async_recursion::async_recursion;
use notion_client::endpoints::Client;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{response::IntoResponse, FetchNotionError};

/// Block types whose children belong to another page.
const DETACHED_TYPES: [&str; 2] = ["child_page", "child_database"];

pub(crate) async fn fetch_all(
    client: &Client,
    block_id: &str,
    pause: Duration,
) -> Result<Vec<Value>, FetchNotionError> {
    info!(task = "fetch blocks", block_id);

    let _children = get_children(client, block_id, pause).await?;

    let mut children = vec![];
    for _child in _children {
        let child = scan_block(client, _child, pause).await?;
        children.push(child);
    }

    Ok(children)
}

#[async_recursion]
async fn scan_block(
    client: &Client,
    mut block: Value,
    pause: Duration,
) -> Result<Value, FetchNotionError> {
    if !needs_children(&block) {
        return Ok(block);
    }
    let Some(id) = block.get("id").and_then(Value::as_str).map(str::to_string)
    else {
        return Ok(block);
    };

    sleep(pause).await;
    let _children = get_children(client, &id, pause).await?;

    let mut children = vec![];
    for _child in _children {
        let child = scan_block(client, _child, pause).await?;
        children.push(child);
    }

    attach_children(&mut block, children);

    Ok(block)
}

async fn get_children(
    client: &Client,
    parent_block_id: &str,
    pause: Duration,
) -> Result<Vec<Value>, FetchNotionError> {
    let mut next_cursor: Option<String> = None;
    let mut blocks = vec![];
    loop {
        let response = client
            .blocks
            .retrieve_block_children(
                parent_block_id,
                next_cursor.as_deref(),
                None,
            )
            .await
            .into_response(&format!(
                "failed to retrieve children of {}",
                parent_block_id
            ))?;

        let has_more = response.has_more;
        next_cursor = response.next_cursor.clone();
        for block in response.results {
            blocks.push(
                serde_json::to_value(&block)
                    .into_response("failed to serialize block")?,
            );
        }

        debug!(
            task = "retrieve block children",
            parent_block_id,
            count = blocks.len(),
            has_more,
        );

        if !has_more || next_cursor.is_none() {
            break;
        }

        sleep(pause).await;
    }

    Ok(blocks)
}

fn block_type(block: &Value) -> Option<&str> {
    block.get("type").and_then(Value::as_str)
}

fn needs_children(block: &Value) -> bool {
    let has_children = block
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    has_children
        && !block_type(block).is_some_and(|t| DETACHED_TYPES.contains(&t))
}

/// Stores `children` under `<type>.children`, where renderers expect them.
fn attach_children(block: &mut Value, children: Vec<Value>) {
    let Some(kind) = block_type(block).map(str::to_string) else {
        return;
    };
    let Value::Object(object) = block else {
        return;
    };

    if let Some(Value::Object(body)) = object.get_mut(&kind) {
        body.insert("children".to_string(), Value::Array(children));
        return;
    }
    object.insert(kind, json!({ "children": children }));
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_needs_children() {
        let toggle = json!({
            "id": "a",
            "type": "toggle",
            "has_children": true,
            "toggle": {}
        });
        let leaf =
            json!({"id": "b", "type": "paragraph", "has_children": false});
        let child_page =
            json!({"id": "c", "type": "child_page", "has_children": true});
        let unknown = json!({"id": "d", "type": "paragraph"});

        assert!(needs_children(&toggle));
        assert!(!needs_children(&leaf));
        assert!(!needs_children(&child_page));
        assert!(!needs_children(&unknown));
    }

    #[test]
    fn test_attach_children() {
        // Arrange
        let mut block = json!({
            "id": "a",
            "type": "bulleted_list_item",
            "bulleted_list_item": {"rich_text": []}
        });
        let children = vec![json!({"id": "b", "type": "paragraph"})];

        // Act
        attach_children(&mut block, children.clone());

        // Assert
        assert_eq!(
            block["bulleted_list_item"]["children"],
            Value::Array(children)
        );
        assert_eq!(block["bulleted_list_item"]["rich_text"], json!([]));
    }

    #[test]
    fn test_attach_children_without_body() {
        let mut block = json!({"id": "a", "type": "column"});

        attach_children(&mut block, vec![json!({"id": "b"})]);

        assert_eq!(block["column"]["children"][0]["id"], "b");
    }
}
