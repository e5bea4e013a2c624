use entity::prelude::*;
use notion_client::endpoints::Client;
use serde_json::Value;

use crate::{response::IntoResponse, FetchNotionError};

const TWEMOJI_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/jdecked/twemoji@latest/assets/svg";

pub(crate) async fn retrieve(
    client: &Client,
    page_id: &str,
) -> Result<PageEntity, FetchNotionError> {
    let page = client
        .pages
        .retrieve_a_page(page_id, None)
        .await
        .into_response(&format!("failed to retrieve page {}", page_id))?;

    let json = serde_json::to_value(&page)
        .into_response("failed to serialize page")?;

    page_from_json(&json)
}

/// Reduces a Notion page object to the fields the homepage uses.
pub fn page_from_json(json: &Value) -> Result<PageEntity, FetchNotionError> {
    let id = json
        .get("id")
        .and_then(Value::as_str)
        .into_response("page has no id")?
        .to_string();

    let last_edited_time = json
        .get("last_edited_time")
        .and_then(Value::as_str)
        .into_response("page has no last_edited_time")?
        .to_string();

    Ok(PageEntity {
        id,
        cover: json.get("cover").and_then(image_url),
        icon: json.get("icon").and_then(image_url),
        last_edited_time,
    })
}

fn image_url(value: &Value) -> Option<String> {
    if let Some(emoji) = value.get("emoji").and_then(Value::as_str) {
        return Some(twemoji_url(emoji));
    }

    let body = match value.get("type").and_then(Value::as_str) {
        Some(kind) => value.get(kind),
        None => ["external", "file", "custom_emoji"]
            .iter()
            .find_map(|kind| value.get(*kind)),
    }?;

    body.get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// SVG image of an emoji on the Twemoji CDN.
///
/// Variation selector 16 is dropped unless the emoji is a ZWJ sequence,
/// which is how Twemoji names its files.
pub fn twemoji_url(emoji: &str) -> String {
    let zwj = emoji.contains('\u{200d}');
    let codepoints = emoji
        .chars()
        .filter(|c| zwj || *c != '\u{fe0f}')
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("-");

    format!("{}/{}.svg", TWEMOJI_BASE_URL, codepoints)
}

#[cfg(test)]
mod test {
    use std::fs;

    use serde_json::{json, Value};
    use util::workspace_dir;

    use super::*;

    #[test]
    fn test_desilialize() {
        let dir = workspace_dir();

        // Arrange
        let text = fs::read_to_string(
            dir.join("libs/fetch-notion/src/page/test.json"),
        );
        let json = serde_json::from_str::<Value>(&text.unwrap()).unwrap();

        // Act
        let page = page_from_json(&json);

        // Assert
        let page = page.unwrap();
        assert_eq!(page.id, "4b1a7c0e-5d1f-4a2e-9c3b-0d8e2f6a7b91");
        assert_eq!(page.last_edited_time, "2024-05-12T10:41:00.000Z");
        assert_eq!(
            page.cover.as_deref(),
            Some("https://example.com/octopass-logo.png")
        );
        assert_eq!(
            page.icon.as_deref(),
            Some("https://s3.us-west-2.amazonaws.com/secure.notion-static.com/icon.svg")
        );
    }

    #[test]
    fn test_emoji_icon_without_cover() {
        let json = json!({
            "id": "id123",
            "last_edited_time": "T1",
            "cover": null,
            "icon": {"type": "emoji", "emoji": "🐙"}
        });

        let page = page_from_json(&json).unwrap();

        assert_eq!(page.cover, None);
        assert_eq!(page.icon, Some(format!("{}/1f419.svg", TWEMOJI_BASE_URL)));
    }

    #[test]
    fn test_missing_icon() {
        let json = json!({"id": "id123", "last_edited_time": "T1"});

        let page = page_from_json(&json).unwrap();

        assert_eq!(page.icon, None);
    }

    #[test]
    fn test_missing_last_edited_time() {
        let json = json!({"id": "id123"});

        let result = page_from_json(&json);

        assert!(matches!(result, Err(FetchNotionError::Option { .. })));
    }

    #[test]
    fn test_twemoji_url() {
        assert!(twemoji_url("\u{2764}\u{fe0f}").ends_with("/2764.svg"));
        assert!(twemoji_url("👨\u{200d}💻").ends_with("/1f468-200d-1f4bb.svg"));
    }
}
