//! Notion blocks to HTML.
//!
//! Blocks arrive in Notion's wire format with nested children inlined under
//! `<type>.children`. Links to other Notion pages go through the site's link
//! template and the injected [`Link`] component, so they resolve to this
//! site's routes instead of notion.so.

use maud::{html, Markup, Render};
use serde_json::Value;
use tracing::debug;

mod rich_text;

use rich_text::{plain_text, rich_text};

const LINKED_PAGE_LABEL: &str = "Linked page";

/// Renders an anchor for an internal route.
pub trait Link: Send + Sync {
    fn anchor(&self, href: &str, body: Markup) -> Markup;
}

/// Plain `<a href>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anchor;

impl Link for Anchor {
    fn anchor(&self, href: &str, body: Markup) -> Markup {
        html! { a href=(href) { (body) } }
    }
}

pub struct Blocks<'a> {
    blocks: &'a [Value],
    href: &'a str,
    link: &'a dyn Link,
}

enum Group<'v> {
    Bulleted(Vec<&'v Value>),
    Numbered(Vec<&'v Value>),
    Single(&'v Value),
}

impl<'a> Blocks<'a> {
    pub fn new(blocks: &'a [Value], href: &'a str, link: &'a dyn Link) -> Self {
        Self {
            blocks,
            href,
            link,
        }
    }

    fn list(&self, blocks: &[Value]) -> Markup {
        html! {
            @for group in group(blocks) {
                @match group {
                    Group::Bulleted(items) => {
                        ul { @for item in items { (self.block(item)) } }
                    },
                    Group::Numbered(items) => {
                        ol { @for item in items { (self.block(item)) } }
                    },
                    Group::Single(block) => {
                        (self.block(block))
                    },
                }
            }
        }
    }

    fn indent(&self, children: &[Value]) -> Markup {
        html! {
            @if !children.is_empty() {
                div class="indent" { (self.list(children)) }
            }
        }
    }

    fn rich(&self, items: &Value) -> Markup {
        rich_text(items, self.href, self.link)
    }

    fn block(&self, block: &Value) -> Markup {
        let Some(kind) = block.get("type").and_then(Value::as_str) else {
            return html! {};
        };
        let body = &block[kind];
        let text = self.rich(&body["rich_text"]);
        let children = children_of(body);

        match kind {
            "paragraph" => html! {
                p { (text) }
                (self.indent(children))
            },
            "heading_1" | "heading_2" | "heading_3" => {
                let heading = match kind {
                    "heading_1" => html! { h2 { (text) } },
                    "heading_2" => html! { h3 { (text) } },
                    _ => html! { h4 { (text) } },
                };
                if body["is_toggleable"].as_bool().unwrap_or(false) {
                    html! {
                        details {
                            summary { (heading) }
                            (self.indent(children))
                        }
                    }
                } else {
                    heading
                }
            }
            "bulleted_list_item" | "numbered_list_item" => html! {
                li {
                    (text)
                    @if !children.is_empty() { (self.list(children)) }
                }
            },
            "to_do" => {
                let checked = body["checked"].as_bool().unwrap_or(false);
                html! {
                    div class=(if checked { "todo checked" } else { "todo" }) {
                        input type="checkbox" disabled checked[checked];
                        span { (text) }
                    }
                    (self.indent(children))
                }
            }
            "toggle" => html! {
                details {
                    summary { (text) }
                    (self.indent(children))
                }
            },
            "quote" => html! {
                blockquote {
                    (text)
                    (self.list(children))
                }
            },
            "callout" => html! {
                div class="callout" {
                    (icon(&body["icon"]))
                    div {
                        (text)
                        (self.list(children))
                    }
                }
            },
            "code" => html! {
                pre class="code" data-language=(body["language"].as_str().unwrap_or("plain text")) {
                    code { (plain_text(&body["rich_text"])) }
                }
                @if !is_empty(&body["caption"]) {
                    p class="caption" { (self.rich(&body["caption"])) }
                }
            },
            "divider" => html! { hr; },
            "image" => html! {
                figure {
                    img src=(file_url(body).unwrap_or_default()) alt=(plain_text(&body["caption"]));
                    @if !is_empty(&body["caption"]) {
                        figcaption { (self.rich(&body["caption"])) }
                    }
                }
            },
            "video" if body["type"] == "file" => html! {
                figure {
                    video src=(file_url(body).unwrap_or_default()) controls {}
                }
            },
            "bookmark" | "embed" | "link_preview" | "video" | "file" | "pdf"
            | "audio" => {
                let url = body["url"]
                    .as_str()
                    .or_else(|| file_url(body))
                    .unwrap_or_default();
                let label = if is_empty(&body["caption"]) {
                    html! { (url) }
                } else {
                    self.rich(&body["caption"])
                };
                html! {
                    a class=(kind) href=(url) target="_blank" rel="noreferrer" { (label) }
                }
            }
            "child_page" => {
                let title = body["title"].as_str().unwrap_or_default();
                let id = block["id"].as_str().unwrap_or_default();
                let href = resolve_href(self.href, Some(title), id);
                html! {
                    div class="child-page" {
                        (self.link.anchor(&href, html! { (title) }))
                    }
                }
            }
            "link_to_page" => {
                // the API only returns the target's id, not its title
                let title = body["title"].as_str();
                let id = body["page_id"]
                    .as_str()
                    .or(body["database_id"].as_str())
                    .unwrap_or_default();
                let href = resolve_href(self.href, title, id);
                let label = title.unwrap_or(LINKED_PAGE_LABEL);
                html! {
                    div class="child-page" {
                        (self.link.anchor(&href, html! { (label) }))
                    }
                }
            }
            "column_list" => html! {
                div class="columns" {
                    @for column in children {
                        div class="column" { (self.list(children_of(&column["column"]))) }
                    }
                }
            },
            "column" => html! {
                div class="column" { (self.list(children)) }
            },
            "table" => {
                let column_header =
                    body["has_column_header"].as_bool().unwrap_or(false);
                let row_header = body["has_row_header"].as_bool().unwrap_or(false);
                html! {
                    table {
                        tbody {
                            @for (i, row) in children.iter().enumerate() {
                                tr {
                                    @for (j, cell) in cells(row).iter().enumerate() {
                                        @if (column_header && i == 0) || (row_header && j == 0) {
                                            th { (self.rich(cell)) }
                                        } @else {
                                            td { (self.rich(cell)) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            "equation" => html! {
                div class="equation" {
                    code { (body["expression"].as_str().unwrap_or_default()) }
                }
            },
            "synced_block" | "template" => self.list(children),
            _ => {
                debug!(task = "render block", kind, "unsupported block type");
                html! {}
            }
        }
    }
}

impl Render for Blocks<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="blocks" { (self.list(self.blocks)) }
        }
    }
}

fn group(blocks: &[Value]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = vec![];
    for block in blocks {
        let kind = block["type"].as_str();
        let extended = match (kind, groups.last_mut()) {
            (Some("bulleted_list_item"), Some(Group::Bulleted(items)))
            | (Some("numbered_list_item"), Some(Group::Numbered(items))) => {
                items.push(block);
                true
            }
            _ => false,
        };
        if extended {
            continue;
        }

        groups.push(match kind {
            Some("bulleted_list_item") => Group::Bulleted(vec![block]),
            Some("numbered_list_item") => Group::Numbered(vec![block]),
            _ => Group::Single(block),
        });
    }

    groups
}

fn children_of(body: &Value) -> &[Value] {
    body.get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn cells(row: &Value) -> &[Value] {
    row["table_row"]["cells"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn is_empty(items: &Value) -> bool {
    items.as_array().map_or(true, Vec::is_empty)
}

/// URL of an `external` or `file` object.
fn file_url(body: &Value) -> Option<&str> {
    let kind = body["type"].as_str()?;
    body[kind]["url"].as_str()
}

fn icon(icon: &Value) -> Markup {
    if let Some(emoji) = icon["emoji"].as_str() {
        return html! { span class="callout-icon" { (emoji) } };
    }
    match file_url(icon) {
        Some(url) => html! { span class="callout-icon" { img src=(url) alt=""; } },
        None => html! {},
    }
}

/// Fills the link template for a Notion page.
///
/// `[title]` becomes the slug of `title`, or the id when there is no usable
/// title. `[id]` becomes the page id without dashes.
pub fn resolve_href(template: &str, title: Option<&str>, id: &str) -> String {
    let id = id.replace('-', "");
    let slug = title
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| id.clone());

    template.replace("[title]", &slug).replace("[id]", &id)
}

pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod test {
    use maud::html;
    use serde_json::json;

    use super::*;

    fn paragraph(text: &str) -> Value {
        json!({
            "type": "paragraph",
            "paragraph": {"rich_text": [{"type": "text", "plain_text": text}]}
        })
    }

    fn item(kind: &str, text: &str) -> Value {
        json!({
            "type": kind,
            kind: {"rich_text": [{"type": "text", "plain_text": text}]}
        })
    }

    fn render(blocks: &[Value]) -> String {
        Blocks::new(blocks, "/[title]", &Anchor).render().into_string()
    }

    #[test]
    fn test_groups_consecutive_list_items() {
        // Arrange
        let blocks = vec![
            item("bulleted_list_item", "a"),
            item("bulleted_list_item", "b"),
            paragraph("between"),
            item("numbered_list_item", "one"),
            item("numbered_list_item", "two"),
            item("bulleted_list_item", "c"),
        ];

        // Act
        let html = render(&blocks);

        // Assert
        assert_eq!(
            html,
            "<div class=\"blocks\">\
             <ul><li>a</li><li>b</li></ul>\
             <p>between</p>\
             <ol><li>one</li><li>two</li></ol>\
             <ul><li>c</li></ul>\
             </div>"
        );
    }

    #[test]
    fn test_nested_children() {
        let blocks = vec![json!({
            "type": "toggle",
            "toggle": {
                "rich_text": [{"plain_text": "More"}],
                "children": [
                    {"type": "bulleted_list_item", "bulleted_list_item": {
                        "rich_text": [{"plain_text": "outer"}],
                        "children": [{"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"plain_text": "inner"}]}}]
                    }}
                ]
            }
        })];

        let html = render(&blocks);

        assert!(html.contains(
            "<details><summary>More</summary><div class=\"indent\"><ul><li>outer<ul><li>inner</li></ul></li></ul></div></details>"
        ));
    }

    #[test]
    fn test_code_and_divider() {
        let blocks = vec![
            json!({"type": "code", "code": {"language": "rust", "rich_text": [{"plain_text": "let a = 1 < 2;"}], "caption": []}}),
            json!({"type": "divider", "divider": {}}),
        ];

        let html = render(&blocks);

        assert!(html.contains(
            "<pre class=\"code\" data-language=\"rust\"><code>let a = 1 &lt; 2;</code></pre><hr>"
        ));
    }

    #[test]
    fn test_to_do() {
        let blocks = vec![json!({
            "type": "to_do",
            "to_do": {"checked": true, "rich_text": [{"plain_text": "done"}]}
        })];

        let html = render(&blocks);

        assert!(html.contains(
            "<div class=\"todo checked\"><input type=\"checkbox\" disabled checked><span>done</span></div>"
        ));
    }

    #[test]
    fn test_image() {
        let blocks = vec![json!({
            "type": "image",
            "image": {"type": "external", "external": {"url": "https://example.com/a.png"}, "caption": []}
        })];

        let html = render(&blocks);

        assert!(html.contains(
            "<figure><img src=\"https://example.com/a.png\" alt=\"\"></figure>"
        ));
    }

    #[test]
    fn test_table_with_column_header() {
        let blocks = vec![json!({
            "type": "table",
            "table": {
                "has_column_header": true,
                "has_row_header": false,
                "children": [
                    {"type": "table_row", "table_row": {"cells": [[{"plain_text": "key"}], [{"plain_text": "value"}]]}},
                    {"type": "table_row", "table_row": {"cells": [[{"plain_text": "a"}], [{"plain_text": "1"}]]}}
                ]
            }
        })];

        let html = render(&blocks);

        assert!(html.contains(
            "<table><tbody><tr><th>key</th><th>value</th></tr><tr><td>a</td><td>1</td></tr></tbody></table>"
        ));
    }

    #[test]
    fn test_child_page_goes_through_link() {
        struct Prefetch;
        impl Link for Prefetch {
            fn anchor(&self, href: &str, body: Markup) -> Markup {
                html! { a href=(href) data-prefetch="true" { (body) } }
            }
        }
        let blocks = vec![json!({
            "id": "0f1e-2d3c",
            "type": "child_page",
            "child_page": {"title": "Getting Started"}
        })];

        let html = Blocks::new(&blocks, "/[title]", &Prefetch)
            .render()
            .into_string();

        assert!(html.contains(
            "<a href=\"/getting-started\" data-prefetch=\"true\">Getting Started</a>"
        ));
    }

    #[test]
    fn test_link_to_page_has_readable_label() {
        let blocks = vec![json!({
            "id": "0f1e-2d3c",
            "type": "link_to_page",
            "link_to_page": {"type": "page_id", "page_id": "aa-bb"}
        })];

        let html = render(&blocks);

        assert!(html.contains(
            "<div class=\"child-page\"><a href=\"/aabb\">Linked page</a></div>"
        ));
    }

    #[test]
    fn test_unknown_block_renders_nothing() {
        let blocks = vec![json!({"type": "breadcrumb", "breadcrumb": {}})];

        assert_eq!(render(&blocks), "<div class=\"blocks\"></div>");
    }

    #[test]
    fn test_resolve_href() {
        assert_eq!(
            resolve_href("/[title]", Some("Hello, World!"), "aa-bb"),
            "/hello-world"
        );
        assert_eq!(resolve_href("/[title]", None, "aa-bb"), "/aabb");
        assert_eq!(resolve_href("/p/[id]", Some("x"), "aa-bb"), "/p/aabb");
        assert_eq!(resolve_href("/[title]", Some("!!!"), "aa-bb"), "/aabb");
    }
}
