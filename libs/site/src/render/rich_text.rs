use maud::{html, Markup};
use serde_json::Value;

use super::{resolve_href, Link};

enum Target<'v> {
    Page(&'v str),
    External(&'v str),
}

pub(crate) fn rich_text(
    items: &Value,
    template: &str,
    link: &dyn Link,
) -> Markup {
    let Some(items) = items.as_array() else {
        return html! {};
    };

    html! {
        @for item in items {
            (span(item, template, link))
        }
    }
}

pub(crate) fn plain_text(items: &Value) -> String {
    items
        .as_array()
        .map(|items| items.iter().map(text_of).collect())
        .unwrap_or_default()
}

fn text_of(item: &Value) -> &str {
    item.get("plain_text")
        .and_then(Value::as_str)
        .or_else(|| item["text"]["content"].as_str())
        .unwrap_or_default()
}

fn span(item: &Value, template: &str, link: &dyn Link) -> Markup {
    let text = text_of(item);
    let annotations = &item["annotations"];
    let flag = |name: &str| annotations[name].as_bool().unwrap_or(false);

    let mut markup = if item["type"] == "equation" {
        let expression =
            item["equation"]["expression"].as_str().unwrap_or(text);
        html! { code class="equation" { (expression) } }
    } else {
        html! { (text) }
    };

    if flag("code") {
        markup = html! { code { (markup) } };
    }
    if flag("bold") {
        markup = html! { strong { (markup) } };
    }
    if flag("italic") {
        markup = html! { em { (markup) } };
    }
    if flag("strikethrough") {
        markup = html! { s { (markup) } };
    }
    if flag("underline") {
        markup = html! { u { (markup) } };
    }

    let color: String = annotations["color"]
        .as_str()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if !color.is_empty() && color != "default" {
        markup = html! { span class=(format!("color-{}", color)) { (markup) } };
    }

    match target(item) {
        Some(Target::Page(id)) => {
            link.anchor(&resolve_href(template, Some(text), id), markup)
        }
        Some(Target::External(url)) => html! {
            a href=(url) target="_blank" rel="noreferrer" { (markup) }
        },
        None => markup,
    }
}

fn target(item: &Value) -> Option<Target<'_>> {
    if item["type"] == "mention" && item["mention"]["type"] == "page" {
        return item["mention"]["page"]["id"].as_str().map(Target::Page);
    }

    let url = item["text"]["link"]["url"]
        .as_str()
        .or_else(|| item["href"].as_str())?;

    // Notion writes links to workspace pages as "/<page id>".
    match url.strip_prefix('/') {
        Some(path) if !path.is_empty() && !path.starts_with('/') => {
            let id = path.split(['#', '?']).next().unwrap_or(path);
            Some(Target::Page(id))
        }
        _ => Some(Target::External(url)),
    }
}
