use entity::prelude::*;
use fetch_notion::ContentSource;
use maud::{html, Markup};
use toml::{map::Map, Value};
use tracing::info;

use crate::{RenderContext, SiteError};

/// Names the Notion page rendered as the homepage.
pub const HOMEPAGE_ID: &str = "HOMEPAGE_ID";

pub fn homepage_id(secrets: &Map<String, Value>) -> Result<String, SiteError> {
    page_id_from(secrets, HOMEPAGE_ID)
}

fn page_id_from(
    secrets: &Map<String, Value>,
    key: &str,
) -> Result<String, SiteError> {
    util::secret(secrets, key)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SiteError::Config {
            message: format!("{} was not found", key),
        })
}

/// Build-time data phase.
///
/// The page is always fetched fresh. Its blocks are then fetched for the same
/// id and the page's own last edited time, so both reads see one revision.
pub async fn get_static_props<S: ContentSource + ?Sized>(
    source: &S,
    page_id: &str,
) -> Result<PropsEntity, SiteError> {
    let page = source
        .fetch_page(&FetchPageRequestEntity::force(page_id))
        .await?;

    let logo = page.cover.clone().unwrap_or_default();
    let Some(icon) = page.icon.clone().filter(|icon| !icon.is_empty()) else {
        return Err(SiteError::MissingIcon {
            page_id: page_id.to_string(),
        });
    };

    let blocks = source
        .fetch_blocks(&FetchBlocksRequestEntity {
            block_id: page_id.to_string(),
            last_edited_time: page.last_edited_time.clone(),
        })
        .await?;

    info!(
        task = "get static props",
        page_id,
        last_edited_time = page.last_edited_time,
        blocks = blocks.results.len(),
    );

    Ok(PropsEntity { icon, logo, blocks })
}

/// Render phase: the whole document for already fetched props.
pub fn render(context: &RenderContext, props: &PropsEntity) -> Markup {
    let site = &context.config.site;
    let footer = &context.config.footer;

    let head = html! {
        title { (site.title) }
        link rel="icon" type="image/svg+xml" href=(props.icon);
    };

    let body = html! {
        div class="box" {
            div class="layout" {
                header class="header" {
                    div class="logo" {
                        h1 { img src=(props.logo) width="200" height="200" alt=(site.logo_alt); }
                    }
                    div class="icon" {
                        img src=(props.icon) width="100" height="100" alt="Icon";
                    }
                }

                div class="page" {
                    (context.blocks(&props.blocks))
                }

                footer class="footer" {
                    "© " (context.year) " "
                    a href=(footer.owner_url) target="_blank" rel="noreferrer" { (footer.owner) }
                    " / "
                    (context.link.anchor(&footer.project_href, html! { (footer.project) }))
                    " / "
                    a href=(footer.issues_url) target="_blank" rel="noreferrer" { (footer.issues_label) }
                }
            }
        }
    };

    context.wrap(head, body)
}
