use std::path::PathBuf;

use fetch_notion::FetchNotionError;
use maud::Markup;
use serde::Deserialize;
use toml::{map::Map, Value};

pub mod export;
pub mod home;
pub mod render;
mod response;
pub mod shell;

pub use export::{export, ExportReport};
pub use render::{Anchor, Blocks, Link};
pub use shell::Shell;

use response::IntoResponse;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("configuration error: {message}")]
    Config { message: String },
    #[error("page {page_id} has no icon; set an icon on the page in Notion")]
    MissingIcon { page_id: String },
    #[error("failed to fetch content: {0}")]
    Fetch(#[from] FetchNotionError),
    #[error("{message}: {source}")]
    TomlDeError {
        source: toml::de::Error,
        message: String,
    },
    #[error("{message}: {source}")]
    SerdeJsonError {
        source: serde_json::Error,
        message: String,
    },
    #[error("{message}: {source}")]
    StdIoError {
        source: std::io::Error,
        message: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: Site,
    pub font: Font,
    pub styles: Styles,
    pub footer: Footer,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Site {
    pub title: String,
    pub logo_alt: String,
    pub out_dir: PathBuf,
    /// Href pattern for links to other Notion pages; `[title]` and `[id]`
    /// are substituted.
    pub link_template: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: "Warp".to_string(),
            logo_alt: "Octopass".to_string(),
            out_dir: PathBuf::from("out"),
            link_template: "/[title]".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    pub weights: Vec<String>,
    pub display: String,
    pub fallback: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            weights: vec!["400".to_string(), "700".to_string()],
            display: "swap".to_string(),
            fallback: "sans-serif".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub stylesheets: Vec<String>,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            stylesheets: vec![
                "/blocks.css".to_string(),
                "/globals.css".to_string(),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub owner: String,
    pub owner_url: String,
    pub project: String,
    pub project_href: String,
    pub issues_label: String,
    pub issues_url: String,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            owner: "linyows".to_string(),
            owner_url: "https://github.com/linyows".to_string(),
            project: "Octopass".to_string(),
            project_href: "/".to_string(),
            issues_label: "Github Issues".to_string(),
            issues_url: "https://github.com/linyows/octopass/issues"
                .to_string(),
        }
    }
}

pub fn init_config(
    config: &Map<String, Value>,
) -> Result<SiteConfig, SiteError> {
    Value::Table(config.clone())
        .try_into::<SiteConfig>()
        .into_response("failed to parse site config")
}

/// Everything the render phase reads besides the props.
pub struct RenderContext<'a> {
    pub shell: &'a Shell,
    pub config: &'a SiteConfig,
    pub link: &'a dyn Link,
    /// Calendar year shown in the footer.
    pub year: i32,
}

impl<'a> RenderContext<'a> {
    pub fn blocks<'b>(
        &'b self,
        blocks: &'b entity::block::BlockCollection,
    ) -> Blocks<'b> {
        Blocks::new(&blocks.results, &self.config.site.link_template, self.link)
    }

    pub fn wrap(&self, head: Markup, body: Markup) -> Markup {
        self.shell.wrap(head, body)
    }
}

pub fn current_year() -> i32 {
    use chrono::Datelike;

    chrono::Local::now().year()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_init_config() {
        // Arrange
        let config = toml::from_str::<Map<String, Value>>(
            r#"
            [site]
            title = "Octopass"
            link_template = "/docs/[id]"

            [font]
            family = "Noto Sans"

            [notion]
            pause_millis = 100
            "#,
        )
        .unwrap();

        // Act
        let config = init_config(&config).unwrap();

        // Assert
        assert_eq!(config.site.title, "Octopass");
        assert_eq!(config.site.link_template, "/docs/[id]");
        assert_eq!(config.site.out_dir, PathBuf::from("out"));
        assert_eq!(config.font.family, "Noto Sans");
        assert_eq!(config.font.weights, vec!["400", "700"]);
        assert_eq!(config.styles, Styles::default());
    }

    #[test]
    fn test_init_config_type_mismatch() {
        let config =
            toml::from_str::<Map<String, Value>>("[site]\ntitle = 1\n")
                .unwrap();

        let result = init_config(&config);

        assert!(matches!(result, Err(SiteError::TomlDeError { .. })));
    }
}
