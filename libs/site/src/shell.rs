//! Document shell shared by every rendered page.
//!
//! The shell owns the font selection and the global stylesheets. It is built
//! once at startup with [`Shell::init`] and handed to the render phase through
//! [`crate::RenderContext`].

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::{Font, Styles};

const GOOGLE_FONTS_URL: &str = "https://fonts.googleapis.com/css2";

/// Stylesheets bundled into the binary, written next to the exported page.
pub const BUNDLED_STYLESHEETS: [(&str, &str); 2] = [
    ("blocks.css", include_str!("../assets/blocks.css")),
    ("globals.css", include_str!("../assets/globals.css")),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Shell {
    font_family: String,
    font_url: String,
    stylesheets: Vec<String>,
}

impl Shell {
    pub fn init(font: &Font, styles: &Styles) -> Self {
        let family = sanitize(&font.family);
        let fallback = font
            .fallback
            .split(',')
            .map(sanitize)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let font_family = if fallback.is_empty() {
            format!("'{}'", family)
        } else {
            format!("'{}', {}", family, fallback)
        };

        let mut font_url =
            format!("{}?family={}", GOOGLE_FONTS_URL, family.replace(' ', "+"));
        if !font.weights.is_empty() {
            font_url.push_str(":wght@");
            font_url.push_str(&font.weights.join(";"));
        }
        if !font.display.is_empty() {
            font_url.push_str("&display=");
            font_url.push_str(&font.display);
        }

        Self {
            font_family,
            font_url,
            stylesheets: styles.stylesheets.clone(),
        }
    }

    /// CSS `font-family` value of the selected font.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_url(&self) -> &str {
        &self.font_url
    }

    pub fn root_style(&self) -> String {
        format!(
            ":root {{ --font-inter: {0}; --rotion-font-family: {0}; }}",
            self.font_family
        )
    }

    /// Renders `head` and `body` unchanged inside the site's document.
    pub fn wrap(&self, head: Markup, body: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    (head)
                    link rel="preconnect" href="https://fonts.googleapis.com";
                    link rel="stylesheet" href=(self.font_url);
                    @for stylesheet in &self.stylesheets {
                        link rel="stylesheet" href=(stylesheet);
                    }
                    // font_family only holds sanitized characters
                    style { (PreEscaped(self.root_style())) }
                }
                body {
                    (body)
                }
            }
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}
