use std::path::{Path, PathBuf};

use entity::prelude::*;
use fetch_notion::ContentSource;
use tracing::info;

use crate::{
    current_year, home, response::IntoResponse, shell::BUNDLED_STYLESHEETS,
    Anchor, RenderContext, Shell, SiteConfig, SiteError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Fetches the homepage's props and writes the static site into `out_dir`.
///
/// Every file is rendered first and written into a sibling staging directory,
/// which then replaces `out_dir`. A failed build leaves the previous export
/// untouched.
pub async fn export<S: ContentSource + ?Sized>(
    source: &S,
    page_id: &str,
    shell: &Shell,
    config: &SiteConfig,
    out_dir: &Path,
) -> Result<ExportReport, SiteError> {
    let props = home::get_static_props(source, page_id).await?;

    let data = serde_json::to_string_pretty(&props)
        .into_response("failed to serialize props")?;

    // render from the serialized props, as a rebuild from index.json would
    let props = serde_json::from_str::<PropsEntity>(&data)
        .into_response("failed to deserialize props")?;

    let context = RenderContext {
        shell,
        config,
        link: &Anchor,
        year: current_year(),
    };
    let html = home::render(&context, &props).into_string();

    let mut contents = vec![("index.json", data), ("index.html", html)];
    for (name, stylesheet) in BUNDLED_STYLESHEETS {
        contents.push((name, stylesheet.to_string()));
    }

    let staging = staging_dir(out_dir);
    remove_dir(&staging).await?;
    if let Err(e) = write_all(&staging, &contents).await {
        remove_dir(&staging).await?;
        return Err(e);
    }

    remove_dir(out_dir).await?;
    tokio::fs::rename(&staging, out_dir)
        .await
        .into_response(&format!("failed to move {}", staging.display()))?;

    let files = contents
        .iter()
        .map(|(name, _)| out_dir.join(name))
        .collect::<Vec<_>>();

    info!(
        task = "export",
        out_dir = %out_dir.display(),
        files = files.len(),
    );

    Ok(ExportReport {
        out_dir: out_dir.to_path_buf(),
        files,
    })
}

/// `out` is staged as `out.partial` next to it.
fn staging_dir(out_dir: &Path) -> PathBuf {
    let mut name = out_dir.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

async fn write_all(
    dir: &Path,
    contents: &[(&str, String)],
) -> Result<(), SiteError> {
    tokio::fs::create_dir_all(dir)
        .await
        .into_response(&format!("failed to create {}", dir.display()))?;

    for (name, text) in contents {
        let path = dir.join(name);
        tokio::fs::write(&path, text)
            .await
            .into_response(&format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

async fn remove_dir(dir: &Path) -> Result<(), SiteError> {
    match tokio::fs::remove_dir_all(dir).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            Err(SiteError::StdIoError {
                source: e,
                message: format!("failed to remove {}", dir.display()),
            })
        }
        _ => Ok(()),
    }
}
