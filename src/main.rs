use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fetch_notion::NotionSource;
use site::{home, Shell};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "warp", about = "Builds the Octopass homepage from Notion")]
struct Cli {
    /// Config file suffix, `.dev` selects Config.dev.toml
    #[arg(long, env = "CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the homepage from Notion and export it
    Build,
    /// Build, then serve the export locally
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let secrets = util::load_env()?;
    let config = util::load_config(&util::config_name(cli.config.as_deref()))?;

    let site_config = site::init_config(&config)?;
    let shell = Shell::init(&site_config.font, &site_config.styles);

    let page_id = home::homepage_id(&secrets)?;
    let notion_token = util::require_secret(&secrets, "NOTION_TOKEN")?;

    let mut notion_config = fetch_notion::init_config(&config)?;
    notion_config.cache_dir = notion_config.cache_dir.as_deref().map(resolve);
    let source = NotionSource::new(notion_token, notion_config)?;

    let out_dir = resolve(&site_config.site.out_dir);
    let report =
        site::export(&source, &page_id, &shell, &site_config, &out_dir).await?;

    info!(
        task = "build",
        page_id,
        out_dir = %report.out_dir.display(),
        files = report.files.len(),
    );

    if let Command::Serve { port } = cli.command {
        let mut server = api::init_config(&config)?;
        if let Some(port) = port {
            server.port = port;
        }
        api::serve(report.out_dir, server).await?;
    }

    Ok(())
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        util::workspace_dir().join(path)
    }
}
