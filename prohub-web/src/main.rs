// main.rs only parses flags and boots the server or the export

use anyhow::Context;
use clap::{Parser, Subcommand};
use prohub_seo::config::Config;
use prohub_seo::{logging, metrics, AppContext};
use prohub_web::export::export_site;
use prohub_web::{app_router, AppState};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "prohub-web")]
#[command(about = "ProHub SEO pages and admin panel")]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of static assets (defaults to the bundled ones)
    #[arg(long, global = true)]
    static_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve pages over HTTP (default)
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Pre-render every page into a directory
    Export {
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging.dir, &config.logging.file_name);
    metrics::init_metrics();

    let command = cli.command.unwrap_or(Commands::Serve { port: None });
    if let Commands::Serve { port: Some(port) } = &command {
        config.server.port = *port;
    }

    let ctx = AppContext::from_config(config).context("failed to initialise")?;
    let mut state = AppState::new(ctx);
    if let Some(dir) = cli.static_dir {
        state = state.with_static_dir(dir);
    }

    match command {
        Commands::Serve { .. } => {
            if state.ctx.config.admin_password().is_none() {
                warn!("ADMIN_PASSWORD is not set; the admin API is disabled");
            }

            let bind_addr = format!("{}:{}", state.ctx.config.server.host, state.ctx.config.server.port);
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind {}", bind_addr))?;

            info!("Web server listening on {}", bind_addr);
            println!("🌐 Serving {} pages on http://{}", state.ctx.config.site.name, bind_addr);

            axum::serve(listener, app_router(state)).await?;
        }
        Commands::Export { out } => {
            let report = export_site(&state, &out).await?;
            println!("✅ Exported {} pages and {} static files to {}", report.pages, report.static_files, out.display());
            if !report.failed.is_empty() {
                println!("❌ {} pages failed:", report.failed.len());
                for path in &report.failed {
                    println!("   {}", path);
                }
                anyhow::bail!("export incomplete");
            }
        }
    }

    Ok(())
}
