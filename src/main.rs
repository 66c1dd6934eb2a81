use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use prohub_core::content::{approve_content, generate_default_content, list_content, stage_content, ContentSummary};
use prohub_core::paths::{render_sitemap, site_paths};
use prohub_core::{ContentKey, PageContent};
use prohub_seo::config::Config;
use prohub_seo::logging;
use prohub_seo::matcher::{try_match_providers, ProviderMatch};
use prohub_seo::AppContext;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "prohub_seo")]
#[command(about = "ProHub SEO site content and directory tools")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every service-town page with its content status
    List {
        /// Only show pages with pending content
        #[arg(long)]
        pending: bool,
    },
    /// Promote a page's pending content to live
    Approve {
        #[arg(long)]
        service: String,
        #[arg(long)]
        town: String,
    },
    /// Write a content record into the pending tier
    Stage {
        #[arg(long)]
        service: String,
        #[arg(long)]
        town: String,
        /// JSON record to stage; the generated default is staged when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print every page path
    Paths,
    /// Render sitemap.xml
    Sitemap {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the providers matched for a page
    Providers {
        #[arg(long)]
        service: String,
        #[arg(long)]
        town: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging.dir, &config.logging.file_name);

    let ctx = AppContext::from_config(config).context("failed to initialise")?;

    match cli.command {
        Commands::List { pending } => {
            let items = list_content(&ctx.catalog, ctx.store.as_ref()).await?;
            let summary = ContentSummary::from_items(&items);
            println!(
                "📄 {} records: {} pending, {} live",
                summary.total, summary.pending, summary.live
            );
            for item in items.iter().filter(|i| !pending || i.status == prohub_core::ContentStatus::Pending) {
                println!(
                    "   [{:<7}] {:<40} {}  {}",
                    item.status.as_str(),
                    format!("{}/{}", item.service, item.town),
                    item.last_updated.format("%Y-%m-%d %H:%M"),
                    item.title
                );
            }
        }
        Commands::Approve { service, town } => {
            let key = ContentKey::new(service, town)?;
            match approve_content(ctx.store.as_ref(), &key).await {
                Ok(content) => {
                    println!("✅ Approved {} ({})", key, content.title);
                }
                Err(e) if e.is_not_found() => {
                    bail!("no pending content for {}", key);
                }
                Err(e) => {
                    error!("Approval failed for {}: {}", key, e);
                    return Err(e.into());
                }
            }
        }
        Commands::Stage { service, town, file } => {
            let key = ContentKey::new(service, town)?;
            let content: PageContent = match file {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    serde_json::from_str(&raw).with_context(|| format!("invalid record in {}", path.display()))?
                }
                None => {
                    let (Some(service), Some(town)) = (ctx.catalog.service(key.service()), ctx.catalog.town(key.town()))
                    else {
                        bail!("{} is not a catalog page", key);
                    };
                    generate_default_content(service, town, Utc::now())
                }
            };
            stage_content(ctx.store.as_ref(), &key, content).await?;
            println!("📝 Staged pending content for {}", key);
        }
        Commands::Paths => {
            for path in site_paths(&ctx.catalog) {
                println!("{}", path.url_path());
            }
        }
        Commands::Sitemap { output } => {
            let xml = render_sitemap(&ctx.config.site.base_url, &site_paths(&ctx.catalog), Utc::now());
            match output {
                Some(path) => {
                    std::fs::write(&path, xml).with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Wrote sitemap to {}", path.display());
                }
                None => print!("{}", xml),
            }
        }
        Commands::Providers { service, town } => {
            let outcome =
                try_match_providers(ctx.directory.as_ref(), &ctx.catalog, &service, &town, Utc::now()).await?;
            match outcome {
                ProviderMatch::Matched(providers) if providers.is_empty() => {
                    println!("No verified providers for {}/{}", service, town);
                }
                ProviderMatch::Matched(providers) => {
                    for provider in providers {
                        println!(
                            "{} {:<32} rating {:>3}  reviews {}",
                            if provider.is_featured { "⭐" } else { "  " },
                            provider.business_name,
                            provider
                                .avg_rating
                                .map(|r| format!("{:.1}", r))
                                .unwrap_or_else(|| "-".to_string()),
                            provider.total_reviews.unwrap_or(0)
                        );
                    }
                }
                ProviderMatch::UnknownCategory { category_slug } => {
                    println!("⚠️  Directory has no category '{}'", category_slug);
                }
                ProviderMatch::UnknownRegion { region_name } => {
                    println!("⚠️  Directory has no region '{}'", region_name);
                }
            }
        }
    }

    Ok(())
}
