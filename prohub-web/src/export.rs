//! Pre-renders every enumerated page into a directory tree that any static
//! host can serve: `/plumber/george` becomes `plumber/george/index.html`.

use anyhow::{Context, Result};
use chrono::Utc;
use prohub_core::paths::{render_sitemap, site_paths, SitePath};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::pages::{render_service_index, render_service_town, render_town_index, robots_txt};
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct ExportReport {
    pub pages: usize,
    pub static_files: usize,
    pub failed: Vec<String>,
}

fn page_file(out_dir: &Path, path: &SitePath) -> PathBuf {
    out_dir
        .join(path.url_path().trim_start_matches('/'))
        .join("index.html")
}

async fn render_path(state: &AppState, path: &SitePath) -> Result<String> {
    let html = match path {
        SitePath::ServiceIndex { service } => render_service_index(state, service)?,
        SitePath::ServiceTown { service, town } => render_service_town(state, service, town).await?,
        SitePath::TownIndex { town } => render_town_index(state, town)?,
    };
    Ok(html)
}

fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// A page that fails to render is recorded in the report and skipped.
pub async fn export_site(state: &AppState, out_dir: &Path) -> Result<ExportReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut report = ExportReport::default();
    let paths = site_paths(&state.ctx.catalog);
    info!("Exporting {} pages to {}", paths.len(), out_dir.display());

    for path in &paths {
        match render_path(state, path).await {
            Ok(html) => {
                let file = page_file(out_dir, path);
                if let Some(parent) = file.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&file, html).with_context(|| format!("Failed to write {}", file.display()))?;
                debug!("Wrote {}", file.display());
                report.pages += 1;
            }
            Err(e) => {
                warn!("Failed to render {}: {}", path.url_path(), e);
                report.failed.push(path.url_path());
            }
        }
    }

    let site = &state.ctx.config.site;
    fs::write(
        out_dir.join("sitemap.xml"),
        render_sitemap(&site.base_url, &paths, Utc::now()),
    )?;
    fs::write(out_dir.join("robots.txt"), robots_txt(&site.base_url))?;

    if state.static_dir.is_dir() {
        report.static_files = copy_dir(&state.static_dir, &out_dir.join("static"))?;
    } else {
        warn!("Static directory {} not found, skipping assets", state.static_dir.display());
    }

    info!(
        "Export finished: {} pages, {} static files, {} failures",
        report.pages,
        report.static_files,
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_files_mirror_url_paths() {
        let out = Path::new("/tmp/site");
        assert_eq!(
            page_file(out, &SitePath::ServiceTown { service: "plumber".into(), town: "george".into() }),
            PathBuf::from("/tmp/site/plumber/george/index.html")
        );
        assert_eq!(
            page_file(out, &SitePath::TownIndex { town: "knysna".into() }),
            PathBuf::from("/tmp/site/town/knysna/index.html")
        );
    }
}
