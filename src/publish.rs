use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::Dashboard;
use crate::loader::{DATA_FILE, FileSource};

pub const INDEX_FILE: &str = "index.html";

/// How the run summary was made available to the web directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Symlinked,
    Copied,
}

#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub summary: PathBuf,
    pub data: PathBuf,
    pub index: PathBuf,
    pub link: LinkAction,
    pub loaded: bool,
}

/// Location of the summary a benchmark run writes.
pub fn summary_path(run_dir: &Path) -> PathBuf {
    run_dir.join("report").join("summary.json")
}

/// Point `<web_dir>/data.json` at a run's summary and render `index.html`.
pub fn publish(dashboard: &Dashboard, run_dir: &Path, web_dir: &Path) -> Result<PublishOutcome> {
    let summary = summary_path(run_dir);
    if !summary.is_file() {
        bail!("No summary.json at {}", summary.display());
    }

    fs::create_dir_all(web_dir)
        .with_context(|| format!("Failed to create web directory {}", web_dir.display()))?;

    let data = web_dir.join(DATA_FILE);
    let link = link_summary(&summary, &data)?;

    let page = dashboard.render(&FileSource::at(&data));
    let loaded = page.body_override().is_none();
    let html = crate::html::render_page(&page, dashboard.settings());
    let index = web_dir.join(INDEX_FILE);
    fs::write(&index, html)
        .with_context(|| format!("Failed to write dashboard to {}", index.display()))?;

    info!(
        summary = %summary.display(),
        index = %index.display(),
        link = ?link,
        "published dashboard"
    );
    Ok(PublishOutcome {
        summary,
        data,
        index,
        link,
        loaded,
    })
}

fn link_summary(summary: &Path, data: &Path) -> Result<LinkAction> {
    match fs::symlink_metadata(data) {
        Ok(_) => fs::remove_file(data)
            .with_context(|| format!("Failed to replace existing {}", data.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("Unable to inspect {}", data.display()));
        }
    }

    let target = summary
        .canonicalize()
        .with_context(|| format!("Unable to resolve {}", summary.display()))?;
    match symlink(&target, data) {
        Ok(()) => Ok(LinkAction::Symlinked),
        Err(err) => {
            warn!(error = %err, path = %data.display(), "symlink failed; copying summary instead");
            fs::copy(&target, data)
                .with_context(|| format!("Failed to copy summary to {}", data.display()))?;
            Ok(LinkAction::Copied)
        }
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks not supported on this platform",
    ))
}
