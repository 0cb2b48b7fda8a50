use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::Client as BlockingClient;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::summary::SummaryDocument;

/// Relative location of the summary document inside the web root.
pub const DATA_FILE: &str = "data.json";

/// Body shown when the summary document cannot be loaded.
pub const FALLBACK_MESSAGE: &str = "<p>No data.json. Run ./run_suite.sh --dashboard</p>";

/// The summary document could not be obtained.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("summary document not found at {0}")]
    Missing(String),
    #[error("failed to read summary document from {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch summary document from {location}: {message}")]
    Network { location: String, message: String },
    #[error("malformed summary document at {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a single load attempt.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(SummaryDocument),
    Unavailable(DataUnavailable),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Somewhere the raw summary document can be read from.
pub trait SummarySource {
    /// Human readable location, used in logs and errors.
    fn location(&self) -> String;

    /// Read the raw document bytes.
    fn fetch(&self) -> Result<Vec<u8>, DataUnavailable>;
}

/// Reads `data.json` from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source for `data.json` inside `web_dir`.
    pub fn in_dir(web_dir: impl AsRef<Path>) -> Self {
        Self {
            path: web_dir.as_ref().join(DATA_FILE),
        }
    }

    /// Source for an explicit document path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummarySource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, DataUnavailable> {
        fs::read(&self.path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => DataUnavailable::Missing(self.location()),
            _ => DataUnavailable::Io {
                location: self.location(),
                source: err,
            },
        })
    }
}

/// Fetches `data.json` relative to a dashboard base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    client: BlockingClient,
}

impl HttpSource {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let url = data_url(base)?;
        let client = BlockingClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SummarySource for HttpSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, DataUnavailable> {
        let network = |err: reqwest::Error| DataUnavailable::Network {
            location: self.location(),
            message: err.to_string(),
        };
        let response = self.client.get(self.url.clone()).send().map_err(network)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DataUnavailable::Missing(self.location()));
        }
        let response = response.error_for_status().map_err(network)?;
        let body = response.bytes().map_err(network)?;
        Ok(body.to_vec())
    }
}

/// Resolve `data.json` against a base URL the way a page-relative fetch does.
pub fn data_url(base: &str) -> anyhow::Result<Url> {
    let base = Url::parse(base.trim())?;
    Ok(base.join(DATA_FILE)?)
}

/// Read and parse the summary document once.
pub fn load_summary(source: &dyn SummarySource) -> LoadOutcome {
    let location = source.location();
    let raw = match source.fetch() {
        Ok(raw) => raw,
        Err(err) => {
            warn!(location = %location, error = %err, "summary document unavailable");
            return LoadOutcome::Unavailable(err);
        }
    };

    match SummaryDocument::from_slice(&raw) {
        Ok(document) => {
            debug!(location = %location, bytes = raw.len(), "loaded summary document");
            LoadOutcome::Loaded(document)
        }
        Err(source) => {
            warn!(location = %location, error = %source, "summary document is not valid JSON");
            LoadOutcome::Unavailable(DataUnavailable::Malformed { location, source })
        }
    }
}
