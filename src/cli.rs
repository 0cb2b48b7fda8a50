use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, value_parser};
use tracing::{info, warn};

use crate::Dashboard;
use crate::config::{DashboardSettings, default_config_path};
use crate::loader::{FileSource, HttpSource, SummarySource};
use crate::publish::{INDEX_FILE, LinkAction, publish};
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(name = "pagoda", version, about = "Benchmark results dashboard", long_about = None)]
pub struct Cli {
    /// Increase logging verbosity.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    /// Override the default dashboard configuration path.
    #[arg(long, global = true, value_parser = value_parser!(PathBuf))]
    pub config: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the dashboard HTML from a data.json.
    Render(RenderCommand),
    /// Link a run's report/summary.json into the web directory and render it.
    Publish(PublishCommand),
    /// Serve the web directory, re-rendering on every page load.
    Serve(ServeCommand),
}

#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Directory containing data.json (defaults to the configured web dir).
    #[arg(long, conflicts_with = "url")]
    pub data: Option<PathBuf>,

    /// Dashboard base URL; data.json is fetched relative to it.
    #[arg(long, value_name = "BASE_URL")]
    pub url: Option<String>,

    /// Write the HTML here instead of <data dir>/index.html (stdout with --url).
    /// Use - for stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PublishCommand {
    /// Benchmark run directory holding report/summary.json.
    pub run_dir: PathBuf,

    /// Web directory to publish into.
    #[arg(long)]
    pub web: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Web directory to serve.
    #[arg(long)]
    pub web: Option<PathBuf>,

    /// Listen address (host:port).
    #[arg(long, value_name = "ADDR:PORT")]
    pub listen: Option<String>,
}

fn resolve_config_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.clone())?;
    let settings = DashboardSettings::load_or_default(&config_path)?;
    telemetry::init_tracing("pagoda", cli.verbose, &settings.telemetry)?;
    info!(path = %config_path.display(), "using dashboard config");

    match cli.command {
        Command::Render(cmd) => handle_render(cmd, settings),
        Command::Publish(cmd) => handle_publish(cmd, settings),
        Command::Serve(cmd) => handle_serve(cmd, settings),
    }
}

fn handle_render(cmd: RenderCommand, settings: DashboardSettings) -> Result<()> {
    let data_dir = cmd.data.unwrap_or_else(|| settings.web_dir.clone());
    let source: Box<dyn SummarySource> = match cmd.url.as_deref() {
        Some(base) => Box::new(HttpSource::new(base)?),
        None => Box::new(FileSource::in_dir(&data_dir)),
    };

    let dashboard = Dashboard::new(settings);
    let page = dashboard.render(source.as_ref());
    if page.body_override().is_some() {
        warn!(location = %source.location(), "rendered fallback page; run ./run_suite.sh --dashboard");
    }
    let html = crate::html::render_page(&page, dashboard.settings());

    match output_target(cmd.out, cmd.url.is_some(), &data_dir) {
        Some(out) => {
            write_dashboard(&out, &html)?;
            println!("Dashboard written to {}", out.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// Where `render` writes its HTML; `None` means stdout. A remote source has
/// no local web directory, so it prints unless `--out` says otherwise.
fn output_target(out: Option<PathBuf>, remote: bool, data_dir: &Path) -> Option<PathBuf> {
    match out {
        Some(out) if out.as_os_str() == "-" => None,
        Some(out) => Some(out),
        None if remote => None,
        None => Some(data_dir.join(INDEX_FILE)),
    }
}

fn write_dashboard(out: &Path, html: &str) -> Result<()> {
    if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(out, html).with_context(|| format!("Failed to write dashboard to {}", out.display()))
}

fn handle_publish(cmd: PublishCommand, settings: DashboardSettings) -> Result<()> {
    let web_dir = cmd.web.unwrap_or_else(|| settings.web_dir.clone());
    let listen = settings.listen_addr.clone();
    let dashboard = Dashboard::new(settings);
    let outcome = publish(&dashboard, &cmd.run_dir, &web_dir)?;

    let how = match outcome.link {
        LinkAction::Symlinked => "linked",
        LinkAction::Copied => "copied",
    };
    println!(
        "Summary {how} to {}; dashboard at {}",
        outcome.data.display(),
        outcome.index.display()
    );
    println!(
        "Serve it with: pagoda serve --web {} --listen {listen}",
        web_dir.display()
    );
    Ok(())
}

fn handle_serve(cmd: ServeCommand, settings: DashboardSettings) -> Result<()> {
    let web_dir = cmd.web.unwrap_or_else(|| settings.web_dir.clone());
    let listen = cmd.listen.unwrap_or_else(|| settings.listen_addr.clone());
    let dashboard = Dashboard::new(settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crate::serve::run(dashboard, web_dir, &listen))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_defaults() {
        let cli = Cli::parse_from(["pagoda", "render"]);
        assert!(!cli.verbose);
        match cli.command {
            Command::Render(cmd) => {
                assert!(cmd.data.is_none());
                assert!(cmd.url.is_none());
                assert!(cmd.out.is_none());
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn parses_publish_with_web_dir() {
        let cli = Cli::parse_from(["pagoda", "publish", "runs/quick", "--web", "site", "--verbose"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Publish(cmd) => {
                assert_eq!(cmd.run_dir, PathBuf::from("runs/quick"));
                assert_eq!(cmd.web, Some(PathBuf::from("site")));
            }
            _ => panic!("expected publish command"),
        }
    }

    #[test]
    fn parses_serve_options() {
        let cli = Cli::parse_from(["pagoda", "--config", "dash.json", "serve", "--listen", "0.0.0.0:9000"]);
        assert_eq!(cli.config, Some(PathBuf::from("dash.json")));
        match cli.command {
            Command::Serve(cmd) => {
                assert_eq!(cmd.listen.as_deref(), Some("0.0.0.0:9000"));
                assert!(cmd.web.is_none());
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn render_rejects_data_with_url() {
        let result = Cli::try_parse_from([
            "pagoda", "render", "--data", "web", "--url", "http://localhost:8080/",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn render_output_defaults_by_source() {
        let web = Path::new("web");
        assert_eq!(output_target(None, false, web), Some(web.join(INDEX_FILE)));
        assert_eq!(output_target(None, true, web), None);
        assert_eq!(output_target(Some(PathBuf::from("-")), false, web), None);
        assert_eq!(
            output_target(Some(PathBuf::from("site/dash.html")), true, web),
            Some(PathBuf::from("site/dash.html"))
        );
    }

    #[test]
    fn write_dashboard_creates_missing_parent() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("not/yet/there").join(INDEX_FILE);
        write_dashboard(&out, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "<html></html>");
    }
}
