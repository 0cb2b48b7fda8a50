pub mod chart;
pub mod cli;
pub mod config;
pub mod html;
pub mod loader;
pub mod page;
pub mod publish;
pub mod render;
pub mod serve;
pub mod summary;
pub mod tabs;
pub mod telemetry;

use tracing::{debug, info, info_span};

use crate::config::DashboardSettings;
use crate::loader::{FALLBACK_MESSAGE, LoadOutcome, SummarySource, load_summary};
use crate::page::Page;
use crate::render::{render_graphics, render_profiles, render_results, render_results_table};
use crate::summary::SummaryDocument;
use crate::tabs::TabController;

/// Runs the load, render and tab activation pipeline for one page load.
#[derive(Debug, Clone)]
pub struct Dashboard {
    settings: DashboardSettings,
}

impl Dashboard {
    pub fn new(settings: DashboardSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Load the summary from `source` and build the page.
    ///
    /// When the summary is unavailable the page body is replaced with the
    /// regeneration hint and nothing else is rendered.
    pub fn render(&self, source: &dyn SummarySource) -> Page {
        let span = info_span!("dashboard_render", location = %source.location());
        let _guard = span.enter();

        let mut page = Page::default();
        match load_summary(source) {
            LoadOutcome::Loaded(document) => self.populate(&mut page, &document),
            LoadOutcome::Unavailable(_) => page.replace_body(FALLBACK_MESSAGE),
        }
        page
    }

    /// Render an already parsed summary into `page`.
    pub fn populate(&self, page: &mut Page, document: &SummaryDocument) {
        let style = &self.settings.chart;
        render_profiles(document, &mut page.profiles);
        render_results(document, &mut page.results_chart, style);
        render_results_table(document, &mut page.results_table);
        render_graphics(document, &mut page.graphics_chart, style);
        page.generated_at = document.generated_at();
        page.run_dir = document.run_dir();

        if !TabController::show(&mut page.sections, &self.settings.default_tab) {
            debug!(tab = %self.settings.default_tab, "default tab not present on page");
        }
        info!(
            profile = %document.profile_name(),
            categories = document.results().len(),
            "rendered dashboard"
        );
    }

    /// Load, render and serialise the dashboard as HTML.
    pub fn render_html(&self, source: &dyn SummarySource) -> String {
        let page = self.render(source);
        html::render_page(&page, &self.settings)
    }
}
