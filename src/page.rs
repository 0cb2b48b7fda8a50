use crate::chart::ChartSpec;

pub const PROFILES_SECTION: &str = "profiles";
pub const RESULTS_SECTION: &str = "results";
pub const GRAPHICS_SECTION: &str = "graphics";

pub const RESULTS_CANVAS: &str = "rChart";
pub const GRAPHICS_CANVAS: &str = "gChart";

/// Titled summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: String,
}

impl Card {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Region holding the profile cards.
#[derive(Debug, Clone, Default)]
pub struct CardContainer {
    cards: Vec<Card>,
}

impl CardContainer {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Replace all existing content.
    pub fn replace(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }
}

/// Drawing surface for a single chart.
#[derive(Debug, Clone)]
pub struct Canvas {
    id: String,
    chart: Option<ChartSpec>,
}

impl Canvas {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chart: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn draw(&mut self, spec: ChartSpec) {
        self.chart = Some(spec);
    }

    pub fn chart(&self) -> Option<&ChartSpec> {
        self.chart.as_ref()
    }
}

/// One row of the per-category results table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub category: String,
    pub status: String,
    pub benchmark: String,
    pub key_metrics: Vec<String>,
}

/// Number of categories per reported status. Other statuses are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub ok: usize,
    pub degraded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub missing: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: &str) {
        match status {
            "ok" => self.ok += 1,
            "degraded" => self.degraded += 1,
            "skipped" => self.skipped += 1,
            "failed" => self.failed += 1,
            "missing" => self.missing += 1,
            _ => {}
        }
    }

    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("ok", self.ok),
            ("degraded", self.degraded),
            ("skipped", self.skipped),
            ("failed", self.failed),
            ("missing", self.missing),
        ]
    }
}

/// Region listing per-category outcomes beneath the results chart.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    rows: Vec<ResultRow>,
    counts: StatusCounts,
}

impl ResultsTable {
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn counts(&self) -> StatusCounts {
        self.counts
    }

    pub fn replace(&mut self, rows: Vec<ResultRow>, counts: StatusCounts) {
        self.rows = rows;
        self.counts = counts;
    }
}

/// Mutually exclusive page region selected through the tab bar.
#[derive(Debug, Clone)]
pub struct TabSection {
    id: String,
    title: String,
    visible: bool,
}

impl TabSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            visible: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// In-memory dashboard page the pipeline writes into.
#[derive(Debug, Clone)]
pub struct Page {
    body_override: Option<String>,
    pub profiles: CardContainer,
    pub results_chart: Canvas,
    pub results_table: ResultsTable,
    pub graphics_chart: Canvas,
    pub sections: Vec<TabSection>,
    pub generated_at: Option<String>,
    pub run_dir: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            body_override: None,
            profiles: CardContainer::default(),
            results_chart: Canvas::new(RESULTS_CANVAS),
            results_table: ResultsTable::default(),
            graphics_chart: Canvas::new(GRAPHICS_CANVAS),
            sections: vec![
                TabSection::new(PROFILES_SECTION, "Profile"),
                TabSection::new(RESULTS_SECTION, "Results"),
                TabSection::new(GRAPHICS_SECTION, "Graphics"),
            ],
            generated_at: None,
            run_dir: None,
        }
    }
}

impl Page {
    /// Discard the page content in favour of a static body.
    pub fn replace_body(&mut self, html: impl Into<String>) {
        self.body_override = Some(html.into());
    }

    pub fn body_override(&self) -> Option<&str> {
        self.body_override.as_deref()
    }

    pub fn section(&self, id: &str) -> Option<&TabSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn visible_sections(&self) -> impl Iterator<Item = &TabSection> {
        self.sections.iter().filter(|section| section.visible)
    }
}
