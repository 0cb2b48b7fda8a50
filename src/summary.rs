use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};

/// Category whose result carries the frame metrics drawn by the graphics chart.
pub const GPU_GAME_CATEGORY: &str = "gpu_game";

/// Separator used when listing the selected categories on the profile card.
pub const CATEGORY_SEPARATOR: &str = ", ";

/// Summary emitted by a benchmark run (`report/summary.json`).
///
/// Every field is optional. Consumers go through the accessors below, which
/// resolve absent values to their display or charting default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryDocument {
    #[serde(default)]
    pub profile: Option<Value>,
    #[serde(default)]
    pub suite_interpreter: Option<Value>,
    #[serde(default)]
    pub selected_categories: Option<Vec<Value>>,
    #[serde(default)]
    pub results: Option<CategoryResults>,
    #[serde(default)]
    pub generated_at: Option<Value>,
    #[serde(default)]
    pub run_dir: Option<Value>,
}

impl SummaryDocument {
    pub fn from_slice(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }

    pub fn profile_name(&self) -> String {
        display_text(self.profile.as_ref())
    }

    pub fn interpreter(&self) -> String {
        display_text(self.suite_interpreter.as_ref())
    }

    /// Selected categories joined for display; empty when none were selected.
    pub fn categories_line(&self) -> String {
        self.selected_categories
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|value| display_text(Some(value)))
            .collect::<Vec<_>>()
            .join(CATEGORY_SEPARATOR)
    }

    /// Generation timestamp for the footer; `None` when absent or blank.
    pub fn generated_at(&self) -> Option<String> {
        optional_text(self.generated_at.as_ref())
    }

    pub fn run_dir(&self) -> Option<String> {
        optional_text(self.run_dir.as_ref())
    }

    pub fn results(&self) -> &[(String, CategoryResult)] {
        self.results
            .as_ref()
            .map(CategoryResults::entries)
            .unwrap_or_default()
    }

    pub fn result(&self, category: &str) -> Option<&CategoryResult> {
        self.results.as_ref().and_then(|results| results.get(category))
    }

    /// The `gpu_game` result, or an empty placeholder when the run has none.
    pub fn gpu_game(&self) -> CategoryResult {
        self.result(GPU_GAME_CATEGORY).cloned().unwrap_or_default()
    }
}

/// Text shown for a document value: strings verbatim, absent or null as empty.
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    Some(display_text(value)).filter(|text| !text.is_empty())
}

/// Outcome recorded for a single benchmark category.
///
/// The raw fields are kept as-is. Anything that is not a JSON object is
/// treated as an empty result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct CategoryResult {
    fields: Map<String, Value>,
}

impl From<Value> for CategoryResult {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl CategoryResult {
    /// Score plotted on the results chart; zero when absent or not numeric.
    pub fn score(&self) -> f64 {
        self.metric("score").unwrap_or(0.0)
    }

    /// Frames per second; zero when absent.
    pub fn fps(&self) -> f64 {
        self.metric("fps").unwrap_or(0.0)
    }

    /// Mean frame time in milliseconds; zero when absent.
    pub fn frametime_ms(&self) -> f64 {
        self.metric("frametime_ms").unwrap_or(0.0)
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    pub fn benchmark(&self) -> Option<&str> {
        self.text("benchmark")
    }

    pub fn notes(&self) -> Option<&str> {
        self.text("notes")
    }

    /// Numeric field, accepting numbers and numeric strings.
    pub fn metric(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// `results` mapping that keeps the order categories appear in the document.
///
/// A repeated key keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryResults {
    entries: Vec<(String, CategoryResult)>,
}

impl CategoryResults {
    pub fn entries(&self) -> &[(String, CategoryResult)] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<&CategoryResult> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, category: String, result: CategoryResult) {
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((category, result)),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryResults {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResultsVisitor;

        impl<'de> Visitor<'de> for ResultsVisitor {
            type Value = CategoryResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to results")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut results = CategoryResults::default();
                while let Some((category, result)) =
                    access.next_entry::<String, CategoryResult>()?
                {
                    results.insert(category, result);
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(ResultsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> SummaryDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn categories_line_joins_with_comma_space() {
        let doc = parse(json!({ "selected_categories": ["cpu", "gpu_game", "disk"] }));
        assert_eq!(doc.categories_line(), "cpu, gpu_game, disk");
    }

    #[test]
    fn categories_line_is_empty_without_categories() {
        assert_eq!(parse(json!({ "selected_categories": [] })).categories_line(), "");
        assert_eq!(parse(json!({})).categories_line(), "");
    }

    #[test]
    fn results_keep_document_order() {
        let raw = br#"{"results":{"mem":{"score":1},"cpu":{"score":2},"ai":{"score":3}}}"#;
        let doc = SummaryDocument::from_slice(raw).unwrap();
        let names: Vec<&str> = doc.results().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["mem", "cpu", "ai"]);
    }

    #[test]
    fn repeated_category_keeps_first_position() {
        let raw = br#"{"results":{"cpu":{"score":1},"mem":{"score":2},"cpu":{"score":9}}}"#;
        let doc = SummaryDocument::from_slice(raw).unwrap();
        assert_eq!(doc.results().len(), 2);
        assert_eq!(doc.results()[0].0, "cpu");
        assert_eq!(doc.results()[0].1.score(), 9.0);
    }

    #[test]
    fn score_defaults_to_zero() {
        let doc = parse(json!({
            "results": {
                "cpu": { "status": "failed" },
                "mem": { "score": null },
                "disk": "missing",
                "ai": { "score": "12.5" }
            }
        }));
        let scores: Vec<f64> = doc.results().iter().map(|(_, r)| r.score()).collect();
        assert_eq!(scores, [0.0, 0.0, 0.0, 12.5]);
    }

    #[test]
    fn gpu_game_placeholder_when_absent() {
        let doc = parse(json!({ "results": { "cpu": { "score": 3 } } }));
        let gpu = doc.gpu_game();
        assert!(gpu.is_empty());
        assert_eq!(gpu.fps(), 0.0);
        assert_eq!(gpu.frametime_ms(), 0.0);

        let bare = parse(json!({}));
        assert!(bare.gpu_game().is_empty());
    }

    #[test]
    fn display_text_handles_missing_and_non_string_values() {
        let doc = parse(json!({ "profile": null, "suite_interpreter": 3.11 }));
        assert_eq!(doc.profile_name(), "");
        assert_eq!(doc.interpreter(), "3.11");
    }

    #[test]
    fn footer_fields_accept_any_json_type() {
        let doc = parse(json!({ "generated_at": 1700000000, "run_dir": ["a"] }));
        assert_eq!(doc.generated_at().as_deref(), Some("1700000000"));
        assert_eq!(doc.run_dir().as_deref(), Some("[\"a\"]"));

        let blank = parse(json!({ "generated_at": null, "run_dir": "" }));
        assert!(blank.generated_at().is_none());
        assert!(blank.run_dir().is_none());
    }

    #[test]
    fn text_fields_skip_empty_strings() {
        let result = CategoryResult::from(json!({ "status": "ok", "notes": "" }));
        assert_eq!(result.status(), Some("ok"));
        assert_eq!(result.notes(), None);
        assert_eq!(result.benchmark(), None);
    }
}
