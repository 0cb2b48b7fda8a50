use serde_json::Value;

use crate::chart::{ChartData, ChartKind, ChartOptions, ChartSpec, ChartStyle, Dataset};
use crate::page::{Canvas, Card, CardContainer, ResultRow, ResultsTable, StatusCounts};
use crate::summary::{CategoryResult, SummaryDocument};

pub const SCORE_DATASET: &str = "Score";
pub const GPU_DATASET: &str = "GPU Game";
pub const GPU_LABELS: [&str; 2] = ["FPS", "Frame Time"];

/// Fill the profile container with the profile, interpreter and category cards.
pub fn render_profiles(doc: &SummaryDocument, container: &mut CardContainer) {
    container.replace(vec![
        Card::new("Profile", doc.profile_name()),
        Card::new("Interpreter", doc.interpreter()),
        Card::new("Categories", doc.categories_line()),
    ]);
}

/// Draw one bar per category, in document order, scaled from zero.
pub fn render_results(doc: &SummaryDocument, canvas: &mut Canvas, style: &ChartStyle) {
    let (labels, scores): (Vec<String>, Vec<f64>) = doc
        .results()
        .iter()
        .map(|(category, result)| (category.clone(), result.score()))
        .unzip();

    canvas.draw(ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: SCORE_DATASET.into(),
                data: scores,
                background_color: Some(style.bar_fill.clone()),
                border_color: None,
            }],
        },
        options: Some(ChartOptions::begin_at_zero()),
    });
}

/// Plot the `gpu_game` frame rate and frame time as a two point line.
pub fn render_graphics(doc: &SummaryDocument, canvas: &mut Canvas, style: &ChartStyle) {
    let gpu = doc.gpu_game();
    canvas.draw(ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels: GPU_LABELS.iter().map(|label| label.to_string()).collect(),
            datasets: vec![Dataset {
                label: GPU_DATASET.into(),
                data: vec![gpu.fps(), gpu.frametime_ms()],
                background_color: None,
                border_color: Some(style.line_border.clone()),
            }],
        },
        options: None,
    });
}

/// List each category with its status and headline metrics, and tally the
/// statuses.
pub fn render_results_table(doc: &SummaryDocument, table: &mut ResultsTable) {
    let mut counts = StatusCounts::default();
    let rows = doc
        .results()
        .iter()
        .map(|(category, result)| {
            let status = result.status().unwrap_or_default().to_string();
            counts.record(&status);
            ResultRow {
                category: category.clone(),
                status,
                benchmark: result.benchmark().unwrap_or_default().to_string(),
                key_metrics: key_metrics(result),
            }
        })
        .collect();
    table.replace(rows, counts);
}

const KEY_METRICS: &[&str] = &["score", "fps", "frametime_ms", "prompt_tps", "eval_tps"];
const KEY_LABELS: &[&str] = &["backend", "data_source", "model"];

fn key_metrics(result: &CategoryResult) -> Vec<String> {
    let mut metrics = Vec::new();
    for key in KEY_METRICS {
        // zero and missing values are both left out
        if let Some(value) = result.metric(key).filter(|value| *value != 0.0) {
            metrics.push(format!("{key}={}", format_number(value)));
        }
    }
    for key in KEY_LABELS {
        if let Some(text) = result.text(key) {
            metrics.push(format!("{key}={text}"));
        }
    }
    if let Some(Value::Object(subtests)) = result.get("subtests") {
        for (name, subtest) in subtests {
            metrics.push(format!("{name}:{}", status_of(subtest)));
        }
    }
    if let Some(Value::Array(backends)) = result.get("backend_results") {
        if !backends.is_empty() {
            let labels: Vec<String> = backends.iter().map(backend_source).collect();
            metrics.push(format!("backend_sources={}", labels.join(",")));
        }
    }
    if let Some(formula) = result
        .get("composite")
        .and_then(|composite| composite.get("formula"))
        .and_then(Value::as_str)
        .filter(|formula| !formula.is_empty())
    {
        metrics.push(format!("composite_formula={formula}"));
    }
    if let Some(notes) = result.notes() {
        metrics.push(notes.to_string());
    }
    metrics
}

fn status_of(value: &Value) -> &str {
    value
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

/// `backend:data_source:status`; llama.cpp runs a real model, anything else
/// is a synthetic proxy unless the result says otherwise.
fn backend_source(entry: &Value) -> String {
    let backend = entry.get("backend").and_then(Value::as_str).unwrap_or("?");
    let data_source = entry
        .get("data_source")
        .and_then(Value::as_str)
        .filter(|source| !source.is_empty())
        .unwrap_or(if backend == "llama.cpp" {
            "real_model"
        } else {
            "synthetic_proxy"
        });
    format!("{backend}:{data_source}:{}", status_of(entry))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::GRAPHICS_CANVAS;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> SummaryDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn profile_cards_in_fixed_order() {
        let mut container = CardContainer::default();
        container.replace(vec![Card::new("stale", "content")]);
        render_profiles(
            &doc(json!({
                "profile": "balanced",
                "suite_interpreter": "/usr/bin/python3",
                "selected_categories": ["cpu", "memory"]
            })),
            &mut container,
        );

        let cards = container.cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], Card::new("Profile", "balanced"));
        assert_eq!(cards[1], Card::new("Interpreter", "/usr/bin/python3"));
        assert_eq!(cards[2], Card::new("Categories", "cpu, memory"));
    }

    #[test]
    fn profile_cards_tolerate_empty_document() {
        let mut container = CardContainer::default();
        render_profiles(&doc(json!({})), &mut container);
        let bodies: Vec<&str> = container.cards().iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, ["", "", ""]);
    }

    #[test]
    fn results_chart_follows_document_order() {
        let mut canvas = Canvas::new("rChart");
        render_results(
            &doc(json!({
                "results": {
                    "disk": { "score": 5 },
                    "ai": { "status": "skipped" },
                    "cpu": { "score": 77.5 }
                }
            })),
            &mut canvas,
            &ChartStyle::default(),
        );

        let chart = canvas.chart().unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.labels(), ["disk", "ai", "cpu"]);
        assert_eq!(chart.values(), [5.0, 0.0, 77.5]);
        assert_eq!(chart.options, Some(ChartOptions::begin_at_zero()));
        assert_eq!(chart.data.datasets[0].label, SCORE_DATASET);
    }

    #[test]
    fn results_chart_without_results_is_empty() {
        let mut canvas = Canvas::new("rChart");
        render_results(&doc(json!({})), &mut canvas, &ChartStyle::default());
        let chart = canvas.chart().unwrap();
        assert!(chart.labels().is_empty());
        assert!(chart.values().is_empty());
    }

    #[test]
    fn graphics_chart_plots_gpu_game() {
        let mut canvas = Canvas::new(GRAPHICS_CANVAS);
        render_graphics(
            &doc(json!({
                "results": { "gpu_game": { "fps": 144.0, "frametime_ms": 6.9 } }
            })),
            &mut canvas,
            &ChartStyle::default(),
        );

        let chart = canvas.chart().unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.labels(), GPU_LABELS);
        assert_eq!(chart.values(), [144.0, 6.9]);
        assert_eq!(chart.data.datasets[0].border_color.as_deref(), Some("cyan"));
    }

    #[test]
    fn graphics_chart_defaults_without_gpu_game() {
        let mut canvas = Canvas::new(GRAPHICS_CANVAS);
        render_graphics(
            &doc(json!({ "results": { "cpu": { "score": 1 } } })),
            &mut canvas,
            &ChartStyle::default(),
        );
        assert_eq!(canvas.chart().unwrap().values(), [0.0, 0.0]);

        let mut canvas = Canvas::new(GRAPHICS_CANVAS);
        render_graphics(&doc(json!({})), &mut canvas, &ChartStyle::default());
        assert_eq!(canvas.chart().unwrap().values(), [0.0, 0.0]);
    }

    #[test]
    fn results_table_lists_key_metrics() {
        let mut table = ResultsTable::default();
        render_results_table(
            &doc(json!({
                "results": {
                    "ai": {
                        "status": "ok",
                        "benchmark": "llama-bench",
                        "prompt_tps": 512.25,
                        "backend": "llama.cpp",
                        "notes": "real model"
                    },
                    "disk": { "status": "missing", "score": 0 }
                }
            })),
            &mut table,
        );

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, "ok");
        assert_eq!(rows[0].benchmark, "llama-bench");
        assert_eq!(
            rows[0].key_metrics,
            ["prompt_tps=512.25", "backend=llama.cpp", "real model"]
        );
        assert_eq!(rows[1].category, "disk");
        assert!(rows[1].key_metrics.is_empty());
        assert_eq!(table.counts().ok, 1);
        assert_eq!(table.counts().missing, 1);
    }

    #[test]
    fn results_table_lists_subtests_backends_and_formula() {
        let mut table = ResultsTable::default();
        render_results_table(
            &doc(json!({
                "results": {
                    "ai": {
                        "status": "degraded",
                        "subtests": {
                            "prefill": { "status": "ok" },
                            "decode": {}
                        },
                        "backend_results": [
                            { "backend": "llama.cpp", "status": "ok" },
                            { "backend": "torch", "status": "skipped" },
                            { "backend": "onnxruntime", "data_source": "real_model" }
                        ],
                        "composite": { "formula": "0.5*prompt_tps + 0.5*eval_tps" }
                    },
                    "cpu": { "status": "failed" },
                    "gpu_game": { "status": "weird" }
                }
            })),
            &mut table,
        );

        assert_eq!(
            table.rows()[0].key_metrics,
            [
                "prefill:ok",
                "decode:unknown",
                "backend_sources=llama.cpp:real_model:ok,torch:synthetic_proxy:skipped,onnxruntime:real_model:unknown",
                "composite_formula=0.5*prompt_tps + 0.5*eval_tps",
            ]
        );
        assert_eq!(
            table.counts(),
            StatusCounts {
                degraded: 1,
                failed: 1,
                ..StatusCounts::default()
            }
        );
    }
}
