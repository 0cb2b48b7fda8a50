use serde::{Deserialize, Serialize};

/// Chart kinds understood by Chart.js.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Chart.js configuration for one canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChartOptions>,
}

impl ChartSpec {
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// Values of the first dataset.
    pub fn values(&self) -> &[f64] {
        self.data
            .datasets
            .first()
            .map(|dataset| dataset.data.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub scales: Scales,
}

impl ChartOptions {
    pub fn begin_at_zero() -> Self {
        Self {
            scales: Scales {
                y: Axis {
                    begin_at_zero: true,
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: bool,
}

/// Dataset colours applied by the chart renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Fill for the score bars. Passed to Chart.js untouched.
    pub bar_fill: String,
    /// Line colour for the GPU frame metrics.
    pub line_border: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_fill: "linear-gradient(45deg, gold, orange)".into(),
            line_border: "cyan".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bar_spec_serialises_to_chartjs_config() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: vec!["cpu".into()],
                datasets: vec![Dataset {
                    label: "Score".into(),
                    data: vec![42.0],
                    background_color: Some("gold".into()),
                    border_color: None,
                }],
            },
            options: Some(ChartOptions::begin_at_zero()),
        };

        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "type": "bar",
                "data": {
                    "labels": ["cpu"],
                    "datasets": [{ "label": "Score", "data": [42.0], "backgroundColor": "gold" }]
                },
                "options": { "scales": { "y": { "beginAtZero": true } } }
            })
        );
    }

    #[test]
    fn style_fills_missing_fields() {
        let style: ChartStyle = serde_json::from_value(json!({ "line_border": "red" })).unwrap();
        assert_eq!(style.line_border, "red");
        assert_eq!(style.bar_fill, ChartStyle::default().bar_fill);
    }
}
