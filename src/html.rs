//! Static HTML output for a rendered [`Page`].
//!
//! Charts are emitted as Chart.js configurations and drawn client side. Tab
//! visibility is baked into each section's inline style, and a small
//! `showTab` script lets the reader switch sections afterwards.

use std::fmt::Write as _;

use crate::chart::ChartSpec;
use crate::config::DashboardSettings;
use crate::page::{
    Canvas, GRAPHICS_SECTION, PROFILES_SECTION, Page, RESULTS_SECTION, TabSection,
};

/// Render the complete HTML document for `page`.
pub fn render_page(page: &Page, settings: &DashboardSettings) -> String {
    let head = render_head(settings);
    let body = match page.body_override() {
        Some(body) => body.to_string(),
        None => render_body(page, settings),
    };
    format!("<!DOCTYPE html>\n<html lang=\"en\">\n{head}<body>\n{body}\n</body>\n</html>\n")
}

fn render_head(settings: &DashboardSettings) -> String {
    format!(
        r#"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{chart_js}"></script>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #111827;
            color: #f3f4f6;
            padding: 24px;
        }}
        header {{ margin-bottom: 24px; }}
        h1 {{ font-size: 1.8em; margin-bottom: 12px; }}
        nav.tabs button {{
            background: #1f2937;
            color: inherit;
            border: 1px solid #374151;
            border-radius: 6px;
            padding: 8px 16px;
            margin-right: 8px;
            cursor: pointer;
        }}
        .cards {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 16px;
        }}
        .card {{
            background: #1f2937;
            border-radius: 8px;
            padding: 20px;
        }}
        .card h2 {{ font-size: 0.9em; color: #9ca3af; margin-bottom: 8px; }}
        .chart-container {{ background: #1f2937; border-radius: 8px; padding: 20px; margin-bottom: 24px; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ text-align: left; padding: 8px; border-bottom: 1px solid #374151; }}
        footer {{ margin-top: 24px; color: #9ca3af; font-size: 0.85em; }}
    </style>
</head>
"#,
        title = escape_html(&settings.title),
        chart_js = escape_html(&settings.chart_js_url),
    )
}

fn render_body(page: &Page, settings: &DashboardSettings) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<header>");
    let _ = writeln!(body, "    <h1>{}</h1>", escape_html(&settings.title));
    let _ = writeln!(body, "    <nav class=\"tabs\">");
    for section in &page.sections {
        let _ = writeln!(
            body,
            "        <button type=\"button\" onclick=\"showTab('{id}')\">{title}</button>",
            id = escape_html(section.id()),
            title = escape_html(section.title()),
        );
    }
    let _ = writeln!(body, "    </nav>");
    let _ = writeln!(body, "</header>");

    let _ = writeln!(body, "<main>");
    for section in &page.sections {
        body.push_str(&render_section(page, section));
    }
    let _ = writeln!(body, "</main>");

    body.push_str(&render_footer(page));
    body.push_str(&render_scripts(page));
    body
}

fn render_section(page: &Page, section: &TabSection) -> String {
    let display = if section.is_visible() { "block" } else { "none" };
    let content = match section.id() {
        PROFILES_SECTION => render_cards(page),
        RESULTS_SECTION => {
            let mut content = render_canvas(&page.results_chart);
            content.push_str(&render_results_table(page));
            content
        }
        GRAPHICS_SECTION => render_canvas(&page.graphics_chart),
        _ => String::new(),
    };
    format!(
        "<section id=\"{id}\" class=\"tab\" style=\"display: {display}\">\n{content}</section>\n",
        id = escape_html(section.id()),
    )
}

fn render_cards(page: &Page) -> String {
    let mut html = String::from("<div class=\"cards\">\n");
    for card in page.profiles.cards() {
        let _ = writeln!(
            html,
            "    <div class=\"card\"><h2>{}</h2><p>{}</p></div>",
            escape_html(&card.title),
            escape_html(&card.body)
        );
    }
    html.push_str("</div>\n");
    html
}

fn render_canvas(canvas: &Canvas) -> String {
    format!(
        "<div class=\"chart-container\"><canvas id=\"{}\"></canvas></div>\n",
        escape_html(canvas.id())
    )
}

fn render_results_table(page: &Page) -> String {
    let rows = page.results_table.rows();
    if rows.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"status-summary\">");
    for (status, count) in page.results_table.counts().entries() {
        let _ = write!(html, "<li>{status}: {count}</li>");
    }
    html.push_str("</ul>\n");
    html.push_str(
        "<table>\n<thead><tr><th>Category</th><th>Status</th><th>Benchmark</th><th>Key Metrics</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.category),
            escape_html(&row.status),
            escape_html(&row.benchmark),
            escape_html(&row.key_metrics.join("; "))
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_footer(page: &Page) -> String {
    let mut parts = Vec::new();
    if let Some(generated_at) = &page.generated_at {
        parts.push(format!("Generated: {}", escape_html(generated_at)));
    }
    if let Some(run_dir) = &page.run_dir {
        parts.push(format!("Run: {}", escape_html(run_dir)));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!("<footer>{}</footer>\n", parts.join(" &middot; "))
}

fn render_scripts(page: &Page) -> String {
    let mut script = String::from(
        r#"<script>
function showTab(tab) {
  document.querySelectorAll('.tab').forEach(t => t.style.display = 'none');
  const target = document.getElementById(tab);
  if (target) target.style.display = 'block';
}
"#,
    );
    for canvas in [&page.results_chart, &page.graphics_chart] {
        if let Some(spec) = canvas.chart() {
            let _ = writeln!(
                script,
                "new Chart(document.getElementById('{}').getContext('2d'), {});",
                escape_html(canvas.id()),
                script_json(spec)
            );
        }
    }
    script.push_str("</script>\n");
    script
}

/// Chart config as JSON that is safe to inline inside a `<script>` element.
pub fn script_json(spec: &ChartSpec) -> String {
    serde_json::to_string(spec)
        .unwrap_or_else(|_| "{}".into())
        .replace("</", "<\\/")
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
