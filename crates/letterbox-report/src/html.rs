//! Self-contained HTML rendering of a run report

use letterbox_core::Outcome;
use std::fmt::Write;

use crate::report::RunReport;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#242742}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #ddd;padding:.5rem;text-align:left;vertical-align:top}\
.pass{color:#1a7f37}.fail{color:#cf222e}.skipped{color:#9a6700}\
img{max-width:320px;display:block;margin-top:.5rem}";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn render_html(report: &RunReport) -> String {
    let mut rows = String::new();
    for scenario in &report.scenarios {
        let class = match scenario.outcome {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::Skipped => "skipped",
        };
        let artifact = scenario
            .artifact
            .as_ref()
            .map(|path| {
                let path = escape(&path.to_string_lossy());
                format!("<a href=\"{0}\">{0}</a><img src=\"{0}\" alt=\"screenshot\">", path)
            })
            .unwrap_or_default();

        // Writing into a String cannot fail
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{} ms</td><td>{}</td></tr>",
            escape(&scenario.scenario_id),
            escape(&scenario.title),
            class,
            scenario.outcome,
            escape(&scenario.message),
            scenario.duration_ms,
            artifact
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Letterbox report {run_id}</title><style>{style}</style></head><body>\
<h1>Newsletter sign-up suite</h1>\
<p>Target: <code>{url}</code><br>Started: {started}<br>Run: {run_id}</p>\
<p><strong>{summary}</strong></p>\
<table><thead><tr><th>Id</th><th>Scenario</th><th>Outcome</th><th>Message</th><th>Duration</th><th>Screenshot</th></tr></thead>\
<tbody>{rows}</tbody></table></body></html>\n",
        run_id = report.run_id,
        style = STYLE,
        url = escape(&report.target_url),
        started = report.started_at.to_rfc3339(),
        summary = report.summary,
        rows = rows
    )
}
