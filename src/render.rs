//! Plain-text presentation helpers shared by the subcommands and the console.

use chrono::{DateTime, Utc};
use scraper::{Html, Node};

use crate::funnel::FunnelStage;

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn rate(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}%", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Flatten posting HTML into readable text: block elements become line
/// breaks, list items get a bullet.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if collapsed.is_empty() {
                    continue;
                }
                let punctuation = collapsed.starts_with(['.', ',', ';', ':', '!', '?']);
                if !out.is_empty() && !out.ends_with('\n') && !out.ends_with(' ') && !punctuation {
                    out.push(' ');
                }
                out.push_str(&collapsed);
            }
            Node::Element(el) => match el.name() {
                "p" | "div" | "br" | "h1" | "h2" | "h3" | "h4" | "ul" | "ol" => {
                    if !out.is_empty() && !out.ends_with("\n\n") {
                        out.push('\n');
                    }
                }
                "li" => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("- ");
                }
                _ => {}
            },
            _ => {}
        }
    }

    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn wrap(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| textwrap::fill(line, width.max(20)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per stage: label, count, conversion and a proportional bar.
pub fn funnel_chart(stages: &[FunnelStage], width: usize) -> Vec<String> {
    let max = stages.iter().map(|s| s.count).max().unwrap_or(0);
    stages
        .iter()
        .map(|s| {
            let filled = if max == 0 {
                0
            } else {
                ((s.count as f64 / max as f64) * width as f64).round() as usize
            };
            format!(
                "{:<14} {:>7} {:>7}  {}",
                truncate(&s.stage, 14),
                s.count,
                rate(s.conversion_rate),
                "#".repeat(filled)
            )
        })
        .collect()
}

pub fn print_rule(width: usize) {
    println!("{}", "-".repeat(width));
}
