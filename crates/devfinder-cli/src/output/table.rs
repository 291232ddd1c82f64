//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use super::OutputFormatter;
use devfinder_core::types::{DeviceDetail, DeviceSummary, SearchResponse, SearchSession};
use devfinder_core::CatalogSnapshot;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn price(price: Option<f64>) -> String {
        price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string())
    }

    fn score(score: Option<f64>) -> String {
        score
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string())
    }

    fn key_specs(summary: &DeviceSummary) -> String {
        summary
            .specs
            .iter()
            .take(3)
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn device_table<'a>(rows: impl Iterator<Item = (&'a DeviceSummary, Option<f64>)>) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Title", "Price", "Score", "Specs"]);

        for (summary, score) in rows {
            table.add_row(vec![
                Cell::new(&summary.id),
                Cell::new(&summary.title),
                Cell::new(Self::price(summary.price)),
                Cell::new(Self::score(score)),
                Cell::new(Self::key_specs(summary)),
            ]);
        }

        table
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_catalog(&self, catalog: &CatalogSnapshot) -> String {
        let mut lines = Vec::new();

        if catalog.is_error {
            lines.push(format!(
                "{} catalog could not be refreshed, showing last known data",
                "[!]".yellow()
            ));
        }

        if catalog.devices.is_empty() {
            lines.push("No devices in catalog.".to_string());
            return lines.join("\n");
        }

        let table = Self::device_table(catalog.devices.iter().map(|d| (d, None)));
        lines.push(format!("{}\n\n{} device(s)", table, catalog.devices.len()));
        lines.join("\n")
    }

    fn format_detail(&self, detail: &DeviceDetail) -> String {
        let summary = &detail.summary;
        let mut lines = Vec::new();

        lines.push(format!("Device: {} ({})", summary.title.bold(), summary.id));
        lines.push(format!("  Price:      {}", Self::price(summary.price)));

        if !summary.specs.is_empty() {
            lines.push("  Specs:".to_string());
            for (key, value) in &summary.specs {
                lines.push(format!("    {:<12} {}", key, value));
            }
        }

        if !summary.images.is_empty() {
            lines.push(format!("  Images:     {}", summary.images.len()));
            for url in &summary.images {
                lines.push(format!("    {}", url));
            }
        }

        if detail.has_match_explanation() {
            lines.push(String::new());
            lines.push("  Match:".to_string());
            lines.push(format!("    Spec fit:       {}", Self::score(detail.spec_score)));
            lines.push(format!("    Opinion match:  {}", Self::score(detail.opinion_score)));

            if let Some(breakdown) = &detail.score_breakdown {
                let mut table = Table::new();
                table.set_header(vec!["Criterion", "Score", "Weight"]);
                for (criterion, score) in breakdown {
                    let weight = detail
                        .category_weights
                        .as_ref()
                        .and_then(|w| w.get(criterion))
                        .copied();
                    let color = if *score >= 0.5 { Color::Green } else { Color::Yellow };
                    table.add_row(vec![
                        Cell::new(criterion),
                        Cell::new(format!("{:.2}", score)).fg(color),
                        Cell::new(Self::score(weight)),
                    ]);
                }
                lines.push(format!("{}", table));
            }
        }

        lines.join("\n")
    }

    fn format_search(&self, response: &SearchResponse) -> String {
        match response {
            SearchResponse::Ask { text } => format!("{} {}", "?".cyan().bold(), text),
            SearchResponse::Result(devices) if devices.is_empty() => {
                "No matching devices.".to_string()
            }
            SearchResponse::Result(devices) => {
                let table = Self::device_table(devices.iter().map(|d| (&d.summary, d.spec_score)));
                format!("{}\n\n{} match(es)", table, devices.len())
            }
        }
    }

    fn format_session(&self, session: &SearchSession) -> String {
        let mut lines = Vec::new();

        let console = if session.console_input.is_empty() {
            "-".to_string()
        } else {
            session.console_input.clone()
        };
        lines.push(format!("Console input: {}", console));

        if session.selectors.is_empty() {
            lines.push("Selectors:     none".to_string());
        } else {
            lines.push("Selectors:".to_string());
            for (key, value) in session.selectors.iter() {
                lines.push(format!("  {:<12} {}", key, value));
            }
        }

        if session.criteria.is_empty() {
            lines.push("Criteria:      none".to_string());
        } else {
            lines.push("Criteria:".to_string());
            for (i, criterion) in session.criteria.iter().enumerate() {
                lines.push(format!("  {}. [{}] {}", i + 1, criterion.kind, criterion.description));
            }
        }

        if !session.request_id.is_empty() {
            lines.push(format!("Request:       {}", session.request_id));
        }

        lines.join("\n")
    }

    fn format_value(&self, value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_default()
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devfinder_core::types::{SearchCriterion, SelectorKey};
    use std::collections::BTreeMap;

    fn detail() -> DeviceDetail {
        DeviceDetail {
            summary: DeviceSummary {
                id: "p7".to_string(),
                title: "Pixel 7".to_string(),
                images: vec!["https://img.example/p7.png".to_string()],
                specs: BTreeMap::from([("ram".to_string(), "8 GB".to_string())]),
                price: Some(599.0),
            },
            spec_score: Some(0.87),
            opinion_score: Some(0.6),
            score_breakdown: Some(BTreeMap::from([("camera".to_string(), 0.9)])),
            category_weights: Some(BTreeMap::from([("camera".to_string(), 0.5)])),
        }
    }

    #[test]
    fn test_format_detail_includes_match() {
        colored::control::set_override(false);
        let text = TableOutput::new().format_detail(&detail());

        assert!(text.contains("Pixel 7 (p7)"));
        assert!(text.contains("599.00"));
        assert!(text.contains("Spec fit:       0.87"));
        assert!(text.contains("camera"));
    }

    #[test]
    fn test_format_search_ask() {
        colored::control::set_override(false);
        let text = TableOutput::new().format_search(&SearchResponse::Ask {
            text: "Which budget?".to_string(),
        });
        assert_eq!(text, "? Which budget?");
    }

    #[test]
    fn test_format_session() {
        let mut session = SearchSession::default();
        session.console_input = "small phone".to_string();
        session.selectors.insert(SelectorKey::Ram, "6");
        session.criteria.push(SearchCriterion::new("size", "compact"));

        let text = TableOutput::new().format_session(&session);
        assert!(text.contains("Console input: small phone"));
        assert!(text.contains("ram"));
        assert!(text.contains("1. [size] compact"));
    }
}
