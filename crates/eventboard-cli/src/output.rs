//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{DateTime, Utc};
use colored::*;
use eventboard_derivation::{Classification, EventCosts, MeanRating, Partition, RatingSummary};
use eventboard_domain::{Anomalies, EntitySnapshot, EventId};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the events of a classification.
    pub fn format_classification(
        &self,
        classification: &Classification,
        snapshot: &EntitySnapshot,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(classification)?),
            OutputFormat::Quiet => Ok(quiet_ids(&classification.event_ids)),
            OutputFormat::Table => {
                let mut out = if classification.is_empty() {
                    self.colorize(
                        &format!("No {} events at {}.", classification.class, format_instant(classification.at)),
                        "yellow",
                    )
                } else {
                    self.events_table(&classification.event_ids, snapshot)
                };
                self.append_anomalies(&mut out, &classification.anomalies);
                Ok(out)
            }
        }
    }

    /// Format every class of a partition.
    pub fn format_partition(&self, partition: &Partition, snapshot: &EntitySnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(partition)?),
            OutputFormat::Quiet => Ok(partition
                .groups
                .iter()
                .map(|(class, ids)| format!("{}: {}", class, quiet_ids(ids).replace('\n', " ")))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut sections = Vec::new();
                for (class, ids) in &partition.groups {
                    let heading = self.colorize(&format!("{} ({})", class, ids.len()), "cyan");
                    if ids.is_empty() {
                        sections.push(heading);
                    } else {
                        sections.push(format!("{}\n{}", heading, self.events_table(ids, snapshot)));
                    }
                }
                let mut out = sections.join("\n\n");
                self.append_anomalies(&mut out, &partition.anomalies);
                Ok(out)
            }
        }
    }

    /// Format supplier costs, optionally limited to one event.
    pub fn format_costs(
        &self,
        costs: &EventCosts,
        snapshot: &EntitySnapshot,
        only: Option<EventId>,
    ) -> Result<String> {
        let entries: Vec<_> = costs
            .iter()
            .filter(|entry| only.is_none_or(|id| entry.event_id == id))
            .collect();

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| format!("{} {}", e.event_id, e.cost.total))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No events found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Event", "Name", "Total", "Suppliers", "Items", "Anomalies"]);
                for entry in &entries {
                    builder.push_record([
                        entry.event_id.to_string(),
                        event_name(snapshot, entry.event_id),
                        entry.cost.total.to_string(),
                        entry.cost.supplier_count.to_string(),
                        entry.cost.item_count.to_string(),
                        entry.cost.anomalies.len().to_string(),
                    ]);
                }

                let mut out = self.table(builder);
                let mut anomalies = Anomalies::new();
                for entry in &entries {
                    anomalies.extend(entry.cost.anomalies.clone());
                }

                if only.is_none() {
                    let total = costs
                        .grand_total()
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "overflow".to_string());
                    out.push_str(&format!("\nGrand total: {}", total));
                    anomalies = costs.all_anomalies();
                }
                self.append_anomalies(&mut out, &anomalies);
                Ok(out)
            }
        }
    }

    /// Format mean supplier ratings.
    pub fn format_ratings(&self, ratings: &[RatingSummary], snapshot: &EntitySnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(ratings)?),
            OutputFormat::Quiet => Ok(ratings
                .iter()
                .map(|r| format!("{} {}", r.supplier_id, format_mean(&r.rating)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if ratings.is_empty() {
                    return Ok(self.colorize("No ratings found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Supplier", "Name", "Mean", "Ratings", "Excluded"]);
                let mut anomalies = Anomalies::new();
                for summary in ratings {
                    let name = snapshot
                        .supplier(summary.supplier_id)
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| "?".to_string());
                    builder.push_record([
                        summary.supplier_id.to_string(),
                        name,
                        format_mean(&summary.rating),
                        summary.rating.count().to_string(),
                        summary.anomalies.len().to_string(),
                    ]);
                    anomalies.extend(summary.anomalies.clone());
                }

                let mut out = self.table(builder);
                self.append_anomalies(&mut out, &anomalies);
                Ok(out)
            }
        }
    }

    /// Format a list of anomalies.
    pub fn format_anomalies(&self, anomalies: &Anomalies) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(anomalies)?),
            OutputFormat::Quiet => Ok(anomalies
                .iter()
                .map(|a| format!("{} {}", a.record, a.kind.code()))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if anomalies.is_empty() {
                    return Ok(self.success("No integrity problems found."));
                }

                let mut builder = Builder::default();
                builder.push_record(["Record", "Problem"]);
                for anomaly in anomalies {
                    builder.push_record([anomaly.record.to_string(), anomaly.kind.to_string()]);
                }
                Ok(self.table(builder))
            }
        }
    }

    fn events_table(&self, ids: &[EventId], snapshot: &EntitySnapshot) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Start", "End"]);

        for id in ids {
            let (name, start, end) = match snapshot.event(*id) {
                Some(event) => (
                    event.name.clone(),
                    event.start.map(format_instant).unwrap_or_default(),
                    event.end.map(format_instant).unwrap_or_else(|| "open".to_string()),
                ),
                None => ("?".to_string(), String::new(), String::new()),
            };
            builder.push_record([id.to_string(), name, start, end]);
        }

        self.table(builder)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn append_anomalies(&self, out: &mut String, anomalies: &Anomalies) {
        if !anomalies.is_empty() {
            out.push('\n');
            out.push_str(&self.warning(&format!("Skipped {}", anomalies.summary())));
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn quiet_ids(ids: &[EventId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join("\n")
}

fn event_name(snapshot: &EntitySnapshot, id: EventId) -> String {
    snapshot
        .event(id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| "?".to_string())
}

/// Format an instant for display.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a mean rating for display.
pub fn format_mean(rating: &MeanRating) -> String {
    match rating {
        MeanRating::NoData => "no data".to_string(),
        MeanRating::Mean { value, .. } => format!("{:.2}", value),
    }
}
