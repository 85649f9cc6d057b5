//! Final report assembled from a finished aggregation run.

use serde::Serialize;
use traffic_core::error::Result;
use traffic_core::formatting::{format_day, format_span, format_timestamp};
use traffic_core::models::{
    LeastBusyWindow, OutputFormat, Reading, INTERVAL_MINUTES, WINDOW_SPAN_MINUTES,
};

use crate::aggregator::{DailyTotal, TrafficAggregator};

/// Snapshot of the four aggregates, in the order they are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficReport {
    pub total_cars: u64,
    pub daily_totals: Vec<DailyTotal>,
    pub top_intervals: Vec<Reading>,
    pub least_busy_window: Option<LeastBusyWindow>,
}

impl TrafficReport {
    pub fn from_aggregator(aggregator: &TrafficAggregator) -> Self {
        Self {
            total_cars: aggregator.total_cars(),
            daily_totals: aggregator.daily_totals().to_vec(),
            top_intervals: aggregator.top_three_intervals(),
            least_busy_window: aggregator.least_busy_window().cloned(),
        }
    }

    /// Render in the requested format. Text output ends with a newline.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.to_json(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn render_text(&self) -> String {
        let coverage = format_span(WINDOW_SPAN_MINUTES + INTERVAL_MINUTES);
        let mut lines = vec![format!("Total number of cars: {}", self.total_cars)];

        lines.push(String::new());
        lines.push("Total cars per day:".to_string());
        lines.extend(
            self.daily_totals
                .iter()
                .map(|day| format!("{} {}", format_day(day.day), day.total)),
        );

        lines.push(String::new());
        lines.push(format!("Top {} half hour intervals:", self.top_intervals.len()));
        lines.extend(self.top_intervals.iter().map(|interval| {
            format!("{} {}", format_timestamp(interval.timestamp), interval.count)
        }));

        lines.push(String::new());
        match &self.least_busy_window {
            Some(window) => {
                lines.push(format!("Least busy {} period:", coverage));
                lines.extend(window.intervals.iter().map(|&ts| format_timestamp(ts)));
                lines.push(format!("With a total number of {} cars", window.total));
            }
            None => lines.push(format!("No contiguous {} period found", coverage)),
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
