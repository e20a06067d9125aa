//! Result presentation: typed outcomes to render-ready blocks
//!
//! Pure mapping with no side effects. The same blocks back the terminal
//! output of the CLI and the browser views.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::form::Outcome;
use crate::models::{ContextAdvisory, PredictionResult, Quantity, RankedList};
use crate::types::Route;

/// Message shown for any transport failure
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Failed to connect to the prediction service. Please try again.";

/// Width of a full (100%) bar in text output
const BAR_WIDTH: usize = 20;

/// One proportional bar of a ranked result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarRow {
    pub sequence: usize,
    pub label: String,
    pub probability: f64,
    /// Bar length as a percentage of the track, clamped to 0..=100
    pub width_percent: f64,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub rows: Vec<BarRow>,
}

/// A single emphasised value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Input rejected before submission
    Invalid,
    /// Service rejected the request content
    Rejected,
    /// No usable reply; resubmitting may help
    Retry,
    /// Non-blocking context degradation
    Advisory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Comma-separated values the service would accept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_values: Option<String>,
}

/// Render-ready form of an outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum RenderBlock {
    Bars(BarChart),
    Highlight(Highlight),
    Notice(Notice),
    /// The session was cleared; navigate instead of rendering inline
    Redirect { to: Route },
}

pub fn render_outcome(outcome: &Outcome) -> RenderBlock {
    match outcome {
        Ok(result) => render_result(result),
        Err(e) => render_error(e),
    }
}

pub fn render_result(result: &PredictionResult) -> RenderBlock {
    match result {
        PredictionResult::RankedList(list) => RenderBlock::Bars(render_ranked(list)),
        PredictionResult::SingleLabel { label } => RenderBlock::Highlight(Highlight {
            value: label.clone(),
            detail: None,
        }),
        PredictionResult::Quantity(quantity) => RenderBlock::Highlight(render_quantity(quantity)),
    }
}

pub fn render_error(error: &PredictionError) -> RenderBlock {
    match error {
        PredictionError::Unauthenticated(e) => RenderBlock::Redirect { to: e.redirect_to() },
        PredictionError::Validation { field, message } => RenderBlock::Notice(Notice {
            kind: NoticeKind::Invalid,
            message: format!("{}: {}", field, message),
            supported_values: None,
        }),
        PredictionError::DomainRejection {
            message,
            supported_values,
        } => RenderBlock::Notice(Notice {
            kind: NoticeKind::Rejected,
            message: message.clone(),
            supported_values: supported_values
                .as_ref()
                .filter(|values| !values.is_empty())
                .map(|values| values.join(", ")),
        }),
        PredictionError::TransportFailure { .. } => RenderBlock::Notice(Notice {
            kind: NoticeKind::Retry,
            message: TRANSPORT_FAILURE_MESSAGE.to_string(),
            supported_values: None,
        }),
    }
}

pub fn render_advisory(advisory: ContextAdvisory) -> Notice {
    Notice {
        kind: NoticeKind::Advisory,
        message: advisory.message().to_string(),
        supported_values: None,
    }
}

fn render_ranked(list: &RankedList) -> BarChart {
    let mut entries = list.entries.clone();
    entries.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    BarChart {
        badge: list.season.as_ref().map(|s| format!("{} Season", s)),
        rows: entries
            .into_iter()
            .map(|entry| BarRow {
                sequence: entry.sequence,
                width_percent: entry.probability.clamp(0.0, 100.0),
                caption: format!("{}%", format_number(entry.probability)),
                label: entry.label,
                probability: entry.probability,
            })
            .collect(),
    }
}

fn render_quantity(quantity: &Quantity) -> Highlight {
    Highlight {
        value: format!("{} {}", format_number(quantity.value), quantity.unit),
        detail: quantity
            .elapsed_hours
            .map(|hours| format!("{} hours since last watering", format_number(hours))),
    }
}

/// Up to two decimals, without trailing zeros
pub fn format_number(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(values) = &self.supported_values {
            write!(f, "\nSupported crops: {}", values)?;
        }
        Ok(())
    }
}

impl fmt::Display for RenderBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderBlock::Bars(chart) => {
                if let Some(badge) = &chart.badge {
                    writeln!(f, "[{}]", badge)?;
                }
                let label_width = chart.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
                for row in &chart.rows {
                    let filled = ((row.width_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
                    writeln!(
                        f,
                        "{:>2}. {:<width$} {}{} {}",
                        row.sequence,
                        row.label,
                        "#".repeat(filled),
                        ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
                        row.caption,
                        width = label_width
                    )?;
                }
                Ok(())
            }
            RenderBlock::Highlight(highlight) => {
                write!(f, "{}", highlight.value)?;
                if let Some(detail) = &highlight.detail {
                    write!(f, "\n{}", detail)?;
                }
                Ok(())
            }
            RenderBlock::Notice(notice) => write!(f, "{}", notice),
            RenderBlock::Redirect { to } => write!(f, "Session ended. Redirecting to {}", to.path()),
        }
    }
}
