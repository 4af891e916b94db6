use chrono::{DateTime, NaiveDate};

use crate::models::{wire_date, Tone};

/// Raw value pulled out of a row by a column accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    /// Timestamp string as sent by the backend.
    Timestamp(String),
    Status { label: &'static str, tone: Tone },
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::Text(v.to_string()),
            _ => Self::Empty,
        }
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Empty, Self::Date)
    }

    pub fn opt_timestamp(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |v| Self::Timestamp(v.to_string()))
    }

    /// Plain text matched by client-side search.
    pub fn search_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) | Self::Timestamp(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Status { label, .. } => (*label).to_string(),
        }
    }
}

/// How a cell is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRenderer {
    Text,
    /// Cut to at most `n` characters with an ellipsis.
    Truncate(usize),
    Currency,
    Date,
    DateTime,
    StatusPill,
}

/// Rendered cell. `tone` is set only for status pills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Option<Tone>,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self { text, tone: None }
    }
}

const EMPTY_CELL: &str = "-";

pub fn render_cell(renderer: CellRenderer, value: &CellValue) -> Cell {
    if *value == CellValue::Empty {
        return Cell::plain(EMPTY_CELL.into());
    }
    match (renderer, value) {
        (CellRenderer::StatusPill, CellValue::Status { label, tone }) => Cell {
            text: humanize(label),
            tone: Some(*tone),
        },
        (CellRenderer::Currency, CellValue::Number(n)) => Cell::plain(format_naira(*n)),
        (CellRenderer::Date | CellRenderer::DateTime, CellValue::Date(d)) => Cell::plain(format_date(*d)),
        (CellRenderer::Date, CellValue::Timestamp(raw)) => Cell::plain(
            wire_date::parse(raw).map_or_else(|| raw.clone(), format_date),
        ),
        (CellRenderer::DateTime, CellValue::Timestamp(raw)) => Cell::plain(format_timestamp(raw)),
        (CellRenderer::Truncate(max), other) => Cell::plain(truncate(&other.search_text(), max)),
        (_, other) => Cell::plain(other.search_text()),
    }
}

/// `no_show` → `No show`.
fn humanize(label: &str) -> String {
    let spaced = label.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('…');
    out
}

fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => ts.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => wire_date::parse(raw).map_or_else(|| raw.to_string(), format_date),
    }
}

/// `₦12,500.00`.
pub fn format_naira(amount: f64) -> String {
    let kobo = (amount.abs() * 100.0).round() as u64;
    let digits = (kobo / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && kobo > 0 { "-" } else { "" };
    format!("{sign}₦{grouped}.{:02}", kobo % 100)
}

/// One table column: header, accessor and renderer.
pub struct ColumnDef<R> {
    pub id: &'static str,
    pub header: &'static str,
    pub accessor: fn(&R) -> CellValue,
    pub renderer: CellRenderer,
    /// Included in client-side search.
    pub searchable: bool,
}

impl<R> ColumnDef<R> {
    pub fn new(id: &'static str, header: &'static str, accessor: fn(&R) -> CellValue) -> Self {
        Self {
            id,
            header,
            accessor,
            renderer: CellRenderer::Text,
            searchable: false,
        }
    }

    pub fn render_as(mut self, renderer: CellRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    pub fn cell(&self, row: &R) -> Cell {
        render_cell(self.renderer, &self.value(row))
    }
}
