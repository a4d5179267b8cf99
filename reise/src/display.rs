//! Plain-text rendering for the terminal.
//!
//! Each record is first turned into a view holding the strings to print,
//! then the views are laid out in aligned columns.

use crate::domain::{DepartureRecord, ModeSet, StopRecord};

/// A departure ready for printing.
#[derive(Debug, Clone)]
pub struct DepartureView {
    pub line: String,
    pub mode: String,
    pub destination: String,
    pub scheduled_time: String,
    pub expected_time: Option<String>,
    pub delay_minutes: Option<i64>,
}

impl DepartureView {
    pub fn from_departure(departure: &DepartureRecord) -> Self {
        Self {
            line: departure.line_name.clone(),
            mode: departure.mode.to_string(),
            destination: departure.destination.clone(),
            scheduled_time: departure.scheduled_time.format("%H:%M:%S").to_string(),
            expected_time: departure
                .realtime_time
                .map(|t| t.format("%H:%M:%S").to_string()),
            delay_minutes: departure.delay_minutes(),
        }
    }

    /// The time to display (expected if available, else scheduled).
    pub fn display_time(&self) -> &str {
        self.expected_time
            .as_deref()
            .unwrap_or(&self.scheduled_time)
    }

    pub fn is_delayed(&self) -> bool {
        self.delay_minutes.is_some_and(|d| d != 0)
    }

    fn remark(&self) -> String {
        match self.delay_minutes {
            Some(d) if d > 0 => format!("+{d} min"),
            Some(d) if d < 0 => format!("{d} min"),
            _ => String::new(),
        }
    }
}

/// Departure board for one stop.
pub fn departures(stop: &StopRecord, departures: &[DepartureRecord]) -> String {
    let views: Vec<DepartureView> = departures
        .iter()
        .map(DepartureView::from_departure)
        .collect();

    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|v| {
            vec![
                v.display_time().to_string(),
                v.line.clone(),
                v.mode.clone(),
                v.destination.clone(),
                v.remark(),
            ]
        })
        .collect();

    let mut out = format!("{} ({})\n\n", heading(stop), stop.stop_id);
    out.push_str(&table(&["Time", "Line", "Mode", "Destination", ""], &rows));
    out
}

/// Message when filtering left nothing to show.
pub fn no_departures(stop: &StopRecord, modes: &ModeSet) -> String {
    if modes.is_all() {
        format!("No departures from {} right now.\n", heading(stop))
    } else {
        format!("No {modes} departures from {} right now.\n", heading(stop))
    }
}

/// All cached stops, in cache order.
pub fn stop_list<'a>(stops: impl IntoIterator<Item = &'a StopRecord>) -> String {
    let rows: Vec<Vec<String>> = stops
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                i.to_string(),
                s.alias.clone(),
                s.canonical_name.clone(),
                s.stop_id.to_string(),
            ]
        })
        .collect();

    if rows.is_empty() {
        return "No stops cached.\n".to_string();
    }
    table(&["#", "Name", "Stop", "Stop ID"], &rows)
}

/// Everything cached about one stop.
pub fn stop_info(stop: &StopRecord) -> String {
    let coordinates = match (stop.latitude, stop.longitude) {
        (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
        _ => "-".to_string(),
    };
    let modes = if stop.modes_available.is_empty() {
        "-".to_string()
    } else {
        stop.modes_available
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    let fields = [
        ("Name", stop.alias.clone()),
        ("Stop", stop.canonical_name.clone()),
        ("Stop ID", stop.stop_id.to_string()),
        ("Label", or_dash(&stop.label)),
        ("County", or_dash(&stop.county)),
        ("Coordinates", coordinates),
        ("Modes", modes),
    ];

    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}\n"))
        .collect()
}

fn heading(stop: &StopRecord) -> String {
    if stop.label.is_empty() {
        stop.canonical_name.clone()
    } else {
        stop.label.clone()
    }
}

/// Lay out rows in left-aligned columns separated by two spaces.
/// Trailing blanks are trimmed from every line.
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        let mut line = String::new();
        for (cell, width) in cells.iter().zip(&widths) {
            let pad = width - cell.chars().count();
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 2));
        }
        let mut line = line.trim_end().to_string();
        line.push('\n');
        line
    };

    let mut out = render(header.to_vec());
    for row in rows {
        out.push_str(&render(row.iter().map(String::as_str).collect()));
    }
    out
}
