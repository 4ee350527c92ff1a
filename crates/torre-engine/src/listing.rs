//! Flight plan listing: sort orders and the console table.

use std::cmp::Reverse;
use std::fmt::Write as _;

use torre_core::{FlightCategory, FlightPlan};

/// Sort orders offered by the listing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    FlightId,
    DepartureTime,
    /// Emergencies, then commercial, then cargo; priority and ETD break ties.
    Category,
    /// Emergencies first regardless of value, then priority descending.
    Priority,
}

pub fn sort_plans(plans: &mut [FlightPlan], order: ListOrder) {
    match order {
        ListOrder::FlightId => plans.sort_by(|a, b| a.flight_id.cmp(&b.flight_id)),
        ListOrder::DepartureTime => plans.sort_by_key(|p| p.departure_time),
        ListOrder::Category => {
            plans.sort_by_key(|p| (p.category.rank(), Reverse(p.priority), p.departure_time))
        }
        ListOrder::Priority => plans.sort_by_key(|p| {
            (
                p.category != FlightCategory::Emergency,
                Reverse(p.priority),
                p.departure_time,
            )
        }),
    }
}

const HEADERS: [&str; 9] = [
    "FLIGHT", "ORIGIN", "DEST", "ETD", "ETA", "AIRCRAFT", "CATEGORY", "PRIO", "RUNWAY",
];

/// Render plans as an aligned text table, headers included.
pub fn render_plans_table(plans: &[FlightPlan]) -> String {
    let rows: Vec<[String; 9]> = plans
        .iter()
        .map(|p| {
            [
                p.flight_id.clone(),
                p.origin.clone(),
                p.destination.clone(),
                p.departure_time.format("%H:%M").to_string(),
                p.arrival_time.format("%H:%M").to_string(),
                p.aircraft_type.clone(),
                p.category.as_str().to_string(),
                p.priority.to_string(),
                p.preferred_runway.clone(),
            ]
        })
        .collect();

    let mut widths: [usize; 9] = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(String::from), &widths);
    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "-".repeat(total));
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 9], widths: &[usize; 9]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
