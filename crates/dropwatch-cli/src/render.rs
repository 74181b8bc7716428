use colored::*;
use dropwatch_core::{
    format_percent, format_ratio, Cell, DerivedSnapshot, QueryKind, SnapshotConfig, TokenAmount,
    UNDEFINED,
};
use dropwatch_network::SnapshotCells;

const AMOUNT_PLACES: usize = 2;
const LABEL_WIDTH: usize = 34;

fn row(label: &str, value: String) -> String {
    format!("  {} {}", format!("{:<width$}", label, width = LABEL_WIDTH).bold(), value)
}

fn heading(title: &str) -> String {
    format!("{}", title.cyan().bold())
}

fn amount(a: TokenAmount) -> String {
    a.format_grouped(AMOUNT_PLACES).cyan().to_string()
}

fn balance_cell(cell: &Cell<TokenAmount>) -> String {
    match cell {
        Cell::Pending => "… loading".dimmed().to_string(),
        Cell::Succeeded(a) => amount(*a),
        Cell::Failed(msg) => format!("✗ {}", msg).red().to_string(),
    }
}

fn price_cell(cell: &Cell<f64>, currency: &str) -> String {
    match cell {
        Cell::Pending => "… loading".dimmed().to_string(),
        Cell::Succeeded(p) => format!("{:.4} {}", p, currency).green().to_string(),
        Cell::Failed(msg) => format!("✗ {}", msg).red().to_string(),
    }
}

fn percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(_) => format_percent(ratio).yellow().to_string(),
        None => UNDEFINED.dimmed().to_string(),
    }
}

fn fiat(value: Option<f64>, currency: &str) -> String {
    match value {
        Some(v) => format!("≈ {:.2} {}", v, currency).green().to_string(),
        None => String::new(),
    }
}

/// Human-readable report of the cells and everything derived from them.
pub fn report(cells: &SnapshotCells, config: &SnapshotConfig) -> String {
    let s = cells.derive(&config.allocation);
    let currency = config.price.currency.to_uppercase();
    let mut lines = Vec::new();

    lines.push(format!(
        "{} {}",
        heading("═══ AIRDROP SNAPSHOT ═══"),
        format!("(refresh #{})", cells.generation).dimmed()
    ));
    lines.push(String::new());

    lines.push(heading("Inputs"));
    for kind in QueryKind::ALL {
        let network = if kind.on_destination() {
            &config.destination.name
        } else {
            &config.origin.name
        };
        lines.push(row(
            &format!("{} ({})", kind.label(), network),
            balance_cell(cells.balance(kind)),
        ));
    }
    lines.push(row(
        &format!("Spot price ({})", config.price.asset_id),
        price_cell(&cells.price, &currency),
    ));
    lines.push(String::new());

    lines.push(heading("Distribution"));
    lines.extend(distribution_rows(&s));
    lines.push(String::new());

    lines.push(heading("Projection (heuristic)"));
    lines.push(row(
        "Bridged / claimed in active phases",
        match s.bridge_ratio {
            Some(_) => format_ratio(s.bridge_ratio).yellow().to_string(),
            None => UNDEFINED.dimmed().to_string(),
        },
    ));
    lines.push(row(
        "Projected extra liquidity",
        format!(
            "{} {}",
            amount(s.projected_extra_liquidity),
            fiat(s.fiat_value(s.projected_extra_liquidity), &currency)
        )
        .trim_end()
        .to_string(),
    ));
    for (label, projected) in s.projection_multiples() {
        lines.push(row(
            &format!("  at {}", label),
            format!("{} {}", amount(projected), fiat(s.fiat_value(projected), &currency))
                .trim_end()
                .to_string(),
        ));
    }
    lines.push(String::new());

    if !cells.is_complete() {
        lines.push(format!("{}", "refresh in progress…".dimmed()));
    }
    let failures = cells.failures();
    if !failures.is_empty() {
        lines.push(format!(
            "{}",
            format!("{} input(s) failed; affected figures use zero", failures.len()).red()
        ));
    }

    lines.join("\n")
}

fn distribution_rows(s: &DerivedSnapshot) -> Vec<String> {
    vec![
        row("Total allocated", amount(s.allocation.total_allocated)),
        row(
            "Claimable in active phases",
            amount(s.allocation.claimable_first_phases),
        ),
        row(
            "Locked in future phases",
            amount(s.allocation.locked_future_phases()),
        ),
        row(
            "Total claimed",
            format!("{} ({})", amount(s.total_claimed), percent(s.percent_claimed_all)),
        ),
        row(
            "Claimed in active phases",
            format!(
                "{} ({})",
                amount(s.claimed_in_first_phases),
                percent(s.percent_claimed_first_phases)
            ),
        ),
        row("Left in active phases", amount(s.left_in_first_phases)),
        row("Left in total", amount(s.left_total)),
        row("Bridged to destination", amount(s.bridged_to_destination)),
        row(
            "Bonded / claimed",
            match s.bonded_over_claimed {
                Some(_) => format_ratio(s.bonded_over_claimed).yellow().to_string(),
                None => UNDEFINED.dimmed().to_string(),
            },
        ),
    ]
}

/// Machine-readable form of the same report. Undefined ratios are `null`.
pub fn json_report(cells: &SnapshotCells, config: &SnapshotConfig) -> serde_json::Value {
    let s = cells.derive(&config.allocation);
    let projections: Vec<serde_json::Value> = s
        .projection_multiples()
        .iter()
        .map(|(label, projected)| {
            serde_json::json!({
                "multiple": label,
                "amount": projected,
                "fiat_value": s.fiat_value(*projected),
            })
        })
        .collect();

    serde_json::json!({
        "generation": cells.generation,
        "complete": cells.is_complete(),
        "currency": config.price.currency,
        "cells": cells,
        "snapshot": s,
        "projections": projections,
    })
}
