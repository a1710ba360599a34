use std::collections::BTreeMap;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::api::keywords::ServerKeywords;
use crate::config::DeadlineConfig;
use crate::models::{ClassificationResult, ClassifiedTender, Unit};
use crate::stats::TenderStats;
use crate::tender::keywords::default_keywords;

/// Print a classification: the unit name alone, or the per-unit evidence.
pub fn render_classification(result: &ClassificationResult, explain: bool) {
    if !explain {
        println!("{}", result.unit);
        return;
    }

    println!("\n {} {}\n", "Unit:".bold(), colorize_unit(result.unit));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Unit").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Matched keywords").add_attribute(Attribute::Bold),
        ]);

    for unit in Unit::SCORABLE {
        let mut name = Cell::new(unit.to_string());
        if unit == result.unit {
            name = name.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            name,
            Cell::new(result.score(unit)).set_alignment(CellAlignment::Right),
            Cell::new(result.matched(unit).join(", ")),
        ]);
    }

    println!("{}", table);
}

/// Render the tender table with a summary box of local classifications.
pub fn render_tenders(rows: &[ClassifiedTender], verbose: bool, quiet: bool) {
    let total = rows.len();
    let mismatches = rows.iter().filter(|r| r.is_mismatch()).count();

    let mut per_unit: BTreeMap<Unit, usize> = BTreeMap::new();
    for row in rows {
        *per_unit.entry(row.classification.unit).or_insert(0) += 1;
    }
    let breakdown: Vec<String> = per_unit
        .iter()
        .map(|(unit, count)| format!("{} ({})", unit, count))
        .collect();

    if quiet {
        println!(
            "Total: {}  Mismatch: {}  {}",
            total,
            if mismatches > 0 {
                mismatches.to_string().red()
            } else {
                mismatches.to_string().green()
            },
            breakdown.join(", "),
        );
        return;
    }

    println!("\n {} v{}", "tender-classifier".bold(), env!("CARGO_PKG_VERSION"));
    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total tenders   : {}", total));
    println!(" │  {:<48} │", format!("Mismatched unit : {}", mismatches));
    for (unit, count) in &per_unit {
        println!(" │  {:<48} │", format!("  {:<14}: {:>4}", unit.to_string(), count));
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    if rows.is_empty() {
        println!(" No tenders found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Country").add_attribute(Attribute::Bold),
        Cell::new("Deadline").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Server unit").add_attribute(Attribute::Bold),
        Cell::new("Local unit").add_attribute(Attribute::Bold),
    ];
    if verbose {
        header.push(Cell::new("Evidence").add_attribute(Attribute::Bold));
    }
    table.set_header(header);

    for row in rows {
        let local = row.classification.unit;
        let local_cell = if row.is_mismatch() {
            Cell::new(format!("✗ {}", local)).fg(Color::Red)
        } else {
            Cell::new(local.to_string()).fg(unit_color(local))
        };

        let mut cells = vec![
            Cell::new(&row.tender.title),
            Cell::new(&row.tender.country),
            Cell::new(&row.tender.deadline),
            Cell::new(format!("{:.0}", row.tender.score)).set_alignment(CellAlignment::Right),
            Cell::new(&row.tender.unit),
            local_cell,
        ];
        if verbose {
            cells.push(Cell::new(row.classification.matched(local).join(", ")));
        }
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Print the deadline statistics.
pub fn render_stats(stats: &TenderStats, windows: &DeadlineConfig) {
    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "DEADLINES".bold());
    println!(
        " │  {:<48} │",
        format!(
            "{}  Urgent   (≤ {:>2} days) : {:>4}",
            "⚠".yellow(),
            windows.urgent_days,
            stats.urgent_tenders
        )
    );
    println!(
        " │  {:<48} │",
        format!("   Total notices       : {:>4}", stats.total_notices)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Critical (≤ {:>2} days) : {:>4}",
            "✗".red(),
            windows.critical_days,
            stats.upcoming_deadlines
        )
    );
    println!(" └────────────────────────────────────────────────────┘");
}

/// Print the server keyword configuration, one row per unit.
pub fn render_keywords(keywords: &ServerKeywords) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Unit").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Related").add_attribute(Attribute::Bold),
    ];
    if keywords.split {
        header.push(Cell::new("Unrelated").add_attribute(Attribute::Bold));
    }
    table.set_header(header);

    for unit in Unit::SCORABLE {
        let related = keywords.related(unit);
        let mut cells = vec![
            Cell::new(unit.to_string()).fg(unit_color(unit)),
            Cell::new(related.len()).set_alignment(CellAlignment::Right),
            Cell::new(related.join(", ")),
        ];
        if keywords.split {
            let unrelated = keywords
                .units
                .get(&unit)
                .map(|k| k.unrelated.join(", "))
                .unwrap_or_default();
            cells.push(Cell::new(unrelated).fg(Color::DarkGrey));
        }
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Print the built-in keyword tables.
pub fn render_defaults() {
    for unit in Unit::SCORABLE {
        let defaults = default_keywords(unit);
        println!(
            "{} {}",
            unit.to_string().bold(),
            format!("({} keywords)", defaults.len()).dimmed()
        );
        println!("  {}\n", defaults.join(", "));
    }
}

fn unit_color(unit: Unit) -> Color {
    match unit {
        Unit::IoT => Color::Cyan,
        Unit::Experience => Color::Magenta,
        Unit::Marine => Color::Blue,
        Unit::Target => Color::Yellow,
        Unit::BisanEmira => Color::Green,
        Unit::Other => Color::DarkGrey,
    }
}

fn colorize_unit(unit: Unit) -> ColoredString {
    let name = unit.to_string();
    match unit {
        Unit::IoT => name.cyan().bold(),
        Unit::Experience => name.magenta().bold(),
        Unit::Marine => name.blue().bold(),
        Unit::Target => name.yellow().bold(),
        Unit::BisanEmira => name.green().bold(),
        Unit::Other => name.dimmed(),
    }
}
