use super::model::{ComparisonRow, HistoryEntry};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

fn status_cell(status: Option<u16>) -> Cell {
    match status {
        Some(code) => {
            let color = if code < 400 { Color::Green } else { Color::Red };
            Cell::new(code).fg(color)
        }
        None => Cell::new("Error").fg(Color::Red),
    }
}

/// 历史列表，ID 为记录在列表中的位置
pub fn history_table<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "ID",
        "Time",
        "Method",
        "URL",
        "Status",
        "Duration",
        "Assertions",
    ]);

    for (index, entry) in entries.into_iter().enumerate() {
        let summary = entry.assertion_summary();
        let assertions = if summary.total == 0 {
            Cell::new("-").add_attribute(Attribute::Dim)
        } else if summary.all_passed() {
            Cell::new(summary).fg(Color::Green)
        } else {
            Cell::new(summary).fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new(index),
            Cell::new(entry.timestamp.format("%H:%M:%S")),
            Cell::new(entry.request.method),
            Cell::new(&entry.request.url).add_attribute(Attribute::Dim),
            status_cell(entry.response.status_code),
            Cell::new(format!("{}ms", entry.response.elapsed_ms)),
            assertions,
        ]);
    }

    table
}

/// 多条记录的耗时与大小对比
pub fn comparison_table(rows: &[ComparisonRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Request", "Status", "Time (ms)", "Size (KB)"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.request),
            status_cell(row.status_code),
            Cell::new(format!("{:.2}", row.elapsed_ms)),
            Cell::new(format!("{:.2}", row.size_kb)),
        ]);
    }

    table
}

pub fn print_history<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) {
    println!("{}", history_table(entries));
}

pub fn print_comparison(rows: &[ComparisonRow]) {
    println!("{}", comparison_table(rows));
}
