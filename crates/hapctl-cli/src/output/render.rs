//! Human-readable statistics tables.

use std::io::{self, Write};

use hapctl_core::{ProxyGroup, ServerRecord};
use unicode_width::UnicodeWidthStr;

const HEADINGS: [&str; 6] = ["SERVICE", "STATUS", "WEIGHT", "STATE", "BAND", "DOWNTIME"];
const INDENT: &str = "  ";
const GAP: &str = "  ";
const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Formats accumulated downtime as `HH:MMh`, or `-` when unknown.
#[must_use]
pub fn format_downtime(seconds: Option<u64>) -> String {
    seconds.map_or_else(
        || String::from("-"),
        |total| {
            let hours = total.div_euclid(SECONDS_PER_HOUR);
            let minutes = total
                .rem_euclid(SECONDS_PER_HOUR)
                .div_euclid(SECONDS_PER_MINUTE);
            format!("{hours:02}:{minutes:02}h")
        },
    )
}

/// Writes one table per proxy, separated by blank lines.
pub(super) fn write_tables<W: Write>(out: &mut W, groups: &[ProxyGroup]) -> io::Result<()> {
    if groups.is_empty() {
        return writeln!(out, "no statistics returned");
    }

    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        write_group(out, group)?;
    }
    Ok(())
}

fn write_group<W: Write>(out: &mut W, group: &ProxyGroup) -> io::Result<()> {
    let rows: Vec<[String; 6]> = group.records.iter().map(table_row).collect();
    let headings = HEADINGS.map(String::from);

    let mut widths = [0_usize; 6];
    for row in std::iter::once(&headings).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    writeln!(out, "{}", group.name)?;
    write_row(out, &headings, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn table_row(record: &ServerRecord) -> [String; 6] {
    let weight = record
        .weight()
        .map_or_else(|| String::from("-"), |value| value.to_string());
    [
        record.service_name().to_owned(),
        record.status().to_owned(),
        weight,
        record.state().to_string(),
        record.weight_band().to_string(),
        format_downtime(record.downtime()),
    ]
}

fn write_row<W: Write>(out: &mut W, cells: &[String; 6], widths: &[usize; 6]) -> io::Result<()> {
    let mut line = String::from(INDENT);
    let last = cells.len().saturating_sub(1);
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        line.push_str(cell);
        if index < last {
            let padding = width.saturating_sub(cell.width());
            line.extend(std::iter::repeat_n(' ', padding));
            line.push_str(GAP);
        }
    }
    writeln!(out, "{line}")
}
