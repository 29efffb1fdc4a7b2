// Plain-text rendering of tables for the terminal
use crate::domain::table::{Column, Frame};
use std::fmt::Write;

const INDEX_HEADER: &str = "timestamp";

pub fn render_column(column: &Column) -> String {
    let header = vec![
        INDEX_HEADER.to_string(),
        column.name.clone().unwrap_or_else(|| "value".to_string()),
    ];
    let rows = column
        .iter()
        .map(|(ts, value)| vec![ts.to_iso_string(), format_value(value)])
        .collect();
    render_grid(header, rows)
}

pub fn render_frame(frame: &Frame) -> String {
    let header = std::iter::once(INDEX_HEADER.to_string())
        .chain(frame.columns.iter().cloned())
        .collect();
    let rows = frame
        .index
        .iter()
        .zip(&frame.rows)
        .map(|(ts, row)| {
            std::iter::once(ts.to_iso_string())
                .chain(row.iter().map(|v| format_value(*v)))
                .collect()
        })
        .collect();
    render_grid(header, rows)
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}

/// Left-align the first cell of every line and right-align the rest.
fn render_grid(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(&rows) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamp::Timestamp;

    #[test]
    fn test_render_column() {
        let column = Column::new(
            None,
            vec![Timestamp::raw("2024-01-01T00:00:00Z")],
            vec![5.0],
        );
        assert_eq!(
            render_column(&column),
            "timestamp             value\n2024-01-01T00:00:00Z      5\n"
        );
    }

    #[test]
    fn test_render_frame_aligns_columns() {
        let frame = Frame::new(
            vec!["consumption".to_string(), "pv".to_string()],
            vec![
                Timestamp::raw("2024-01-01T00:00:00Z"),
                Timestamp::raw("2024-01-01T00:15:00Z"),
            ],
            vec![vec![0.25, 1.5], vec![12.0, f64::NAN]],
        );
        let text = render_frame(&frame);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp             consumption   pv");
        assert_eq!(lines[1], "2024-01-01T00:00:00Z         0.25  1.5");
        assert_eq!(lines[2], "2024-01-01T00:15:00Z           12  NaN");
    }
}
