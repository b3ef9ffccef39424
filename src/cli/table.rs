//! # ASCII Table Formatter
//!
//! Renders REPL output as MySQL-style ASCII tables:
//!
//! ```text
//! +----+---------------------+--------+----------+---------+
//! | pk | date                | amount | category | comment |
//! +----+---------------------+--------+----------+---------+
//! |  7 | 2024-04-10 09:00:00 |    150 | food     | lunch   |
//! +----+---------------------+--------+----------+---------+
//! 1 row in set
//! ```
//!
//! Column width is the widest of the header and every cell, measured in
//! characters, capped at 50 (longer cells end in `...`). Cells that parse
//! as numbers are right-aligned, everything else is left-aligned.

use std::fmt::Write;

const MAX_COLUMN_WIDTH: usize = 50;

pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableFormatter {
    pub fn new<H: AsRef<str>>(headers: &[H], rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| width_of(h).max(1)).collect();

        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(width_of(cell)).min(MAX_COLUMN_WIDTH);
                }
            }
        }

        Self {
            headers,
            widths,
            rows,
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        self.write_separator(&mut output);
        self.write_row(&mut output, &self.headers, false);
        self.write_separator(&mut output);

        for row in &self.rows {
            self.write_row(&mut output, row, true);
        }

        self.write_separator(&mut output);
        let _ = writeln!(output, "{}", row_count_line(self.rows.len()));

        output
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn write_separator(&self, output: &mut String) {
        output.push('+');
        for width in &self.widths {
            output.push_str(&"-".repeat(width + 2));
            output.push('+');
        }
        output.push('\n');
    }

    fn write_row(&self, output: &mut String, cells: &[String], align_numbers: bool) {
        output.push('|');
        for (i, width) in self.widths.iter().copied().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let text = truncate(cell, width);
            let pad = " ".repeat(width - width_of(&text));
            if align_numbers && is_numeric(cell) {
                let _ = write!(output, " {}{} |", pad, text);
            } else {
                let _ = write!(output, " {}{} |", text, pad);
            }
        }
        output.push('\n');
    }
}

pub fn row_count_line(count: usize) -> String {
    match count {
        0 => "Empty set".to_string(),
        1 => "1 row in set".to_string(),
        n => format!("{} rows in set", n),
    }
}

/// Shortest decimal text that reads back as `amount`; whole amounts have
/// no fractional part.
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

fn is_numeric(cell: &str) -> bool {
    !cell.is_empty() && cell.parse::<f64>().is_ok()
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn truncate(s: &str, max_len: usize) -> String {
    if width_of(s) <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let mut result: String = s.chars().take(max_len - 3).collect();
        result.push_str("...");
        result
    }
}
