use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque renderable result of one delegated question
///
/// The chat boundary never inspects the variant; it only displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Text(String),
    Number(f64),
    Table(AnswerTable),
}

/// A small tabular answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Answer {
    /// Shape a raw model reply into the closest renderable form
    ///
    /// A reply that is one finite number becomes `Number`, a well-formed
    /// Markdown table becomes `Table`, anything else stays `Text`.
    pub fn from_reply(reply: &str) -> Self {
        let trimmed = reply.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Answer::Number(n);
            }
        }
        if let Some(table) = parse_markdown_table(trimmed) {
            return Answer::Table(table);
        }
        Answer::Text(trimmed.to_string())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(text) => write!(f, "{}", text),
            Answer::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Answer::Table(table) => {
                writeln!(f, "| {} |", table.columns.join(" | "))?;
                let separator: Vec<&str> = table.columns.iter().map(|_| "---").collect();
                write!(f, "| {} |", separator.join(" | "))?;
                for row in &table.rows {
                    write!(f, "\n| {} |", row.join(" | "))?;
                }
                Ok(())
            }
        }
    }
}

fn parse_markdown_table(text: &str) -> Option<AnswerTable> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return None;
    }
    if !lines
        .iter()
        .all(|line| line.starts_with('|') && line.ends_with('|'))
    {
        return None;
    }
    if !is_separator_row(lines[1]) {
        return None;
    }

    let columns = split_row(lines[0]);
    if columns.is_empty() {
        return None;
    }

    let mut rows = Vec::new();
    for line in &lines[2..] {
        let cells = split_row(line);
        // A ragged body means this is prose with pipes, not a table
        if cells.len() != columns.len() {
            return None;
        }
        rows.push(cells);
    }

    Some(AnswerTable { columns, rows })
}

fn is_separator_row(line: &str) -> bool {
    let inner = line.trim_matches('|');
    inner.contains('-')
        && inner
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|' | ' '))
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}
