use std::fmt;

/// A single cell in a loaded dataset
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => {
                // Format integers without decimals
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// An in-memory snapshot of the dataset, loaded fresh per request
///
/// The first file row becomes the header; every following row is kept
/// as typed cells in file order. Read-only for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Find the position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a cell; out-of-range coordinates and ragged rows read as Empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display_formats_integers_without_decimals() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(3.25).to_string(), "3.25");
        assert_eq!(CellValue::Number(-7.0).to_string(), "-7");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Text("Bikes".to_string()).to_string(), "Bikes");
    }

    #[test]
    fn test_column_index() {
        let table = Table::new(
            vec!["product_name".to_string(), "quantity".to_string()],
            vec![],
        );
        assert_eq!(table.column_index("quantity"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn test_cell_lookup_tolerates_ragged_rows() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![CellValue::Number(1.0)]],
        );
        assert_eq!(table.cell(0, 0), &CellValue::Number(1.0));
        assert_eq!(table.cell(0, 1), &CellValue::Empty);
        assert_eq!(table.cell(9, 9), &CellValue::Empty);
    }
}
