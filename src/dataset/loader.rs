use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use super::table::{CellValue, Table};
use crate::utils::TableTalkError;

/// Reads the dataset file from disk into a `Table`
///
/// There is deliberately no caching here: `load` re-reads the file on every
/// call, so edits to the spreadsheet between questions are picked up by the
/// next turn.
pub struct DatasetLoader {
    path: PathBuf,
    sheet: Option<String>,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    /// Restrict workbook loading to a named sheet (default: first sheet)
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the dataset from disk
    pub fn load(&self) -> Result<Table, TableTalkError> {
        // Open the file first so missing/unreadable paths surface as access
        // errors rather than parse errors
        let file = File::open(&self.path).map_err(|source| TableTalkError::FileAccess {
            path: self.path.clone(),
            source,
        })?;

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let table = match extension.as_str() {
            "xlsx" | "xls" | "xlsb" | "ods" => {
                drop(file); // calamine reopens by path
                self.load_workbook()?
            }
            "csv" => self.load_csv(file)?,
            other => {
                return Err(TableTalkError::Format {
                    path: self.path.clone(),
                    message: format!("unsupported dataset extension '{}'", other),
                })
            }
        };

        debug!(
            "loaded {} ({} rows, {} columns)",
            self.path.display(),
            table.n_rows(),
            table.n_cols()
        );
        Ok(table)
    }

    fn load_workbook(&self) -> Result<Table, TableTalkError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| TableTalkError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| TableTalkError::Format {
                    path: self.path.clone(),
                    message: "workbook contains no sheets".to_string(),
                })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| TableTalkError::Format {
                path: self.path.clone(),
                message: format!("cannot read sheet '{}': {}", sheet_name, e),
            })?;

        let mut file_rows = range.rows();
        let columns = match file_rows.next() {
            Some(header) => header
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => Vec::new(),
        };
        let rows = file_rows
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(Table::new(columns, rows))
    }

    fn load_csv(&self, file: File) -> Result<Table, TableTalkError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<CellValue>> = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| TableTalkError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
            if idx == 0 {
                columns = record.iter().map(|field| field.trim().to_string()).collect();
            } else {
                rows.push(record.iter().map(sniff_cell).collect());
            }
        }

        Ok(Table::new(columns, rows))
    }
}

/// Convert one calamine cell into the typed model
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            // Render date cells as text so downstream prompt context stays
            // readable instead of showing raw Excel serials
            let has_time = dt.as_f64().fract().abs() > 0.0001;
            match dt.as_datetime() {
                Some(when) if has_time => {
                    CellValue::Text(when.format("%Y-%m-%d %H:%M:%S").to_string())
                }
                Some(when) => CellValue::Text(when.format("%Y-%m-%d").to_string()),
                None => CellValue::Number(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Type-sniff a CSV field: numbers and booleans are promoted, everything else stays text
fn sniff_cell(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed {
        "true" | "TRUE" | "True" => return CellValue::Bool(true),
        "false" | "FALSE" | "False" => return CellValue::Bool(false),
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return CellValue::Number(n);
    }
    CellValue::Text(field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_csv_cells_are_type_sniffed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "sales.csv",
            "product_name,quantity,unit_price,discontinued,note\n\
             Mountain-200,3,2319.99,false,\n\
             Road-150,1,3578.27,true,rush order\n",
        );

        let table = DatasetLoader::new(&path).load().unwrap();

        assert_eq!(
            table.columns,
            vec![
                "product_name",
                "quantity",
                "unit_price",
                "discontinued",
                "note"
            ]
        );
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.cell(0, 0), &CellValue::Text("Mountain-200".to_string()));
        assert_eq!(table.cell(0, 1), &CellValue::Number(3.0));
        assert_eq!(table.cell(0, 2), &CellValue::Number(2319.99));
        assert_eq!(table.cell(0, 3), &CellValue::Bool(false));
        assert_eq!(table.cell(0, 4), &CellValue::Empty);
        assert_eq!(table.cell(1, 4), &CellValue::Text("rush order".to_string()));
    }

    #[test]
    fn test_loading_twice_yields_identical_tables() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "sales.csv", "a,b\n1,x\n2,y\n");

        let loader = DatasetLoader::new(&path);
        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_reload_sees_file_changes() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "sales.csv", "a,b\n1,x\n");

        let loader = DatasetLoader::new(&path);
        assert_eq!(loader.load().unwrap().n_rows(), 1);

        fs::write(&path, "a,b\n1,x\n2,y\n3,z\n").unwrap();
        assert_eq!(loader.load().unwrap().n_rows(), 3);
    }

    #[test]
    fn test_missing_file_is_an_access_error() {
        let dir = TempDir::new().unwrap();
        let loader = DatasetLoader::new(dir.path().join("absent.xlsx"));

        let err = loader.load().unwrap_err();
        assert!(matches!(err, TableTalkError::FileAccess { .. }), "{err}");
    }

    #[test]
    fn test_unsupported_extension_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "sales.txt", "a,b\n1,2\n");

        let err = DatasetLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, TableTalkError::Format { .. }), "{err}");
    }

    #[test]
    fn test_invalid_utf8_csv_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, [b'a', b',', b'b', b'\n', 0xff, 0xfe, b'\n']).unwrap();

        let err = DatasetLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, TableTalkError::Format { .. }), "{err}");
    }

    #[test]
    fn test_xlsx_loading_reads_header_and_typed_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "product_name").unwrap();
        sheet.write_string(0, 1, "quantity").unwrap();
        sheet.write_string(0, 2, "shipped").unwrap();
        sheet.write_string(1, 0, "Mountain-200").unwrap();
        sheet.write_number(1, 1, 3).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        workbook.save(&path).unwrap();

        let table = DatasetLoader::new(&path).load().unwrap();

        assert_eq!(table.columns, vec!["product_name", "quantity", "shipped"]);
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.cell(0, 0), &CellValue::Text("Mountain-200".to_string()));
        assert_eq!(table.cell(0, 1), &CellValue::Number(3.0));
        assert_eq!(table.cell(0, 2), &CellValue::Bool(true));
    }

    #[test]
    fn test_named_sheet_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("multi.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "ignore_me").unwrap();
        let second = workbook.add_worksheet();
        second.set_name("orders").unwrap();
        second.write_string(0, 0, "sales_order_number").unwrap();
        second.write_string(1, 0, "SO43659").unwrap();
        workbook.save(&path).unwrap();

        let table = DatasetLoader::new(&path)
            .with_sheet("orders")
            .load()
            .unwrap();

        assert_eq!(table.columns, vec!["sales_order_number"]);
        assert_eq!(table.cell(0, 0), &CellValue::Text("SO43659".to_string()));
    }

    #[test]
    fn test_csv_type_sniffing_rules() {
        assert_eq!(sniff_cell(""), CellValue::Empty);
        assert_eq!(sniff_cell("  "), CellValue::Empty);
        assert_eq!(sniff_cell("TRUE"), CellValue::Bool(true));
        assert_eq!(sniff_cell("1250"), CellValue::Number(1250.0));
        assert_eq!(sniff_cell("-3.5"), CellValue::Number(-3.5));
        assert_eq!(
            sniff_cell("SO43659"),
            CellValue::Text("SO43659".to_string())
        );
    }
}
