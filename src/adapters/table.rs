use crate::utils::error::{Result, SantaError};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    pub const EXTENSIONS: [&'static str; 2] = ["csv", "xlsx"];

    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" => Ok(TableFormat::Xlsx),
            _ => Err(SantaError::UnsupportedFormatError {
                path: path.to_string(),
                extension,
            }),
        }
    }
}

/// 表頭加資料列，所有儲存格都已轉成去頭尾空白的字串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// 依副檔名選擇解析方式
    pub fn from_bytes(path: &str, data: &[u8]) -> Result<Self> {
        match TableFormat::from_path(path)? {
            TableFormat::Csv => Self::from_csv_bytes(data),
            TableFormat::Xlsx => Self::from_xlsx_bytes(data),
        }
    }

    pub fn from_csv_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// 讀取活頁簿的第一個工作表
    pub fn from_xlsx_bytes(data: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SantaError::ProcessingError {
                message: "Workbook has no worksheets".to_string(),
            })??;

        let mut rows_iter = range.rows();
        let headers = match rows_iter.next() {
            Some(header_row) => header_row.iter().map(cell_to_string).collect(),
            None => return Ok(Self::default()),
        };
        let rows = rows_iter
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// 依序嘗試候選名稱，回傳第一個符合的欄位索引
    pub fn column_index(&self, candidates: &[&str]) -> Option<usize> {
        let normalized: Vec<String> = self.headers.iter().map(|h| normalize_header(h)).collect();
        candidates.iter().find_map(|candidate| {
            let wanted = normalize_header(candidate);
            normalized.iter().position(|h| *h == wanted)
        })
    }
}

/// 忽略大小寫、空白、底線與連字號
pub fn normalize_header(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}
