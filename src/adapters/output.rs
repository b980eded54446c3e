use crate::domain::model::{Assignment, AssignmentRow};
use crate::utils::error::{Result, SantaError};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub const SUPPORTED: [&'static str; 2] = ["csv", "json"];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// 依 giver 順序輸出所有配對
    pub fn render(&self, assignment: &Assignment) -> Result<Vec<u8>> {
        let rows = assignment.rows();
        match self {
            OutputFormat::Csv => rows_to_csv(&rows),
            OutputFormat::Json => Ok(serde_json::to_vec_pretty(&rows)?),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SantaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(SantaError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    Self::SUPPORTED.join(", ")
                ),
            }),
        }
    }
}

fn rows_to_csv(rows: &[AssignmentRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let data = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(data)
}
