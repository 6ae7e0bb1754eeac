use thiserror::Error;

pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_convert() {
        let err: PlanError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, PlanError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
