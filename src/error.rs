use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("File was not sent")]
    InputMissing,

    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    #[error(
        "No labeled cells found in Excel file. Make sure cells contain labels starting with '@'"
    )]
    NoLabelsFound,

    #[error("No pharmacies found in the database")]
    NoData,

    #[error("Workbook format error: {0}")]
    Format(String),

    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("Invalid ID format")]
    InvalidId,

    #[error("Pharmacy not found")]
    NotFound,

    #[error("Record store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SheetError {
    /// Errors the caller caused (bad upload, bad id) rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SheetError::InputMissing
                | SheetError::PayloadTooLarge
                | SheetError::NoLabelsFound
                | SheetError::InvalidId
                | SheetError::NotFound
        )
    }
}

impl From<calamine::XlsxError> for SheetError {
    fn from(err: calamine::XlsxError) -> Self {
        SheetError::Format(format!("Failed to read workbook: {}", err))
    }
}
