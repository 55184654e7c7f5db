use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("file contains a header row but no data rows")]
    Empty,

    #[error("no header row found")]
    MissingHeader,

    #[error("no valid records after mapping ({dropped} row(s) dropped)")]
    NoValidRecords { dropped: usize },
}
