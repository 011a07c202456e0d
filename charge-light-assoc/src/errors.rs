use std::io;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("File {0} does not exist.")]
    FileNotAvailable(String),
    #[error("{0} exists! Refusing to overwrite.")]
    OutputExists(String),
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    #[error("Failed to write array: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Dataset {0} is missing.")]
    MissingDataset(String),
    #[error("Dataset {0} is provided more than once.")]
    DuplicateDataset(String),
    #[error("Dataset {0} does not hold a supported numeric type.")]
    UnsupportedDtype(String),
    #[error("Dataset {0} holds values that do not fit in i64.")]
    ValueOverflow(String),
    #[error("{0}")]
    InvalidShape(String),
    #[error("{0}")]
    InvalidReference(String),
    #[error("{0}")]
    InvalidParameter(String),
}
