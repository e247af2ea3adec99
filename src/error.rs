use thiserror::Error;

/// Crate-level conversion errors, one variant per failure class:
/// archive-level, format-level, content-level, I/O-level failures).
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("archive {path:?} could not be opened: {reason}")]
    ArchiveUnavailable { path: String, reason: String },

    #[error("{asset}: not recognized as the expected format")]
    UnrecognizedFormat { asset: String },

    #[error("{asset}: parsed but unusable ({reason})")]
    EmptyOrUnusable { asset: String, reason: String },

    #[error("parser error: {0}")]
    Parser(#[from] formats::ParserError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
