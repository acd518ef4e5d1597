/// Errors that can occur while parsing a measurement document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mean or standard-deviation field was not a floating-point value
    #[error("invalid numeric field: {0:?}")]
    InvalidNumber(String),

    /// Invalid measurement document structure
    #[error("invalid measurement structure: {0}")]
    InvalidStructure(String),
}
