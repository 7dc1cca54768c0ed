use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("row {line} field {field} is not valid UTF-8")]
    Encoding { line: u64, field: usize },

    #[error("row {line} opens a quoted field that is never closed")]
    Malformed { line: u64 },

    #[error("malformed tabular input: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        if let csv::ErrorKind::Utf8 { pos, err } = source.kind() {
            return ParserError::Encoding {
                line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
                field: err.field(),
            };
        }
        ParserError::Csv { source }
    }
}
