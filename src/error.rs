use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Parser error code for a source document that could not be opened.
pub const SOURCE_COULDNT_OPEN: u8 = 0x01;
/// Parser error code for a malformed source document.
pub const SOURCE_PARSING_ERROR: u8 = 0x02;

/// Export error types
#[derive(Debug, Error)]
pub enum ExportError {
    /// Source document unreadable or malformed
    #[error("error code: {code}\nerror text: {message}")]
    Source { code: u8, message: String },

    /// Map violates a requirement of the binary format
    #[error("error: {0}")]
    Precondition(#[from] PreconditionError),

    /// Output could not be created or written
    #[error("error: unable to write file {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O failure while writing to an in-memory or caller-provided sink
    #[error("error: write failed: {0}")]
    Write(#[from] binrw::Error),

    /// A value does not fit its field and cannot be truncated
    #[error("error: {field} value {value} does not fit (max {max})")]
    Overflow {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("map orientation must be orthogonal")]
    NotOrthogonal,

    #[error("infinite maps are not supported")]
    Infinite,

    #[error("no tileset exist")]
    NoTileset,

    #[error("tileset '{0}' has no image")]
    TilesetWithoutImage(String),

    #[error("tileset '{0}' has a zero tile size")]
    ZeroTileSize(String),

    #[error("layer zero does not exist")]
    NoLayer,

    #[error("layer '{name}' is {width}x{height}, map is {map_width}x{map_height}")]
    LayerSizeMismatch {
        name: String,
        width: u32,
        height: u32,
        map_width: u32,
        map_height: u32,
    },
}

impl ExportError {
    /// Process exit code for this error.
    ///
    /// Source errors carry the parser's own code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::Source { code, .. } => *code as i32,
            _ => 1,
        }
    }

    pub(crate) fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::Sink {
            path: path.into(),
            source,
        }
    }
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let source = ExportError::Source {
            code: SOURCE_PARSING_ERROR,
            message: "bad xml".into(),
        };
        assert_eq!(source.exit_code(), 2);
        assert_eq!(ExportError::from(PreconditionError::NoLayer).exit_code(), 1);
        let sink = ExportError::sink("/nope/out.bin", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(sink.exit_code(), 1);
    }

    #[test]
    fn test_messages_match_tool_output() {
        assert_eq!(
            ExportError::from(PreconditionError::NotOrthogonal).to_string(),
            "error: map orientation must be orthogonal"
        );
        assert_eq!(
            ExportError::from(PreconditionError::NoTileset).to_string(),
            "error: no tileset exist"
        );
    }
}
