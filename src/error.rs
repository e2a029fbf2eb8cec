//! Error types for document assembly.
//!
//! Every variant is fatal for the build that produced it. The one recoverable
//! condition, an optional image that is not on disk, is not an error at all and
//! is reported as `Ok(None)` by [`crate::elements::image_safe`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::style::StyleName;

/// Result type alias for document assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a document build.
#[derive(Error, Debug)]
pub enum Error {
    /// A table row does not have the same number of cells as the header.
    #[error("Table row {row} has {found} cells but the header has {expected}")]
    ShapeMismatch {
        /// Zero-based index of the offending data row.
        row: usize,
        /// Number of header cells.
        expected: usize,
        /// Number of cells found in the row.
        found: usize,
    },

    /// The column width policy does not describe every header column.
    #[error("Column layout describes {found} columns but the table has {expected}")]
    ColumnWidthMismatch {
        /// Number of header cells.
        expected: usize,
        /// Number of ratios supplied by the layout.
        found: usize,
    },

    /// A table was declared without any header cells.
    #[error("Tables need at least one header column")]
    EmptyTable,

    /// A block referenced a style that was never registered.
    #[error("Style '{}' is not registered", .0.display_name())]
    UnknownStyle(StyleName),

    /// An image exists on disk but could not be read or decoded.
    #[error("Failed to load image {}", path.display())]
    Image {
        /// Path of the image file.
        path: PathBuf,
        /// Underlying decoding error.
        #[source]
        source: image::ImageError,
    },

    /// An earlier push failed, so the assembled content is incomplete.
    #[error("Document assembly already failed; the partial document cannot be extended or saved")]
    AssemblyFailed,

    /// The finished document could not be written to its destination.
    #[error("Failed to write document to {}", path.display())]
    OutputWrite {
        /// Destination the document was meant to be saved at.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_the_row() {
        let err = Error::ShapeMismatch {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Table row 2 has 1 cells but the header has 3"
        );
    }

    #[test]
    fn output_write_keeps_the_path_and_source() {
        let err = Error::output_write(
            "out/report.docx",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/report.docx"));
        let source = std::error::Error::source(&err).expect("io source");
        assert_eq!(source.to_string(), "denied");
    }
}
