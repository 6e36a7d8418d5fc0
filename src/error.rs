//! Error types shared by the loaders and the renderer.

use std::{fmt, path::PathBuf};

/// Which per-vertex attribute list a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    TextureCoordinate,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TextureCoordinate => "texture coordinate",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Errors produced while loading assets or driving the GPU.
///
/// Line numbers are 1-based and refer to the file being parsed when the
/// error was raised.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected {expected}, found `{found}`")]
    Parse {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: {kind} index {index} is out of range ({len} available)")]
    Index {
        line: usize,
        kind: AttributeKind,
        index: i64,
        len: usize,
    },

    #[error("line {line}: {message}")]
    State { line: usize, message: &'static str },

    #[error("graphics error: {0}")]
    Graphics(String),

    #[error("failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_cause() {
        let err = Error::Index {
            line: 7,
            kind: AttributeKind::Normal,
            index: 4,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "line 7: normal index 4 is out of range (3 available)"
        );

        let err = Error::State {
            line: 2,
            message: "no current material",
        };
        assert_eq!(err.to_string(), "line 2: no current material");
    }
}
