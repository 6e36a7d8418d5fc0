//! # Asset Loaders
//!
//! Line-oriented parsers for Wavefront OBJ geometry and MTL material files.
//!
//! Files are read through [`SourceReader`] so the parsers can be driven from
//! disk ([`FsReader`]) or from in-memory text in tests.

pub mod mtl;
pub mod obj;

use std::path::Path;

use crate::error::{Error, Result};

pub use mtl::{parse_mtl, MaterialLibrary};
pub use obj::{load_obj, parse_obj};

/// Supplies whole-file text for a path.
pub trait SourceReader {
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Takes the next whitespace token or reports what was expected.
pub(crate) fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    expected: &'static str,
) -> Result<&'a str> {
    tokens.next().ok_or(Error::Parse {
        line,
        expected,
        found: String::new(),
    })
}

/// Parses the next `N` tokens as floats.
pub(crate) fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    expected: &'static str,
) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        let token = next_token(tokens, line, expected)?;
        *value = token.parse().map_err(|_| Error::Parse {
            line,
            expected,
            found: token.to_owned(),
        })?;
    }
    Ok(values)
}

/// Joins the remaining tokens of a line, for names that may contain spaces.
pub(crate) fn rest_of_line<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{
        collections::HashMap,
        path::{Path, PathBuf},
    };

    use super::SourceReader;
    use crate::error::{Error, Result};

    /// Serves file contents from memory.
    #[derive(Default)]
    pub struct MemoryReader {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryReader {
        pub fn with_file(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
            self.files.insert(path.into(), text.to_owned());
            self
        }
    }

    impl SourceReader for MemoryReader {
        fn read_to_string(&self, path: &Path) -> Result<String> {
            self.files.get(path).cloned().ok_or_else(|| Error::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }
}
