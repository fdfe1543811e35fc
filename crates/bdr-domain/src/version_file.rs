use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{BuildError, ConfigurationError, ResourceError};

static VERSION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^__version__ = "([^"'\r\n]+)"\r?$"#).expect("version pattern")
});

/// Declared text encoding of an input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    fn decode(self, bytes: Vec<u8>) -> Result<String, io::Error> {
        match self {
            TextEncoding::Utf8 => {
                String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
            }
            // Every byte maps to the code point of the same value.
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

/// Read `path` fully in the given encoding.
///
/// # Errors
///
/// Returns a [`ResourceError`] when the file is missing, unreadable, or not
/// valid in `encoding`.
pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String, ResourceError> {
    let bytes = fs_err::read(path).map_err(|err| ResourceError::new(path, err))?;
    encoding
        .decode(bytes)
        .map_err(|err| ResourceError::new(path, err))
}

/// The first `__version__ = "<version>"` assignment in `contents`.
#[must_use]
pub fn extract_version(contents: &str) -> Option<&str> {
    VERSION_ASSIGNMENT
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|found| found.as_str())
}

/// Resolve the package version from its version module.
///
/// # Errors
///
/// Returns [`BuildError::Resource`] when the file cannot be read and
/// [`ConfigurationError::VersionNotFound`] when it has no version assignment.
pub fn read_version(path: &Path, encoding: TextEncoding) -> Result<String, BuildError> {
    let contents = read_text(path, encoding)?;
    extract_version(&contents)
        .map(str::to_string)
        .ok_or_else(|| {
            ConfigurationError::VersionNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
}
