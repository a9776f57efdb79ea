//! File type classification by extension.

use std::fmt;
use std::path::Path;

/// The fixed set of file variants.
///
/// The kind is chosen once, when a record is first built, and never changes
/// afterwards even if the file's content or name changes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Any file without a more specific variant
    Generic,
    /// Plain text, analyzed for lines, words and characters
    Text,
    /// Source code, analyzed for lines, classes and methods
    Program,
    /// Raster image; only metadata is captured
    Image,
}

impl FileKind {
    /// Picks the variant for an extension such as `.txt`.
    ///
    /// Matching is case-sensitive: `.TXT` is a generic file.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            ".txt" => Self::Text,
            ".png" | ".jpg" => Self::Image,
            ".cpp" | ".java" => Self::Program,
            _ => Self::Generic,
        }
    }

    /// Picks the variant for a path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(&extension_of(path))
    }

    /// Label shown on the `Type:` line of a report, if any.
    #[must_use]
    pub const fn type_label(&self) -> Option<&'static str> {
        match self {
            Self::Generic => None,
            Self::Text => Some("Text File"),
            Self::Program => Some("Program File"),
            Self::Image => Some("Image File"),
        }
    }

    /// Short lowercase name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Text => "text",
            Self::Program => "program",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Extension of `path` including the leading dot, or an empty string.
///
/// Dot-files such as `.bashrc` have no extension; `notes.` has the
/// extension `.`.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
