use miette::Diagnostic;
use std::{
    fmt,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum SpecError {
    #[error("spec '{spec}' does not name any entry")]
    #[diagnostic(
        code(hako::spec::empty),
        help("Specs must contain at least one path segment, e.g. 'src/' or 'README.md'")
    )]
    Empty { spec: String },

    #[error("spec '{spec}' points outside of the base directory")]
    #[diagnostic(
        code(hako::spec::escapes_base),
        help("Use a relative path without '..' segments")
    )]
    EscapesBase { spec: String },

    #[error("spec '{spec}' passes through the symlink '{}'", .link.display())]
    #[diagnostic(
        code(hako::spec::through_symlink),
        help("Replace the symlink with a real directory or scaffold into its target directly")
    )]
    ThroughSymlink { spec: String, link: PathBuf },
}

/// A single entry of a layout, classified once from its raw string.
///
/// The stored path is relative and normalized: trailing separators and `.`
/// segments are gone, so it can be joined onto any base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    File(PathBuf),
    Directory(PathBuf),
}
impl PathSpec {
    /// Classifies a raw spec string.
    ///
    /// A spec ending in `/`, `\` or the platform separator, or in a `.` segment, is a directory,
    /// anything else is a file.
    ///
    /// # Errors
    ///
    /// Returns a [`SpecError`] if the spec is empty once normalized, or if it is absolute or
    /// climbs out of the base directory with `..`.
    pub fn classify(raw: &str) -> Result<Self, SpecError> {
        let trimmed = raw.trim_end_matches(is_separator);

        // "a/." names the directory "a", never a file
        let is_directory =
            raw.ends_with(is_separator) || trimmed.rsplit(is_separator).next() == Some(".");

        let path = normalize(raw, trimmed)?;

        log::debug!(
            "classified '{}' as {}",
            raw,
            if is_directory { "directory" } else { "file" }
        );

        if is_directory {
            Ok(Self::Directory(path))
        } else {
            Ok(Self::File(path))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory(_) => EntryKind::Directory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}
impl EntryKind {
    fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}
impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\' || c == std::path::MAIN_SEPARATOR
}

fn normalize(raw: &str, trimmed: &str) -> Result<PathBuf, SpecError> {
    let mut normalized = PathBuf::new();

    for component in Path::new(trimmed).components() {
        match component {
            // Skip the current-dir marker "."
            Component::CurDir => {}

            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SpecError::EscapesBase {
                    spec: raw.to_string(),
                });
            }

            Component::Normal(segment) => normalized.push(segment),
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(SpecError::Empty {
            spec: raw.to_string(),
        });
    }

    Ok(normalized)
}
