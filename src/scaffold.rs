use crate::{
    errors::{describe, FileOperation, IoError},
    spec::{EntryKind, PathSpec, SpecError},
};
use colored::Colorize;
use miette::Diagnostic;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failure of a single spec. These are logged and, unless the run aborts on error, skipped.
#[derive(Debug, Error, Diagnostic)]
pub enum EntryError {
    #[error("unable to delete existing entry")]
    #[diagnostic(
        code(hako::scaffold::deletion),
        help("The entry may be locked or owned by another user")
    )]
    Deletion(#[source] IoError),

    #[error("unable to create directory")]
    #[diagnostic(code(hako::scaffold::directory_creation))]
    DirectoryCreation(#[source] IoError),

    #[error("unable to create parent directory")]
    #[diagnostic(
        code(hako::scaffold::parent_directory_creation),
        help("Check that no file sits where a parent directory is expected")
    )]
    ParentDirectoryCreation(#[source] IoError),

    #[error("unable to create file")]
    #[diagnostic(code(hako::scaffold::file_creation))]
    FileCreation(#[source] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidSpec(#[from] SpecError),
}

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error("unable to resolve base directory '{}'", .path.display())]
    #[diagnostic(
        code(hako::scaffold::base_resolution),
        help("Make sure the base directory exists and is accessible")
    )]
    BaseResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("base path '{}' is not a directory", .path.display())]
    #[diagnostic(code(hako::scaffold::base_not_directory))]
    BaseNotDirectory { path: PathBuf },

    #[error("scaffolding aborted at spec '{spec}'")]
    #[diagnostic(
        code(hako::scaffold::aborted),
        help("Run without --abort-on-error to skip failing entries")
    )]
    Aborted {
        spec: String,
        #[source]
        #[diagnostic_source]
        source: EntryError,
    },
}

/// Creates empty files and directories under a base directory, replacing whatever was there.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    base_dir: PathBuf,
    continue_on_error: bool,
}
impl Scaffolder {
    /// Resolves `base` (or the current working directory when `None`) to an absolute directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ScaffoldError`] if the directory cannot be resolved or is not a directory.
    pub fn new(base: Option<&Path>) -> Result<Self, ScaffoldError> {
        let base_dir = resolve_base(base)?;

        log::debug!("resolved base directory: {}", base_dir.display());

        Ok(Self {
            base_dir,
            continue_on_error: true,
        })
    }

    /// Sets whether a failing spec is logged and skipped (`true`, the default) or ends the run.
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Processes `specs` in order, deleting and recreating each entry.
    ///
    /// Every event is printed as one line on stdout.
    ///
    /// # Errors
    ///
    /// Only returns [`ScaffoldError::Aborted`], and only when `continue_on_error` is `false`.
    pub fn apply<S: AsRef<str>>(&self, specs: &[S]) -> Result<(), ScaffoldError> {
        log::debug!(
            "scaffolding {} entries into {}",
            specs.len(),
            self.base_dir.display()
        );

        for raw in specs {
            let raw = raw.as_ref();

            if let Err(error) = self.apply_one(raw) {
                println!("{} {}", "error".red(), describe(&error));

                if !self.continue_on_error {
                    return Err(ScaffoldError::Aborted {
                        spec: raw.to_string(),
                        source: error,
                    });
                }

                log::debug!("skipping spec '{}'", raw);
            }
        }

        log::debug!("finished scaffolding {}", self.base_dir.display());

        Ok(())
    }

    fn apply_one(&self, raw: &str) -> Result<(), EntryError> {
        let spec = PathSpec::classify(raw)?;

        reject_symlinked_parents(&self.base_dir, &spec, raw)?;

        let full_path = self.base_dir.join(spec.path());

        remove_existing(&full_path)?;

        match spec {
            PathSpec::Directory(_) => create_directory(&full_path),
            PathSpec::File(_) => create_file(&full_path),
        }
    }
}

/// Convenience wrapper: scaffolds `specs` into `base` with the default continue-on-error policy.
pub fn apply<S: AsRef<str>>(base: &Path, specs: &[S]) -> Result<(), ScaffoldError> {
    Scaffolder::new(Some(base))?.apply(specs)
}

fn resolve_base(base: Option<&Path>) -> Result<PathBuf, ScaffoldError> {
    let base_dir = match base {
        Some(path) => fs::canonicalize(path).map_err(|error| ScaffoldError::BaseResolution {
            path: path.to_path_buf(),
            source: error,
        })?,
        None => std::env::current_dir().map_err(|error| ScaffoldError::BaseResolution {
            path: PathBuf::from("."),
            source: error,
        })?,
    };

    if !base_dir.is_dir() {
        return Err(ScaffoldError::BaseNotDirectory { path: base_dir });
    }

    Ok(base_dir)
}

/// Refuses a spec when one of its existing parents under `base_dir` is a symlink, so deletion
/// and creation never reach outside the base directory. The final segment itself may be a
/// symlink: [`remove_existing`] removes it without following it.
fn reject_symlinked_parents(base_dir: &Path, spec: &PathSpec, raw: &str) -> Result<(), SpecError> {
    let segments: Vec<_> = spec.path().iter().collect();
    let parents = &segments[..segments.len().saturating_sub(1)];

    let mut current = base_dir.to_path_buf();

    for segment in parents {
        current.push(segment);

        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Err(SpecError::ThroughSymlink {
                    spec: raw.to_string(),
                    link: current,
                });
            }
            Ok(_) => {}
            // nothing below a missing parent exists either
            Err(_) => break,
        }
    }

    Ok(())
}

fn announce(verb: colored::ColoredString, kind: EntryKind, path: &Path) {
    println!("{} {} {}", verb, kind, path.display());
}

/// Removes whatever currently sits at `path`. Symlinks are removed, never followed.
fn remove_existing(path: &Path) -> Result<(), EntryError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) => {
            if error.kind() != io::ErrorKind::NotFound {
                log::debug!("treating {} as absent: {}", path.display(), error);
            }
            return Ok(());
        }
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|error| {
            EntryError::Deletion(IoError::new(FileOperation::RemoveDir, path.into(), error))
        })?;

        announce("deleted".yellow(), EntryKind::Directory, path);
    } else {
        fs::remove_file(path).map_err(|error| {
            EntryError::Deletion(IoError::new(FileOperation::RemoveFile, path.into(), error))
        })?;

        announce("deleted".yellow(), EntryKind::File, path);
    }

    Ok(())
}

/// Creates all directories in `path`. An already existing directory counts as success.
fn create_directory(path: &Path) -> Result<(), EntryError> {
    fs::create_dir_all(path).map_err(|error| {
        EntryError::DirectoryCreation(IoError::new(FileOperation::Mkdir, path.into(), error))
    })?;

    announce("created".green(), EntryKind::Directory, path);

    Ok(())
}

/// Creates an empty file at `path`, creating missing parents first.
fn create_file(path: &Path) -> Result<(), EntryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            EntryError::ParentDirectoryCreation(IoError::new(
                FileOperation::MkdirParent,
                parent.into(),
                error,
            ))
        })?;
    }

    fs::File::create(path).map_err(|error| {
        EntryError::FileCreation(IoError::new(FileOperation::Create, path.into(), error))
    })?;

    announce("created".green(), EntryKind::File, path);

    Ok(())
}
