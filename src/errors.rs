use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("removing a file")]
    RemoveFile,
    #[error("removing a directory")]
    RemoveDir,
    #[error("creating a directory")]
    Mkdir,
    #[error("creating a parent directory")]
    MkdirParent,
    #[error("creating a file")]
    Create,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{}'", .path.display())]
#[diagnostic(
    code(hako::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: std::path::PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
}

/// Renders an error followed by every error in its `source` chain, separated by `: `.
pub fn describe(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_walks_the_source_chain() {
        let error = IoError::new(
            FileOperation::RemoveFile,
            "/tmp/locked.txt".into(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );

        assert_eq!(
            describe(&error),
            "I/O error: removing a file on path '/tmp/locked.txt': permission denied"
        );
    }
}
