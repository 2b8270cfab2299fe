use crate::errors::{FileOperation, IoError};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum LayoutError {
    #[error("I/O error within layout domain")]
    #[diagnostic(code(hako::layout::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{}': {source}", .path.display())]
    #[diagnostic(code(hako::layout::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Layout not found with name: {name}")]
    #[diagnostic(
        code(hako::layout::not_found),
        help("Run `hako list` to see the available layouts")
    )]
    NotFound { name: String },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LayoutInfo {
    #[serde(default)]
    pub description: Option<String>,
    pub entries: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_continue_on_error")]
    pub continue_on_error: bool,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            continue_on_error: default_continue_on_error(),
        }
    }
}
fn default_continue_on_error() -> bool {
    true
}

/// Shape of a layouts file on disk.
#[derive(Debug, Deserialize, Default)]
struct LayoutsFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    layouts: IndexMap<String, LayoutInfo>,
}

/// Every layout known to this run: the built-ins, overridden by those of an optional file.
#[derive(Debug, Clone)]
pub struct Layouts {
    pub settings: Settings,
    pub layouts: IndexMap<String, LayoutInfo>,
}
impl Layouts {
    pub fn builtin() -> Self {
        let mut layouts = IndexMap::new();

        layouts.insert(
            "example".to_string(),
            LayoutInfo {
                description: Some("a few nested directories and files".to_string()),
                entries: to_entries(EXAMPLE_LAYOUT),
            },
        );
        layouts.insert(
            "session-cookie".to_string(),
            LayoutInfo {
                description: Some("node session cookie app with a memory store".to_string()),
                entries: to_entries(SESSION_COOKIE_LAYOUT),
            },
        );
        layouts.insert(
            "service".to_string(),
            LayoutInfo {
                description: Some(
                    "python inference service with workers, frontend, docker and docs".to_string(),
                ),
                entries: to_entries(SERVICE_LAYOUT),
            },
        );

        Self {
            settings: Settings::default(),
            layouts,
        }
    }

    /// Loads the built-in layouts, merged with the layouts file at `path` if one is given.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the file cannot be read or is not valid toml.
    pub fn load(path: Option<&Path>) -> Result<Self, LayoutError> {
        let mut layouts = Self::builtin();

        let Some(path) = path else {
            return Ok(layouts);
        };

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let file = Self::parse(&content).map_err(|err| LayoutError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })?;

        log::debug!(
            "loaded {} layouts from {}",
            file.layouts.len(),
            path.display()
        );

        layouts.settings = file.settings;
        layouts.layouts.extend(file.layouts);

        Ok(layouts)
    }

    fn parse(content: &str) -> Result<LayoutsFile, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn get(&self, name: &str) -> Result<&LayoutInfo, LayoutError> {
        self.layouts.get(name).ok_or_else(|| LayoutError::NotFound {
            name: name.to_string(),
        })
    }
}

fn to_entries(specs: &[&str]) -> Vec<String> {
    specs.iter().map(|spec| spec.to_string()).collect()
}

const EXAMPLE_LAYOUT: &[&str] = &[
    "test_dir/",
    "test_file.txt",
    "nested/dir/structure/",
    "nested/file/in/deep/path.txt",
];

const SESSION_COOKIE_LAYOUT: &[&str] = &[
    "app.js",
    "launch.json",
    "test/session.test.js",
    "package.json",
    "memory-store.js",
];

const SERVICE_LAYOUT: &[&str] = &[
    "app/__init__.py",
    "app/main.py",
    "app/api/__init__.py",
    "app/api/dependencies.py",
    "app/api/endpoints/__init__.py",
    "app/api/endpoints/inference.py",
    "app/api/endpoints/models.py",
    "app/api/endpoints/auth.py",
    "app/api/endpoints/health.py",
    "app/core/__init__.py",
    "app/core/config.py",
    "app/core/security.py",
    "app/core/exceptions.py",
    "app/core/middleware.py",
    "app/services/__init__.py",
    "app/services/inference.py",
    "app/services/model_manager.py",
    "app/services/cache.py",
    "app/services/auth.py",
    "app/services/queue.py",
    "app/models/__init__.py",
    "app/models/schemas.py",
    "app/models/database.py",
    "app/models/user.py",
    "app/utils/__init__.py",
    "app/utils/file_utils.py",
    "app/utils/monitoring.py",
    "app/utils/helpers.py",
    "workers/__init__.py",
    "workers/inference_worker.py",
    "workers/model_loader.py",
    "workers/task_processor.py",
    "frontend/package.json",
    // empty directories
    "frontend/public/",
    "frontend/src/components/",
    "frontend/src/pages/",
    "frontend/src/services/",
    "tests/__init__.py",
    "tests/test_api.py",
    "tests/test_services.py",
    "tests/test_models.py",
    "docker/Dockerfile",
    "docker/docker-compose.yml",
    "docker/nginx/nginx.conf",
    "docs/api.md",
    "docs/deployment.md",
    "docs/development.md",
    "scripts/setup.sh",
    "scripts/deploy.sh",
    "scripts/monitor.py",
    "requirements.txt",
    "README.md",
    ".env.example",
    ".gitignore",
    "pyproject.toml",
    "setup.py",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::PathSpec;

    #[test]
    fn builtin_layouts_only_hold_valid_specs() {
        for (name, layout) in &Layouts::builtin().layouts {
            for entry in &layout.entries {
                assert!(
                    PathSpec::classify(entry).is_ok(),
                    "layout '{}' has an invalid entry '{}'",
                    name,
                    entry
                );
            }
        }
    }

    #[test]
    fn builtin_layout_names() {
        let layouts = Layouts::builtin();
        let names: Vec<_> = layouts.layouts.keys().cloned().collect();

        assert_eq!(names, vec!["example", "session-cookie", "service"]);
        assert_eq!(
            layouts.get("session-cookie").unwrap().entries,
            vec![
                "app.js",
                "launch.json",
                "test/session.test.js",
                "package.json",
                "memory-store.js"
            ]
        );
    }

    #[test]
    fn parse_keeps_declaration_order() {
        let file = Layouts::parse(
            r#"
            [layouts.zeta]
            entries = ["z/"]

            [layouts.alpha]
            description = "first letter"
            entries = ["a.txt", "b/"]
            "#,
        )
        .unwrap();

        let names: Vec<_> = file.layouts.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(file.layouts["alpha"].entries, vec!["a.txt", "b/"]);
        assert!(file.settings.continue_on_error);
    }

    #[test]
    fn parse_reads_settings() {
        let file = Layouts::parse(
            r#"
            [settings]
            continue_on_error = false
            "#,
        )
        .unwrap();

        assert!(!file.settings.continue_on_error);
        assert!(file.layouts.is_empty());
    }

    #[test]
    fn parse_rejects_layout_without_entries() {
        assert!(Layouts::parse("[layouts.broken]\ndescription = \"nothing\"\n").is_err());
    }

    #[test]
    fn file_layouts_override_builtins() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hako.toml");
        fs::write(
            &path,
            "[layouts.example]\nentries = [\"only.txt\"]\n\n[layouts.web]\nentries = [\"public/\"]\n",
        )
        .unwrap();

        let layouts = Layouts::load(Some(&path)).unwrap();

        assert_eq!(layouts.get("example").unwrap().entries, vec!["only.txt"]);
        assert_eq!(layouts.get("web").unwrap().entries, vec!["public/"]);
        assert!(layouts.get("service").is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();

        let result = Layouts::load(Some(&tmp.path().join("missing.toml")));

        assert!(matches!(result, Err(LayoutError::Io(_))));
    }

    #[test]
    fn unknown_layout_is_not_found() {
        assert!(matches!(
            Layouts::builtin().get("nope"),
            Err(LayoutError::NotFound { .. })
        ));
    }
}
