//! Configuration loading.
//!
//! Settings are layered: built-in defaults, then `vue-to-react.json`, then
//! command-line flags.

use crate::cli::{Args, Shape};
use crate::error::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use vue_transformer::{ComponentShape, ImportPaths};

/// The configuration file searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "vue-to-react.json";

/// Contents of `vue-to-react.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileConfig {
    /// Shape of the generated components.
    pub shape: Option<Shape>,

    /// File extensions to convert.
    pub extensions: Vec<String>,

    /// Glob patterns to ignore.
    pub ignore: Vec<String>,

    /// Base name of the generated stylesheet.
    pub style_file_name: Option<String>,

    /// Module paths used by generated imports.
    pub imports: ImportsConfig,
}

/// The `imports` table of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportsConfig {
    pub component_utils: Option<String>,
    pub component_base: Option<String>,
    pub class_names: Option<String>,
}

impl FileConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds and loads `vue-to-react.json` from a directory.
    pub fn find(dir: &Utf8Path) -> Result<Option<(Utf8PathBuf, Self)>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let config = Self::load(&path)?;
        Ok(Some((path, config)))
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub shape: ComponentShape,
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
    pub style_file_name: String,
    pub imports: ImportPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shape: ComponentShape::Function,
            extensions: vec![".vue".to_string()],
            ignore: Vec::new(),
            style_file_name: "styles".to_string(),
            imports: ImportPaths::default(),
        }
    }
}

impl Settings {
    /// Loads the configuration file and layers the command-line flags on top.
    ///
    /// An explicit `--config` path must exist; otherwise the working directory
    /// is searched and a missing file means defaults.
    pub fn load(args: &Args, cwd: &Utf8Path) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => Some(FileConfig::load(path)?),
            None => FileConfig::find(cwd)?.map(|(_, config)| config),
        };
        Ok(Self::resolve(args, file.unwrap_or_default()))
    }

    /// Layers `file` and then `args` over the defaults.
    pub fn resolve(args: &Args, file: FileConfig) -> Self {
        let defaults = Self::default();

        let shape = args
            .shape
            .or(file.shape)
            .map(ComponentShape::from)
            .unwrap_or(defaults.shape);

        let extensions = if file.extensions.is_empty() {
            defaults.extensions
        } else {
            file.extensions
                .into_iter()
                .map(|ext| {
                    if ext.starts_with('.') {
                        ext
                    } else {
                        format!(".{}", ext)
                    }
                })
                .collect()
        };

        let mut ignore = file.ignore;
        ignore.extend(args.ignore.iter().cloned());

        let imports = ImportPaths {
            component_utils: file
                .imports
                .component_utils
                .unwrap_or(defaults.imports.component_utils),
            component_base: file
                .imports
                .component_base
                .unwrap_or(defaults.imports.component_base),
            class_names: file
                .imports
                .class_names
                .unwrap_or(defaults.imports.class_names),
        };

        Self {
            shape,
            extensions,
            ignore,
            style_file_name: file.style_file_name.unwrap_or(defaults.style_file_name),
            imports,
        }
    }

    /// Returns true if `file_name` has one of the configured extensions.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["vue-to-react", "-i", "src", "-o", "out"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&args(&[]), FileConfig::default());
        assert_eq!(settings.shape, ComponentShape::Function);
        assert_eq!(settings.extensions, vec![".vue"]);
        assert_eq!(settings.style_file_name, "styles");
        assert_eq!(settings.imports.class_names, "classnames");
        assert!(settings.matches_extension("TodoList.VUE"));
        assert!(!settings.matches_extension("main.js"));
    }

    #[test]
    fn test_file_config_is_parsed() {
        let config: FileConfig = serde_json::from_str(
            r#"{
                "shape": "class",
                "extensions": ["vue", ".view"],
                "ignore": ["**/legacy/**"],
                "styleFileName": "index",
                "imports": { "componentUtils": "~/utils" }
            }"#,
        )
        .unwrap();

        let settings = Settings::resolve(&args(&["--ignore", "*.test.vue"]), config);
        assert_eq!(settings.shape, ComponentShape::Class);
        assert_eq!(settings.extensions, vec![".vue", ".view"]);
        assert_eq!(settings.ignore, vec!["**/legacy/**", "*.test.vue"]);
        assert_eq!(settings.style_file_name, "index");
        assert_eq!(settings.imports.component_utils, "~/utils");
        assert_eq!(settings.imports.component_base, "@base/component-base");
    }

    #[test]
    fn test_flags_override_file() {
        let config = FileConfig {
            shape: Some(Shape::Class),
            ..Default::default()
        };
        let settings = Settings::resolve(&args(&["--shape", "function"]), config);
        assert_eq!(settings.shape, ComponentShape::Function);
    }

    #[test]
    fn test_find_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        assert!(FileConfig::find(root).unwrap().is_none());

        fs::write(root.join(CONFIG_FILE_NAME), r#"{ "styleFileName": "theme" }"#).unwrap();
        let (path, config) = FileConfig::find(root).unwrap().unwrap();
        assert_eq!(path, root.join(CONFIG_FILE_NAME));
        assert_eq!(config.style_file_name.as_deref(), Some("theme"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "{ shape: }").unwrap();
        let err = FileConfig::find(root).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let missing = root.join("missing.json");
        let parsed = args(&["--config", missing.as_str()]);
        let err = Settings::load(&parsed, root).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
