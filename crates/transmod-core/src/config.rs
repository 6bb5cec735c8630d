//! Transpile options and config file discovery.
//!
//! Options come from, in priority order:
//! 1. An explicit `--config <FILE>` path
//! 2. The `TRANSMOD_CONFIG` environment variable
//! 3. `transmod.config.json` in the project root
//! 4. The `"transpileModules"` key of the project's `package.json`
//!
//! ```json
//! { "modules": ["@org/ui", "left-pad"], "resolveSymlinks": false, "ruleSchema": "webpack5" }
//! ```

use crate::error::{Error, Result};
use crate::resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "TRANSMOD_CONFIG";

/// Dedicated config file name.
pub const CONFIG_FILE: &str = "transmod.config.json";

/// Key read from `package.json` when no dedicated file exists.
pub const PACKAGE_JSON_KEY: &str = "transpileModules";

/// Host rule-schema generation.
///
/// Selects where the loader is attached on the transpile rule (`loader` vs
/// `use`) and which externals callback shape the host expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSchema {
    #[default]
    Webpack4,
    Webpack5,
}

impl RuleSchema {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webpack4 => "webpack4",
            Self::Webpack5 => "webpack5",
        }
    }

    /// Property name the loader is attached under.
    #[must_use]
    pub fn loader_key(&self) -> &'static str {
        match self {
            Self::Webpack4 => "loader",
            Self::Webpack5 => "use",
        }
    }
}

/// Options for making external packages first-party source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspileOptions {
    /// Package identifiers to transpile.
    pub modules: Vec<String>,

    /// Let the host resolve symlinked paths to their real location before
    /// matching. Off by default so symlinked installs still match.
    pub resolve_symlinks: bool,

    /// Host rule-schema generation.
    pub rule_schema: RuleSchema,
}

impl TranspileOptions {
    /// Create options for the given modules.
    #[must_use]
    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set symlink resolution.
    #[must_use]
    pub fn with_resolve_symlinks(mut self, resolve_symlinks: bool) -> Self {
        self.resolve_symlinks = resolve_symlinks;
        self
    }

    /// Set the rule schema.
    #[must_use]
    pub fn with_rule_schema(mut self, rule_schema: RuleSchema) -> Self {
        self.rule_schema = rule_schema;
        self
    }

    /// Append modules, skipping ones already listed.
    #[must_use]
    pub fn with_extra_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            let module = module.into();
            if !self.modules.contains(&module) {
                self.modules.push(module);
            }
        }
        self
    }

    /// Resolver settings matching these options.
    ///
    /// Directories must be reported the way the host will see module paths:
    /// symlinked locations when the host keeps symlinks, real paths otherwise.
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            preserve_symlinks: !self.resolve_symlinks,
            ..ResolverConfig::default()
        }
    }
}

/// Find a config source in the project root.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    let dedicated = root.join(CONFIG_FILE);
    if dedicated.is_file() {
        return Some(dedicated);
    }

    let pkg_json = root.join("package.json");
    let has_key = std::fs::read_to_string(&pkg_json)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .is_some_and(|value| value.get(PACKAGE_JSON_KEY).is_some());

    has_key.then_some(pkg_json)
}

/// Load options for the project at `root`.
///
/// If `config_path` is `Some`, that file must exist. Returns `Ok(None)` when
/// nothing is configured.
pub fn load_config(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<Option<(PathBuf, TranspileOptions)>> {
    let explicit = config_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let path = match explicit {
        Some(p) => {
            let abs = if p.is_absolute() { p } else { root.join(p) };
            if !abs.is_file() {
                return Err(Error::ConfigNotFound { path: abs });
            }
            abs
        }
        None => match find_config_file(root) {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let options = parse_config(&path, &content)?;
    Ok(Some((path, options)))
}

/// Parse options from a config file's contents.
///
/// `package.json` files are read through their `"transpileModules"` key;
/// any other file is the options object itself.
fn parse_config(path: &Path, content: &str) -> Result<TranspileOptions> {
    let parse_err = |source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    };

    if path.file_name().is_some_and(|name| name == "package.json") {
        let mut value: serde_json::Value = serde_json::from_str(content).map_err(parse_err)?;
        let section = value
            .get_mut(PACKAGE_JSON_KEY)
            .map(serde_json::Value::take)
            .unwrap_or_default();

        // Shorthand: "transpileModules": ["a", "b"]
        if section.is_array() {
            let modules: Vec<String> = serde_json::from_value(section).map_err(parse_err)?;
            return Ok(TranspileOptions::new(modules));
        }
        if section.is_null() {
            return Ok(TranspileOptions::default());
        }
        return serde_json::from_value(section).map_err(parse_err);
    }

    serde_json::from_str(content).map_err(parse_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = TranspileOptions::default();
        assert!(options.modules.is_empty());
        assert!(!options.resolve_symlinks);
        assert_eq!(options.rule_schema, RuleSchema::Webpack4);
        assert!(options.resolver_config().preserve_symlinks);
    }

    #[test]
    fn test_builder() {
        let options = TranspileOptions::new(["a"])
            .with_resolve_symlinks(true)
            .with_rule_schema(RuleSchema::Webpack5)
            .with_extra_modules(["a", "b"]);
        assert_eq!(options.modules, vec!["a", "b"]);
        assert!(!options.resolver_config().preserve_symlinks);
        assert_eq!(options.rule_schema.loader_key(), "use");
    }

    #[test]
    #[serial]
    fn test_load_dedicated_file() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "modules": ["@org/ui"], "ruleSchema": "webpack5" }"#,
        )
        .unwrap();

        let (path, options) = load_config(dir.path(), None).unwrap().unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE));
        assert_eq!(options.modules, vec!["@org/ui"]);
        assert_eq!(options.rule_schema, RuleSchema::Webpack5);
        assert!(!options.resolve_symlinks);
    }

    #[test]
    #[serial]
    fn test_load_package_json_key() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "app", "transpileModules": { "modules": ["x"], "resolveSymlinks": true } }"#,
        )
        .unwrap();

        let (_, options) = load_config(dir.path(), None).unwrap().unwrap();
        assert_eq!(options.modules, vec!["x"]);
        assert!(options.resolve_symlinks);
    }

    #[test]
    #[serial]
    fn test_load_package_json_shorthand() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "transpileModules": ["a", "b"] }"#,
        )
        .unwrap();

        let (_, options) = load_config(dir.path(), None).unwrap().unwrap();
        assert_eq!(options.modules, vec!["a", "b"]);
    }

    #[test]
    #[serial]
    fn test_package_json_without_key_is_not_config() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "app" }"#).unwrap();

        assert!(load_config(dir.path(), None).unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_explicit_path_missing() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert_eq!(err.code(), "CONFIG_NOT_FOUND");
    }

    #[test]
    #[serial]
    fn test_env_override() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.json");
        fs::write(&custom, r#"{ "modules": ["from-env"] }"#).unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{ "modules": ["from-file"] }"#).unwrap();

        std::env::set_var(CONFIG_ENV, &custom);
        let loaded = load_config(dir.path(), None);
        std::env::remove_var(CONFIG_ENV);

        let (path, options) = loaded.unwrap().unwrap();
        assert_eq!(path, custom);
        assert_eq!(options.modules, vec!["from-env"]);
    }

    #[test]
    #[serial]
    fn test_parse_error_reports_path() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let err = load_config(dir.path(), None).unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE_FAILED");
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
