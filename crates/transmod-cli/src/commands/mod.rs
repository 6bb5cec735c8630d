pub mod check;
pub mod globs;
pub mod import;
pub mod patch;
pub mod resolve;
pub mod version;

use std::path::{Path, PathBuf};
use transmod_core::config::load_config;
use transmod_core::{DirectorySet, RuleSchema, TranspileOptions};

/// Options given on the command line, applied over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub modules: Vec<String>,
    pub resolve_symlinks: bool,
    pub webpack5: bool,
}

/// Load options for the project at `cwd` and apply CLI overrides.
///
/// Exits with an error report if the config cannot be loaded.
pub fn load_options(cwd: &Path, overrides: &Overrides, json: bool) -> TranspileOptions {
    let options = match load_config(cwd, overrides.config.as_deref()) {
        Ok(Some((path, options))) => {
            tracing::debug!(path = %path.display(), modules = options.modules.len(), "loaded config");
            options
        }
        Ok(None) => TranspileOptions::default(),
        Err(e) => fail(e.code(), &e.to_string(), json),
    };

    let mut options = options.with_extra_modules(overrides.modules.iter().cloned());
    if overrides.resolve_symlinks {
        options = options.with_resolve_symlinks(true);
    }
    if overrides.webpack5 {
        options = options.with_rule_schema(RuleSchema::Webpack5);
    }
    options
}

/// Resolve the configured modules, exiting on failure.
pub fn load_directories(cwd: &Path, options: &TranspileOptions, json: bool) -> DirectorySet {
    match transmod_core::resolve_modules(cwd, &options.modules, &options.resolver_config()) {
        Ok(set) => set,
        Err(e) => fail(e.code(), &e.to_string(), json),
    }
}

/// Print an error report and exit with status 1.
pub fn fail(code: &str, message: &str, json: bool) -> ! {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": code,
                    "message": message
                }
            })
        );
    } else {
        eprintln!("error: {message}");
    }
    std::process::exit(1);
}

/// Paths in JSON output are plain strings.
pub fn path_strings(set: &DirectorySet) -> Vec<String> {
    set.iter().map(|p| p.to_string_lossy().into_owned()).collect()
}
