//! `transmod patch` command implementation.
//!
//! Applies the plugin hooks to a JSON snapshot of a host configuration.

use super::{fail, load_options, Overrides};
use miette::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use transmod_core::host::{with_transpile_modules, DevMiddlewareConfig};
use transmod_core::{BuildContext, HostConfig, TranspileModules};

/// `webpack` hook input: the config plus the build context fields.
#[derive(Debug, Deserialize)]
struct WebpackInput {
    #[serde(default)]
    config: HostConfig,
    #[serde(flatten)]
    ctx: BuildContext,
}

/// Run the patch command.
pub fn run(
    cwd: &Path,
    overrides: &Overrides,
    file: &Path,
    dev_middleware: bool,
    json: bool,
) -> Result<()> {
    let options = load_options(cwd, overrides, json);

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => fail(
            "INPUT_READ_FAILED",
            &format!("Failed to read {}: {e}", file.display()),
            json,
        ),
    };

    let output = if dev_middleware {
        let config: DevMiddlewareConfig = parse(file, &content, json);
        let patched = match TranspileModules::initialize(options, cwd) {
            Ok(Some(plugin)) => plugin.dev_middleware(config, None),
            Ok(None) => config,
            Err(e) => fail(e.code(), &e.to_string(), json),
        };
        serde_json::json!({
            "ok": true,
            "config": patched
        })
    } else {
        let input: WebpackInput = parse(file, &content, json);
        let patched = match with_transpile_modules(options, cwd, input.config, &input.ctx, None) {
            Ok(p) => p,
            Err(e) => fail(e.code(), &e.to_string(), json),
        };
        serde_json::json!({
            "ok": true,
            "config": patched.config,
            "report": patched.report
        })
    };

    // Warnings were already logged; plain output is just the config.
    let rendered = if json {
        output.to_string()
    } else {
        serde_json::to_string_pretty(&output["config"]).unwrap_or_default()
    };
    println!("{rendered}");

    Ok(())
}

fn parse<T: DeserializeOwned>(file: &Path, content: &str, json: bool) -> T {
    match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => fail(
            "INPUT_PARSE_FAILED",
            &format!("Failed to parse {}: {e}", file.display()),
            json,
        ),
    }
}
