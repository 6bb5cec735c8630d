//! `transmod resolve` command implementation.
//!
//! Resolves module names to the directories that get transpiled.

use super::{fail, load_options, path_strings, Overrides};
use miette::Result;
use std::path::Path;
use transmod_core::resolve_modules;

/// Run the resolve command.
pub fn run(cwd: &Path, overrides: &Overrides, modules: &[String], json: bool) -> Result<()> {
    let options = load_options(cwd, overrides, json);
    let modules: Vec<String> = if modules.is_empty() {
        options.modules.clone()
    } else {
        modules.to_vec()
    };

    if modules.is_empty() {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "ok": true,
                    "modules": [],
                    "directories": []
                })
            );
        } else {
            println!("No modules configured.");
            println!("hint: Add \"transpileModules\" to package.json or pass --module <NAME>");
        }
        return Ok(());
    }

    let set = match resolve_modules(cwd, &modules, &options.resolver_config()) {
        Ok(set) => set,
        Err(e) => fail(e.code(), &e.to_string(), json),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "modules": modules,
                "directories": path_strings(&set)
            })
        );
    } else {
        for (module, dir) in modules.iter().zip(set.iter()) {
            println!("{module}");
            println!("  {}", dir.display());
        }
    }

    Ok(())
}
