//! `transmod globs` command implementation.

use super::{load_directories, load_options, Overrides};
use miette::Result;
use std::path::Path;

/// Run the globs command.
pub fn run(cwd: &Path, overrides: &Overrides, json: bool) -> Result<()> {
    let options = load_options(cwd, overrides, json);
    let globs = load_directories(cwd, &options, json).watch_globs();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "globs": globs
            })
        );
    } else {
        for glob in &globs {
            println!("{glob}");
        }
    }

    Ok(())
}
