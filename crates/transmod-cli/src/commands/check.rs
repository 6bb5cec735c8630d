//! `transmod check` command implementation.

use super::{load_directories, load_options, Overrides};
use miette::Result;
use std::path::Path;

/// Run the check command.
pub fn run(cwd: &Path, overrides: &Overrides, paths: &[String], json: bool) -> Result<()> {
    let options = load_options(cwd, overrides, json);
    let predicates = load_directories(cwd, &options, json).predicates();

    if json {
        let results: Vec<_> = paths
            .iter()
            .map(|path| {
                serde_json::json!({
                    "path": path,
                    "matches": predicates.matches(path),
                    "excludes": predicates.excludes(path)
                })
            })
            .collect();

        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "results": results
            })
        );
    } else {
        for path in paths {
            let verdict = if predicates.matches(path) {
                "transpiled"
            } else {
                "excluded"
            };
            println!("{verdict:<10} {path}");
        }
    }

    Ok(())
}
