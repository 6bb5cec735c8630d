//! `transmod import` command implementation.
//!
//! Shows how an import seen by the host's externals hook is decided.

use super::{load_directories, load_options, Overrides};
use miette::Result;
use std::path::Path;
use transmod_core::locator::decide_external_with;
use transmod_core::resolver::join_normalized;
use transmod_core::{resolve, ImportDecision, ResolveContext};

/// Run the import command.
pub fn run(
    cwd: &Path,
    overrides: &Overrides,
    request: &str,
    context: &Path,
    json: bool,
) -> Result<()> {
    let options = load_options(cwd, overrides, json);
    let set = load_directories(cwd, &options, json);
    let config = options.resolver_config();

    let decision = decide_external_with(context, request, &set, &config);

    // Relative requests are only joined, never resolved.
    let (resolved, reason) = if request.starts_with('.') {
        (Some(join_normalized(context, request)), None)
    } else {
        let result = resolve(&ResolveContext::new(context, &config), request);
        (result.resolved, result.reason)
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "request": request,
                "context": context.to_string_lossy(),
                "resolved": resolved.as_ref().map(|p| p.to_string_lossy()),
                "reason": reason.map(|r| r.to_string()),
                "in_directories": decision == ImportDecision::HandledLocally,
                "decision": decision
            })
        );
    } else {
        match (&resolved, reason) {
            (Some(path), _) => println!("{request} -> {}", path.display()),
            (None, Some(reason)) => println!("{request} -> unresolved ({reason})"),
            (None, None) => println!("{request} -> unresolved"),
        }
        match decision {
            ImportDecision::HandledLocally => println!("bundled: inside a transpiled package"),
            ImportDecision::Delegate => println!("delegated to the host externals hook"),
        }
    }

    Ok(())
}
