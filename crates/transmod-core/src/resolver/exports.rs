//! Package.json `exports` / `imports` evaluation.
//!
//! Follows Node's conditional exports rules for CommonJS `require`:
//! - Root exports (string, array, `"."`, or a root conditions object)
//! - Subpath exports (`"./feature"`)
//! - Pattern exports with a single `*` wildcard
//! - Conditions are matched in the object's key order against the active set

use serde_json::{Map, Value};

/// Resolve exports for a subpath, or the package root when `subpath` is `None`.
///
/// `subpath` must be in `"./..."` form. Returns the target (starting with
/// `"./"`) if one is selected.
#[must_use]
pub fn resolve_exports(
    pkg_json: &Value,
    subpath: Option<&str>,
    conditions: &[&str],
) -> Option<String> {
    match subpath {
        None => resolve_exports_root(pkg_json, conditions),
        Some(sub) => resolve_exports_subpath(pkg_json, sub, conditions)
            .or_else(|| resolve_exports_pattern(pkg_json, sub, conditions)),
    }
}

/// Resolve the root export.
///
/// Supported shapes:
/// - `exports: "./path"`
/// - `exports: ["./a.js", "./b.js"]`
/// - `exports: { ".": <target> }`
/// - `exports: { "require": "./cjs.js", "default": "./d.js" }`
#[must_use]
fn resolve_exports_root(pkg_json: &Value, conditions: &[&str]) -> Option<String> {
    let exports = pkg_json.get("exports")?;

    let Some(obj) = exports.as_object() else {
        return resolve_target(exports, conditions);
    };

    if let Some(dot) = obj.get(".") {
        return resolve_target(dot, conditions);
    }

    if is_conditions_object(obj) {
        return resolve_target(exports, conditions);
    }

    None
}

/// Resolve an exact subpath key such as `"./feature"`.
#[must_use]
fn resolve_exports_subpath(
    pkg_json: &Value,
    subpath: &str,
    conditions: &[&str],
) -> Option<String> {
    if !subpath.starts_with("./") {
        return None;
    }

    let obj = pkg_json.get("exports")?.as_object()?;
    if is_conditions_object(obj) {
        return None;
    }

    resolve_target(obj.get(subpath)?, conditions)
}

/// Resolve a pattern key such as `"./features/*"`.
///
/// The longest matching key wins, ties broken lexicographically.
#[must_use]
fn resolve_exports_pattern(
    pkg_json: &Value,
    subpath: &str,
    conditions: &[&str],
) -> Option<String> {
    if !subpath.starts_with("./") {
        return None;
    }

    let obj = pkg_json.get("exports")?.as_object()?;
    resolve_pattern_in(obj, subpath, conditions)
}

/// Resolve a `#`-prefixed specifier through the `imports` field.
#[must_use]
pub fn resolve_imports_map(pkg_json: &Value, spec: &str, conditions: &[&str]) -> Option<String> {
    if !spec.starts_with('#') {
        return None;
    }

    let imports = pkg_json.get("imports")?.as_object()?;

    if let Some(target) = imports.get(spec) {
        return resolve_target(target, conditions);
    }

    resolve_pattern_in(imports, spec, conditions)
}

/// True when no key starts with `.`; Node treats such an object as conditions.
fn is_conditions_object(obj: &Map<String, Value>) -> bool {
    !obj.is_empty() && obj.keys().all(|k| !k.starts_with('.'))
}

fn resolve_pattern_in(
    map: &Map<String, Value>,
    subpath: &str,
    conditions: &[&str],
) -> Option<String> {
    let mut best: Option<(&str, &Value, &str)> = None;

    for (key, value) in map {
        if key.matches('*').count() != 1 {
            continue;
        }
        let Some(star) = match_pattern(key, subpath) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_key, _, _)) => {
                key.len() > best_key.len() || (key.len() == best_key.len() && key.as_str() < best_key)
            }
        };
        if better {
            best = Some((key.as_str(), value, star));
        }
    }

    let (_, value, star) = best?;
    let target = resolve_target(value, conditions)?;
    substitute_star(&target, star)
}

/// Match a pattern key against a subpath, returning the `*` value.
fn match_pattern<'a>(pattern: &str, subpath: &'a str) -> Option<&'a str> {
    let (prefix, suffix) = pattern.split_once('*')?;

    if subpath.len() < prefix.len() + suffix.len() {
        return None;
    }
    if !subpath.starts_with(prefix) || !subpath.ends_with(suffix) {
        return None;
    }

    let star = &subpath[prefix.len()..subpath.len() - suffix.len()];
    if star.is_empty() {
        return None;
    }
    Some(star)
}

/// Substitute `*` in a target, rejecting traversal out of the package.
fn substitute_star(target: &str, star: &str) -> Option<String> {
    if !target.contains('*') {
        return None;
    }

    let result = target.replace('*', star);
    if result.split('/').any(|segment| segment == "..") {
        return None;
    }
    validate_target(&result)
}

/// Select a target from a string, fallback array, or conditions object.
fn resolve_target(target: &Value, conditions: &[&str]) -> Option<String> {
    match target {
        Value::String(s) => validate_target(s),
        Value::Array(items) => items.iter().find_map(|t| resolve_target(t, conditions)),
        Value::Object(obj) => obj
            .iter()
            .filter(|(key, _)| key.as_str() == "default" || conditions.contains(&key.as_str()))
            .find_map(|(_, value)| resolve_target(value, conditions)),
        _ => None,
    }
}

/// Targets must be package-relative (`"./..."`).
fn validate_target(path: &str) -> Option<String> {
    path.starts_with("./").then(|| path.to_string())
}
