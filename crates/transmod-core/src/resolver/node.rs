//! Node `require` resolution.
//!
//! Supports:
//! - Relative specifiers: `./`, `../`, `.`, `..`
//! - Absolute filesystem specifiers
//! - Bare specifiers with `node_modules` lookup (scoped names, subpaths)
//! - Extension probing (appended, as Node does: `x.min` -> `x.min.js`)
//! - Directory resolution (`package.json` main, then `index.*`)
//! - `package.json` exports (root, subpath, `*` patterns, conditions)
//! - `package.json` imports (`#`-prefixed specifiers)
//! - Builtin modules (`fs`, `node:fs`) reported as unresolved

use super::exports::{resolve_exports, resolve_imports_map};
use super::normalize_lexically;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions Node probes for `require`.
pub const NODE_EXTENSIONS: &[&str] = &[".js", ".json", ".node"];

/// Conditions active for a CommonJS `require` (`default` always matches).
pub const REQUIRE_CONDITIONS: &[&str] = &["require", "node", "default"];

/// Maximum number of tried paths to record.
const MAX_TRIED_PATHS: usize = 20;

/// Node core modules. Subpath builtins (`fs/promises`) are listed explicitly.
const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Check whether a specifier names a Node core module.
#[must_use]
pub fn is_builtin(spec: &str) -> bool {
    spec.starts_with("node:") || BUILTIN_MODULES.contains(&spec)
}

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Extensions to probe (in order).
    pub extensions: &'static [&'static str],
    /// Export conditions considered active.
    pub conditions: &'static [&'static str],
    /// Keep symlinked paths as found instead of returning real paths.
    pub preserve_symlinks: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: NODE_EXTENSIONS,
            conditions: REQUIRE_CONDITIONS,
            preserve_symlinks: true,
        }
    }
}

/// Context for resolution.
#[derive(Debug, Clone)]
pub struct ResolveContext<'a> {
    /// Directory the request is made from.
    pub parent: PathBuf,
    /// Resolver configuration.
    pub config: &'a ResolverConfig,
}

impl<'a> ResolveContext<'a> {
    #[must_use]
    pub fn new(parent: impl Into<PathBuf>, config: &'a ResolverConfig) -> Self {
        Self {
            parent: parent.into(),
            config,
        }
    }
}

/// Resolution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    Resolved,
    Unresolved,
}

/// Reason codes for unresolved specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveReasonCode {
    SpecifierInvalid,
    UnsupportedScheme,
    /// Core module; has no location on disk.
    BuiltinModule,
    NotFound,
    IsDirectory,
    NodeModulesNotFound,
    /// exports selected a target that does not exist
    ExportsTargetNotFound,
    /// exports exists but does not expose the subpath
    ExportsNotFound,
    ImportsNotFound,
}

impl std::fmt::Display for ResolveReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SpecifierInvalid => "SPECIFIER_INVALID",
            Self::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            Self::BuiltinModule => "BUILTIN_MODULE",
            Self::NotFound => "NOT_FOUND",
            Self::IsDirectory => "IS_DIRECTORY",
            Self::NodeModulesNotFound => "NODE_MODULES_NOT_FOUND",
            Self::ExportsTargetNotFound => "EXPORTS_TARGET_NOT_FOUND",
            Self::ExportsNotFound => "EXPORTS_NOT_FOUND",
            Self::ImportsNotFound => "IMPORTS_NOT_FOUND",
        };
        write!(f, "{s}")
    }
}

/// Resolution result.
#[derive(Debug, Clone)]
pub struct ResolveResult {
    /// Resolved absolute path (if successful).
    pub resolved: Option<PathBuf>,
    /// Status.
    pub status: ResolveStatus,
    /// Reason code if unresolved.
    pub reason: Option<ResolveReasonCode>,
    /// Candidate paths tried (capped).
    pub tried: Vec<PathBuf>,
}

impl ResolveResult {
    fn resolved(path: PathBuf, tried: Vec<PathBuf>) -> Self {
        Self {
            resolved: Some(path),
            status: ResolveStatus::Resolved,
            reason: None,
            tried,
        }
    }

    fn unresolved(reason: ResolveReasonCode, tried: Vec<PathBuf>) -> Self {
        Self {
            resolved: None,
            status: ResolveStatus::Unresolved,
            reason: Some(reason),
            tried,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status == ResolveStatus::Resolved
    }
}

/// Resolve a specifier from `ctx.parent`.
#[must_use]
pub fn resolve(ctx: &ResolveContext<'_>, spec: &str) -> ResolveResult {
    let mut tried = Vec::new();

    if spec.is_empty() {
        return ResolveResult::unresolved(ResolveReasonCode::SpecifierInvalid, tried);
    }

    if is_builtin(spec) {
        return ResolveResult::unresolved(ResolveReasonCode::BuiltinModule, tried);
    }

    if spec.contains("://") || spec.starts_with("data:") {
        return ResolveResult::unresolved(ResolveReasonCode::UnsupportedScheme, tried);
    }

    if spec.starts_with('#') {
        return resolve_hash_import(ctx, spec, &mut tried);
    }

    if is_relative(spec) {
        let base = ctx.parent.join(spec);
        return resolve_path(ctx, &base, &mut tried);
    }

    if is_absolute_path(spec) {
        return resolve_path(ctx, Path::new(spec), &mut tried);
    }

    resolve_bare(ctx, spec, &mut tried)
}

fn is_relative(spec: &str) -> bool {
    spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../")
}

/// Check if a specifier is an absolute path.
fn is_absolute_path(spec: &str) -> bool {
    if spec.starts_with('/') || spec.starts_with("\\\\") {
        return true;
    }

    // Windows drive: C:\ or C:/
    let bytes = spec.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Read and parse a package.json; invalid files are treated as absent.
fn read_pkg_json(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Resolve a `#`-prefixed specifier via the nearest package.json `imports`.
fn resolve_hash_import(
    ctx: &ResolveContext<'_>,
    spec: &str,
    tried: &mut Vec<PathBuf>,
) -> ResolveResult {
    let mut current = Some(ctx.parent.as_path());

    while let Some(dir) = current {
        let pkg_json_path = dir.join("package.json");

        if pkg_json_path.is_file() {
            add_tried(tried, &pkg_json_path);

            if let Some(target) = read_pkg_json(&pkg_json_path)
                .and_then(|pkg| resolve_imports_map(&pkg, spec, ctx.config.conditions))
            {
                let target_path = dir.join(target.trim_start_matches("./"));
                return resolve_file(ctx, &target_path, tried)
                    .unwrap_or_else(|| {
                        ResolveResult::unresolved(ResolveReasonCode::NotFound, tried.clone())
                    });
            }

            // The nearest package.json owns the import map.
            return ResolveResult::unresolved(ResolveReasonCode::ImportsNotFound, tried.clone());
        }

        current = dir.parent();
    }

    ResolveResult::unresolved(ResolveReasonCode::ImportsNotFound, tried.clone())
}

/// Resolve a file or directory path.
fn resolve_path(ctx: &ResolveContext<'_>, base: &Path, tried: &mut Vec<PathBuf>) -> ResolveResult {
    if let Some(result) = resolve_file(ctx, base, tried) {
        return result;
    }

    resolve_directory(ctx, base, tried)
}

/// Try `base` as a file, then `base` + each extension.
fn resolve_file(
    ctx: &ResolveContext<'_>,
    base: &Path,
    tried: &mut Vec<PathBuf>,
) -> Option<ResolveResult> {
    add_tried(tried, base);
    if base.is_file() {
        return Some(ResolveResult::resolved(finalize(ctx, base), tried.clone()));
    }

    for ext in ctx.config.extensions {
        let with_ext = append_extension(base, ext);
        add_tried(tried, &with_ext);

        if with_ext.is_file() {
            return Some(ResolveResult::resolved(finalize(ctx, &with_ext), tried.clone()));
        }
    }

    None
}

/// Try `dir/index` + each extension.
fn resolve_index(
    ctx: &ResolveContext<'_>,
    dir: &Path,
    tried: &mut Vec<PathBuf>,
) -> Option<ResolveResult> {
    for ext in ctx.config.extensions {
        let index = dir.join(format!("index{ext}"));
        add_tried(tried, &index);

        if index.is_file() {
            return Some(ResolveResult::resolved(finalize(ctx, &index), tried.clone()));
        }
    }

    None
}

/// Resolve a directory (package.json main > index.*).
fn resolve_directory(
    ctx: &ResolveContext<'_>,
    dir: &Path,
    tried: &mut Vec<PathBuf>,
) -> ResolveResult {
    let pkg_json_path = dir.join("package.json");

    if pkg_json_path.is_file() {
        add_tried(tried, &pkg_json_path);

        let main = read_pkg_json(&pkg_json_path)
            .and_then(|pkg| pkg.get("main").and_then(Value::as_str).map(str::to_string))
            .filter(|main| !main.is_empty());

        if let Some(main) = main {
            let main_path = dir.join(&main);

            if let Some(result) = resolve_file(ctx, &main_path, tried) {
                return result;
            }
            if let Some(result) = resolve_index(ctx, &main_path, tried) {
                return result;
            }
        }
    }

    if let Some(result) = resolve_index(ctx, dir, tried) {
        return result;
    }

    if dir.is_dir() {
        return ResolveResult::unresolved(ResolveReasonCode::IsDirectory, tried.clone());
    }

    ResolveResult::unresolved(ResolveReasonCode::NotFound, tried.clone())
}

/// Resolve a bare specifier via `node_modules`, walking up from the parent.
fn resolve_bare(ctx: &ResolveContext<'_>, spec: &str, tried: &mut Vec<PathBuf>) -> ResolveResult {
    let Some((pkg_name, subpath)) = parse_bare_specifier(spec) else {
        return ResolveResult::unresolved(ResolveReasonCode::SpecifierInvalid, tried.clone());
    };

    let mut found_node_modules = false;
    let mut specific_error: Option<ResolveReasonCode> = None;
    let mut current = Some(ctx.parent.as_path());

    while let Some(dir) = current {
        current = dir.parent();

        // Node never looks for node_modules/node_modules.
        if dir.file_name().is_some_and(|name| name == "node_modules") {
            continue;
        }

        let node_modules = dir.join("node_modules");
        if !node_modules.is_dir() {
            continue;
        }
        found_node_modules = true;

        let pkg_dir = node_modules.join(pkg_name);
        let result = match resolve_package_exports(ctx, &pkg_dir, subpath, tried) {
            Some(result) => result,
            None => resolve_path(ctx, &node_modules.join(spec), tried),
        };

        if result.is_resolved() {
            return result;
        }

        if let Some(
            reason @ (ResolveReasonCode::ExportsTargetNotFound
            | ResolveReasonCode::ExportsNotFound),
        ) = result.reason
        {
            specific_error = Some(reason);
        }
    }

    if let Some(error) = specific_error {
        return ResolveResult::unresolved(error, tried.clone());
    }

    if found_node_modules {
        ResolveResult::unresolved(ResolveReasonCode::NotFound, tried.clone())
    } else {
        ResolveResult::unresolved(ResolveReasonCode::NodeModulesNotFound, tried.clone())
    }
}

/// Resolve through a package's `exports` field.
///
/// Returns `None` when the package has no `exports`, or when a root request
/// matches no condition; the caller then falls back to `main` / `index.*`.
fn resolve_package_exports(
    ctx: &ResolveContext<'_>,
    pkg_dir: &Path,
    subpath: Option<&str>,
    tried: &mut Vec<PathBuf>,
) -> Option<ResolveResult> {
    let pkg_json_path = pkg_dir.join("package.json");
    if !pkg_json_path.is_file() {
        return None;
    }
    add_tried(tried, &pkg_json_path);

    let pkg_json = read_pkg_json(&pkg_json_path)?;
    pkg_json.get("exports")?;

    let exports_subpath = subpath.map(|sub| format!("./{sub}"));
    let Some(target) = resolve_exports(&pkg_json, exports_subpath.as_deref(), ctx.config.conditions)
    else {
        return match subpath {
            None => None,
            Some(_) => Some(ResolveResult::unresolved(
                ResolveReasonCode::ExportsNotFound,
                tried.clone(),
            )),
        };
    };

    let target_path = pkg_dir.join(target.trim_start_matches("./"));
    Some(resolve_file(ctx, &target_path, tried).unwrap_or_else(|| {
        ResolveResult::unresolved(ResolveReasonCode::ExportsTargetNotFound, tried.clone())
    }))
}

/// Split a bare specifier into package name and optional subpath.
///
/// `"lodash/fp"` -> `("lodash", Some("fp"))`,
/// `"@scope/pkg/sub"` -> `("@scope/pkg", Some("sub"))`.
/// A scope without a name (`"@scope"`) is invalid.
fn parse_bare_specifier(spec: &str) -> Option<(&str, Option<&str>)> {
    let name_end = if spec.starts_with('@') {
        let scope_end = spec.find('/')?;
        spec[scope_end + 1..]
            .find('/')
            .map(|pos| scope_end + 1 + pos)
    } else {
        spec.find('/')
    };

    match name_end {
        Some(end) => {
            let sub = &spec[end + 1..];
            Some((&spec[..end], (!sub.is_empty()).then_some(sub)))
        }
        None => Some((spec, None)),
    }
}

/// Append an extension to the full file name.
fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_owned();
    name.push(ext);
    PathBuf::from(name)
}

/// Produce the reported path for a resolved file.
fn finalize(ctx: &ResolveContext<'_>, path: &Path) -> PathBuf {
    if ctx.config.preserve_symlinks {
        normalize_lexically(path)
    } else {
        dunce::canonicalize(path).unwrap_or_else(|_| normalize_lexically(path))
    }
}

/// Add a path to tried list (with cap).
fn add_tried(tried: &mut Vec<PathBuf>, path: &Path) {
    if tried.len() < MAX_TRIED_PATHS {
        tried.push(path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_pkg(dir: &Path, pkg_json: &serde_json::Value) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("package.json"), pkg_json.to_string()).unwrap();
    }

    fn resolve_from(parent: &Path, spec: &str) -> ResolveResult {
        let config = ResolverConfig::default();
        resolve(&ResolveContext::new(parent, &config), spec)
    }

    #[test]
    fn test_relative_file_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("dep.js"), "module.exports = {}").unwrap();

        let result = resolve_from(dir.path(), "./dep.js");
        assert_eq!(result.status, ResolveStatus::Resolved);
        assert_eq!(result.resolved, Some(dir.path().join("dep.js")));
    }

    #[test]
    fn test_extension_is_appended_not_replaced() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("jquery.min.js"), "").unwrap();

        let result = resolve_from(dir.path(), "./jquery.min");
        assert_eq!(result.resolved, Some(dir.path().join("jquery.min.js")));
    }

    #[test]
    fn test_relative_not_found() {
        let dir = tempdir().unwrap();
        let result = resolve_from(dir.path(), "./missing");
        assert_eq!(result.status, ResolveStatus::Unresolved);
        assert_eq!(result.reason, Some(ResolveReasonCode::NotFound));
        assert!(!result.tried.is_empty());
        assert!(result.tried.len() <= MAX_TRIED_PATHS);
    }

    #[test]
    fn test_bare_index_js() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("left-pad");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        let result = resolve_from(dir.path(), "left-pad");
        assert_eq!(result.resolved, Some(pkg.join("index.js")));
    }

    #[test]
    fn test_bare_walks_up_ancestors() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("left-pad");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();
        let nested = dir.path().join("packages").join("app").join("src");
        fs::create_dir_all(&nested).unwrap();

        let result = resolve_from(&nested, "left-pad");
        assert_eq!(result.resolved, Some(pkg.join("index.js")));
    }

    #[test]
    fn test_bare_main_field() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("ui");
        write_pkg(&pkg, &serde_json::json!({ "name": "ui", "main": "dist/ui" }));
        fs::create_dir_all(pkg.join("dist")).unwrap();
        fs::write(pkg.join("dist").join("ui.js"), "").unwrap();

        let result = resolve_from(dir.path(), "ui");
        assert_eq!(result.resolved, Some(pkg.join("dist").join("ui.js")));
    }

    #[test]
    fn test_main_directory_index() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("ui");
        write_pkg(&pkg, &serde_json::json!({ "main": "lib" }));
        fs::create_dir_all(pkg.join("lib")).unwrap();
        fs::write(pkg.join("lib").join("index.js"), "").unwrap();

        let result = resolve_from(dir.path(), "ui");
        assert_eq!(result.resolved, Some(pkg.join("lib").join("index.js")));
    }

    #[test]
    fn test_scoped_package() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("@org").join("design");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        let result = resolve_from(dir.path(), "@org/design");
        assert_eq!(result.resolved, Some(pkg.join("index.js")));
    }

    #[test]
    fn test_exports_preferred_over_main() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("modern");
        write_pkg(
            &pkg,
            &serde_json::json!({
                "main": "./legacy.js",
                "exports": { ".": { "import": "./esm/index.mjs", "require": "./cjs/index.js" } }
            }),
        );
        fs::write(pkg.join("legacy.js"), "").unwrap();
        fs::create_dir_all(pkg.join("cjs")).unwrap();
        fs::write(pkg.join("cjs").join("index.js"), "").unwrap();

        let result = resolve_from(dir.path(), "modern");
        assert_eq!(result.resolved, Some(pkg.join("cjs").join("index.js")));
    }

    #[test]
    fn test_exports_without_require_condition_falls_back_to_main() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("esm-only");
        write_pkg(
            &pkg,
            &serde_json::json!({
                "main": "./index.js",
                "exports": { ".": { "import": "./index.mjs" } }
            }),
        );
        fs::write(pkg.join("index.js"), "").unwrap();

        let result = resolve_from(dir.path(), "esm-only");
        assert_eq!(result.resolved, Some(pkg.join("index.js")));
    }

    #[test]
    fn test_exports_subpath_not_exported() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("sealed");
        write_pkg(&pkg, &serde_json::json!({ "exports": { ".": "./index.js" } }));
        fs::write(pkg.join("index.js"), "").unwrap();
        fs::write(pkg.join("internal.js"), "").unwrap();

        let result = resolve_from(dir.path(), "sealed/internal");
        assert_eq!(result.reason, Some(ResolveReasonCode::ExportsNotFound));
    }

    #[test]
    fn test_exports_target_missing() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("broken");
        write_pkg(&pkg, &serde_json::json!({ "exports": "./dist/index.js" }));

        let result = resolve_from(dir.path(), "broken");
        assert_eq!(result.reason, Some(ResolveReasonCode::ExportsTargetNotFound));
    }

    #[test]
    fn test_subpath_without_exports_uses_filesystem() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("lodash");
        fs::create_dir_all(pkg.join("fp")).unwrap();
        fs::write(pkg.join("fp").join("index.js"), "").unwrap();

        let result = resolve_from(dir.path(), "lodash/fp");
        assert_eq!(result.resolved, Some(pkg.join("fp").join("index.js")));
    }

    #[test]
    fn test_hash_import() {
        let dir = tempdir().unwrap();
        write_pkg(
            dir.path(),
            &serde_json::json!({ "imports": { "#env": "./src/env.js" } }),
        );
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("env.js"), "").unwrap();

        let result = resolve_from(&dir.path().join("src"), "#env");
        assert_eq!(result.resolved, Some(dir.path().join("src").join("env.js")));
    }

    #[test]
    fn test_builtins_are_not_on_disk() {
        let dir = tempdir().unwrap();
        for spec in ["fs", "node:fs", "fs/promises", "path"] {
            let result = resolve_from(dir.path(), spec);
            assert_eq!(result.reason, Some(ResolveReasonCode::BuiltinModule), "{spec}");
        }
    }

    #[test]
    fn test_unsupported_scheme_and_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_from(dir.path(), "https://cdn.example/x.js").reason,
            Some(ResolveReasonCode::UnsupportedScheme)
        );
        assert_eq!(
            resolve_from(dir.path(), "").reason,
            Some(ResolveReasonCode::SpecifierInvalid)
        );
    }

    #[test]
    fn test_parse_bare_specifier() {
        assert_eq!(parse_bare_specifier("react"), Some(("react", None)));
        assert_eq!(parse_bare_specifier("lodash/fp"), Some(("lodash", Some("fp"))));
        assert_eq!(parse_bare_specifier("@org/pkg"), Some(("@org/pkg", None)));
        assert_eq!(
            parse_bare_specifier("@org/pkg/a/b"),
            Some(("@org/pkg", Some("a/b")))
        );
        assert_eq!(parse_bare_specifier("@org"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_preserved_by_default() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("packages").join("ui");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("index.js"), "").unwrap();
        let node_modules = dir.path().join("node_modules");
        fs::create_dir_all(&node_modules).unwrap();
        std::os::unix::fs::symlink(&real, node_modules.join("ui")).unwrap();

        let preserved = resolve_from(dir.path(), "ui");
        assert_eq!(preserved.resolved, Some(node_modules.join("ui").join("index.js")));

        let config = ResolverConfig {
            preserve_symlinks: false,
            ..ResolverConfig::default()
        };
        let real_result = resolve(&ResolveContext::new(dir.path(), &config), "ui");
        let expected = dunce::canonicalize(real.join("index.js")).unwrap();
        assert_eq!(real_result.resolved, Some(expected));
    }
}
