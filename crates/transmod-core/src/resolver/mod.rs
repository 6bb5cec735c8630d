//! Module resolver for JavaScript packages.
//!
//! Implements Node's CommonJS `require` lookup: relative, absolute, and bare
//! specifiers, `node_modules` traversal, `package.json` `exports` / `imports`
//! / `main`, extension and index probing.

mod exports;
mod node;

pub use exports::{resolve_exports, resolve_imports_map};
pub use node::{
    is_builtin, resolve, ResolveContext, ResolveReasonCode, ResolveResult, ResolveStatus,
    ResolverConfig, NODE_EXTENSIONS, REQUIRE_CONDITIONS,
};

use std::path::{Component, Path, PathBuf};

/// Normalize `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching `path.resolve`.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Join `request` onto `base` and normalize the result lexically.
#[must_use]
pub fn join_normalized(base: &Path, request: &str) -> PathBuf {
    normalize_lexically(&base.join(request))
}
