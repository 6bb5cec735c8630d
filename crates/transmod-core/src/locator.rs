//! Module locator: package names to directories, and membership predicates.
//!
//! A [`DirectorySet`] is computed once per configuration from the list of
//! packages to transpile and is never mutated afterwards. Membership uses
//! substring containment of the directory's string form, so a directory
//! `/nm/pkg-foo` also matches paths under `/nm/pkg-foobar`. Host tools rely on
//! this looser matching; it is kept as-is.

use crate::error::{Error, Result};
use crate::resolver::{join_normalized, resolve, ResolveContext, ResolveReasonCode, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Ordered directories of the packages to transpile.
///
/// Order follows the input package list; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectorySet {
    directories: Arc<[PathBuf]>,
}

impl Default for DirectorySet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DirectorySet {
    #[must_use]
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories: directories.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.directories
    }

    /// True iff `candidate` contains any directory as a substring.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.directories
            .iter()
            .any(|dir| candidate.contains(dir_str(dir).as_ref()))
    }

    /// True iff `candidate` contains none of the directories.
    #[must_use]
    pub fn excludes(&self, candidate: &str) -> bool {
        !self.matches(candidate)
    }

    /// [`matches`](Self::matches) for a path value.
    #[must_use]
    pub fn matches_path(&self, candidate: &Path) -> bool {
        self.matches(&candidate.to_string_lossy())
    }

    /// Build the `matches` / `excludes` predicate pair.
    #[must_use]
    pub fn predicates(&self) -> PathPredicates {
        PathPredicates { set: self.clone() }
    }

    /// Negated watch-ignore globs, `!<directory>/**`, in set order.
    #[must_use]
    pub fn watch_globs(&self) -> Vec<String> {
        self.directories
            .iter()
            .map(|dir| format!("!{}/**", dir_str(dir)))
            .collect()
    }
}

fn dir_str(dir: &Path) -> Cow<'_, str> {
    dir.to_string_lossy()
}

/// Path-membership predicates handed to the host build tool.
///
/// Cheap to clone; safe to evaluate from any thread.
#[derive(Debug, Clone)]
pub struct PathPredicates {
    set: DirectorySet,
}

impl PathPredicates {
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.set.matches(candidate)
    }

    #[must_use]
    pub fn excludes(&self, candidate: &str) -> bool {
        self.set.excludes(candidate)
    }

    #[must_use]
    pub fn directories(&self) -> &DirectorySet {
        &self.set
    }

    /// Owned `matches` closure for hosts that take plain callbacks.
    #[must_use]
    pub fn matcher(&self) -> impl Fn(&str) -> bool + Send + Sync + 'static {
        let set = self.set.clone();
        move |candidate: &str| set.matches(candidate)
    }

    /// Owned `excludes` closure for hosts that take plain callbacks.
    #[must_use]
    pub fn excluder(&self) -> impl Fn(&str) -> bool + Send + Sync + 'static {
        let set = self.set.clone();
        move |candidate: &str| set.excludes(candidate)
    }
}

/// Resolve each package to the directory containing its entry file.
///
/// Resolution starts from `base` (made absolute against the current
/// directory). Any unresolvable package fails the whole call.
pub fn resolve_modules<S: AsRef<str>>(
    base: &Path,
    modules: &[S],
    config: &ResolverConfig,
) -> Result<DirectorySet> {
    if modules.is_empty() {
        return Ok(DirectorySet::default());
    }

    let base = if base.is_absolute() {
        base.to_path_buf()
    } else {
        std::env::current_dir()?.join(base)
    };
    let ctx = ResolveContext::new(base, config);

    let directories = modules
        .iter()
        .map(|module| {
            let module = module.as_ref();
            let result = resolve(&ctx, module);

            let Some(entry) = result.resolved else {
                return Err(Error::UnresolvableModule {
                    module: module.to_string(),
                    reason: result.reason.unwrap_or(ResolveReasonCode::NotFound),
                    tried: result.tried,
                });
            };

            let dir = entry.parent().map_or_else(|| entry.clone(), Path::to_path_buf);
            debug!(module, entry = %entry.display(), dir = %dir.display(), "resolved module");
            Ok(dir)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DirectorySet::new(directories))
}

/// Whether an import made from `context` lands inside the set.
///
/// Requests starting with `.` are joined lexically onto `context`; anything
/// else is resolved like `require` from `context`. Resolution failures
/// count as "not in the set".
#[must_use]
pub fn resolve_import_request(context: &Path, request: &str, set: &DirectorySet) -> bool {
    resolve_import_request_with(context, request, set, &ResolverConfig::default())
}

/// [`resolve_import_request`] with an explicit resolver configuration.
#[must_use]
pub fn resolve_import_request_with(
    context: &Path,
    request: &str,
    set: &DirectorySet,
    config: &ResolverConfig,
) -> bool {
    if set.is_empty() {
        return false;
    }

    if request.starts_with('.') {
        return set.matches_path(&join_normalized(context, request));
    }

    let result = resolve(&ResolveContext::new(context, config), request);
    match result.resolved {
        Some(resolved) => set.matches_path(&resolved),
        None => {
            debug!(request, reason = ?result.reason, "import not resolved, treating as outside");
            false
        }
    }
}

/// Outcome of the externals check for one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportDecision {
    /// Import belongs to a transpiled package: bundle it.
    HandledLocally,
    /// Defer to the externals hook the host configured.
    Delegate,
}

/// Decide whether the host's externals hook should see this import.
#[must_use]
pub fn decide_external(context: &Path, request: &str, set: &DirectorySet) -> ImportDecision {
    decide_external_with(context, request, set, &ResolverConfig::default())
}

/// [`decide_external`] with an explicit resolver configuration.
#[must_use]
pub fn decide_external_with(
    context: &Path,
    request: &str,
    set: &DirectorySet,
    config: &ResolverConfig,
) -> ImportDecision {
    if resolve_import_request_with(context, request, set, config) {
        ImportDecision::HandledLocally
    } else {
        ImportDecision::Delegate
    }
}
