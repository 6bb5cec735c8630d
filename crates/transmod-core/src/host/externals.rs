//! Externals entries and the guard wrapped around externals hooks.
//!
//! A host decides per import whether to bundle it or leave it to the runtime
//! (`require` at run time). Hooks that make that decision are wrapped so
//! imports landing in a transpiled package are always bundled.

use crate::config::{RuleSchema, TranspileOptions};
use crate::locator::{decide_external_with, DirectorySet, ImportDecision};
use crate::resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// One import seen by an externals hook.
///
/// Both host callback shapes (`(context, request, cb)` and
/// `({ context, request }, cb)`) carry the same two values.
#[derive(Debug, Clone, Copy)]
pub struct ExternalRequest<'a> {
    /// Directory of the importing module.
    pub context: &'a Path,
    /// The import specifier as written.
    pub request: &'a str,
}

impl<'a> ExternalRequest<'a> {
    #[must_use]
    pub fn new(context: &'a Path, request: &'a str) -> Self {
        Self { context, request }
    }
}

/// What to do with an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "name", rename_all = "snake_case")]
pub enum ExternalOutcome {
    /// Bundle the import.
    Bundle,
    /// Leave it to the runtime under this name.
    External(String),
}

/// Host externals callback.
pub trait ExternalsHook: Send + Sync {
    fn call(&self, request: &ExternalRequest<'_>) -> ExternalOutcome;
}

impl<F> ExternalsHook for F
where
    F: Fn(&ExternalRequest<'_>) -> ExternalOutcome + Send + Sync,
{
    fn call(&self, request: &ExternalRequest<'_>) -> ExternalOutcome {
        self(request)
    }
}

/// A named externals hook, optionally bound to an implementation.
///
/// Only the name survives serialisation; a deserialised hook is unbound.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct HookRef {
    #[serde(rename = "hook")]
    pub name: String,
    #[serde(skip)]
    implementation: Option<Arc<dyn ExternalsHook>>,
}

impl HookRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implementation: None,
        }
    }

    #[must_use]
    pub fn bound(name: impl Into<String>, hook: Arc<dyn ExternalsHook>) -> Self {
        Self {
            name: name.into(),
            implementation: Some(hook),
        }
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.implementation.is_some()
    }

    /// Call the implementation; unbound hooks bundle.
    #[must_use]
    pub fn call(&self, request: &ExternalRequest<'_>) -> ExternalOutcome {
        match &self.implementation {
            Some(hook) => hook.call(request),
            None => ExternalOutcome::Bundle,
        }
    }
}

impl fmt::Debug for HookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRef")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// A hook that only runs for imports outside the transpiled directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardedHook {
    #[serde(flatten)]
    pub hook: HookRef,
    /// Directories whose imports are always bundled.
    pub guard: DirectorySet,
    /// Callback shape the host invokes the hook with.
    #[serde(default)]
    pub schema: RuleSchema,
    /// Resolve imports to real paths, matching how `guard` was built.
    #[serde(default, rename = "resolveSymlinks")]
    pub resolve_symlinks: bool,
}

impl GuardedHook {
    /// Resolver settings used to place imports relative to `guard`.
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            preserve_symlinks: !self.resolve_symlinks,
            ..ResolverConfig::default()
        }
    }

    #[must_use]
    pub fn evaluate(&self, request: &ExternalRequest<'_>) -> ExternalOutcome {
        let config = self.resolver_config();
        match decide_external_with(request.context, request.request, &self.guard, &config) {
            ImportDecision::HandledLocally => {
                trace!(request = request.request, hook = %self.hook.name, "bundling transpiled import");
                ExternalOutcome::Bundle
            }
            ImportDecision::Delegate => self.hook.call(request),
        }
    }
}

/// One entry of the host's externals list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalEntry {
    /// A package name left to the runtime.
    Name(String),
    /// A hook wrapped by the adapter.
    Guarded(GuardedHook),
    /// A hook as the host configured it.
    Hook(HookRef),
    /// Anything else the host accepts (maps, patterns). Passed through.
    Other(Value),
}

impl ExternalEntry {
    #[must_use]
    pub fn is_hook(&self) -> bool {
        matches!(self, Self::Hook(_))
    }

    /// Evaluate this entry for one import.
    #[must_use]
    pub fn evaluate(&self, request: &ExternalRequest<'_>) -> ExternalOutcome {
        match self {
            Self::Name(name) if name == request.request => ExternalOutcome::External(name.clone()),
            Self::Name(_) | Self::Other(_) => ExternalOutcome::Bundle,
            Self::Guarded(guarded) => guarded.evaluate(request),
            Self::Hook(hook) => hook.call(request),
        }
    }

    /// Wrap a hook entry with a guard over `directories`, resolved the way
    /// `options` resolved them. Other entries are returned unchanged.
    #[must_use]
    pub fn guarded(self, directories: &DirectorySet, options: &TranspileOptions) -> Self {
        match self {
            Self::Hook(hook) => Self::Guarded(GuardedHook {
                hook,
                guard: directories.clone(),
                schema: options.rule_schema,
                resolve_symlinks: options.resolve_symlinks,
            }),
            other => other,
        }
    }
}

/// Evaluate an externals list in order; the first entry that externalises
/// the import wins.
#[must_use]
pub fn evaluate_externals(entries: &[ExternalEntry], request: &ExternalRequest<'_>) -> ExternalOutcome {
    entries
        .iter()
        .map(|entry| entry.evaluate(request))
        .find(|outcome| matches!(outcome, ExternalOutcome::External(_)))
        .unwrap_or(ExternalOutcome::Bundle)
}
