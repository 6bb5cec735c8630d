//! Host build tool adapter.
//!
//! Takes the directory set computed by [`crate::locator`] and folds it into a
//! host build configuration: a transpile rule, guarded externals hooks,
//! patched style-module rules and watcher re-includes. The locator never
//! depends on this module.

pub mod externals;
pub mod model;
pub mod plugin;

pub use externals::{
    evaluate_externals, ExternalEntry, ExternalOutcome, ExternalRequest, ExternalsHook,
    GuardedHook, HookRef,
};
pub use model::{
    BuildContext, Condition, DefaultLoaders, DevMiddlewareConfig, DirectoryCondition, HostConfig,
    Issuer, ModuleOptions, ResolveOptions, Rule, RulePattern, WatchOptions,
};
pub use plugin::{
    codes, with_transpile_modules, DevMiddlewareHook, PatchReport, PatchWarning, Patched,
    TranspileModules, WebpackHook,
};
