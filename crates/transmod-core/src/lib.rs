#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod host;
pub mod locator;
pub mod resolver;
pub mod version;

pub use config::{RuleSchema, TranspileOptions};
pub use error::{Error, Result};
pub use host::{BuildContext, HostConfig, PatchReport, PatchWarning, TranspileModules};
pub use locator::{
    decide_external, resolve_import_request, resolve_modules, DirectorySet, ImportDecision,
    PathPredicates,
};
pub use resolver::{resolve, ResolveContext, ResolveReasonCode, ResolveResult, ResolverConfig};
pub use version::VERSION;
