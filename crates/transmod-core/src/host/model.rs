//! Typed model of the host build configuration.
//!
//! Only the parts the adapter touches are typed; everything else is carried
//! through `extra` maps untouched. The model round-trips through JSON so a
//! snapshot of a host configuration can be patched outside the host.

use crate::locator::DirectorySet;
use regex_lite::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Host build configuration (the part handed to the `webpack` hook).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    #[serde(default)]
    pub resolve: ResolveOptions,
    #[serde(default)]
    pub module: ModuleOptions,
    /// Absent on hosts that do not configure externals at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externals: Option<Vec<super::ExternalEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symlinks: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleOptions {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A module rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Rule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<bool>,
    /// Loader reference, webpack 4 style. Opaque to the adapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<Value>,
    /// Loader reference, webpack 5 style. Opaque to the adapter.
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_loaders: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rule {
    /// Whether this rule applies to `resource`: `test`, then `include`, then
    /// `exclude`. Missing clauses do not restrict.
    #[must_use]
    pub fn applies_to(&self, resource: &str) -> bool {
        self.test.as_ref().map_or(true, |c| c.test(resource))
            && self.include.as_ref().map_or(true, |c| c.test(resource))
            && !self.exclude.as_ref().is_some_and(|c| c.test(resource))
    }
}

/// A regular expression as the host stores it: source plus flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flags: String,
}

impl RulePattern {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: String::new(),
        }
    }

    /// Host regex equality: same source and same `g` / `i` / `m` flags.
    #[must_use]
    pub fn same_as(&self, other: &RulePattern) -> bool {
        self.source == other.source
            && ['g', 'i', 'm']
                .iter()
                .all(|flag| self.flags.contains(*flag) == other.flags.contains(*flag))
    }

    /// Compile for matching. `None` if the source is not supported.
    #[must_use]
    pub fn compile(&self) -> Option<Regex> {
        let mut inline = String::new();
        if self.flags.contains('i') {
            inline.push('i');
        }
        if self.flags.contains('m') {
            inline.push('m');
        }

        let pattern = if inline.is_empty() {
            self.source.clone()
        } else {
            format!("(?{inline}){}", self.source)
        };
        Regex::new(&pattern).ok()
    }

    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.compile().is_some_and(|re| re.is_match(haystack))
    }
}

/// Rule condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Absolute path prefix.
    Path(String),
    /// Host array form: any of the listed conditions.
    Any(Vec<Condition>),
    /// Membership in the transpiled directories.
    Directories(DirectoryCondition),
    Pattern(RulePattern),
}

impl Condition {
    #[must_use]
    pub fn test(&self, resource: &str) -> bool {
        match self {
            Self::Path(prefix) => resource.starts_with(prefix.as_str()),
            Self::Any(conditions) => conditions.iter().any(|c| c.test(resource)),
            Self::Directories(cond) => cond.test(resource),
            Self::Pattern(pattern) => pattern.is_match(resource),
        }
    }

    /// Whether this is a pattern equal to `wanted` under host regex equality.
    #[must_use]
    pub fn is_pattern(&self, wanted: &RulePattern) -> bool {
        matches!(self, Self::Pattern(pattern) if pattern.same_as(wanted))
    }

    /// `matches` predicate over the set.
    #[must_use]
    pub fn in_directories(directories: DirectorySet) -> Self {
        Self::Directories(DirectoryCondition::InDirectories { directories })
    }

    /// `excludes` predicate over the set.
    #[must_use]
    pub fn outside_directories(directories: DirectorySet) -> Self {
        Self::Directories(DirectoryCondition::OutsideDirectories { directories })
    }
}

/// Directory membership predicates contributed by the adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryCondition {
    InDirectories { directories: DirectorySet },
    OutsideDirectories { directories: DirectorySet },
}

impl DirectoryCondition {
    #[must_use]
    pub fn test(&self, resource: &str) -> bool {
        match self {
            Self::InDirectories { directories } => directories.matches(resource),
            Self::OutsideDirectories { directories } => directories.excludes(resource),
        }
    }
}

/// Issuer clause: which importing modules a rule applies to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issuer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Vec<Condition>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issuer {
    #[must_use]
    pub fn test(&self, issuer: &str) -> bool {
        self.and
            .as_ref()
            .map_or(true, |all| all.iter().all(|c| c.test(issuer)))
            && self
                .or
                .as_ref()
                .map_or(true, |any| any.iter().any(|c| c.test(issuer)))
            && self
                .not
                .as_ref()
                .map_or(true, |none| !none.iter().any(|c| c.test(issuer)))
    }
}

/// Context handed to the `webpack` hook alongside the config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_loaders: Option<DefaultLoaders>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultLoaders {
    /// The host's default JavaScript/TypeScript loader.
    pub babel: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Config handed to the dev-middleware hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevMiddlewareConfig {
    #[serde(default)]
    pub watch_options: WatchOptions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Glob patterns the watcher ignores; `!` entries re-include.
    #[serde(default, deserialize_with = "one_or_many")]
    pub ignored: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept `"glob"` as well as `["glob", ...]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(glob)) => vec![glob],
        Some(OneOrMany::Many(globs)) => globs,
    })
}
