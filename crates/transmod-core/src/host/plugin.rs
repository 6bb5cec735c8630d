//! The plugin: hooks that patch a host configuration.

use super::model::{
    BuildContext, Condition, DevMiddlewareConfig, HostConfig, Issuer, Rule, RulePattern,
};
use crate::config::{RuleSchema, TranspileOptions};
use crate::error::{Error, Result};
use crate::locator::{resolve_modules, DirectorySet};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Test of the transpile rule added to the host.
pub const TRANSPILE_TEST: &str = r"\.+(js|jsx|mjs|ts|tsx)$";
/// Test identifying the host's CSS-module rule.
pub const CSS_MODULE_TEST: &str = r"\.module\.css$";
/// Test identifying the host's Sass-module rule.
pub const SASS_MODULE_TEST: &str = r"\.module\.(scss|sass)$";

/// Warning codes.
pub mod codes {
    pub const CSS_RULE_NOT_FOUND: &str = "CSS_RULE_NOT_FOUND";
    pub const SASS_RULE_NOT_FOUND: &str = "SASS_RULE_NOT_FOUND";
}

const INCOMPATIBLE_HOST_MESSAGE: &str =
    "This plugin is not compatible with Next.js versions below 5.0.0 https://err.sh/next-plugins/upgrade";

/// User `webpack` hook chained after the patch.
pub type WebpackHook<'a> = &'a dyn Fn(HostConfig, &BuildContext) -> Result<HostConfig>;

/// User dev-middleware hook chained after the patch.
pub type DevMiddlewareHook<'a> = &'a dyn Fn(DevMiddlewareConfig) -> DevMiddlewareConfig;

/// Non-fatal problem found while patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchWarning {
    pub code: &'static str,
    pub message: String,
}

/// What a `webpack` call changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchReport {
    /// Externals hooks wrapped with the directory guard.
    pub guarded_externals: usize,
    /// Style rules whose issuer clause was rewritten.
    pub patched_style_rules: Vec<&'static str>,
    pub warnings: Vec<PatchWarning>,
}

impl PatchReport {
    fn warn(&mut self, code: &'static str, message: &str) {
        warn!(code, "{message}");
        self.warnings.push(PatchWarning {
            code,
            message: message.to_string(),
        });
    }
}

/// Host configuration after the plugin ran.
#[derive(Debug, Clone)]
pub struct Patched<T> {
    pub config: T,
    pub report: PatchReport,
}

/// The plugin, holding the resolved directories.
#[derive(Debug, Clone)]
pub struct TranspileModules {
    options: TranspileOptions,
    directories: DirectorySet,
}

impl TranspileModules {
    /// Resolve `options.modules` from `base`.
    ///
    /// Returns `Ok(None)` when no modules are configured: the host
    /// configuration must then be left untouched.
    pub fn initialize(options: TranspileOptions, base: &Path) -> Result<Option<Self>> {
        if options.modules.is_empty() {
            debug!("no modules configured, plugin disabled");
            return Ok(None);
        }

        let directories = resolve_modules(base, &options.modules, &options.resolver_config())?;
        debug!(count = directories.len(), "resolved transpiled modules");
        Ok(Some(Self::from_parts(options, directories)))
    }

    /// Build from already-resolved directories.
    #[must_use]
    pub fn from_parts(options: TranspileOptions, directories: DirectorySet) -> Self {
        Self {
            options,
            directories,
        }
    }

    #[must_use]
    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    #[must_use]
    pub fn directories(&self) -> &DirectorySet {
        &self.directories
    }

    /// The `webpack` hook.
    pub fn webpack(
        &self,
        mut config: HostConfig,
        ctx: &BuildContext,
        user_hook: Option<WebpackHook<'_>>,
    ) -> Result<Patched<HostConfig>> {
        let Some(loaders) = &ctx.default_loaders else {
            return Err(Error::incompatible_host(INCOMPATIBLE_HOST_MESSAGE));
        };

        let mut report = PatchReport::default();
        let schema = self.options.rule_schema;

        config.resolve.symlinks = Some(self.options.resolve_symlinks);

        if let Some(externals) = config.externals.take() {
            config.externals = Some(
                externals
                    .into_iter()
                    .map(|entry| {
                        if entry.is_hook() {
                            report.guarded_externals += 1;
                        }
                        entry.guarded(&self.directories, &self.options)
                    })
                    .collect(),
            );
        }

        config.module.rules.push(self.transpile_rule(loaders.babel.clone()));

        self.patch_style_rules(&mut config.module.rules, &mut report);

        debug!(
            guarded_externals = report.guarded_externals,
            patched = ?report.patched_style_rules,
            schema = schema.as_str(),
            "patched host config"
        );

        let config = match user_hook {
            Some(hook) => hook(config, ctx)?,
            None => config,
        };
        Ok(Patched { config, report })
    }

    /// The dev-middleware hook: re-include the transpiled directories in the
    /// file watcher.
    #[must_use]
    pub fn dev_middleware(
        &self,
        mut config: DevMiddlewareConfig,
        user_hook: Option<DevMiddlewareHook<'_>>,
    ) -> DevMiddlewareConfig {
        let mut ignored = self.directories.watch_globs();
        ignored.append(&mut config.watch_options.ignored);
        config.watch_options.ignored = ignored;

        match user_hook {
            Some(hook) => hook(config),
            None => config,
        }
    }

    fn transpile_rule(&self, babel: serde_json::Value) -> Rule {
        let mut rule = Rule {
            test: Some(Condition::Pattern(RulePattern::new(TRANSPILE_TEST))),
            include: Some(Condition::in_directories(self.directories.clone())),
            ..Rule::default()
        };
        match self.options.rule_schema {
            RuleSchema::Webpack5 => rule.use_loaders = Some(babel),
            RuleSchema::Webpack4 => rule.loader = Some(babel),
        }
        rule
    }

    fn patch_style_rules(&self, rules: &mut [Rule], report: &mut PatchReport) {
        let Some(one_of) = rules.iter_mut().find_map(|rule| rule.one_of.as_mut()) else {
            return;
        };

        let styles = [
            (
                CSS_MODULE_TEST,
                codes::CSS_RULE_NOT_FOUND,
                "could not find default CSS rule, CSS imports may not work",
            ),
            (
                SASS_MODULE_TEST,
                codes::SASS_RULE_NOT_FOUND,
                "could not find default SASS rule, SASS imports may not work",
            ),
        ];

        for (test, code, message) in styles {
            let wanted = RulePattern::new(test);
            let found = one_of.iter_mut().find(|rule| {
                rule.side_effects == Some(false)
                    && rule.test.as_ref().is_some_and(|t| t.is_pattern(&wanted))
            });

            match found {
                Some(rule) => {
                    self.patch_issuer(rule.issuer.get_or_insert_with(Issuer::default));
                    report.patched_style_rules.push(test);
                }
                None => report.warn(code, message),
            }
        }
    }

    /// `or = and ++ [in set]`, `not = [outside set]`, `and` removed.
    fn patch_issuer(&self, issuer: &mut Issuer) {
        let mut or = issuer.and.take().unwrap_or_default();
        or.push(Condition::in_directories(self.directories.clone()));
        issuer.or = Some(or);
        issuer.not = Some(vec![Condition::outside_directories(
            self.directories.clone(),
        )]);
    }
}

/// Run the `webpack` hook for `options`, leaving `config` untouched when no
/// modules are configured.
pub fn with_transpile_modules(
    options: TranspileOptions,
    base: &Path,
    config: HostConfig,
    ctx: &BuildContext,
    user_hook: Option<WebpackHook<'_>>,
) -> Result<Patched<HostConfig>> {
    match TranspileModules::initialize(options, base)? {
        Some(plugin) => plugin.webpack(config, ctx, user_hook),
        None => {
            let config = match user_hook {
                Some(hook) => hook(config, ctx)?,
                None => config,
            };
            Ok(Patched {
                config,
                report: PatchReport::default(),
            })
        }
    }
}
