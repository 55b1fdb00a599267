//! Build-tool surfaces: a per-file loader and the registration wrapper that
//! installs it into a host build configuration.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::{Config, PartialConfig},
    transform::transform_with_config,
};

pub const LOADER_NAME: &str = "auto-testid-loader";

static SOURCE_FILES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(jsx?|tsx?)$").unwrap());
static NODE_MODULES: Lazy<Regex> = Lazy::new(|| Regex::new(r"node_modules").unwrap());

// -----------------------------------------------------------------------------
// Loader
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Loader {
    config: Config,
}

impl Loader {
    pub fn new(options: PartialConfig) -> Self {
        Self {
            config: options.resolve(),
        }
    }

    /// Transformed content, or `source` unchanged for files without markup.
    pub fn load(&self, source: &str, resource_path: &str) -> String {
        transform_with_config(source, resource_path, &self.config)
    }
}

// -----------------------------------------------------------------------------
// Build configuration
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforce {
    Pre,
    Normal,
}

#[derive(Debug, Clone)]
pub struct ModuleRule {
    pub name: String,
    pub test: Regex,
    pub exclude: Option<Regex>,
    pub enforce: Enforce,
    pub loader: Loader,
}

impl ModuleRule {
    pub fn matches(&self, resource_path: &str) -> bool {
        self.test.is_match(resource_path)
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(resource_path))
    }
}

/// The module-processing rule set of one build.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub rules: Vec<ModuleRule>,
}

impl BuildConfig {
    /// Run `source` through every matching rule, `Pre` rules first.
    pub fn process(&self, source: &str, resource_path: &str) -> String {
        let matching = self.rules.iter().filter(|r| r.matches(resource_path));
        let (pre, normal): (Vec<_>, Vec<_>) = matching.partition(|r| r.enforce == Enforce::Pre);
        pre.into_iter()
            .chain(normal)
            .fold(source.to_string(), |code, rule| rule.loader.load(&code, resource_path))
    }

    fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildContext {
    pub dev: bool,
}

pub type BuildHook = Box<dyn Fn(BuildConfig, &BuildContext) -> BuildConfig + Send + Sync>;

/// Host configuration with an optional build hook supplied by the caller.
#[derive(Default)]
pub struct HostConfig {
    pub build: Option<BuildHook>,
}

impl HostConfig {
    pub fn build_config(&self, base: BuildConfig, ctx: &BuildContext) -> BuildConfig {
        match &self.build {
            Some(hook) => hook(base, ctx),
            None => base,
        }
    }
}

/// Explicit `enabled` wins; otherwise only development builds are tagged.
pub fn should_apply(options: &PartialConfig, ctx: &BuildContext) -> bool {
    options.enabled != Some(false) && (ctx.dev || options.enabled == Some(true))
}

/// Wrap `host` so every build also gets the loader rule, after whatever hook
/// the caller already had.
pub fn with_auto_test_id(host: HostConfig, options: PartialConfig) -> HostConfig {
    let previous = host.build;
    let hook: BuildHook = Box::new(move |config: BuildConfig, ctx: &BuildContext| {
        let mut config = match &previous {
            Some(prev) => prev(config, ctx),
            None => config,
        };
        if should_apply(&options, ctx) && !config.has_rule(LOADER_NAME) {
            tracing::debug!(dev = ctx.dev, "installing test id loader");
            config.rules.insert(
                0,
                ModuleRule {
                    name: LOADER_NAME.to_string(),
                    test: (*SOURCE_FILES).clone(),
                    exclude: Some((*NODE_MODULES).clone()),
                    enforce: Enforce::Pre,
                    loader: Loader::new(options.clone()),
                },
            );
        }
        config
    });
    HostConfig { build: Some(hook) }
}
