use std::collections::BTreeSet;

use serde::Deserialize;

pub const DEFAULT_ATTRIBUTE_NAME: &str = "data-testid";
pub const DEFAULT_SEPARATOR: &str = ".";
pub const DEFAULT_SKIP_ELEMENTS: [&str; 4] = ["br", "hr", "img", "svg"];

// -----------------------------------------------------------------------------
// Resolved configuration
// -----------------------------------------------------------------------------

/// Fully resolved options. Every field has a value; build one through
/// [`PartialConfig::resolve`] or take [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub enabled: bool,
    pub attribute_name: String,
    pub separator: String,
    pub include_element: bool,
    pub use_hierarchy: bool,
    pub skip_elements: BTreeSet<String>,
    pub only_interactive: bool,
    pub respect_existing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            include_element: true,
            use_hierarchy: true,
            skip_elements: DEFAULT_SKIP_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            only_interactive: false,
            respect_existing: true,
        }
    }
}

// -----------------------------------------------------------------------------
// Sparse options (plugin JSON / loader options)
// -----------------------------------------------------------------------------

/// Options as the host passes them: any subset, camelCase keys, unknown keys
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialConfig {
    pub enabled: Option<bool>,
    pub attribute_name: Option<String>,
    pub separator: Option<String>,
    pub include_element: Option<bool>,
    pub use_hierarchy: Option<bool>,
    pub skip_elements: Option<Vec<String>>,
    pub only_interactive: Option<bool>,
    pub respect_existing: Option<bool>,
}

impl PartialConfig {
    /// Parse plugin/loader options. Anything that is not a matching JSON
    /// object yields the empty record, so the defaults apply.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::debug!(%err, "ignoring malformed options");
            Self::default()
        })
    }

    /// Merge over the defaults; `enabled` defaults to `true`.
    pub fn resolve(self) -> Config {
        self.resolve_with_enabled(true)
    }

    /// Merge over the defaults; an unspecified `enabled` follows `env`.
    pub fn resolve_in(self, env: BuildEnv) -> Config {
        self.resolve_with_enabled(env.is_dev_like())
    }

    fn resolve_with_enabled(self, enabled_default: bool) -> Config {
        let defaults = Config::default();
        Config {
            enabled: self.enabled.unwrap_or(enabled_default),
            attribute_name: self.attribute_name.unwrap_or(defaults.attribute_name),
            separator: self.separator.unwrap_or(defaults.separator),
            include_element: self.include_element.unwrap_or(defaults.include_element),
            use_hierarchy: self.use_hierarchy.unwrap_or(defaults.use_hierarchy),
            skip_elements: self
                .skip_elements
                .map(|v| v.into_iter().collect())
                .unwrap_or(defaults.skip_elements),
            only_interactive: self.only_interactive.unwrap_or(defaults.only_interactive),
            respect_existing: self.respect_existing.unwrap_or(defaults.respect_existing),
        }
    }
}

// -----------------------------------------------------------------------------
// Build environment
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildEnv {
    Development,
    Test,
    Production,
}

impl BuildEnv {
    /// Reads `NODE_ENV`; anything other than `development`/`test` counts as
    /// production, including an unset variable.
    pub fn from_env() -> Self {
        Self::from_node_env(std::env::var("NODE_ENV").ok().as_deref())
    }

    pub fn from_node_env(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("development") | Some("dev") => BuildEnv::Development,
            Some("test") => BuildEnv::Test,
            _ => BuildEnv::Production,
        }
    }

    pub fn is_dev_like(self) -> bool {
        matches!(self, BuildEnv::Development | BuildEnv::Test)
    }
}
