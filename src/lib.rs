//! Inserts hierarchical `data-testid` attributes into JSX/TSX sources.
//!
//! Two entry points share one engine ([`rewrite::TestIdTransform`]):
//! [`transform`] splices attributes into source text for loaders, and
//! [`process_transform`] runs as an SWC plugin on an already parsed program.

use swc_core::{
    ecma::{ast::Program, visit::VisitMutWith},
    plugin::{plugin_transform, proxies::TransformPluginProgramMetadata},
};

pub mod config;
pub mod eligibility;
pub mod error;
pub mod host;
pub mod rewrite;
pub mod runtime;
pub mod scope;
pub mod sniff;
pub mod synth;
mod transform;

pub use config::{BuildEnv, Config, PartialConfig};
pub use error::TransformError;
pub use rewrite::TestIdTransform;
pub use runtime::{with_test_id, WithTestId};
pub use synth::TestId;
pub use transform::{transform, transform_with_config, try_transform};

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = metadata
        .get_transform_plugin_config()
        .map(|s| PartialConfig::from_json(&s))
        .unwrap_or_default()
        .resolve();
    if !config.enabled {
        return program;
    }

    let mut transform = TestIdTransform::new(&config);
    program.visit_mut_with(&mut transform);
    program
}
