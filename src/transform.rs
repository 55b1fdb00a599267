use swc_core::{
    common::{sync::Lrc, FileName, SourceMap},
    ecma::{ast::EsVersion, parser::parse_file_as_module, visit::VisitMutWith},
};

use crate::{
    config::{Config, PartialConfig},
    error::TransformError,
    rewrite::{splice, TestIdTransform},
    sniff::{looks_like_markup, syntax_for},
};

/// Tag `source` using `options` merged over the defaults.
///
/// Never fails: when the file cannot be parsed or rewritten safely the
/// original text comes back unchanged.
pub fn transform(source: &str, file_path: &str, options: &PartialConfig) -> String {
    transform_with_config(source, file_path, &options.clone().resolve())
}

pub fn transform_with_config(source: &str, file_path: &str, config: &Config) -> String {
    match try_transform(source, file_path, config) {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(file = file_path, %err, "leaving source unchanged");
            source.to_string()
        }
    }
}

/// Same as [`transform_with_config`] but reports why a file was left alone.
pub fn try_transform(source: &str, file_path: &str, config: &Config) -> Result<String, TransformError> {
    if !config.enabled {
        return Ok(source.to_string());
    }
    if !looks_like_markup(source, file_path) {
        tracing::debug!(file = file_path, "no markup detected");
        return Ok(source.to_string());
    }

    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(file_path.to_string()).into(), source.to_string());

    let parse_error = |message: String| TransformError::Parse {
        file: file_path.to_string(),
        message,
    };
    let mut errors = vec![];
    let mut module = parse_file_as_module(&fm, syntax_for(file_path), EsVersion::latest(), None, &mut errors)
        .map_err(|e| parse_error(format!("{:?}", e.kind())))?;
    // A recovered error means the tree does not match the text.
    if let Some(e) = errors.first() {
        return Err(parse_error(format!("{:?}", e.kind())));
    }

    let mut visitor = TestIdTransform::new(config);
    module.visit_mut_with(&mut visitor);
    let edits = visitor.into_edits();
    if edits.is_empty() {
        return Ok(source.to_string());
    }
    tracing::debug!(file = file_path, count = edits.len(), "tagging elements");
    // Spans index `fm.src`, which lacks a leading byte order mark.
    let bom = source
        .get(..source.len().saturating_sub(fm.src.len()))
        .unwrap_or_default();
    let body = splice(fm.src.as_str(), fm.start_pos, &config.attribute_name, edits)?;
    Ok(format!("{bom}{body}"))
}
