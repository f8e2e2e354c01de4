//! The conversion entry points.

use crate::assemble::{assemble, AssembleInput, ImportPaths};
use crate::context::{ComponentShape, Context};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::props::unknown_prop_types;
use crate::reflect::{reflect_script, ComponentSurface, ReflectError};
use crate::style::{derive_stylesheet, Passthrough, StyleError, StylePreprocessor, Stylesheet};
use crate::types::ComponentNames;
use smol_str::SmolStr;
use thiserror::Error;
use vue_parser::SfcDocument;

/// Options for one conversion.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Path of the source file; the component name is derived from it.
    pub filename: Option<String>,
    pub shape: ComponentShape,
    pub imports: ImportPaths,
    /// Base name of the generated stylesheet.
    pub style_file_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            filename: None,
            shape: ComponentShape::Function,
            imports: ImportPaths::default(),
            style_file_name: "styles".to_string(),
        }
    }
}

/// A converted component.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub names: ComponentNames,
    /// The generated TSX module.
    pub code: String,
    pub stylesheet: Stylesheet,
    /// Every flagged construct, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
    /// Custom tags used by the template, as written.
    pub custom_tags: Vec<SmolStr>,
}

/// Errors that abort the conversion of one component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    #[error(transparent)]
    Style(#[from] StyleError),
}

/// Parses and converts `.vue` source text.
///
/// Markup parse errors are reported as diagnostics; conversion continues with
/// the recovered document.
pub fn convert_source(
    source: &str,
    options: &TransformOptions,
) -> Result<TransformResult, TransformError> {
    convert_source_with(source, options, &Passthrough)
}

/// [`convert_source`] with a custom stylesheet preprocessor.
pub fn convert_source_with(
    source: &str,
    options: &TransformOptions,
    preprocessor: &dyn StylePreprocessor,
) -> Result<TransformResult, TransformError> {
    let parsed = vue_parser::parse(source);
    let mut result = transform_with(&parsed.document, options, preprocessor)?;

    let mut diagnostics: Vec<Diagnostic> = parsed
        .errors
        .iter()
        .map(|err| Diagnostic::new(DiagnosticCode::ParseError, err.to_string()).with_span(err.span))
        .collect();
    diagnostics.append(&mut result.diagnostics);
    result.diagnostics = diagnostics;
    Ok(result)
}

/// Converts a parsed document.
pub fn transform(
    doc: &SfcDocument,
    options: &TransformOptions,
) -> Result<TransformResult, TransformError> {
    transform_with(doc, options, &Passthrough)
}

/// [`transform`] with a custom stylesheet preprocessor.
pub fn transform_with(
    doc: &SfcDocument,
    options: &TransformOptions,
    preprocessor: &dyn StylePreprocessor,
) -> Result<TransformResult, TransformError> {
    let mut diagnostics = Vec::new();

    let surface = match &doc.script {
        Some(script) => reflect_script(&script.content, script.lang)?,
        None => ComponentSurface::default(),
    };
    if let Some(setup) = &doc.script_setup {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::ScriptSetup,
                "`<script setup>` is not supported and was ignored",
            )
            .with_span(setup.span),
        );
    }
    diagnostics.extend(surface_diagnostics(&surface));

    let names = options
        .filename
        .as_deref()
        .and_then(ComponentNames::from_path)
        .or_else(|| surface.name.as_deref().and_then(ComponentNames::from_base_name))
        .unwrap_or_default();

    let (stylesheet, style_diagnostics) =
        derive_stylesheet(&doc.styles, &options.style_file_name, preprocessor)?;
    diagnostics.extend(style_diagnostics);

    let ctx = Context::from_surface(&surface, &names.name, &names.converted, options.shape);
    let assembly = assemble(&AssembleInput {
        ctx: &ctx,
        surface: &surface,
        template: doc.template.as_ref(),
        imports: &options.imports,
        stylesheet: Some(&stylesheet.file_name),
    });
    diagnostics.extend(assembly.diagnostics);

    Ok(TransformResult {
        names,
        code: assembly.code,
        stylesheet,
        diagnostics,
        custom_tags: assembly.custom_tags,
    })
}

fn surface_diagnostics(surface: &ComponentSurface) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for mapped in &surface.mapped {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::MappedHelper,
            format!(
                "`{}` comes from `{}` ({}); its placeholder needs a manual implementation",
                mapped.name,
                mapped.kind.helper(),
                mapped.scope
            ),
        ));
    }
    for option in &surface.unsupported_options {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::UnsupportedOption,
            format!("component option `{}` is not converted", option),
        ));
    }
    diagnostics.extend(unknown_prop_types(&surface.props));
    diagnostics
}
