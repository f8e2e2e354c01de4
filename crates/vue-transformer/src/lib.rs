//! Vue options-API components to React TSX.
//!
//! This crate converts a parsed `.vue` document into a React component:
//! - Reflecting the option object of the script into a declared surface
//! - Classifying declared names and rewriting script and template code
//! - Compiling the template into JSX
//! - Assembling a hooks or class component plus its stylesheet
//!
//! # Example
//!
//! ```
//! use vue_transformer::{convert_source, TransformOptions};
//!
//! let source = r#"
//! <template>
//!   <button @click="toggle">{{ label }}</button>
//! </template>
//!
//! <script>
//! export default {
//!   props: { label: String },
//!   data: () => ({ open: false }),
//!   methods: {
//!     toggle() {
//!       this.open = !this.open;
//!     },
//!   },
//! };
//! </script>
//! "#;
//!
//! let options = TransformOptions {
//!     filename: Some("toggle-button.vue".into()),
//!     ..Default::default()
//! };
//! let result = convert_source(source, &options).unwrap();
//! assert!(result.code.contains("setOpen(!open)"));
//! ```

pub mod assemble;
pub mod context;
pub mod diagnostic;
pub mod naming;
pub mod props;
pub mod reflect;
pub mod rewrite;
pub mod style;
pub mod template;
mod transform;
mod types;

pub use assemble::ImportPaths;
pub use context::{Category, ComponentShape, Context};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use style::{Passthrough, StyleError, StylePreprocessor, Stylesheet};
pub use transform::{
    convert_source, convert_source_with, transform, transform_with, TransformError,
    TransformOptions, TransformResult,
};
pub use types::ComponentNames;
