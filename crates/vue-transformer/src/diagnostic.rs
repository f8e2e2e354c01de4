//! Diagnostic types.
//!
//! Every construct the converter cannot translate faithfully is reported here
//! in addition to the inline `TODO` flag left in the generated code.

use vue_parser::Span;

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// The source location in the `.vue` file, when known.
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Creates a new diagnostic without a location.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            span: None,
        }
    }

    /// Attaches a source location.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The output was generated but needs manual review.
    Warning,
    /// Part of the input could not be converted.
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Diagnostic codes for every flagged construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // === Structural ===
    /// `parse-error`: the markup could not be parsed cleanly
    ParseError,
    /// `unterminated-literal`: a quoted literal in an expression is never closed
    UnterminatedLiteral,
    /// `invalid-for`: a `v-for` clause could not be parsed
    InvalidFor,

    // === Unsupported constructs ===
    /// `prop-mutation`: a prop is assigned to
    PropMutation,
    /// `computed-mutation`: a computed value is assigned to
    ComputedMutation,
    /// `method-assignment`: a method name is assigned to
    MethodAssignment,
    /// `event-modifier`: an event binding uses `.modifier` suffixes
    EventModifier,
    /// `dual-binding`: `v-model` needs a manual two-way binding
    DualBinding,
    /// `mapped-helper`: a `mapState`-style helper produced a placeholder
    MappedHelper,
    /// `orphan-else`: `v-else` / `v-else-if` without a preceding `v-if`
    OrphanElse,
    /// `slot-directive`: `v-slot` / `#name` has no equivalent
    SlotDirective,
    /// `dynamic-attribute`: a `:[name]` binding became a spread
    DynamicAttribute,
    /// `unknown-prop-type`: a prop type could not be mapped
    UnknownPropType,
    /// `lifecycle-hook`: a lifecycle hook has no direct equivalent
    LifecycleHook,
    /// `watcher`: a watcher needs manual review
    Watcher,
    /// `unsupported-option`: a component option is not converted
    UnsupportedOption,
    /// `script-setup`: `<script setup>` is ignored
    ScriptSetup,
    /// `scoped-style`: style scoping is not translated
    ScopedStyle,
}

impl DiagnosticCode {
    /// Returns the default severity for this diagnostic code.
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::ParseError
            | DiagnosticCode::UnterminatedLiteral
            | DiagnosticCode::InvalidFor => Severity::Error,

            DiagnosticCode::PropMutation
            | DiagnosticCode::ComputedMutation
            | DiagnosticCode::MethodAssignment
            | DiagnosticCode::EventModifier
            | DiagnosticCode::DualBinding
            | DiagnosticCode::MappedHelper
            | DiagnosticCode::OrphanElse
            | DiagnosticCode::SlotDirective
            | DiagnosticCode::DynamicAttribute
            | DiagnosticCode::UnknownPropType
            | DiagnosticCode::LifecycleHook
            | DiagnosticCode::Watcher
            | DiagnosticCode::UnsupportedOption
            | DiagnosticCode::ScriptSetup
            | DiagnosticCode::ScopedStyle => Severity::Warning,
        }
    }

    /// Returns the diagnostic code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "parse-error",
            DiagnosticCode::UnterminatedLiteral => "unterminated-literal",
            DiagnosticCode::InvalidFor => "invalid-for",
            DiagnosticCode::PropMutation => "prop-mutation",
            DiagnosticCode::ComputedMutation => "computed-mutation",
            DiagnosticCode::MethodAssignment => "method-assignment",
            DiagnosticCode::EventModifier => "event-modifier",
            DiagnosticCode::DualBinding => "dual-binding",
            DiagnosticCode::MappedHelper => "mapped-helper",
            DiagnosticCode::OrphanElse => "orphan-else",
            DiagnosticCode::SlotDirective => "slot-directive",
            DiagnosticCode::DynamicAttribute => "dynamic-attribute",
            DiagnosticCode::UnknownPropType => "unknown-prop-type",
            DiagnosticCode::LifecycleHook => "lifecycle-hook",
            DiagnosticCode::Watcher => "watcher",
            DiagnosticCode::UnsupportedOption => "unsupported-option",
            DiagnosticCode::ScriptSetup => "script-setup",
            DiagnosticCode::ScopedStyle => "scoped-style",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_code() {
        let d = Diagnostic::new(DiagnosticCode::InvalidFor, "bad clause");
        assert_eq!(d.severity, Severity::Error);
        let d = Diagnostic::new(DiagnosticCode::PropMutation, "label");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.code.to_string(), "prop-mutation");
    }
}
