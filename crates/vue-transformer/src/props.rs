//! Prop and state type declarations.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::naming::convert_prop_or_state_name;
use crate::reflect::{indent, PropDecl, Value};
use indexmap::IndexMap;

/// Generates `export interface <Name>Props { ... }`.
pub fn props_interface(component: &str, props: &IndexMap<String, PropDecl>) -> String {
    if props.is_empty() {
        return format!("export interface {}Props {{}}", component);
    }

    let mut out = format!("export interface {}Props {{\n", component);
    for (name, decl) in props {
        out.push_str(&format!(
            "{}{}{}: {};\n",
            indent(1),
            convert_prop_or_state_name(name),
            if decl.optional { "?" } else { "" },
            decl.ty.ts_type(1)
        ));
    }
    out.push('}');
    out
}

/// Generates `export interface <Name>State { ... }` with types inferred from
/// the default values.
pub fn state_interface(component: &str, data: &IndexMap<String, Value>) -> String {
    if data.is_empty() {
        return format!("export interface {}State {{}}", component);
    }

    let mut out = format!("export interface {}State {{\n", component);
    for (name, value) in data {
        out.push_str(&format!(
            "{}{}: {};\n",
            indent(1),
            convert_prop_or_state_name(name),
            value.inferred_ts_type()
        ));
    }
    out.push('}');
    out
}

/// Renders the default prop values as an object literal at `depth`, or `None`
/// when no prop declares a default.
pub fn default_props(props: &IndexMap<String, PropDecl>, depth: usize) -> Option<String> {
    let defaults: Vec<(String, String)> = props
        .iter()
        .filter_map(|(name, decl)| {
            let value = decl.default.as_ref()?;
            Some((convert_prop_or_state_name(name), default_value(decl, value, depth + 1)))
        })
        .collect();
    if defaults.is_empty() {
        return None;
    }

    let mut out = String::from("{\n");
    for (name, value) in defaults {
        out.push_str(&format!("{}{}: {},\n", indent(depth + 1), name, value));
    }
    out.push_str(&indent(depth));
    out.push('}');
    Some(out)
}

/// Object and array defaults are factories; the factory result is the
/// default.
fn default_value(decl: &PropDecl, value: &Value, depth: usize) -> String {
    match value {
        Value::Function(factory) if decl.ty.uses_default_factory() => {
            if factory.has_expression_body() {
                factory.body.trim().to_string()
            } else {
                format!("({})()", factory.to_arrow())
            }
        }
        other => other.to_js(depth),
    }
}

/// Reports every prop whose type could not be mapped.
pub fn unknown_prop_types(props: &IndexMap<String, PropDecl>) -> Vec<Diagnostic> {
    props
        .iter()
        .filter(|(_, decl)| decl.ty.has_unknown())
        .map(|(name, decl)| {
            Diagnostic::new(
                DiagnosticCode::UnknownPropType,
                format!(
                    "prop `{}` has an unsupported type `{}`; typed as `any`",
                    name,
                    decl.ty.ts_type(0)
                ),
            )
        })
        .collect()
}
