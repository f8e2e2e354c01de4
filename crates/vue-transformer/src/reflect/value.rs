//! Values produced by interpreting the option object.

use crate::naming::is_identifier;
use indexmap::IndexMap;

/// A global constructor used as a prop type or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCtor {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    BigInt,
    Symbol,
    Date,
    Promise,
}

impl TypeCtor {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "String" => TypeCtor::String,
            "Number" => TypeCtor::Number,
            "Boolean" => TypeCtor::Boolean,
            "Object" => TypeCtor::Object,
            "Array" => TypeCtor::Array,
            "Function" => TypeCtor::Function,
            "BigInt" => TypeCtor::BigInt,
            "Symbol" => TypeCtor::Symbol,
            "Date" => TypeCtor::Date,
            "Promise" => TypeCtor::Promise,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeCtor::String => "String",
            TypeCtor::Number => "Number",
            TypeCtor::Boolean => "Boolean",
            TypeCtor::Object => "Object",
            TypeCtor::Array => "Array",
            TypeCtor::Function => "Function",
            TypeCtor::BigInt => "BigInt",
            TypeCtor::Symbol => "Symbol",
            TypeCtor::Date => "Date",
            TypeCtor::Promise => "Promise",
        }
    }

    /// The TypeScript type written for a prop of this type.
    pub fn ts_type(&self) -> &'static str {
        match self {
            TypeCtor::String => "string",
            TypeCtor::Number => "number",
            TypeCtor::Boolean => "boolean",
            TypeCtor::BigInt => "bigint",
            TypeCtor::Symbol => "symbol",
            TypeCtor::Date => "Date",
            TypeCtor::Promise => "Promise<any>",
            TypeCtor::Object => "any /* Object */",
            TypeCtor::Array => "Array<any>",
            TypeCtor::Function => "any /* Function */",
        }
    }
}

/// A captured function: its parameter list and body as source text.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    /// Parameter list without the surrounding parentheses.
    pub params: String,
    /// The body: a `{ ... }` block, or the expression of a concise arrow.
    pub body: String,
    pub is_async: bool,
    pub is_arrow: bool,
}

impl FunctionValue {
    /// Creates a non-async function with a block body.
    pub fn block(params: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            params: params.into(),
            body: body.into(),
            is_async: false,
            is_arrow: false,
        }
    }

    /// Returns true if the body is an expression rather than a block.
    pub fn has_expression_body(&self) -> bool {
        !self.body.trim_start().starts_with('{')
    }

    /// The body as a block, wrapping an expression body in `{ return ...; }`.
    pub fn block_body(&self) -> String {
        if self.has_expression_body() {
            format!("{{\n  return {};\n}}", self.body.trim())
        } else {
            self.body.clone()
        }
    }

    /// Renders the function as an arrow expression.
    pub fn to_arrow(&self) -> String {
        let prefix = if self.is_async { "async " } else { "" };
        format!("{}({}) => {}", prefix, self.params, self.body)
    }
}

/// A getter/setter pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accessor {
    pub get: Option<FunctionValue>,
    pub set: Option<FunctionValue>,
}

/// A value in the interpreted literal subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// A bigint literal, digits only.
    BigInt(String),
    Str(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Function(FunctionValue),
    Accessor(Accessor),
    Constructor(TypeCtor),
    /// An expression outside the literal subset, kept as source text.
    Expr(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The TypeScript type inferred from a default value.
    pub fn inferred_ts_type(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Str(_) => "string",
            Value::Array(_) => "Array<any>",
            _ => "any",
        }
    }

    /// Renders the value as JavaScript source, indenting nested objects by
    /// `depth` levels of two spaces.
    pub fn to_js(&self, depth: usize) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::BigInt(digits) => format!("BigInt({})", digits),
            Value::Str(s) => quote_js_string(s),
            Value::Array(items) => {
                if items.is_empty() {
                    return "[]".to_string();
                }
                let parts: Vec<String> = items.iter().map(|v| v.to_js(depth)).collect();
                format!("[ {} ]", parts.join(", "))
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return "{}".to_string();
                }
                let inner = indent(depth + 1);
                let mut out = String::from("{\n");
                for (key, value) in map {
                    out.push_str(&format!(
                        "{}{}: {},\n",
                        inner,
                        format_key(key),
                        value.to_js(depth + 1)
                    ));
                }
                out.push_str(&indent(depth));
                out.push('}');
                out
            }
            Value::Function(f) => f.to_arrow(),
            Value::Accessor(acc) => {
                let inner = indent(depth + 1);
                let mut out = String::from("{\n");
                if let Some(get) = &acc.get {
                    out.push_str(&format!("{}get: {},\n", inner, get.to_arrow()));
                }
                if let Some(set) = &acc.set {
                    out.push_str(&format!("{}set: {},\n", inner, set.to_arrow()));
                }
                out.push_str(&indent(depth));
                out.push('}');
                out
            }
            Value::Constructor(ctor) => ctor.name().to_string(),
            Value::Expr(text) => text.clone(),
        }
    }
}

/// Two spaces per level.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn format_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote_js_string(key)
    }
}

/// Quotes a string as a single-quoted JavaScript literal.
pub fn quote_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalars_to_js() {
        assert_eq!(Value::Number(-1.0).to_js(0), "-1");
        assert_eq!(Value::Number(0.5).to_js(0), "0.5");
        assert_eq!(Value::Str("it's".into()).to_js(0), "'it\\'s'");
        assert_eq!(Value::BigInt("10".into()).to_js(0), "BigInt(10)");
        assert_eq!(Value::Constructor(TypeCtor::Date).to_js(0), "Date");
    }

    #[test]
    fn test_object_to_js_is_indented() {
        let mut inner = IndexMap::new();
        inner.insert("a".to_string(), Value::Bool(true));
        inner.insert("data-id".to_string(), Value::Array(vec![Value::Null]));
        let mut outer = IndexMap::new();
        outer.insert("nested".to_string(), Value::Object(inner));

        assert_eq!(
            Value::Object(outer).to_js(1),
            "{\n    nested: {\n      a: true,\n      'data-id': [ null ],\n    },\n  }"
        );
    }

    #[test]
    fn test_function_rendering() {
        let f = FunctionValue {
            params: "a, b".into(),
            body: "a + b".into(),
            is_async: true,
            is_arrow: true,
        };
        assert!(f.has_expression_body());
        assert_eq!(f.to_arrow(), "async (a, b) => a + b");
        assert_eq!(f.block_body(), "{\n  return a + b;\n}");
    }
}
