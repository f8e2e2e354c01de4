//! The declared surface of a component: props, state, computed values,
//! methods, watchers and lifecycle hooks.

use super::value::{indent, Accessor, FunctionValue, TypeCtor, Value};
use crate::naming::convert_prop_or_state_name;
use indexmap::IndexMap;

/// Everything reflected from one component's option object.
#[derive(Debug, Clone, Default)]
pub struct ComponentSurface {
    /// The `name` option.
    pub name: Option<String>,
    /// Locally registered child components (`components: { ... }`).
    pub components: Vec<String>,
    /// Import declarations of the script module.
    pub imports: Vec<ImportRecord>,
    pub props: IndexMap<String, PropDecl>,
    /// State fields and their default values.
    pub data: IndexMap<String, Value>,
    pub computed: IndexMap<String, ComputedDecl>,
    pub methods: IndexMap<String, MethodDecl>,
    /// Watchers keyed by the watched path.
    pub watch: IndexMap<String, WatchDecl>,
    /// Lifecycle hooks in declaration order.
    pub hooks: Vec<(LifecycleHook, FunctionValue)>,
    /// Names produced by `mapState`-style helpers.
    pub mapped: Vec<MappedName>,
    /// Option keys that are recognised but not converted (`mixins`, `inject`, ...).
    pub unsupported_options: Vec<String>,
    /// Unresolved identifiers that were treated as opaque during reflection.
    pub opaque_references: Vec<String>,
}

/// One `import` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// The module specifier.
    pub source: String,
    /// The declaration as written.
    pub text: String,
    /// Local binding names.
    pub locals: Vec<String>,
}

/// A declared prop.
#[derive(Debug, Clone, PartialEq)]
pub struct PropDecl {
    pub ty: PropType,
    /// Whether the generated interface field is optional (`name?: T`).
    pub optional: bool,
    pub default: Option<Value>,
}

/// The type of a prop.
#[derive(Debug, Clone, PartialEq)]
pub enum PropType {
    /// No type information (`props: ['a']`, `a: null`).
    Any,
    Ctor(TypeCtor),
    /// `[String, Number]`
    Union(Vec<PropType>),
    /// A nested shape object.
    Shape(IndexMap<String, PropType>),
    /// An expression that is not a known type, kept as source text.
    Unknown(String),
}

impl PropType {
    /// Renders the TypeScript type, indenting nested shapes by `depth` levels.
    pub fn ts_type(&self, depth: usize) -> String {
        match self {
            PropType::Any => "any".to_string(),
            PropType::Ctor(ctor) => ctor.ts_type().to_string(),
            PropType::Union(items) => {
                if items.is_empty() {
                    return "any".to_string();
                }
                items
                    .iter()
                    .map(|t| t.ts_type(depth))
                    .collect::<Vec<_>>()
                    .join(" | ")
            }
            PropType::Shape(fields) => {
                let mut out = String::from("{\n");
                for (name, ty) in fields {
                    out.push_str(&format!(
                        "{}{}: {};\n",
                        indent(depth + 1),
                        convert_prop_or_state_name(name),
                        ty.ts_type(depth + 1)
                    ));
                }
                out.push_str(&indent(depth));
                out.push('}');
                out
            }
            PropType::Unknown(text) => {
                format!("any /* TODO: unknown prop type: {} */", text.replace("*/", "* /"))
            }
        }
    }

    /// Returns true if this type, or any part of it, could not be mapped.
    pub fn has_unknown(&self) -> bool {
        match self {
            PropType::Unknown(_) => true,
            PropType::Union(items) => items.iter().any(PropType::has_unknown),
            PropType::Shape(fields) => fields.values().any(PropType::has_unknown),
            _ => false,
        }
    }

    /// Returns true for `Object` / `Array` typed props whose defaults are
    /// factory functions.
    pub fn uses_default_factory(&self) -> bool {
        match self {
            PropType::Ctor(TypeCtor::Object | TypeCtor::Array) => true,
            PropType::Shape(_) => true,
            PropType::Union(items) => items.iter().any(PropType::uses_default_factory),
            _ => false,
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Constructor(ctor) => PropType::Ctor(*ctor),
            Value::Array(items) => PropType::Union(items.iter().map(PropType::from_value).collect()),
            Value::Object(fields) => PropType::Shape(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), PropType::from_value(v)))
                    .collect(),
            ),
            Value::Null | Value::Undefined => PropType::Any,
            other => PropType::Unknown(other.to_js(0)),
        }
    }
}

/// Keys of a Vue prop-options object.
const PROP_OPTION_KEYS: &[&str] = &["type", "required", "default", "validator"];

/// Converts the reflected `props` option.
pub fn props_from_value(value: &Value) -> IndexMap<String, PropDecl> {
    let mut props = IndexMap::new();

    match value {
        Value::Array(names) => {
            for name in names.iter().filter_map(Value::as_str) {
                props.insert(
                    name.to_string(),
                    PropDecl {
                        ty: PropType::Any,
                        optional: true,
                        default: None,
                    },
                );
            }
        }
        Value::Object(entries) => {
            for (name, entry) in entries {
                props.insert(name.clone(), prop_from_entry(entry));
            }
        }
        _ => {}
    }

    props
}

fn prop_from_entry(entry: &Value) -> PropDecl {
    if let Value::Object(options) = entry {
        let is_options = !options.is_empty()
            && options.keys().all(|k| PROP_OPTION_KEYS.contains(&k.as_str()))
            && options.keys().any(|k| k != "validator");
        if is_options {
            let required = options
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            return PropDecl {
                ty: options
                    .get("type")
                    .map(PropType::from_value)
                    .unwrap_or(PropType::Any),
                optional: !required,
                default: options.get("default").cloned(),
            };
        }
    }

    PropDecl {
        ty: PropType::from_value(entry),
        optional: false,
        default: None,
    }
}

/// A computed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputedDecl {
    Getter(FunctionValue),
    Accessor(Accessor),
    /// A plain value used as a computed entry.
    Value(Value),
}

/// Converts the reflected `computed` option.
pub fn computed_from_value(value: &Value) -> IndexMap<String, ComputedDecl> {
    let mut computed = IndexMap::new();
    let Value::Object(entries) = value else {
        return computed;
    };

    for (name, entry) in entries {
        let decl = match entry {
            Value::Function(f) => ComputedDecl::Getter(f.clone()),
            Value::Accessor(Accessor { get: Some(get), set: None }) => {
                ComputedDecl::Getter(get.clone())
            }
            Value::Accessor(acc) => ComputedDecl::Accessor(acc.clone()),
            Value::Object(fields)
                if fields.contains_key("get")
                    && fields.keys().all(|k| matches!(k.as_str(), "get" | "set" | "cache")) =>
            {
                let as_fn = |key: &str| match fields.get(key) {
                    Some(Value::Function(f)) => Some(f.clone()),
                    _ => None,
                };
                ComputedDecl::Accessor(Accessor {
                    get: as_fn("get"),
                    set: as_fn("set"),
                })
            }
            other => ComputedDecl::Value(other.clone()),
        };
        computed.insert(name.clone(), decl);
    }

    computed
}

/// A method.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodDecl {
    Function(FunctionValue),
    /// A non-function value such as `debounce(fn, 100)`, kept as source text.
    Expr(String),
}

/// Converts the reflected `methods` option.
pub fn methods_from_value(value: &Value) -> IndexMap<String, MethodDecl> {
    let mut methods = IndexMap::new();
    let Value::Object(entries) = value else {
        return methods;
    };

    for (name, entry) in entries {
        let decl = match entry {
            Value::Function(f) => MethodDecl::Function(f.clone()),
            other => MethodDecl::Expr(other.to_js(1)),
        };
        methods.insert(name.clone(), decl);
    }

    methods
}

/// A watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchDecl {
    pub handler: WatchHandler,
    pub deep: bool,
    pub immediate: bool,
}

/// The handler invoked by a watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchHandler {
    Function(FunctionValue),
    /// The name of a method.
    Method(String),
}

/// Converts the reflected `watch` option. Entries whose handler cannot be
/// determined are returned separately.
pub fn watch_from_value(value: &Value) -> (IndexMap<String, WatchDecl>, Vec<String>) {
    let mut watch = IndexMap::new();
    let mut skipped = Vec::new();
    let Value::Object(entries) = value else {
        return (watch, skipped);
    };

    for (path, entry) in entries {
        let entry = match entry {
            // Only the first handler of an array is converted.
            Value::Array(items) => match items.first() {
                Some(first) => first,
                None => continue,
            },
            other => other,
        };

        let decl = match entry {
            Value::Function(f) => Some(WatchDecl {
                handler: WatchHandler::Function(f.clone()),
                deep: false,
                immediate: false,
            }),
            Value::Str(method) => Some(WatchDecl {
                handler: WatchHandler::Method(method.clone()),
                deep: false,
                immediate: false,
            }),
            Value::Object(options) => {
                let handler = match options.get("handler") {
                    Some(Value::Function(f)) => Some(WatchHandler::Function(f.clone())),
                    Some(Value::Str(method)) => Some(WatchHandler::Method(method.clone())),
                    _ => None,
                };
                handler.map(|handler| WatchDecl {
                    handler,
                    deep: options.get("deep").and_then(Value::as_bool).unwrap_or(false),
                    immediate: options
                        .get("immediate")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                })
            }
            _ => None,
        };

        match decl {
            Some(decl) => {
                watch.insert(path.clone(), decl);
            }
            None => skipped.push(path.clone()),
        }
    }

    (watch, skipped)
}

/// Option-API lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    Activated,
    Deactivated,
    BeforeDestroy,
    BeforeUnmount,
    Destroyed,
    Unmounted,
    ErrorCaptured,
}

/// When a lifecycle hook runs relative to the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Mount,
    Update,
    Unmount,
    /// No direct equivalent.
    Other,
}

impl LifecycleHook {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "beforeCreate" => LifecycleHook::BeforeCreate,
            "created" => LifecycleHook::Created,
            "beforeMount" => LifecycleHook::BeforeMount,
            "mounted" => LifecycleHook::Mounted,
            "beforeUpdate" => LifecycleHook::BeforeUpdate,
            "updated" => LifecycleHook::Updated,
            "activated" => LifecycleHook::Activated,
            "deactivated" => LifecycleHook::Deactivated,
            "beforeDestroy" => LifecycleHook::BeforeDestroy,
            "beforeUnmount" => LifecycleHook::BeforeUnmount,
            "destroyed" => LifecycleHook::Destroyed,
            "unmounted" => LifecycleHook::Unmounted,
            "errorCaptured" => LifecycleHook::ErrorCaptured,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleHook::BeforeCreate => "beforeCreate",
            LifecycleHook::Created => "created",
            LifecycleHook::BeforeMount => "beforeMount",
            LifecycleHook::Mounted => "mounted",
            LifecycleHook::BeforeUpdate => "beforeUpdate",
            LifecycleHook::Updated => "updated",
            LifecycleHook::Activated => "activated",
            LifecycleHook::Deactivated => "deactivated",
            LifecycleHook::BeforeDestroy => "beforeDestroy",
            LifecycleHook::BeforeUnmount => "beforeUnmount",
            LifecycleHook::Destroyed => "destroyed",
            LifecycleHook::Unmounted => "unmounted",
            LifecycleHook::ErrorCaptured => "errorCaptured",
        }
    }

    pub fn phase(&self) -> HookPhase {
        match self {
            LifecycleHook::BeforeCreate
            | LifecycleHook::Created
            | LifecycleHook::BeforeMount
            | LifecycleHook::Mounted => HookPhase::Mount,
            LifecycleHook::BeforeUpdate | LifecycleHook::Updated => HookPhase::Update,
            LifecycleHook::BeforeDestroy
            | LifecycleHook::BeforeUnmount
            | LifecycleHook::Destroyed
            | LifecycleHook::Unmounted => HookPhase::Unmount,
            LifecycleHook::Activated
            | LifecycleHook::Deactivated
            | LifecycleHook::ErrorCaptured => HookPhase::Other,
        }
    }
}

/// The Vuex helper that produced a mapped name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    State,
    Getter,
    Action,
    Mutation,
}

impl MapKind {
    pub fn from_helper(name: &str) -> Option<Self> {
        Some(match name {
            "mapState" => MapKind::State,
            "mapGetters" => MapKind::Getter,
            "mapActions" => MapKind::Action,
            "mapMutations" => MapKind::Mutation,
            _ => return None,
        })
    }

    /// The singular kind name used in placeholder comments.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MapKind::State => "state",
            MapKind::Getter => "getter",
            MapKind::Action => "action",
            MapKind::Mutation => "mutation",
        }
    }

    pub fn helper(&self) -> &'static str {
        match self {
            MapKind::State => "mapState",
            MapKind::Getter => "mapGetters",
            MapKind::Action => "mapActions",
            MapKind::Mutation => "mapMutations",
        }
    }
}

/// A name produced by a mapping helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedName {
    pub kind: MapKind,
    pub name: String,
    /// The store path the name maps to (`cart.items`).
    pub scope: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_props_from_names() {
        let props = props_from_value(&Value::Array(vec![
            Value::Str("a".into()),
            Value::Str("b".into()),
        ]));
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(props["a"].optional);
        assert_eq!(props["a"].ty, PropType::Any);
    }

    #[test]
    fn test_props_options_object() {
        let props = props_from_value(&object(vec![
            (
                "size",
                object(vec![
                    ("type", Value::Constructor(TypeCtor::Number)),
                    ("default", Value::Number(3.0)),
                ]),
            ),
            (
                "label",
                object(vec![
                    ("type", Value::Constructor(TypeCtor::String)),
                    ("required", Value::Bool(true)),
                ]),
            ),
        ]));
        assert_eq!(props["size"].ty, PropType::Ctor(TypeCtor::Number));
        assert!(props["size"].optional);
        assert_eq!(props["size"].default, Some(Value::Number(3.0)));
        assert!(!props["label"].optional);
    }

    #[test]
    fn test_props_shape_and_union() {
        let props = props_from_value(&object(vec![
            (
                "value",
                Value::Array(vec![
                    Value::Constructor(TypeCtor::String),
                    Value::Constructor(TypeCtor::Number),
                ]),
            ),
            (
                "point",
                object(vec![
                    ("x", Value::Constructor(TypeCtor::Number)),
                    ("y_pos", Value::Constructor(TypeCtor::Number)),
                ]),
            ),
        ]));
        assert_eq!(props["value"].ty.ts_type(1), "string | number");
        assert_eq!(
            props["point"].ty.ts_type(1),
            "{\n    x: number;\n    yPos: number;\n  }"
        );
        assert!(!props["point"].optional);
    }

    #[test]
    fn test_computed_accessor_object() {
        let getter = FunctionValue::block("", "{ return 1; }");
        let computed = computed_from_value(&object(vec![(
            "total",
            object(vec![("get", Value::Function(getter.clone()))]),
        )]));
        assert_eq!(
            computed["total"],
            ComputedDecl::Accessor(Accessor {
                get: Some(getter),
                set: None
            })
        );
    }

    #[test]
    fn test_watch_forms() {
        let (watch, skipped) = watch_from_value(&object(vec![
            ("a", Value::Str("onA".into())),
            (
                "b",
                object(vec![
                    ("handler", Value::Function(FunctionValue::block("v", "{}"))),
                    ("deep", Value::Bool(true)),
                ]),
            ),
            ("c", Value::Number(1.0)),
        ]));
        assert_eq!(watch["a"].handler, WatchHandler::Method("onA".into()));
        assert!(watch["b"].deep);
        assert_eq!(skipped, vec!["c".to_string()]);
    }

    #[test]
    fn test_lifecycle_phase() {
        assert_eq!(
            LifecycleHook::from_name("beforeDestroy").map(|h| h.phase()),
            Some(HookPhase::Unmount)
        );
        assert_eq!(LifecycleHook::from_name("render"), None);
    }
}
