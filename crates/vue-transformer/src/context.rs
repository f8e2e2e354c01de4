//! Per-component name classification.

use crate::naming::{convert_prop_or_state_name, setter_name};
use crate::reflect::ComponentSurface;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// The kind of declaration an identifier resolves to.
///
/// Declaration order is precedence order: a method shadows a computed value,
/// which shadows a state field, which shadows a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Method,
    Computed,
    State,
    Prop,
}

/// The shape of the generated component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentShape {
    /// A function component using hooks.
    #[default]
    Function,
    /// A class component extending `ComponentBase`.
    Class,
}

impl ComponentShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentShape::Function => "function",
            ComponentShape::Class => "class",
        }
    }
}

impl std::str::FromStr for ComponentShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" | "hooks" => Ok(ComponentShape::Function),
            "class" => Ok(ComponentShape::Class),
            other => Err(format!("unknown component shape: {}", other)),
        }
    }
}

/// The name table for one component conversion. Immutable once built.
#[derive(Debug, Clone)]
pub struct Context {
    prop_names: FxHashSet<SmolStr>,
    state_names: FxHashSet<SmolStr>,
    computed_names: FxHashSet<SmolStr>,
    method_names: FxHashSet<SmolStr>,
    /// PascalCase component name (`TodoList`).
    pub component_name: String,
    /// Hyphenated component name (`todo-list`).
    pub converted_component_name: String,
    /// The shape code is generated for.
    pub shape: ComponentShape,
}

impl Context {
    /// Creates an empty context.
    pub fn new(
        component_name: impl Into<String>,
        converted_component_name: impl Into<String>,
        shape: ComponentShape,
    ) -> Self {
        Self {
            prop_names: FxHashSet::default(),
            state_names: FxHashSet::default(),
            computed_names: FxHashSet::default(),
            method_names: FxHashSet::default(),
            component_name: component_name.into(),
            converted_component_name: converted_component_name.into(),
            shape,
        }
    }

    /// Builds the context from a reflected component surface.
    pub fn from_surface(
        surface: &ComponentSurface,
        component_name: impl Into<String>,
        converted_component_name: impl Into<String>,
        shape: ComponentShape,
    ) -> Self {
        Self::new(component_name, converted_component_name, shape)
            .with_props(surface.props.keys().map(String::as_str))
            .with_state(surface.data.keys().map(String::as_str))
            .with_computed(surface.computed.keys().map(String::as_str))
            .with_methods(surface.methods.keys().map(String::as_str))
    }

    pub fn with_props<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.prop_names.extend(names.into_iter().map(SmolStr::new));
        self
    }

    pub fn with_state<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.state_names.extend(names.into_iter().map(SmolStr::new));
        self
    }

    pub fn with_computed<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.computed_names.extend(names.into_iter().map(SmolStr::new));
        self
    }

    pub fn with_methods<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.method_names.extend(names.into_iter().map(SmolStr::new));
        self
    }

    /// Classifies an identifier, applying method > computed > state > prop.
    pub fn classify(&self, name: &str) -> Option<Category> {
        if self.method_names.contains(name) {
            Some(Category::Method)
        } else if self.computed_names.contains(name) {
            Some(Category::Computed)
        } else if self.state_names.contains(name) {
            Some(Category::State)
        } else if self.prop_names.contains(name) {
            Some(Category::Prop)
        } else {
            None
        }
    }

    /// Returns true if `name` is a declared prop, regardless of shadowing.
    pub fn is_prop(&self, name: &str) -> bool {
        self.prop_names.contains(name)
    }

    /// Returns true if `name` is a declared state field, regardless of shadowing.
    pub fn is_state(&self, name: &str) -> bool {
        self.state_names.contains(name)
    }

    /// The name a declaration has in the generated component.
    pub fn target_name(&self, name: &str) -> String {
        convert_prop_or_state_name(name)
    }

    /// The setter generated for a state field.
    pub fn state_setter(&self, name: &str) -> String {
        setter_name(&self.target_name(name))
    }

    /// The expression that reads a prop (`props.x` / `this.props.x`).
    pub fn props_access(&self, name: &str) -> String {
        match self.shape {
            ComponentShape::Function => format!("props.{}", self.target_name(name)),
            ComponentShape::Class => format!("this.props.{}", self.target_name(name)),
        }
    }
}
