//! Names derived for a converted component.

use crate::naming::{to_hyphenated, to_pascal_case};

/// The component name and its hyphenated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNames {
    /// PascalCase name used for the component and its types (`TodoList`).
    pub name: String,
    /// Hyphenated name used for output paths (`todo-list`).
    pub converted: String,
}

impl ComponentNames {
    /// Derives the names from a file path: the base name up to the first `.`.
    ///
    /// Returns `None` if the base name contains no usable characters.
    pub fn from_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let base = file_name.split('.').next().unwrap_or(file_name);
        Self::from_base_name(base)
    }

    /// Derives the names from a bare name such as the `name` option.
    pub fn from_base_name(base: &str) -> Option<Self> {
        let name = to_pascal_case(&to_hyphenated(base));
        if name.is_empty() {
            return None;
        }
        Some(Self {
            converted: to_hyphenated(base),
            name,
        })
    }
}

impl Default for ComponentNames {
    fn default() -> Self {
        Self {
            name: "Component".to_string(),
            converted: "component".to_string(),
        }
    }
}
