//! Output locations for converted components.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use vue_transformer::naming::to_hyphenated;

/// Where one converted component is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The component directory (`<out>/<dirs>/<name>`).
    pub dir: Utf8PathBuf,
    /// The generated `<name>.tsx`.
    pub component: Utf8PathBuf,
    /// The generated stylesheet.
    pub stylesheet: Utf8PathBuf,
}

/// Computes the output paths for `file`, found under `root`.
///
/// The directories between `root` and the file are mirrored under `output`
/// with every segment hyphenated, then the component gets a directory of its
/// own named after its hyphenated name.
pub fn output_paths(
    root: &Utf8Path,
    file: &Utf8Path,
    output: &Utf8Path,
    converted: &str,
    stylesheet: &str,
) -> OutputPaths {
    let relative = match file.strip_prefix(root) {
        Ok(relative) => relative,
        Err(_) => Utf8Path::new(file.file_name().unwrap_or_default()),
    };

    let mut dir = output.to_path_buf();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            if let Utf8Component::Normal(segment) = component {
                let segment = to_hyphenated(segment);
                if !segment.is_empty() {
                    dir.push(segment);
                }
            }
        }
    }
    dir.push(converted);

    OutputPaths {
        component: dir.join(format!("{}.tsx", converted)),
        stylesheet: dir.join(stylesheet),
        dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_directories_are_hyphenated() {
        let paths = output_paths(
            Utf8Path::new("/app/src"),
            Utf8Path::new("/app/src/Admin/user_list/TodoList.vue"),
            Utf8Path::new("/out"),
            "todo-list",
            "styles.scss",
        );
        assert_eq!(
            paths,
            OutputPaths {
                dir: "/out/admin/user-list/todo-list".into(),
                component: "/out/admin/user-list/todo-list/todo-list.tsx".into(),
                stylesheet: "/out/admin/user-list/todo-list/styles.scss".into(),
            }
        );
    }

    #[test]
    fn test_file_directly_under_root() {
        let paths = output_paths(
            Utf8Path::new("src"),
            Utf8Path::new("src/counter.vue"),
            Utf8Path::new("react"),
            "counter",
            "styles.css",
        );
        assert_eq!(paths.component, Utf8PathBuf::from("react/counter/counter.tsx"));
    }

    #[test]
    fn test_file_outside_root_uses_its_name() {
        let paths = output_paths(
            Utf8Path::new("src"),
            Utf8Path::new("/elsewhere/deep/counter.vue"),
            Utf8Path::new("react"),
            "counter",
            "styles.css",
        );
        assert_eq!(paths.dir, Utf8PathBuf::from("react/counter"));
    }
}
