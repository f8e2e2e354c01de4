//! Corpus tests that parse all fixture files to ensure no panics
//! and that valid fixtures produce no errors.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use vue_parser::{parse, Node};

fn get_fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("test-fixtures")
}

fn collect_vue_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "vue") {
                files.push(path);
            } else if path.is_dir() {
                files.extend(collect_vue_files(&path));
            }
        }
    }
    files
}

#[test]
fn test_parse_all_valid_fixtures() {
    let files = collect_vue_files(&get_fixtures_dir().join("valid"));
    assert!(!files.is_empty(), "No valid fixtures found");

    for path in &files {
        let source = fs::read_to_string(path).expect("Failed to read file");
        let filename = path.file_name().unwrap().to_string_lossy();

        let result = parse(&source);

        assert!(
            result.errors.is_empty(),
            "Valid fixture {} should have no errors, but got: {:?}",
            filename,
            result.errors
        );
        assert!(
            result.document.template.is_some(),
            "Valid fixture {} should have a template",
            filename
        );
        assert!(
            result.document.script.is_some(),
            "Valid fixture {} should have a script",
            filename
        );
    }
}

#[test]
fn test_parse_all_invalid_fixtures() {
    let files = collect_vue_files(&get_fixtures_dir().join("invalid"));
    assert!(!files.is_empty(), "No invalid fixtures found");

    for path in &files {
        let source = fs::read_to_string(path).expect("Failed to read file");
        let filename = path.file_name().unwrap().to_string_lossy();

        let result = parse(&source);
        assert!(
            !result.errors.is_empty(),
            "Invalid fixture {} should report errors",
            filename
        );
    }
}

#[test]
fn test_template_root_has_one_element() {
    let source = fs::read_to_string(get_fixtures_dir().join("valid").join("counter.vue"))
        .expect("Failed to read file");
    let template = parse(&source).document.template.expect("template");

    let elements: Vec<_> = template
        .children
        .iter()
        .filter_map(Node::as_element)
        .collect();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].name, "div");
    assert_eq!(
        elements[0].attribute("class").map(|a| a.value_str()),
        Some("counter")
    );
}
