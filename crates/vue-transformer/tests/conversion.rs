//! End-to-end conversion tests over whole `.vue` files.

use pretty_assertions::assert_eq;
use vue_transformer::{
    convert_source, ComponentShape, DiagnosticCode, TransformOptions, TransformResult,
};

const COUNTER: &str = include_str!("../../../test-fixtures/valid/counter.vue");
const TODO_LIST: &str = include_str!("../../../test-fixtures/valid/todo-list.vue");
const HORIZ_SCROLL: &str = include_str!("../../../test-fixtures/valid/horiz-scroll.vue");
const UNCLOSED: &str = include_str!("../../../test-fixtures/invalid/unclosed.vue");

fn convert(filename: &str, source: &str, shape: ComponentShape) -> TransformResult {
    convert_source(
        source,
        &TransformOptions {
            filename: Some(filename.to_string()),
            shape,
            ..Default::default()
        },
    )
    .expect("component should convert")
}

fn codes(result: &TransformResult) -> Vec<DiagnosticCode> {
    result.diagnostics.iter().map(|d| d.code).collect()
}

// ============================================================================
// WORKED EXAMPLES
// ============================================================================

#[test]
fn test_toggle_example() {
    let source = r#"<template>
  <div>
    <button @click="toggle">{{ label }}</button>
    <p v-if="open">Shown</p>
  </div>
</template>

<script>
export default {
  props: { label: String },
  data: () => ({ open: false }),
  methods: {
    toggle() {
      this.open = !this.open;
    },
  },
};
</script>
"#;
    let result = convert("toggle.vue", source, ComponentShape::Function);
    let code = &result.code;

    assert!(code.contains("export interface ToggleProps {\n  label: string;\n}"));
    assert!(code.contains("const [ open, setOpen ] = useState(false);"));
    assert!(code.contains("const toggle = () => {\n    setOpen(!open);\n  };"));
    assert!(code.contains("<button onClick={(event) => { toggle(event); }}>"));
    assert_eq!(code.matches("(() => {").count(), 1);
    assert_eq!(code.matches("})()}").count(), 1);
    assert!(code.contains("if (open) {"));
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_iteration_example() {
    let source = r#"<template>
  <ul>
    <li v-for="(item, idx) in items" :key="idx">{{item}}</li>
  </ul>
</template>

<script>
export default {
  data() {
    return { items: [] };
  },
};
</script>
"#;
    let result = convert("list.vue", source, ComponentShape::Function);
    assert!(result
        .code
        .contains("{(items).map((item, idx) => (\n          <li key={idx}>\n            {item}\n          </li>\n        ))}"));
}

// ============================================================================
// FIXTURES
// ============================================================================

#[test]
fn test_counter_function_shape() {
    let result = convert("counter.vue", COUNTER, ComponentShape::Function);
    let code = &result.code;

    assert!(code.starts_with("import React, { useState, useEffect } from 'react';\n"));
    assert!(code.contains("export interface CounterProps {}"));
    assert!(code.contains("const [ count, setCount ] = useState(0);"));
    assert!(code.contains("const increment = () => {\n    setCount(count + 1);\n  };"));
    assert!(code.contains("<div className=\"counter\">"));
    assert!(code.contains("<button onClick={(event) => { increment(event); }}>"));
    assert!(code.contains("{count}"));
    assert_eq!(result.stylesheet.file_name, "styles.css");
    assert_eq!(result.stylesheet.content, "");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_counter_class_shape() {
    let result = convert("counter.vue", COUNTER, ComponentShape::Class);
    let code = &result.code;

    assert!(code.contains("export interface CounterState {\n  count: number;\n}"));
    assert!(code.contains("export default class Counter extends ComponentBase<CounterProps, CounterState> {"));
    assert!(code.contains("this.state = {\n      count: 0,\n    };"));
    assert!(code.contains(
        "increment = () => {\n    this.setState({ count: this.state.count + 1 });\n  };"
    ));
    assert!(code.contains("<button onClick={(event) => { this.increment(event); }}>"));
    assert!(code.contains("{this.state.count}"));
}

#[test]
fn test_todo_list() {
    let result = convert("src/todo-list.vue", TODO_LIST, ComponentShape::Function);
    let code = &result.code;

    assert_eq!(result.names.name, "TodoList");
    assert!(code.contains("import TodoFooter from './todo-footer.vue';"));
    assert!(code.contains("import './styles.scss';"));
    assert!(code.contains("// TODO: import the converted components: TodoFooter"));
    assert!(code.contains(
        "export interface TodoListProps {\n  items: Array<any>;\n  title?: string;\n}"
    ));
    assert!(code.contains("const [ selected, setSelected ] = useState(-1);"));
    assert!(code.contains("hasItems: () => {\n      return props.items.length > 0;\n    },"));
    assert!(code.contains("setSelected(index);"));
    assert!(code.contains("ComponentUtils.emit(props, 'select', props.items[index]);"));
    assert!(code.contains("ComponentUtils.emit(props, 'clear');"));
    assert!(code.contains("useEffect(() => {\n    watchSelected(selected);\n  }, [ selected ]);"));
    assert!(code.contains("ComponentUtils.debounce(() => select(0));"));
    assert!(code.contains(
        "<div className={classNames('todo-list', { empty: !computedState.hasItems })}>"
    ));
    assert!(code.contains("{(props.items).map((item, index) => ("));
    assert!(code.contains("<li key={item.id} onClick={(event) => { select(index); }}>"));
    assert!(code.contains("{item.title}"));
    assert!(code.contains(
        "<TodoFooter totalCount={props.items.length} onClear={(event) => { clearAll(event); }} />"
    ));
    assert!(code.ends_with("TodoList.defaultProps = {\n  title: 'Todos',\n};\n"));

    assert_eq!(result.stylesheet.file_name, "styles.scss");
    assert!(result.stylesheet.content.contains(".empty { color: gray; }"));
    assert_eq!(
        codes(&result),
        vec![DiagnosticCode::ScopedStyle, DiagnosticCode::Watcher]
    );
    let tags: Vec<&str> = result.custom_tags.iter().map(|t| t.as_str()).collect();
    assert_eq!(tags, vec!["todo-footer"]);
}

#[test]
fn test_horiz_scroll() {
    let result = convert("horiz-scroll.vue", HORIZ_SCROLL, ComponentShape::Function);
    let code = &result.code;

    assert_eq!(result.names.converted, "horiz-scroll");
    assert!(code.contains("horizontalOffset?: any;"));
    assert!(code.contains("hint?: any;"));
    assert!(code.contains("return props.horizontalOffset + 'px';"));
    assert!(code.contains("ComponentUtils.emit(props, 'update', value);"));
    assert!(code.contains("return !!props.hint;"));
    assert!(code.contains("ref={ComponentUtils.captureReference('scroller')}"));
    assert!(code.contains("style={{ overflowX: 'auto', ...({ width: computedState.widthPx }) }}"));
    assert!(code.contains("{props.children}"));
    assert!(code.contains("if (computedState.showHint) {"));
    assert!(code.contains("{computedState.hintText}"));
}

#[test]
fn test_invalid_markup_still_converts() {
    let result = convert("unclosed.vue", UNCLOSED, ComponentShape::Function);
    assert_eq!(result.diagnostics[0].code, DiagnosticCode::ParseError);
    assert!(result.code.contains("export default function Unclosed(props: UnclosedProps) {"));
}
