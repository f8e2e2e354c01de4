//! Identifier and file-name case conversions.

/// Words expanded when converting declared names.
const SPECIAL_WORDS: &[(&str, &str)] = &[("horiz", "horizontal"), ("vert", "vertical")];

/// Converts a declared prop, state, computed or method name into the name used
/// in the generated component.
///
/// - Names without `_`/`-` keep their casing, except all-uppercase names which
///   are lowercased.
/// - Kebab and snake names become camelCase.
/// - The words `horiz` / `vert` expand to `horizontal` / `vertical`.
pub fn convert_prop_or_state_name(name: &str) -> String {
    let prefix_len = name
        .char_indices()
        .find(|(_, c)| *c != '_' && *c != '$')
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    let (prefix, rest) = name.split_at(prefix_len);
    if rest.is_empty() {
        return name.to_string();
    }

    let has_separator = rest.contains(['_', '-']);
    let all_upper = rest
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '$' || c == '_' || c == '-')
        && rest.chars().any(|c| c.is_ascii_alphabetic());

    let mut result = String::with_capacity(name.len() + 8);
    result.push_str(prefix);

    if !has_separator {
        let source = if all_upper {
            rest.to_lowercase()
        } else {
            rest.to_string()
        };
        for word in split_words(&source) {
            result.push_str(&expand_special_word(&word));
        }
        return result;
    }

    for (i, word) in split_words(rest).iter().enumerate() {
        let word = expand_special_word(&word.to_lowercase());
        if i == 0 {
            result.push_str(&word);
        } else {
            result.push_str(&capitalize(&word));
        }
    }
    result
}

/// Splits a name into words at `_`/`-` separators and lower-to-upper case
/// boundaries.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            && !current.is_empty()
        {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn expand_special_word(word: &str) -> String {
    for (short, long) in SPECIAL_WORDS {
        if word.eq_ignore_ascii_case(short) {
            return if word.starts_with(|c: char| c.is_ascii_uppercase()) {
                capitalize(long)
            } else {
                (*long).to_string()
            };
        }
    }
    word.to_string()
}

/// Uppercases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns the state setter name for a converted state name (`open` → `setOpen`).
pub fn setter_name(converted: &str) -> String {
    format!("set{}", capitalize(converted))
}

/// Converts a name to the hyphenated form used for output paths.
///
/// Runs of `_` become `-`, every uppercase run is prefixed with `-`, leading
/// hyphens are stripped and the result is lowercased.
pub fn to_hyphenated(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut in_upper_run = false;

    for c in s.chars() {
        if c == '_' || c == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
            in_upper_run = false;
            continue;
        }
        if c.is_ascii_uppercase() {
            if !in_upper_run && !out.ends_with('-') {
                out.push('-');
            }
            in_upper_run = true;
        } else {
            in_upper_run = false;
        }
        out.push(c.to_ascii_lowercase());
    }

    out.trim_start_matches('-').to_string()
}

/// Converts a hyphenated or snake name to PascalCase (`my-widget` → `MyWidget`).
///
/// Leading characters that cannot start an identifier are skipped.
pub fn to_pascal_case(s: &str) -> String {
    let s = s.trim_start_matches(|c: char| !c.is_alphabetic() && c != '_' && c != '$');
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c.is_alphanumeric() || c == '$' {
            if capitalize_next {
                result.extend(c.to_uppercase());
                capitalize_next = false;
            } else {
                result.push(c);
            }
        } else {
            capitalize_next = true;
        }
    }
    result
}

/// Returns true if `s` is a valid JavaScript identifier (ASCII subset).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Returns true for characters that can continue an identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Returns true for characters that can start an identifier.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_plain_names_keep_case() {
        assert_eq!(convert_prop_or_state_name("count"), "count");
        assert_eq!(convert_prop_or_state_name("isOpen"), "isOpen");
        assert_eq!(convert_prop_or_state_name("item2"), "item2");
    }

    #[test]
    fn test_convert_separated_names_to_camel() {
        assert_eq!(convert_prop_or_state_name("total-count"), "totalCount");
        assert_eq!(convert_prop_or_state_name("user_name"), "userName");
        assert_eq!(convert_prop_or_state_name("MY_VALUE"), "myValue");
    }

    #[test]
    fn test_convert_uppercase_and_special_words() {
        assert_eq!(convert_prop_or_state_name("HINT"), "hint");
        assert_eq!(convert_prop_or_state_name("horiz_offset"), "horizontalOffset");
        assert_eq!(convert_prop_or_state_name("vertAlign"), "verticalAlign");
        assert_eq!(convert_prop_or_state_name("isHoriz"), "isHorizontal");
        assert_eq!(convert_prop_or_state_name("horizon"), "horizon");
    }

    #[test]
    fn test_convert_keeps_leading_sigils() {
        assert_eq!(convert_prop_or_state_name("_cache"), "_cache");
        assert_eq!(convert_prop_or_state_name("$el"), "$el");
    }

    #[test]
    fn test_hyphenated() {
        assert_eq!(to_hyphenated("TodoList"), "todo-list");
        assert_eq!(to_hyphenated("todo_list"), "todo-list");
        assert_eq!(to_hyphenated("horiz-scroll"), "horiz-scroll");
        assert_eq!(to_hyphenated("MyHTMLView"), "my-htmlview");
        assert_eq!(to_hyphenated("components"), "components");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("my-widget"), "MyWidget");
        assert_eq!(to_pascal_case("todo_list"), "TodoList");
        assert_eq!(to_pascal_case("TodoList"), "TodoList");
        assert_eq!(to_pascal_case("+page"), "Page");
    }

    #[test]
    fn test_setter_name() {
        assert_eq!(setter_name("open"), "setOpen");
        assert_eq!(setter_name("horizontalOffset"), "setHorizontalOffset");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("foo_1"));
        assert!(is_identifier("$event"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("data-id"));
    }
}
