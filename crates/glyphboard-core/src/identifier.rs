//! Identifier rules and automatic naming.
//!
//! Element and screen names are spliced verbatim into generated C++ source,
//! so they must be identifiers of the target language: an ASCII letter
//! followed by letters, digits or underscores, and not a keyword.

use crate::{element::ElementKind, error::ValidationError};

/// C++20 keywords, alternative operator tokens, and the runtime names a
/// layout may not shadow.
const RESERVED: &[&str] = &[
    // keywords
    "alignas", "alignof", "asm", "auto", "bool", "break", "case", "catch", "char", "char8_t",
    "char16_t", "char32_t", "class", "concept", "const", "consteval", "constexpr", "constinit",
    "const_cast", "continue", "co_await", "co_return", "co_yield", "decltype", "default",
    "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit", "export", "extern",
    "false", "float", "for", "friend", "goto", "if", "inline", "int", "long", "mutable",
    "namespace", "new", "noexcept", "nullptr", "operator", "private", "protected", "public",
    "register", "reinterpret_cast", "requires", "return", "short", "signed", "sizeof",
    "static", "static_assert", "static_cast", "struct", "switch", "template", "this",
    "thread_local", "throw", "true", "try", "typedef", "typeid", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while",
    // alternative tokens
    "and", "and_eq", "bitand", "bitor", "compl", "not", "not_eq", "or", "or_eq", "xor",
    "xor_eq",
    // runtime
    "PROGMEM", "NULL",
];

/// Checks that `name` can be used as a generated identifier.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`], [`ValidationError::InvalidIdentifier`]
/// or [`ValidationError::ReservedWord`].
///
/// # Examples
///
/// ```
/// use glyphboard_core::identifier::validate;
///
/// assert!(validate("temperature_C").is_ok());
/// assert!(validate("2fast").is_err());
/// assert!(validate("struct").is_err());
/// ```
pub fn validate(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ValidationError::EmptyName);
    };
    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidIdentifier(name.to_string()));
    }
    if RESERVED.contains(&name) {
        return Err(ValidationError::ReservedWord(name.to_string()));
    }
    Ok(())
}

/// Returns `true` if [`validate`] accepts `name`.
pub fn is_valid(name: &str) -> bool {
    validate(name).is_ok()
}

/// Picks the automatic name for a new element of `kind`.
///
/// The result is `<kind><n>` with the smallest zero-based `n` not taken by
/// any name in `taken`, so indices freed by deletion are reused.
///
/// # Examples
///
/// ```
/// use glyphboard_core::{element::ElementKind, identifier::auto_name};
///
/// let taken = ["box0", "box2"];
/// assert_eq!(auto_name(ElementKind::Box, taken), "box1");
/// ```
pub fn auto_name<'a>(kind: ElementKind, taken: impl IntoIterator<Item = &'a str>) -> String {
    let prefix = kind.as_str();
    let mut used: Vec<usize> = taken
        .into_iter()
        .filter_map(|name| name.strip_prefix(prefix))
        .filter(|suffix| is_canonical_index(suffix))
        .filter_map(|suffix| suffix.parse().ok())
        .collect();
    used.sort_unstable();
    used.dedup();

    let index = used
        .iter()
        .enumerate()
        .find(|(expected, actual)| expected != *actual)
        .map_or(used.len(), |(expected, _)| expected);
    format!("{prefix}{index}")
}

/// Picks `base` if free, otherwise `base_<n>` with the smallest `n >= 1`.
pub fn unique_with_suffix<'a>(base: &str, taken: impl IntoIterator<Item = &'a str> + Clone) -> String {
    let is_taken = |candidate: &str| taken.clone().into_iter().any(|name| name == candidate);
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{base}_{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// `"7"` and `"0"` are canonical, `"07"` is not (it spells a different name).
fn is_canonical_index(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix.chars().all(|c| c.is_ascii_digit())
        && (suffix == "0" || !suffix.starts_with('0'))
}
