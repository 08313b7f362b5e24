// crates/storyreel-ui/src/helpers/format.rs
//
// Display-string utilities for labels and keys. Nothing here has meaning
// outside of what ends up on the page.

/// Collapse runs of whitespace (including newlines from heading markup) into
/// single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stage key from a free-text label: lowercase ASCII alphanumerics joined by
/// underscores. `"Ready for Launch!"` → `"ready_for_launch"`.
pub fn slugify(label: &str) -> String {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Heading text for a stage key. `"first_moves"` → `"First Moves"`.
pub fn humanize_key(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_collapses() {
        assert_eq!(collapse_whitespace("  Each\n   Other \t"), "Each Other");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn slug_from_label() {
        assert_eq!(slugify("Ready for Launch!"), "ready_for_launch");
        assert_eq!(slugify("  --  "), "");
    }

    #[test]
    fn humanized_keys() {
        assert_eq!(humanize_key("first_moves"), "First Moves");
        assert_eq!(humanize_key("ready-for-launch"), "Ready For Launch");
    }
}
