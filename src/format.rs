//! Positional template formatting.
//!
//! Templates carry placeholders `{0}`, `{1}`, ... that are filled from a
//! list of values. Substitution runs once per supplied value, in order:
//! value N replaces the *first* remaining `{N}` in the string as it stands
//! at that step. Repeated placeholders keep their later occurrences, and
//! placeholders without a value stay in the output untouched.
//!
//! ```
//! use zilpool_rpc::format::format;
//!
//! assert_eq!(format("{0}-{1}", &["a", "b"]), "a-b");
//! assert_eq!(format("{0} {0}", &["x"]), "x {0}");
//! assert_eq!(format("{0}-{1}", &["a"]), "a-{1}");
//! ```

use std::fmt::Display;

/// Render `template` by substituting each value into its placeholder.
///
/// Extra values with no matching placeholder are ignored.
pub fn format<T: Display>(template: &str, values: &[T]) -> String {
    let mut rendered = template.to_owned();

    for (index, value) in values.iter().enumerate() {
        let placeholder = format!("{{{}}}", index);
        rendered = rendered.replacen(&placeholder, &value.to_string(), 1);
    }

    rendered
}

/// Format a template from heterogeneous [`Display`] values.
///
/// ```
/// use zilpool_rpc::template;
///
/// assert_eq!(template!("{0}: {1}", "down", 503), "down: 503");
/// ```
#[macro_export]
macro_rules! template {
    ($template:expr $(,)?) => {
        $crate::format::format::<&str>($template, &[])
    };
    ($template:expr, $($value:expr),+ $(,)?) => {
        $crate::format::format::<&dyn ::std::fmt::Display>($template, &[$(&$value),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_placeholders_is_unchanged() {
        assert_eq!(format::<&str>("no placeholders", &[]), "no placeholders");
    }

    #[test]
    fn test_positional_substitution() {
        assert_eq!(format("{0}-{1}", &["a", "b"]), "a-b");
    }

    #[test]
    fn test_replaces_first_occurrence_only() {
        assert_eq!(format("{0} {0}", &["x"]), "x {0}");
    }

    #[test]
    fn test_missing_value_leaves_placeholder() {
        assert_eq!(format("{0}-{1}", &["a"]), "a-{1}");
    }

    #[test]
    fn test_extra_values_are_ignored() {
        assert_eq!(format("{0}", &["a", "b", "c"]), "a");
    }

    #[test]
    fn test_order_follows_values_not_template() {
        assert_eq!(format("{1} then {0}", &["first", "second"]), "second then first");
    }

    #[test]
    fn test_substituted_text_is_visible_to_later_steps() {
        // Step 0 inserts "{1}" before the template's own "{1}"; step 1 hits it first.
        assert_eq!(format("{0} {1}", &["{1}", "b"]), "b {1}");
    }

    #[test]
    fn test_template_is_not_mutated() {
        let template = String::from("{0}!");
        let rendered = format(&template, &["hi"]);
        assert_eq!(template, "{0}!");
        assert_eq!(rendered, "hi!");
    }

    #[test]
    fn test_macro_mixes_value_types() {
        assert_eq!(crate::template!("{0}: {1}", "bad", 42), "bad: 42");
        assert_eq!(crate::template!("plain"), "plain");
    }
}
