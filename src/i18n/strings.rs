/// Fixed labels rendered in place of, or for, property values.
///
/// These are the same for every content language and every viewer locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayStrings {
    /// Shown when a value is explicitly null
    pub not_specified: &'static str,

    /// Shown when a single value could not be formatted
    pub format_error: &'static str,

    /// Truthy boolean label
    pub yes: &'static str,

    /// Falsy boolean label
    pub no: &'static str,
}

pub const DISPLAY_STRINGS: DisplayStrings = DisplayStrings {
    not_specified: "Not specified",
    format_error: "Format error",
    yes: "Yes",
    no: "No",
};

impl DisplayStrings {
    pub fn boolean(&self, value: bool) -> &'static str {
        if value {
            self.yes
        } else {
            self.no
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_distinct_and_non_empty() {
        let s = DISPLAY_STRINGS;
        let all = [s.not_specified, s.format_error, s.yes, s.no];
        for (i, a) in all.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_boolean_labels() {
        assert_eq!(DISPLAY_STRINGS.boolean(true), "Yes");
        assert_eq!(DISPLAY_STRINGS.boolean(false), "No");
    }
}
