//! Positional `{}` substitution used by `Logger::print_fmt`.
//!
//! Unlike `format!`, the template is only known at runtime, so mismatches
//! between placeholders and values are not errors:
//! - placeholders are filled left to right with each value's `Display` text
//! - placeholders without a value stay as a literal `{}`
//! - values without a placeholder are dropped
//!
//! Substituted text is never re-scanned, so a value containing `{}` does not
//! consume the next argument.

use std::fmt::{Display, Write};

/// The placeholder token.
pub const PLACEHOLDER: &str = "{}";

/// Substitute `args` into `template`.
///
/// ```
/// use filelog_core::format::str_format;
/// assert_eq!(str_format("{} plus {} is {}", &[&1, &1, &2]), "1 plus 1 is 2");
/// assert_eq!(str_format("{} {}", &[&5]), "5 {}");
/// ```
pub fn str_format(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 8 * args.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(idx) = rest.find(PLACEHOLDER) {
        let Some(arg) = args.next() else {
            break;
        };
        out.push_str(&rest[..idx]);
        // Writing into a String cannot fail.
        let _ = write!(out, "{arg}");
        rest = &rest[idx + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

/// Count of `{}` tokens in `template`.
pub fn placeholder_count(template: &str) -> usize {
    template.matches(PLACEHOLDER).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_in_order() {
        assert_eq!(str_format("{} plus {} is {}", &[&1, &1, &2]), "1 plus 1 is 2");
        assert_eq!(str_format("{}-{}", &[&"a", &'b']), "a-b");
    }

    #[test]
    fn unmatched_placeholders_stay_literal() {
        assert_eq!(str_format("{} {}", &[&5]), "5 {}");
        assert_eq!(str_format("{}{}{}", &[]), "{}{}{}");
    }

    #[test]
    fn extra_values_are_dropped() {
        assert_eq!(str_format("no placeholders", &[&7, &8]), "no placeholders");
        assert_eq!(str_format("{}", &[&7, &8]), "7");
    }

    #[test]
    fn values_are_not_rescanned() {
        assert_eq!(str_format("{} started", &[&"{}"]), "{} started");
        assert_eq!(str_format("{} and {}", &[&"{}", &1]), "{} and 1");
    }

    #[test]
    fn braces_that_are_not_placeholders_pass_through() {
        assert_eq!(str_format("{x} { } {}", &[&3]), "{x} { } 3");
        assert_eq!(str_format("{{}}", &[&3]), "{3}");
    }

    #[test]
    fn counts_placeholders() {
        assert_eq!(placeholder_count("{} plus {} is {}"), 3);
        assert_eq!(placeholder_count("none"), 0);
    }
}
