//! Interactive Prompt Abstraction
//!
//! Operations that need a human decision receive a [`Prompter`] instead of
//! touching the terminal, so batch logic stays testable without stdin.

/// Source of interactive decisions
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question. Anything other than an explicit yes is `false`.
    fn confirm(&self, prompt: &str) -> bool;

    /// Present `options` and ask for a 1-based choice.
    ///
    /// Returns the 0-based index of the chosen option, or `None` when the
    /// answer is blank, not a number, or out of range.
    fn select_index(&self, prompt: &str, options: &[String]) -> Option<usize>;
}

/// Interpret a raw 1-based answer against `max` options.
pub fn parse_selection(answer: &str, max: usize) -> Option<usize> {
    let choice: usize = answer.trim().parse().ok()?;
    (1..=max).contains(&choice).then(|| choice - 1)
}

/// Interpret a raw y/N answer.
pub fn parse_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 3), Some(0));
        assert_eq!(parse_selection(" 3\n", 3), Some(2));
        assert_eq!(parse_selection("", 3), None);
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("two", 3), None);
    }

    #[test]
    fn test_parse_confirmation() {
        assert!(parse_confirmation("y"));
        assert!(parse_confirmation("Y\n"));
        assert!(!parse_confirmation("yes"));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("n"));
    }
}
