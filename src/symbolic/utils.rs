// the collection of utility functions for bracket checking and error positions in expression strings

/// Problem found while scanning the brackets of an expression string.
#[derive(Debug, Clone, PartialEq)]
pub enum BracketIssue {
    /// closing bracket at this char position has no opening pair
    UnexpectedClosing(usize),
    /// opening bracket at this char position is never closed
    Unclosed(usize),
}

/// Scans round brackets and reports the first unmatched one.
/// For unclosed brackets the outermost (leftmost) still-open bracket is reported.
pub fn check_brackets(s: &str) -> Result<(), BracketIssue> {
    let mut stack = Vec::new();
    for (i, c) in s.chars().enumerate() {
        match c {
            '(' => stack.push(i),
            ')' => {
                if stack.pop().is_none() {
                    return Err(BracketIssue::UnexpectedClosing(i));
                }
            }
            _ => {}
        }
    }
    match stack.first() {
        Some(&pos) => Err(BracketIssue::Unclosed(pos)),
        None => Ok(()),
    }
}

/// Char position of `rest` inside `input`, `rest` being a suffix of `input` (as nom leaves it).
pub fn position_of_suffix(input: &str, rest: &str) -> usize {
    let consumed = input.len().saturating_sub(rest.len());
    input[..consumed].chars().count()
}

/// Short excerpt of the remaining input for error messages.
pub fn excerpt(rest: &str) -> String {
    let trimmed = rest.trim_start();
    let snippet: String = trimmed.chars().take(12).collect();
    if trimmed.chars().count() > 12 {
        format!("{}...", snippet)
    } else {
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced() {
        assert_eq!(check_brackets("sin(x) + (x*(x+1))"), Ok(()));
        assert_eq!(check_brackets("x"), Ok(()));
    }

    #[test]
    fn test_unclosed_reports_outermost() {
        assert_eq!(check_brackets("sin(x"), Err(BracketIssue::Unclosed(3)));
        assert_eq!(check_brackets("((x)"), Err(BracketIssue::Unclosed(0)));
    }

    #[test]
    fn test_unexpected_closing() {
        assert_eq!(check_brackets("x)+(1"), Err(BracketIssue::UnexpectedClosing(1)));
    }

    #[test]
    fn test_position_of_suffix_counts_chars() {
        let input = "π + x";
        let rest = &input[input.len() - 1..];
        assert_eq!(position_of_suffix(input, rest), 4);
    }

    #[test]
    fn test_excerpt_truncates() {
        assert_eq!(excerpt("  abc"), "abc");
        assert_eq!(excerpt("0123456789abcdef"), "0123456789ab...");
    }
}
