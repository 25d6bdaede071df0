//! Text sanitization for TTS input.
//!
//! The synthesis API reads text literally, so characters that render fine on
//! screen can come out as noise: smart quotes, zero-width joiners, control
//! characters, runs of periods. Cleaning replaces or removes those and
//! normalizes whitespace while keeping paragraph breaks (blank lines)
//! intact, since the chunker splits on them.

/// Clean chapter text before chunking and synthesis.
pub fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        if let Some(replacement) = replacement_for(c) {
            result.push_str(replacement);
        } else if c == '\n' || c == '\t' || !c.is_control() {
            result.push(c);
        }
    }

    let result = normalize_whitespace(&result);
    collapse_period_runs(&result)
}

/// Replacement for characters that trip up the TTS voice, if any.
fn replacement_for(c: char) -> Option<&'static str> {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{2032}' => Some("'"),
        '\u{201c}' | '\u{201d}' | '\u{2033}' | '\u{00ab}' | '\u{00bb}' => Some("\""),
        '\u{2013}' | '\u{2014}' | '\u{2011}' | '\u{2012}' | '\u{2015}' => Some("-"),
        '\u{2026}' => Some("..."),
        '\u{00a0}' => Some(" "),
        '\u{2039}' => Some("<"),
        '\u{203a}' => Some(">"),
        // Zero-width characters and the BOM vanish entirely
        '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' => Some(""),
        _ => None,
    }
}

/// Collapse runs of spaces/tabs to one space and runs of newlines to at
/// most two (one paragraph break); trim the ends.
fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_spaces = false;
    let mut newline_run = 0;

    for c in text.chars() {
        match c {
            '\n' => {
                newline_run += 1;
                pending_spaces = false;
                if newline_run <= 2 {
                    result.push('\n');
                }
            }
            ' ' | '\t' => pending_spaces = true,
            _ => {
                if pending_spaces && !result.is_empty() && !result.ends_with('\n') {
                    result.push(' ');
                }
                pending_spaces = false;
                newline_run = 0;
                result.push(c);
            }
        }
    }

    result.trim().to_string()
}

/// Reduce ".." and "..." runs to a single period; repeated periods make the
/// voice stutter.
fn collapse_period_runs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_period_run = false;

    for c in text.chars() {
        if c == '.' {
            if !in_period_run {
                result.push('.');
                in_period_run = true;
            }
        } else {
            in_period_run = false;
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_quotes_replaced() {
        let cleaned = clean_text("\u{201c}Hi,\u{201d} she said. \u{2018}Go.\u{2019}");
        assert_eq!(cleaned, "\"Hi,\" she said. 'Go.'");
    }

    #[test]
    fn test_dashes_and_ellipsis() {
        assert_eq!(clean_text("one\u{2013}two\u{2014}three"), "one-two-three");
        // The ellipsis becomes "..." and the period run is then collapsed
        assert_eq!(clean_text("wait\u{2026} what"), "wait. what");
    }

    #[test]
    fn test_period_runs_collapsed() {
        assert_eq!(clean_text("What.. is... this...."), "What. is. this.");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(
            clean_text("Hello   world\n\n\n\nNext paragraph"),
            "Hello world\n\nNext paragraph"
        );
    }

    #[test]
    fn test_paragraph_breaks_survive() {
        assert_eq!(clean_text("a\n\nb"), "a\n\nb");
        assert_eq!(clean_text("a\nb"), "a\nb");
    }

    #[test]
    fn test_control_and_zero_width_chars_removed() {
        assert_eq!(clean_text("He\x00llo\u{200b} wor\x07ld"), "Hello world");
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        assert_eq!(clean_text("  text  \n\n"), "text");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n\n  "), "");
    }
}
