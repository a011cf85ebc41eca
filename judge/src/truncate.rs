//! Truncation of captured output for display: a running character budget spent across the whole
//! block plus a cap on the number of lines shown, with a visible marker where material was cut.
//!

use crate::types::IoBlock;

/// Sentinel appended in place of text removed by truncation.
pub const TRUNCATION_MARKER: &str = "⯇truncated⯈";

/// Truncate `lines` against an overall character budget and a line-count cap, both optional.
/// Counts are in Unicode scalar values, not bytes.
///
/// Walks the lines in order. Before emitting each line: if the line is longer than the remaining
/// character budget, emit a prefix of it of that length as one line, then `TRUNCATION_MARKER` as
/// a line of its own, and stop; else if the line limit has been reached, emit `TRUNCATION_MARKER`
/// as a line of its own and stop; otherwise emit the full line and debit its length from the
/// character budget and one from the line limit. If both limits are absent, `lines` is returned
/// unchanged.
pub fn truncate(lines: &IoBlock, char_limit: Option<usize>, line_limit: Option<usize>) -> IoBlock {
    if char_limit.is_none() && line_limit.is_none() {
        return lines.clone();
    }

    let mut char_budget = char_limit.unwrap_or(usize::MAX);
    let mut line_budget = line_limit.unwrap_or(usize::MAX);

    let mut result = IoBlock::new();
    for line in lines {
        let len = line.chars().count();

        // Char-budget overflow is checked before the line-limit-reached case below, matching
        // original_source/src/truncate.py exactly. The two orderings only disagree when
        // line_budget is already 0 and this line also overflows the char budget; this ordering
        // still emits the cut prefix in that case rather than a bare marker.
        if len > char_budget {
            let prefix: String = line.chars().take(char_budget).collect();
            result.push(prefix);
            result.push(TRUNCATION_MARKER.to_owned());
            return result;
        }

        if line_budget == 0 {
            result.push(TRUNCATION_MARKER.to_owned());
            return result;
        }

        result.push(line.clone());
        char_budget -= len;
        line_budget -= 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{truncate, TRUNCATION_MARKER};

    fn block(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_truncate_returns_unchanged_when_both_limits_absent() {
        let lines = block(&["hi", "there"]);
        assert_eq!(truncate(&lines, None, None), lines);
    }

    #[test]
    fn test_truncate_leaves_short_block_untouched() {
        let lines = block(&["hi", "there"]);
        assert_eq!(truncate(&lines, Some(200), Some(4)), lines);
    }

    #[test]
    fn test_truncate_cuts_long_line_and_stops() {
        let lines = block(&["abcdefghij", "more"]);
        let result = truncate(&lines, Some(4), Some(4));
        assert_eq!(result, vec!["abcd".to_owned(), TRUNCATION_MARKER.to_owned()]);
    }

    #[test]
    fn test_truncate_cuts_excess_lines() {
        let lines = block(&["a", "b", "c", "d", "e"]);
        let result = truncate(&lines, Some(200), Some(3));
        assert_eq!(result, vec!["a", "b", "c", TRUNCATION_MARKER]);
    }

    #[test]
    fn test_truncate_char_budget_is_spent_across_lines() {
        // Budget of 3 is fully spent by the first two lines; the third line then exceeds the
        // (now zero) remaining budget and gets cut to an empty prefix.
        let lines = block(&["a", "bb", "ccc"]);
        let result = truncate(&lines, Some(3), Some(10));
        assert_eq!(result, vec!["a", "bb", "", TRUNCATION_MARKER]);
    }

    #[test]
    fn test_truncate_counts_unicode_scalars_not_bytes() {
        let lines = block(&["日本語のテスト"]);
        let result = truncate(&lines, Some(3), Some(1));
        assert_eq!(result, vec!["日本語".to_owned(), TRUNCATION_MARKER.to_owned()]);
    }

    #[test]
    fn test_truncate_only_char_limit_set() {
        let lines = block(&["ab", "cd", "ef"]);
        assert_eq!(truncate(&lines, Some(10), None), lines);
    }

    #[test]
    fn test_truncate_empty_block() {
        let lines: Vec<String> = Vec::new();
        assert_eq!(truncate(&lines, Some(200), Some(4)), Vec::<String>::new());
    }

    #[test]
    fn test_truncate_idempotent_when_first_call_does_not_truncate() {
        let lines = block(&["a", "b"]);
        let once = truncate(&lines, Some(200), Some(4));
        let twice = truncate(&once, Some(200), Some(4));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncate_second_call_is_a_no_op_when_first_call_truncated() {
        let lines = block(&["a", "b", "c", "d", "e"]);
        let once = truncate(&lines, Some(200), Some(3));
        let twice = truncate(&once, Some(200), Some(3));
        assert_eq!(once, twice);
    }
}
