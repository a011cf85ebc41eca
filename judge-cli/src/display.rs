//! Renders batch-judge progress to the terminal: one truncated line per completed test case, and
//! a final score summary.
//!

use judge::truncate;
use judge::types::{BatchResult, TestCaseResult};

const DISPLAY_CHAR_LIMIT: usize = 200;
const DISPLAY_LINE_LIMIT: usize = 4;

/// Render the most recently completed test case to a single progress line.
pub fn render_case(tc: &TestCaseResult) -> String {
    format!(
        "case {:>3}: {:<20} ({:.1} ms, {} bytes)",
        tc.index + 1,
        tc.verdict.as_str(),
        tc.cpu_time_ms,
        tc.memory_bytes,
    )
}

/// Render a truncated view of the judgee's captured stdout, suitable for a verbose progress
/// display (e.g. under `-v`).
pub fn render_output(tc: &TestCaseResult) -> String {
    truncate(&tc.stdout, Some(DISPLAY_CHAR_LIMIT), Some(DISPLAY_LINE_LIMIT)).join("\n")
}

/// Render the final score line once the batch has completed.
pub fn render_summary(result: &BatchResult) -> String {
    format!(
        "{}/{} passed — {} (max {:.1} ms, {} bytes)",
        result.passed,
        result.total,
        result.overall_verdict.as_str(),
        result.max_cpu_time * 1000.0,
        result.max_memory,
    )
}

#[cfg(test)]
mod tests {
    use judge::types::{BatchResult, TestCaseResult, Verdict};

    use super::{render_case, render_summary};

    fn sample_case() -> TestCaseResult {
        TestCaseResult {
            index: 0,
            input: vec!["1".to_owned()],
            expected: vec!["1".to_owned()],
            stdout: vec!["1".to_owned()],
            stderr: vec![],
            exit_code: 0,
            cpu_time_ms: 12.5,
            memory_bytes: 4096,
            verdict: Verdict::AnswerCorrect,
        }
    }

    #[test]
    fn test_render_case_includes_verdict_and_metrics() {
        let line = render_case(&sample_case());
        assert!(line.contains("Answer Correct"));
        assert!(line.contains("12.5"));
        assert!(line.contains("4096"));
    }

    #[test]
    fn test_render_summary_reports_aggregate() {
        let mut result = BatchResult::new();
        result.add(sample_case());

        let line = render_summary(&result);

        assert!(line.contains("1/1 passed"));
        assert!(line.contains("Answer Correct"));
    }
}
