//! Core data types shared by the comparator registry, the per-case judge and the batch judge.
//!

use std::time::Duration;

use sandbox::MemorySize;

use crate::comparators::Comparator;

/// An ordered sequence of text lines, with no trailing newline. Used for both program input and
/// program output. An empty sequence is legal.
pub type IoBlock = Vec<String>;

/// A single test case: the input fed to the judgee and the output it is expected to produce.
#[derive(Clone, Debug)]
pub struct TestCase {
    pub input: IoBlock,
    pub expected: IoBlock,
}

impl TestCase {
    pub fn new(input: IoBlock, expected: IoBlock) -> TestCase {
        TestCase { input, expected }
    }
}

/// The specification of one exercise: resource limits, the comparator to judge against, and the
/// ordered list of test cases.
#[derive(Clone, Debug)]
pub struct ExerciseSpec {
    /// The exercise's identifier name.
    pub name: String,

    /// The comparator used to judge the judgee's output against each test case's expected output.
    pub comparator: Comparator,

    /// CPU time limit applied to every test case.
    pub time_limit: Duration,

    /// Memory limit applied to every test case.
    pub memory_limit: MemorySize,

    /// Test cases, judged in this order.
    pub testcases: Vec<TestCase>,
}

/// A verdict reached on a single test case (or the aggregate verdict of a batch).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    AnswerCorrect,
    WrongAnswer,
    RuntimeError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
}

impl Verdict {
    /// Whether this verdict represents a passing test case.
    pub fn is_correct(self) -> bool {
        self == Verdict::AnswerCorrect
    }

    /// The surface name used by the progress hook and any external consumer.
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::AnswerCorrect => "Answer Correct",
            Verdict::WrongAnswer => "Wrong Answer",
            Verdict::RuntimeError => "Runtime Error",
            Verdict::TimeLimitExceeded => "Time Limit Exceeded",
            Verdict::MemoryLimitExceeded => "Memory Limit Exceeded",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of judging a single test case. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct TestCaseResult {
    /// 0-based position of this test case within the exercise's test suite.
    pub index: usize,

    /// The input given to the judgee.
    pub input: IoBlock,

    /// The output the judgee was expected to produce.
    pub expected: IoBlock,

    /// The judgee's actual standard output.
    pub stdout: IoBlock,

    /// The judgee's actual standard error.
    pub stderr: IoBlock,

    /// Exit code of the judgee process.
    pub exit_code: i32,

    /// CPU time consumed by the judgee, in milliseconds, for display purposes.
    pub cpu_time_ms: f64,

    /// Peak resident set size of the judgee, in bytes.
    pub memory_bytes: usize,

    /// The verdict derived for this test case.
    pub verdict: Verdict,
}

/// The aggregated result of judging an entire test suite.
#[derive(Clone, Debug)]
pub struct BatchResult {
    /// Results of every test case judged so far, in listed order.
    pub testcases: Vec<TestCaseResult>,

    /// Count of test cases whose verdict is `Verdict::AnswerCorrect`.
    pub passed: usize,

    /// Count of test cases judged so far.
    pub total: usize,

    /// Highest CPU time, in seconds, observed across all judged test cases.
    pub max_cpu_time: f64,

    /// Highest peak memory, in bytes, observed across all judged test cases.
    pub max_memory: usize,

    /// The aggregate verdict: `AnswerCorrect` iff every case judged so far passed, otherwise the
    /// verdict of the first non-passing case encountered.
    pub overall_verdict: Verdict,
}

impl BatchResult {
    pub fn new() -> BatchResult {
        BatchResult {
            testcases: Vec::new(),
            passed: 0,
            total: 0,
            max_cpu_time: 0.0,
            max_memory: 0,
            overall_verdict: Verdict::AnswerCorrect,
        }
    }

    /// Fold one more test case's result into the running aggregate.
    pub(crate) fn add(&mut self, tc: TestCaseResult) {
        self.total += 1;
        if tc.verdict.is_correct() {
            self.passed += 1;
        }
        self.max_cpu_time = self.max_cpu_time.max(tc.cpu_time_ms / 1000.0);
        self.max_memory = self.max_memory.max(tc.memory_bytes);

        if self.overall_verdict.is_correct() && !tc.verdict.is_correct() {
            self.overall_verdict = tc.verdict;
        }

        self.testcases.push(tc);
    }
}

impl Default for BatchResult {
    fn default() -> BatchResult {
        BatchResult::new()
    }
}
