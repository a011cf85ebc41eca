//! Judging a single test case: encode the input, run it through the sandbox, decode the output,
//! and derive a verdict.
//!

use std::time::Duration;

use sandbox::MemorySize;

use crate::comparators::Comparator;
use crate::types::{IoBlock, TestCase, Verdict, TestCaseResult};
use crate::Result;

/// Judge a single test case by running `argv` under the sandbox with `test.input` fed on stdin.
pub fn judge_one(
    argv: &[String],
    index: usize,
    test: &TestCase,
    time_limit: Duration,
    memory_limit: MemorySize,
    comparator: Comparator,
) -> Result<TestCaseResult> {
    log::trace!("judge: case {} starting under argv {:?}", index, argv);

    let stdin_blob = encode(&test.input);
    let run = sandbox::run(argv, &stdin_blob, memory_limit, time_limit)?;

    let stdout = decode(&run.stdout);
    let stderr = decode(&run.stderr);

    let verdict = if run.time_exceeded {
        Verdict::TimeLimitExceeded
    } else if run.memory_exceeded {
        Verdict::MemoryLimitExceeded
    } else if run.exit_code != 0 {
        Verdict::RuntimeError
    } else if comparator.evaluate(&stdout, &test.expected) {
        Verdict::AnswerCorrect
    } else {
        Verdict::WrongAnswer
    };

    log::debug!("judge: case {} verdict {}", index, verdict);

    Ok(TestCaseResult {
        index,
        input: test.input.clone(),
        expected: test.expected.clone(),
        stdout,
        stderr,
        exit_code: run.exit_code,
        cpu_time_ms: run.cpu_time_used * 1000.0,
        memory_bytes: run.memory_used,
        verdict,
    })
}

/// Join `lines` with `\n`, terminating every line (including the last) with `\n`.
fn encode(lines: &IoBlock) -> Vec<u8> {
    let mut blob = String::new();
    for line in lines {
        blob.push_str(line);
        blob.push('\n');
    }
    blob.into_bytes()
}

/// Decode a captured output blob into an `IoBlock`: strip leading/trailing newlines from the whole
/// blob, then split on `\n` and strip a trailing `\r` from each resulting line.
fn decode(blob: &str) -> IoBlock {
    blob.trim_matches('\n')
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_owned())
        .collect()
}
