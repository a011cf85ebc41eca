//! The batch judge: runs an entire exercise's test suite against a judgee program in listed
//! order, folding each case's result into a running `BatchResult`.
//!

use std::sync::atomic::{AtomicBool, Ordering};

use crate::per_case::judge_one;
use crate::types::{BatchResult, ExerciseSpec};
use crate::Result;

/// Judge `argv` against every test case in `spec`, in order. `progress_hook`, if given, is invoked
/// exactly once per completed case with the batch result as it stands after that case.
pub fn judge_program(
    argv: &[String],
    spec: &ExerciseSpec,
    mut progress_hook: Option<&mut dyn FnMut(&BatchResult)>,
) -> Result<BatchResult> {
    log::trace!("judge: batch \"{}\" starting, {} test cases", spec.name, spec.testcases.len());
    let mut result = BatchResult::new();

    for (index, test) in spec.testcases.iter().enumerate() {
        let tc = judge_one(
            argv,
            index,
            test,
            spec.time_limit,
            spec.memory_limit,
            spec.comparator,
        )?;
        result.add(tc);

        if let Some(hook) = progress_hook.as_mut() {
            hook(&result);
        }
    }

    log::debug!(
        "judge: batch \"{}\" finished, {}/{} passed, overall {}",
        spec.name,
        result.passed,
        result.total,
        result.overall_verdict
    );
    Ok(result)
}

/// Like `judge_program`, but checks `cancelled` between cases and stops the batch early (without
/// error) if it has been set. Intended for a caller-installed `SIGINT` handler.
pub fn judge_program_cancellable(
    argv: &[String],
    spec: &ExerciseSpec,
    cancelled: &AtomicBool,
    mut progress_hook: Option<&mut dyn FnMut(&BatchResult)>,
) -> Result<BatchResult> {
    log::trace!(
        "judge: batch \"{}\" starting (cancellable), {} test cases",
        spec.name,
        spec.testcases.len()
    );
    let mut result = BatchResult::new();

    for (index, test) in spec.testcases.iter().enumerate() {
        if cancelled.load(Ordering::SeqCst) {
            log::debug!("judge: batch \"{}\" cancelled after {} cases", spec.name, result.total);
            break;
        }

        let tc = judge_one(
            argv,
            index,
            test,
            spec.time_limit,
            spec.memory_limit,
            spec.comparator,
        )?;
        result.add(tc);

        if let Some(hook) = progress_hook.as_mut() {
            hook(&result);
        }
    }

    log::debug!(
        "judge: batch \"{}\" finished (cancellable), {}/{} passed, overall {}",
        spec.name,
        result.passed,
        result.total,
        result.overall_verdict
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use sandbox::MemorySize;

    use crate::comparators::Comparator;
    use crate::types::{ExerciseSpec, TestCase, Verdict};

    use super::{judge_program, judge_program_cancellable};

    fn echo_spec(testcases: Vec<TestCase>) -> ExerciseSpec {
        ExerciseSpec {
            name: "echo".to_owned(),
            comparator: Comparator::Identical,
            time_limit: Duration::from_secs(2),
            memory_limit: MemorySize::MegaBytes(64),
            testcases,
        }
    }

    #[test]
    fn test_judge_program_all_correct() {
        let spec = echo_spec(vec![
            TestCase::new(vec!["1".to_owned()], vec!["1".to_owned()]),
            TestCase::new(vec!["2".to_owned()], vec!["2".to_owned()]),
        ]);
        let argv = vec!["cat".to_owned()];

        let result = judge_program(&argv, &spec, None).unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.passed, 2);
        assert_eq!(result.overall_verdict, Verdict::AnswerCorrect);
    }

    #[test]
    fn test_judge_program_sticky_aggregate_verdict() {
        let spec = echo_spec(vec![
            TestCase::new(vec!["1".to_owned()], vec!["1".to_owned()]),
            TestCase::new(vec!["2".to_owned()], vec!["not-2".to_owned()]),
            TestCase::new(vec!["3".to_owned()], vec!["3".to_owned()]),
        ]);
        let argv = vec!["cat".to_owned()];

        let result = judge_program(&argv, &spec, None).unwrap();

        assert_eq!(result.total, 3);
        assert_eq!(result.passed, 2);
        assert_eq!(result.overall_verdict, Verdict::WrongAnswer);
        assert_eq!(result.testcases[1].verdict, Verdict::WrongAnswer);
    }

    #[test]
    fn test_judge_program_runs_every_case_even_after_a_failure() {
        let spec = echo_spec(vec![
            TestCase::new(vec!["1".to_owned()], vec!["nope".to_owned()]),
            TestCase::new(vec!["2".to_owned()], vec!["2".to_owned()]),
        ]);
        let argv = vec!["cat".to_owned()];

        let result = judge_program(&argv, &spec, None).unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.testcases[1].verdict, Verdict::AnswerCorrect);
    }

    #[test]
    fn test_judge_program_invokes_progress_hook_once_per_case() {
        let spec = echo_spec(vec![
            TestCase::new(vec!["1".to_owned()], vec!["1".to_owned()]),
            TestCase::new(vec!["2".to_owned()], vec!["2".to_owned()]),
        ]);
        let argv = vec!["cat".to_owned()];

        let mut seen_totals = Vec::new();
        let mut hook = |batch: &crate::types::BatchResult| seen_totals.push(batch.total);

        judge_program(&argv, &spec, Some(&mut hook)).unwrap();

        assert_eq!(seen_totals, vec![1, 2]);
    }

    #[test]
    fn test_judge_program_assigns_indices_in_listed_order() {
        let spec = echo_spec(vec![
            TestCase::new(vec!["1".to_owned()], vec!["1".to_owned()]),
            TestCase::new(vec!["2".to_owned()], vec!["2".to_owned()]),
            TestCase::new(vec!["3".to_owned()], vec!["3".to_owned()]),
        ]);
        let argv = vec!["cat".to_owned()];

        let result = judge_program(&argv, &spec, None).unwrap();

        for (i, tc) in result.testcases.iter().enumerate() {
            assert_eq!(tc.index, i);
            assert_eq!(tc.input, spec.testcases[i].input);
        }
    }

    #[test]
    fn test_judge_program_resource_bound_soundness_on_full_pass() {
        let spec = echo_spec(vec![TestCase::new(
            vec!["1".to_owned()],
            vec!["1".to_owned()],
        )]);
        let argv = vec!["cat".to_owned()];

        let result = judge_program(&argv, &spec, None).unwrap();

        assert_eq!(result.overall_verdict, Verdict::AnswerCorrect);
        assert!(result.max_cpu_time <= spec.time_limit.as_secs_f64());
        assert!(result.max_memory <= spec.memory_limit.bytes());
    }

    #[test]
    fn test_judge_program_cancellable_stops_between_cases() {
        let spec = echo_spec(vec![
            TestCase::new(vec!["1".to_owned()], vec!["1".to_owned()]),
            TestCase::new(vec!["2".to_owned()], vec!["2".to_owned()]),
            TestCase::new(vec!["3".to_owned()], vec!["3".to_owned()]),
        ]);
        let argv = vec!["cat".to_owned()];
        let cancelled = AtomicBool::new(false);

        let mut hook = |batch: &crate::types::BatchResult| {
            if batch.total == 1 {
                cancelled.store(true, Ordering::SeqCst);
            }
        };

        let result =
            judge_program_cancellable(&argv, &spec, &cancelled, Some(&mut hook)).unwrap();

        assert_eq!(result.total, 1);
    }
}
