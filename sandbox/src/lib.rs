//! This crate implements the sandboxed runner used by the judge. The sandbox is responsible for
//! executing a single child process under a CPU-time and memory ceiling and reporting back exactly
//! how much of each resource the process consumed.
//!
//! The sandbox implements:
//!
//! * Spawning a child process with a single input blob fed on standard input;
//!
//! * Polling resource usage (CPU time, resident set size) of the child until it exits;
//!
//! * Killing the child when it crosses the CPU time or memory ceiling, or when it has been alive
//!   for far longer than the time limit in wall-clock terms (the "dormant child" watchdog);
//!
//! * Draining stdout and stderr concurrently with the sampling loop so that a chatty child cannot
//!   deadlock on a full pipe buffer.
//!

#[macro_use]
extern crate error_chain;
extern crate log;
extern crate nix;
extern crate procfs;

mod daemon;
mod io;
mod misc;

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::process::{Command, Stdio};
use std::time::Duration;

use nix::unistd::Pid;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
        ProcFs(::procfs::ProcError);
    }

    errors {
        /// The executable named in `argv[0]` could not be found or could not be launched.
        SpawnFailed(message: String) {
            description("failed to spawn child process")
            display("{}", message)
        }

        DaemonJoinFailed {
            description("failed to join the sampling thread")
        }
    }
}

/// Measurement of the size of a block of memory.
#[derive(Clone, Copy, Debug, Eq)]
pub enum MemorySize {
    /// Measurement in bytes.
    Bytes(usize),

    /// Measurement in kilobytes.
    KiloBytes(usize),

    /// Measurement in megabytes.
    MegaBytes(usize),
}

impl MemorySize {
    /// Convert the current measurement to memory size in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            MemorySize::Bytes(s) => *s,
            MemorySize::KiloBytes(s) => s * 1024,
            MemorySize::MegaBytes(s) => s * 1024 * 1024,
        }
    }
}

impl PartialEq for MemorySize {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for MemorySize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MemorySize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes().cmp(&other.bytes())
    }
}

impl From<usize> for MemorySize {
    fn from(value: usize) -> MemorySize {
        MemorySize::Bytes(value)
    }
}

impl Display for MemorySize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MemorySize::Bytes(s) => f.write_fmt(format_args!("{} B", s)),
            MemorySize::KiloBytes(s) => f.write_fmt(format_args!("{} KB", s)),
            MemorySize::MegaBytes(s) => f.write_fmt(format_args!("{} MB", s)),
        }
    }
}

/// The result of one sandboxed invocation.
#[derive(Clone, Debug)]
pub struct CompletedRun {
    /// Exit code of the child process. `0` on normal success; nonzero on failure or on kill.
    pub exit_code: i32,

    /// Standard output captured from the child, decoded as UTF-8 (invalid sequences replaced).
    pub stdout: String,

    /// Standard error captured from the child, decoded as UTF-8 (invalid sequences replaced).
    pub stderr: String,

    /// Accumulated user+system CPU time consumed by the child, in seconds.
    pub cpu_time_used: f64,

    /// Peak resident set size observed over the lifetime of the child, in bytes.
    pub memory_used: usize,

    /// Whether the child was killed for exceeding the CPU time limit (including the wall-clock
    /// watchdog fallback).
    pub time_exceeded: bool,

    /// Whether the child was killed for exceeding the memory limit.
    pub memory_exceeded: bool,
}

/// Run `argv` to completion with `stdin_blob` fed on standard input, under the given memory and CPU
/// time limits.
///
/// `argv[0]` is resolved against the ambient `PATH`, matching ordinary shell lookup. Returns
/// `Err(ErrorKind::SpawnFailed)` if the executable cannot be found or launched; any other
/// completion of the child process — correct, wrong, crashed, or killed for a resource violation —
/// is reported as `Ok(CompletedRun)`.
pub fn run(
    argv: &[String],
    stdin_blob: &[u8],
    memory_limit: MemorySize,
    time_limit: Duration,
) -> Result<CompletedRun> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| Error::from(ErrorKind::SpawnFailed("no executable given".to_owned())))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            let message = misc::lowercase_first(&e.to_string());
            Error::from(ErrorKind::SpawnFailed(message))
        })?;

    let pid = Pid::from_raw(child.id() as i32);

    // Drain stdout/stderr concurrently with the sampling loop below so a verbose child cannot
    // block on a full pipe while we are busy polling its resource usage.
    let stdout_pipe = child.stdout.take().expect("stdout was piped");
    let stderr_pipe = child.stderr.take().expect("stderr was piped");
    let drains = io::spawn_drains(stdout_pipe, stderr_pipe);

    // Feed the input blob and close our end of stdin so the child observes EOF.
    {
        use std::io::Write;
        let mut stdin_pipe = child.stdin.take().expect("stdin was piped");
        // A child that never reads its input (or reads only a prefix) will see a broken pipe;
        // that is a legitimate outcome of the judgee under test, not a sandbox failure.
        let _ = stdin_pipe.write_all(stdin_blob);
    }

    let outcome = daemon::supervise(pid, &mut child, memory_limit, time_limit)?;
    let (stdout_bytes, stderr_bytes) = drains.join();

    Ok(CompletedRun {
        exit_code: outcome.exit_code,
        stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        cpu_time_used: outcome.cpu_time_used,
        memory_used: outcome.memory_used,
        time_exceeded: outcome.time_exceeded,
        memory_exceeded: outcome.memory_exceeded,
    })
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, MemorySize};
    use std::time::Duration;

    #[test]
    fn test_memory_size_to_bytes() {
        assert_eq!(2, MemorySize::Bytes(2).bytes());
        assert_eq!(2 * 1024, MemorySize::KiloBytes(2).bytes());
        assert_eq!(2 * 1024 * 1024, MemorySize::MegaBytes(2).bytes());
    }

    #[test]
    fn test_memory_size_ordering() {
        assert!(MemorySize::KiloBytes(1) > MemorySize::Bytes(1000));
        assert_eq!(MemorySize::KiloBytes(1), MemorySize::Bytes(1024));
    }

    fn shell(script: &str) -> Vec<String> {
        vec!["/bin/sh".to_owned(), "-c".to_owned(), script.to_owned()]
    }

    #[test]
    fn test_run_echoes_stdin() {
        let argv = shell("cat");
        let run = super::run(
            &argv,
            b"hello\n",
            MemorySize::MegaBytes(64),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(run.exit_code, 0);
        assert_eq!(run.stdout, "hello\n");
        assert!(!run.time_exceeded);
        assert!(!run.memory_exceeded);
    }

    #[test]
    fn test_run_reports_nonzero_exit() {
        let argv = shell("echo oops 1>&2; exit 7");
        let run = super::run(&argv, b"", MemorySize::MegaBytes(64), Duration::from_secs(5))
            .unwrap();

        assert_eq!(run.exit_code, 7);
        assert_eq!(run.stderr, "oops\n");
        assert!(!run.time_exceeded);
    }

    #[test]
    fn test_run_kills_on_time_limit() {
        let argv = shell("while true; do :; done");
        let run = super::run(
            &argv,
            b"",
            MemorySize::MegaBytes(64),
            Duration::from_millis(200),
        )
        .unwrap();

        assert!(run.time_exceeded);
        assert_ne!(run.exit_code, 0);
    }

    #[test]
    fn test_run_wall_clock_watchdog_catches_sleeping_child() {
        let argv = shell("sleep 30");
        let run = super::run(
            &argv,
            b"",
            MemorySize::MegaBytes(64),
            Duration::from_millis(200),
        )
        .unwrap();

        // `sleep` accrues almost no CPU time, so only the wall-clock watchdog can catch it.
        assert!(run.time_exceeded);
        assert!(run.cpu_time_used < 1.0);
    }

    #[test]
    fn test_run_fails_cleanly_on_missing_executable() {
        let argv = vec!["/no/such/executable-abcxyz".to_owned()];
        let err = super::run(&argv, b"", MemorySize::MegaBytes(64), Duration::from_secs(1))
            .unwrap_err();

        match err.kind() {
            ErrorKind::SpawnFailed(_) => (),
            other => panic!("expected SpawnFailed, got {:?}", other),
        }
    }
}
