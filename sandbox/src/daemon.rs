//! Implements the sampling loop that supervises one spawned child: polling its resource usage,
//! killing it on a limit violation, and reaping its final exit status.
//!

use std::os::unix::process::ExitStatusExt;
use std::process::Child;
use std::time::{Duration, Instant};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use procfs::process::Process;

use super::{MemorySize, Result};

/// Interval between consecutive resource-usage samples. Tight enough that typical sub-second test
/// cases yield non-zero CPU readings.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Additive slack added to the time limit before the wall-clock watchdog fires on a dormant child.
const WALL_CLOCK_ADDITIVE_SLACK: Duration = Duration::from_secs(1);

/// Multiplicative slack applied to the time limit for the same purpose.
const WALL_CLOCK_MULTIPLICATIVE_SLACK: f64 = 1.1;

/// Resource usage and termination outcome of a supervised child process.
pub struct Outcome {
    pub exit_code: i32,
    pub cpu_time_used: f64,
    pub memory_used: usize,
    pub time_exceeded: bool,
    pub memory_exceeded: bool,
}

/// Poll `pid` until it exits, enforcing `memory_limit` and `time_limit`. `child` is used only to
/// reap the final exit status once the process has stopped running.
pub fn supervise(
    pid: Pid,
    child: &mut Child,
    memory_limit: MemorySize,
    time_limit: Duration,
) -> Result<Outcome> {
    let wall_clock_budget = Duration::from_secs_f64(
        (time_limit.as_secs_f64() * WALL_CLOCK_MULTIPLICATIVE_SLACK)
            .max((time_limit + WALL_CLOCK_ADDITIVE_SLACK).as_secs_f64()),
    );

    let spawned_at = Instant::now();
    let mut cpu_time_used = 0.0_f64;
    let mut memory_used = 0_usize;
    let mut time_exceeded = false;
    let mut memory_exceeded = false;

    loop {
        match sample(pid) {
            Some((cpu_time, rss)) => {
                cpu_time_used = cpu_time_used.max(cpu_time);
                memory_used = memory_used.max(rss);
            }
            None => {
                // The process has already disappeared between our liveness check and the sample
                // read. Fall through to `try_wait` below, which will observe the exit.
                log::trace!("sandbox: pid {} vanished before sampling", pid);
            }
        }

        if let Some(status) = child.try_wait()? {
            return Ok(reap(
                status,
                cpu_time_used,
                memory_used,
                time_exceeded,
                memory_exceeded,
                time_limit,
                memory_limit,
            ));
        }

        let mut killed = false;
        if cpu_time_used > time_limit.as_secs_f64() {
            log::trace!("sandbox: pid {} exceeded cpu time limit", pid);
            time_exceeded = true;
            killed = true;
        } else if memory_used > memory_limit.bytes() {
            log::trace!("sandbox: pid {} exceeded memory limit", pid);
            memory_exceeded = true;
            killed = true;
        } else if spawned_at.elapsed() > wall_clock_budget {
            log::trace!("sandbox: pid {} exceeded wall clock watchdog", pid);
            time_exceeded = true;
            killed = true;
        }

        if killed {
            // Ungraceful termination is correct here: the judgee gets no opportunity to catch the
            // signal and linger.
            let _ = kill(pid, Signal::SIGKILL);
            let status = child.wait()?;
            return Ok(reap(
                status,
                cpu_time_used,
                memory_used,
                time_exceeded,
                memory_exceeded,
                time_limit,
                memory_limit,
            ));
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Read the current CPU time (seconds) and resident set size (bytes) of `pid`. Returns `None` if
/// the process has already exited.
fn sample(pid: Pid) -> Option<(f64, usize)> {
    let process = Process::new(pid.as_raw()).ok()?;
    let stat = process.stat().ok()?;

    let ticks_per_sec = procfs::ticks_per_second().unwrap_or(100) as f64;
    let cpu_time = (stat.utime + stat.stime) as f64 / ticks_per_sec;

    let page_size = procfs::page_size().unwrap_or(4096) as usize;
    let rss_bytes = (stat.rss as usize).saturating_mul(page_size);

    Some((cpu_time, rss_bytes))
}

fn reap(
    status: std::process::ExitStatus,
    cpu_time_used: f64,
    memory_used: usize,
    time_exceeded: bool,
    memory_exceeded: bool,
    time_limit: Duration,
    memory_limit: MemorySize,
) -> Outcome {
    let exit_code = match status.code() {
        Some(code) => code,
        // Killed by a signal (SIGKILL from us, or otherwise): report a nonzero code so callers
        // never mistake a kill for success.
        None => 128 + status.signal().unwrap_or(9),
    };

    // The loop samples then immediately checks `try_wait` before its own limit check, so a child
    // that exits on its own in the same poll window as a violating sample would otherwise be
    // reaped with the flag still unset. Recompute here so the final usage numbers are always
    // consistent with the final verdict, regardless of which path reaped the child.
    let time_exceeded = time_exceeded || cpu_time_used > time_limit.as_secs_f64();
    let memory_exceeded = memory_exceeded || memory_used > memory_limit.bytes();

    Outcome {
        exit_code,
        cpu_time_used,
        memory_used,
        time_exceeded,
        memory_exceeded,
    }
}
