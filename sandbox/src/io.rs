//! Concurrent draining of a child's stdout and stderr pipes.
//!
//! A child that writes more than one pipe buffer's worth of output before being read would
//! deadlock against our own sampling loop if we read the two streams sequentially after the child
//! exits. Instead each stream is drained on its own thread as soon as the child is spawned.
//!

use std::io::Read;
use std::process::{ChildStderr, ChildStdout};
use std::thread::JoinHandle;

/// Handles to the background threads draining a child's stdout and stderr.
pub struct Drains {
    stdout: JoinHandle<Vec<u8>>,
    stderr: JoinHandle<Vec<u8>>,
}

impl Drains {
    /// Block until both streams have been fully drained, returning `(stdout, stderr)`.
    pub fn join(self) -> (Vec<u8>, Vec<u8>) {
        let stdout = self.stdout.join().unwrap_or_default();
        let stderr = self.stderr.join().unwrap_or_default();
        (stdout, stderr)
    }
}

/// Spawn the two drain threads for a freshly spawned child.
pub fn spawn_drains(mut stdout: ChildStdout, mut stderr: ChildStderr) -> Drains {
    let stdout = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf);
        buf
    });
    let stderr = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        buf
    });

    Drains { stdout, stderr }
}
