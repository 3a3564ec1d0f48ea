// SPDX-License-Identifier: Apache-2.0
//! The [`WorkerProcess`] abstraction [`crate::master::Master`] drives: spawn, feed the fault
//! set, read progress messages, and observe how the process ended. [`OsWorkerProcess`] is the
//! real `std::process::Command`-backed implementation; tests drive [`crate::master::Master`]
//! against an in-memory fake instead of forking anything.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use crate::message::WorkerMessage;

/// How a worker subprocess's lifetime ended, independent of the platform's raw exit-status
/// encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
 /// Exit code `0`.
 Clean,
 /// Exit code `2`: a controlled exit after the worker's own signal handler ran.
 Controlled,
 /// Any other exit code, or termination by an uncaught signal.
 Abnormal,
}

/// What [`WorkerProcess::poll`] observed since the last call.
#[derive(Debug)]
pub enum PollOutcome {
 /// A message arrived on the worker's stdout pipe.
 Message(WorkerMessage),
 /// The message didn't parse; logged and otherwise ignored by the caller.
 Garbled(String),
 /// Nothing arrived before the poll deadline, and the process is still running.
 Idle,
 /// The process has exited.
 Exited(WorkerExit),
}

/// Everything [`crate::master::Master`] needs from a worker subprocess.
pub trait WorkerProcess: Send {
 /// Writes the fault-set startup payload to the worker's stdin and closes it, per spec.md
 /// §4.7's "input pipe, used once at startup".
 fn send_fault_set(&mut self, payload: &str) -> std::io::Result<()>;

 /// Waits up to `timeout` for the next event: a parsed message, a garbled line, or process
 /// exit. Returns [`PollOutcome::Idle`] on timeout while the process is still alive.
 fn poll(&mut self, timeout: Duration) -> PollOutcome;

 /// Sends a termination signal (or forcibly kills, on platforms without one) to the worker.
 fn terminate(&mut self);
}

/// A real worker subprocess, spawned via [`std::process::Command`].
pub struct OsWorkerProcess {
 child: Child,
 stdin: Option<std::process::ChildStdin>,
 lines: mpsc::Receiver<String>,
 exited: bool,
}

impl OsWorkerProcess {
 /// Spawns `binary` with `args`, wiring stdin/stdout as pipes and starting a background
 /// thread that forwards stdout lines to an internal channel.
 ///
 /// # Errors
 ///
 /// Returns any [`std::io::Error`] the OS reports spawning the process.
 pub fn spawn(binary: &PathBuf, args: &[String]) -> std::io::Result<Self> {
 let mut child = Command::new(binary)
.args(args)
.stdin(Stdio::piped())
.stdout(Stdio::piped())
.spawn()?;

 let stdin = child.stdin.take();
 let stdout = child.stdout.take().expect("stdout was piped");
 let (tx, rx) = mpsc::channel();
 std::thread::spawn(move || {
 let reader = BufReader::new(stdout);
 for line in reader.lines().map_while(Result::ok) {
 if tx.send(line).is_err() {
 break;
 }
 }
 });

 Ok(Self {
 child,
 stdin,
 lines: rx,
 exited: false,
 })
 }
}

impl WorkerProcess for OsWorkerProcess {
 fn send_fault_set(&mut self, payload: &str) -> std::io::Result<()> {
 if let Some(mut stdin) = self.stdin.take() {
 stdin.write_all(payload.as_bytes())?;
 }
 Ok(())
 }

 fn poll(&mut self, timeout: Duration) -> PollOutcome {
 if self.exited {
 return PollOutcome::Idle;
 }
 match self.lines.recv_timeout(timeout) {
 Ok(line) => match WorkerMessage::parse(&line) {
 Ok(message) => PollOutcome::Message(message),
 Err(_) => PollOutcome::Garbled(line),
 },
 Err(mpsc::RecvTimeoutError::Timeout) => match self.child.try_wait() {
 Ok(Some(status)) => {
 self.exited = true;
 PollOutcome::Exited(classify_exit(status.code()))
 }
 _ => PollOutcome::Idle,
 },
 Err(mpsc::RecvTimeoutError::Disconnected) => match self.child.wait() {
 Ok(status) => {
 self.exited = true;
 PollOutcome::Exited(classify_exit(status.code()))
 }
 Err(_) => {
 self.exited = true;
 PollOutcome::Exited(WorkerExit::Abnormal)
 }
 },
 }
 }

 fn terminate(&mut self) {
 let _ = self.child.kill();
 let _ = self.child.wait();
 self.exited = true;
 }
}

fn classify_exit(code: Option<i32>) -> WorkerExit {
 match code {
 Some(0) => WorkerExit::Clean,
 Some(2) => WorkerExit::Controlled,
 _ => WorkerExit::Abnormal,
 }
}
