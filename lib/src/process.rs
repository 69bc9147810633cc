// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! External programs
//!
//! Both the inspection of commits and the delivery of notifications are
//! performed by external programs. This module provides the means for running
//! such a program with a bounded run time.
//!

use std::ffi::{OsStr, OsString};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use error::*;
use error::ErrorKind as EK;


/// Interval in which we check whether a child exited
const POLL_INTERVAL_MS: u64 = 10;


/// An external program
///
/// This type describes how to invoke a program: its path, the arguments
/// always passed to it and the time it is allowed to run.
///
#[derive(Debug, Clone)]
pub struct Program {
    path: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl Program {
    /// Create a program description without a timeout
    ///
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Program {
            path: path.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Add an argument passed to the program before any other argument
    ///
    pub fn with_arg<A: AsRef<OsStr>>(mut self, arg: A) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Set the timeout
    ///
    /// `None` lets the program run indefinitely.
    ///
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the program with additional arguments
    ///
    pub fn run<I, S>(&self, args: I, input: Option<Vec<u8>>) -> Result<String>
        where I: IntoIterator<Item = S>,
              S: AsRef<OsStr>
    {
        let mut command = Command::new(&self.path);
        command.args(&self.args).args(args);
        run(command, input, self.timeout)
    }
}


/// Run a program to completion
///
/// The program is fed the `input` supplied, if any, via its stdin. If a
/// timeout is given and the program does not exit in time, it is killed.
/// The program's stdout is returned if it exits successfully.
///
/// Input and output are transferred on separate threads in order to avoid
/// dead-locks on full pipes. The timeout also bounds the time we wait for
/// those transfers: descendants of the program may keep its pipes open after
/// the program itself exited. Whatever was not transferred until the deadline
/// is discarded and the threads are left to finish on their own.
///
pub fn run(mut command: Command, input: Option<Vec<u8>>, timeout: Option<Duration>) -> Result<String> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!("Running {:?}", command);

    let deadline = timeout.map(|t| Instant::now() + t);
    let stdin = if input.is_some() { Stdio::piped() } else { Stdio::null() };
    let mut child = command
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .chain_err(|| EK::CannotSpawn(program.clone()))?;

    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.unwrap_or_default();
        transfer(move || stdin.write_all(&input))
    });
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = match wait(&mut child, deadline)? {
        Some(status) => status,
        None => {
            child.kill().ok();
            child.wait().ok();
            let seconds = timeout.map(|t| t.as_secs()).unwrap_or_default();
            return Err(Error::from_kind(EK::Timeout(program, seconds)));
        },
    };

    if let Some(result) = writer.and_then(|rx| receive(rx, deadline, &program)) {
        if let Err(err) = result {
            warn!("Could not pass all input to '{}': {}", program, err);
        }
    }
    let stdout = collect(stdout, deadline, &program);
    let stderr = collect(stderr, deadline, &program);

    if !status.success() {
        return Err(Error::from_kind(EK::ChildFailed(program, status.to_string(), stderr.trim().to_owned())));
    }

    Ok(stdout)
}


/// Wait for a child to exit, at most until the deadline given
///
/// Returns `None` if the child did not exit in time.
///
fn wait(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    let deadline = match deadline {
        Some(deadline) => deadline,
        None => return child.wait().map(Some),
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }
}


/// Perform a transfer on a separate thread
///
/// The result is delivered through the channel returned.
///
fn transfer<T, F>(f: F) -> Receiver<io::Result<T>>
    where T: Send + 'static,
          F: FnOnce() -> io::Result<T> + Send + 'static
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || tx.send(f()).ok());
    rx
}


fn drain<R: Read + Send + 'static>(mut reader: R) -> Receiver<io::Result<Vec<u8>>> {
    transfer(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map(|_| buf)
    })
}


/// Receive the result of a transfer, at most until the deadline given
///
fn receive<T>(rx: Receiver<T>, deadline: Option<Instant>, program: &str) -> Option<T> {
    let result = match deadline {
        Some(deadline) => rx
            .recv_timeout(deadline.saturating_duration_since(Instant::now()))
            .map_err(|err| err == RecvTimeoutError::Timeout),
        None => rx.recv().map_err(|_| false),
    };

    match result {
        Ok(value) => Some(value),
        Err(true) => {
            warn!("Pipes of '{}' still open after its exit, discarding them", program);
            None
        },
        Err(false) => None,
    }
}


fn collect(rx: Option<Receiver<io::Result<Vec<u8>>>>, deadline: Option<Instant>, program: &str) -> String {
    rx.and_then(|rx| receive(rx, deadline, program))
      .and_then(|result| result.ok_or_log())
      .map(|buf| String::from_utf8_lossy(&buf).into_owned())
      .unwrap_or_default()
}


/// Helper for discarding read errors after logging them
///
trait RResultExt<T> {
    fn ok_or_log(self) -> Option<T>;
}

impl<T> RResultExt<T> for io::Result<T> {
    fn ok_or_log(self) -> Option<T> {
        self.map_err(|err| warn!("Could not read output of a child: {}", err)).ok()
    }
}
