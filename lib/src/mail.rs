// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Delivery of notifications
//!

use std::io::Write;

use message::Notification;
use process::Program;

use error::*;
use error::ErrorKind as EK;


/// Sink for notifications
///
pub trait MailDispatcher {
    /// Deliver a single notification
    ///
    fn dispatch(&mut self, notification: &Notification) -> Result<()>;
}

impl<D: MailDispatcher + ?Sized> MailDispatcher for Box<D> {
    fn dispatch(&mut self, notification: &Notification) -> Result<()> {
        (**self).dispatch(notification)
    }
}


/// Dispatcher feeding notifications to Bugzilla's `email_in.pl`
///
/// Each notification is passed to a new instance of the intake program via
/// its stdin.
///
pub struct EmailIn(Program);

impl EmailIn {
    pub fn new(program: Program) -> Self {
        EmailIn(program)
    }
}

impl MailDispatcher for EmailIn {
    fn dispatch(&mut self, notification: &Notification) -> Result<()> {
        let no_args: &[&str] = &[];
        self.0
            .run(no_args, Some(notification.to_string().into_bytes()))
            .map(|output| if !output.trim().is_empty() {
                debug!("email_in: {}", output.trim())
            })
            .chain_err(|| EK::DispatchFailed(notification.reference.id.to_string()))
    }
}


/// Dispatcher writing notifications to a stream
///
/// Notifications are separated by blank lines.
///
pub struct WriterDispatcher<W: Write>(W);

impl<W: Write> WriterDispatcher<W> {
    pub fn new(writer: W) -> Self {
        WriterDispatcher(writer)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> MailDispatcher for WriterDispatcher<W> {
    fn dispatch(&mut self, notification: &Notification) -> Result<()> {
        write!(self.0, "{}\n", notification)
            .and_then(|_| self.0.flush())
            .chain_err(|| EK::DispatchFailed(notification.reference.id.to_string()))
    }
}




#[cfg(test)]
mod tests {
    use super::*;
    use commit::CommitRecord;
    use message::Composer;
    use reference::{BugId, BugReference, Intent};
    use std::fs;
    use std::str::FromStr;
    use std::time::Duration;
    use test_utils::TestingDir;

    fn notification() -> Notification {
        let commit = CommitRecord::new("42", "alice", "2009-06-01", "fixes bug 12\n");
        let reference = BugReference::new(Intent::Fixed, BugId::from_str("12").expect("valid id"));
        Composer::new("bugzilla@x.com").compose("alice@x.com", &reference, &commit)
    }

    #[test]
    fn writer() {
        let mut dispatcher = WriterDispatcher::new(Vec::new());
        dispatcher.dispatch(&notification()).expect("Could not dispatch");
        dispatcher.dispatch(&notification()).expect("Could not dispatch");

        let written = String::from_utf8(dispatcher.into_inner()).expect("Invalid UTF-8");
        let single = format!("{}\n", notification());
        assert_eq!(written, format!("{}{}", single, single));
        assert!(written.starts_with("From: alice@x.com\nTo: bugzilla@x.com\nSubject: [Bug 12]\n\n"));
    }

    #[cfg(unix)]
    #[test]
    fn email_in() {
        let dir = TestingDir::new("email_in");
        let target = dir.path().join("mail");
        let program = Program::new("sh")
            .with_arg("-c")
            .with_arg("cat > \"$0\"")
            .with_arg(&target)
            .with_timeout(Some(Duration::from_secs(10)));

        EmailIn::new(program).dispatch(&notification()).expect("Could not dispatch");

        let mail = fs::read_to_string(&target).expect("Could not read mail");
        assert_eq!(mail, notification().to_string());
    }

    #[cfg(unix)]
    #[test]
    fn email_in_failure() {
        let program = Program::new("sh").with_arg("-c").with_arg("cat > /dev/null; exit 1");
        let err = EmailIn::new(program)
            .dispatch(&notification())
            .expect_err("Expected failure");
        match *err.kind() {
            EK::DispatchFailed(ref id) => assert_eq!(id, "12"),
            ref kind => panic!("Unexpected error: {}", kind),
        }
    }
}
