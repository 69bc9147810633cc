// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Notification messages
//!
//! This module provides the composition of the plain text emails understood
//! by Bugzilla's `email_in.pl`. Such an email carries the bug id in its
//! subject line. Its body may start with a block of directives changing
//! fields of the bug, e.g.:
//!
//! ```ignore
//! From: alice@example.com
//! To: bugzilla@example.com
//! Subject: [Bug 12]
//!
//! @bug_status = RESOLVED
//! @resolution = FIXED
//!
//! New Revision: 42     Author: alice
//! ...
//! ```
//!

use regex::Regex;
use std::fmt;
use std::result::Result as RResult;
use std::str::FromStr;

use commit::CommitRecord;
use reference::{BugReference, Intent};


/// Get the block of directives requesting the state transition for an intent
///
/// Intents which do not change the state of a bug yield an empty block.
///
pub fn status_directives(intent: Intent) -> &'static str {
    match intent {
        Intent::Fixed   => "@bug_status = RESOLVED\n@resolution = FIXED\n\n",
        Intent::Reopens => "@bug_status = REOPENED\n\n",
        Intent::Refers  => "",
        Intent::None    => "",
    }
}


/// A single `@field = value` directive
///
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Directive {
    pub field: String,
    pub value: String,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> RResult<(), fmt::Error> {
        write!(f, "@{} = {}", self.field, self.value)
    }
}

impl FromStr for Directive {
    type Err = ();

    fn from_str(s: &str) -> RResult<Self, Self::Err> {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^@([[:alnum:]_]+)\s*=\s*(.*)$").unwrap();
        }

        match RE.captures(s.trim_end()).map(|c| (c.get(1), c.get(2))) {
            Some((Some(field), Some(value))) => Ok(Directive {
                field: field.as_str().to_owned(),
                value: value.as_str().trim().to_owned(),
            }),
            _ => Err(()),
        }
    }
}


/// A composed notification
///
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub reference: BugReference,
    pub body: String,
}

impl Notification {
    /// Get the subject line of the notification
    ///
    pub fn subject(&self) -> String {
        format!("[Bug {}]", self.reference.id)
    }

    /// Get the directives at the beginning of the body
    ///
    pub fn directives(&self) -> Vec<Directive> {
        self.body
            .lines()
            .map_while(|line| Directive::from_str(line).ok())
            .collect()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> RResult<(), fmt::Error> {
        write!(f, "From: {}\nTo: {}\nSubject: {}\n\n{}", self.from, self.to, self.subject(), self.body)
    }
}


/// Composer for notifications
///
/// A composer holds the settings common to all notifications.
///
#[derive(Debug, Clone)]
pub struct Composer {
    to: String,
    view_url: Option<String>,
}

impl Composer {
    /// Create a composer for notifications sent to the given address
    ///
    pub fn new<T: Into<String>>(to: T) -> Self {
        Composer {
            to: to.into(),
            view_url: None,
        }
    }

    /// Append a link to the patch to every notification
    ///
    /// The link is formed by appending the revision and its predecessor as
    /// `&rev=<rev>&oldrev=<rev - 1>` to the URL. It is only added for numeric
    /// revisions.
    ///
    pub fn with_view_url<U: Into<String>>(mut self, url: U) -> Self {
        self.view_url = Some(url.into());
        self
    }

    /// Compose the notification for a single bug reference
    ///
    pub fn compose(&self, from: &str, reference: &BugReference, commit: &CommitRecord) -> Notification {
        let mut body = String::from(status_directives(reference.intent));
        body.push_str(&commit.summary());

        body.push_str("\nChanges:\n");
        for path in commit.changed.iter() {
            body.push_str(path);
            body.push('\n');
        }

        if let Some(link) = self.patch_link(&commit.revision) {
            body.push_str("Patch:\n");
            body.push_str(&link);
            body.push('\n');
        }

        Notification {
            from: from.to_owned(),
            to: self.to.clone(),
            reference: reference.clone(),
            body: body,
        }
    }

    fn patch_link(&self, revision: &str) -> Option<String> {
        let url = self.view_url.as_ref()?;
        let rev = u64::from_str(revision).ok().filter(|rev| *rev > 0)?;
        Some(format!("{}&rev={}&oldrev={}", url, rev, rev - 1))
    }
}
