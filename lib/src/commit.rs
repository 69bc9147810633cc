// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Commit records
//!
//! A `CommitRecord` holds everything we need to know about a single commit in
//! order to compose notifications: its metadata, the log message and the
//! paths it touched.
//!

use error::*;
use error::ErrorKind as EK;


/// Representation of a single commit
///
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommitRecord {
    pub revision: String,
    pub author: String,
    pub date: String,
    pub message: String,
    pub changed: Vec<String>,
}

impl CommitRecord {
    /// Create a commit record without any changed paths
    ///
    pub fn new<R, A, D, M>(revision: R, author: A, date: D, message: M) -> Self
        where R: Into<String>,
              A: Into<String>,
              D: Into<String>,
              M: Into<String>
    {
        CommitRecord {
            revision: revision.into(),
            author: author.into(),
            date: date.into(),
            message: message.into(),
            changed: Vec::new(),
        }
    }

    /// Parse the output of `svnlook info`
    ///
    /// `svnlook info` prints the author, the date and the size of the log
    /// message on one line each, followed by the log message itself. The
    /// author line is empty for commits made without authentication.
    ///
    pub fn from_svnlook_info(revision: &str, info: &str) -> Result<Self> {
        let mut lines = info.splitn(4, '\n');

        let mut next_line = || lines.next()
            .map(|line| line.trim_end_matches('\r'))
            .ok_or_else(|| Error::from_kind(EK::MalformedCommitInfo(revision.to_owned())));
        let author = next_line()?.trim().to_owned();
        let date = next_line()?.to_owned();
        next_line()?; // size of the log message
        let message = lines.next().unwrap_or("").to_owned();

        Ok(CommitRecord::new(revision, author, date, message))
    }

    /// Attach the list of changed paths
    ///
    pub fn with_changed(mut self, changed: Vec<String>) -> Self {
        self.changed = changed;
        self
    }

    /// Get the human readable summary of the commit
    ///
    /// The summary consists of a header line with the revision and the
    /// author, the date and the log message. It is the text bug references
    /// are extracted from.
    ///
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "New Revision: {}     Author: {}\n{}\n\nLog:\n{}",
            self.revision,
            self.author,
            self.date,
            self.message,
        );
        if !summary.ends_with('\n') {
            summary.push('\n');
        }
        summary
    }
}
