// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Notification of commits
//!
//! This module ties together the retrieval of a commit, the extraction of bug
//! references from its summary and the delivery of one notification per
//! reference.
//!

use authors::AuthorDirectory;
use mail::MailDispatcher;
use message::Composer;
use reference::{BugId, BugReference, BugReferencesExt};
use vcs::CommitSource;

use error::*;


/// Outcome of the notification for a single commit
///
#[derive(Debug, Default)]
pub struct Report {
    /// Number of notifications delivered
    pub sent: usize,
    /// Bugs for which the delivery failed
    pub failed: Vec<(BugId, Error)>,
}

impl Report {
    /// Check whether all notifications were delivered
    ///
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}


/// Notifier for commits
///
pub struct Notifier<S, D>
    where S: CommitSource,
          D: MailDispatcher
{
    source: S,
    dispatcher: D,
    authors: AuthorDirectory,
    composer: Composer,
}

impl<S, D> Notifier<S, D>
    where S: CommitSource,
          D: MailDispatcher
{
    pub fn new(source: S, dispatcher: D, authors: AuthorDirectory, composer: Composer) -> Self {
        Notifier {
            source: source,
            dispatcher: dispatcher,
            authors: authors,
            composer: composer,
        }
    }

    /// Notify the bug tracker about a commit
    ///
    /// One notification is dispatched for each bug reference found in the
    /// commit, in order of appearance. A failure to dispatch a notification
    /// is logged and recorded in the report, but does not prevent the
    /// dispatch of the remaining ones. Failing to retrieve the commit is an
    /// error.
    ///
    pub fn notify(&mut self, repo: &str, rev: &str) -> Result<Report> {
        let commit = self.source.fetch_commit(repo, rev)?;
        let summary = commit.summary();

        let references: Vec<BugReference> = summary.bug_references().collect();
        if references.is_empty() {
            debug!("No bug references in revision {}", rev);
            return Ok(Report::default());
        }

        let commit = commit.with_changed(self.source.fetch_changed_paths(repo, rev)?);
        let from = self.authors.lookup(&commit.author);
        debug!("Sending notifications for revision {} as {}", rev, from);

        let mut report = Report::default();
        for reference in references {
            debug!("Found reference: {}", reference);
            if reference.intent.changes_status() {
                debug!("Requesting status change of bug {}", reference.id);
            }
            let notification = self.composer.compose(from, &reference, &commit);

            match self.dispatcher.dispatch(&notification) {
                Ok(_) => {
                    info!("Notified bug {} ({})", reference.id, reference.intent);
                    report.sent += 1;
                },
                Err(err) => {
                    for (n, cause) in err.iter().enumerate() {
                        if n == 0 {
                            error!("{}", cause);
                        } else {
                            error!("caused by: {}", cause);
                        }
                    }
                    report.failed.push((reference.id, err));
                },
            }
        }

        Ok(report)
    }

    /// Get the dispatcher back
    ///
    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }
}
