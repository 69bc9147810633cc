#![recursion_limit = "1024"]
// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! The bz-notify library
//!
//! This library provides the functionality of a post-commit hook which
//! informs a Bugzilla instance about commits referring to bugs. Bugzilla is
//! addressed through its `email_in.pl` intake script, which accepts plain
//! text emails on its standard input.
//!
//!
//! # Bug references
//!
//! Commit messages may mention bugs, e.g. "fixes bug 123" or "refers #7, #8".
//! The `reference` module extracts those mentions together with the action
//! word preceding them. The action word decides whether the bug's state is
//! changed: "fixes" resolves a bug, "reopens" reopens it. All other mentions
//! merely post the commit summary to the bug.
//!
//! # Notifications
//!
//! For each bug reference, a `Notification` is composed from the commit's
//! summary and list of changed paths. The `Notifier` drives the whole
//! process: it fetches a commit through a `CommitSource`, picks a sender
//! address from the `AuthorDirectory` and hands each notification to a
//! `MailDispatcher`.
//!

#[macro_use] extern crate error_chain;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
extern crate chrono;
extern crate git2;
extern crate regex;

pub mod authors;
pub mod commit;
pub mod error;
pub mod mail;
pub mod message;
pub mod notify;
pub mod process;
pub mod reference;
pub mod vcs;

#[cfg(test)]
mod test_utils;

pub use authors::AuthorDirectory;
pub use commit::CommitRecord;
pub use notify::Notifier;
pub use reference::{BugId, BugReference, Intent};
