// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Bug reference extraction
//!
//! This module offers types and functionality for finding references to bugs
//! in free-form text such as commit messages. A reference consists of a bug
//! token, e.g. `#123` or `bug 123`, optionally preceded by an action word:
//!
//! ```ignore
//! Frobnicate the widget, fixes bug 12 and bug 13
//!                        ^^^^^ ^^^^^^^^^^^^^^^^^^
//!                        |     # bug tokens
//!                        # action word
//! ```
//!
//! A single action word applies to all bug tokens which follow it, as long as
//! they are separated only by commas, ampersands, whitespace or "and".
//!

use regex::{Captures, Regex};
use std::collections::VecDeque;
use std::fmt;
use std::result::Result as RResult;
use std::str::FromStr;

use error::*;
use error::ErrorKind as EK;


/// Pattern matching the part of a bug token preceding the actual id
const BUG_PREFIX: &'static str = r"(?:#|(?:Bug|Bug:|bug|bug:|BUG|BUG:)[: ]?)";

lazy_static! {
    // regex matching a command phrase: an action word and a list of bug tokens
    static ref COMMAND_RE: Regex = Regex::new(&format!(
        r"(?P<action>[A-Za-z]*).?(?:(?i:to)[ ]+)?(?P<bugs>{p}[0-9]+(?:(?:[, &]*|[ ]?and[ ]?){p}[0-9]+)*)",
        p = BUG_PREFIX
    )).unwrap();

    // regex matching a single bug token, capturing the id
    static ref BUG_RE: Regex = Regex::new(&format!(r"{}([0-9]+)", BUG_PREFIX)).unwrap();
}


/// Intent of a bug reference
///
/// The intent is derived from the action word preceding a bug reference. It
/// determines which state transition, if any, is requested for the bug.
///
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Intent {
    Fixed,
    Refers,
    Reopens,
    None,
}

/// Action words recognized, and the intent each one of them expresses
const ACTIONS: &'static [(&'static str, Intent)] = &[
    ("fix",         Intent::Fixed),
    ("fixed",       Intent::Fixed),
    ("fixes",       Intent::Fixed),
    ("addresses",   Intent::Refers),
    ("re",          Intent::Refers),
    ("references",  Intent::Refers),
    ("refs",        Intent::Refers),
    ("refer",       Intent::Refers),
    ("refers",      Intent::Refers),
    ("reopens",     Intent::Reopens),
    ("reopen",      Intent::Reopens),
];

impl Intent {
    /// Classify an action word
    ///
    /// The lookup is case-insensitive. Words which are not recognized,
    /// including the empty word, yield `Intent::None`.
    ///
    pub fn from_action(word: &str) -> Intent {
        ACTIONS.iter()
               .find(|&&(action, _)| action.eq_ignore_ascii_case(word))
               .map(|&(_, intent)| intent)
               .unwrap_or(Intent::None)
    }

    /// Check whether this intent requests a change of the bug's state
    ///
    pub fn changes_status(&self) -> bool {
        match *self {
            Intent::Fixed | Intent::Reopens => true,
            Intent::Refers | Intent::None   => false,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter) -> RResult<(), fmt::Error> {
        match *self {
            Intent::Fixed   => write!(f, "Fixed"),
            Intent::Refers  => write!(f, "Refers"),
            Intent::Reopens => write!(f, "Reopens"),
            Intent::None    => write!(f, "None"),
        }
    }
}


/// Id of a bug
///
/// A bug id is a non-empty sequence of ASCII digits. It is kept in its
/// textual form, e.g. leading zeros are preserved.
///
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BugId(String);

impl AsRef<str> for BugId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter) -> RResult<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BugId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(BugId(s.to_owned()))
        } else {
            Err(Error::from_kind(EK::MalformedBugId(s.to_owned())))
        }
    }
}


/// Reference to a bug
///
/// A reference combines the id of the bug referred to with the intent
/// expressed by the action word preceding it.
///
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct BugReference {
    pub intent: Intent,
    pub id: BugId,
}

impl BugReference {
    pub fn new(intent: Intent, id: BugId) -> Self {
        BugReference { intent: intent, id: id }
    }
}

impl fmt::Display for BugReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> RResult<(), fmt::Error> {
        write!(f, "{} bug {}", self.intent, self.id)
    }
}


/// Iterator extracting bug references from a text
///
/// The iterator yields the references in the order of their appearance in
/// the text. Each occurrence of a bug token is reported at most once.
/// Cloning the iterator yields an independent iterator starting at the same
/// position.
///
#[derive(Clone)]
pub struct BugReferences<'t> {
    text: &'t str,
    pos: usize,
    buf: VecDeque<BugReference>,
}

impl<'t> BugReferences<'t> {
    /// Create an iterator over the bug references in a text
    ///
    pub fn new(text: &'t str) -> Self {
        BugReferences {
            text: text,
            pos: 0,
            buf: VecDeque::new(),
        }
    }

    /// Queue all references of a single command phrase
    ///
    fn push_command(&mut self, command: &Captures) {
        let intent = command.name("action")
                            .map(|action| Intent::from_action(action.as_str()))
                            .unwrap_or(Intent::None);

        if let Some(bugs) = command.name("bugs") {
            let ids = BUG_RE.captures_iter(bugs.as_str())
                            .filter_map(|c| c.get(1))
                            .filter_map(|id| BugId::from_str(id.as_str()).ok());
            self.buf.extend(ids.map(|id| BugReference::new(intent, id)));
        }
    }
}

impl<'t> Iterator for BugReferences<'t> {
    type Item = BugReference;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(reference) = self.buf.pop_front() {
                return Some(reference);
            }

            if self.pos > self.text.len() {
                return None;
            }

            let command = COMMAND_RE.captures_at(self.text, self.pos)?;

            // a command always contains at least one bug token, hence the
            // match is never empty and we always make progress
            self.pos = command.get(0).map(|m| m.end()).unwrap_or(self.text.len() + 1);
            self.push_command(&command);
        }
    }
}


/// Extension trait for extracting bug references from text
///
pub trait BugReferencesExt {
    /// Get an iterator over all bug references in the text
    ///
    fn bug_references(&self) -> BugReferences;
}

impl BugReferencesExt for str {
    fn bug_references(&self) -> BugReferences {
        BugReferences::new(self)
    }
}
