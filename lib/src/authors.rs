// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Author directory
//!
//! Notifications are sent in the name of the commit's author. Bugzilla
//! identifies users by their email address, so the author identifiers known
//! to the version control system need to be mapped to addresses. The mapping
//! is read from a plain text file containing one author and one address per
//! line, separated by whitespace:
//!
//! ```ignore
//! alice   alice@example.com
//! bob     bob@example.com
//! ```
//!

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};


/// A line of an author map which could not be parsed
///
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MalformedLine {
    /// Line number, starting at 1
    pub number: usize,
    pub content: String,
}


/// Mapping from author identifiers to email addresses
///
#[derive(Debug, Default)]
pub struct AuthorMap {
    addresses: HashMap<String, String>,
    malformed: Vec<MalformedLine>,
}

impl AuthorMap {
    /// Create an author map from a sequence of lines
    ///
    /// Blank lines are ignored. Lines not consisting of exactly two
    /// whitespace separated tokens are skipped and recorded as malformed. If
    /// an author appears more than once, the first address wins.
    ///
    pub fn from_lines<I, S>(lines: I) -> Self
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let mut map = AuthorMap::default();
        for (index, line) in lines.into_iter().enumerate() {
            map.push_line(index + 1, line.as_ref());
        }
        map
    }

    /// Create an author map from a reader
    ///
    /// Lines which are not valid UTF-8 are recorded as malformed, with their
    /// content decoded lossily. All other lines are treated as by
    /// `from_lines()`.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut map = AuthorMap::default();
        for (index, line) in reader.split(b'\n').enumerate() {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            match String::from_utf8(line) {
                Ok(line) => map.push_line(index + 1, &line),
                Err(err) => map.malformed.push(MalformedLine {
                    number: index + 1,
                    content: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                }),
            }
        }
        Ok(map)
    }

    /// Read an author map from a file
    ///
    pub fn read<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        AuthorMap::from_reader(BufReader::new(File::open(path)?))
    }

    fn push_line(&mut self, number: usize, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            &[] => {},
            &[author, address] => {
                self.addresses
                    .entry(author.to_owned())
                    .or_insert_with(|| address.to_owned());
            },
            _ => self.malformed.push(MalformedLine {
                number: number,
                content: line.to_owned(),
            }),
        }
    }

    /// Get the address of an author
    ///
    pub fn get(&self, author: &str) -> Option<&str> {
        self.addresses.get(author).map(String::as_str)
    }

    /// Get the lines which were skipped because they were malformed
    ///
    pub fn malformed(&self) -> &[MalformedLine] {
        &self.malformed
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}


/// Source of sender addresses
///
/// The directory reads its author map lazily, on the first lookup, and keeps
/// it for its own lifetime. If the map is not available, or an author is not
/// listed, the default address is used.
///
pub struct AuthorDirectory {
    path: Option<PathBuf>,
    default: String,
    map: OnceCell<Option<AuthorMap>>,
}

impl AuthorDirectory {
    /// Create a directory backed by an author map file
    ///
    pub fn new<P, D>(path: P, default: D) -> Self
        where P: Into<PathBuf>,
              D: Into<String>
    {
        AuthorDirectory {
            path: Some(path.into()),
            default: default.into(),
            map: OnceCell::new(),
        }
    }

    /// Create a directory from an author map already in memory
    ///
    pub fn from_map<D: Into<String>>(map: AuthorMap, default: D) -> Self {
        let cell = OnceCell::new();
        cell.set(Some(map)).ok();
        AuthorDirectory {
            path: None,
            default: default.into(),
            map: cell,
        }
    }

    /// Get the default address
    ///
    pub fn default_address(&self) -> &str {
        &self.default
    }

    /// Look up the address of an author
    ///
    /// This function never fails: the default address is returned if the
    /// author is unknown or the author map cannot be read.
    ///
    pub fn lookup(&self, author: &str) -> &str {
        self.map
            .get_or_init(|| self.load())
            .as_ref()
            .and_then(|map| map.get(author))
            .unwrap_or(self.default.as_str())
    }

    fn load(&self) -> Option<AuthorMap> {
        let path = self.path.as_ref()?;
        match AuthorMap::read(path) {
            Ok(map) => {
                for line in map.malformed() {
                    warn!("Skipping malformed line {} of author map '{}': '{}'",
                          line.number, path.display(), line.content);
                }
                if map.is_empty() {
                    warn!("Author map '{}' lists no authors", path.display());
                } else {
                    debug!("Read {} authors from '{}'", map.len(), path.display());
                }
                Some(map)
            },
            Err(err) => {
                warn!("Cannot read author map '{}': {}", path.display(), err);
                None
            },
        }
    }
}
