// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Testing utils
//!
//! This module provides some utility functionality exclusively for testing
//! purposes.
//!

use git2::{self, Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};

use commit::CommitRecord;
use mail::MailDispatcher;
use message::Notification;
use vcs::CommitSource;

use error::*;
use error::ErrorKind as EK;


/// Testing directory
///
/// This type provides a (temporary) scratch directory.
///
pub struct TestingDir {
    path: PathBuf,
}

impl TestingDir {
    /// Create a named, empty testing directory
    ///
    pub fn new(name: &str) -> Self {
        // assemble path
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        assert!(path.is_dir());
        path.push("test");
        path.push(name);

        fs::remove_dir_all(&path).ok();
        fs::create_dir_all(&path).expect("Could not create testing directory");
        TestingDir { path: path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a file into the directory, returning its path
    ///
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path.join(name);
        fs::write(&path, content).expect("Could not write file");
        path
    }
}


/// Testing repository
///
/// This type provides a (temporary) git repository with a working tree.
///
pub struct TestingRepo {
    dir: TestingDir,
    repo: Repository,
}

impl TestingRepo {
    /// Create a named testing repository
    ///
    pub fn new(name: &str) -> Self {
        let dir = TestingDir::new(name);
        let repo = Repository::init(dir.path()).expect("Could not open/init repository");
        TestingRepo { dir: dir, repo: repo }
    }

    /// Get the path of the repository
    ///
    pub fn path(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Write files and commit them on top of HEAD
    ///
    pub fn commit(&mut self, sig: &Signature, message: &str, files: &[(&str, &str)]) -> Oid {
        let mut index = self.repo.index().expect("Could not get index");
        for &(name, content) in files {
            self.dir.write_file(name, content);
            index.add_path(Path::new(name)).expect("Could not add file");
        }
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let parent = self.repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), sig, sig, message, &tree, &parents)
            .expect("Could not create commit")
    }
}


/// Commit source serving a single, fixed commit
///
pub struct FakeSource {
    pub commit: CommitRecord,
    pub changed: Option<Vec<String>>,
}

impl CommitSource for FakeSource {
    fn fetch_commit(&self, _: &str, rev: &str) -> Result<CommitRecord> {
        if rev == self.commit.revision {
            Ok(self.commit.clone())
        } else {
            Err(Error::from_kind(EK::CannotGetCommitForRev(rev.to_owned())))
        }
    }

    fn fetch_changed_paths(&self, _: &str, rev: &str) -> Result<Vec<String>> {
        self.changed
            .clone()
            .ok_or_else(|| Error::from_kind(EK::CannotGetChanges(rev.to_owned())))
    }
}


/// Dispatcher recording all notifications
///
/// Notifications for bugs listed in `failing` are rejected.
///
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Vec<Notification>,
    pub failing: Vec<String>,
}

impl MailDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, notification: &Notification) -> Result<()> {
        let id = notification.reference.id.to_string();
        if self.failing.contains(&id) {
            return Err(Error::from_kind(EK::DispatchFailed(id)));
        }
        self.sent.push(notification.clone());
        Ok(())
    }
}
