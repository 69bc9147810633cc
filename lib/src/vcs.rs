// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

//! Version control backends
//!
//! This module provides the `CommitSource` trait through which commits are
//! retrieved, together with implementations for Subversion (via `svnlook`)
//! and git (via `git2`).
//!

use chrono::{FixedOffset, TimeZone};
use git2::{self, Commit, Delta, Repository};

use commit::CommitRecord;
use process::Program;

use error::*;
use error::ErrorKind as EK;


/// Source of commit information
///
pub trait CommitSource {
    /// Retrieve the metadata and log message of a revision
    ///
    /// The record returned does not contain any changed paths.
    ///
    fn fetch_commit(&self, repo: &str, rev: &str) -> Result<CommitRecord>;

    /// Retrieve the list of paths changed in a revision
    ///
    /// Each item is a line consisting of a status and a path.
    ///
    fn fetch_changed_paths(&self, repo: &str, rev: &str) -> Result<Vec<String>>;
}

impl<S: CommitSource + ?Sized> CommitSource for Box<S> {
    fn fetch_commit(&self, repo: &str, rev: &str) -> Result<CommitRecord> {
        (**self).fetch_commit(repo, rev)
    }

    fn fetch_changed_paths(&self, repo: &str, rev: &str) -> Result<Vec<String>> {
        (**self).fetch_changed_paths(repo, rev)
    }
}


/// Subversion backend
///
/// This backend inspects a repository through the `svnlook` program.
///
pub struct Svnlook(Program);

impl Svnlook {
    pub fn new(program: Program) -> Self {
        Svnlook(program)
    }

    fn look(&self, subcommand: &str, repo: &str, rev: &str) -> Result<String> {
        self.0.run(&[subcommand, repo, "-r", rev], None)
    }
}

impl CommitSource for Svnlook {
    fn fetch_commit(&self, repo: &str, rev: &str) -> Result<CommitRecord> {
        self.look("info", repo, rev)
            .and_then(|info| CommitRecord::from_svnlook_info(rev, &info))
            .chain_err(|| EK::CannotGetCommitForRev(rev.to_owned()))
    }

    fn fetch_changed_paths(&self, repo: &str, rev: &str) -> Result<Vec<String>> {
        let changed = self.look("changed", repo, rev)
            .chain_err(|| EK::CannotGetChanges(rev.to_owned()))?;
        Ok(changed.lines()
                  .map(str::trim_end)
                  .filter(|line| !line.is_empty())
                  .map(String::from)
                  .collect())
    }
}


/// Git backend
///
/// This backend reads commits directly from a repository. The changes of a
/// commit are computed relative to its first parent.
///
pub struct Git;

impl Git {
    fn open(repo: &str) -> Result<Repository> {
        Repository::open(repo).chain_err(|| EK::CannotOpenRepository(repo.to_owned()))
    }

    fn find_commit<'r>(repo: &'r Repository, rev: &str) -> Result<Commit<'r>> {
        repo.revparse_single(rev)
            .and_then(|obj| obj.peel_to_commit())
            .chain_err(|| EK::CannotGetCommitForRev(rev.to_owned()))
    }
}

impl CommitSource for Git {
    fn fetch_commit(&self, repo: &str, rev: &str) -> Result<CommitRecord> {
        let repo = Git::open(repo)?;
        let commit = Git::find_commit(&repo, rev)?;
        let author = commit.author();

        Ok(CommitRecord::new(
            commit.id().to_string(),
            author.name().unwrap_or(""),
            format_time(author.when()),
            commit.message().unwrap_or(""),
        ))
    }

    fn fetch_changed_paths(&self, repo: &str, rev: &str) -> Result<Vec<String>> {
        let repo = Git::open(repo)?;
        let commit = Git::find_commit(&repo, rev)?;

        let diff = commit.tree()
            .and_then(|tree| {
                let parent_tree = match commit.parents().next() {
                    Some(parent) => Some(parent.tree()?),
                    None         => None,
                };
                repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            })
            .chain_err(|| EK::CannotGetChanges(rev.to_owned()))?;

        Ok(diff.deltas()
               .filter_map(|delta| {
                   delta.new_file()
                        .path()
                        .or_else(|| delta.old_file().path())
                        .map(|path| format!("{}   {}", status_letter(delta.status()), path.display()))
               })
               .collect())
    }
}


/// Get the letter commonly used for representing the status of a delta
///
fn status_letter(status: Delta) -> char {
    match status {
        Delta::Added        => 'A',
        Delta::Deleted      => 'D',
        Delta::Modified     => 'M',
        Delta::Renamed      => 'R',
        Delta::Copied       => 'C',
        Delta::Typechange   => 'T',
        _                   => '?',
    }
}


/// Format a git timestamp in the author's timezone
///
fn format_time(time: git2::Time) -> String {
    FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(time.seconds(), 0).single())
        .map(|date| date.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_else(|| time.seconds().to_string())
}




#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{TestingDir, TestingRepo};

    // Svnlook tests

    const FAKE_SVNLOOK: &'static str = r#"
[ "$2" = /srv/repo ] && [ "$3" = -r ] && [ "$4" = 42 ] || exit 2
case "$1" in
    info)    printf 'alice\n2009-06-01 12:00:00 +0200\n13\nfixes bug 12\n' ;;
    changed) printf 'U   trunk/a.c\nA   trunk/b.c\n\n' ;;
    *)       exit 1 ;;
esac
"#;

    fn fake_svnlook(dir: &TestingDir) -> Svnlook {
        let script = dir.write_file("svnlook", FAKE_SVNLOOK);
        Svnlook::new(Program::new("sh").with_arg(script))
    }

    #[cfg(unix)]
    #[test]
    fn svnlook_commit() {
        let dir = TestingDir::new("svnlook_commit");
        let commit = fake_svnlook(&dir)
            .fetch_commit("/srv/repo", "42")
            .expect("Could not fetch commit");
        assert_eq!(commit.revision, "42");
        assert_eq!(commit.author, "alice");
        assert_eq!(commit.date, "2009-06-01 12:00:00 +0200");
        assert_eq!(commit.message, "fixes bug 12\n");
    }

    #[cfg(unix)]
    #[test]
    fn svnlook_changed() {
        let dir = TestingDir::new("svnlook_changed");
        let changed = fake_svnlook(&dir)
            .fetch_changed_paths("/srv/repo", "42")
            .expect("Could not fetch changes");
        assert_eq!(changed, vec!["U   trunk/a.c".to_owned(), "A   trunk/b.c".to_owned()]);
    }

    #[cfg(unix)]
    #[test]
    fn svnlook_failure() {
        let dir = TestingDir::new("svnlook_failure");
        let svnlook = fake_svnlook(&dir);
        assert!(svnlook.fetch_commit("/srv/repo", "43").is_err());
        assert!(svnlook.fetch_changed_paths("/srv/other", "42").is_err());
    }

    // Git tests

    #[test]
    fn git_commits() {
        let mut testing_repo = TestingRepo::new("git_commits");
        let sig = git2::Signature::new("alice", "alice@x.com", &git2::Time::new(1243850400, 120))
            .expect("Could not create signature");
        let first = testing_repo.commit(&sig, "Initial import", &[("a.txt", "a")]);
        let second = testing_repo.commit(&sig, "fixes bug 12\n", &[("a.txt", "aa"), ("b.txt", "b")]);
        let path = testing_repo.path();

        let commit = Git.fetch_commit(&path, &second.to_string()).expect("Could not fetch commit");
        assert_eq!(commit.revision, second.to_string());
        assert_eq!(commit.author, "alice");
        assert_eq!(commit.date, "2009-06-01 12:00:00 +0200");
        assert_eq!(commit.message, "fixes bug 12\n");

        let changed = Git.fetch_changed_paths(&path, "HEAD").expect("Could not fetch changes");
        assert_eq!(changed, vec!["M   a.txt".to_owned(), "A   b.txt".to_owned()]);

        let changed = Git.fetch_changed_paths(&path, &first.to_string()).expect("Could not fetch changes");
        assert_eq!(changed, vec!["A   a.txt".to_owned()]);
    }

    #[test]
    fn git_failures() {
        let testing_repo = TestingRepo::new("git_failures");
        assert!(Git.fetch_commit(&testing_repo.path(), "HEAD").is_err());

        let dir = TestingDir::new("git_failures_norepo");
        let path = dir.path().join("missing").to_string_lossy().into_owned();
        assert!(Git.fetch_commit(&path, "HEAD").is_err());
    }
}
