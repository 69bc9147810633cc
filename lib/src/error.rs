// bz-notify - relay commit bug references to Bugzilla
// Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
// Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

error_chain! {
    foreign_links {
        IoError(::std::io::Error);
        GitError(::git2::Error);
    }

    errors {
        CannotSpawn(program: String) {
            description("Cannot spawn an external program")
            display("Cannot spawn '{}'", program)
        }

        ChildFailed(program: String, status: String, stderr: String) {
            description("An external program exited unsuccessfully")
            display("'{}' exited with {}: {}", program, status, stderr)
        }

        Timeout(program: String, seconds: u64) {
            description("An external program timed out")
            display("'{}' did not finish within {} seconds", program, seconds)
        }

        MalformedCommitInfo(rev: String) {
            description("Malformed commit information")
            display("Malformed commit information for revision '{}'", rev)
        }

        CannotOpenRepository(path: String) {
            description("Cannot open repository")
            display("Cannot open repository '{}'", path)
        }

        CannotGetCommitForRev(rev: String) {
            description("Cannot get commit from rev")
            display("Cannot get commit from rev '{}'", rev)
        }

        CannotGetChanges(rev: String) {
            description("Cannot get the changes of a commit")
            display("Cannot get the changed paths of rev '{}'", rev)
        }

        MalformedBugId(id: String) {
            description("Malformed bug id")
            display("Malformed bug id: '{}'", id)
        }

        DispatchFailed(bug: String) {
            description("Cannot dispatch a notification")
            display("Cannot dispatch the notification for bug {}", bug)
        }
    }
}
