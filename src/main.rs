//   bz-notify - relay commit bug references to Bugzilla
//   Copyright (C) 2016 Matthias Beyer <mail@beyermatthias.de>
//   Copyright (C) 2016 Julian Ganz <neither@nut.email>
//
//   This program is free software; you can redistribute it and/or modify
//   it under the terms of the GNU General Public License version 2 as
//   published by the Free Software Foundation.
//

#[macro_use] extern crate log;
#[macro_use] extern crate clap;
#[macro_use] extern crate error_chain;
extern crate libbznotify;

mod config;
mod error;
mod system;

use clap::App;
use std::io;

use libbznotify::AuthorDirectory;
use libbznotify::Notifier;
use libbznotify::mail::{EmailIn, MailDispatcher, WriterDispatcher};
use libbznotify::process::Program;
use libbznotify::vcs::{CommitSource, Git, Svnlook};

use config::{Backend, Config};
use error::ErrorKind as EK;
use error::*;
use system::abort::Abortable;
use system::logger::Logger;


/// Create the commit source for the configured version control system
///
fn commit_source(config: &Config) -> Box<dyn CommitSource> {
    match config.backend {
        Backend::Svn => {
            let program = Program::new(config.svnlook.clone()).with_timeout(config.timeout);
            Box::new(Svnlook::new(program))
        },
        Backend::Git => Box::new(Git),
    }
}


/// Create the dispatcher delivering notifications
///
fn dispatcher(config: &Config) -> Box<dyn MailDispatcher> {
    if config.dry_run {
        Box::new(WriterDispatcher::new(io::stdout()))
    } else {
        let program = Program::new(config.email_in.clone()).with_timeout(config.timeout);
        Box::new(EmailIn::new(program))
    }
}


/// Notify the bug tracker about a single revision
///
fn notify(config: &Config, repo: &str, rev: &str) -> Result<()> {
    let authors = AuthorDirectory::new(config.authormap.clone(), config.from.as_str());
    let mut notifier = Notifier::new(commit_source(config), dispatcher(config), authors, config.composer());

    let report = notifier.notify(repo, rev)?;
    if !report.is_success() {
        return Err(Error::from_kind(EK::UndeliveredNotifications(report.failed.len())));
    }
    Ok(())
}


fn main() {
    let yaml    = load_yaml!("cli.yaml");
    let matches = App::from_yaml(yaml).get_matches();

    let level = Logger::level(matches.occurrences_of("verbose"), matches.is_present("quiet"));
    Logger::init(level).unwrap_or_else(|err| eprintln!("bz-notify: {}", err));

    let config = Config::from_matches(&matches).unwrap_or_abort();

    // note: both are always present since they are required parameters
    let repo = matches.value_of("repository").unwrap();
    let rev  = matches.value_of("revision").unwrap();

    notify(&config, repo, rev).unwrap_or_abort();
}
