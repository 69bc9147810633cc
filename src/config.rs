//   bz-notify - relay commit bug references to Bugzilla
//   Copyright (C) 2017 Matthias Beyer <mail@beyermatthias.de>
//   Copyright (C) 2017 Julian Ganz <neither@nut.email>
//
//   This program is free software; you can redistribute it and/or modify
//   it under the terms of the GNU General Public License version 2 as
//   published by the Free Software Foundation.
//

use clap::ArgMatches;
use std::env::var as env_var;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use libbznotify::message::Composer;

use error::*;
use error::ErrorKind as EK;


const DEFAULT_ADDRESS: &'static str = "bugzilla@localhost";
const DEFAULT_AUTHORMAP: &'static str = "authormap";
const DEFAULT_SVNLOOK: &'static str = "/usr/bin/svnlook";
const DEFAULT_EMAIL_IN: &'static str = "/var/www/html/bugzilla/email_in.pl";
const DEFAULT_TIMEOUT_SECS: u64 = 30;


/// Version control system hosting the repository
///
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Backend {
    Svn,
    Git,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "svn" => Ok(Backend::Svn),
            "git" => Ok(Backend::Git),
            _     => Err(Error::from_kind(EK::InvalidBackend(s.to_owned()))),
        }
    }
}


/// Settings of a single run
///
#[derive(Debug, Clone)]
pub struct Config {
    pub to: String,
    pub from: String,
    pub authormap: PathBuf,
    pub svnlook: PathBuf,
    pub email_in: PathBuf,
    pub view_url: Option<String>,
    pub timeout: Option<Duration>,
    pub backend: Backend,
    pub dry_run: bool,
}

impl Config {
    /// Assemble the configuration
    ///
    /// Each setting is taken from the command line if present, from the
    /// environment otherwise and falls back to a built-in default.
    ///
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let timeout = match setting(matches, "timeout", "BZ_NOTIFY_TIMEOUT") {
            Some(value) => u64::from_str(value.trim())
                .chain_err(|| EK::InvalidTimeout(value.clone()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            to: setting(matches, "to", "BZ_NOTIFY_TO")
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned()),
            from: setting(matches, "from", "BZ_NOTIFY_FROM")
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned()),
            authormap: setting(matches, "authormap", "BZ_NOTIFY_AUTHORMAP")
                .unwrap_or_else(|| DEFAULT_AUTHORMAP.to_owned())
                .into(),
            svnlook: setting(matches, "svnlook", "BZ_NOTIFY_SVNLOOK")
                .unwrap_or_else(|| DEFAULT_SVNLOOK.to_owned())
                .into(),
            email_in: setting(matches, "email-in", "BZ_NOTIFY_EMAIL_IN")
                .unwrap_or_else(|| DEFAULT_EMAIL_IN.to_owned())
                .into(),
            view_url: setting(matches, "view-url", "BZ_NOTIFY_VIEW_URL"),
            timeout: Some(timeout).filter(|secs| *secs > 0).map(Duration::from_secs),
            backend: Backend::from_str(matches.value_of("vcs").unwrap_or("svn"))?,
            dry_run: matches.is_present("dry-run"),
        })
    }

    /// Create the composer for notifications
    ///
    pub fn composer(&self) -> Composer {
        let composer = Composer::new(self.to.as_str());
        match self.view_url {
            Some(ref url) => composer.with_view_url(url.as_str()),
            None          => composer,
        }
    }
}


/// Get a setting from the command line or the environment
///
fn setting(matches: &ArgMatches, name: &str, var: &str) -> Option<String> {
    matches.value_of(name)
           .map(String::from)
           .or_else(|| env_var(var).ok())
           .filter(|value| !value.is_empty())
}




#[cfg(test)]
mod tests {
    use super::*;
    use clap::App;

    fn config(args: Vec<&str>) -> Result<Config> {
        let yaml = load_yaml!("cli.yaml");
        let matches = App::from_yaml(yaml)
            .get_matches_from_safe(args)
            .expect("Could not parse arguments");
        Config::from_matches(&matches)
    }

    #[test]
    fn options() {
        let config = config(vec![
            "bz-notify",
            "--to", "bugs@x.com",
            "--from", "svn@x.com",
            "--authormap", "/etc/authors",
            "--svnlook", "/opt/svnlook",
            "--email-in", "/opt/email_in.pl",
            "--view-url", "http://x.com/view",
            "--timeout", "5",
            "--vcs", "git",
            "--dry-run",
            "/srv/repo", "42",
        ]).expect("Could not assemble config");

        assert_eq!(config.to, "bugs@x.com");
        assert_eq!(config.from, "svn@x.com");
        assert_eq!(config.authormap, PathBuf::from("/etc/authors"));
        assert_eq!(config.svnlook, PathBuf::from("/opt/svnlook"));
        assert_eq!(config.email_in, PathBuf::from("/opt/email_in.pl"));
        assert_eq!(config.view_url, Some("http://x.com/view".to_owned()));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.backend, Backend::Git);
        assert!(config.dry_run);
    }

    #[test]
    fn disabled_timeout() {
        let config = config(vec!["bz-notify", "--timeout", "0", "/srv/repo", "42"])
            .expect("Could not assemble config");
        assert_eq!(config.timeout, None);
        assert_eq!(config.backend, Backend::Svn);
        assert!(!config.dry_run);
    }

    #[test]
    fn invalid_timeout() {
        assert!(config(vec!["bz-notify", "--timeout", "soon", "/srv/repo", "42"]).is_err());
    }

    #[test]
    fn argument_count() {
        let yaml = load_yaml!("cli.yaml");
        assert!(App::from_yaml(yaml).get_matches_from_safe(vec!["bz-notify", "/srv/repo"]).is_err());
        let yaml = load_yaml!("cli.yaml");
        assert!(App::from_yaml(yaml).get_matches_from_safe(vec!["bz-notify", "a", "b", "c"]).is_err());
    }

    #[test]
    fn backends() {
        assert_eq!(Backend::from_str("svn").expect("valid backend"), Backend::Svn);
        assert_eq!(Backend::from_str("git").expect("valid backend"), Backend::Git);
        assert!(Backend::from_str("cvs").is_err());
    }
}
