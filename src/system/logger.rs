//   bz-notify - relay commit bug references to Bugzilla
//   Copyright (C) 2016, 2017 Matthias Beyer <mail@beyermatthias.de>
//   Copyright (C) 2016, 2017 Julian Ganz <neither@nut.email>
//
//   This program is free software; you can redistribute it and/or modify
//   it under the terms of the GNU General Public License version 2 as
//   published by the Free Software Foundation.
//

use log;
use std::io::{stderr, Write};
use std::result::Result as RResult;


/// Basic logger
///
/// This logger will log to stderr. Since our output usually ends up in front
/// of whoever committed, each line is prefixed with the program's name and,
/// for anything but informational messages, the level.
///
pub struct Logger;

impl Logger {
    /// Initialize the basic logger
    ///
    /// Instantiate a basic logger and make it the main logger.
    ///
    pub fn init(level: log::Level) -> RResult<(), log::SetLoggerError> {
        log::set_logger(&Logger)?;
        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    /// Determine the log level from the number of `-v` and `-q` flags
    ///
    pub fn level(verbosity: u64, quiet: bool) -> log::Level {
        if quiet {
            return log::Level::Error;
        }
        match verbosity {
            0 => log::Level::Warn,
            1 => log::Level::Info,
            2 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let result = match record.level() {
            log::Level::Info => writeln!(stderr(), "bz-notify: {}", record.args()),
            level => writeln!(stderr(), "bz-notify: {}: {}", level.to_string().to_lowercase(), record.args()),
        };
        result.ok();
    }

    fn flush(&self) {
        /* implementation not needed as we do not cache */
    }
}




#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(Logger::level(0, false), log::Level::Warn);
        assert_eq!(Logger::level(1, false), log::Level::Info);
        assert_eq!(Logger::level(2, false), log::Level::Debug);
        assert_eq!(Logger::level(5, false), log::Level::Trace);
        assert_eq!(Logger::level(0, true), log::Level::Error);
    }
}
