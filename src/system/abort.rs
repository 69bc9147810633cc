//   bz-notify - relay commit bug references to Bugzilla
//   Copyright (C) 2017 Matthias Beyer <mail@beyermatthias.de>
//   Copyright (C) 2017 Julian Ganz <neither@nut.email>
//
//   This program is free software; you can redistribute it and/or modify
//   it under the terms of the GNU General Public License version 2 as
//   published by the Free Software Foundation.
//

use std::process::exit;

use error::LoggableError;


/// Extension trait for convenient abortion in case of errors
///
pub trait Abortable<V>
{
    /// Just like a regular unwrap() except it performs proper logging
    ///
    /// Returns the contained value or aborts the program, logging the error.
    ///
    fn unwrap_or_abort(self) -> V;
}

impl<V, E> Abortable<V> for Result<V, E>
    where E: LoggableError
{
    fn unwrap_or_abort(self) -> V {
        self.unwrap_or_else(|e| {
            e.log();
            exit(1)
        })
    }
}
