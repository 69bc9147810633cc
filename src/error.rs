//   bz-notify - relay commit bug references to Bugzilla
//   Copyright (C) 2016 Matthias Beyer <mail@beyermatthias.de>
//   Copyright (C) 2016 Julian Ganz <neither@nut.email>
//
//   This program is free software; you can redistribute it and/or modify
//   it under the terms of the GNU General Public License version 2 as
//   published by the Free Software Foundation.
//

use std::error::Error as StdError;

error_chain! {
    links {
        Notify(::libbznotify::error::Error, ::libbznotify::error::ErrorKind);
    }

    errors {
        InvalidTimeout(value: String) {
            description("Invalid timeout")
            display("Invalid timeout: '{}'", value)
        }

        InvalidBackend(name: String) {
            description("Unknown version control system")
            display("Unknown version control system: '{}'", name)
        }

        UndeliveredNotifications(count: usize) {
            description("Some notifications could not be delivered")
            display("{} notification(s) could not be delivered", count)
        }
    }
}


/// Convenience trait for logging error types
///
/// Logs all layers of an error using the `error!` macro.
///
pub trait LoggableError {
    fn log(&self);
}

impl<E> LoggableError for E
    where E: StdError
{
    fn log(&self) {
        let mut current = Some(self as &dyn StdError);
        while let Some(err) = current {
            error!("{}", err);
            current = err.source();
        }
    }
}
