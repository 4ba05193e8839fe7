// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!
A framework for notifying users about what tools are doing.

Programs report progress, problems and failures through a
`NotificationBackend` rather than printing directly. This keeps the parsing
and rendering code independent of where messages end up: the command-line
program sends them to the terminal, tests collect them in a buffer.

*/

pub mod termcolor;

use anyhow::Error;
use std::fmt::Arguments;
use std::result::Result as StdResult;

/// How chatty the notification system should be.
#[repr(usize)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ChatterLevel {
    /// A minimal level of output: only warnings and errors will be reported.
    Minimal = 0,

    /// The normal level of output: informational messages will be reported.
    Normal,
}

/// The kind of notification that is being produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NotificationKind {
    /// An informational notice.
    Note,

    /// Warning of an unusual condition; the program will likely perform as intended.
    Warning,

    /// Notification of a severe problem; the program will likely fail but will attempt to continue.
    Severe,

    /// Notification of a fatal error; the program must give up.
    Fatal,
}

/// Trait for types that handle notifications to the user.
pub trait NotificationBackend {
    /// Notify the user about an event.
    ///
    /// If `err` is not `None`, the information contained in the object should
    /// be reported after the main message.
    fn notify(&mut self, kind: NotificationKind, args: Arguments, err: Option<Error>);
}

/// Send an informational notification to the user.
///
/// Standard usage looks like this:
///
/// ```rust,ignore
/// an_note!(nb, "found new antenna: {}", label);
/// ```
///
/// where `nb` is a type implementing the NotificationBackend trait. An Error
/// value may follow a semicolon; its causal chain is printed after the
/// message. That is more useful with `an_warning!`, `an_severe!` and
/// `an_fatal!`.
#[macro_export]
macro_rules! an_note {
    ($dest:expr, $( $fmt_args:expr ),*) => {
        $dest.notify($crate::notify::NotificationKind::Note, format_args!($( $fmt_args ),*), None)
    };
    ($dest:expr, $( $fmt_args:expr ),* ; $err:expr) => {
        $dest.notify($crate::notify::NotificationKind::Note, format_args!($( $fmt_args ),*), Some($err.into()))
    };
}

/// Warn the user of a problematic condition.
///
/// Use this when something unusual was detected but the task at hand will
/// likely succeed.
#[macro_export]
macro_rules! an_warning {
    ($dest:expr, $( $fmt_args:expr ),*) => {
        $dest.notify($crate::notify::NotificationKind::Warning, format_args!($( $fmt_args ),*), None)
    };
    ($dest:expr, $( $fmt_args:expr ),* ; $err:expr) => {
        $dest.notify($crate::notify::NotificationKind::Warning, format_args!($( $fmt_args ),*), Some($err.into()))
    };
}

/// Notify the user of a severe problem.
///
/// Use this when part of the work has failed but the program carries on
/// with the rest, such as one unreadable antenna in a batch.
#[macro_export]
macro_rules! an_severe {
    ($dest:expr, $( $fmt_args:expr ),*) => {
        $dest.notify($crate::notify::NotificationKind::Severe, format_args!($( $fmt_args ),*), None)
    };
    ($dest:expr, $( $fmt_args:expr ),* ; $err:expr) => {
        $dest.notify($crate::notify::NotificationKind::Severe, format_args!($( $fmt_args ),*), Some($err.into()))
    };
}

/// Notify the user of a fatal problem.
///
/// The command-line programs exit shortly after a fatal notification.
#[macro_export]
macro_rules! an_fatal {
    ($dest:expr, $( $fmt_args:expr ),*) => {
        $dest.notify($crate::notify::NotificationKind::Fatal, format_args!($( $fmt_args ),*), None)
    };
    ($dest:expr, $( $fmt_args:expr ),* ; $err:expr) => {
        $dest.notify($crate::notify::NotificationKind::Fatal, format_args!($( $fmt_args ),*), Some($err.into()))
    };
}

/// A no-op notification backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotificationBackend {}

impl NoopNotificationBackend {
    /// Create a new NoopNotificationBackend object.
    pub fn new() -> NoopNotificationBackend {
        NoopNotificationBackend {}
    }
}

impl NotificationBackend for NoopNotificationBackend {
    fn notify(&mut self, _kind: NotificationKind, _args: Arguments, _err: Option<Error>) {}
}

#[derive(Debug)]
struct NotificationData {
    kind: NotificationKind,
    text: String,
    err: Option<Error>,
}

/// A notification backend that buffers notifications and emits them later.
#[derive(Debug, Default)]
pub struct BufferingNotificationBackend {
    buf: Vec<NotificationData>,
}

impl BufferingNotificationBackend {
    /// Create and return a new BufferingNotificationBackend.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Iterate over the kinds and texts of the buffered notifications, in
    /// the order they were received.
    pub fn messages(&self) -> impl Iterator<Item = (NotificationKind, &str)> {
        self.buf.iter().map(|info| (info.kind, info.text.as_str()))
    }

    /// Count the buffered notifications of a given kind.
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.buf.iter().filter(|info| info.kind == kind).count()
    }

    /// Empty the buffered notifications into a different notification backend.
    ///
    /// This function consumes the object.
    pub fn drain<B: NotificationBackend + ?Sized>(mut self, other: &mut B) {
        for info in self.buf.drain(..) {
            other.notify(info.kind, format_args!("{}", info.text), info.err);
        }
    }
}

impl NotificationBackend for BufferingNotificationBackend {
    fn notify(&mut self, kind: NotificationKind, args: Arguments, err: Option<Error>) {
        self.buf.push(NotificationData {
            kind,
            text: format!("{args}"),
            err,
        });
    }
}

/// An extension trait for adding standard notification arguments to a clap
/// Command object.
pub trait ClapNotificationArgsExt {
    /// Add the standard notification-related arguments to this Command.
    fn antview_notify_args(self) -> Self;
}

impl ClapNotificationArgsExt for clap::Command {
    fn antview_notify_args(self) -> Self {
        self.arg(
            clap::Arg::new("chatter_level")
                .long("chatter")
                .short('c')
                .value_name("LEVEL")
                .help("How much chatter to print when running")
                .value_parser(["default", "minimal"])
                .default_value("default"),
        )
    }
}

/// Work out the chatter level requested on the command line.
pub fn chatter_level(matches: &clap::ArgMatches) -> ChatterLevel {
    match matches.get_one::<String>("chatter_level").map(String::as_str) {
        Some("minimal") => ChatterLevel::Minimal,
        _ => ChatterLevel::Normal,
    }
}

/// Run a function with colorized reporting of errors.
///
/// Returns the exit code of the program: whatever the inner function
/// returned on success, or 1 after printing its error.
pub fn run_with_notifications<E, F>(matches: clap::ArgMatches, inner: F) -> i32
where
    E: Into<Error>,
    F: FnOnce(clap::ArgMatches, &mut dyn NotificationBackend) -> StdResult<i32, E>,
{
    let mut tnb = termcolor::TermcolorNotificationBackend::new(chatter_level(&matches));

    match inner(matches, &mut tnb) {
        Ok(ret) => ret,

        Err(e) => {
            tnb.bare_error(e);
            1
        }
    }
}
