// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!
A notification backend that sends colorized output to the terminal.
*/

use anyhow::Error;
use std::backtrace::BacktraceStatus;
use std::fmt::Arguments;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{ChatterLevel, NotificationBackend, NotificationKind};

/// A notification backend that writes colorized output to the terminal.
///
/// Informational notes go to standard output; warnings and errors go to
/// standard error. Each message gets a colored prefix naming its kind.
pub struct TermcolorNotificationBackend {
    chatter: ChatterLevel,
    stdout: StandardStream,
    stderr: StandardStream,
    note_spec: ColorSpec,
    warning_spec: ColorSpec,
    severe_spec: ColorSpec,
    fatal_spec: ColorSpec,
}

impl TermcolorNotificationBackend {
    /// Create a new TermcolorNotificationBackend.
    pub fn new(chatter: ChatterLevel) -> TermcolorNotificationBackend {
        let mut note_spec = ColorSpec::new();
        note_spec.set_fg(Some(Color::Green)).set_bold(true);

        let mut warning_spec = ColorSpec::new();
        warning_spec.set_fg(Some(Color::Yellow)).set_bold(true);

        let mut severe_spec = ColorSpec::new();
        severe_spec.set_fg(Some(Color::Red)).set_bold(true);

        let mut fatal_spec = ColorSpec::new();
        fatal_spec
            .set_fg(Some(Color::Red))
            .set_bold(true)
            .set_underline(true);

        TermcolorNotificationBackend {
            chatter,
            stdout: StandardStream::stdout(ColorChoice::Auto),
            stderr: StandardStream::stderr(ColorChoice::Auto),
            note_spec,
            warning_spec,
            severe_spec,
            fatal_spec,
        }
    }

    fn suppressed(&self, kind: NotificationKind) -> bool {
        kind == NotificationKind::Note && self.chatter <= ChatterLevel::Minimal
    }

    fn stream_and_spec(&mut self, kind: NotificationKind) -> (&mut StandardStream, &ColorSpec) {
        match kind {
            NotificationKind::Note => (&mut self.stdout, &self.note_spec),
            NotificationKind::Warning => (&mut self.stderr, &self.warning_spec),
            NotificationKind::Severe => (&mut self.stderr, &self.severe_spec),
            NotificationKind::Fatal => (&mut self.stderr, &self.fatal_spec),
        }
    }

    fn generic_message(&mut self, kind: NotificationKind, prefix: Option<&str>, args: Arguments) {
        if self.suppressed(kind) {
            return;
        }

        let prefix = prefix.unwrap_or(match kind {
            NotificationKind::Note => "note:",
            NotificationKind::Warning => "warning:",
            NotificationKind::Severe => "error:",
            NotificationKind::Fatal => "fatal:",
        });

        let (stream, spec) = self.stream_and_spec(kind);
        let spec = spec.clone();
        stream.set_color(&spec).expect("failed to set color");
        write!(stream, "{prefix}").expect("failed to write to standard stream");
        stream.reset().expect("failed to clear color");
        writeln!(stream, " {args}").expect("failed to write to standard stream");
    }

    fn error_details(&mut self, kind: NotificationKind, err: &Error) {
        for cause in err.chain().skip(1) {
            self.generic_message(kind, Some("caused by:"), format_args!("{cause}"));
        }

        let backtrace = err.backtrace();

        if backtrace.status() == BacktraceStatus::Captured && !self.suppressed(kind) {
            self.generic_message(kind, Some("debugging:"), format_args!("backtrace follows:"));
            let (stream, _) = self.stream_and_spec(kind);
            writeln!(stream, "{backtrace}").expect("backtrace dump failed");
        }
    }

    /// Print the information contained in an Error object.
    ///
    /// This prints the error, the errors that caused it, and its backtrace
    /// if one was captured (set `RUST_BACKTRACE=1` to get one).
    pub fn bare_error<E: Into<Error>>(&mut self, err: E) {
        let err = err.into();
        self.generic_message(NotificationKind::Fatal, Some("error:"), format_args!("{err}"));
        self.error_details(NotificationKind::Fatal, &err);
    }
}

impl NotificationBackend for TermcolorNotificationBackend {
    fn notify(&mut self, kind: NotificationKind, args: Arguments, err: Option<Error>) {
        self.generic_message(kind, None, args);

        if let Some(e) = err {
            self.generic_message(kind, Some("caused by:"), format_args!("{e}"));
            self.error_details(kind, &e);
        }
    }
}
