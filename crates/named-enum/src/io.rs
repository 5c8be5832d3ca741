use std::{
    borrow::Cow,
    io::{self, Write as _},
};

use crate::exception::EnumResult;

/// Sink for the text produced by [`describe`](crate::NamedEnum::describe) and by the
/// verbose factory.
///
/// The default implementation [`StdPrint`] writes to stdout; tests collect output with
/// [`CollectStringPrint`].
pub trait PrintWriter {
    /// Writes a chunk of text without adding a terminator.
    fn stdout_write(&mut self, output: Cow<'_, str>) -> EnumResult<()>;

    /// Adds a single character, usually the trailing newline.
    fn stdout_push(&mut self, end: char) -> EnumResult<()>;
}

impl<P: PrintWriter + ?Sized> PrintWriter for &mut P {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> EnumResult<()> {
        (**self).stdout_write(output)
    }

    fn stdout_push(&mut self, end: char) -> EnumResult<()> {
        (**self).stdout_push(end)
    }
}

/// Default `PrintWriter` that writes to stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> EnumResult<()> {
        io::stdout().lock().write_all(output.as_bytes())?;
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> EnumResult<()> {
        let mut buf = [0; 4];
        let mut stdout = io::stdout().lock();
        stdout.write_all(end.encode_utf8(&mut buf).as_bytes())?;
        if end == '\n' {
            stdout.flush()?;
        }
        Ok(())
    }
}

/// A `PrintWriter` that collects all output into a string.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    /// Creates a new empty `CollectStringPrint`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected output as a string slice.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.0
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> EnumResult<()> {
        self.0.push_str(&output);
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> EnumResult<()> {
        self.0.push(end);
        Ok(())
    }
}

/// `PrintWriter` that ignores all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn stdout_write(&mut self, _output: Cow<'_, str>) -> EnumResult<()> {
        Ok(())
    }

    fn stdout_push(&mut self, _end: char) -> EnumResult<()> {
        Ok(())
    }
}
