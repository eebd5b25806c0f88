//! JSON output formatting and writing
//!
//! Stdout carries exactly one line of JSON per invocation, either
//! `{"text": "<transcript>"}` or `{"error": "<message>"}`. Values are
//! rendered with a space after the colon, and non-ASCII characters pass
//! through as literal UTF-8 rather than escape sequences.

use std::io::{self, Write};

use serde::Serialize;

#[derive(Debug, Serialize)]
struct TranscriptPayload<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

/// Single-line JSON with `", "` / `": "` separators
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_json<T: Serialize>(value: &T) -> Option<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser).ok()?;
    String::from_utf8(buf).ok()
}

/// Format a transcript as a single-line JSON object
pub fn format_transcript(text: &str) -> String {
    to_spaced_json(&TranscriptPayload { text })
        .unwrap_or_else(|| String::from(r#"{"text": ""}"#))
}

/// Format an error message as a single-line JSON object
pub fn format_error(message: &str) -> String {
    to_spaced_json(&ErrorPayload { error: message })
        .unwrap_or_else(|| String::from(r#"{"error": ""}"#))
}

/// Write a transcript line to stdout
pub fn print_transcript(text: &str) -> io::Result<()> {
    write_line(&format_transcript(text))
}

/// Write an error line to stdout
pub fn print_error(message: &str) -> io::Result<()> {
    write_line(&format_error(message))
}

fn write_line(line: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()
}
