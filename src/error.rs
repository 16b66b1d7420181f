// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

/// The single error kind raised while parsing or checking a template.
///
/// Errors raised deep inside a directive usually don't know where they happened.
/// The parser fills in the line of the directive's start token and the template
/// filename on the way out, unless a more precise location was already set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}{}", location_prefix(.filename, .line), .message)]
pub struct SyntaxError {
    pub message: String,
    pub filename: Option<String>,
    pub line: Option<usize>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            filename: None,
            line: None,
        }
    }

    pub fn at(message: impl Into<String>, line: usize) -> SyntaxError {
        SyntaxError::new(message).with_line(line)
    }

    /// Sets the line, unless one is already known.
    pub fn with_line(mut self, line: usize) -> SyntaxError {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    /// Sets the filename, unless one is already known.
    pub fn with_filename(mut self, filename: &str) -> SyntaxError {
        if self.filename.is_none() {
            self.filename = Some(filename.to_string());
        }
        self
    }
}

fn location_prefix(filename: &Option<String>, line: &Option<usize>) -> String {
    match (filename, line) {
        (Some(filename), Some(line)) => format!("{}:{}: ", filename, line),
        (Some(filename), None) => format!("{}: ", filename),
        (None, Some(line)) => format!("line {}: ", line),
        (None, None) => String::new(),
    }
}
