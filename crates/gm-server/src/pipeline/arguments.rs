//! Ordered command-line argument list.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::Path;

/// The `gm` sub-command every invocation runs.
pub const MOGRIFY: &str = "mogrify";

/// Ordered list of tool arguments.
///
/// Arguments are appended in the order the transformation steps run. A single
/// step (trim) needs to run before everything else and uses [`push_front`].
///
/// [`push_front`]: Arguments::push_front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    tokens: VecDeque<String>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push_back(token.into());
    }

    /// Append a flag followed by its value.
    pub fn push_pair(&mut self, flag: &str, value: impl Into<String>) {
        self.push(flag);
        self.push(value);
    }

    pub fn push_front(&mut self, token: impl Into<String>) {
        self.tokens.push_front(token.into());
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Full command line for `gm`: the `mogrify` verb, the flags, then the file.
    ///
    /// The file path is passed through as-is, so it need not be UTF-8.
    pub fn to_command_line(&self, file: &Path) -> Vec<OsString> {
        let mut line = Vec::with_capacity(self.tokens.len() + 2);
        line.push(OsString::from(MOGRIFY));
        line.extend(self.tokens.iter().map(OsString::from));
        line.push(file.as_os_str().to_owned());
        line
    }
}
