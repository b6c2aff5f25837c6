use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::PromptError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub message: String,
    pub default: Option<String>,
    pub options: Vec<String>,
}

impl Question {
    pub fn new(message: impl Into<String>, options: Vec<String>) -> Self {
        Self { message: message.into(), default: None, options }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Index of the pre-selected option, if the default is one of the options.
    pub fn default_index(&self) -> Option<usize> {
        let default = self.default.as_deref()?;
        self.options.iter().position(|o| o == default)
    }
}

/// User-facing output and single-choice prompts.
pub trait Console {
    fn log(&mut self, level: Level, message: &str);

    fn write_line(&mut self, line: &str);

    fn question(&mut self, question: &Question) -> Result<String, PromptError>;

    fn level(&self) -> LevelFilter;

    fn start_wait(&mut self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn stop_wait(&mut self) {}

    fn debug(&mut self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&mut self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&mut self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&mut self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn log(&mut self, level: Level, message: &str) {
        (**self).log(level, message);
    }

    fn write_line(&mut self, line: &str) {
        (**self).write_line(line);
    }

    fn question(&mut self, question: &Question) -> Result<String, PromptError> {
        (**self).question(question)
    }

    fn level(&self) -> LevelFilter {
        (**self).level()
    }

    fn start_wait(&mut self, message: &str) {
        (**self).start_wait(message);
    }

    fn stop_wait(&mut self) {
        (**self).stop_wait();
    }
}

/// Prefixes every message written through the wrapped console.
pub struct PrefixConsole<C> {
    prefix: String,
    inner: C,
}

impl<C: Console> PrefixConsole<C> {
    pub fn new(prefix: impl Into<String>, inner: C) -> Self {
        Self { prefix: prefix.into(), inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Console> Console for PrefixConsole<C> {
    fn log(&mut self, level: Level, message: &str) {
        self.inner.log(level, &format!("{}{message}", self.prefix));
    }

    fn write_line(&mut self, line: &str) {
        self.inner.write_line(&format!("{}{line}", self.prefix));
    }

    fn question(&mut self, question: &Question) -> Result<String, PromptError> {
        let prefixed = Question { message: format!("{}{}", self.prefix, question.message), ..question.clone() };
        self.inner.question(&prefixed)
    }

    fn level(&self) -> LevelFilter {
        self.inner.level()
    }

    fn start_wait(&mut self, message: &str) {
        self.inner.start_wait(&format!("{}{message}", self.prefix));
    }

    fn stop_wait(&mut self) {
        self.inner.stop_wait();
    }
}
