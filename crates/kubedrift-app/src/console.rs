use std::io::{self, Write};

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::tty::IsTty;
use kubedrift_core::{Console, PromptError, Question};
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Console on the process terminal. Leveled output goes through tracing,
/// prompts are drawn on stderr.
pub struct TerminalConsole {
    level: LevelFilter,
    interactive: bool,
}

impl TerminalConsole {
    pub fn new(level: LevelFilter) -> Self {
        Self { level, interactive: io::stdin().is_tty() && io::stderr().is_tty() }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl Console for TerminalConsole {
    fn log(&mut self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            Level::TRACE => tracing::trace!("{message}"),
        }
    }

    fn write_line(&mut self, line: &str) {
        eprintln!("{line}");
    }

    fn question(&mut self, question: &Question) -> Result<String, PromptError> {
        if question.options.is_empty() {
            return Err(PromptError::NoOptions(question.message.clone()));
        }
        if !self.interactive {
            return Err(PromptError::NotInteractive(question.message.clone()));
        }

        terminal::enable_raw_mode()?;
        let result = run_select(&mut io::stderr(), question);
        terminal::disable_raw_mode()?;
        result
    }

    fn level(&self) -> LevelFilter {
        self.level
    }

    fn start_wait(&mut self, message: &str) {
        let mut err = io::stderr();
        let _ = write!(err, "{message}");
        let _ = err.flush();
    }

    fn stop_wait(&mut self) {
        eprintln!();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Move(usize),
    Submit,
    Cancel,
    Ignore,
}

fn step(selected: usize, len: usize, key: KeyEvent) -> Step {
    if key.kind != KeyEventKind::Press {
        return Step::Ignore;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Step::Move(selected.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Step::Move((selected + 1).min(len.saturating_sub(1))),
        KeyCode::Home => Step::Move(0),
        KeyCode::End => Step::Move(len.saturating_sub(1)),
        KeyCode::Enter => Step::Submit,
        KeyCode::Esc => Step::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Step::Cancel,
        _ => Step::Ignore,
    }
}

fn run_select(out: &mut impl Write, question: &Question) -> Result<String, PromptError> {
    let mut selected = question.default_index().unwrap_or(0);
    render(out, question, selected)?;

    loop {
        let Event::Key(key) = event::read()? else { continue };
        match step(selected, question.options.len(), key) {
            Step::Move(next) if next != selected => selected = next,
            Step::Move(_) | Step::Ignore => continue,
            Step::Submit => {
                let choice = question.options[selected].clone();
                rewind(out, question)?;
                queue!(out, Print(format!("? {} {choice}\r\n", question.message)))?;
                out.flush()?;
                return Ok(choice);
            }
            Step::Cancel => {
                rewind(out, question)?;
                out.flush()?;
                return Err(PromptError::Cancelled);
            }
        }
        rewind(out, question)?;
        render(out, question, selected)?;
    }
}

fn render(out: &mut impl Write, question: &Question, selected: usize) -> io::Result<()> {
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
    queue!(out, Print(format!("? {}\r\n", question.message)))?;
    for (i, option) in question.options.iter().enumerate() {
        let marker = if i == selected { ">" } else { " " };
        queue!(out, Print(format!("  {marker} {option}\r\n")))?;
    }
    out.flush()
}

fn rewind(out: &mut impl Write, question: &Question) -> io::Result<()> {
    let lines = u16::try_from(question.options.len() + 1).unwrap_or(u16::MAX);
    queue!(out, cursor::MoveUp(lines), cursor::MoveToColumn(0), Clear(ClearType::FromCursorDown))
}
