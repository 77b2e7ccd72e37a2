//! Interactive menu loop
//!
//! Reads numeric selections from any `BufRead`, drives the process table and
//! writes the menu, prompts and listings to any `Write`.

use crate::core::process_table::ProcessTable;
use crate::error::{PcbError, PcbResult};
use crate::render::{render, OutputFormat};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const MENU: &str = "\
Process creation and destruction
--------------------------------
1) Initialize process hierarchy
2) Create a new child process
3) Destroy all descendants of a process
4) Quit program and free memory
Enter selection: ";

const CREATE_PROMPT: &str = "Enter the parent process id: ";
const DESTROY_PROMPT: &str = "Enter the parent process whose descendants are to be destroyed: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Initialize,
    CreateChild,
    DestroyDescendants,
    Quit,
}

impl MenuCommand {
    pub fn from_selection(selection: i64) -> Option<Self> {
        match selection {
            1 => Some(MenuCommand::Initialize),
            2 => Some(MenuCommand::CreateChild),
            3 => Some(MenuCommand::DestroyDescendants),
            4 => Some(MenuCommand::Quit),
            _ => None,
        }
    }
}

/// One integer read from the input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Int(i64),
    /// Not an integer; the rest of that line was discarded
    Invalid,
    Eof,
}

/// Longest stretch of a single input line held in memory at once
const LINE_LIMIT: usize = 4096;

/// Whitespace-separated integer reader.
///
/// Leading whitespace, newlines included, is skipped. An integer may be
/// followed directly by other characters (`"2abc"` yields `2`, then
/// `Invalid`). Anything that does not start with an optional sign and a digit
/// discards the remainder of its line.
///
/// Lines are buffered at most [`LINE_LIMIT`] bytes at a time; the discarded
/// rest of an oversized line is skipped without being stored.
pub struct InputReader<R> {
    reader: R,
    line: Vec<u8>,
    pos: usize,
    /// `line` holds only the front of a longer line
    partial: bool,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
            partial: false,
        }
    }

    pub fn next_int(&mut self) -> std::io::Result<Token> {
        loop {
            while self.pos < self.line.len() && self.line[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            if self.pos < self.line.len() {
                if self.token_is_cut() {
                    self.line.drain(..self.pos);
                    self.pos = 0;
                    self.fill()?;
                    continue;
                }
                return self.parse_at_cursor();
            }

            self.line.clear();
            self.pos = 0;
            if self.fill()? == 0 {
                return Ok(Token::Eof);
            }
        }
    }

    /// The token under the cursor runs into the unread part of its line.
    fn token_is_cut(&self) -> bool {
        if !self.partial || (self.pos == 0 && self.line.len() >= LINE_LIMIT) {
            return false;
        }
        !self.line[self.pos..].iter().any(|b| b.is_ascii_whitespace())
    }

    /// Append the next piece of the current line, up to a newline or
    /// [`LINE_LIMIT`] buffered bytes.
    fn fill(&mut self) -> std::io::Result<usize> {
        let mut added = 0;
        while self.line.len() < LINE_LIMIT {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                self.partial = false;
                return Ok(added);
            }

            let room = LINE_LIMIT - self.line.len();
            let window = &available[..available.len().min(room)];
            match window.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    self.line.extend_from_slice(&window[..=newline]);
                    self.reader.consume(newline + 1);
                    self.partial = false;
                    return Ok(added + newline + 1);
                }
                None => {
                    let taken = window.len();
                    self.line.extend_from_slice(window);
                    self.reader.consume(taken);
                    added += taken;
                }
            }
        }
        self.partial = true;
        Ok(added)
    }

    fn parse_at_cursor(&mut self) -> std::io::Result<Token> {
        let rest = &self.line[self.pos..];
        let sign_len = usize::from(matches!(rest.first(), Some(b'+') | Some(b'-')));
        let digits = rest[sign_len..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();

        let parsed = if digits == 0 {
            None
        } else {
            std::str::from_utf8(&rest[..sign_len + digits])
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
        };

        match parsed {
            Some(value) => {
                self.pos += sign_len + digits;
                Ok(Token::Int(value))
            }
            None => {
                self.discard_line()?;
                Ok(Token::Invalid)
            }
        }
    }

    fn discard_line(&mut self) -> std::io::Result<()> {
        self.pos = self.line.len();
        if !self.partial {
            return Ok(());
        }

        self.partial = false;
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    self.reader.consume(newline + 1);
                    return Ok(());
                }
                None => {
                    let skipped = available.len();
                    self.reader.consume(skipped);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub format: OutputFormat,
    /// Report ignored commands on the output instead of staying silent
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub commands: usize,
    pub ignored: usize,
    /// Input ran out before a quit selection
    pub ended_by_eof: bool,
}

pub struct Session<R, W> {
    input: InputReader<R>,
    out: W,
    table: ProcessTable,
    options: SessionOptions,
    summary: SessionSummary,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(table: ProcessTable, input: R, out: W, options: SessionOptions) -> Self {
        Self {
            input: InputReader::new(input),
            out,
            table,
            options,
            summary: SessionSummary::default(),
        }
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Run until a quit selection or end of input.
    pub fn run(&mut self) -> PcbResult<SessionSummary> {
        info!(capacity = self.table.capacity(), "session started");

        loop {
            self.prompt(MENU)?;
            let selection = match self.input.next_int()? {
                Token::Int(selection) => selection,
                Token::Invalid => {
                    self.ignore("selection is not a number");
                    continue;
                }
                Token::Eof => return self.finish_on_eof(),
            };

            let Some(command) = MenuCommand::from_selection(selection) else {
                self.ignore("unknown selection");
                continue;
            };
            debug!(?command, "menu selection");
            self.summary.commands += 1;

            match command {
                MenuCommand::Initialize => {
                    self.table.reset();
                    self.render()?;
                }
                MenuCommand::CreateChild => match self.read_id(CREATE_PROMPT)? {
                    Token::Int(raw) => {
                        let outcome = self
                            .table
                            .resolve(raw)
                            .and_then(|parent| self.table.try_create_child(parent));
                        self.apply(outcome.map(|_| ()))?;
                    }
                    Token::Invalid => self.ignore("process id is not a number"),
                    Token::Eof => return self.finish_on_eof(),
                },
                MenuCommand::DestroyDescendants => match self.read_id(DESTROY_PROMPT)? {
                    Token::Int(raw) => {
                        let outcome = self
                            .table
                            .resolve(raw)
                            .and_then(|pid| self.table.try_destroy_descendants(pid));
                        self.apply(outcome.map(|_| ()))?;
                    }
                    Token::Invalid => self.ignore("process id is not a number"),
                    Token::Eof => return self.finish_on_eof(),
                },
                MenuCommand::Quit => {
                    write!(self.out, "Quitting program... ")?;
                    let freed = self.table.teardown();
                    writeln!(self.out, "memory freed")?;
                    self.out.flush()?;
                    info!(freed, "session ended");
                    return Ok(self.summary);
                }
            }
        }
    }

    fn prompt(&mut self, text: &str) -> PcbResult<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    fn read_id(&mut self, prompt: &str) -> PcbResult<Token> {
        self.prompt(prompt)?;
        Ok(self.input.next_int()?)
    }

    fn apply(&mut self, outcome: PcbResult<()>) -> PcbResult<()> {
        match outcome {
            Ok(()) => self.render(),
            Err(err) if !err.is_fatal() => self.refuse(&err),
            Err(err) => Err(err),
        }
    }

    fn refuse(&mut self, err: &PcbError) -> PcbResult<()> {
        warn!(category = %err.category(), "ignored: {}", err);
        self.summary.ignored += 1;
        if self.options.strict {
            writeln!(self.out, "Error: {}", err.user_message())?;
        }
        Ok(())
    }

    fn ignore(&mut self, reason: &str) {
        warn!("ignored input: {}", reason);
        self.summary.ignored += 1;
    }

    fn render(&mut self) -> PcbResult<()> {
        #[cfg(debug_assertions)]
        self.table.validate()?;
        render(&self.table, self.options.format, &mut self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn finish_on_eof(&mut self) -> PcbResult<SessionSummary> {
        self.summary.ended_by_eof = true;
        writeln!(self.out)?;
        let freed = self.table.teardown();
        self.out.flush()?;
        info!(freed, "input closed, session ended");
        Ok(self.summary)
    }
}
