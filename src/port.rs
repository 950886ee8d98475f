//! Single-value I/O ports connecting a running machine to the outside world.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::PortError;

/// Produces one value per input instruction. May block.
pub trait Input {
    fn deliver(&mut self) -> Result<i64, PortError>;
}

/// Accepts one value per output instruction.
pub trait Output {
    fn receive(&mut self, value: i64) -> Result<(), PortError>;
}

impl<P: Input + ?Sized> Input for &mut P {
    fn deliver(&mut self) -> Result<i64, PortError> {
        (**self).deliver()
    }
}

impl<P: Output + ?Sized> Output for &mut P {
    fn receive(&mut self, value: i64) -> Result<(), PortError> {
        (**self).receive(value)
    }
}

/// Delivers a fixed sequence of values, then fails with `Exhausted`.
#[derive(Clone, Debug, Default)]
pub struct Scripted(VecDeque<i64>);

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Scripted {
        Scripted(values.into_iter().collect())
    }

    pub fn push(&mut self, value: i64) {
        self.0.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.0.len()
    }
}

impl Input for Scripted {
    fn deliver(&mut self) -> Result<i64, PortError> {
        self.0.pop_front().ok_or(PortError::Exhausted)
    }
}

/// Collects every received value.
#[derive(Clone, Debug, Default)]
pub struct Buffered(Vec<i64>);

impl Buffered {
    pub fn new() -> Buffered {
        Buffered::default()
    }

    pub fn values(&self) -> &[i64] {
        &self.0
    }

    /// Removes the oldest three values once at least three are buffered.
    pub fn take_triple(&mut self) -> Option<(i64, i64, i64)> {
        if self.0.len() < 3 {
            return None;
        }
        let triple = (self.0[0], self.0[1], self.0[2]);
        self.0.drain(..3);
        Some(triple)
    }

    pub fn into_values(self) -> Vec<i64> {
        self.0
    }
}

impl Output for Buffered {
    fn receive(&mut self, value: i64) -> Result<(), PortError> {
        self.0.push(value);
        Ok(())
    }
}

/// Prompts with `<< ` and reads one integer per line.
#[derive(Debug)]
pub struct StdIn<R = io::StdinLock<'static>, W = io::Stdout> {
    reader: R,
    prompt: W,
}

impl StdIn {
    pub fn new() -> StdIn {
        StdIn::with(io::stdin().lock(), io::stdout())
    }
}

impl Default for StdIn {
    fn default() -> StdIn {
        StdIn::new()
    }
}

impl<R: BufRead, W: Write> StdIn<R, W> {
    pub fn with(reader: R, prompt: W) -> StdIn<R, W> {
        StdIn { reader, prompt }
    }
}

impl<R: BufRead, W: Write> Input for StdIn<R, W> {
    fn deliver(&mut self) -> Result<i64, PortError> {
        write!(self.prompt, "<< ")?;
        self.prompt.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PortError::Closed);
        }
        let trimmed = line.trim();
        trimmed.parse().map_err(|source| PortError::Parse {
            line: trimmed.to_owned(),
            source,
        })
    }
}

/// Prints `>> value` per received value.
#[derive(Debug)]
pub struct StdOut<W = io::Stdout>(W);

impl StdOut {
    pub fn new() -> StdOut {
        StdOut(io::stdout())
    }
}

impl Default for StdOut {
    fn default() -> StdOut {
        StdOut::new()
    }
}

impl<W: Write> StdOut<W> {
    pub fn with(writer: W) -> StdOut<W> {
        StdOut(writer)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> Output for StdOut<W> {
    fn receive(&mut self, value: i64) -> Result<(), PortError> {
        writeln!(self.0, ">> {}", value)?;
        Ok(())
    }
}
