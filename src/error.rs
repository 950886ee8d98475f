use std::io;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("negative address {address}")]
    NegativeAddress { address: i64 },

    #[error("address {address} is beyond addressable memory")]
    OutOfMemory { address: i64 },

    #[error("immediate mode write destination in instruction {raw} at {pc}")]
    ImmediateDestination { pc: i64, raw: i64 },

    #[error("invalid parameter mode {mode} in instruction {raw} at {pc}")]
    InvalidMode { pc: i64, raw: i64, mode: i64 },

    #[error("arithmetic overflow in instruction {raw} at {pc}")]
    Overflow { pc: i64, raw: i64 },

    #[error(transparent)]
    Port(#[from] PortError),
}

/// Failures raised by an input or output port, handed back to the caller of
/// `Machine::execute` untouched.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("no more input values")]
    Exhausted,

    #[error("input closed")]
    Closed,

    #[error("failed to parse input line {line:?}: {source}")]
    Parse {
        line: String,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
#[error("invalid program value {token:?} at index {index}: {source}")]
pub struct ParseError {
    pub index: usize,
    pub token: String,
    #[source]
    pub source: ParseIntError,
}
