//! Instruction decoding.
//!
//! An instruction cell holds its opcode class in the low two decimal digits
//! and one addressing mode per parameter in the digits above, least
//! significant first.

use thiserror::Error;

/// The widest instruction takes three parameters.
pub const MAX_ARITY: usize = 3;

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum Mode {
    #[default]
    Position,
    Immediate,
    Relative,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Error)]
#[error("invalid parameter mode {0}")]
pub struct InvalidMode(pub i64);

impl TryFrom<i64> for Mode {
    type Error = InvalidMode;

    fn try_from(digit: i64) -> Result<Mode, InvalidMode> {
        match digit {
            0 => Ok(Mode::Position),
            1 => Ok(Mode::Immediate),
            2 => Ok(Mode::Relative),
            _ => Err(InvalidMode(digit)),
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Opcode {
    Add,
    Multiply,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    RelativeBaseOffset,
    Halt,
}

impl Opcode {
    /// The opcode class of a raw instruction value.
    pub fn class(raw: i64) -> i64 {
        raw.rem_euclid(100)
    }

    pub fn from_class(class: i64) -> Option<Opcode> {
        match class {
            1 => Some(Opcode::Add),
            2 => Some(Opcode::Multiply),
            3 => Some(Opcode::Input),
            4 => Some(Opcode::Output),
            5 => Some(Opcode::JumpIfTrue),
            6 => Some(Opcode::JumpIfFalse),
            7 => Some(Opcode::LessThan),
            8 => Some(Opcode::Equals),
            9 => Some(Opcode::RelativeBaseOffset),
            99 => Some(Opcode::Halt),
            _ => None,
        }
    }

    /// Number of parameters, write destination included.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::RelativeBaseOffset => 1,
            Opcode::Halt => 0,
        }
    }

    /// Whether the last parameter is a write destination.
    pub fn writes(self) -> bool {
        match self {
            Opcode::Add
            | Opcode::Multiply
            | Opcode::Input
            | Opcode::LessThan
            | Opcode::Equals => true,
            Opcode::Output
            | Opcode::JumpIfTrue
            | Opcode::JumpIfFalse
            | Opcode::RelativeBaseOffset
            | Opcode::Halt => false,
        }
    }

    /// Jumps move the program counter themselves.
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::JumpIfTrue | Opcode::JumpIfFalse)
    }

    /// Whether a conditional jump is taken for the given condition operand.
    pub fn branches(self, condition: i64) -> bool {
        match self {
            Opcode::JumpIfTrue => condition != 0,
            Opcode::JumpIfFalse => condition == 0,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct Modes {
    modes: [Mode; MAX_ARITY],
    len: usize,
}

impl Modes {
    pub fn get(&self, i: usize) -> Mode {
        self.as_slice()[i]
    }

    pub fn as_slice(&self) -> &[Mode] {
        &self.modes[..self.len]
    }
}

/// Splits `raw` into its opcode class and `arity` parameter modes. Missing
/// digits are position mode. `arity` is clamped to `MAX_ARITY`, since no
/// opcode takes more parameters.
pub fn decode_modes(raw: i64, arity: usize) -> Result<(i64, Modes), InvalidMode> {
    let arity = arity.min(MAX_ARITY);
    let mut digits = raw.div_euclid(100).unsigned_abs();
    let mut modes = Modes { len: arity, ..Modes::default() };
    for mode in &mut modes.modes[..arity] {
        *mode = Mode::try_from((digits % 10) as i64)?;
        digits /= 10;
    }
    Ok((Opcode::class(raw), modes))
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub modes: Modes,
}

impl Instruction {
    /// `Ok(None)` for a value outside the opcode table.
    pub fn decode(raw: i64) -> Result<Option<Instruction>, InvalidMode> {
        let Some(opcode) = Opcode::from_class(Opcode::class(raw)) else {
            return Ok(None);
        };
        let (_, modes) = decode_modes(raw, opcode.arity())?;
        Ok(Some(Instruction { opcode, modes }))
    }

    pub fn arity(&self) -> usize {
        self.opcode.arity()
    }
}
