use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::memory::Memory;
use crate::operation::{Instruction, InvalidMode, Mode, Opcode, MAX_ARITY};
use crate::port::{Input, Output};
use crate::register::Register;

/// One decoded instruction together with its raw parameter window.
#[derive(Clone, Copy, Debug)]
struct Fetched {
    pc: i64,
    raw: i64,
    instruction: Instruction,
    params: [i64; MAX_ARITY],
}

impl Fetched {
    fn overflow(&self) -> Error {
        Error::Overflow { pc: self.pc, raw: self.raw }
    }
}

/// The execution engine. Owns the program memory, the program counter, the
/// relative base and both ports for the duration of a run.
#[derive(Debug)]
pub struct Machine<I, O> {
    memory: Memory,
    pc: Register,
    relative_base: Register,
    input: I,
    output: O,
    halted: bool,
}

impl<I: Input, O: Output> Machine<I, O> {
    pub fn new(program: impl Into<Memory>, input: I, output: O) -> Machine<I, O> {
        Machine {
            memory: program.into(),
            pc: Register::default(),
            relative_base: Register::default(),
            input,
            output,
            halted: false,
        }
    }

    /// Runs until a halt instruction. Never returns for a program that does
    /// not halt.
    pub fn execute(&mut self) -> Result<(), Error> {
        while !self.step()? {}
        Ok(())
    }

    /// Performs one fetch-decode-execute cycle and reports whether the machine
    /// has halted.
    pub fn step(&mut self) -> Result<bool, Error> {
        if self.halted {
            return Ok(true);
        }
        let pc = self.pc.get();
        let raw = self.memory.read(pc)?;
        let instruction = match Instruction::decode(raw) {
            Ok(Some(instruction)) => instruction,
            Ok(None) => {
                warn!(pc, raw, "unknown opcode");
                self.pc.inc(1).ok_or(Error::Overflow { pc, raw })?;
                return Ok(false);
            }
            Err(InvalidMode(mode)) => return Err(Error::InvalidMode { pc, raw, mode }),
        };

        let mut fetched = Fetched { pc, raw, instruction, params: [0; MAX_ARITY] };
        for (offset, param) in (1..).zip(&mut fetched.params[..instruction.arity()]) {
            let address = pc.checked_add(offset).ok_or(Error::Overflow { pc, raw })?;
            *param = self.memory.read(address)?;
        }
        trace!(
            pc,
            raw,
            opcode = ?instruction.opcode,
            params = ?&fetched.params[..instruction.arity()],
            "execute"
        );

        self.discharge(&fetched)?;
        Ok(self.halted)
    }

    fn discharge(&mut self, fetched: &Fetched) -> Result<(), Error> {
        let opcode = fetched.instruction.opcode;
        match opcode {
            Opcode::Add => self.store(fetched, i64::checked_add)?,
            Opcode::Multiply => self.store(fetched, i64::checked_mul)?,
            Opcode::LessThan => self.store(fetched, |a, b| Some((a < b) as i64))?,
            Opcode::Equals => self.store(fetched, |a, b| Some((a == b) as i64))?,
            Opcode::Input => {
                let destination = self.destination(fetched, 0)?;
                let value = self.input.deliver()?;
                self.memory.write(destination, value)?;
            }
            Opcode::Output => {
                let value = self.operand(fetched, 0)?;
                self.output.receive(value)?;
            }
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => {
                let condition = self.operand(fetched, 0)?;
                let target = self.operand(fetched, 1)?;
                if opcode.branches(condition) {
                    self.pc.set(target);
                } else {
                    self.advance(fetched)?;
                }
            }
            Opcode::RelativeBaseOffset => {
                let offset = self.operand(fetched, 0)?;
                self.relative_base.inc(offset).ok_or_else(|| fetched.overflow())?;
            }
            Opcode::Halt => {
                debug!(pc = fetched.pc, "halted");
                self.halted = true;
            }
        }

        if !opcode.is_jump() && !self.halted {
            self.advance(fetched)?;
        }
        Ok(())
    }

    /// Writes `f(operand 1, operand 2)` to the third parameter. `None` from
    /// `f` is an overflow.
    fn store(
        &mut self,
        fetched: &Fetched,
        f: impl FnOnce(i64, i64) -> Option<i64>,
    ) -> Result<(), Error> {
        let a = self.operand(fetched, 0)?;
        let b = self.operand(fetched, 1)?;
        let destination = self.destination(fetched, 2)?;
        let value = f(a, b).ok_or_else(|| fetched.overflow())?;
        self.memory.write(destination, value)
    }

    fn advance(&mut self, fetched: &Fetched) -> Result<(), Error> {
        let width = fetched.instruction.arity() as i64 + 1;
        self.pc.inc(width).ok_or_else(|| fetched.overflow())?;
        Ok(())
    }

    fn relative(&self, fetched: &Fetched, value: i64) -> Result<i64, Error> {
        value
            .checked_add(self.relative_base.get())
            .ok_or_else(|| fetched.overflow())
    }

    /// Resolves a read parameter through its addressing mode.
    fn operand(&self, fetched: &Fetched, i: usize) -> Result<i64, Error> {
        let value = fetched.params[i];
        match fetched.instruction.modes.get(i) {
            Mode::Position => self.memory.read(value),
            Mode::Immediate => Ok(value),
            Mode::Relative => self.memory.read(self.relative(fetched, value)?),
        }
    }

    /// Resolves a write destination to an absolute address.
    fn destination(&self, fetched: &Fetched, i: usize) -> Result<i64, Error> {
        let value = fetched.params[i];
        match fetched.instruction.modes.get(i) {
            Mode::Position => Ok(value),
            Mode::Immediate => Err(Error::ImmediateDestination {
                pc: fetched.pc,
                raw: fetched.raw,
            }),
            Mode::Relative => self.relative(fetched, value),
        }
    }
}

impl<I, O> Machine<I, O> {
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn pc(&self) -> i64 {
        self.pc.get()
    }

    pub fn relative_base(&self) -> i64 {
        self.relative_base.get()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_parts(self) -> (Memory, I, O) {
        (self.memory, self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::Machine;
    use crate::error::{Error, PortError};
    use crate::port::{Buffered, Scripted};

    fn machine(program: &[i64]) -> Machine<Scripted, Buffered> {
        Machine::new(program.to_vec(), Scripted::default(), Buffered::new())
    }

    #[test]
    fn add_and_multiply() {
        let mut m = machine(&[1, 0, 0, 0, 99]);
        m.execute().unwrap();
        assert_eq!(m.memory().as_slice(), &[2, 0, 0, 0, 99]);

        let mut m = machine(&[2, 4, 4, 5, 99, 0]);
        m.execute().unwrap();
        assert_eq!(m.memory().as_slice(), &[2, 4, 4, 5, 99, 9801]);
    }

    #[test]
    fn compare_writes_flags() {
        let mut m = machine(&[1107, 3, 5, 9, 1108, 4, 4, 10, 99, -1, -1]);
        m.execute().unwrap();
        assert_eq!(m.memory().read(9).unwrap(), 1);
        assert_eq!(m.memory().read(10).unwrap(), 1);

        let mut m = machine(&[1107, 5, 3, 9, 1108, 4, 3, 10, 99, -1, -1]);
        m.execute().unwrap();
        assert_eq!(m.memory().read(9).unwrap(), 0);
        assert_eq!(m.memory().read(10).unwrap(), 0);
    }

    #[test]
    fn jump_taken_and_not_taken() {
        let mut m = machine(&[1105, 1, 7, 104, 1, 99, 0, 104, 2, 99]);
        m.execute().unwrap();
        assert_eq!(m.output().values(), &[2]);

        let mut m = machine(&[1106, 1, 7, 104, 1, 99, 0, 104, 2, 99]);
        m.execute().unwrap();
        assert_eq!(m.output().values(), &[1]);
    }

    #[test]
    fn pc_advances_by_width() {
        let mut m = machine(&[1101, 1, 1, 0, 104, 3, 9, 5, 1105, 0, 0, 99]);
        m.step().unwrap();
        assert_eq!(m.pc(), 4);
        m.step().unwrap();
        assert_eq!(m.pc(), 6);
        m.step().unwrap();
        assert_eq!(m.pc(), 8);
        assert_eq!(m.relative_base(), 3);
        m.step().unwrap();
        assert_eq!(m.pc(), 11);
        assert!(m.step().unwrap());
        assert_eq!(m.pc(), 11);
    }

    #[test]
    fn halted_machine_stays_halted() {
        let mut m = machine(&[99, 104, 1]);
        assert!(m.step().unwrap());
        assert!(m.step().unwrap());
        assert!(m.is_halted());
        assert!(m.output().values().is_empty());
    }

    #[test]
    fn relative_operand() {
        let mut m = machine(&[109, 6, 204, 1, 99, 0, 0, 77]);
        m.execute().unwrap();
        assert_eq!(m.relative_base(), 6);
        assert_eq!(m.output().values(), &[77]);
    }

    #[test]
    fn immediate_destination_fails() {
        let mut m = machine(&[11101, 1, 1, 5, 99]);
        assert!(matches!(m.execute(), Err(Error::ImmediateDestination { pc: 0, raw: 11101 })));
        assert_eq!(m.memory().len(), 5);
    }

    #[test]
    fn invalid_mode_fails() {
        let mut m = machine(&[301, 0, 0, 0, 99]);
        assert!(matches!(m.execute(), Err(Error::InvalidMode { pc: 0, raw: 301, mode: 3 })));
    }

    #[test]
    fn negative_address_fails() {
        let mut m = machine(&[4, -1, 99]);
        assert!(matches!(m.execute(), Err(Error::NegativeAddress { address: -1 })));
    }

    #[test]
    fn overflow_fails() {
        let mut m = machine(&[1102, i64::MAX, 2, 0, 99]);
        assert!(matches!(m.execute(), Err(Error::Overflow { pc: 0, raw: 1102 })));
    }

    #[test]
    fn add_overflow_fails() {
        let mut m = machine(&[1101, i64::MAX, 1, 0, 99]);
        assert!(matches!(m.execute(), Err(Error::Overflow { pc: 0, raw: 1101 })));
        let mut m = machine(&[1101, i64::MIN, -1, 0, 99]);
        assert!(matches!(m.execute(), Err(Error::Overflow { pc: 0, raw: 1101 })));
    }

    #[test]
    fn compare_extremes() {
        let mut m = machine(&[
            1107,
            i64::MIN,
            i64::MAX,
            9,
            1108,
            i64::MAX,
            i64::MAX,
            10,
            99,
            -1,
            -1,
        ]);
        m.execute().unwrap();
        assert_eq!(m.memory().read(9).unwrap(), 1);
        assert_eq!(m.memory().read(10).unwrap(), 1);
    }

    #[test]
    fn huge_destination_fails() {
        let mut m = machine(&[1101, 1, 1, i64::MAX, 99]);
        assert!(matches!(m.execute(), Err(Error::OutOfMemory { address: i64::MAX })));
        assert_eq!(m.pc(), 0);
    }

    #[test]
    fn exhausted_input_propagates() {
        let mut m = machine(&[3, 0, 3, 0, 99]);
        let err = m.execute().unwrap_err();
        assert!(matches!(err, Error::Port(PortError::Exhausted)));
        assert_eq!(m.pc(), 0);
    }
}
