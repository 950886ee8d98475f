//! An interpreter for Intcode programs: a flat memory of signed integers,
//! three addressing modes, a relative base register and single-value
//! input/output ports.
//!
//! ```
//! use intcode::{Buffered, Machine, Scripted};
//!
//! let program = intcode::parse("3,0,4,0,99").unwrap();
//! let mut machine = Machine::new(program, Scripted::new([42]), Buffered::new());
//! machine.execute().unwrap();
//! assert_eq!(machine.output().values(), &[42]);
//! ```

pub mod error;
pub mod machine;
pub mod memory;
pub mod operation;
pub mod port;
pub mod program;
pub mod register;

pub use crate::error::{Error, ParseError, PortError};
pub use crate::machine::Machine;
pub use crate::memory::Memory;
pub use crate::operation::{Instruction, Mode, Opcode};
pub use crate::port::{Buffered, Input, Output, Scripted, StdIn, StdOut};
pub use crate::program::parse;
