use crate::error::Error;

/// Auto-extending program memory. Cells past the end read as zero; writes past
/// the end grow the store, zero-filling the gap.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Memory(Vec<i64>);

fn index(address: i64) -> Result<usize, Error> {
    usize::try_from(address).map_err(|_| Error::NegativeAddress { address })
}

impl Memory {
    pub fn new(program: Vec<i64>) -> Memory {
        Memory(program)
    }

    pub fn read(&self, address: i64) -> Result<i64, Error> {
        let i = index(address)?;
        Ok(self.0.get(i).copied().unwrap_or(0))
    }

    pub fn write(&mut self, address: i64, value: i64) -> Result<(), Error> {
        let i = index(address)?;
        if i >= self.0.len() {
            self.0
                .try_reserve(i + 1 - self.0.len())
                .map_err(|_| Error::OutOfMemory { address })?;
            self.0.resize(i + 1, 0);
        }
        self.0[i] = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

impl From<Vec<i64>> for Memory {
    fn from(program: Vec<i64>) -> Memory {
        Memory::new(program)
    }
}
