/// A plain integer register, used for both the program counter and the
/// relative base.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct Register(i64);

impl Register {
    pub fn get(self) -> i64 {
        self.0
    }

    pub fn set(&mut self, value: i64) {
        self.0 = value;
    }

    pub fn inc(&mut self, amount: i64) -> Option<i64> {
        self.0 = self.0.checked_add(amount)?;
        Some(self.0)
    }

    pub fn dec(&mut self, amount: i64) -> Option<i64> {
        self.0 = self.0.checked_sub(amount)?;
        Some(self.0)
    }
}
