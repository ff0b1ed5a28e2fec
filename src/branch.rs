//! Types for representing branches and branch outcomes.

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1,
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N,
        }
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> bool {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}
impl From<Outcome> for usize {
    fn from(x: Outcome) -> usize {
        x as usize
    }
}

/// A record of branch execution, as carried by one trace line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: usize,

    /// The target address evaluated for this branch
    pub target: usize,

    /// The outcome evaluated for this branch
    pub outcome: Outcome,

    /// Whether this is a conditional branch instruction
    pub conditional: bool,

    /// Whether this is a procedure call
    pub call: bool,

    /// Whether this is a return
    pub ret: bool,

    /// Whether this instruction directly specifies the target
    pub direct: bool,
}

impl BranchRecord {
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns 'true' if this is a conditional instruction.
    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    /// Returns 'true' if this is an unconditional instruction.
    pub fn is_unconditional(&self) -> bool {
        !self.conditional
    }

    /// Returns 'true' if this instruction directly specifies the target.
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    /// Returns 'true' if this is a "call" or "return".
    pub fn is_procedural(&self) -> bool {
        self.call || self.ret
    }
}
