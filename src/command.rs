use crate::{
    config::{ASSERT_CODE, DEASSERT_CODE},
    error::Error,
    };


/// value alternated by the master and applied by the slave
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    /// drive the responder's output high
    Assert,
    /// drive the responder's output low
    #[default]
    Deassert,
}
impl Command {
    /// the other command value
    pub const fn toggled(self) -> Self {
        match self {
            Self::Assert => Self::Deassert,
            Self::Deassert => Self::Assert,
        }
    }
    /// output level associated to this command, `true` for high
    pub const fn level(self) -> bool {
        matches!(self, Self::Assert)
    }
}

/// wire bytes used to carry each [Command]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Encoding {
    assert: u8,
    deassert: u8,
}
impl Encoding {
    /// the bytes used unless configured otherwise
    pub const DEFAULT: Self = Self {assert: ASSERT_CODE, deassert: DEASSERT_CODE};

    /// both bytes must differ, or the responder could not tell commands apart
    pub fn new(assert: u8, deassert: u8) -> Result<Self, Error> {
        if assert == deassert
            {return Err(Error::Config("both commands share the same encoding"))}
        Ok(Self {assert, deassert})
    }
    pub const fn encode(&self, command: Command) -> u8 {
        match command {
            Command::Assert => self.assert,
            Command::Deassert => self.deassert,
        }
    }
    /// `None` for a byte matching neither command
    pub const fn decode(&self, byte: u8) -> Option<Command> {
        if byte == self.assert
            {Some(Command::Assert)}
        else if byte == self.deassert
            {Some(Command::Deassert)}
        else
            {None}
    }
}
impl Default for Encoding {
    fn default() -> Self {
        Self::DEFAULT
    }
}
