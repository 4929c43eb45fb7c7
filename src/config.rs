/*!
    compile-time settings of the command bus, and the [Config] value gathering them for runtime components
*/

use crate::{
    bus::Address,
    command::Encoding,
    error::Error,
    };


/// rate of the time base calling [crate::master::Scheduler::on_tick], in Hz
pub const TICKS_PER_SECOND: u32 = 1000;
/// delay between two commands sent by the master, in milliseconds
pub const SEND_PERIOD_MS: u32 = 500;
/// byte setting the responder's output high
pub const ASSERT_CODE: u8 = 0xaa;
/// byte setting the responder's output low
pub const DEASSERT_CODE: u8 = 0x55;
/// 7-bit bus address the responder listens on
pub const RESPONDER_ADDRESS: u8 = 0x50;
/// interrupt priority of the responder's receive event, lowest so the time base can preempt it
pub const RECEIVE_PRIORITY: u8 = 0xf0;
/// number of status reads before a transaction phase is declared stalled
pub const POLL_LIMIT: u32 = 100_000;


/// number of ticks between two transactions for the given tick rate (Hz) and period (ms)
///
/// saturates at `u32::MAX` ticks
pub const fn period_ticks(tick_rate: u32, period_ms: u32) -> u32 {
    let ticks = (tick_rate as u64 * period_ms as u64) / 1000;
    if ticks > u32::MAX as u64
        {u32::MAX}
    else
        {ticks as u32}
}


/// settings of the master role
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// ticks between two transactions
    pub period: u32,
    /// responder the commands are sent to
    pub address: Address,
    /// wire bytes of commands
    pub encoding: Encoding,
    /// status reads allowed per waiting phase
    pub poll_limit: u32,
}
impl Config {
    pub const fn new() -> Self {
        Self {
            period: period_ticks(TICKS_PER_SECOND, SEND_PERIOD_MS),
            address: Address::DEFAULT,
            encoding: Encoding::DEFAULT,
            poll_limit: POLL_LIMIT,
        }
    }
    pub const fn with_period(mut self, ticks: u32) -> Self {
        self.period = ticks;
        self
    }
    pub const fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
    pub const fn with_poll_limit(mut self, polls: u32) -> Self {
        self.poll_limit = polls;
        self
    }
    /// check settings that cannot be enforced by types
    pub fn validate(&self) -> Result<(), Error> {
        if self.period == 0
            {return Err(Error::Config("period must be at least one tick"))}
        if self.poll_limit == 0
            {return Err(Error::Config("poll limit must allow at least one status read"))}
        Ok(())
    }
}
impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
