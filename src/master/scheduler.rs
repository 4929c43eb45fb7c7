use log::*;

use crate::{
    bus::{Address, MasterChannel},
    command::Command,
    config::Config,
    error::Error,
    };
use super::Engine;


/// what happened during one call to [Scheduler::on_tick]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// period not elapsed yet
    Idle,
    /// period elapsed and the command was delivered to the responder's bus interface
    Sent(Command),
    /// period elapsed but the transaction for this command failed
    Failed(Command, Error),
}

/// counts of transactions launched by a [Scheduler]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub sent: u32,
    pub failed: u32,
}

/**
    software divider of a fixed rate time base, sending the next command every `period` ticks

    the command is toggled before each transaction, starting from [Command::Deassert], so the first command sent is [Command::Assert]. A failed transaction is counted and logged but does not stop the alternation.
*/
pub struct Scheduler<C> {
    engine: Engine<C>,
    address: Address,
    period: u32,
    ticks: u32,
    current: Command,
    stats: Stats,
}

impl<C: MasterChannel> Scheduler<C> {
    pub fn new(channel: C, config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            engine: Engine::new(channel, config.encoding, config.poll_limit),
            address: config.address,
            period: config.period,
            ticks: 0,
            current: Command::default(),
            stats: Stats::default(),
        })
    }

    /// to be called once per time base tick
    pub fn on_tick(&mut self) -> Tick {
        self.ticks += 1;
        if self.ticks < self.period
            {return Tick::Idle}

        self.current = self.current.toggled();
        let result = self.engine.send(self.current, self.address);
        self.ticks = 0;

        match result {
            Ok(()) => {
                self.stats.sent = self.stats.sent.wrapping_add(1);
                info!("sent {:?}", self.current);
                Tick::Sent(self.current)
            },
            Err(err) => {
                self.stats.failed = self.stats.failed.wrapping_add(1);
                warn!("failed sending {:?}: {}", self.current, err);
                Tick::Failed(self.current, err)
            },
        }
    }

    /// ticks counted since the last transaction
    pub fn ticks(&self) -> u32  {self.ticks}
    /// ticks between two transactions
    pub fn period(&self) -> u32  {self.period}
    /// last command sent, or the initial value if none was sent yet
    pub fn current(&self) -> Command  {self.current}
    pub fn stats(&self) -> Stats  {self.stats}
    pub fn engine(&self) -> &Engine<C>  {&self.engine}
    pub fn engine_mut(&mut self) -> &mut Engine<C>  {&mut self.engine}
    /// give the channel back
    pub fn release(self) -> C  {self.engine.release()}
}
