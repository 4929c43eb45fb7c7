use log::*;

use crate::{
    bus::{Address, Direction, MasterChannel, Status},
    command::{Command, Encoding},
    error::{Error, Phase},
    };


/**
    executes master write transactions on a bus channel

    a transaction is `start+address`, `ack`, `data`, `ack`, `drain`, `stop`. Every wait is a bounded poll of the channel status, so a responder that never answers yields [Error::Timeout] instead of freezing the caller. A refused byte or a bus error ends the transaction at once. Nothing but the channel and settings is kept between transactions.
*/
pub struct Engine<C> {
    channel: C,
    encoding: Encoding,
    poll_limit: u32,
}

impl<C: MasterChannel> Engine<C> {
    pub fn new(channel: C, encoding: Encoding, poll_limit: u32) -> Self {
        Self {channel, encoding, poll_limit}
    }
    pub fn channel(&self) -> &C  {&self.channel}
    pub fn channel_mut(&mut self) -> &mut C  {&mut self.channel}
    pub fn release(self) -> C  {self.channel}
    pub fn encoding(&self) -> Encoding  {self.encoding}

    /**
        send one command to the given responder, returning once the stop condition is issued

        the stop condition is issued even when a phase fails, so the bus is released for the next transaction. No retry is attempted.
    */
    pub fn send(&mut self, command: Command, address: Address) -> Result<(), Error> {
        let result = self.exchange(command, address);
        self.channel.stop();
        match result {
            Ok(()) => debug!("transaction to {:#04x} done", address.value()),
            Err(err) => warn!("transaction to {:#04x} aborted: {}", address.value(), err),
        }
        result
    }

    fn exchange(&mut self, command: Command, address: Address) -> Result<(), Error> {
        debug!("start transaction to {:#04x}", address.value());
        self.channel.start(address.header(Direction::Write));
        self.acknowledge(Phase::Address)?;

        let byte = self.encoding.encode(command);
        debug!("transmit {:?} as {:#04x}", command, byte);
        self.channel.transmit(byte);
        self.acknowledge(Phase::Data)?;

        // the stop condition must not cut the byte still shifting out
        self.drain()
    }

    /// wait for the responder to acknowledge the last byte, and consume the flag
    fn acknowledge(&mut self, phase: Phase) -> Result<(), Error> {
        for _ in 0 .. self.poll_limit {
            let status = self.channel.status();
            if status.error() {
                self.channel.clear_status(Status::fault());
                return Err(Error::Bus(phase));
            }
            if status.ack_received() {
                self.channel.clear_status(Status::ack());
                return Ok(());
            }
            if status.nack_received() {
                self.channel.clear_status(Status::nack());
                return Err(Error::Nack(phase));
            }
            core::hint::spin_loop();
        }
        Err(Error::Timeout(phase))
    }

    fn drain(&mut self) -> Result<(), Error> {
        for _ in 0 .. self.poll_limit {
            if self.channel.transmit_empty()
                {return Ok(())}
            core::hint::spin_loop();
        }
        Err(Error::Timeout(Phase::Drain))
    }
}
