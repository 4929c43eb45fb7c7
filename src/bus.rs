/*!
    contracts of the two-wire bus channels, as provided by the board

    the master role polls a [MasterChannel], the slave role reads bytes from a [ResponderChannel]. Both are register-level, synchronous and infallible: what can go wrong on the bus is only visible through [Status] flags.

    the output driven by the slave role is an [embedded_hal::digital::OutputPin].
*/

use core::ops::BitOr;
use bilge::prelude::*;

use crate::{
    config::RESPONDER_ADDRESS,
    error::Error,
    };


/// transfer direction announced after the start condition
#[bitsize(1)]
#[derive(Copy, Clone, FromBits, Debug, PartialEq)]
pub enum Direction {
    /// master sends data to the responder
    Write = 0,
    /// master reads data from the responder
    Read = 1,
}

/// first byte of a transaction, sent right after the start condition
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct AddressByte {
    pub direction: Direction,
    pub address: u7,
}

/// 7-bit bus address of a responder
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Address(u7);
impl Address {
    pub const DEFAULT: Self = Self(u7::new(RESPONDER_ADDRESS));

    pub fn new(address: u8) -> Result<Self, Error> {
        if address > 0x7f
            {return Err(Error::Config("bus address exceeds 7 bits"))}
        Ok(Self(u7::new(address)))
    }
    pub fn value(&self) -> u8 {
        self.0.value()
    }
    /// address byte opening a transaction to this responder
    pub fn header(&self, direction: Direction) -> AddressByte {
        AddressByte::new(direction, self.0)
    }
}
impl Default for Address {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// status flags of a master channel
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct Status {
    /// the last byte on the bus was acknowledged by the addressed party
    pub ack_received: bool,
    /// the last byte on the bus was refused by the addressed party
    pub nack_received: bool,
    /// misplaced start/stop or lost arbitration reported by the hardware
    pub error: bool,
    reserved: u5,
}
impl Status {
    /// no flag set
    pub fn empty() -> Self {
        Self::from(0u8)
    }
    /// only [Self::ack_received] set
    pub fn ack() -> Self {
        let mut status = Self::empty();
        status.set_ack_received(true);
        status
    }
    /// only [Self::nack_received] set
    pub fn nack() -> Self {
        let mut status = Self::empty();
        status.set_nack_received(true);
        status
    }
    /// only [Self::error] set
    pub fn fault() -> Self {
        let mut status = Self::empty();
        status.set_error(true);
        status
    }
    /// whether every flag set in `flags` is also set here
    pub fn contains(&self, flags: Self) -> bool {
        let flags = u8::from(flags);
        u8::from(*self) & flags == flags
    }
    /// copy with the flags set in `flags` removed
    pub fn without(self, flags: Self) -> Self {
        Self::from(u8::from(self) & !u8::from(flags))
    }
}
impl BitOr for Status {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self::from(u8::from(self) | u8::from(other))
    }
}


/// channel configured as bus originator
pub trait MasterChannel {
    /// put a start condition on the bus followed by the given address byte
    fn start(&mut self, header: AddressByte);
    /// current status flags
    fn status(&mut self) -> Status;
    /// reset the flags set in `flags`
    fn clear_status(&mut self, flags: Status);
    /// hand one byte to the transmitter
    fn transmit(&mut self, byte: u8);
    /// whether every byte handed to the transmitter has left the hardware
    fn transmit_empty(&mut self) -> bool;
    /// put a stop condition on the bus
    fn stop(&mut self);
}

/// channel configured as bus responder
pub trait ResponderChannel {
    /// read the byte that raised the receive event
    fn received(&mut self) -> u8;
}

impl<T: MasterChannel + ?Sized> MasterChannel for &mut T {
    fn start(&mut self, header: AddressByte)  {T::start(self, header)}
    fn status(&mut self) -> Status  {T::status(self)}
    fn clear_status(&mut self, flags: Status)  {T::clear_status(self, flags)}
    fn transmit(&mut self, byte: u8)  {T::transmit(self, byte)}
    fn transmit_empty(&mut self) -> bool  {T::transmit_empty(self)}
    fn stop(&mut self)  {T::stop(self)}
}
impl<T: ResponderChannel + ?Sized> ResponderChannel for &mut T {
    fn received(&mut self) -> u8  {T::received(self)}
}
