/*!
    slave role: apply commands received on the responder channel to an output pin

    [Interpreter] holds the decoding logic, [Responder] binds it to a [ResponderChannel] and guards it against re-entrant invocation from interrupt handlers.
*/

use core::convert::Infallible;
use embedded_hal::digital::OutputPin;
use log::*;

use crate::{
    mutex::*,
    bus::ResponderChannel,
    command::{Command, Encoding},
    error::Error,
    };


/// result of interpreting one received byte
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// the byte encoded this command, and the output was driven accordingly
    Applied(Command),
    /// the byte matched no command, the output was left untouched
    Unknown(u8),
}

/// counts of bytes interpreted
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub applied: u32,
    pub unknown: u32,
}

/// decode command bytes and drive an output pin
pub struct Interpreter<P> {
    output: P,
    encoding: Encoding,
    stats: Stats,
}
impl<P: OutputPin<Error = Infallible>> Interpreter<P> {
    pub fn new(output: P, encoding: Encoding) -> Self {
        Self {output, encoding, stats: Stats::default()}
    }
    /// apply the command encoded by `byte`, if any
    pub fn interpret(&mut self, byte: u8) -> Outcome {
        let Some(command) = self.encoding.decode(byte) else {
            self.stats.unknown = self.stats.unknown.wrapping_add(1);
            warn!("ignore unknown command byte {:#04x}", byte);
            return Outcome::Unknown(byte);
        };
        let result = if command.level()
            {self.output.set_high()}
        else
            {self.output.set_low()};
        result.unwrap_or_else(|never| match never {});
        self.stats.applied = self.stats.applied.wrapping_add(1);
        debug!("applied {:?}", command);
        Outcome::Applied(command)
    }
    pub fn stats(&self) -> Stats  {self.stats}
    pub fn output(&self) -> &P  {&self.output}
    pub fn output_mut(&mut self) -> &mut P  {&mut self.output}
}


/**
    receive event handler of the slave role

    [Self::on_byte_received] is meant to be called from the responder's receive interrupt. It is not reentrant: a call made while another one is still running does not touch the channel nor the output, and returns [Error::Busy].
*/
pub struct Responder<C, P> {
    control: BusyMutex<ResponderControl<C, P>>,
}
struct ResponderControl<C, P> {
    channel: C,
    interpreter: Interpreter<P>,
}

impl<C: ResponderChannel, P: OutputPin<Error = Infallible>> Responder<C, P> {
    pub fn new(channel: C, output: P, encoding: Encoding) -> Self {
        Self {
            control: BusyMutex::new(ResponderControl {
                channel,
                interpreter: Interpreter::new(output, encoding),
            }),
        }
    }
    /// read exactly one byte from the channel and apply it
    pub fn on_byte_received(&self) -> Result<Outcome, Error> {
        let Some(mut control) = self.control.try_lock() else {
            warn!("receive handler reentered");
            return Err(Error::Busy);
        };
        let ResponderControl {channel, interpreter} = &mut *control;
        let byte = channel.received();
        debug!("received {:#04x}", byte);
        Ok(interpreter.interpret(byte))
    }
    /// counts of interpreted bytes, `None` while a receive event is being handled
    pub fn stats(&self) -> Option<Stats> {
        self.control.try_lock().map(|control| control.interpreter.stats())
    }
    /// run `task` on the output pin, `None` while a receive event is being handled
    pub fn with_output<R>(&self, task: impl FnOnce(&mut P) -> R) -> Option<R> {
        self.control.try_lock().map(|mut control| task(control.interpreter.output_mut()))
    }
    /// run `task` on the channel, for the framing events it must acknowledge besides data, `None` while a receive event is being handled
    pub fn with_channel<R>(&self, task: impl FnOnce(&mut C) -> R) -> Option<R> {
        self.control.try_lock().map(|mut control| task(&mut control.channel))
    }
    pub fn release(self) -> (C, P) {
        let control = self.control.into_inner();
        (control.channel, control.interpreter.output)
    }
}
