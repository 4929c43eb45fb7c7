/*!
    periodic command bus between two roles sharing one controller

    - the master role ([master::Scheduler]) counts time base ticks and, once per period, sends the next [Command] to the responder through a complete two-wire transaction ([master::Engine])
    - the slave role ([slave::Responder]) is invoked when a byte arrives and drives an output pin accordingly

    the protocol is open loop: the master never learns what the responder did with its command
*/
#![no_std]
#[cfg(test)]
extern crate std;

mod error;
mod mutex;

pub mod bus;
pub mod command;
pub mod config;
#[cfg(feature = "master")]
pub mod master;
#[cfg(feature = "slave")]
pub mod slave;

pub use command::{Command, Encoding};
pub use error::{Error, Phase};
pub use mutex::{BusyMutex, BusyMutexGuard};
