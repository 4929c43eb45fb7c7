use thiserror::Error;

/// step of a master transaction that can stall
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// waiting for the responder to acknowledge its address
    Address,
    /// waiting for the responder to acknowledge the command byte
    Data,
    /// waiting for the transmit buffer to drain before stop
    Drain,
}

/// error regarding the command bus
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("responder did not answer in time during {0:?} phase")]
    Timeout(Phase),
    #[error("responder refused the transfer during {0:?} phase")]
    Nack(Phase),
    #[error("bus error during {0:?} phase")]
    Bus(Phase),
    #[error("handler invoked while a previous invocation is still running")]
    Busy,
    #[error("invalid configuration: {0}")]
    Config(&'static str),
}
