/*!
    master role: decide when a command is sent, and send it

    - [Scheduler] divides the fixed rate time base into transaction periods and alternates the [Command](crate::Command) to send
    - [Engine] runs one complete write transaction on a [MasterChannel](crate::bus::MasterChannel)

    both are plain values owned by whoever drives the time base, typically an interrupt handler reaching them through a [BusyMutex](crate::BusyMutex)
*/

/// sequencing of a single bus transaction, this is the tricky part of the code
mod transaction;
/// tick counting and command alternation
mod scheduler;


pub use transaction::Engine;
pub use scheduler::{Scheduler, Tick, Stats};
