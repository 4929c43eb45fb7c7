//! register level bus channels on the STM32F4 I2C peripherals

use stm32f4xx_hal::pac::{I2C1, I2C3, RCC};

use cmdbus::{
    bus::{Address, AddressByte, MasterChannel, ResponderChannel, Status},
    config::POLL_LIMIT,
    };


/// standard mode bus clock, in Hz
const BUS_CLOCK: u32 = 100_000;

/// feed both I2C peripherals with the APB1 clock
pub fn enable_clocks(rcc: &RCC) {
    rcc.apb1enr.modify(|_, w| {
        w.i2c1en().enabled();
        w.i2c3en().enabled();
        w
    });
}


/// I2C1 as bus originator, driven by polling only
pub struct Originator(I2C1);

impl Originator {
    /// `pclk1` is the APB1 clock in Hz
    pub fn new(i2c: I2C1, pclk1: u32) -> Self {
        let mhz = (pclk1 / 1_000_000) as u8;
        i2c.cr2.modify(|_, w| unsafe { w.freq().bits(mhz) });
        // standard mode, symmetric high and low periods
        i2c.ccr.modify(|_, w| unsafe { w.ccr().bits((pclk1 / (2 * BUS_CLOCK)) as u16) });
        i2c.trise.write(|w| w.trise().bits(mhz + 1));
        i2c.cr1.modify(|_, w| w.pe().enabled());
        Self(i2c)
    }
}

impl MasterChannel for Originator {
    fn start(&mut self, header: AddressByte) {
        let i2c = &self.0;
        i2c.cr1.modify(|_, w| w.start().start());
        // the address byte is only accepted once the start condition is on the bus
        // if it never settles, nothing is sent and the engine times out waiting for the address ack
        for _ in 0 .. POLL_LIMIT {
            if i2c.sr1.read().sb().is_start() {
                i2c.dr.write(|w| w.dr().bits(u8::from(header)));
                return;
            }
            core::hint::spin_loop();
        }
    }
    fn status(&mut self) -> Status {
        let sr1 = self.0.sr1.read();
        let mut status = Status::empty();
        // ADDR for the address phase, BTF for the data phase
        status.set_ack_received(sr1.addr().bit_is_set() || sr1.btf().bit_is_set());
        status.set_nack_received(sr1.af().bit_is_set());
        status.set_error(sr1.berr().bit_is_set() || sr1.arlo().bit_is_set());
        status
    }
    fn clear_status(&mut self, flags: Status) {
        let i2c = &self.0;
        if flags.ack_received() {
            // ADDR clears by reading SR2 after SR1, BTF clears with the next start or stop
            i2c.sr2.read();
        }
        if flags.nack_received() {
            i2c.sr1.modify(|_, w| w.af().clear_bit());
        }
        if flags.error() {
            i2c.sr1.modify(|_, w| {
                w.berr().clear_bit();
                w.arlo().clear_bit();
                w
            });
        }
    }
    fn transmit(&mut self, byte: u8) {
        self.0.dr.write(|w| w.dr().bits(byte));
    }
    fn transmit_empty(&mut self) -> bool {
        let sr1 = self.0.sr1.read();
        sr1.tx_e().is_empty() && sr1.btf().bit_is_set()
    }
    fn stop(&mut self) {
        self.0.cr1.modify(|_, w| w.stop().stop());
    }
}


/// I2C3 as bus responder, raising an event interrupt for each received byte
pub struct Listener(I2C3);

impl Listener {
    pub fn new(i2c: I2C3, pclk1: u32, address: Address) -> Self {
        i2c.cr2.modify(|_, w| unsafe { w.freq().bits((pclk1 / 1_000_000) as u8) });
        i2c.oar1.modify(|_, w| {
            w.addmode().add7();
            w.add().bits(u16::from(address.value()) << 1);
            w
        });
        // without stretching, the address and data phases are acknowledged by hardware
        // even while the receive interrupt is preempted by the time base
        i2c.cr1.modify(|_, w| w.nostretch().set_bit());
        i2c.cr2.modify(|_, w| {
            w.itevten().enabled();
            w.itbufen().enabled();
            w
        });
        i2c.cr1.modify(|_, w| w.pe().enabled());
        i2c.cr1.modify(|_, w| w.ack().ack());
        Self(i2c)
    }
}

impl ResponderChannel for Listener {
    fn received(&mut self) -> u8 {
        self.0.dr.read().dr().bits()
    }
}

/// event flags of the responder peripheral that need no interpretation
pub struct ListenerEvents {
    /// the responder got addressed
    pub addressed: bool,
    /// a byte waits in the receive register
    pub received: bool,
    /// the master ended the transaction
    pub stopped: bool,
}

impl Listener {
    /// read and acknowledge the framing events of the peripheral
    ///
    /// only status and control registers are touched, a pending byte stays in DR for [ResponderChannel::received]
    pub fn events(&mut self) -> ListenerEvents {
        let i2c = &self.0;
        let sr1 = i2c.sr1.read();
        let events = ListenerEvents {
            addressed: sr1.addr().is_match(),
            received: sr1.rx_ne().is_not_empty(),
            stopped: sr1.stopf().is_stop(),
        };
        // ADDR clears by reading SR2 after SR1, STOPF by writing CR1 after SR1
        if events.addressed {
            i2c.sr2.read();
        }
        if events.stopped {
            i2c.cr1.modify(|_, w| w);
        }
        events
    }
}
