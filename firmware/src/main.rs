//! both bus roles on one STM32F412
//!
//! I2C1 (PB6 SCL, PB7 SDA) sends commands to I2C3 (PA8 SCL, PC9 SDA), the two buses being wired together outside the chip.
//! The user LED on PC13 follows the commands received by I2C3.

#![no_std]
#![no_main]

use cortex_m::peripheral::{NVIC, syst::SystClkSource};
use cortex_m_rt::{entry, exception};
use log::*;
use panic_rtt_target as _;
use rtt_target::rtt_init_log;
use stm32f4xx_hal::{
    gpio::{Output, PushPull, PC13},
    interrupt,
    pac::{self, GPIOA, GPIOB, GPIOC},
    prelude::*,
};

use cmdbus::{
    BusyMutex, Encoding,
    bus::Address,
    config::{self, Config},
    master::Scheduler,
    slave::Responder,
    };

mod channels;
use channels::{Listener, Originator};


/// driven by the time base exception
static SCHEDULER: BusyMutex<Option<Scheduler<Originator>>> = BusyMutex::new(None);
/// driven by the responder's event interrupt
static RESPONDER: BusyMutex<Option<Responder<Listener, PC13<Output<PushPull>>>>> = BusyMutex::new(None);


#[entry]
fn main() -> ! {
    rtt_init_log!(LevelFilter::Info);

    // nothing can run without the peripherals, a failure here halts in the panic handler
    let dp = pac::Peripherals::take().expect("cannot take device peripherals");
    let mut cp = cortex_m::Peripherals::take().expect("cannot take core peripherals");

    // register level setup needs RCC before the hal takes it over
    channels::enable_clocks(&dp.RCC);
    dp.RCC.ahb1enr.modify(|_, w| {
        w.gpioaen().enabled();
        w.gpioben().enabled();
        w.gpiocen().enabled();
        w
    });
    setup_bus_pins(&dp.GPIOA, &dp.GPIOB, &dp.GPIOC);

    let clocks = dp.RCC.constrain()
        .cfgr
        .use_hse(25.MHz())
        .sysclk(48.MHz())
        .pclk1(24.MHz())
        .freeze();
    let pclk1 = clocks.pclk1().raw();
    info!("clocks ready, sysclk {} Hz, pclk1 {} Hz", clocks.sysclk().raw(), pclk1);

    let address = Address::new(config::RESPONDER_ADDRESS).expect("invalid responder address");
    let config = Config::new()
        .with_address(address)
        .with_period(config::period_ticks(config::TICKS_PER_SECOND, config::SEND_PERIOD_MS));
    let scheduler = Scheduler::new(Originator::new(dp.I2C1, pclk1), config)
        .expect("invalid bus configuration");

    let led = dp.GPIOC.split().pc13.into_push_pull_output();
    let responder = Responder::new(Listener::new(dp.I2C3, pclk1, address), led, Encoding::DEFAULT);

    SCHEDULER.try_lock().expect("scheduler already taken").replace(scheduler);
    RESPONDER.try_lock().expect("responder already taken").replace(responder);

    // the receive path must be routed before the time base starts sending
    unsafe {
        cp.NVIC.set_priority(interrupt::I2C3_EV, config::RECEIVE_PRIORITY);
        NVIC::unmask(interrupt::I2C3_EV);
    }

    let mut syst = cp.SYST;
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(clocks.sysclk().raw() / config::TICKS_PER_SECOND - 1);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
    info!("time base started, one command every {} ms", config::SEND_PERIOD_MS);

    #[allow(clippy::empty_loop)]
    loop {
        // WFI stops the debug clock and prevents halting from the probe, keep it for release builds
        #[cfg(not(debug_assertions))]
        cortex_m::asm::wfi();
    }
}

/// open drain alternate function 4 with pull ups on PB6, PB7, PA8 and PC9
fn setup_bus_pins(gpioa: &GPIOA, gpiob: &GPIOB, gpioc: &GPIOC) {
    gpiob.afrl.modify(|_, w| {
        w.afrl6().af4();
        w.afrl7().af4();
        w
    });
    gpiob.otyper.modify(|_, w| {
        w.ot6().open_drain();
        w.ot7().open_drain();
        w
    });
    gpiob.pupdr.modify(|_, w| {
        w.pupdr6().pull_up();
        w.pupdr7().pull_up();
        w
    });
    gpiob.moder.modify(|_, w| {
        w.moder6().alternate();
        w.moder7().alternate();
        w
    });

    gpioa.afrh.modify(|_, w| w.afrh8().af4());
    gpioa.otyper.modify(|_, w| w.ot8().open_drain());
    gpioa.pupdr.modify(|_, w| w.pupdr8().pull_up());
    gpioa.moder.modify(|_, w| w.moder8().alternate());

    gpioc.afrh.modify(|_, w| w.afrh9().af4());
    gpioc.otyper.modify(|_, w| w.ot9().open_drain());
    gpioc.pupdr.modify(|_, w| w.pupdr9().pull_up());
    gpioc.moder.modify(|_, w| w.moder9().alternate());
}


#[exception]
fn SysTick() {
    // a failed transaction is already logged by the scheduler
    if let Some(mut scheduler) = SCHEDULER.try_lock() {
        if let Some(scheduler) = scheduler.as_mut() {
            scheduler.on_tick();
        }
    }
}

#[interrupt]
fn I2C3_EV() {
    let Some(responder) = RESPONDER.try_lock() else {
        warn!("receive event while responder unavailable");
        return;
    };
    let Some(responder) = responder.as_ref()
        else {return};
    let Some(events) = responder.with_channel(|listener| listener.events()) else {
        warn!("receive event while responder busy");
        return;
    };
    if !events.received
        {return}
    if let Err(err) = responder.on_byte_received() {
        warn!("receive event dropped: {}", err);
    }
}
