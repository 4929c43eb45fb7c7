mod common;

use cmdbus::{
    Command, Error, Phase,
    config::Config,
    master::{Scheduler, Stats, Tick},
    };
use common::*;


#[test]
fn waits_a_full_period() {
    init_logging();
    let mut bus = FakeMaster::new();
    let mut scheduler = Scheduler::new(&mut bus, Config::new().with_period(500)).unwrap();

    assert_eq!(scheduler.on_tick(), Tick::Idle);
    assert_eq!(scheduler.ticks(), 1);
    assert!(scheduler.engine().channel().events.is_empty());

    for _ in 1 .. 499 {
        assert_eq!(scheduler.on_tick(), Tick::Idle);
    }
    assert_eq!(scheduler.ticks(), 499);
    assert_eq!(scheduler.on_tick(), Tick::Sent(Command::Assert));
    assert_eq!(scheduler.ticks(), 0);

    for _ in 0 .. 499 {
        assert_eq!(scheduler.on_tick(), Tick::Idle);
    }
    assert_eq!(scheduler.on_tick(), Tick::Sent(Command::Deassert));
    assert_eq!(bus.transmitted(), [0xaa, 0x55]);
}

#[test]
fn counter_steps_by_one_and_resets() {
    init_logging();
    let mut bus = FakeMaster::new();
    let mut scheduler = Scheduler::new(&mut bus, Config::new().with_period(7)).unwrap();
    let mut last = scheduler.ticks();
    assert_eq!(last, 0);
    for _ in 0 .. 100 {
        let tick = scheduler.on_tick();
        let now = scheduler.ticks();
        match tick {
            Tick::Idle => assert_eq!(now, last + 1),
            _ => assert_eq!(now, 0),
        }
        assert!(now < scheduler.period());
        last = now;
    }
}

#[test]
fn commands_strictly_alternate() {
    init_logging();
    let mut bus = FakeMaster::new();
    let mut scheduler = Scheduler::new(&mut bus, Config::new().with_period(3)).unwrap();
    assert_eq!(scheduler.current(), Command::Deassert);

    let sent: Vec<Command> = (0 .. 3 * 20)
        .filter_map(|_| match scheduler.on_tick() {
            Tick::Sent(command) => Some(command),
            _ => None,
            })
        .collect();
    assert_eq!(sent.len(), 20);
    assert_eq!(sent[0], Command::Assert);
    for pair in sent.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(scheduler.stats(), Stats {sent: 20, failed: 0});
}

#[test]
fn absent_responder_does_not_stall() {
    init_logging();
    let mut bus = FakeMaster::silent();
    let config = Config::new().with_period(5).with_poll_limit(50);
    let mut scheduler = Scheduler::new(&mut bus, config).unwrap();

    let mut outcomes = Vec::new();
    for _ in 0 .. 10 {
        let tick = scheduler.on_tick();
        if tick != Tick::Idle {
            outcomes.push(tick);
        }
    }
    assert_eq!(outcomes, [
        Tick::Failed(Command::Assert, Error::Timeout(Phase::Address)),
        Tick::Failed(Command::Deassert, Error::Timeout(Phase::Address)),
        ]);
    assert_eq!(scheduler.ticks(), 0);
    assert_eq!(scheduler.stats(), Stats {sent: 0, failed: 2});
    assert!(bus.transmitted().is_empty());
}

#[test]
fn zero_period_is_refused() {
    let mut bus = FakeMaster::new();
    assert!(matches!(
        Scheduler::new(&mut bus, Config::new().with_period(0)),
        Err(Error::Config(_)),
        ));
}

#[test]
fn default_period_follows_time_base() {
    let bus = FakeMaster::new();
    let scheduler = Scheduler::new(bus, Config::default()).unwrap();
    assert_eq!(scheduler.period(), 500);
    let bus = scheduler.release();
    assert!(bus.events.is_empty());
}
