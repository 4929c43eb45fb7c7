//! test doubles for the bus channels and the output pin

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
    };
use embedded_hal::digital::{ErrorType, OutputPin};

use cmdbus::bus::{AddressByte, MasterChannel, ResponderChannel, Status};


pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// how the simulated responder reacts to a byte
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Answer {
    Ack,
    Nack,
    /// never answers, as if absent from the bus
    Silent,
    /// the hardware reports a bus error instead of an answer
    Fault,
}

/// operation requested on the master channel
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    Start(u8),
    Clear(u8),
    Transmit(u8),
    /// `transmit_empty` answered `true`
    Drained,
    Stop,
}

/// shared byte queue standing for the wire between both channels
pub type Wire = Rc<RefCell<VecDeque<u8>>>;

/// scripted master channel recording every operation
pub struct FakeMaster {
    pub address_answer: Answer,
    pub data_answer: Answer,
    /// number of `transmit_empty` polls answering `false` before the buffer drains
    pub drain_polls: u32,
    /// `false` for a transmit buffer that never drains
    pub drains: bool,
    pub events: Vec<Event>,
    pub status_reads: u32,
    status: Status,
    pending_drain: u32,
    addressed: bool,
    wire: Option<Wire>,
}
impl FakeMaster {
    pub fn new() -> Self {
        Self {
            address_answer: Answer::Ack,
            data_answer: Answer::Ack,
            drain_polls: 2,
            drains: true,
            events: Vec::new(),
            status_reads: 0,
            status: Status::empty(),
            pending_drain: 0,
            addressed: false,
            wire: None,
        }
    }
    /// deliver acknowledged data bytes on the given wire
    pub fn wired(wire: Wire) -> Self {
        Self {wire: Some(wire), .. Self::new()}
    }
    pub fn silent() -> Self {
        Self::new().with_address_answer(Answer::Silent)
    }
    pub fn with_address_answer(mut self, answer: Answer) -> Self {
        self.address_answer = answer;
        self
    }
    pub fn with_data_answer(mut self, answer: Answer) -> Self {
        self.data_answer = answer;
        self
    }
    /// transmit buffer draining after `polls` unsuccessful polls, or never if `drains` is false
    pub fn with_drain(mut self, polls: u32, drains: bool) -> Self {
        self.drain_polls = polls;
        self.drains = drains;
        self
    }
    pub fn transmitted(&self) -> Vec<u8> {
        self.events.iter()
            .filter_map(|event| match event {
                Event::Transmit(byte) => Some(*byte),
                _ => None,
                })
            .collect()
    }
    fn answer(&mut self, answer: Answer) {
        match answer {
            Answer::Ack => self.status = self.status | Status::ack(),
            Answer::Nack => self.status = self.status | Status::nack(),
            Answer::Fault => self.status = self.status | Status::fault(),
            Answer::Silent => {},
        }
    }
}
impl MasterChannel for FakeMaster {
    fn start(&mut self, header: AddressByte) {
        self.events.push(Event::Start(u8::from(header)));
        self.addressed = self.address_answer == Answer::Ack;
        self.answer(self.address_answer);
    }
    fn status(&mut self) -> Status {
        self.status_reads += 1;
        self.status
    }
    fn clear_status(&mut self, flags: Status) {
        self.events.push(Event::Clear(u8::from(flags)));
        self.status = self.status.without(flags);
    }
    fn transmit(&mut self, byte: u8) {
        self.events.push(Event::Transmit(byte));
        self.pending_drain = self.drain_polls;
        self.answer(self.data_answer);
        if self.addressed && self.data_answer == Answer::Ack {
            if let Some(wire) = &self.wire {
                wire.borrow_mut().push_back(byte);
            }
        }
    }
    fn transmit_empty(&mut self) -> bool {
        if !self.drains
            {return false}
        if self.pending_drain > 0 {
            self.pending_drain -= 1;
            return false;
        }
        self.events.push(Event::Drained);
        true
    }
    fn stop(&mut self) {
        self.events.push(Event::Stop);
        self.addressed = false;
    }
}

/// responder channel reading bytes from a wire
pub struct FakeResponder {
    pub wire: Wire,
}
impl ResponderChannel for FakeResponder {
    fn received(&mut self) -> u8 {
        self.wire.borrow_mut().pop_front().expect("receive event without data")
    }
}

/// output pin recording its level and how many times it was driven
#[derive(Clone, Default)]
pub struct Led {
    pub level: Rc<Cell<Option<bool>>>,
    pub writes: Rc<Cell<u32>>,
}
impl ErrorType for Led {
    type Error = Infallible;
}
impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level.set(Some(false));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level.set(Some(true));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
