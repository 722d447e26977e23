use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use crate::{ChannelId, CompareTimer, SleepGovernor};

/// Register file of the simulated timer peripheral.
///
/// Compare-match flags latch whenever the counter crosses a programmed
/// target, whether or not the channel interrupt is enabled, matching the
/// capture/compare hardware this stands in for.
pub struct SimCore {
    counter: u16,
    running: bool,
    compare: [u16; ChannelId::COUNT],
    int_enable: [bool; ChannelId::COUNT],
    pending: [bool; ChannelId::COUNT],
}

impl SimCore {
    fn new() -> Self {
        Self {
            counter: 0,
            running: false,
            compare: [0; ChannelId::COUNT],
            int_enable: [false; ChannelId::COUNT],
            pending: [false; ChannelId::COUNT],
        }
    }

    /// Advance the counter by `ticks` increments, latching compare matches.
    /// Does nothing while the counter is halted.
    pub fn advance(&mut self, ticks: u32) {
        if !self.running {
            return;
        }
        for _ in 0..ticks {
            self.counter = self.counter.wrapping_add(1);
            for ch in ChannelId::ALL {
                if self.compare[ch.index()] == self.counter {
                    self.pending[ch.index()] = true;
                }
            }
        }
    }

    /// Ticks until the next interrupt-enabled compare match, if any.
    /// A target equal to the current counter value matches after a full
    /// counter wrap.
    pub fn ticks_to_next_match(&self) -> Option<u32> {
        let mut nearest: Option<u32> = None;
        for ch in ChannelId::ALL {
            if !self.int_enable[ch.index()] {
                continue;
            }
            let distance = match self.compare[ch.index()].wrapping_sub(self.counter) {
                0 => 0x1_0000,
                d => u32::from(d),
            };
            nearest = Some(match nearest {
                Some(n) => n.min(distance),
                None => distance,
            });
        }
        nearest
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }
}

/// A software compare timer backing host builds and tests.
pub struct SimTimerDrv {
    core: Rc<RefCell<SimCore>>,
}

impl SimTimerDrv {
    pub fn new() -> Self {
        Self {
            core: Rc::new(RefCell::new(SimCore::new())),
        }
    }

    /// A shared handle on the register file, for the sleep driver and for
    /// driving the counter from a test.
    pub fn handle(&self) -> Rc<RefCell<SimCore>> {
        self.core.clone()
    }
}

impl Default for SimTimerDrv {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareTimer for SimTimerDrv {
    fn setup(&mut self) {
        let mut core = self.core.borrow_mut();
        core.counter = 0;
        core.running = true;
    }

    fn run(&mut self) {
        self.core.borrow_mut().running = true;
    }

    fn halt(&mut self) {
        let mut core = self.core.borrow_mut();
        core.running = false;
        core.counter = 0;
    }

    fn is_running(&self) -> bool {
        self.core.borrow().running
    }

    fn counter(&self) -> u16 {
        self.core.borrow().counter
    }

    fn set_compare(&mut self, ch: ChannelId, target: u16) {
        self.core.borrow_mut().compare[ch.index()] = target;
    }

    fn compare(&self, ch: ChannelId) -> u16 {
        self.core.borrow().compare[ch.index()]
    }

    fn enable(&mut self, ch: ChannelId) {
        self.core.borrow_mut().int_enable[ch.index()] = true;
    }

    fn disable(&mut self, ch: ChannelId) {
        self.core.borrow_mut().int_enable[ch.index()] = false;
    }

    fn is_pending(&self, ch: ChannelId) -> bool {
        self.core.borrow().pending[ch.index()]
    }

    fn clear_pending(&mut self, ch: ChannelId) {
        self.core.borrow_mut().pending[ch.index()] = false;
    }
}

/// Sleep governor over the simulated timer: "low-power sleep" advances the
/// counter to the next interrupt-enabled compare match.
pub struct SimSleepDrv {
    core: Rc<RefCell<SimCore>>,
    wakes: Rc<Cell<u32>>,
}

impl SimSleepDrv {
    pub fn new(core: Rc<RefCell<SimCore>>) -> Self {
        Self {
            core,
            wakes: Rc::new(Cell::new(0)),
        }
    }

    /// Shared wake counter, incremented once per wake during a blocking
    /// delay.
    pub fn wakes(&self) -> Rc<Cell<u32>> {
        self.wakes.clone()
    }
}

impl SleepGovernor for SimSleepDrv {
    fn sleep(&mut self) {
        let mut core = self.core.borrow_mut();
        // No enabled compare means a spurious wake; the caller re-checks
        // its completion flag.
        if let Some(ticks) = core.ticks_to_next_match() {
            core.advance(ticks);
        }
    }

    fn on_wake(&mut self) {
        self.wakes.set(self.wakes.get() + 1);
    }
}
