use alloc::boxed::Box;
use core::marker::PhantomData;

use log::{debug, trace, warn};

use crate::{
    channel::ChannelState, ChannelId, CompareTimer, DisplayFlags, SecondHooks, SleepGovernor,
    SplitHooks, SysFlags, Tick,
};

/// A feature-provided fire handler for a multiplexed channel.
pub type Handler = Box<dyn FnMut() + 'static>;

/// Features that may own a runtime-multiplexed channel.
///
/// At most one owner is active per channel at a time; arming with a
/// different owner while the previous one is still active is a reported
/// conflict, not a silent rebind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    ButtonRepeat,
    Buzzer,
    Gps,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TimerError {
    /// Another owner is still active on the multiplexed channel.
    Conflict { channel: ChannelId, held_by: Owner },
    /// The channel cannot be armed through this call.
    BadChannel(ChannelId),
}

/// The single active-owner slot of a runtime-multiplexed channel.
///
/// Exactly the most recently bound handler runs on each fire; there is no
/// queuing of earlier bindings.
#[derive(Default)]
pub struct HandlerSlot {
    owner: Option<Owner>,
    handler: Option<Handler>,
}

/// On-fire strategy for the Aux1 channel, selected once at system assembly.
pub enum Aux1Fire {
    /// Heart-rate radio poll task. The radio stack schedules its own polls
    /// through `start`; the core does not rearm this variant.
    HeartRate(Handler),
    /// Sidereal second tick. Rearms additively from the previous target,
    /// alternating between a short and a long period to average out the
    /// non-integer sidereal ticks-per-second ratio.
    Sidereal {
        on_second: Handler,
        short: u16,
        long: u16,
        parity: bool,
    },
    /// Host-driven polling protocol: relative-to-now rearm plus a handler
    /// slot claimed at runtime.
    HostPoll(HandlerSlot),
}

impl Aux1Fire {
    /// Sidereal strategy at the 32768 Hz watch tick rate: one sidereal
    /// second is 32768 / 1.00273790935 ~ 32678.5 ticks, alternated as
    /// 32679/32678.
    pub fn sidereal_watch(on_second: Handler) -> Self {
        Self::Sidereal {
            on_second,
            short: 32678,
            long: 32679,
            parity: false,
        }
    }

    pub fn host_poll() -> Self {
        Self::HostPoll(HandlerSlot::default())
    }
}

/// One hardware timer multiplexed into the five logical channels that pace
/// the watch: the 1 Hz wall-clock tick, the shared Aux1 channel, the
/// stopwatch/eggtimer tick, the configurable periodic channel and the
/// one-shot blocking delay.
///
/// All channels share the free-running 16-bit counter behind `Hw`. Each
/// compare handler rearms its own channel before returning and leaves the
/// system ready to re-enter the shared low-power sleep state.
pub struct TimerMux<T: Tick, Hw: CompareTimer, H: SecondHooks, S: SplitHooks, G: SleepGovernor> {
    hw: Hw,
    hooks: H,
    split: S,
    governor: G,
    aux1: Aux1Fire,
    periodic: HandlerSlot,
    channels: [ChannelState; ChannelId::COUNT],
    sys: SysFlags,
    display: DisplayFlags,
    tick: PhantomData<T>,
}

impl<T, Hw, H, S, G> TimerMux<T, Hw, H, S, G>
where
    T: Tick,
    Hw: CompareTimer,
    H: SecondHooks,
    S: SplitHooks,
    G: SleepGovernor,
{
    /// Ticks per wall-clock second, as programmed into the Tick channel.
    pub const PERIOD: u16 = T::FREQ as u16;

    pub fn new(hw: Hw, aux1: Aux1Fire, hooks: H, split: S, governor: G, _tick: T) -> Self {
        Self {
            hw,
            hooks,
            split,
            governor,
            aux1,
            periodic: HandlerSlot::default(),
            channels: [ChannelState::default(); ChannelId::COUNT],
            sys: SysFlags::empty(),
            display: DisplayFlags::empty(),
            tick: PhantomData,
        }
    }

    /// Program the counter to free-run, arm the Tick channel at a one
    /// second period and start counting.
    pub fn init(&mut self) {
        self.hw.setup();
        self.hw.set_compare(ChannelId::Tick, Self::PERIOD.wrapping_sub(1));
        self.hw.clear_pending(ChannelId::Tick);
        self.hw.enable(ChannelId::Tick);
        self.channels[ChannelId::Tick.index()] = ChannelState {
            enabled: true,
            interval: Self::PERIOD,
        };
        self.hw.run();
        debug!("timer running at {} ticks/s", T::FREQ);
    }

    /// Resume the counter. The programmed period is untouched.
    pub fn run(&mut self) {
        self.hw.run();
    }

    /// Stop the counter and reset it to zero.
    pub fn halt(&mut self) {
        self.hw.halt();
        debug!("counter halted");
    }

    /// Arm a channel with a fixed on-fire behavior, `ticks` from now.
    ///
    /// Valid for Stopwatch and for Aux1 when its strategy was fixed at
    /// assembly; runtime-multiplexed channels go through [`Self::start_owned`].
    /// `ticks == 0` is clamped to 1 (fire on the next counter increment).
    /// Arming an already-armed channel overwrites the previous target.
    pub fn start(&mut self, ch: ChannelId, ticks: u16) -> Result<(), TimerError> {
        match ch {
            ChannelId::Stopwatch => {}
            ChannelId::Aux1 => {
                if matches!(self.aux1, Aux1Fire::HostPoll(_)) {
                    return Err(TimerError::BadChannel(ch));
                }
            }
            _ => return Err(TimerError::BadChannel(ch)),
        }
        self.arm(ch, ticks);
        Ok(())
    }

    /// Arm a runtime-multiplexed channel on behalf of `owner`, binding
    /// `handler` as its on-fire behavior.
    ///
    /// Reports a conflict while a different owner's arming is still active;
    /// once the channel is stopped, any owner may rebind it.
    pub fn start_owned(
        &mut self,
        ch: ChannelId,
        owner: Owner,
        ticks: u16,
        handler: Handler,
    ) -> Result<(), TimerError> {
        let enabled = self.channels[ch.index()].enabled;
        let slot = match ch {
            ChannelId::Periodic => &mut self.periodic,
            ChannelId::Aux1 => match &mut self.aux1 {
                Aux1Fire::HostPoll(slot) => slot,
                _ => return Err(TimerError::BadChannel(ch)),
            },
            _ => return Err(TimerError::BadChannel(ch)),
        };
        if enabled {
            if let Some(held) = slot.owner {
                if held != owner {
                    warn!("{:?} claim on {:?} rejected, held by {:?}", owner, ch, held);
                    return Err(TimerError::Conflict {
                        channel: ch,
                        held_by: held,
                    });
                }
            }
        }
        slot.owner = Some(owner);
        slot.handler = Some(handler);
        self.arm(ch, ticks);
        Ok(())
    }

    /// Disable a channel's compare interrupt. The stored interval and any
    /// bound handler survive; a compare match already in flight fires once
    /// more and is benign, as it will not be rearmed.
    pub fn stop(&mut self, ch: ChannelId) {
        self.hw.disable(ch);
        self.channels[ch.index()].enabled = false;
        trace!("{:?} stopped", ch);
    }

    /// Block for `ticks` counter increments, suspended in low power
    /// between wake events.
    ///
    /// A defined no-op while the counter is halted, so the wait can never
    /// become unbounded. The governor's `on_wake` is serviced once per
    /// wake while waiting.
    pub fn delay(&mut self, ticks: u16) {
        if !self.hw.is_running() {
            trace!("delay skipped: counter halted");
            return;
        }
        let ch = ChannelId::Delay;
        self.hw.disable(ch);
        self.sys.remove(SysFlags::DELAY_OVER);
        self.arm(ch, ticks);
        trace!("delay of {} ticks begins", ticks);
        loop {
            self.governor.sleep();
            self.service();
            self.governor.on_wake();
            if self.sys.contains(SysFlags::DELAY_OVER) {
                break;
            }
        }
        trace!("delay over");
    }

    /// Service pending compare matches in hardware priority order. The
    /// host-side stand-in for the interrupt controller.
    pub fn service(&mut self) {
        for ch in ChannelId::ALL {
            if self.channels[ch.index()].enabled && self.hw.is_pending(ch) {
                self.on_compare(ch);
            }
        }
    }

    /// Interrupt-context entry: dispatch one channel's compare match.
    pub fn on_compare(&mut self, ch: ChannelId) {
        match ch {
            ChannelId::Tick => self.fire_tick(),
            ChannelId::Aux1 => self.fire_aux1(),
            ChannelId::Stopwatch => self.fire_stopwatch(),
            ChannelId::Periodic => self.fire_periodic(),
            ChannelId::Delay => self.fire_delay(),
        }
        // Exit from low power when the interrupt returns.
        self.governor.wake();
    }

    /// Arm `ch` relative to the current counter value.
    fn arm(&mut self, ch: ChannelId, ticks: u16) {
        // Zero is undefined at the hardware level; define it as
        // fire-on-next-tick.
        let ticks = ticks.max(1);
        let target = self.hw.counter().wrapping_add(ticks);
        self.channels[ch.index()].interval = ticks;
        self.hw.set_compare(ch, target);
        self.hw.clear_pending(ch);
        self.hw.enable(ch);
        self.channels[ch.index()].enabled = true;
        trace!("{:?} armed: target {} (+{})", ch, target, ticks);
    }

    fn fire_tick(&mut self) {
        let ch = ChannelId::Tick;
        // Self-reentrancy guard while the handler body runs.
        self.hw.disable(ch);
        self.hw.clear_pending(ch);
        // Additive rearm from the previous target: the schedule stays
        // locked to the virtual 1 Hz grid regardless of handler latency.
        let next = self.hw.compare(ch).wrapping_add(Self::PERIOD);
        self.hw.set_compare(ch, next);
        self.hw.enable(ch);

        self.hooks.clock_tick();
        self.display.insert(DisplayFlags::UPDATE_TIME);

        if self.hooks.radio_busy() {
            // Radio stack owns the system: freeze the per-second services.
            return;
        }

        self.hooks.battery_tick();
        self.hooks.alarm_tick();
        self.hooks.measurement_tick();
        self.hooks.lobatt_tick();
        self.hooks.idle_tick();
        self.hooks.backlight_tick();
        self.hooks.button_tick();
    }

    fn fire_aux1(&mut self) {
        let ch = ChannelId::Aux1;
        match &mut self.aux1 {
            Aux1Fire::HeartRate(poll) => {
                self.hw.clear_pending(ch);
                poll();
            }
            Aux1Fire::Sidereal {
                on_second,
                short,
                long,
                parity,
            } => {
                self.hw.disable(ch);
                self.hw.clear_pending(ch);
                let step = if *parity { *short } else { *long };
                *parity = !*parity;
                let next = self.hw.compare(ch).wrapping_add(step);
                self.hw.set_compare(ch, next);
                self.hw.enable(ch);
                on_second();
                self.display.insert(DisplayFlags::UPDATE_SIDEREAL);
            }
            Aux1Fire::HostPoll(slot) => {
                self.hw.disable(ch);
                self.hw.clear_pending(ch);
                // Relative-to-now rearm: handler latency shows up as
                // schedule jitter, which this channel accepts.
                let next = self
                    .hw
                    .counter()
                    .wrapping_add(self.channels[ch.index()].interval);
                self.hw.set_compare(ch, next);
                self.hw.enable(ch);
                if let Some(handler) = slot.handler.as_mut() {
                    handler();
                }
            }
        }
    }

    fn fire_stopwatch(&mut self) {
        let ch = ChannelId::Stopwatch;
        self.hw.disable(ch);
        self.hw.clear_pending(ch);
        // The stopwatch/eggtimer bookkeeping owns this channel's schedule.
        let next = self.split.rearm(self.hw.compare(ch));
        self.hw.set_compare(ch, next);
        self.hw.enable(ch);
        self.split.tick();
    }

    fn fire_periodic(&mut self) {
        let ch = ChannelId::Periodic;
        self.hw.disable(ch);
        self.hw.clear_pending(ch);
        let next = self
            .hw
            .counter()
            .wrapping_add(self.channels[ch.index()].interval);
        self.hw.set_compare(ch, next);
        self.hw.enable(ch);
        if let Some(handler) = self.periodic.handler.as_mut() {
            handler();
        }
    }

    fn fire_delay(&mut self) {
        let ch = ChannelId::Delay;
        self.hw.disable(ch);
        self.channels[ch.index()].enabled = false;
        self.hw.clear_pending(ch);
        self.sys.insert(SysFlags::DELAY_OVER);
    }

    /// The current free-running counter value.
    pub fn counter(&self) -> u16 {
        self.hw.counter()
    }

    pub fn is_running(&self) -> bool {
        self.hw.is_running()
    }

    pub fn is_enabled(&self, ch: ChannelId) -> bool {
        self.channels[ch.index()].enabled
    }

    /// The re-arm interval stored by the last arming of `ch`.
    pub fn interval(&self, ch: ChannelId) -> u16 {
        self.channels[ch.index()].interval
    }

    /// The programmed compare target of `ch`.
    pub fn target(&self, ch: ChannelId) -> u16 {
        self.hw.compare(ch)
    }

    pub fn sys_flags(&self) -> SysFlags {
        self.sys
    }

    pub fn display_flags(&self) -> DisplayFlags {
        self.display
    }

    /// Consume the pending display-refresh requests.
    pub fn take_display_flags(&mut self) -> DisplayFlags {
        let flags = self.display;
        self.display = DisplayFlags::empty();
        flags
    }
}
