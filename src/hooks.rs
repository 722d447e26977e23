/// Fixed per-second hooks dispatched from the 1 Hz tick channel.
///
/// Every hook is O(1) and non-blocking; the whole set must complete well
/// within one tick period. All hooks default to no-ops so an assembly only
/// implements the services it compiles in.
pub trait SecondHooks {
    /// Advance the wall clock by one second.
    fn clock_tick(&mut self) {}

    /// Whether the radio stack currently owns the system. While it does,
    /// the per-second services below are frozen; only the clock advances.
    fn radio_busy(&mut self) -> bool {
        false
    }

    /// Trigger the battery voltage measurement cadence.
    fn battery_tick(&mut self) {}

    /// Evaluate the alarm and hourly chime.
    fn alarm_tick(&mut self) {}

    /// Count down temperature/altitude/acceleration measurements and stop
    /// them on timeout.
    fn measurement_tick(&mut self) {}

    /// Low-battery message cadence.
    fn lobatt_tick(&mut self) {}

    /// Idle-timeout detection.
    fn idle_tick(&mut self) {}

    /// Backlight countdown.
    fn backlight_tick(&mut self) {}

    /// Button long-press edge detection from raw level samples.
    fn button_tick(&mut self) {}
}

impl SecondHooks for () {}

/// Stopwatch/eggtimer seam for the externally rearmed channel.
///
/// Both concerns live behind one implementation and always run together;
/// they are not mutually exclusive.
pub trait SplitHooks {
    /// Compute the next compare target from the one that just matched.
    fn rearm(&mut self, target: u16) -> u16 {
        target
    }

    /// Advance the stopwatch and eggtimer counters.
    fn tick(&mut self) {}
}

impl SplitHooks for () {}

/// The shared low-power sleep/wake contract.
///
/// Every compare handler leaves the system ready to re-enter `sleep`; the
/// blocking delay primitive loops on `sleep` until its completion flag is
/// raised, servicing `on_wake` once per pass.
pub trait SleepGovernor {
    /// Suspend the processor until the next interrupt.
    fn sleep(&mut self);

    /// Request an exit from the low-power state when the current interrupt
    /// returns.
    fn wake(&mut self) {}

    /// Secondary concern serviced once per wake during a blocking delay,
    /// e.g. a partial stopwatch display refresh.
    fn on_wake(&mut self) {}
}
