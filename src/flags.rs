use bitflags::bitflags;

bitflags! {
    /// System-level flags shared across the subsystem boundary.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SysFlags: u8 {
        /// Set by the delay channel fire; consumed by the blocking wait.
        const DELAY_OVER = 1 << 0;
        const IDLE_TIMEOUT = 1 << 1;
        const LOW_BATTERY = 1 << 2;
    }
}

bitflags! {
    /// Display-refresh requests set by the timer core and consumed by the
    /// display module.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DisplayFlags: u8 {
        const UPDATE_TIME = 1 << 0;
        const UPDATE_SIDEREAL = 1 << 1;
        const FULL_UPDATE = 1 << 2;
    }
}

bitflags! {
    /// Measurement and actuation requests raised by the per-second hooks.
    /// The timer core never interprets these.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RequestFlags: u8 {
        const VOLTAGE_MEASUREMENT = 1 << 0;
        const TEMPERATURE_MEASUREMENT = 1 << 1;
        const ALTITUDE_MEASUREMENT = 1 << 2;
        const ACCEL_MEASUREMENT = 1 << 3;
        const BUZZER = 1 << 4;
    }
}
