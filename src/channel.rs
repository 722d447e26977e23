/// The five fixed channel identities multiplexed onto the shared counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelId {
    /// 1 Hz wall-clock tick, additive self-correcting rearm.
    Tick,
    /// Capture/compare channel shared across heart-rate polling, the
    /// sidereal clock and host-driven polling.
    Aux1,
    /// Stopwatch/eggtimer tick, externally rearmed.
    Stopwatch,
    /// Configurable periodic channel (button auto-repeat, buzzer).
    Periodic,
    /// One-shot blocking delay.
    Delay,
}

impl ChannelId {
    pub const COUNT: usize = 5;

    /// All channels in hardware service priority order.
    pub const ALL: [ChannelId; Self::COUNT] = [
        ChannelId::Tick,
        ChannelId::Aux1,
        ChannelId::Stopwatch,
        ChannelId::Periodic,
        ChannelId::Delay,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-channel state mirrored outside the hardware registers.
#[derive(Clone, Copy, Default)]
pub(crate) struct ChannelState {
    /// Whether the compare interrupt is active.
    pub enabled: bool,
    /// Re-arm distance from the counter value at fire time.
    pub interval: u16,
}
