use crate::ChannelId;

/// The hardware seam: one free-running 16-bit counter with a compare
/// register and interrupt control per channel.
pub trait CompareTimer {
    /// Program the counter to free-run from zero in continuous mode.
    fn setup(&mut self);

    /// Start the counter without touching any programmed compare target.
    fn run(&mut self);

    /// Stop the counter and reset it to zero.
    fn halt(&mut self);

    /// Get whether the counter is running.
    fn is_running(&self) -> bool;

    /// The current free-running counter value.
    fn counter(&self) -> u16;

    /// Program the compare target for a channel.
    fn set_compare(&mut self, ch: ChannelId, target: u16);

    /// Read back the programmed compare target.
    fn compare(&self, ch: ChannelId) -> u16;

    /// Enable the compare-match interrupt for a channel.
    fn enable(&mut self, ch: ChannelId);

    /// Disable the compare-match interrupt for a channel.
    fn disable(&mut self, ch: ChannelId);

    /// Get whether a compare match is pending.
    fn is_pending(&self, ch: ChannelId) -> bool;

    /// Clear a pending compare match.
    fn clear_pending(&mut self, ch: ChannelId);
}
