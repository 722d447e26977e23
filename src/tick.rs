pub trait Tick {
    /// The tick frequency, i.e. the number of counter increments per second.
    const FREQ: u32;
}

/// The 32768 Hz watch crystal tick.
pub struct WatchTick;

impl Tick for WatchTick {
    const FREQ: u32 = 32768;
}
