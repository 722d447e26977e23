mod sim;

pub use self::sim::{SimCore, SimSleepDrv, SimTimerDrv};
