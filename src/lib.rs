//! One hardware timer, five logical timing channels.
//!
//! A single free-running 16-bit counter with per-channel compare registers
//! is multiplexed into the cooperative schedule of an embedded wristwatch:
//! the 1 Hz wall-clock tick, a shared capture/compare channel, the
//! stopwatch/eggtimer tick, a configurable periodic channel and a one-shot
//! blocking delay. Hardware sits behind the [`CompareTimer`] seam; a
//! simulated driver in [`drivers`] backs host builds and tests.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod adapters;
mod channel;
pub mod drivers;
mod flags;
mod hooks;
mod mux;
mod tick;

pub use self::{
    adapters::timer::CompareTimer,
    channel::ChannelId,
    flags::{DisplayFlags, RequestFlags, SysFlags},
    hooks::{SecondHooks, SleepGovernor, SplitHooks},
    mux::{Aux1Fire, Handler, HandlerSlot, Owner, TimerError, TimerMux},
    tick::{Tick, WatchTick},
};
