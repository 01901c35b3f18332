//! Hardware Abstraction Layer (HAL) for microcontroller system timers
//!
//! This crate provides a vendor-agnostic system timer built on top of a
//! minimal peripheral trait, plus the small capabilities every port exposes
//! around it: clock bring-up, debugger detection and a hard-coded breakpoint.
//!
//! ## Module Overview
//! - [`ticks`] - Counter storage types and wrap-aware tick arithmetic.
//! - [`peripheral`] - The trait a port implements for one hardware timer.
//! - [`timer`] - [`SystemTimer`]: start/stop, ticks, elapsed, callbacks.
//! - [`callback`] - Interrupt-context callbacks and their exchange slot.
//! - [`clock`] - Clock initialization capability and the [`Clocks`] token.
//! - [`debug`] - Debug-state query and breakpoint capabilities.
//! - [`config`] - Timer configuration.
//!
//! ## Example
//! ```
//! use mcu_hal::{init_clocks, Callback, ClockInit, SystemTimer, TimerConfig, TimerPeripheral};
//!
//! struct BoardClock;
//!
//! impl ClockInit for BoardClock {
//!     fn init(self) -> u32 {
//!         16_000_000
//!     }
//! }
//!
//! struct FreeRunning {
//!     count: u16,
//! }
//!
//! impl TimerPeripheral for FreeRunning {
//!     type Ticks = u16;
//!
//!     fn enable(&mut self) {}
//!     fn disable(&mut self) {}
//!     fn count(&self) -> u16 {
//!         self.count
//!     }
//! }
//!
//! fn on_tick() {}
//!
//! let clocks = init_clocks(BoardClock);
//! let timer = SystemTimer::bind(FreeRunning { count: 0 }, &clocks, TimerConfig::default())?;
//! timer.start();
//! assert!(timer.set_callback(Some(Callback::new(&on_tick))).is_none());
//! let start = timer.ticks();
//! assert_eq!(timer.elapsed(start), 0);
//! # Ok::<(), mcu_hal::HalError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

pub mod callback;
pub mod clock;
pub mod config;
pub mod debug;
pub mod error;
pub mod peripheral;
pub mod ticks;
pub mod timer;

// Re-export commonly used types
pub use callback::{Callback, CallbackSlot, TickHandler};
pub use clock::{init_clocks, ClockInit, Clocks};
pub use config::{TimerConfig, TimerConfigBuilder};
pub use debug::{breakpoint_if_attached, Breakpoint, DebugProbe, DebugState, NoDebugSupport};
pub use error::{HalError, HalResult};
pub use peripheral::TimerPeripheral;
pub use ticks::{CounterWidth, TickValue};
pub use timer::{SystemTimer, TimerState};
