//! ARM Cortex-M port
//!
//! Implements the `mcu-hal` platform capabilities on top of the core
//! peripherals every Cortex-M device shares, so no vendor PAC is needed for
//! the system tick.
//!
//! On ARMv6-M the debug registers are not reliably readable from software,
//! so [`CortexMDebug`] reports `DebugState::Unknown` there and
//! `breakpoint_if_attached` never traps.
//!
//! ## Features
//! - `single-core` - Use the single-core `critical-section` implementation from `cortex-m`
//! - `cycle-counter` - DWT cycle counter as an additional tick source (ARMv7-M and later)
//! - `defmt` - `defmt::Format` for the core types
//!
//! ## Example
//! ```no_run
//! use mcu_hal::{init_clocks, SystemTimer, TimerConfig};
//! use mcu_hal_cortex_m::CortexMPort;
//!
//! let peripherals = cortex_m::Peripherals::take().unwrap();
//! let mut port = CortexMPort::new(peripherals, 16_000_000);
//!
//! let clocks = init_clocks(port.take_clock().unwrap());
//! let config = TimerConfig::builder().tick_hz(1000).build();
//! let systick = port.take_systick(&clocks, config.tick_hz).unwrap();
//! let timer = SystemTimer::bind(systick, &clocks, config).unwrap();
//! timer.start();
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

pub mod clock;
#[cfg(feature = "cycle-counter")]
pub mod cycle;
pub mod debug;
pub mod port;
pub mod systick;

pub use clock::ResetClock;
#[cfg(feature = "cycle-counter")]
pub use cycle::CycleCounter;
pub use debug::CortexMDebug;
pub use port::CortexMPort;
pub use systick::{systick_reload, SysTickSource, SYSTICK_MAX_RELOAD};
