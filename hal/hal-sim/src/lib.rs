//! Host simulation platform
//!
//! Runs the HAL's system timer on a development machine. The simulated board
//! hands out counter peripherals the way a device's peripheral split does,
//! each paired with a driver handle that plays the role of the hardware
//! oscillator, and a ticker thread plays the role of the timer interrupt.
//!
//! Critical sections are provided by the `std` implementation of
//! `critical-section`.

pub mod board;
pub mod counter;
pub mod ticker;

// Re-export commonly used types
pub use board::{SimBoard, SimClock};
pub use counter::{CountSource, SimCounter, SimCounterConfig, SimCounterDriver};
pub use ticker::{SimTicker, TickerError, MAX_TICK_RATE_HZ};
