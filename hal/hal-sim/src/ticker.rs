//! Periodic interrupt simulation
//!
//! A [`SimTicker`] stands in for the timer interrupt: a dedicated thread that
//! clocks the counter one tick per period and enters the timer's ISR entry
//! point. Sleeps target absolute deadlines on the monotonic clock so the
//! tick rate does not drift.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use mcu_hal::{SystemTimer, TickValue};
use thiserror::Error;

use crate::counter::{SimCounter, SimCounterDriver};

/// Fastest supported tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 10_000;

/// Nanoseconds per second
const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Errors that can occur while starting a ticker.
#[derive(Error, Debug)]
pub enum TickerError {
    #[error("tick rate must be between 1 and 10000 Hz, got {0}")]
    InvalidRate(u32),
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Thread delivering periodic timer interrupts.
///
/// Stops when dropped.
pub struct SimTicker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    rate_hz: u32,
}

impl SimTicker {
    /// Starts delivering `rate_hz` interrupts per second to `timer`.
    pub fn spawn<T: TickValue>(
        timer: Arc<SystemTimer<SimCounter<T>>>,
        driver: SimCounterDriver<T>,
        rate_hz: u32,
    ) -> Result<Self, TickerError> {
        if rate_hz == 0 || rate_hz > MAX_TICK_RATE_HZ {
            return Err(TickerError::InvalidRate(rate_hz));
        }

        let period = Duration::from_nanos(NSEC_PER_SEC / rate_hz as u64);
        let running = Arc::new(AtomicBool::new(true));
        let handle = {
            let running = running.clone();
            thread::Builder::new()
                .name(format!("{}-isr", timer.config().name))
                .spawn(move || ticker_thread(&timer, &driver, period, &running))?
        };
        log::debug!("ticker started at {} Hz", rate_hz);

        Ok(Self {
            running,
            handle: Some(handle),
            rate_hz,
        })
    }

    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    /// Stops delivering interrupts and waits for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("ticker thread panicked");
            }
            log::debug!("ticker stopped");
        }
    }
}

impl Drop for SimTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn ticker_thread<T: TickValue>(
    timer: &SystemTimer<SimCounter<T>>,
    driver: &SimCounterDriver<T>,
    period: Duration,
    running: &AtomicBool,
) {
    let mut next_tick = Instant::now();

    while running.load(Ordering::Relaxed) {
        next_tick += period;

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }

        driver.advance(T::ONE);
        timer.on_interrupt();
    }
}
