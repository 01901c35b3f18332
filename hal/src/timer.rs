//! System timer
//!
//! [`SystemTimer`] owns one [`TimerPeripheral`] and layers the tick
//! abstraction on top of it:
//!
//! - a `Stopped`/`Running` state machine with idempotent transitions,
//! - a logical tick count that never goes backwards across stop/start pairs,
//!   even on hardware that clears its counter when disabled,
//! - wrap-aware elapsed-tick computation at the hardware's real width,
//! - an exchangeable callback run from the timer interrupt.
//!
//! All methods take `&self`. State shared with the interrupt handler sits
//! behind critical sections, so a timer can be placed in a `static` and
//! driven from both foreground code and the ISR.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::callback::{Callback, CallbackSlot};
use crate::clock::Clocks;
use crate::config::TimerConfig;
use crate::error::{HalError, HalResult};
use crate::peripheral::TimerPeripheral;
use crate::ticks::{CounterWidth, TickValue};

/// Run state of a system timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Stopped => defmt::write!(fmt, "Stopped"),
            Self::Running => defmt::write!(fmt, "Running"),
        }
    }
}

struct TimerInner<P: TimerPeripheral> {
    peripheral: P,
    state: TimerState,
    width: CounterWidth<P::Ticks>,
    resets_on_disable: bool,
    /// Logical count accumulated before the last hardware reset.
    offset: P::Ticks,
}

impl<P: TimerPeripheral> TimerInner<P> {
    fn logical_ticks(&self) -> P::Ticks {
        let raw = self.width.truncate(self.peripheral.count());
        self.width.advance(self.offset, raw)
    }
}

/// Tick timer bound to exactly one hardware peripheral.
pub struct SystemTimer<P: TimerPeripheral> {
    inner: Mutex<RefCell<TimerInner<P>>>,
    callback: CallbackSlot,
    config: TimerConfig,
}

impl<P: TimerPeripheral> SystemTimer<P> {
    /// Binds `peripheral` as a system timer.
    ///
    /// The clock token guarantees the clock subsystem is up. The peripheral
    /// is disabled and the timer starts out [`TimerState::Stopped`] with no
    /// callback installed.
    ///
    /// # Errors
    ///
    /// - [`HalError::InvalidParameter`] if the peripheral reports a counter
    ///   width of zero or wider than its storage type.
    /// - [`HalError::ConfigurationError`] if the tick rate is zero or faster
    ///   than the core clock.
    pub fn bind(mut peripheral: P, clocks: &Clocks, config: TimerConfig) -> HalResult<Self> {
        let Some(width) = CounterWidth::new(peripheral.width()) else {
            log::warn!(
                "{}: unsupported counter width of {} bits",
                config.name,
                peripheral.width()
            );
            return Err(HalError::InvalidParameter);
        };
        if config.tick_hz == 0 || config.tick_hz > clocks.sysclk_hz() {
            log::warn!(
                "{}: tick rate {} Hz not achievable from {} Hz core clock",
                config.name,
                config.tick_hz,
                clocks.sysclk_hz()
            );
            return Err(HalError::ConfigurationError);
        }

        peripheral.disable();
        let resets_on_disable = peripheral.resets_on_disable();
        log::debug!(
            "{}: bound {}-bit counter at {} Hz{}",
            config.name,
            width.bits(),
            config.tick_hz,
            if resets_on_disable { " (resets on disable)" } else { "" }
        );

        Ok(Self {
            inner: Mutex::new(RefCell::new(TimerInner {
                peripheral,
                state: TimerState::Stopped,
                width,
                resets_on_disable,
                offset: P::Ticks::ZERO,
            })),
            callback: CallbackSlot::new(),
            config,
        })
    }

    /// Starts counting. No effect if already running.
    pub fn start(&self) {
        let started = critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.state == TimerState::Running {
                return false;
            }
            inner.peripheral.enable();
            inner.state = TimerState::Running;
            true
        });
        if started {
            log::debug!("{}: started", self.config.name);
        }
    }

    /// Stops counting. No effect if already stopped.
    ///
    /// The tick count is preserved; if the hardware clears its counter on
    /// disable, the count is carried over in software.
    pub fn stop(&self) {
        let stopped_at = critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.state == TimerState::Stopped {
                return None;
            }
            let snapshot = inner.logical_ticks();
            inner.peripheral.disable();
            if inner.resets_on_disable {
                inner.offset = snapshot;
            }
            inner.state = TimerState::Stopped;
            Some(snapshot)
        });
        if let Some(ticks) = stopped_at {
            log::debug!("{}: stopped at {} ticks", self.config.name, ticks);
        }
    }

    pub fn state(&self) -> TimerState {
        critical_section::with(|cs| self.inner.borrow_ref(cs).state)
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// Current tick count.
    ///
    /// Valid in either state; while stopped it returns the count latched at
    /// the last stop.
    pub fn ticks(&self) -> P::Ticks {
        critical_section::with(|cs| self.inner.borrow_ref(cs).logical_ticks())
    }

    /// Ticks elapsed since `reference`, modulo the counter width.
    ///
    /// Correct across a counter wrap-around between the two readings, as
    /// long as less than one full counter period has passed.
    pub fn elapsed(&self, reference: P::Ticks) -> P::Ticks {
        critical_section::with(|cs| {
            let inner = self.inner.borrow_ref(cs);
            inner.width.elapsed(inner.logical_ticks(), reference)
        })
    }

    /// Installs `callback` and returns the previously installed one.
    ///
    /// `None` uninstalls. Once this returns, the interrupt handler only ever
    /// sees the new value.
    pub fn set_callback(&self, callback: Option<Callback>) -> Option<Callback> {
        let previous = self.callback.exchange(callback);
        log::trace!(
            "{}: callback {} (previous {})",
            self.config.name,
            if callback.is_some() { "installed" } else { "cleared" },
            if previous.is_some() { "replaced" } else { "none" }
        );
        previous
    }

    pub fn callback_installed(&self) -> bool {
        self.callback.is_installed()
    }

    /// Timer interrupt entry point.
    ///
    /// Call this from the platform's ISR for the bound peripheral. While
    /// running, it acknowledges the peripheral and runs the installed
    /// callback. The callback runs inside the critical section guarding the
    /// callback slot, so it may read the timer or exchange the callback but
    /// must be short.
    pub fn on_interrupt(&self) {
        critical_section::with(|cs| {
            {
                let mut inner = self.inner.borrow_ref_mut(cs);
                if inner.state != TimerState::Running {
                    return;
                }
                inner.peripheral.acknowledge();
            }
            self.callback.invoke(cs);
        });
    }

    /// Significant width of the bound counter.
    pub fn width(&self) -> CounterWidth<P::Ticks> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).width)
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Converts a tick count to microseconds at the configured tick rate.
    pub fn ticks_to_micros(&self, ticks: P::Ticks) -> u64 {
        self.config.ticks_to_micros(ticks.to_u64())
    }

    /// Stops the timer and returns the peripheral.
    pub fn release(self) -> P {
        self.stop();
        self.inner.into_inner().into_inner().peripheral
    }
}

impl<P: TimerPeripheral> fmt::Debug for SystemTimer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemTimer")
            .field("name", &self.config.name)
            .field("state", &self.state())
            .field("ticks", &self.ticks())
            .field("callback", &self.callback.current())
            .finish()
    }
}
