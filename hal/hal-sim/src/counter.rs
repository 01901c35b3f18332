//! Simulated timer/counter peripherals

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use critical_section::Mutex;
use mcu_hal::{CounterWidth, TickValue, TimerPeripheral};

/// What moves the simulated counter forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    /// A free-running hardware register clocked through [`SimCounterDriver::advance`].
    Hardware,
    /// One tick per acknowledged interrupt, counted in software.
    Interrupt,
}

/// Shape of a simulated counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimCounterConfig {
    pub width: u32,
    pub resets_on_disable: bool,
    pub source: CountSource,
}

impl SimCounterConfig {
    /// Free-running counter that holds its value while disabled.
    pub const fn hardware(width: u32) -> Self {
        Self {
            width,
            resets_on_disable: false,
            source: CountSource::Hardware,
        }
    }

    /// Free-running counter that clears itself when disabled.
    pub const fn resetting(width: u32) -> Self {
        Self {
            width,
            resets_on_disable: true,
            source: CountSource::Hardware,
        }
    }

    /// Periodic interrupt source whose ticks are counted in software.
    pub const fn interrupt_counted(width: u32) -> Self {
        Self {
            width,
            resets_on_disable: false,
            source: CountSource::Interrupt,
        }
    }
}

#[derive(Clone, Copy)]
struct RegisterState<T> {
    count: T,
    enabled: bool,
}

/// Register block shared by the peripheral and driver halves.
///
/// The enable bit and the count sit behind one lock so a clock edge can never
/// land after the counter has been disabled.
struct Registers<T> {
    state: Mutex<Cell<RegisterState<T>>>,
    acknowledged: AtomicU64,
}

impl<T: TickValue> Registers<T> {
    fn read(&self) -> RegisterState<T> {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    fn modify<R>(&self, f: impl FnOnce(&mut RegisterState<T>) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let result = f(&mut state);
            cell.set(state);
            result
        })
    }
}

pub(crate) fn pair<T: TickValue>(
    width: CounterWidth<T>,
    config: SimCounterConfig,
) -> (SimCounter<T>, SimCounterDriver<T>) {
    let regs = Arc::new(Registers {
        state: Mutex::new(Cell::new(RegisterState {
            count: T::ZERO,
            enabled: false,
        })),
        acknowledged: AtomicU64::new(0),
    });
    let counter = SimCounter {
        regs: regs.clone(),
        width,
        config,
    };
    let driver = SimCounterDriver {
        regs,
        width,
        source: config.source,
    };
    (counter, driver)
}

/// Peripheral half of a simulated counter, bound into a
/// [`SystemTimer`](mcu_hal::SystemTimer).
pub struct SimCounter<T: TickValue> {
    regs: Arc<Registers<T>>,
    width: CounterWidth<T>,
    config: SimCounterConfig,
}

impl<T: TickValue> SimCounter<T> {
    pub fn config(&self) -> SimCounterConfig {
        self.config
    }
}

impl<T: TickValue> TimerPeripheral for SimCounter<T> {
    type Ticks = T;

    fn enable(&mut self) {
        self.regs.modify(|regs| regs.enabled = true);
    }

    fn disable(&mut self) {
        let resets = self.config.resets_on_disable;
        self.regs.modify(|regs| {
            regs.enabled = false;
            if resets {
                regs.count = T::ZERO;
            }
        });
    }

    fn count(&self) -> T {
        self.regs.read().count
    }

    fn width(&self) -> u32 {
        self.width.bits()
    }

    fn resets_on_disable(&self) -> bool {
        self.config.resets_on_disable
    }

    fn acknowledge(&mut self) {
        self.regs.acknowledged.fetch_add(1, Ordering::SeqCst);
        if self.config.source == CountSource::Interrupt {
            let width = self.width;
            self.regs
                .modify(|regs| regs.count = width.advance(regs.count, T::ONE));
        }
    }
}

/// Hardware half of a simulated counter: the oscillator and the register
/// view a logic analyser would give.
#[derive(Clone)]
pub struct SimCounterDriver<T: TickValue> {
    regs: Arc<Registers<T>>,
    width: CounterWidth<T>,
    source: CountSource,
}

impl<T: TickValue> SimCounterDriver<T> {
    /// Clocks a hardware-counted register by `ticks`.
    ///
    /// Returns false when nothing moved: the counter is disabled or counts
    /// interrupts instead.
    pub fn advance(&self, ticks: T) -> bool {
        if self.source != CountSource::Hardware {
            return false;
        }
        let width = self.width;
        self.regs.modify(|regs| {
            if regs.enabled {
                regs.count = width.advance(regs.count, ticks);
            }
            regs.enabled
        })
    }

    /// Raw register value.
    pub fn raw(&self) -> T {
        self.regs.read().count
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.read().enabled
    }

    /// Number of interrupts acknowledged by the bound timer.
    pub fn acknowledged(&self) -> u64 {
        self.regs.acknowledged.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> CountSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_counter_moves_only_when_enabled() {
        let width = CounterWidth::<u16>::full();
        let (mut counter, driver) = pair(width, SimCounterConfig::hardware(16));

        assert!(!driver.advance(5));
        assert_eq!(counter.count(), 0);

        counter.enable();
        assert!(driver.advance(5));
        assert_eq!(counter.count(), 5);

        counter.disable();
        assert!(!driver.advance(5));
        assert_eq!(driver.raw(), 5);
    }

    #[test]
    fn resetting_counter_clears_on_disable() {
        let width = CounterWidth::<u32>::new(24).unwrap();
        let (mut counter, driver) = pair(width, SimCounterConfig::resetting(24));
        counter.enable();
        driver.advance(0x00FF_FFFF);
        driver.advance(3);
        assert_eq!(counter.count(), 2);

        counter.disable();
        assert_eq!(driver.raw(), 0);
    }

    #[test]
    fn interrupt_counter_advances_on_acknowledge() {
        let width = CounterWidth::<u8>::full();
        let (mut counter, driver) = pair(width, SimCounterConfig::interrupt_counted(8));
        counter.enable();
        assert!(!driver.advance(1));

        for _ in 0..258 {
            counter.acknowledge();
        }
        assert_eq!(counter.count(), 2);
        assert_eq!(driver.acknowledged(), 258);
    }
}
