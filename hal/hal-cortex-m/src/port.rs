//! Core peripheral split

use cortex_m::peripheral::{DCB, DWT, SYST};
use mcu_hal::{Clocks, HalError, HalResult};

use crate::clock::ResetClock;
#[cfg(feature = "cycle-counter")]
use crate::cycle::CycleCounter;
use crate::debug::CortexMDebug;
use crate::systick::SysTickSource;

/// Platform capabilities of a Cortex-M core.
///
/// Built from the `cortex_m::Peripherals` singleton, so at most one port
/// exists. Each tick source can be taken once.
pub struct CortexMPort {
    clock: Option<ResetClock>,
    syst: Option<SYST>,
    dwt: Option<DWT>,
    #[cfg_attr(not(feature = "cycle-counter"), allow(dead_code))]
    dcb: DCB,
    debug: CortexMDebug,
}

impl CortexMPort {
    /// Splits the core peripherals. `sysclk_hz` is the frequency the core runs
    /// at when clocks are handed over.
    pub fn new(peripherals: cortex_m::Peripherals, sysclk_hz: u32) -> Self {
        Self {
            clock: Some(ResetClock::new(sysclk_hz)),
            syst: Some(peripherals.SYST),
            dwt: Some(peripherals.DWT),
            dcb: peripherals.DCB,
            debug: CortexMDebug::new(),
        }
    }

    /// Returns the clock capability the first time it is called.
    pub fn take_clock(&mut self) -> Option<ResetClock> {
        self.clock.take()
    }

    /// Takes SysTick, programmed for `tick_hz`.
    ///
    /// # Errors
    ///
    /// - [`HalError::ResourceUnavailable`] if SysTick was already taken.
    /// - [`HalError::ConfigurationError`] if `tick_hz` cannot be produced
    ///   from the core clock.
    pub fn take_systick(&mut self, clocks: &Clocks, tick_hz: u32) -> HalResult<SysTickSource> {
        let syst = self.syst.take().ok_or(HalError::ResourceUnavailable)?;
        SysTickSource::for_rate(syst, clocks, tick_hz)
    }

    /// Takes the DWT cycle counter.
    ///
    /// # Errors
    ///
    /// - [`HalError::ResourceUnavailable`] if it was already taken.
    /// - [`HalError::NotSupported`] if the core has no cycle counter.
    #[cfg(feature = "cycle-counter")]
    pub fn take_cycle_counter(&mut self) -> HalResult<CycleCounter> {
        let dwt = self.dwt.take().ok_or(HalError::ResourceUnavailable)?;
        CycleCounter::new(dwt, &mut self.dcb)
    }

    /// Debug-state query and breakpoint capability.
    pub const fn debug(&self) -> &CortexMDebug {
        &self.debug
    }

    /// The DWT unit, unless the cycle counter has been taken.
    pub fn dwt(&mut self) -> Option<&mut DWT> {
        self.dwt.as_mut()
    }
}
