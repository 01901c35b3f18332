//! DWT cycle counter tick source

use cortex_m::peripheral::{DCB, DWT};
use mcu_hal::{HalError, HalResult, TimerPeripheral};

/// Free-running 32-bit counter incrementing once per core clock cycle.
///
/// CYCCNT keeps its value while disabled. There is no interrupt, so a timer
/// bound to it is polled and never sees `on_interrupt`.
pub struct CycleCounter {
    dwt: DWT,
}

impl CycleCounter {
    /// Enables trace and takes over the cycle counter.
    ///
    /// # Errors
    ///
    /// [`HalError::NotSupported`] if the DWT unit has no cycle counter.
    pub fn new(mut dwt: DWT, dcb: &mut DCB) -> HalResult<Self> {
        if !DWT::has_cycle_counter() {
            log::warn!("DWT has no cycle counter");
            return Err(HalError::NotSupported);
        }
        dcb.enable_trace();
        dwt.disable_cycle_counter();
        Ok(Self { dwt })
    }

    pub fn free(self) -> DWT {
        self.dwt
    }
}

impl TimerPeripheral for CycleCounter {
    type Ticks = u32;

    fn enable(&mut self) {
        self.dwt.enable_cycle_counter();
    }

    fn disable(&mut self) {
        self.dwt.disable_cycle_counter();
    }

    fn count(&self) -> u32 {
        DWT::cycle_count()
    }
}
