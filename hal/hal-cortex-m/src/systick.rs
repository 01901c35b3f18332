//! SysTick tick source
//!
//! SysTick is a 24-bit down-counter that reloads and raises an exception each
//! time it reaches zero. The counter is programmed so that one reload period
//! equals one tick, and ticks are counted in software from the exception.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use mcu_hal::{Clocks, HalError, HalResult, TimerPeripheral};

/// Largest value the 24-bit reload register holds.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Reload value producing `tick_hz` exceptions per second from the core clock.
///
/// # Errors
///
/// [`HalError::ConfigurationError`] if `tick_hz` is zero or the resulting
/// reload value does not fit the 24-bit register.
pub fn systick_reload(sysclk_hz: u32, tick_hz: u32) -> HalResult<u32> {
    if tick_hz == 0 {
        return Err(HalError::ConfigurationError);
    }
    match (sysclk_hz / tick_hz).checked_sub(1) {
        Some(reload) if (1..=SYSTICK_MAX_RELOAD).contains(&reload) => Ok(reload),
        _ => {
            log::warn!(
                "SysTick cannot produce {} Hz from {} Hz core clock",
                tick_hz,
                sysclk_hz
            );
            Err(HalError::ConfigurationError)
        }
    }
}

/// System tick driven by the SysTick exception.
///
/// The software count is a full 32-bit value and survives disable, so the
/// timer never needs to carry an offset for it.
pub struct SysTickSource {
    syst: SYST,
    ticks: u32,
    reload: u32,
}

impl SysTickSource {
    /// Programs `syst` for `tick_hz` exceptions per second from the core clock.
    pub fn for_rate(mut syst: SYST, clocks: &Clocks, tick_hz: u32) -> HalResult<Self> {
        let reload = systick_reload(clocks.sysclk_hz(), tick_hz)?;
        syst.disable_counter();
        syst.disable_interrupt();
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(reload);
        syst.clear_current();
        Ok(Self {
            syst,
            ticks: 0,
            reload,
        })
    }

    pub fn reload(&self) -> u32 {
        self.reload
    }

    /// Returns the raw peripheral.
    pub fn free(self) -> SYST {
        self.syst
    }
}

impl TimerPeripheral for SysTickSource {
    type Ticks = u32;

    fn enable(&mut self) {
        self.syst.clear_current();
        self.syst.enable_interrupt();
        self.syst.enable_counter();
    }

    fn disable(&mut self) {
        self.syst.disable_counter();
        self.syst.disable_interrupt();
    }

    fn count(&self) -> u32 {
        self.ticks
    }

    fn acknowledge(&mut self) {
        // COUNTFLAG clears on read
        if self.syst.has_wrapped() {
            self.ticks = self.ticks.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_for_one_khz_tick() {
        assert_eq!(systick_reload(16_000_000, 1000), Ok(15_999));
        assert_eq!(systick_reload(72_000_000, 1000), Ok(71_999));
    }

    #[test]
    fn reload_must_fit_24_bits() {
        assert_eq!(systick_reload(16_777_216, 1), Ok(SYSTICK_MAX_RELOAD));
        assert_eq!(systick_reload(16_777_218, 1), Err(HalError::ConfigurationError));
        assert_eq!(systick_reload(168_000_000, 1), Err(HalError::ConfigurationError));
    }

    #[test]
    fn reload_rejects_degenerate_rates() {
        assert_eq!(systick_reload(1_000_000, 0), Err(HalError::ConfigurationError));
        assert_eq!(systick_reload(1_000_000, 1_000_000), Err(HalError::ConfigurationError));
        assert_eq!(systick_reload(1_000_000, 2_000_000), Err(HalError::ConfigurationError));
        assert_eq!(systick_reload(1_000_000, 500_000), Ok(1));
    }
}
