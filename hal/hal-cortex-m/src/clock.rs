//! Reset clock capability

use mcu_hal::ClockInit;

/// Core clock as configured out of reset.
///
/// Clock tree setup is vendor-specific; a board that reprograms its PLL does
/// so before handing the resulting frequency to the port.
#[derive(Debug)]
pub struct ResetClock {
    sysclk_hz: u32,
}

impl ResetClock {
    pub(crate) const fn new(sysclk_hz: u32) -> Self {
        Self { sysclk_hz }
    }
}

impl ClockInit for ResetClock {
    fn init(self) -> u32 {
        self.sysclk_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcu_hal::init_clocks;

    #[test]
    fn reports_configured_frequency() {
        let clocks = init_clocks(ResetClock::new(72_000_000));
        assert_eq!(clocks.sysclk_hz(), 72_000_000);
    }
}
