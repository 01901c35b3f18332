//! Clock subsystem initialization

/// Clock tree bring-up for a platform.
///
/// The capability is consumed by [`init_clocks`], so a platform that hands out
/// its clock capability once can only be initialized once.
pub trait ClockInit {
    /// Configures the clock tree according to the build configuration and
    /// returns the resulting core clock frequency in hertz.
    fn init(self) -> u32;
}

/// Proof that the clock subsystem has been initialized.
///
/// Only [`init_clocks`] produces this token. Binding a
/// [`SystemTimer`](crate::timer::SystemTimer) requires it, so no timer can be
/// started before the clocks are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clocks {
    sysclk_hz: u32,
}

impl Clocks {
    /// Core clock frequency in hertz.
    pub const fn sysclk_hz(&self) -> u32 {
        self.sysclk_hz
    }
}

/// Runs the platform's clock initialization.
pub fn init_clocks<C: ClockInit>(clock: C) -> Clocks {
    let sysclk_hz = clock.init();
    log::info!("clocks initialized: sysclk {} Hz", sysclk_hz);
    Clocks { sysclk_hz }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u32);

    impl ClockInit for FixedClock {
        fn init(self) -> u32 {
            self.0
        }
    }

    #[test]
    fn init_reports_core_clock() {
        let clocks = init_clocks(FixedClock(48_000_000));
        assert_eq!(clocks.sysclk_hz(), 48_000_000);
    }
}
