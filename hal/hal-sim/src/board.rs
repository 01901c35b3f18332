//! Simulated board: the take-once factory for clocks and counters

use std::sync::atomic::{AtomicUsize, Ordering};

use mcu_hal::{
    Breakpoint, ClockInit, CounterWidth, DebugProbe, DebugState, HalError, HalResult, TickValue,
};

use crate::counter::{self, SimCounter, SimCounterConfig, SimCounterDriver};

/// Simulated microcontroller.
///
/// Hands out each counter channel and the clock capability at most once, the
/// way a device's peripheral split does on real hardware.
///
/// # Example
///
/// ```
/// use mcu_hal::{init_clocks, SystemTimer, TimerConfig};
/// use mcu_hal_sim::{SimBoard, SimCounterConfig};
///
/// let mut board = SimBoard::new();
/// let clocks = init_clocks(board.take_clock().unwrap());
/// let (counter, driver) = board.take_counter::<u16>(0, SimCounterConfig::hardware(16))?;
/// let timer = SystemTimer::bind(counter, &clocks, TimerConfig::default())?;
///
/// timer.start();
/// driver.advance(3);
/// assert_eq!(timer.ticks(), 3);
/// # Ok::<(), mcu_hal::HalError>(())
/// ```
#[derive(Debug)]
pub struct SimBoard {
    sysclk_hz: u32,
    clock_taken: bool,
    allocated: Vec<u8>,
    debug_state: DebugState,
    breakpoints: AtomicUsize,
}

impl SimBoard {
    /// Number of counter channels.
    pub const CHANNELS: u8 = 4;

    /// Core clock reported by the simulated clock tree.
    pub const DEFAULT_SYSCLK_HZ: u32 = 48_000_000;

    /// Creates a board without debug support.
    pub fn new() -> Self {
        Self {
            sysclk_hz: Self::DEFAULT_SYSCLK_HZ,
            clock_taken: false,
            allocated: Vec::new(),
            debug_state: DebugState::Unknown,
            breakpoints: AtomicUsize::new(0),
        }
    }

    /// Sets the core clock the clock capability will report.
    pub fn with_sysclk_hz(mut self, sysclk_hz: u32) -> Self {
        self.sysclk_hz = sysclk_hz;
        self
    }

    /// Sets what the debug-state query answers.
    pub fn with_debug_state(mut self, state: DebugState) -> Self {
        self.debug_state = state;
        self
    }

    /// Takes the clock capability. Returns `None` after the first call.
    pub fn take_clock(&mut self) -> Option<SimClock> {
        if self.clock_taken {
            return None;
        }
        self.clock_taken = true;
        Some(SimClock {
            sysclk_hz: self.sysclk_hz,
        })
    }

    /// Takes counter `channel` with storage type `T`.
    ///
    /// # Errors
    ///
    /// - [`HalError::InvalidParameter`] if the channel does not exist or the
    ///   width does not fit `T`.
    /// - [`HalError::ResourceUnavailable`] if the channel was already taken.
    pub fn take_counter<T: TickValue>(
        &mut self,
        channel: u8,
        config: SimCounterConfig,
    ) -> HalResult<(SimCounter<T>, SimCounterDriver<T>)> {
        if channel >= Self::CHANNELS {
            log::warn!("counter channel {} does not exist", channel);
            return Err(HalError::InvalidParameter);
        }
        if self.allocated.contains(&channel) {
            log::warn!("counter channel {} already taken", channel);
            return Err(HalError::ResourceUnavailable);
        }
        let width = CounterWidth::<T>::new(config.width).ok_or(HalError::InvalidParameter)?;
        self.allocated.push(channel);
        Ok(counter::pair(width, config))
    }

    /// Number of breakpoints hit so far.
    pub fn breakpoints(&self) -> usize {
        self.breakpoints.load(Ordering::SeqCst)
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugProbe for SimBoard {
    fn debug_state(&self) -> DebugState {
        self.debug_state
    }
}

impl Breakpoint for SimBoard {
    /// Records the trap instead of halting the host process.
    fn breakpoint(&self) {
        let hits = self.breakpoints.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("breakpoint hit ({} so far)", hits);
    }
}

/// Clock capability of a [`SimBoard`].
#[derive(Debug)]
pub struct SimClock {
    sysclk_hz: u32,
}

impl ClockInit for SimClock {
    fn init(self) -> u32 {
        self.sysclk_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcu_hal::breakpoint_if_attached;

    #[test]
    fn clock_is_taken_once() {
        let mut board = SimBoard::new().with_sysclk_hz(16_000_000);
        let clock = board.take_clock().unwrap();
        assert!(board.take_clock().is_none());
        assert_eq!(clock.init(), 16_000_000);
    }

    #[test]
    fn channels_are_taken_once() {
        let mut board = SimBoard::new();
        assert!(board
            .take_counter::<u32>(0, SimCounterConfig::hardware(32))
            .is_ok());
        assert_eq!(
            board
                .take_counter::<u32>(0, SimCounterConfig::hardware(32))
                .err(),
            Some(HalError::ResourceUnavailable)
        );
        assert!(board
            .take_counter::<u16>(1, SimCounterConfig::hardware(16))
            .is_ok());
        assert_eq!(
            board
                .take_counter::<u16>(SimBoard::CHANNELS, SimCounterConfig::hardware(16))
                .err(),
            Some(HalError::InvalidParameter)
        );
    }

    #[test]
    fn rejected_width_leaves_channel_free() {
        let mut board = SimBoard::new();
        assert_eq!(
            board
                .take_counter::<u16>(2, SimCounterConfig::hardware(24))
                .err(),
            Some(HalError::InvalidParameter)
        );
        assert!(board
            .take_counter::<u32>(2, SimCounterConfig::hardware(24))
            .is_ok());
    }

    #[test]
    fn board_without_debug_support_reports_unknown() {
        let board = SimBoard::new();
        assert_eq!(board.debug_state(), DebugState::Unknown);
        assert_eq!(breakpoint_if_attached(&board), DebugState::Unknown);
        assert_eq!(board.breakpoints(), 0);
    }

    #[test]
    fn breakpoint_traps_with_debugger_attached() {
        let board = SimBoard::new().with_debug_state(DebugState::Enabled);
        assert_eq!(breakpoint_if_attached(&board), DebugState::Enabled);
        assert_eq!(board.breakpoints(), 1);

        let board = SimBoard::new().with_debug_state(DebugState::Disabled);
        breakpoint_if_attached(&board);
        assert_eq!(board.breakpoints(), 0);
    }
}
