//! Timer peripheral binding

use crate::ticks::TickValue;

/// One physical timer/counter peripheral.
///
/// Platform crates implement this for the register block of a single timer
/// instance. Values of the implementing type must only be obtainable from a
/// take-once platform factory (for example a split of the device's
/// peripherals), so that two [`SystemTimer`](crate::timer::SystemTimer)s can
/// never be bound to the same hardware.
///
/// None of the methods may block. They are called with interrupts masked.
pub trait TimerPeripheral: Send {
    /// Storage type of the counter register.
    type Ticks: TickValue;

    /// Starts the hardware count.
    fn enable(&mut self);

    /// Halts the hardware count.
    fn disable(&mut self);

    /// Raw counter value as currently latched by the hardware.
    fn count(&self) -> Self::Ticks;

    /// Number of significant counter bits.
    fn width(&self) -> u32 {
        <Self::Ticks as TickValue>::BITS
    }

    /// Whether [`disable`](Self::disable) also clears the counter.
    fn resets_on_disable(&self) -> bool {
        false
    }

    /// Clears the pending timer interrupt.
    ///
    /// Sources that count ticks in software (one tick per interrupt) advance
    /// their count here. Only called while the timer is running.
    fn acknowledge(&mut self) {}
}
