//! Interrupt-context tick callbacks
//!
//! A callback is a `'static` reference to a [`TickHandler`]. The slot holding
//! it is shared between foreground code and the timer interrupt, so every
//! access goes through a critical section: the interrupt handler can never
//! observe a half-written reference, and a callback that has been replaced is
//! never invoked again once the exchange has returned.

use core::cell::Cell;
use core::fmt;

use critical_section::{CriticalSection, Mutex};

/// Work to run from the timer interrupt.
///
/// Implemented for every `Fn() + Sync`, so plain functions qualify:
///
/// ```
/// use mcu_hal::callback::Callback;
///
/// fn on_tick() {}
///
/// let callback = Callback::new(&on_tick);
/// callback.invoke();
/// ```
pub trait TickHandler: Sync {
    /// Called once per timer interrupt. Must not block.
    fn on_tick(&self);
}

impl<F> TickHandler for F
where
    F: Fn() + Sync,
{
    fn on_tick(&self) {
        self()
    }
}

/// Installed tick callback.
#[derive(Clone, Copy)]
pub struct Callback {
    handler: &'static dyn TickHandler,
}

impl Callback {
    /// Wraps a handler that lives for the rest of the program.
    pub const fn new(handler: &'static dyn TickHandler) -> Self {
        Self { handler }
    }

    /// Runs the handler.
    #[inline]
    pub fn invoke(&self) {
        self.handler.on_tick();
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.handler as *const dyn TickHandler as *const () as usize;
        f.debug_tuple("Callback")
            .field(&format_args!("{:#x}", addr))
            .finish()
    }
}

/// Slot holding at most one [`Callback`].
pub struct CallbackSlot {
    slot: Mutex<Cell<Option<Callback>>>,
}

impl CallbackSlot {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Installs `callback` and returns the one it replaced.
    ///
    /// Passing `None` uninstalls the current callback.
    pub fn exchange(&self, callback: Option<Callback>) -> Option<Callback> {
        critical_section::with(|cs| self.slot.borrow(cs).replace(callback))
    }

    /// Currently installed callback.
    pub fn current(&self) -> Option<Callback> {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }

    pub fn is_installed(&self) -> bool {
        self.current().is_some()
    }

    /// Runs the installed callback, if any, without leaving the caller's
    /// critical section. Returns whether a callback ran.
    pub fn invoke(&self, cs: CriticalSection<'_>) -> bool {
        match self.slot.borrow(cs).get() {
            Some(callback) => {
                callback.invoke();
                true
            }
            None => false,
        }
    }
}

impl Default for CallbackSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSlot")
            .field("callback", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static FIRST_HITS: AtomicUsize = AtomicUsize::new(0);
    static SECOND_HITS: AtomicUsize = AtomicUsize::new(0);

    fn first() {
        FIRST_HITS.fetch_add(1, Ordering::SeqCst);
    }

    fn second() {
        SECOND_HITS.fetch_add(1, Ordering::SeqCst);
    }

    struct Counter(AtomicUsize);

    impl TickHandler for Counter {
        fn on_tick(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    static COUNTER: Counter = Counter(AtomicUsize::new(0));

    #[test]
    fn empty_slot_returns_nothing() {
        let slot = CallbackSlot::new();
        assert!(!slot.is_installed());
        assert!(slot.exchange(None).is_none());
        assert!(!critical_section::with(|cs| slot.invoke(cs)));
    }

    #[test]
    fn exchange_returns_previous_callback() {
        let slot = CallbackSlot::new();
        assert!(slot.exchange(Some(Callback::new(&first))).is_none());

        let previous = slot.exchange(Some(Callback::new(&second))).unwrap();
        let before = FIRST_HITS.load(Ordering::SeqCst);
        previous.invoke();
        assert_eq!(FIRST_HITS.load(Ordering::SeqCst), before + 1);

        let before = SECOND_HITS.load(Ordering::SeqCst);
        assert!(critical_section::with(|cs| slot.invoke(cs)));
        assert_eq!(SECOND_HITS.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn struct_handlers_are_callbacks() {
        let slot = CallbackSlot::new();
        slot.exchange(Some(Callback::new(&COUNTER)));
        critical_section::with(|cs| slot.invoke(cs));
        critical_section::with(|cs| slot.invoke(cs));
        assert_eq!(COUNTER.0.load(Ordering::SeqCst), 2);

        assert!(slot.exchange(None).is_some());
        assert!(!slot.is_installed());
    }
}
