//! Debugger presence and breakpoint capabilities

/// Whether a debugger is attached to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugState {
    /// A debugger is attached.
    Enabled,
    /// The system is running free.
    Disabled,
    /// The platform cannot tell. Never to be read as `Disabled`.
    Unknown,
}

impl DebugState {
    /// True only when a debugger is known to be attached.
    pub const fn is_attached(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DebugState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Enabled => defmt::write!(fmt, "Enabled"),
            Self::Disabled => defmt::write!(fmt, "Disabled"),
            Self::Unknown => defmt::write!(fmt, "Unknown"),
        }
    }
}

/// Debug-state query. Pure, callable at any time.
pub trait DebugProbe {
    /// Platforms without debug support keep the default.
    fn debug_state(&self) -> DebugState {
        DebugState::Unknown
    }
}

/// Hard-coded breakpoint.
pub trait Breakpoint {
    /// Halts the core if a debugger is attached.
    ///
    /// Behaviour without a debugger is platform-defined (many cores raise a
    /// fault), so gate calls behind [`DebugProbe::debug_state`] or use
    /// [`breakpoint_if_attached`].
    fn breakpoint(&self);
}

/// Probe for platforms that cannot detect a debugger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDebugSupport;

impl DebugProbe for NoDebugSupport {}

/// Traps into the debugger only when the platform reports one attached.
///
/// Returns the state that was observed.
pub fn breakpoint_if_attached<P>(platform: &P) -> DebugState
where
    P: DebugProbe + Breakpoint,
{
    let state = platform.debug_state();
    if state.is_attached() {
        log::debug!("debugger attached, trapping");
        platform.breakpoint();
    }
    state
}
