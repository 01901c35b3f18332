//! Debugger detection and breakpoints

use cortex_m::peripheral::DCB;
use mcu_hal::{Breakpoint, DebugProbe, DebugState};

/// Whether DHCSR can be read from software on this core.
///
/// Access is implementation defined on ARMv6-M (Cortex-M0+ blocks it
/// entirely), so the answer there is [`DebugState::Unknown`].
const DHCSR_READABLE: bool = !cfg!(armv6m);

/// Debug capability backed by the Debug Halting Control and Status Register.
///
/// `C_DEBUGEN` is only readable from privileged code.
#[derive(Debug, Default)]
pub struct CortexMDebug {
    _private: (),
}

impl CortexMDebug {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

fn debug_state_from(readable: bool, debugger_attached: impl FnOnce() -> bool) -> DebugState {
    if !readable {
        return DebugState::Unknown;
    }
    if debugger_attached() {
        DebugState::Enabled
    } else {
        DebugState::Disabled
    }
}

impl DebugProbe for CortexMDebug {
    fn debug_state(&self) -> DebugState {
        debug_state_from(DHCSR_READABLE, DCB::is_debugger_attached)
    }
}

impl Breakpoint for CortexMDebug {
    fn breakpoint(&self) {
        cortex_m::asm::bkpt();
    }
}
