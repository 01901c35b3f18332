//! System timer configuration

/// Configuration applied when binding a system timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Name used in log output.
    pub name: &'static str,
    /// Tick rate in hertz.
    pub tick_hz: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            name: "systimer",
            tick_hz: 1000,
        }
    }
}

impl TimerConfig {
    /// Creates a new timer configuration builder.
    pub fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::default()
    }

    /// Converts a tick count to microseconds, saturating at `u64::MAX`.
    ///
    /// Returns 0 for a zero tick rate.
    pub fn ticks_to_micros(&self, ticks: u64) -> u64 {
        if self.tick_hz == 0 {
            return 0;
        }
        let micros = ticks as u128 * 1_000_000 / self.tick_hz as u128;
        u64::try_from(micros).unwrap_or(u64::MAX)
    }
}

/// Builder for [`TimerConfig`].
#[derive(Debug, Clone, Default)]
pub struct TimerConfigBuilder {
    config: TimerConfig,
}

impl TimerConfigBuilder {
    /// Sets the timer name.
    pub fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Sets the tick rate in hertz.
    pub fn tick_hz(mut self, tick_hz: u32) -> Self {
        self.config.tick_hz = tick_hz;
        self
    }

    /// Builds the timer configuration.
    pub fn build(self) -> TimerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = TimerConfig::default();
        assert_eq!(config.name, "systimer");
        assert_eq!(config.tick_hz, 1000);
    }

    #[test]
    fn config_builder() {
        let config = TimerConfig::builder().name("tick").tick_hz(32_768).build();
        assert_eq!(config.name, "tick");
        assert_eq!(config.tick_hz, 32_768);
    }

    #[test]
    fn ticks_to_micros() {
        let config = TimerConfig::builder().tick_hz(1000).build();
        assert_eq!(config.ticks_to_micros(0), 0);
        assert_eq!(config.ticks_to_micros(3), 3000);

        let config = TimerConfig::builder().tick_hz(32_768).build();
        assert_eq!(config.ticks_to_micros(32_768), 1_000_000);
        assert_eq!(config.ticks_to_micros(1), 30);

        let config = TimerConfig::builder().tick_hz(1).build();
        assert_eq!(config.ticks_to_micros(u64::MAX), u64::MAX);
    }
}
