//! Driver configuration.

/// Waveform table streamed during init.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// Slow, clears ghosting
    Full,
    /// Fast, some ghosting
    #[default]
    Partial,
}

/// Display update option used by refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    Full,
    #[default]
    Partial,
}

/// State entered by a non-zero power save request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSaveMode {
    /// Charge pump off, RAM retained
    Light,
    /// RAM is lost, a full init is required to draw again
    #[default]
    DeepSleep,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub waveform: Waveform,
    pub refresh: RefreshMode,
    pub power_save: PowerSaveMode,
}

/// Builder for [`Config`]
///
/// ```
/// use epd_ssd1681::config::{Builder, RefreshMode, Waveform};
///
/// let config = Builder::new()
///     .waveform(Waveform::Full)
///     .refresh(RefreshMode::Full)
///     .build();
/// assert_eq!(config.waveform, Waveform::Full);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.config.waveform = waveform;
        self
    }

    pub fn refresh(mut self, refresh: RefreshMode) -> Self {
        self.config.refresh = refresh;
        self
    }

    pub fn power_save(mut self, power_save: PowerSaveMode) -> Self {
        self.config.power_save = power_save;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
