use crate::config::{RefreshMode, Waveform};
use crate::display::{DisplayDescriptor, Window};
use crate::interface::Bus;
use crate::sequence::Sequence;

pub use self::ssd1681::*;

mod ssd1681;

/// Controller specific protocol: fixed sequences plus the window burst.
pub trait Driver {
    // Almost all EPD use bit 0 as black, but some use bit 1 as black
    const BLACK_BIT: bool = false;

    const INFO: DisplayDescriptor;

    /// Enable clock and charge pump
    const POWER_ON: Sequence<'static>;

    /// Stop the charge pump, keep RAM
    const POWER_SAVE: Sequence<'static>;

    /// Enter deep sleep, RAM is lost
    const DEEP_SLEEP: Sequence<'static>;

    /// Timing, addressing mode, RAM geometry and the waveform table.
    fn init(waveform: Waveform) -> Sequence<'static>;

    /// Redraw the panel from RAM and wait for it to settle.
    fn refresh(mode: RefreshMode) -> Sequence<'static>;

    /// Point RAM writes at `window` and start a RAM write.
    /// Runs inside an open transfer.
    fn set_window<B: Bus>(bus: &mut B, window: &Window) -> Result<(), B::Error>;
}
