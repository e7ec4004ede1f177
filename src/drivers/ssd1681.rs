//! SSD1681 driver
//!
//! For:
//! - GDEH0154D67, 200x200 B/W
//!
//! The panel is driven rotated: tile rows go to the RAM X (byte) address,
//! pixel columns to the RAM Y (gate) address.
//!
//! Clock and charge pump stay enabled between refreshes, see `POWER_ON`.

use super::Driver;
use crate::command::Command;
use crate::config::{RefreshMode, Waveform};
use crate::display::{DisplayDescriptor, Window};
use crate::interface::Bus;
use crate::sequence::{self, Instruction, Sequence};

pub use self::lut::{LUT_FULL_UPDATE, LUT_PARTIAL_UPDATE};

mod lut;

use crate::sequence::Instruction::{CommandWithArgs, Delay, End, EndTransfer, StartTransfer};

/// 200 Source x 200 Gate B/W
pub struct SSD1681;

macro_rules! init_sequence {
    ($lut:expr) => {
        Sequence::new(&[
            StartTransfer,
            Delay(11),
            Instruction::Command(Command::SwReset as u8),
            Delay(20),
            // MUX = 200, GD = 0, SM = 0, TB = 0
            CommandWithArgs(Command::DriverOutputControl as u8, &[199, 0, 0]),
            CommandWithArgs(Command::BoosterSoftStartControl as u8, &[0xd7, 0xd6, 0x9d]),
            CommandWithArgs(Command::WriteLutRegister as u8, $lut),
            // Display Mode 2 PingPong, needed for partial update
            CommandWithArgs(
                Command::WriteRegisterDisplayOption as u8,
                &[0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00],
            ),
            CommandWithArgs(Command::BorderWaveformControl as u8, &[0x01]),
            // internal temperature sensor
            CommandWithArgs(Command::TemperatureSensorSelection as u8, &[0x80]),
            // X increment, Y increment
            CommandWithArgs(Command::DataEntryModeSetting as u8, &[0x03]),
            // full RAM: x 0..=24 bytes, y 0..=199
            CommandWithArgs(Command::SetRamXAddressStartEndPosition as u8, &[0, 24]),
            CommandWithArgs(Command::SetRamYAddressStartEndPosition as u8, &[0, 0, 199, 0]),
            CommandWithArgs(Command::SetRamXAddressCounter as u8, &[0]),
            CommandWithArgs(Command::SetRamYAddressCounter as u8, &[0, 0]),
            EndTransfer,
            End,
        ])
    };
}

pub const INIT_FULL: Sequence<'static> = init_sequence!(&LUT_FULL_UPDATE);
pub const INIT_PARTIAL: Sequence<'static> = init_sequence!(&LUT_PARTIAL_UPDATE);

pub const POWER_ON: Sequence<'static> = Sequence::new(&[
    StartTransfer,
    // enable clock and charge pump
    CommandWithArgs(Command::DisplayUpdateControl2 as u8, &[0xc0]),
    Instruction::Command(Command::MasterActivation as u8),
    // measured up to 150ms, may take longer
    Delay(238),
    Delay(237),
    EndTransfer,
    End,
]);

pub const POWER_SAVE: Sequence<'static> = Sequence::new(&[
    StartTransfer,
    // disable charge pump only, the clock needs a HW reset to come back
    CommandWithArgs(Command::DisplayUpdateControl2 as u8, &[0xc3]),
    Instruction::Command(Command::MasterActivation as u8),
    Delay(240),
    Delay(239),
    EndTransfer,
    End,
]);

pub const DEEP_SLEEP: Sequence<'static> = Sequence::new(&[
    StartTransfer,
    CommandWithArgs(Command::DeepSleepMode as u8, &[0x01]),
    EndTransfer,
    End,
]);

// The update takes about 1300ms, wait 1461ms.
pub const REFRESH_FULL: Sequence<'static> = Sequence::new(&[
    StartTransfer,
    // clock, charge pump, LUT, pattern display, then disable
    CommandWithArgs(Command::DisplayUpdateControl2 as u8, &[0xc7]),
    Instruction::Command(Command::MasterActivation as u8),
    Delay(246),
    Delay(245),
    Delay(244),
    Delay(243),
    Delay(242),
    Delay(241),
    EndTransfer,
    End,
]);

pub const REFRESH_PARTIAL: Sequence<'static> = Sequence::new(&[
    StartTransfer,
    // as full, in Display Mode 2
    CommandWithArgs(Command::DisplayUpdateControl2 as u8, &[0xcf]),
    Instruction::Command(Command::MasterActivation as u8),
    Delay(246),
    Delay(245),
    Delay(244),
    Delay(243),
    Delay(242),
    Delay(241),
    EndTransfer,
    End,
]);

impl Driver for SSD1681 {
    const INFO: DisplayDescriptor = DisplayDescriptor {
        // CS active low
        chip_enable_level: false,
        chip_disable_level: true,

        post_chip_enable_wait_ns: 120,
        pre_chip_disable_wait_ns: 60,
        reset_pulse_width_ms: 100,
        post_reset_wait_ms: 200,
        sda_setup_time_ns: 50,
        sck_pulse_width_ns: 100,
        sck_clock_hz: 20_000_000,
        // active high, rising edge
        spi_mode: 0,
        data_setup_time_ns: 40,
        write_pulse_width_ns: 150,

        tile_width: 25, // 25*8 = 200
        tile_height: 25,
        default_x_offset: 0,
        flipmode_x_offset: 0,
        pixel_width: 200,
        pixel_height: 200,
    };

    const POWER_ON: Sequence<'static> = POWER_ON;
    const POWER_SAVE: Sequence<'static> = POWER_SAVE;
    const DEEP_SLEEP: Sequence<'static> = DEEP_SLEEP;

    fn init(waveform: Waveform) -> Sequence<'static> {
        match waveform {
            Waveform::Full => INIT_FULL,
            Waveform::Partial => INIT_PARTIAL,
        }
    }

    fn refresh(mode: RefreshMode) -> Sequence<'static> {
        match mode {
            RefreshMode::Full => REFRESH_FULL,
            RefreshMode::Partial => REFRESH_PARTIAL,
        }
    }

    fn set_window<B: Bus>(bus: &mut B, window: &Window) -> Result<(), B::Error> {
        let column = window.column.to_le_bytes();
        let column_end = window.column_end.to_le_bytes();
        let columns = [column[0], column[1], column_end[0], column_end[1]];
        let rows = [window.row, window.row];
        let row = [window.row];

        sequence::send_burst(
            bus,
            &[
                CommandWithArgs(Command::SetRamYAddressStartEndPosition as u8, &columns),
                CommandWithArgs(Command::SetRamXAddressStartEndPosition as u8, &rows),
                CommandWithArgs(Command::SetRamYAddressCounter as u8, &column),
                CommandWithArgs(Command::SetRamXAddressCounter as u8, &row),
                Instruction::Command(Command::WriteRam as u8),
                End,
            ],
        )
    }
}
