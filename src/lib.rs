//! Tile based driver for the SSD1681 E-Paper controller.
//!
//! The graphics layer above owns the frame buffer and talks to [`EPD`] through
//! [`Message`]s: set up memory, init, power save, draw one tile, refresh.
//! Each message is replayed as a fixed controller [`Sequence`](sequence::Sequence)
//! over a [`Bus`].
//!
//! Every call blocks until the bus and all waits are done. A refresh blocks
//! for about 1.5s with no way to cancel it, so run the driver on its own task
//! if the caller has to stay responsive. The driver does no locking, callers
//! serialize access.
//!
//! # Power states
//!
//! ```text
//! Uninitialized -> Init -> Active <-> PowerSaveLight
//!                            |
//!                            +-> DeepSleep -> Init -> Active
//! ```
//!
//! Deep sleep discards the controller RAM. Leaving it with `SetPowerSave(0)`
//! is accepted, but real hardware needs a full `Init` before drawing again.

#![cfg_attr(not(test), no_std)]

use core::fmt;
use core::marker::PhantomData;

use embedded_graphics::geometry::{OriginDimensions, Size};

use color::TILE_BYTES;
use config::Config;
use display::{DisplayDescriptor, Tile, Window};
use drivers::{Driver, SSD1681};
pub use interface::{Bus, EPDInterface, EPDInterfaceNoCS};

pub mod color;
pub mod command;
pub mod config;
pub mod display;
pub mod drivers;
pub mod interface;
pub mod sequence;

#[cfg(test)]
mod testing;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// No `Init` yet
    Uninitialized,
    Active,
    PowerSaveLight,
    DeepSleep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus failed, the transfer has been closed
    Bus(E),
    UnsupportedMessage,
    /// Not allowed in this power state, nothing was sent
    InvalidState(PowerState),
    /// Tile outside the panel, nothing was sent
    TileOutOfBounds,
    /// Tile `count` needs more bytes than `data` holds, nothing was sent
    TileDataTooShort,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Bus(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::UnsupportedMessage => write!(f, "message not supported"),
            Error::InvalidState(state) => write!(f, "not allowed in power state {:?}", state),
            Error::TileOutOfBounds => write!(f, "tile outside the panel"),
            Error::TileDataTooShort => write!(f, "tile data shorter than its block count"),
        }
    }
}

/// Message tags used by the display layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageTag {
    SetupMemory = 9,
    Init = 10,
    SetPowerSave = 11,
    SetFlipMode = 13,
    DrawTile = 15,
    Refresh = 16,
}

impl TryFrom<u8> for MessageTag {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, u8> {
        Ok(match tag {
            9 => MessageTag::SetupMemory,
            10 => MessageTag::Init,
            11 => MessageTag::SetPowerSave,
            13 => MessageTag::SetFlipMode,
            15 => MessageTag::DrawTile,
            16 => MessageTag::Refresh,
            other => return Err(other),
        })
    }
}

/// One display operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message<'a> {
    SetupMemory,
    Init,
    /// 0 = active, otherwise power save
    SetPowerSave(u8),
    /// The panel has no flip support, accepted and ignored
    SetFlipMode(u8),
    /// Stream the tile `repeat` times into one window, 0 counts as 1
    DrawTile { tile: Tile<'a>, repeat: u8 },
    Refresh,
}

impl<'a> Message<'a> {
    /// Decode the display layer's `(tag, arg, tile)` triple.
    ///
    /// Unknown tags, and a draw without a tile, are not recognized.
    pub fn from_raw(tag: u8, arg: u8, tile: Option<Tile<'a>>) -> Option<Self> {
        let msg = match MessageTag::try_from(tag).ok()? {
            MessageTag::SetupMemory => Message::SetupMemory,
            MessageTag::Init => Message::Init,
            MessageTag::SetPowerSave => Message::SetPowerSave(arg),
            MessageTag::SetFlipMode => Message::SetFlipMode(arg),
            MessageTag::DrawTile => Message::DrawTile {
                tile: tile?,
                repeat: arg,
            },
            MessageTag::Refresh => Message::Refresh,
        };
        Some(msg)
    }
}

pub struct EPD<B: Bus, D: Driver = SSD1681> {
    pub interface: B,
    config: Config,
    state: PowerState,
    x_offset: u16,
    _phantom: PhantomData<D>,
}

impl<B: Bus, D: Driver> EPD<B, D> {
    pub fn new(interface: B, config: Config) -> Self {
        Self {
            interface,
            config,
            state: PowerState::Uninitialized,
            x_offset: D::INFO.default_x_offset,
            _phantom: PhantomData,
        }
    }

    pub fn power_state(&self) -> PowerState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn descriptor(&self) -> DisplayDescriptor {
        D::INFO
    }

    /// Give the bus back.
    pub fn release(self) -> B {
        self.interface
    }

    pub fn dispatch(&mut self, msg: Message<'_>) -> Result<(), Error<B::Error>> {
        match msg {
            Message::SetupMemory => {
                self.setup_memory();
                Ok(())
            }
            Message::Init => self.init(),
            Message::SetPowerSave(mode) => self.set_power_save(mode),
            Message::SetFlipMode(mode) => {
                self.set_flip_mode(mode);
                Ok(())
            }
            Message::DrawTile { tile, repeat } => self.draw_tile(&tile, repeat),
            Message::Refresh => self.refresh(),
        }
    }

    /// Entry point for the display layer's tagged messages.
    pub fn dispatch_raw(
        &mut self,
        tag: u8,
        arg: u8,
        tile: Option<Tile<'_>>,
    ) -> Result<(), Error<B::Error>> {
        match Message::from_raw(tag, arg, tile) {
            Some(msg) => self.dispatch(msg),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("unsupported message tag {}", tag);
                Err(Error::UnsupportedMessage)
            }
        }
    }

    /// Reset the working x offset to the panel default. The descriptor
    /// itself is available from [`EPD::descriptor`].
    pub fn setup_memory(&mut self) {
        self.x_offset = D::INFO.default_x_offset;
    }

    /// Hard reset, init sequence, then power on.
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("init, waveform {}", self.config.waveform);

        self.interface
            .hardware_reset(D::INFO.reset_pulse_width_ms, D::INFO.post_reset_wait_ms)?;
        sequence::send_sequence(&mut self.interface, &D::init(self.config.waveform))?;
        sequence::send_sequence(&mut self.interface, &D::POWER_ON)?;

        self.state = PowerState::Active;
        Ok(())
    }

    /// `mode == 0` powers on, anything else enters the configured power save state.
    pub fn set_power_save(&mut self, mode: u8) -> Result<(), Error<B::Error>> {
        let (seq, next) = if mode == 0 {
            if self.state == PowerState::DeepSleep {
                #[cfg(feature = "defmt")]
                defmt::warn!("power on from deep sleep, RAM is lost until init");
            }
            (D::POWER_ON, PowerState::Active)
        } else {
            match self.config.power_save {
                config::PowerSaveMode::Light => (D::POWER_SAVE, PowerState::PowerSaveLight),
                config::PowerSaveMode::DeepSleep => (D::DEEP_SLEEP, PowerState::DeepSleep),
            }
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("power save {}: {} -> {}", mode, self.state, next);

        sequence::send_sequence(&mut self.interface, &seq)?;
        self.state = next;
        Ok(())
    }

    pub fn set_flip_mode(&mut self, _mode: u8) {}

    /// Write one tile into controller RAM, inverted to controller polarity.
    pub fn draw_tile(&mut self, tile: &Tile<'_>, repeat: u8) -> Result<(), Error<B::Error>> {
        if self.state == PowerState::DeepSleep {
            #[cfg(feature = "defmt")]
            defmt::warn!("draw in deep sleep rejected");
            return Err(Error::InvalidState(self.state));
        }
        let window =
            Window::for_tile(&D::INFO, self.x_offset, tile).ok_or(Error::TileOutOfBounds)?;
        if !tile.is_complete() {
            return Err(Error::TileDataTooShort);
        }

        let mut transfer = interface::Transfer::begin(&mut self.interface)?;
        D::set_window(transfer.bus(), &window)?;

        for _ in 0..repeat.max(1) {
            for block in tile.blocks() {
                let mut raw = [0u8; TILE_BYTES];
                raw.copy_from_slice(block);
                let converted = color::convert_tile(&raw, D::BLACK_BIT);
                transfer.bus().send_data(&converted)?;
            }
        }

        transfer.finish()?;
        Ok(())
    }

    /// Redraw the panel from RAM. Blocks for the full settle time.
    pub fn refresh(&mut self) -> Result<(), Error<B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("refresh {}", self.config.refresh);

        sequence::send_sequence(&mut self.interface, &D::refresh(self.config.refresh))?;
        Ok(())
    }
}

impl<B: Bus, D: Driver> OriginDimensions for EPD<B, D> {
    fn size(&self) -> Size {
        D::INFO.size()
    }
}
