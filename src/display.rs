//! Panel geometry and tile addressing.
//!
//! The surrounding graphics layer owns the frame buffer and hands the driver
//! one [`Tile`] at a time. A tile is an 8 pixel wide, 1 bit deep strip, the
//! unit of one draw call.

use core::slice::ChunksExact;

use embedded_graphics::geometry::Size;
use embedded_hal::spi::{Mode, MODE_0, MODE_1, MODE_2, MODE_3};

use crate::color::TILE_BYTES;

/// Static facts about a panel and the bus it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayDescriptor {
    /// Chip select level that selects the chip, `true` = high
    pub chip_enable_level: bool,
    pub chip_disable_level: bool,

    pub post_chip_enable_wait_ns: u16,
    pub pre_chip_disable_wait_ns: u16,
    pub reset_pulse_width_ms: u8,
    pub post_reset_wait_ms: u8,
    pub sda_setup_time_ns: u16,
    pub sck_pulse_width_ns: u16,
    /// SPI bus speed in Hz
    pub sck_clock_hz: u32,
    /// SPI mode number, 0..=3
    pub spi_mode: u8,
    pub data_setup_time_ns: u16,
    pub write_pulse_width_ns: u16,

    /// Tiles across
    pub tile_width: u8,
    /// Tiles down
    pub tile_height: u8,
    pub default_x_offset: u16,
    pub flipmode_x_offset: u16,
    pub pixel_width: u16,
    pub pixel_height: u16,
}

impl DisplayDescriptor {
    pub const fn size(&self) -> Size {
        Size::new(self.pixel_width as u32, self.pixel_height as u32)
    }

    /// Mode to configure the SPI peripheral with.
    pub fn spi_mode(&self) -> Mode {
        match self.spi_mode & 0b11 {
            0 => MODE_0,
            1 => MODE_1,
            2 => MODE_2,
            _ => MODE_3,
        }
    }
}

/// One strip of caller owned pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tile<'a> {
    /// Column, in tiles
    pub x_pos: u8,
    /// Row, in tiles
    pub y_pos: u8,
    /// Number of consecutive 8 byte blocks in `data`
    pub count: u8,
    pub data: &'a [u8],
}

impl<'a> Tile<'a> {
    /// Takes as many whole blocks as `data` holds, up to 255. Blocks past
    /// the 255th and a trailing partial block are not sent.
    pub fn new(x_pos: u8, y_pos: u8, data: &'a [u8]) -> Self {
        let count = (data.len() / TILE_BYTES).min(u8::MAX as usize) as u8;
        Self {
            x_pos,
            y_pos,
            count,
            data,
        }
    }

    /// `data` holds all `count` blocks.
    pub fn is_complete(&self) -> bool {
        self.data.len() >= usize::from(self.count) * TILE_BYTES
    }

    pub fn blocks(&self) -> core::iter::Take<ChunksExact<'a, u8>> {
        self.data.chunks_exact(TILE_BYTES).take(self.count as usize)
    }
}

/// RAM window targeted by one draw call: a single row, from the tile's
/// column to the right edge of the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub row: u8,
    /// First column, in pixels
    pub column: u16,
    /// Last column, in pixels
    pub column_end: u16,
}

impl Window {
    /// The controller counts rows from the bottom, so tile row 0 is the
    /// last RAM row. Returns `None` for a tile outside the panel.
    pub fn for_tile(info: &DisplayDescriptor, x_offset: u16, tile: &Tile<'_>) -> Option<Self> {
        if tile.x_pos >= info.tile_width || tile.y_pos >= info.tile_height {
            return None;
        }
        let row = info.tile_height - 1 - tile.y_pos;
        let column = u16::from(tile.x_pos) * 8 + x_offset;

        Some(Window {
            row,
            column,
            column_end: info.pixel_width - 1,
        })
    }
}
