//! The bus interface for e-Paper controllers.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::{OutputPin, PinState};

use crate::display::DisplayDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    BusWriteError,
    DCError,
    CSError,
    ResetError,
}

/// Byte-oriented command/data bus a controller is attached to.
///
/// All calls block until complete. Failures are reported through `Self::Error`,
/// the driver never retries a call.
pub trait Bus {
    type Error;

    /// Select the chip, opening a transfer.
    fn start_transfer(&mut self) -> Result<(), Self::Error>;

    /// Deselect the chip, closing a transfer.
    fn end_transfer(&mut self) -> Result<(), Self::Error>;

    /// Send a command to the controller.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send argument bytes for the last command.
    fn send_args(&mut self, args: &[u8]) -> Result<(), Self::Error>;

    fn send_command_args(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        self.send_command(command)?;
        self.send_args(args)
    }

    /// Send a block of RAM data.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Blocking wait.
    fn delay_ms(&mut self, ms: u8) -> Result<(), Self::Error>;

    /// Hard reset. Buses without a reset line keep the default no-op.
    fn hardware_reset(&mut self, _pulse_ms: u8, _settle_ms: u8) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// An open transfer on a bus.
///
/// The transfer is closed by [`Transfer::finish`], or on drop when an error
/// leaves the scope early, so the chip is never left selected.
pub struct Transfer<'b, B: Bus> {
    bus: &'b mut B,
    open: bool,
}

impl<'b, B: Bus> Transfer<'b, B> {
    pub fn begin(bus: &'b mut B) -> Result<Self, B::Error> {
        bus.start_transfer()?;
        Ok(Self { bus, open: true })
    }

    pub fn bus(&mut self) -> &mut B {
        &mut *self.bus
    }

    pub fn finish(mut self) -> Result<(), B::Error> {
        self.open = false;
        self.bus.end_transfer()
    }
}

impl<B: Bus> Drop for Transfer<'_, B> {
    fn drop(&mut self) {
        if self.open {
            // the first error is already on its way to the caller
            let _ = self.bus.end_transfer();
        }
    }
}

// ns waits are rounded up to the delay's microsecond resolution
fn ns_to_us(ns: u16) -> u32 {
    (u32::from(ns) + 999) / 1000
}

/// EPaperDisplay SPI display interface.
pub struct EPDInterface<SPI, CS, DC, RST, DELAY> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    delay: DELAY,
    info: DisplayDescriptor,
}

impl<SPI, CS, DC, RST, DELAY> EPDInterface<SPI, CS, DC, RST, DELAY>
where
    SPI: Write<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32>,
{
    /// Chip select polarity and bus waits are taken from `info`.
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST, delay: DELAY, info: &DisplayDescriptor) -> Self {
        EPDInterface {
            spi,
            cs,
            dc,
            rst,
            delay,
            info: *info,
        }
    }

    /// Consume the display interface and return
    /// the underlying peripherial driver and GPIO pins used by it
    pub fn release(self) -> (SPI, CS, DC, RST, DELAY) {
        (self.spi, self.cs, self.dc, self.rst, self.delay)
    }
}

impl<SPI, CS, DC, RST, DELAY> Bus for EPDInterface<SPI, CS, DC, RST, DELAY>
where
    SPI: Write<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32>,
{
    type Error = BusError;

    fn start_transfer(&mut self) -> Result<(), BusError> {
        self.cs
            .set_state(PinState::from(self.info.chip_enable_level))
            .map_err(|_| BusError::CSError)?;
        self.delay
            .delay_us(ns_to_us(self.info.post_chip_enable_wait_ns));
        Ok(())
    }

    fn end_transfer(&mut self) -> Result<(), BusError> {
        self.delay
            .delay_us(ns_to_us(self.info.pre_chip_disable_wait_ns));
        self.cs
            .set_state(PinState::from(self.info.chip_disable_level))
            .map_err(|_| BusError::CSError)
    }

    fn send_command(&mut self, command: u8) -> Result<(), BusError> {
        // 1 = data, 0 = command
        self.dc.set_low().map_err(|_| BusError::DCError)?;

        self.spi
            .write(&[command])
            .map_err(|_| BusError::BusWriteError)
    }

    fn send_args(&mut self, args: &[u8]) -> Result<(), BusError> {
        self.dc.set_high().map_err(|_| BusError::DCError)?;

        self.spi.write(args).map_err(|_| BusError::BusWriteError)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.dc.set_high().map_err(|_| BusError::DCError)?;

        self.spi.write(data).map_err(|_| BusError::BusWriteError)
    }

    fn delay_ms(&mut self, ms: u8) -> Result<(), BusError> {
        self.delay.delay_us(u32::from(ms) * 1000);
        Ok(())
    }

    fn hardware_reset(&mut self, pulse_ms: u8, settle_ms: u8) -> Result<(), BusError> {
        let pulse = u32::from(pulse_ms) * 1000;

        self.rst.set_high().map_err(|_| BusError::ResetError)?;
        self.delay.delay_us(pulse);

        self.rst.set_low().map_err(|_| BusError::ResetError)?;
        self.delay.delay_us(pulse);

        self.rst.set_high().map_err(|_| BusError::ResetError)?;
        self.delay.delay_us(u32::from(settle_ms) * 1000);
        Ok(())
    }
}

/// EPaperDisplay SPI display interface, chip select tied to its enable level.
pub struct EPDInterfaceNoCS<SPI, DC, RST, DELAY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: DELAY,
    info: DisplayDescriptor,
}

impl<SPI, DC, RST, DELAY> EPDInterfaceNoCS<SPI, DC, RST, DELAY>
where
    SPI: Write<u8>,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32>,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY, info: &DisplayDescriptor) -> Self {
        EPDInterfaceNoCS {
            spi,
            dc,
            rst,
            delay,
            info: *info,
        }
    }

    /// Consume the display interface and return
    /// the underlying peripherial driver and GPIO pins used by it
    pub fn release(self) -> (SPI, DC, RST, DELAY) {
        (self.spi, self.dc, self.rst, self.delay)
    }
}

impl<SPI, DC, RST, DELAY> Bus for EPDInterfaceNoCS<SPI, DC, RST, DELAY>
where
    SPI: Write<u8>,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayUs<u32>,
{
    type Error = BusError;

    fn start_transfer(&mut self) -> Result<(), BusError> {
        self.delay
            .delay_us(ns_to_us(self.info.post_chip_enable_wait_ns));
        Ok(())
    }

    fn end_transfer(&mut self) -> Result<(), BusError> {
        self.delay
            .delay_us(ns_to_us(self.info.pre_chip_disable_wait_ns));
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> Result<(), BusError> {
        // 1 = data, 0 = command
        self.dc.set_low().map_err(|_| BusError::DCError)?;

        self.spi
            .write(&[command])
            .map_err(|_| BusError::BusWriteError)
    }

    fn send_args(&mut self, args: &[u8]) -> Result<(), BusError> {
        self.dc.set_high().map_err(|_| BusError::DCError)?;

        self.spi.write(args).map_err(|_| BusError::BusWriteError)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.dc.set_high().map_err(|_| BusError::DCError)?;

        self.spi.write(data).map_err(|_| BusError::BusWriteError)
    }

    fn delay_ms(&mut self, ms: u8) -> Result<(), BusError> {
        self.delay.delay_us(u32::from(ms) * 1000);
        Ok(())
    }

    fn hardware_reset(&mut self, pulse_ms: u8, settle_ms: u8) -> Result<(), BusError> {
        let pulse = u32::from(pulse_ms) * 1000;

        self.rst.set_high().map_err(|_| BusError::ResetError)?;
        self.delay.delay_us(pulse);

        self.rst.set_low().map_err(|_| BusError::ResetError)?;
        self.delay.delay_us(pulse);

        self.rst.set_high().map_err(|_| BusError::ResetError)?;
        self.delay.delay_us(u32::from(settle_ms) * 1000);
        Ok(())
    }
}
