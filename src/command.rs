//! Command Table, SSD1681

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Set the number of gate
    ///
    /// <<A:u8, 0:b7, A8:b1, 0:b5, B:b3>>
    ///
    /// MUX = A + 1, B = GD/SM/TB scan order
    DriverOutputControl = 0x01,
    /// Booster soft start, phase 1/2/3 drive strength and duration
    BoosterSoftStartControl = 0x0c,
    /// Deep Sleep mode Control
    ///
    /// <<0:b6, A:b2>>
    ///
    /// ## A
    /// A=00, Normal Mode [POR]
    /// A=01, Enter Deep Sleep Mode 1, RAM is not retained
    DeepSleepMode = 0x10,
    /// Define data entry sequence
    /// <<0:b5, A:b3>>
    ///
    /// ## A[1:0]
    /// - 00 – Y decrement, X decrement,
    /// - 01 – Y decrement, X increment,
    /// - 10 – Y increment, X decrement,
    /// - 11 – Y increment, X increment [POR]
    ///
    /// ## A[2]
    /// - AM = 0, the address counter is updated in the X direction. [POR]
    /// - AM = 1, the address counter is updated in the Y direction.
    DataEntryModeSetting = 0x11,
    SwReset = 0x12,
    /// 0x48 external, 0x80 internal sensor
    TemperatureSensorSelection = 0x18,
    /// Activate Display Update Sequence
    ///
    /// The Display Update Sequence Option is located at R22h
    MasterActivation = 0x20,
    /// Display Update Sequence Option:
    ///
    /// - bit 7: Enable Clock
    /// - bit 6: Enable Charge Pump
    /// - bit 5: Load Temperature
    /// - bit 4: Load LUT
    /// - bit 3: Display Mode 2
    /// - bit 2: Pattern Display, about 945ms with the partial LUT
    /// - bit 1: Disable Charge Pump
    /// - bit 0: Disable Clock
    ///
    /// Enable takes about 10ms, disable about 267ms.
    DisplayUpdateControl2 = 0x22,

    WriteRam = 0x24,
    /// Write LUT register from MCU interface [153 bytes + EOPT, VGH, VSH1, VSH2, VSL, VCOM]
    WriteLutRegister = 0x32,
    /// OTP selection, 10 bytes. Byte 5 bit 6 = PingPong for Display Mode 2
    WriteRegisterDisplayOption = 0x37,
    BorderWaveformControl = 0x3c,
    /// Specify the start/end positions of the window address in the X direction by an address unit.
    ///
    /// x point must be the multiple of 8 or the last 3 bits will be ignored
    SetRamXAddressStartEndPosition = 0x44,
    /// Specify the start/end positions of the window address in the Y direction by an address unit.
    SetRamYAddressStartEndPosition = 0x45,
    SetRamXAddressCounter = 0x4e,
    SetRamYAddressCounter = 0x4f,
}
