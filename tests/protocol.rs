use epd_ssd1681::config::Config;
use epd_ssd1681::display::Tile;
use epd_ssd1681::drivers::{self, Driver, SSD1681};
use epd_ssd1681::sequence::{Instruction, Sequence};
use epd_ssd1681::{Bus, Error, Message, MessageTag, PowerState, EPD};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Start,
    End,
    Command(u8),
    Args(Vec<u8>),
    Data(Vec<u8>),
    Delay(u8),
    Reset,
}

#[derive(Default)]
struct Log(Vec<Call>);

impl Bus for Log {
    type Error = ();

    fn start_transfer(&mut self) -> Result<(), ()> {
        self.0.push(Call::Start);
        Ok(())
    }
    fn end_transfer(&mut self) -> Result<(), ()> {
        self.0.push(Call::End);
        Ok(())
    }
    fn send_command(&mut self, command: u8) -> Result<(), ()> {
        self.0.push(Call::Command(command));
        Ok(())
    }
    fn send_args(&mut self, args: &[u8]) -> Result<(), ()> {
        self.0.push(Call::Args(args.to_vec()));
        Ok(())
    }
    fn send_data(&mut self, data: &[u8]) -> Result<(), ()> {
        self.0.push(Call::Data(data.to_vec()));
        Ok(())
    }
    fn delay_ms(&mut self, ms: u8) -> Result<(), ()> {
        self.0.push(Call::Delay(ms));
        Ok(())
    }
    fn hardware_reset(&mut self, _pulse_ms: u8, _settle_ms: u8) -> Result<(), ()> {
        self.0.push(Call::Reset);
        Ok(())
    }
}

/// The bus calls a sequence should produce.
fn expected(seq: Sequence<'static>) -> Vec<Call> {
    let mut calls = Vec::new();
    for instruction in seq.instructions() {
        match *instruction {
            Instruction::StartTransfer => calls.push(Call::Start),
            Instruction::EndTransfer => calls.push(Call::End),
            Instruction::Command(c) => calls.push(Call::Command(c)),
            Instruction::CommandWithArgs(c, args) => {
                calls.push(Call::Command(c));
                calls.push(Call::Args(args.to_vec()));
            }
            Instruction::Delay(ms) => calls.push(Call::Delay(ms)),
            Instruction::End => {}
        }
    }
    calls
}

fn epd() -> EPD<Log> {
    EPD::new(Log::default(), Config::default())
}

#[test]
fn power_cycle_replays_four_batches_in_order() {
    let mut epd = epd();
    epd.dispatch(Message::Init).unwrap();
    epd.dispatch(Message::SetPowerSave(1)).unwrap();
    assert_eq!(epd.power_state(), PowerState::DeepSleep);
    epd.dispatch(Message::SetPowerSave(0)).unwrap();
    assert_eq!(epd.power_state(), PowerState::Active);

    let mut want = vec![Call::Reset];
    want.extend(expected(drivers::INIT_PARTIAL));
    want.extend(expected(drivers::POWER_ON));
    want.extend(expected(drivers::DEEP_SLEEP));
    want.extend(expected(drivers::POWER_ON));

    assert_eq!(epd.release().0, want);
}

#[test]
fn unknown_tag_fails_without_traffic() {
    let mut epd = epd();
    // SetContrast, not handled by this panel
    assert_eq!(epd.dispatch_raw(14, 0, None), Err(Error::UnsupportedMessage));
    assert_eq!(epd.dispatch_raw(0xff, 0, None), Err(Error::UnsupportedMessage));
    assert_eq!(
        epd.dispatch_raw(MessageTag::DrawTile as u8, 1, None),
        Err(Error::UnsupportedMessage)
    );
    assert!(epd.release().0.is_empty());
}

#[test]
fn draw_tile_writes_ram_once_then_three_bursts() {
    let mut epd = epd();
    epd.dispatch(Message::Init).unwrap();
    let skip = epd.interface.0.len();

    let data: Vec<u8> = (0u8..24).collect();
    let tile = Tile::new(3, 0, &data);
    assert_eq!(tile.count, 3);
    epd.dispatch_raw(MessageTag::DrawTile as u8, 1, Some(tile))
        .unwrap();

    let calls = &epd.interface.0[skip..];
    let ram_write = calls
        .iter()
        .position(|c| *c == Call::Command(0x24))
        .unwrap();
    assert_eq!(
        calls.iter().filter(|c| **c == Call::Command(0x24)).count(),
        1
    );

    // window: columns 24..=199, single row 24
    assert_eq!(calls[0], Call::Start);
    assert_eq!(calls[1], Call::Command(0x45));
    assert_eq!(calls[2], Call::Args(vec![24, 0, 199, 0]));
    assert_eq!(calls[3], Call::Command(0x44));
    assert_eq!(calls[4], Call::Args(vec![24, 24]));

    let bursts: Vec<Call> = data
        .chunks(8)
        .map(|block| Call::Data(block.iter().map(|b| !b).collect()))
        .collect();
    assert_eq!(&calls[ram_write + 1..ram_write + 4], &bursts[..]);
    assert_eq!(calls[ram_write + 4], Call::End);
    assert_eq!(calls.len(), ram_write + 5);

    assert_eq!(epd.power_state(), PowerState::Active);
}

#[test]
fn bottom_tile_row_maps_to_ram_row_zero() {
    let mut epd = epd();
    let data = [0u8; 8];
    epd.draw_tile(&Tile::new(0, 24, &data), 1).unwrap();
    assert_eq!(epd.interface.0[4], Call::Args(vec![0, 0]));
}

#[test]
fn refresh_is_one_bracket_with_full_settle_time() {
    let mut epd = epd();
    epd.dispatch(Message::Refresh).unwrap();
    let calls = epd.release().0;

    assert_eq!(calls, expected(SSD1681::refresh(Config::default().refresh)));
    assert_eq!(calls.first(), Some(&Call::Start));
    assert_eq!(calls.last(), Some(&Call::End));

    let waited: u32 = calls
        .iter()
        .filter_map(|c| match c {
            Call::Delay(ms) => Some(u32::from(*ms)),
            _ => None,
        })
        .sum();
    assert_eq!(waited, 1461);
}

#[test]
fn draw_after_deep_sleep_needs_init() {
    let mut epd = epd();
    epd.init().unwrap();
    epd.set_power_save(1).unwrap();

    let data = [0u8; 8];
    assert_eq!(
        epd.draw_tile(&Tile::new(0, 0, &data), 1),
        Err(Error::InvalidState(PowerState::DeepSleep))
    );

    epd.init().unwrap();
    assert!(epd.draw_tile(&Tile::new(0, 0, &data), 1).is_ok());
}

#[test]
fn descriptor_is_exposed_for_buffer_setup() {
    let mut epd = epd();
    epd.dispatch_raw(MessageTag::SetupMemory as u8, 0, None)
        .unwrap();
    let info = epd.descriptor();
    assert_eq!((info.tile_width, info.tile_height), (25, 25));
    assert_eq!(info, SSD1681::INFO);
    assert!(epd.release().0.is_empty());
}
