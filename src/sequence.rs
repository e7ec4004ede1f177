//! Controller instruction sequences and their interpreter.
//!
//! A [`Sequence`] is plain data: one transfer bracket around commands,
//! arguments and waits, terminated by [`Instruction::End`]. Sequences are
//! declared as `const`, so a malformed one fails the build.

use crate::interface::{Bus, Transfer};

/// Longest single wait a `Delay` instruction can express, in ms.
/// Longer waits are written as several consecutive delays.
pub const MAX_DELAY_MS: u8 = u8::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instruction<'a> {
    StartTransfer,
    EndTransfer,
    Command(u8),
    CommandWithArgs(u8, &'a [u8]),
    /// Blocking wait in ms
    Delay(u8),
    End,
}

impl Instruction<'_> {
    const fn is_bracket(&self) -> bool {
        matches!(
            self,
            Instruction::StartTransfer | Instruction::EndTransfer | Instruction::End
        )
    }
}

/// An ordered, bracketed list of instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequence<'a>(&'a [Instruction<'a>]);

impl<'a> Sequence<'a> {
    /// Panics (at compile time in a `const`) unless the list opens with
    /// `StartTransfer`, closes with `EndTransfer, End`, and holds no other
    /// bracket or `End` in between.
    pub const fn new(instructions: &'a [Instruction<'a>]) -> Self {
        let n = instructions.len();
        assert!(n >= 3, "sequence needs a transfer bracket and End");
        assert!(
            matches!(instructions[0], Instruction::StartTransfer),
            "sequence must open with StartTransfer"
        );
        assert!(
            matches!(instructions[n - 2], Instruction::EndTransfer),
            "EndTransfer must be the last bus instruction"
        );
        assert!(
            matches!(instructions[n - 1], Instruction::End),
            "sequence must be terminated by End"
        );

        let mut i = 1;
        while i < n - 2 {
            assert!(
                !instructions[i].is_bracket(),
                "unbalanced transfer bracket or early End"
            );
            i += 1;
        }

        Self(instructions)
    }

    pub fn instructions(&self) -> &'a [Instruction<'a>] {
        self.0
    }

    /// Instructions inside the transfer bracket.
    pub fn body(&self) -> &'a [Instruction<'a>] {
        &self.0[1..self.0.len() - 2]
    }

    /// Sum of all waits, in ms.
    pub const fn total_delay_ms(&self) -> u32 {
        let mut total = 0;
        let mut i = 0;
        while i < self.0.len() {
            if let Instruction::Delay(ms) = self.0[i] {
                total += ms as u32;
            }
            i += 1;
        }
        total
    }
}

/// Replay a sequence over the bus, one bus call per instruction.
///
/// On a bus error the transfer is still closed before the error is returned.
pub fn send_sequence<B: Bus>(bus: &mut B, sequence: &Sequence<'_>) -> Result<(), B::Error> {
    let mut transfer = Transfer::begin(bus)?;
    send_burst(transfer.bus(), sequence.body())?;
    transfer.finish()
}

/// Replay instructions inside an already open transfer, up to `End`.
pub fn send_burst<B: Bus>(bus: &mut B, instructions: &[Instruction<'_>]) -> Result<(), B::Error> {
    for instruction in instructions {
        match *instruction {
            Instruction::Command(command) => bus.send_command(command)?,
            Instruction::CommandWithArgs(command, args) => bus.send_command_args(command, args)?,
            Instruction::Delay(ms) => bus.delay_ms(ms)?,
            Instruction::End => break,
            Instruction::StartTransfer | Instruction::EndTransfer => {
                debug_assert!(false, "nested transfer bracket in burst");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingBus};

    const SAMPLE: Sequence<'static> = Sequence::new(&[
        Instruction::StartTransfer,
        Instruction::CommandWithArgs(0x22, &[0xc0]),
        Instruction::Command(0x20),
        Instruction::Delay(200),
        Instruction::Delay(100),
        Instruction::EndTransfer,
        Instruction::End,
    ]);

    #[test]
    fn replays_one_call_per_instruction() {
        let mut bus = RecordingBus::new();
        send_sequence(&mut bus, &SAMPLE).unwrap();

        assert_eq!(
            bus.calls,
            vec![
                Call::StartTransfer,
                Call::Command(0x22),
                Call::Args(vec![0xc0]),
                Call::Command(0x20),
                Call::Delay(200),
                Call::Delay(100),
                Call::EndTransfer,
            ]
        );
    }

    #[test]
    fn split_delays_sum_up() {
        assert_eq!(SAMPLE.total_delay_ms(), 300);
    }

    #[test]
    fn body_excludes_bracket() {
        assert_eq!(SAMPLE.body().len(), 4);
        assert_eq!(SAMPLE.instructions().len(), 7);
    }

    #[test]
    fn bus_error_still_closes_transfer() {
        let mut bus = RecordingBus::new();
        bus.fail_on_command = Some(0x20);

        assert!(send_sequence(&mut bus, &SAMPLE).is_err());
        assert_eq!(bus.calls.last(), Some(&Call::EndTransfer));
        assert!(!bus.calls.contains(&Call::Delay(200)));
    }

    #[test]
    fn burst_stops_at_end() {
        let mut bus = RecordingBus::new();
        send_burst(
            &mut bus,
            &[
                Instruction::Command(0x24),
                Instruction::End,
                Instruction::Command(0xff),
            ],
        )
        .unwrap();
        assert_eq!(bus.calls, vec![Call::Command(0x24)]);
    }

    #[test]
    #[should_panic(expected = "sequence must be terminated by End")]
    fn missing_end_is_rejected() {
        let _ = Sequence::new(&[
            Instruction::StartTransfer,
            Instruction::Command(0x20),
            Instruction::EndTransfer,
            Instruction::Delay(1),
        ]);
    }

    #[test]
    #[should_panic(expected = "unbalanced transfer bracket")]
    fn nested_bracket_is_rejected() {
        let _ = Sequence::new(&[
            Instruction::StartTransfer,
            Instruction::StartTransfer,
            Instruction::EndTransfer,
            Instruction::End,
        ]);
    }
}
