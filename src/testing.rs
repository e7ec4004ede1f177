//! Recording bus for unit tests.

use crate::interface::Bus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    StartTransfer,
    EndTransfer,
    Command(u8),
    Args(Vec<u8>),
    Data(Vec<u8>),
    Delay(u8),
    Reset { pulse_ms: u8, settle_ms: u8 },
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockError;

#[derive(Default)]
pub struct RecordingBus {
    pub calls: Vec<Call>,
    /// Fail when this opcode is sent, after recording it.
    pub fail_on_command: Option<u8>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls grouped by transfer bracket, reset pulses dropped.
    pub fn transfers(&self) -> Vec<Vec<Call>> {
        let mut batches = Vec::new();
        let mut current = Vec::new();
        for call in &self.calls {
            match call {
                Call::Reset { .. } => {}
                Call::EndTransfer => {
                    current.push(call.clone());
                    batches.push(core::mem::take(&mut current));
                }
                _ => current.push(call.clone()),
            }
        }
        batches
    }
}

impl Bus for RecordingBus {
    type Error = MockError;

    fn start_transfer(&mut self) -> Result<(), MockError> {
        self.calls.push(Call::StartTransfer);
        Ok(())
    }

    fn end_transfer(&mut self) -> Result<(), MockError> {
        self.calls.push(Call::EndTransfer);
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> Result<(), MockError> {
        self.calls.push(Call::Command(command));
        if self.fail_on_command == Some(command) {
            return Err(MockError);
        }
        Ok(())
    }

    fn send_args(&mut self, args: &[u8]) -> Result<(), MockError> {
        self.calls.push(Call::Args(args.to_vec()));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), MockError> {
        self.calls.push(Call::Data(data.to_vec()));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u8) -> Result<(), MockError> {
        self.calls.push(Call::Delay(ms));
        Ok(())
    }

    fn hardware_reset(&mut self, pulse_ms: u8, settle_ms: u8) -> Result<(), MockError> {
        self.calls.push(Call::Reset {
            pulse_ms,
            settle_ms,
        });
        Ok(())
    }
}
