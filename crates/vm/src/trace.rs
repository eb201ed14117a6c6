//! EIP-3155 execution tracing.
//!
//! One JSON object per executed instruction, plus a closing summary record,
//! written as JSON lines. The format matches the cross-client tracing
//! convention used for divergence debugging.

use alloy_primitives::hex;
use serde::Serialize;
use std::io::Write;

/// One executed instruction.
#[derive(Clone, Debug, Serialize)]
pub struct Step {
    /// Program counter before the instruction.
    pub pc: u64,
    /// Opcode byte.
    pub op: u8,
    /// Gas available before the instruction, hex encoded.
    pub gas: String,
    /// Gas the instruction cost, hex encoded.
    #[serde(rename = "gasCost")]
    pub gas_cost: String,
    /// Stack before the instruction, bottom first, hex encoded.
    pub stack: Vec<String>,
    /// Memory size in bytes before the instruction.
    #[serde(rename = "memSize")]
    pub mem_size: u64,
    /// Call depth, starting at 1 for the transaction's root frame.
    pub depth: u64,
    /// Refund counter before the instruction.
    pub refund: u64,
    /// Mnemonic of the opcode.
    #[serde(rename = "opName")]
    pub op_name: String,
}

/// Closing record of one transaction trace.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    /// Output bytes of the transaction, hex encoded.
    pub output: String,
    /// Total gas charged, hex encoded.
    #[serde(rename = "gasUsed")]
    pub gas_used: String,
    /// Error message if the transaction did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Receives trace records as execution progresses.
pub trait TraceSink {
    /// Called before each instruction executes, with its observed cost.
    fn step(&mut self, step: &Step);

    /// Called once after the transaction finishes.
    fn finish(&mut self, summary: &Summary);
}

/// Writes EIP-3155 JSON lines to any [`Write`] destination.
pub struct Eip3155Writer<W: Write> {
    /// Destination of the JSON lines.
    out: W,
}

impl<W: Write> Eip3155Writer<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> TraceSink for Eip3155Writer<W> {
    fn step(&mut self, step: &Step) {
        if let Ok(line) = serde_json::to_string(step) {
            // Tracing is diagnostic; a failed write must not affect execution.
            writeln!(self.out, "{line}").ok();
        }
    }

    fn finish(&mut self, summary: &Summary) {
        if let Ok(line) = serde_json::to_string(summary) {
            writeln!(self.out, "{line}").ok();
        }
    }
}

/// Hex encodes a quantity the way EIP-3155 expects: `0x`-prefixed, no
/// leading zeros.
#[must_use]
pub fn hex_u64(value: u64) -> String {
    format!("{value:#x}")
}

/// Hex encodes a byte string, `0x`-prefixed.
#[must_use]
pub fn hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_serialize_with_camel_case_fields() {
        let step = Step {
            pc: 0,
            op: 0x60,
            gas: hex_u64(100_000),
            gas_cost: hex_u64(3),
            stack: vec![],
            mem_size: 0,
            depth: 1,
            refund: 0,
            op_name: "PUSH1".into(),
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"gasCost\":\"0x3\""));
        assert!(json.contains("\"opName\":\"PUSH1\""));
        assert!(json.contains("\"gas\":\"0x186a0\""));
    }

    #[test]
    fn writer_emits_one_line_per_record() {
        let mut buffer = Vec::new();
        {
            let mut writer = Eip3155Writer::new(&mut buffer);
            writer.step(&Step {
                pc: 0,
                op: 0,
                gas: hex_u64(1),
                gas_cost: hex_u64(0),
                stack: vec![],
                mem_size: 0,
                depth: 1,
                refund: 0,
                op_name: "STOP".into(),
            });
            writer.finish(&Summary {
                output: hex_bytes(&[]),
                gas_used: hex_u64(21_000),
                error: None,
            });
        }
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains("0x5208"));
    }
}
