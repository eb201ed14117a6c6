//! CLI for executing EVM bytecode.

/// CLI arguments.
mod args;

use alloy_primitives::{Address, Bytes, U256};
use anyhow::Context;
use clap::Parser as _;
use forks::Fork;
use state::{Account, InMemoryState};
use std::str::FromStr;
use strum::IntoEnumIterator as _;
use vm::{Evm, ExecutionResult, TxEnv, TxKind, trace::Eip3155Writer};

use crate::args::{Cli, Command};

/// Address the bytecode is installed at.
const CONTRACT: Address = Address::repeat_byte(0xC0);

/// Address the transaction is sent from.
const SENDER: Address = Address::repeat_byte(0xAA);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            code,
            calldata,
            gas,
            fork,
            value,
            trace,
            json,
        } => run(&code, &calldata, gas, &fork, value, trace, json),
        Command::Forks => {
            list_forks();
            Ok(())
        }
    }
}

/// Executes bytecode as a top-level call and prints the result.
fn run(
    code: &str,
    calldata: &str,
    gas: u64,
    fork: &str,
    value: u64,
    trace: bool,
    json: bool,
) -> anyhow::Result<()> {
    let fork = Fork::from_str(fork)
        .ok()
        .with_context(|| format!("unknown fork {fork:?}; see `fovea forks`"))?;
    let code = decode_hex(code).context("failed to parse --code")?;
    let calldata = decode_hex(calldata).context("failed to parse --calldata")?;

    let mut state = InMemoryState::default();
    state.insert(
        CONTRACT,
        Account {
            code: Bytes::from(code),
            ..Account::default()
        },
    );
    state.insert(
        SENDER,
        Account::with_balance(U256::from(u128::MAX)),
    );

    let mut evm = Evm::new(state, fork);
    if trace {
        evm = evm.with_tracer(Box::new(Eip3155Writer::new(std::io::stderr())));
    }

    let result = evm
        .transact(TxEnv {
            caller: SENDER,
            kind: TxKind::Call(CONTRACT),
            value: U256::from(value),
            data: Bytes::from(calldata),
            gas_limit: gas,
            ..TxEnv::default()
        })
        .context("transaction rejected")?;

    if json {
        print_json(&result);
    } else {
        print_plain(&result);
    }
    Ok(())
}

/// Plain-text result report.
fn print_plain(result: &ExecutionResult) {
    println!(
        "status:   {}",
        if result.success { "success" } else { "failed" }
    );
    println!("gas used: {}", result.gas_used);
    if result.gas_refunded > 0 {
        println!("refunded: {}", result.gas_refunded);
    }
    println!("output:   0x{}", hex::encode(&result.output));
    for log in &result.logs {
        println!("log from {}:", log.address);
        for topic in &log.topics {
            println!("  topic {topic}");
        }
        println!("  data 0x{}", hex::encode(&log.data));
    }
}

/// JSON result report.
fn print_json(result: &ExecutionResult) {
    let logs: Vec<serde_json::Value> = result
        .logs
        .iter()
        .map(|log| {
            serde_json::json!({
                "address": log.address.to_string(),
                "topics": log.topics.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "data": format!("0x{}", hex::encode(&log.data)),
            })
        })
        .collect();

    let report = serde_json::json!({
        "success": result.success,
        "gasUsed": result.gas_used,
        "gasRefunded": result.gas_refunded,
        "output": format!("0x{}", hex::encode(&result.output)),
        "logs": logs,
    });
    println!("{report:#}");
}

/// Lists the supported forks in activation order.
fn list_forks() {
    for fork in Fork::iter() {
        println!(
            "{:<16} mainnet block {}",
            fork.to_string(),
            fork.mainnet_activation_block()
        );
    }
}

/// Decodes hex input, tolerating a `0x` prefix and empty input.
fn decode_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    if stripped.is_empty() {
        return Ok(Vec::new());
    }
    hex::decode(stripped).context("invalid hex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_decoding_tolerates_prefixes() {
        assert_eq!(decode_hex("0x6001").unwrap(), vec![0x60, 0x01]);
        assert_eq!(decode_hex("6001").unwrap(), vec![0x60, 0x01]);
        assert!(decode_hex("").unwrap().is_empty());
        assert!(decode_hex("0xZZ").is_err());
    }
}
