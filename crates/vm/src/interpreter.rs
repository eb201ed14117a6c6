//! The per-instruction dispatch loop.

use crate::{
    Evm, Frame, Halt, Outcome, gas,
    instructions::{
        arithmetic, bitwise, block, environment, flow, logging, memory as memory_ops,
        stack as stack_ops, storage, system,
    },
    evm::CallKind,
    trace,
};
use alloy_primitives::Bytes;
use asm::Mnemonic;
use state::Backend;

/// How the loop proceeds after one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Control {
    /// Advance past the instruction and its immediates.
    Continue,
    /// The handler set the program counter.
    Jump,
    /// Halt successfully with no output.
    Stop,
    /// Halt successfully with the frame's output.
    Return,
    /// Roll back this frame's changes, keeping output and unspent gas.
    Revert,
    /// Halt successfully after registering the self-destruct.
    SelfDestruct,
}

/// Mnemonics forbidden under the static flag. `CALL` with value is checked in
/// its handler, where the operand is known.
fn mutates_state(mnemonic: Mnemonic) -> bool {
    mnemonic.is_log()
        || matches!(
            mnemonic,
            Mnemonic::SSTORE
                | Mnemonic::TSTORE
                | Mnemonic::CREATE
                | Mnemonic::CREATE2
                | Mnemonic::SELFDESTRUCT
        )
}

impl<B: Backend> Evm<B> {
    /// Runs a frame until it halts. The frame's gas counter reflects the
    /// run; exceptional halts leave it empty.
    pub(crate) fn run_frame(&mut self, frame: &mut Frame) -> (Outcome, Bytes) {
        loop {
            let pc = frame.pc;
            let Some(byte) = frame.code.get(pc).copied() else {
                // Running off the end of the code is an implicit STOP.
                return (Outcome::Success, Bytes::new());
            };

            let mnemonic = match Mnemonic::from_byte(byte) {
                Some(mnemonic) if self.fork.supports(mnemonic) => mnemonic,
                _ => {
                    frame.gas.consume_all();
                    return (Outcome::Halt(Halt::InvalidOpcode(byte)), Bytes::new());
                }
            };

            let observed = self.tracer.is_some().then(|| {
                (
                    frame.gas.remaining(),
                    frame.memory.len(),
                    frame
                        .stack
                        .items()
                        .iter()
                        .map(|word| format!("{word:#x}"))
                        .collect::<Vec<_>>(),
                    self.journal.refund().max(0).unsigned_abs(),
                )
            });

            let step = self.step(mnemonic, frame);

            if let Some((gas_before, mem_size, stack, refund)) = observed {
                let cost = gas_before.saturating_sub(frame.gas.remaining());
                let depth = self.depth as u64;
                if let Some(tracer) = self.tracer.as_mut() {
                    tracer.step(&trace::Step {
                        pc: pc as u64,
                        op: byte,
                        gas: trace::hex_u64(gas_before),
                        gas_cost: trace::hex_u64(cost),
                        stack,
                        mem_size: mem_size as u64,
                        depth,
                        refund,
                        op_name: mnemonic.to_string(),
                    });
                }
            }

            match step {
                Ok(Control::Continue) => {
                    frame.pc = pc + 1 + mnemonic.immediate_size() as usize;
                }
                Ok(Control::Jump) => {}
                Ok(Control::Stop | Control::SelfDestruct) => {
                    return (Outcome::Success, Bytes::new());
                }
                Ok(Control::Return) => {
                    let output = std::mem::take(&mut frame.output);
                    return (Outcome::Success, output);
                }
                Ok(Control::Revert) => {
                    let output = std::mem::take(&mut frame.output);
                    return (Outcome::Revert, output);
                }
                Err(halt) => {
                    frame.gas.consume_all();
                    return (Outcome::Halt(halt), Bytes::new());
                }
            }
        }
    }

    /// Checks arity, the static flag and the static charge, then executes one
    /// instruction.
    fn step(&mut self, mnemonic: Mnemonic, frame: &mut Frame) -> Result<Control, Halt> {
        frame.stack.require(
            mnemonic.stack_inputs() as usize,
            mnemonic.stack_outputs() as usize,
        )?;

        if frame.is_static && mutates_state(mnemonic) {
            return Err(Halt::StaticStateChange);
        }

        frame.gas.charge(gas::static_cost(mnemonic, self.fork))?;

        if let Some(size) = mnemonic.push_size() {
            return stack_ops::push(frame, size);
        }
        if let Some(depth) = mnemonic.dup_depth() {
            return stack_ops::dup(frame, depth);
        }
        if let Some(depth) = mnemonic.swap_depth() {
            return stack_ops::swap(frame, depth);
        }
        if let Some(topics) = mnemonic.log_topic_count() {
            return logging::log(self, frame, topics);
        }

        use Mnemonic as M;
        match mnemonic {
            M::STOP => flow::stop(),
            M::ADD => arithmetic::add(frame),
            M::MUL => arithmetic::mul(frame),
            M::SUB => arithmetic::sub(frame),
            M::DIV => arithmetic::div(frame),
            M::SDIV => arithmetic::sdiv(frame),
            M::MOD => arithmetic::rem(frame),
            M::SMOD => arithmetic::srem(frame),
            M::ADDMOD => arithmetic::addmod(frame),
            M::MULMOD => arithmetic::mulmod(frame),
            M::EXP => arithmetic::exp(frame, self.fork),
            M::SIGNEXTEND => arithmetic::signextend(frame),

            M::LT => bitwise::lt(frame),
            M::GT => bitwise::gt(frame),
            M::SLT => bitwise::slt(frame),
            M::SGT => bitwise::sgt(frame),
            M::EQ => bitwise::eq(frame),
            M::ISZERO => bitwise::iszero(frame),
            M::AND => bitwise::and(frame),
            M::OR => bitwise::or(frame),
            M::XOR => bitwise::xor(frame),
            M::NOT => bitwise::not(frame),
            M::BYTE => bitwise::byte(frame),
            M::SHL => bitwise::shl(frame),
            M::SHR => bitwise::shr(frame),
            M::SAR => bitwise::sar(frame),

            M::KECCAK256 => system::keccak256(frame),

            M::ADDRESS => environment::address(frame),
            M::BALANCE => environment::balance(self, frame),
            M::ORIGIN => environment::origin(self, frame),
            M::CALLER => environment::caller(frame),
            M::CALLVALUE => environment::callvalue(frame),
            M::CALLDATALOAD => environment::calldataload(frame),
            M::CALLDATASIZE => environment::calldatasize(frame),
            M::CALLDATACOPY => environment::calldatacopy(frame),
            M::CODESIZE => environment::codesize(frame),
            M::CODECOPY => environment::codecopy(frame),
            M::GASPRICE => environment::gasprice(self, frame),
            M::EXTCODESIZE => environment::extcodesize(self, frame),
            M::EXTCODECOPY => environment::extcodecopy(self, frame),
            M::RETURNDATASIZE => environment::returndatasize(frame),
            M::RETURNDATACOPY => environment::returndatacopy(frame),
            M::EXTCODEHASH => environment::extcodehash(self, frame),

            M::BLOCKHASH => block::blockhash(self, frame),
            M::COINBASE => block::coinbase(self, frame),
            M::TIMESTAMP => block::timestamp(self, frame),
            M::NUMBER => block::number(self, frame),
            M::PREVRANDAO => block::prevrandao(self, frame),
            M::GASLIMIT => block::gaslimit(self, frame),
            M::CHAINID => block::chainid(self, frame),
            M::SELFBALANCE => block::selfbalance(self, frame),
            M::BASEFEE => block::basefee(self, frame),
            M::BLOBHASH => block::blobhash(self, frame),
            M::BLOBBASEFEE => block::blobbasefee(self, frame),

            M::POP => stack_ops::pop(frame),
            M::MLOAD => memory_ops::mload(frame),
            M::MSTORE => memory_ops::mstore(frame),
            M::MSTORE8 => memory_ops::mstore8(frame),
            M::MSIZE => memory_ops::msize(frame),
            M::MCOPY => memory_ops::mcopy(frame),

            M::SLOAD => storage::sload(self, frame),
            M::SSTORE => storage::sstore(self, frame),
            M::TLOAD => storage::tload(self, frame),
            M::TSTORE => storage::tstore(self, frame),

            M::JUMP => flow::jump(frame),
            M::JUMPI => flow::jumpi(frame),
            M::PC => flow::pc(frame),
            M::GAS => flow::gas_remaining(frame),
            M::JUMPDEST => flow::jumpdest(),

            M::CREATE => system::create(self, frame, false),
            M::CREATE2 => system::create(self, frame, true),
            M::CALL => system::call(self, frame, CallKind::Call),
            M::CALLCODE => system::call(self, frame, CallKind::CallCode),
            M::DELEGATECALL => system::call(self, frame, CallKind::DelegateCall),
            M::STATICCALL => system::call(self, frame, CallKind::StaticCall),
            M::RETURN => system::ret(frame),
            M::REVERT => system::revert(frame),
            M::INVALID => system::invalid(),
            M::SELFDESTRUCT => system::selfdestruct(self, frame),

            // PUSH/DUP/SWAP/LOG were dispatched above.
            _ => Err(Halt::InvalidOpcode(mnemonic.into_byte())),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Frame;
    use alloy_primitives::{Address, Bytes, U256};
    use forks::Fork;
    use state::InMemoryState;

    /// A frame with the given words pushed bottom-to-top and a generous gas
    /// allowance, for exercising handlers directly.
    pub(crate) fn frame_with_stack(words: &[U256]) -> Frame {
        let mut frame = frame_with_code(&[]);
        for word in words {
            frame.stack.push(*word).unwrap();
        }
        frame
    }

    /// A frame executing the given code with a generous gas allowance.
    pub(crate) fn frame_with_code(code: &[u8]) -> Frame {
        Frame::new(
            Bytes::copy_from_slice(code),
            Bytes::new(),
            Address::repeat_byte(0xEE),
            Address::repeat_byte(0xCC),
            U256::ZERO,
            1_000_000,
            false,
        )
    }

    fn evm(fork: Fork) -> Evm<InMemoryState> {
        Evm::new(InMemoryState::default(), fork)
    }

    #[test]
    fn running_off_the_code_is_an_implicit_stop() {
        let mut frame = frame_with_code(&[0x60, 0x01]);
        let (outcome, output) = evm(Fork::Cancun).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Success);
        assert!(output.is_empty());
        assert_eq!(frame.gas.spent(), 3);
    }

    #[test]
    fn invalid_opcode_consumes_all_gas() {
        let mut frame = frame_with_code(&[0x0C]);
        let (outcome, _) = evm(Fork::Cancun).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Halt(Halt::InvalidOpcode(0x0C)));
        assert_eq!(frame.gas.remaining(), 0);
    }

    #[test]
    fn designated_invalid_consumes_all_gas() {
        let mut frame = frame_with_code(&[0xFE]);
        let (outcome, _) = evm(Fork::Cancun).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Halt(Halt::InvalidOpcode(0xFE)));
        assert_eq!(frame.gas.remaining(), 0);
    }

    #[test]
    fn opcodes_respect_their_introduction_fork() {
        let mut frame = frame_with_code(&[0x5F]);
        let (outcome, _) = evm(Fork::Paris).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Halt(Halt::InvalidOpcode(0x5F)));

        let mut frame = frame_with_code(&[0x5F]);
        let (outcome, _) = evm(Fork::Shanghai).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(frame.gas.spent(), 2);
    }

    #[test]
    fn static_flag_blocks_mutating_opcodes() {
        // PUSH1 1; PUSH1 0; SSTORE under the static flag.
        let mut frame = frame_with_code(&[0x60, 0x01, 0x60, 0x00, 0x55]);
        frame.is_static = true;
        let (outcome, _) = evm(Fork::Cancun).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Halt(Halt::StaticStateChange));
        assert_eq!(frame.gas.remaining(), 0);
    }

    #[test]
    fn underflow_is_caught_before_dispatch() {
        // ADD on an empty stack.
        let mut frame = frame_with_code(&[0x01]);
        let (outcome, _) = evm(Fork::Cancun).run_frame(&mut frame);
        assert_eq!(outcome, Outcome::Halt(Halt::StackUnderflow));
    }
}
