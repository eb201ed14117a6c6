//! Logging operations.

use crate::{
    Evm, Frame, Halt, gas,
    interpreter::Control,
    memory::{range_end, usize_size},
};
use alloy_primitives::{B256, Bytes};
use state::Backend;

/// `LOG0` through `LOG4`: charges per topic and data byte, then appends the
/// record to the journal. The static-context check happens in the dispatch
/// loop.
pub(crate) fn log<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
    topic_count: u8,
) -> Result<Control, Halt> {
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let mut topics = Vec::with_capacity(topic_count as usize);
    for _ in 0..topic_count {
        let topic = frame.stack.pop()?;
        topics.push(B256::from(topic.to_be_bytes::<32>()));
    }

    let size = usize_size(size)?;
    frame.gas.charge(gas::log_cost(topic_count, size)?)?;

    let data = if size == 0 {
        Bytes::new()
    } else {
        let end = range_end(offset, size)?;
        frame.gas.charge(frame.memory.expansion_cost(end))?;
        frame.memory.grow(end);
        Bytes::copy_from_slice(frame.memory.slice(end - size, size))
    };

    evm.journal.emit_log(frame.address, topics, data);
    Ok(Control::Continue)
}
