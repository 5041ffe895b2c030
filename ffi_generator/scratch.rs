////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Where the temporary memory of a generated call lives.

use crate::{config::GenConfig, registry::Capacity};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScratchStrategy {
    /// A frame on the calling thread's scratch stack, released when the call returns.
    Stack,
    /// An owned heap buffer, dropped after the call.
    Heap,
}

/// Picks the strategy for a buffer of `capacity` elements of `element_size` bytes.
///
/// Only constant capacities that fit the stack limit go on the stack. A capacity taken from a
/// parameter is up to the caller and always goes to the heap.
pub fn choose(capacity: &Capacity, element_size: usize, config: &GenConfig) -> ScratchStrategy {
    match capacity {
        Capacity::Constant(count) => match count.checked_mul(element_size) {
            Some(bytes) if bytes <= config.stack_scratch_limit => ScratchStrategy::Stack,
            _ => ScratchStrategy::Heap,
        },
        Capacity::Param(_) => ScratchStrategy::Heap,
    }
}
