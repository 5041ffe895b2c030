////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

/// Code emitted around each native call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugPrints {
    None,
    /// Every call prints its name, arguments and result.
    FunctionCalls,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenConfig {
    /// Largest scratch allocation, in bytes, placed on the thread's scratch stack. Bigger or
    /// caller-sized buffers go to the heap. Should not exceed the runtime's stack size.
    pub stack_scratch_limit: usize,
    /// Puts every returned string on the heap, whatever its capacity.
    pub heap_string_returns: bool,
    pub debug_prints: DebugPrints,
}

impl Default for GenConfig {
    fn default() -> GenConfig {
        GenConfig {
            stack_scratch_limit: ffi_runtime::config::DEFAULT_STACK_SIZE,
            heap_string_returns: false,
            debug_prints: DebugPrints::None,
        }
    }
}

impl GenConfig {
    pub fn debug_prints(mut self, debug_prints: DebugPrints) -> GenConfig {
        self.debug_prints = debug_prints;
        self
    }

    pub fn stack_scratch_limit(mut self, limit: usize) -> GenConfig {
        self.stack_scratch_limit = limit;
        self
    }
}
