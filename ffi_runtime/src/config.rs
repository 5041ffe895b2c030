////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::env;

use lazy_static::lazy_static;

/// Environment variable holding the scratch stack size, in KiB.
pub const STACK_SIZE_VAR: &str = "FFI_STACK_SIZE";

pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Size in bytes of each thread's scratch stack.
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> RuntimeConfig {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> RuntimeConfig { RuntimeConfig::from_lookup(|key| env::var(key).ok()) }

    fn from_lookup<F>(lookup: F) -> RuntimeConfig
    where F: Fn(&str) -> Option<String> {
        let mut config = RuntimeConfig::default();
        if let Some(value) = lookup(STACK_SIZE_VAR) {
            match value.trim().parse::<usize>() {
                Ok(kib) if kib > 0 => config.stack_size = kib * 1024,
                _ => warn!("ignoring {}={:?}, expected a positive size in KiB", STACK_SIZE_VAR, value),
            }
        }
        config
    }
}

lazy_static! {
    static ref CONFIG: RuntimeConfig = RuntimeConfig::from_env();
}

/// The process-wide configuration, read from the environment on first use.
pub fn get() -> &'static RuntimeConfig { &CONFIG }
