////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Runtime support for bindings emitted by `ffi_generator`.
//!
//! # Example
//!
//! ```no_run
//! use ffi_runtime::{build_capabilities, CapabilitySpec, ClassSpec, ExtensionSet, FunctionSpec};
//! # use std::os::raw::c_void;
//! # fn get_proc_address(_: &str) -> *const c_void { std::ptr::null() }
//!
//! static SPEC: CapabilitySpec = CapabilitySpec {
//!     api: "GL",
//!     classes: &[ClassSpec {
//!         name: "GL_ARB_sync",
//!         functions: &[FunctionSpec::new("glFenceSync"), FunctionSpec::new("glDeleteSync")],
//!     }],
//! };
//!
//! let ext = ExtensionSet::parse("GL_ARB_sync GL_KHR_debug");
//! let caps = build_capabilities(&get_proc_address, &ext, false, &SPEC);
//! if caps.is_available("GL_ARB_sync") {
//!     // ...
//! }
//! ```

#[macro_use]
extern crate log;

pub mod caps;
pub mod checks;
pub mod codec;
pub mod config;
pub mod pointer_array;
pub mod provider;
pub mod scratch;

pub use caps::{
    build_capabilities, Capabilities, CapabilitiesBuilder, CapabilitySpec, ClassAvailability, ClassSpec, Dependency,
    ExtensionSet, FunctionSpec,
};
pub use codec::Charset;
pub use provider::{FnPtr, FunctionProvider, Platform};
