////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! A native bindings generator. Declarations of functions and their parameter tags are loaded
//! into a [`Registry`], every function gets its parameter transforms selected, and a
//! [`Generator`] writes the binding code or the capability table.
//!
//! # Example
//!
//! In `build.rs`, writing the module into `src/` since the generated file opens with inner
//! attributes:
//!
//! ```no_run
//! extern crate ffi_generator;
//!
//! use ffi_generator::{BindingGenerator, CapabilitiesGenerator, GenConfig, Registry};
//! use std::fs::{self, File};
//!
//! fn main() {
//!     let template = File::open("templates/gl.xml").unwrap();
//!     let registry = Registry::from_xml(template, GenConfig::default()).unwrap();
//!
//!     let mut code = Vec::new();
//!     registry.write_bindings(BindingGenerator, &mut code).unwrap();
//!     registry.write_bindings(CapabilitiesGenerator, &mut code).unwrap();
//!     if fs::read("src/gl.rs").ok().as_ref() != Some(&code) {
//!         fs::write("src/gl.rs", &code).unwrap();
//!     }
//!     println!("cargo:rerun-if-changed=templates/gl.xml");
//! }
//! ```
//!
//! In your project:
//!
//! ```ignore
//! pub mod gl;
//! ```
//!
//! The generated functions take the `ffi_runtime::Capabilities` they call through as their
//! first argument, so the crate including them must depend on `ffi_runtime`.

extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate xml;

pub mod config;
mod error;
pub mod generators;
mod registry;
pub mod scratch;
pub mod transforms;

pub use ffi_runtime::{Charset, Dependency, Platform};

pub use config::{DebugPrints, GenConfig};
pub use error::GenError;
pub use generators::{binding_gen::BindingGenerator, capabilities_gen::CapabilitiesGenerator, Generator};
pub use registry::*;
pub use scratch::ScratchStrategy;
