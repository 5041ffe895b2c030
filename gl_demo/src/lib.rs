////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! OpenGL bindings for the demo templates in `ffigen/templates`.
//!
//! Both modules are written by `build.rs` whenever their template or the generator output
//! changes. Enable `fn_calls_print` to print every call.

extern crate ffi_runtime;

pub mod gl_core;
pub mod gl_shaders;
