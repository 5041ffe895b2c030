////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Calls the generated bindings against fake entry points.

extern crate ffi_runtime;
extern crate gl;

use std::{
    cell::RefCell,
    ffi::CStr,
    os::raw::{c_char, c_void},
    ptr,
};

use ffi_runtime::ExtensionSet;
use gl::{gl_core, gl_shaders};

const INFO_LOG: &str = "héllo log";

thread_local! {
    static CALLS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

fn record(call: String) { CALLS.with(|calls| calls.borrow_mut().push(call)); }

fn take_calls() -> Vec<String> { CALLS.with(|calls| calls.borrow_mut().drain(..).collect()) }

/// Writes as much of `INFO_LOG` as fits, terminated, like a driver truncating its output.
extern "system" fn get_program_info_log(_program: u32, buf_size: i32, length: *mut i32, info_log: *mut c_char) {
    if buf_size <= 0 {
        return;
    }
    let n = INFO_LOG.len().min(buf_size as usize - 1);
    unsafe {
        ptr::copy_nonoverlapping(INFO_LOG.as_ptr(), info_log as *mut u8, n);
        *info_log.add(n) = 0;
        *length = n as i32;
    }
}

extern "system" fn get_uniform_location(_program: u32, name: *const c_char) -> i32 {
    unsafe { CStr::from_ptr(name) }.to_bytes().len() as i32
}

extern "system" fn shader_source(shader: u32, count: i32, string: *const *const c_char, length: *const i32) {
    for i in 0..count as usize {
        let (source, len) = unsafe { (*string.add(i) as *const u8, *length.add(i)) };
        let text = unsafe { std::slice::from_raw_parts(source, len as usize) };
        record(format!("shader {} source {:?}", shader, String::from_utf8_lossy(text)));
    }
}

extern "system" fn buffer_data(target: u32, size: isize, data: *const c_void, _usage: u32) {
    record(format!("buffer {:#x} size {} null {}", target, size, data.is_null()));
}

extern "system" fn create_shader(shader_type: u32) -> u32 { shader_type + 1 }

extern "system" fn get_integerv(_pname: u32, data: *mut i32) { unsafe { *data = 46 } }

extern "system" fn get_string(_name: u32) -> *const c_char { b"Fake GL \xe2\x82\0".as_ptr() as *const c_char }

fn provider(name: &str) -> *const c_void {
    match name {
        "glGetProgramInfoLog" => get_program_info_log as *const c_void,
        "glGetUniformLocation" => get_uniform_location as *const c_void,
        "glShaderSource" => shader_source as *const c_void,
        "glBufferData" => buffer_data as *const c_void,
        "glCreateShader" => create_shader as *const c_void,
        "glGetIntegerv" => get_integerv as *const c_void,
        "glGetString" => get_string as *const c_void,
        _ => ptr::null(),
    }
}

fn shader_caps() -> gl_shaders::GLCapabilities {
    gl_shaders::GLCapabilities::new(&provider, &ExtensionSet::parse("OpenGL20"), true)
}

fn core_caps() -> gl_core::GLCapabilities {
    gl_core::GLCapabilities::new(&provider, &ExtensionSet::parse("OpenGL11 OpenGL15"), true)
}

#[test]
fn truncated_info_logs_drop_partial_characters() {
    let caps = shader_caps();
    assert_eq!(gl_shaders::glGetProgramInfoLog(&caps, 1, 3), "h");
    assert_eq!(gl_shaders::glGetProgramInfoLog(&caps, 1, 4), "hé");
    assert_eq!(gl_shaders::glGetProgramInfoLog(&caps, 1, 1024), INFO_LOG);
    assert_eq!(gl_shaders::glGetProgramInfoLog(&caps, 1, 0), "");
}

#[test]
fn names_larger_than_the_scratch_stack_are_passed_whole() {
    let caps = shader_caps();
    let name = "u".repeat(100 * 1024);
    assert_eq!(gl_shaders::glGetUniformLocation(&caps, 1, &name), 100 * 1024);
    assert_eq!(gl_shaders::glGetUniformLocation(&caps, 1, "color"), 5);
}

#[test]
fn shader_sources_are_passed_with_their_lengths() {
    let caps = shader_caps();
    take_calls();
    gl_shaders::glShaderSource(&caps, 7, "void main() {}");
    assert_eq!(take_calls(), vec!["shader 7 source \"void main() {}\"".to_owned()]);
}

#[test]
fn absent_buffers_are_passed_as_null() {
    let caps = core_caps();
    take_calls();
    gl_core::glBufferData(&caps, gl_core::GL_ARRAY_BUFFER, None, gl_core::GL_STATIC_DRAW);
    gl_core::glBufferData(&caps, gl_core::GL_ARRAY_BUFFER, Some(&[1u8, 2, 3, 4][..]), gl_core::GL_STATIC_DRAW);
    assert_eq!(take_calls(), vec![
        "buffer 0x8892 size 0 null true".to_owned(),
        "buffer 0x8892 size 4 null false".to_owned(),
    ]);
}

#[test]
fn keyword_parameters_and_returned_values() {
    let shaders = shader_caps();
    let shader = gl_shaders::glCreateShader(&shaders, gl_shaders::GL_VERTEX_SHADER);
    assert_eq!(shader, gl_shaders::GL_VERTEX_SHADER + 1);

    let core = core_caps();
    assert_eq!(gl_core::glGetIntegerv(&core, gl_core::GL_VERSION), 46);
    assert_eq!(gl_core::glGetString(&core, gl_core::GL_VERSION).as_deref(), Some("Fake GL "));
}

#[test]
fn missing_classes_are_reported() {
    let caps = core_caps();
    assert!(!caps.OpenGL15);
    assert!(caps.demoted().iter().any(|class| class == "OpenGL11"));
}

#[test]
#[should_panic(expected = "glLinkProgram was not loaded")]
fn unresolved_functions_panic_with_their_name() {
    let caps = shader_caps();
    gl_shaders::glLinkProgram(&caps, 1);
}
