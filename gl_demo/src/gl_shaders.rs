
#![allow(unused_parens, non_snake_case, dead_code, non_upper_case_globals, unused_variables, unused_unsafe)]
mod __imports {
    pub use std::mem;
    pub use std::os::raw::{c_char, c_void};
    pub use std::ptr;
}

pub mod types {
    #![allow(non_camel_case_types, non_snake_case, dead_code, missing_copy_implementations)]
    
pub type GLboolean = u8;
pub type GLchar = std::os::raw::c_char;
pub type GLenum = u32;
pub type GLfloat = f32;
pub type GLint = i32;
pub type GLsizei = i32;
pub type GLuint = u32;

}
    
#[allow(dead_code, non_upper_case_globals)] pub const GL_FRAGMENT_SHADER: types::GLenum = 0x8B30;
#[allow(dead_code, non_upper_case_globals)] pub const GL_VERTEX_SHADER: types::GLenum = 0x8B31;
#[allow(dead_code, non_upper_case_globals)] pub const GL_COMPILE_STATUS: types::GLenum = 0x8B81;
#[allow(dead_code, non_upper_case_globals)] pub const GL_INFO_LOG_LENGTH: types::GLenum = 0x8B84;
#[inline]
pub fn glAttachShader(caps: &ffi_runtime::Capabilities, program: types::GLuint, shader: types::GLuint) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLuint)>(caps.function(0).loaded("glAttachShader"))(program, shader);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glBindAttribLocation(caps: &ffi_runtime::Capabilities, program: types::GLuint, index: types::GLuint, name: &str) {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let name_encoded = __frame.encode(name, ffi_runtime::Charset::Utf8, true);
let name = name_encoded.as_ptr::<u8>() as *const types::GLchar;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLuint, *const types::GLchar)>(caps.function(1).loaded("glBindAttribLocation"))(program, index, name);
let __ret = __result;
__ret
})
}
}

#[inline]
pub fn glCompileShader(caps: &ffi_runtime::Capabilities, shader: types::GLuint) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint)>(caps.function(2).loaded("glCompileShader"))(shader);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glCreateProgram(caps: &ffi_runtime::Capabilities) -> types::GLuint {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn() -> types::GLuint>(caps.function(3).loaded("glCreateProgram"))();
let __ret = __result;
__ret
}
}

#[inline]
pub fn glCreateShader(caps: &ffi_runtime::Capabilities, type_: types::GLenum) -> types::GLuint {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum) -> types::GLuint>(caps.function(4).loaded("glCreateShader"))(type_);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glGetActiveAttrib(caps: &ffi_runtime::Capabilities, program: types::GLuint, index: types::GLuint, bufSize: types::GLsizei, size: &mut [types::GLint], type_: &mut [types::GLenum]) -> String {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let length_scratch = __frame.zeroed(__imports::mem::size_of::<types::GLsizei>(), __imports::mem::align_of::<types::GLsizei>());
let length = length_scratch.as_mut_ptr::<types::GLsizei>() as *mut types::GLsizei;
let mut name_buffer = ffi_runtime::scratch::HeapBuffer::alloc_for::<u8>(bufSize.max(0) as usize).expect("Failed to allocate scratch memory in glGetActiveAttrib");
let name = name_buffer.as_mut_ptr::<u8>() as *mut types::GLchar;
let size = size.as_mut_ptr() as *mut types::GLint;
let type_ = type_.as_mut_ptr() as *mut types::GLenum;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLuint, types::GLsizei, *mut types::GLsizei, *mut types::GLint, *mut types::GLenum, *mut types::GLchar)>(caps.function(5).loaded("glGetActiveAttrib"))(program, index, bufSize, length, size, type_, name);
let __ret = ffi_runtime::codec::decode_lossy(std::slice::from_raw_parts(name as *const u8, (*length as usize).min(bufSize.max(0) as usize) * 1), ffi_runtime::Charset::Utf8);
drop(name_buffer);
__ret
})
}
}

#[inline]
pub fn glGetAttribLocation(caps: &ffi_runtime::Capabilities, program: types::GLuint, name: &str) -> types::GLint {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let name_encoded = __frame.encode(name, ffi_runtime::Charset::Utf8, true);
let name = name_encoded.as_ptr::<u8>() as *const types::GLchar;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, *const types::GLchar) -> types::GLint>(caps.function(6).loaded("glGetAttribLocation"))(program, name);
let __ret = __result;
__ret
})
}
}

#[inline]
pub fn glGetProgramInfoLog(caps: &ffi_runtime::Capabilities, program: types::GLuint, bufSize: types::GLsizei) -> String {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let length_scratch = __frame.zeroed(__imports::mem::size_of::<types::GLsizei>(), __imports::mem::align_of::<types::GLsizei>());
let length = length_scratch.as_mut_ptr::<types::GLsizei>() as *mut types::GLsizei;
let mut infoLog_buffer = ffi_runtime::scratch::HeapBuffer::alloc_for::<u8>(bufSize.max(0) as usize).expect("Failed to allocate scratch memory in glGetProgramInfoLog");
let infoLog = infoLog_buffer.as_mut_ptr::<u8>() as *mut types::GLchar;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLsizei, *mut types::GLsizei, *mut types::GLchar)>(caps.function(7).loaded("glGetProgramInfoLog"))(program, bufSize, length, infoLog);
let __ret = ffi_runtime::codec::decode_lossy(std::slice::from_raw_parts(infoLog as *const u8, (*length as usize).min(bufSize.max(0) as usize) * 1), ffi_runtime::Charset::Utf8);
drop(infoLog_buffer);
__ret
})
}
}

#[inline]
pub fn glGetShaderInfoLog(caps: &ffi_runtime::Capabilities, shader: types::GLuint, bufSize: types::GLsizei) -> String {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let length_scratch = __frame.zeroed(__imports::mem::size_of::<types::GLsizei>(), __imports::mem::align_of::<types::GLsizei>());
let length = length_scratch.as_mut_ptr::<types::GLsizei>() as *mut types::GLsizei;
let mut infoLog_buffer = ffi_runtime::scratch::HeapBuffer::alloc_for::<u8>(bufSize.max(0) as usize).expect("Failed to allocate scratch memory in glGetShaderInfoLog");
let infoLog = infoLog_buffer.as_mut_ptr::<u8>() as *mut types::GLchar;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLsizei, *mut types::GLsizei, *mut types::GLchar)>(caps.function(8).loaded("glGetShaderInfoLog"))(shader, bufSize, length, infoLog);
let __ret = ffi_runtime::codec::decode_lossy(std::slice::from_raw_parts(infoLog as *const u8, (*length as usize).min(bufSize.max(0) as usize) * 1), ffi_runtime::Charset::Utf8);
drop(infoLog_buffer);
__ret
})
}
}

#[inline]
pub fn glGetShaderiv(caps: &ffi_runtime::Capabilities, shader: types::GLuint, pname: types::GLenum) -> types::GLint {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let params_scratch = __frame.zeroed((1) * __imports::mem::size_of::<types::GLint>(), __imports::mem::align_of::<types::GLint>());
let params = params_scratch.as_mut_ptr::<types::GLint>() as *mut types::GLint;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLenum, *mut types::GLint)>(caps.function(9).loaded("glGetShaderiv"))(shader, pname, params);
let __ret = *params;
__ret
})
}
}

#[inline]
pub fn glGetUniformLocation(caps: &ffi_runtime::Capabilities, program: types::GLuint, name: &str) -> types::GLint {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let name_encoded = __frame.encode(name, ffi_runtime::Charset::Utf8, true);
let name = name_encoded.as_ptr::<u8>() as *const types::GLchar;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, *const types::GLchar) -> types::GLint>(caps.function(10).loaded("glGetUniformLocation"))(program, name);
let __ret = __result;
__ret
})
}
}

#[inline]
pub fn glLinkProgram(caps: &ffi_runtime::Capabilities, program: types::GLuint) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint)>(caps.function(11).loaded("glLinkProgram"))(program);
let __ret = __result;
__ret
}
}

/// Replaces the source code of a shader.
#[inline]
pub fn glShaderSource(caps: &ffi_runtime::Capabilities, shader: types::GLuint, source: &str) {
unsafe {
let count: types::GLsizei = (1) as types::GLsizei;
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let string_strings = ffi_runtime::pointer_array::StringArray::single(source, ffi_runtime::Charset::Utf8, true);
let string_pointers = string_strings.pointers_in(&__frame);
let string = string_pointers.as_mut_ptr::<u8>() as *const *const types::GLchar;
let length_lengths = string_strings.int_lengths_in(&__frame).expect("A string passed to glShaderSource is too long for a 32-bit length");
let length = length_lengths.as_mut_ptr::<u8>() as *const types::GLint;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLsizei, *const *const types::GLchar, *const types::GLint)>(caps.function(12).loaded("glShaderSource"))(shader, count, string, length);
let __ret = __result;
string_strings.free();
__ret
})
}
}

#[inline]
pub fn glUniform1fv(caps: &ffi_runtime::Capabilities, location: types::GLint, value: &[types::GLfloat]) {
unsafe {
let count: types::GLsizei = (ffi_runtime::checks::remaining(value)) as types::GLsizei;
let value = value.as_ptr() as *const types::GLfloat;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLint, types::GLsizei, *const types::GLfloat)>(caps.function(13).loaded("glUniform1fv"))(location, count, value);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glUniform3f(caps: &ffi_runtime::Capabilities, location: types::GLint, v0: types::GLfloat, v1: types::GLfloat, v2: types::GLfloat) {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let v_value = __frame.copy(&[v0, v1, v2]);
let v = v_value.as_mut_ptr::<u8>() as *const types::GLfloat;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLint, *const types::GLfloat)>(caps.function(14).loaded("glUniform3f"))(location, v);
let __ret = __result;
__ret
})
}
}

#[inline]
pub fn glUniform4fv(caps: &ffi_runtime::Capabilities, location: types::GLint, value: &[types::GLfloat]) {
unsafe {
let count: types::GLsizei = ((ffi_runtime::checks::remaining(value) >> (2))) as types::GLsizei;
let value = value.as_ptr() as *const types::GLfloat;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLint, types::GLsizei, *const types::GLfloat)>(caps.function(15).loaded("glUniform4fv"))(location, count, value);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glUseProgram(caps: &ffi_runtime::Capabilities, program: types::GLuint) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint)>(caps.function(16).loaded("glUseProgram"))(program);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glVertexAttribPointer(caps: &ffi_runtime::Capabilities, index: types::GLuint, size: types::GLint, type_: types::GLenum, normalized: types::GLboolean, stride: types::GLsizei) {
unsafe {
let pointer: *const __imports::c_void = 0 as *const __imports::c_void;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLuint, types::GLint, types::GLenum, types::GLboolean, types::GLsizei, *const __imports::c_void)>(caps.function(17).loaded("glVertexAttribPointer"))(index, size, type_, normalized, stride, pointer);
let __ret = __result;
__ret
}
}

pub static CAPABILITY_SPEC: ffi_runtime::CapabilitySpec<'static> = ffi_runtime::CapabilitySpec {
    api: "GL",
    classes: &[
        ffi_runtime::ClassSpec {
            name: "OpenGL20",
            functions: &[
                ffi_runtime::FunctionSpec::new("glCreateShader"),
                ffi_runtime::FunctionSpec::new("glShaderSource"),
                ffi_runtime::FunctionSpec::new("glCompileShader"),
                ffi_runtime::FunctionSpec::new("glGetShaderiv"),
                ffi_runtime::FunctionSpec::new("glGetShaderInfoLog"),
                ffi_runtime::FunctionSpec::new("glCreateProgram"),
                ffi_runtime::FunctionSpec::new("glAttachShader"),
                ffi_runtime::FunctionSpec::new("glLinkProgram"),
                ffi_runtime::FunctionSpec::new("glUseProgram"),
                ffi_runtime::FunctionSpec::new("glGetProgramInfoLog"),
                ffi_runtime::FunctionSpec::new("glGetActiveAttrib"),
                ffi_runtime::FunctionSpec::new("glGetAttribLocation"),
                ffi_runtime::FunctionSpec::new("glBindAttribLocation"),
                ffi_runtime::FunctionSpec::new("glGetUniformLocation"),
                ffi_runtime::FunctionSpec::new("glUniform1fv"),
                ffi_runtime::FunctionSpec::new("glUniform4fv"),
                ffi_runtime::FunctionSpec::new("glUniform3f"),
                ffi_runtime::FunctionSpec::new("glVertexAttribPointer"),
            ],
        },
    ],
};

pub mod index {
    #![allow(non_upper_case_globals)]
    pub const glAttachShader: usize = 0;
    pub const glBindAttribLocation: usize = 1;
    pub const glCompileShader: usize = 2;
    pub const glCreateProgram: usize = 3;
    pub const glCreateShader: usize = 4;
    pub const glGetActiveAttrib: usize = 5;
    pub const glGetAttribLocation: usize = 6;
    pub const glGetProgramInfoLog: usize = 7;
    pub const glGetShaderInfoLog: usize = 8;
    pub const glGetShaderiv: usize = 9;
    pub const glGetUniformLocation: usize = 10;
    pub const glLinkProgram: usize = 11;
    pub const glShaderSource: usize = 12;
    pub const glUniform1fv: usize = 13;
    pub const glUniform3f: usize = 14;
    pub const glUniform4fv: usize = 15;
    pub const glUseProgram: usize = 16;
    pub const glVertexAttribPointer: usize = 17;
}

#[allow(non_snake_case)]
pub struct GLCapabilities {
    pub OpenGL20: bool,
    caps: ffi_runtime::Capabilities,
}

impl GLCapabilities {
    pub fn new<P>(provider: &P, ext: &ffi_runtime::ExtensionSet, forward_compatible: bool) -> GLCapabilities
    where P: ffi_runtime::FunctionProvider + ?Sized {
        let caps = ffi_runtime::build_capabilities(provider, ext, forward_compatible, &CAPABILITY_SPEC);
        GLCapabilities {
            OpenGL20: caps.is_available("OpenGL20"),
            caps,
        }
    }
}

impl std::ops::Deref for GLCapabilities {
    type Target = ffi_runtime::Capabilities;

    fn deref(&self) -> &ffi_runtime::Capabilities { &self.caps }
}
