
#![allow(unused_parens, non_snake_case, dead_code, non_upper_case_globals, unused_variables, unused_unsafe)]
mod __imports {
    pub use std::mem;
    pub use std::os::raw::{c_char, c_void};
    pub use std::ptr;
}

pub mod types {
    #![allow(non_camel_case_types, non_snake_case, dead_code, missing_copy_implementations)]
    
pub type GLDEBUGPROC = *const std::os::raw::c_void;
pub type GLbitfield = u32;
pub type GLboolean = u8;
pub type GLchar = std::os::raw::c_char;
pub type GLenum = u32;
pub type GLfloat = f32;
pub type GLint = i32;
pub type GLintptr = isize;
pub type GLsizei = i32;
pub type GLsizeiptr = isize;
pub type GLsync = *const std::os::raw::c_void;
pub type GLuint = u32;
pub type GLuint64 = u64;

}
    
#[allow(dead_code, non_upper_case_globals)] pub const GL_TRIANGLES: types::GLenum = 0x0004;
#[allow(dead_code, non_upper_case_globals)] pub const GL_COLOR_BUFFER_BIT: types::GLbitfield = 0x00004000;
#[allow(dead_code, non_upper_case_globals)] pub const GL_VENDOR: types::GLenum = 0x1F00;
#[allow(dead_code, non_upper_case_globals)] pub const GL_RENDERER: types::GLenum = 0x1F01;
#[allow(dead_code, non_upper_case_globals)] pub const GL_VERSION: types::GLenum = 0x1F02;
#[allow(dead_code, non_upper_case_globals)] pub const GL_ARRAY_BUFFER: types::GLenum = 0x8892;
#[allow(dead_code, non_upper_case_globals)] pub const GL_STATIC_DRAW: types::GLenum = 0x88E4;
#[allow(dead_code, non_upper_case_globals)] pub const GL_MAP_READ_BIT: types::GLbitfield = 0x0001;
#[allow(dead_code, non_upper_case_globals)] pub const GL_MAP_WRITE_BIT: types::GLbitfield = 0x0002;
#[allow(dead_code, non_upper_case_globals)] pub const GL_SYNC_GPU_COMMANDS_COMPLETE: types::GLenum = 0x9117;
#[allow(dead_code, non_upper_case_globals)] pub const GL_TIMEOUT_IGNORED: types::GLuint64 = 0xFFFFFFFFFFFFFFFF;
///
/// Not available in forward compatible contexts.
#[inline]
pub fn glBegin(caps: &ffi_runtime::Capabilities, mode: types::GLenum) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum)>(caps.function(0).loaded("glBegin"))(mode);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glBindBuffer(caps: &ffi_runtime::Capabilities, target: types::GLenum, buffer: types::GLuint) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, types::GLuint)>(caps.function(1).loaded("glBindBuffer"))(target, buffer);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glBufferData(caps: &ffi_runtime::Capabilities, target: types::GLenum, data: Option<&[u8]>, usage: types::GLenum) {
unsafe {
let size: types::GLsizeiptr = (ffi_runtime::checks::remaining_or_zero(data.as_deref())) as types::GLsizeiptr;
let data = data.map_or(__imports::ptr::null(), |b| b.as_ptr()) as *const __imports::c_void;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, types::GLsizeiptr, *const __imports::c_void, types::GLenum)>(caps.function(2).loaded("glBufferData"))(target, size, data, usage);
let __ret = __result;
__ret
}
}

/// Clears buffers to preset values.
#[inline]
pub fn glClear(caps: &ffi_runtime::Capabilities, mask: types::GLbitfield) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLbitfield)>(caps.function(3).loaded("glClear"))(mask);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glClearColor(caps: &ffi_runtime::Capabilities, red: types::GLfloat, green: types::GLfloat, blue: types::GLfloat, alpha: types::GLfloat) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLfloat, types::GLfloat, types::GLfloat, types::GLfloat)>(caps.function(4).loaded("glClearColor"))(red, green, blue, alpha);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glClientWaitSync(caps: &ffi_runtime::Capabilities, sync: types::GLsync, flags: types::GLbitfield, timeout: types::GLuint64) -> types::GLenum {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLsync, types::GLbitfield, types::GLuint64) -> types::GLenum>(caps.function(5).loaded("glClientWaitSync"))(sync, flags, timeout);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glDebugMessageCallbackARB(caps: &ffi_runtime::Capabilities, callback: types::GLDEBUGPROC, userParam: &[u8]) {
unsafe {
let userParam = userParam.as_ptr() as *const __imports::c_void;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLDEBUGPROC, *const __imports::c_void)>(caps.function(6).loaded("glDebugMessageCallbackARB"))(callback, userParam);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glDebugMessageInsertARB(caps: &ffi_runtime::Capabilities, source: types::GLenum, type_: types::GLenum, id: types::GLuint, severity: types::GLenum, buf: &str) {
unsafe {
let length: types::GLsizei = (ffi_runtime::codec::encoded_len(buf, ffi_runtime::Charset::Utf8)) as types::GLsizei;
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let buf_encoded = __frame.encode(buf, ffi_runtime::Charset::Utf8, true);
let buf = buf_encoded.as_ptr::<u8>() as *const types::GLchar;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, types::GLenum, types::GLuint, types::GLenum, types::GLsizei, *const types::GLchar)>(caps.function(7).loaded("glDebugMessageInsertARB"))(source, type_, id, severity, length, buf);
let __ret = __result;
__ret
})
}
}

#[inline]
pub fn glDeleteSync(caps: &ffi_runtime::Capabilities, sync: types::GLsync) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLsync)>(caps.function(8).loaded("glDeleteSync"))(sync);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glDeleteTextures(caps: &ffi_runtime::Capabilities, texture: types::GLuint) {
unsafe {
let n: types::GLsizei = (1) as types::GLsizei;
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let textures_value = __frame.copy(&[texture]);
let textures = textures_value.as_mut_ptr::<u8>() as *const types::GLuint;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLsizei, *const types::GLuint)>(caps.function(9).loaded("glDeleteTextures"))(n, textures);
let __ret = __result;
__ret
})
}
}

///
/// Not available in forward compatible contexts.
#[inline]
pub fn glEnd(caps: &ffi_runtime::Capabilities) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn()>(caps.function(10).loaded("glEnd"))();
let __ret = __result;
__ret
}
}

#[inline]
pub fn glFenceSync(caps: &ffi_runtime::Capabilities, condition: types::GLenum, flags: types::GLbitfield) -> types::GLsync {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, types::GLbitfield) -> types::GLsync>(caps.function(11).loaded("glFenceSync"))(condition, flags);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glGenBuffers(caps: &ffi_runtime::Capabilities, buffers: &mut [types::GLuint]) {
unsafe {
let n: types::GLsizei = (ffi_runtime::checks::remaining(buffers)) as types::GLsizei;
let buffers = buffers.as_mut_ptr() as *mut types::GLuint;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLsizei, *mut types::GLuint)>(caps.function(12).loaded("glGenBuffers"))(n, buffers);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glGenTextures(caps: &ffi_runtime::Capabilities, textures: &mut [types::GLuint]) {
unsafe {
let n: types::GLsizei = (ffi_runtime::checks::remaining(textures)) as types::GLsizei;
let textures = textures.as_mut_ptr() as *mut types::GLuint;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLsizei, *mut types::GLuint)>(caps.function(13).loaded("glGenTextures"))(n, textures);
let __ret = __result;
__ret
}
}

#[inline]
pub fn glGetIntegerv(caps: &ffi_runtime::Capabilities, pname: types::GLenum) -> types::GLint {
unsafe {
ffi_runtime::scratch::with_stack(|__stack| {
let __frame = __stack.push();
let data_scratch = __frame.zeroed((1) * __imports::mem::size_of::<types::GLint>(), __imports::mem::align_of::<types::GLint>());
let data = data_scratch.as_mut_ptr::<types::GLint>() as *mut types::GLint;
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, *mut types::GLint)>(caps.function(14).loaded("glGetIntegerv"))(pname, data);
let __ret = *data;
__ret
})
}
}

#[inline]
pub fn glGetString(caps: &ffi_runtime::Capabilities, name: types::GLenum) -> Option<String> {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum) -> *const types::GLchar>(caps.function(15).loaded("glGetString"))(name);
let __ret = ffi_runtime::codec::decode_ptr_lossy(__result as *const __imports::c_char, ffi_runtime::Charset::Utf8);
__ret
}
}

#[inline]
pub fn glGetStringi(caps: &ffi_runtime::Capabilities, name: types::GLenum, index: types::GLuint) -> Option<String> {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, types::GLuint) -> *const types::GLchar>(caps.function(16).loaded("glGetStringi"))(name, index);
let __ret = ffi_runtime::codec::decode_ptr_lossy(__result as *const __imports::c_char, ffi_runtime::Charset::Utf8);
__ret
}
}

#[inline]
pub fn glMapBufferRange(caps: &ffi_runtime::Capabilities, target: types::GLenum, offset: types::GLintptr, length: types::GLsizeiptr, access: types::GLbitfield) -> Option<&'static mut [u8]> {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum, types::GLintptr, types::GLsizeiptr, types::GLbitfield) -> *mut __imports::c_void>(caps.function(17).loaded("glMapBufferRange"))(target, offset, length, access);
let __ret = if __result.is_null() { None } else { Some(std::slice::from_raw_parts_mut(__result as *mut u8, (length) as usize)) };
__ret
}
}

#[inline]
pub fn glUnmapBuffer(caps: &ffi_runtime::Capabilities, target: types::GLenum) -> types::GLboolean {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLenum) -> types::GLboolean>(caps.function(18).loaded("glUnmapBuffer"))(target);
let __ret = __result;
__ret
}
}

///
/// Not available in forward compatible contexts.
#[inline]
pub fn glVertex3f(caps: &ffi_runtime::Capabilities, x: types::GLfloat, y: types::GLfloat, z: types::GLfloat) {
unsafe {
let __result = __imports::mem::transmute::<_, extern "system" fn(types::GLfloat, types::GLfloat, types::GLfloat)>(caps.function(19).loaded("glVertex3f"))(x, y, z);
let __ret = __result;
__ret
}
}

pub static CAPABILITY_SPEC: ffi_runtime::CapabilitySpec<'static> = ffi_runtime::CapabilitySpec {
    api: "GL",
    classes: &[
        ffi_runtime::ClassSpec {
            name: "OpenGL11",
            functions: &[
                ffi_runtime::FunctionSpec::new("glBegin").deprecated(),
                ffi_runtime::FunctionSpec::new("glEnd").deprecated(),
                ffi_runtime::FunctionSpec::new("glVertex3f").deprecated(),
                ffi_runtime::FunctionSpec::new("glClear"),
                ffi_runtime::FunctionSpec::new("glClearColor"),
                ffi_runtime::FunctionSpec::new("glGetString"),
                ffi_runtime::FunctionSpec::new("glGetIntegerv"),
                ffi_runtime::FunctionSpec::new("glGenTextures"),
                ffi_runtime::FunctionSpec::new("glDeleteTextures"),
            ],
        },
        ffi_runtime::ClassSpec {
            name: "OpenGL15",
            functions: &[
                ffi_runtime::FunctionSpec::new("glGenBuffers"),
                ffi_runtime::FunctionSpec::new("glBindBuffer"),
                ffi_runtime::FunctionSpec::new("glBufferData"),
            ],
        },
        ffi_runtime::ClassSpec {
            name: "OpenGL30",
            functions: &[
                ffi_runtime::FunctionSpec::new("glMapBufferRange"),
                ffi_runtime::FunctionSpec::new("glUnmapBuffer"),
                ffi_runtime::FunctionSpec::new("glGetStringi"),
            ],
        },
        ffi_runtime::ClassSpec {
            name: "GL_ARB_sync",
            functions: &[
                ffi_runtime::FunctionSpec::new("glFenceSync"),
                ffi_runtime::FunctionSpec::new("glClientWaitSync"),
                ffi_runtime::FunctionSpec::new("glDeleteSync"),
            ],
        },
        ffi_runtime::ClassSpec {
            name: "GL_ARB_debug_output",
            functions: &[
                ffi_runtime::FunctionSpec::new("glDebugMessageInsertARB"),
                ffi_runtime::FunctionSpec::new("glDebugMessageCallbackARB"),
            ],
        },
    ],
};

pub mod index {
    #![allow(non_upper_case_globals)]
    pub const glBegin: usize = 0;
    pub const glBindBuffer: usize = 1;
    pub const glBufferData: usize = 2;
    pub const glClear: usize = 3;
    pub const glClearColor: usize = 4;
    pub const glClientWaitSync: usize = 5;
    pub const glDebugMessageCallbackARB: usize = 6;
    pub const glDebugMessageInsertARB: usize = 7;
    pub const glDeleteSync: usize = 8;
    pub const glDeleteTextures: usize = 9;
    pub const glEnd: usize = 10;
    pub const glFenceSync: usize = 11;
    pub const glGenBuffers: usize = 12;
    pub const glGenTextures: usize = 13;
    pub const glGetIntegerv: usize = 14;
    pub const glGetString: usize = 15;
    pub const glGetStringi: usize = 16;
    pub const glMapBufferRange: usize = 17;
    pub const glUnmapBuffer: usize = 18;
    pub const glVertex3f: usize = 19;
}

#[allow(non_snake_case)]
pub struct GLCapabilities {
    pub OpenGL11: bool,
    pub OpenGL15: bool,
    pub OpenGL30: bool,
    pub GL_ARB_sync: bool,
    pub GL_ARB_debug_output: bool,
    caps: ffi_runtime::Capabilities,
}

impl GLCapabilities {
    pub fn new<P>(provider: &P, ext: &ffi_runtime::ExtensionSet, forward_compatible: bool) -> GLCapabilities
    where P: ffi_runtime::FunctionProvider + ?Sized {
        let caps = ffi_runtime::build_capabilities(provider, ext, forward_compatible, &CAPABILITY_SPEC);
        GLCapabilities {
            OpenGL11: caps.is_available("OpenGL11"),
            OpenGL15: caps.is_available("OpenGL15"),
            OpenGL30: caps.is_available("OpenGL30"),
            GL_ARB_sync: caps.is_available("GL_ARB_sync"),
            GL_ARB_debug_output: caps.is_available("GL_ARB_debug_output"),
            caps,
        }
    }
}

impl std::ops::Deref for GLCapabilities {
    type Target = ffi_runtime::Capabilities;

    fn deref(&self) -> &ffi_runtime::Capabilities { &self.caps }
}
