////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{fmt, os::raw::c_void};

/// Resolves native function names to addresses.
///
/// A null return value means the function is not available. Any closure of the shape
/// `Fn(&str) -> *const c_void` is a provider, so the usual loaders work as-is:
///
/// ```ignore
/// let caps = ffi_runtime::build_capabilities(&|s: &str| context.get_proc_address(s) as *const _, &ext, false, &SPEC);
/// ```
pub trait FunctionProvider {
    fn get_function_address(&self, name: &str) -> *const c_void;
}

impl<F> FunctionProvider for F
where F: Fn(&str) -> *const c_void
{
    fn get_function_address(&self, name: &str) -> *const c_void { self(name) }
}

/// The store for a single resolved entry point.
///
/// The address is kept as an integer so that a capability table holding many of these can be
/// shared between threads.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FnPtr {
    address: usize,
}

impl FnPtr {
    /// The "unavailable" sentinel.
    pub const NULL: FnPtr = FnPtr { address: 0 };

    /// Creates a `FnPtr` from a load attempt.
    pub fn new(ptr: *const c_void) -> FnPtr { FnPtr { address: ptr as usize } }

    /// True if the pointer points to a real function.
    #[inline]
    pub fn is_loaded(self) -> bool { self.address != 0 }

    #[inline]
    pub fn as_ptr(self) -> *const c_void { self.address as *const c_void }

    /// Returns the address, panicking if the entry point was never resolved.
    #[inline]
    pub fn loaded(self, name: &str) -> *const c_void {
        if !self.is_loaded() {
            missing_fn_panic(name)
        }
        self.as_ptr()
    }
}

impl Default for FnPtr {
    fn default() -> FnPtr { FnPtr::NULL }
}

impl fmt::Debug for FnPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_loaded() {
            write!(f, "FnPtr(0x{:x})", self.address)
        } else {
            f.write_str("FnPtr(NULL)")
        }
    }
}

#[inline(never)]
fn missing_fn_panic(name: &str) -> ! {
    panic!("{} was not loaded", name)
}

/// Operating systems that platform-bound entry points (`glX*`, `wgl*`, `CGL*`) are tied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    MacOsx,
}

impl Platform {
    /// The platform this process runs on, if it is one of the known ones.
    pub fn current() -> Option<Platform> {
        if cfg!(target_os = "windows") {
            Some(Platform::Windows)
        } else if cfg!(target_os = "macos") {
            Some(Platform::MacOsx)
        } else if cfg!(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd", target_os = "netbsd")) {
            Some(Platform::Linux)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::MacOsx => "macOS",
        })
    }
}
