////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Scratch memory for native calls.
//!
//! Generated functions that need temporary native memory either push a [`Frame`] on the
//! calling thread's [`ScratchStack`] (bounded sizes) or allocate a [`HeapBuffer`]
//! (caller-controlled sizes). Both are released when they go out of scope, on every exit path.
//!
//! ```
//! use ffi_runtime::scratch::with_stack;
//!
//! let len = with_stack(|stack| {
//!     let frame = stack.push();
//!     let length = frame.ints(0).unwrap();
//!     unsafe { *length = 42 };
//!     unsafe { *length }
//! });
//! assert_eq!(len, 42);
//! ```

use std::{
    cell::{Cell, UnsafeCell},
    mem,
    os::raw::c_void,
    ptr,
};

use thiserror::Error;

use crate::codec::{self, Charset};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScratchError {
    #[error("scratch stack overflow: {requested} bytes requested, {available} bytes available")]
    Overflow { requested: usize, available: usize },
    #[error("{count} values of {element_size} bytes do not fit in the address space")]
    SizeOverflow { count: usize, element_size: usize },
    #[error("length {len} does not fit in a 32-bit length parameter")]
    LengthOverflow { len: usize },
}

/// A fixed-size bump allocator. Memory is handed out by [`Frame`]s and reclaimed when they drop.
pub struct ScratchStack {
    memory: UnsafeCell<Box<[u64]>>,
    size: usize,
    pointer: Cell<usize>,
}

impl ScratchStack {
    pub fn new(size: usize) -> ScratchStack {
        let words = (size + mem::size_of::<u64>() - 1) / mem::size_of::<u64>();
        ScratchStack {
            memory: UnsafeCell::new(vec![0u64; words].into_boxed_slice()),
            size,
            pointer: Cell::new(0),
        }
    }

    pub fn size(&self) -> usize { self.size }

    /// Bytes currently in use by live frames.
    pub fn used(&self) -> usize { self.pointer.get() }

    /// Opens a frame. Everything allocated from it is released when it drops.
    ///
    /// Frames nest; only the innermost live frame may allocate.
    pub fn push(&self) -> Frame<'_> {
        Frame {
            stack: self,
            saved: self.pointer.get(),
        }
    }

    fn base(&self) -> *mut u8 { unsafe { (*self.memory.get()).as_mut_ptr() as *mut u8 } }

    fn alloc(&self, size: usize, align: usize) -> Result<*mut u8, ScratchError> {
        debug_assert!(align.is_power_of_two());
        let base = self.base() as usize;
        let offset = ((base + self.pointer.get() + align - 1) & !(align - 1)) - base;
        if offset > self.size || self.size - offset < size {
            return Err(ScratchError::Overflow {
                requested: size,
                available: self.size.saturating_sub(offset),
            });
        }
        self.pointer.set(offset + size);
        Ok(unsafe { self.base().add(offset) })
    }
}

/// Scratch memory handed out by a [`Frame`], or by the heap when the frame ran out of room.
///
/// The heap copy, if any, is released when the `Spill` drops.
#[derive(Debug)]
pub struct Spill {
    ptr: *mut u8,
    len: usize,
    heap: Option<HeapBuffer>,
}

impl Spill {
    pub fn as_ptr<T>(&self) -> *const T { self.ptr as *const T }

    pub fn as_mut_ptr<T>(&self) -> *mut T { self.ptr as *mut T }

    /// Size in bytes.
    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Whether the frame was too small and the memory came from the heap.
    pub fn is_heap(&self) -> bool { self.heap.is_some() }
}

/// An encoded string in scratch memory.
#[derive(Debug)]
pub struct Encoded {
    data: Option<Spill>,
    len: usize,
}

impl Encoded {
    /// Stands in for an absent (nullable) string.
    pub const NULL: Encoded = Encoded { data: None, len: 0 };

    /// Address to pass to the native function.
    pub fn as_ptr<T>(&self) -> *const T { self.data.as_ref().map_or(ptr::null(), |data| data.as_ptr()) }

    /// Length in bytes, without the terminator. Zero for [`Encoded::NULL`].
    pub fn len(&self) -> usize { self.len }

    pub fn is_null(&self) -> bool { self.data.is_none() }
}

/// A scope of scratch allocations.
pub struct Frame<'s> {
    stack: &'s ScratchStack,
    saved: usize,
}

impl<'s> Frame<'s> {
    /// Uninitialized memory.
    pub fn malloc(&self, size: usize, align: usize) -> Result<*mut u8, ScratchError> {
        self.stack.alloc(size, align)
    }

    /// Zeroed memory.
    pub fn calloc(&self, size: usize, align: usize) -> Result<*mut u8, ScratchError> {
        let ptr = self.stack.alloc(size, align)?;
        unsafe { ptr::write_bytes(ptr, 0, size) };
        Ok(ptr)
    }

    /// Copies `values` into the frame.
    pub fn values<T: Copy>(&self, values: &[T]) -> Result<*mut T, ScratchError> {
        let ptr = self.stack.alloc(mem::size_of::<T>() * values.len(), mem::align_of::<T>())? as *mut T;
        unsafe { ptr::copy_nonoverlapping(values.as_ptr(), ptr, values.len()) };
        Ok(ptr)
    }

    /// A single `i32`, typically a length out parameter.
    pub fn ints(&self, value: i32) -> Result<*mut i32, ScratchError> { self.values(&[value]) }

    /// A pointer indirection buffer.
    pub fn pointers(&self, pointers: &[*const c_void]) -> Result<*mut *const c_void, ScratchError> {
        self.values(pointers)
    }

    /// Zeroed memory that falls back to the heap when the frame is out of room.
    ///
    /// `align` may be at most 8.
    pub fn zeroed(&self, size: usize, align: usize) -> Spill {
        debug_assert!(align <= mem::align_of::<u64>());
        match self.calloc(size, align) {
            Ok(ptr) => Spill { ptr, len: size, heap: None },
            Err(err) => {
                trace!("{}, using the heap", err);
                let mut heap = HeapBuffer::alloc(size);
                Spill {
                    ptr: heap.as_mut_ptr(),
                    len: size,
                    heap: Some(heap),
                }
            },
        }
    }

    /// Copies `values` into the frame, or into the heap when the frame is out of room.
    pub fn copy<T: Copy>(&self, values: &[T]) -> Spill {
        let spill = self.zeroed(mem::size_of_val(values), mem::align_of::<T>());
        unsafe { ptr::copy_nonoverlapping(values.as_ptr(), spill.as_mut_ptr::<T>(), values.len()) };
        spill
    }

    /// Encodes `text` into scratch memory. Strings too long for the frame go to the heap.
    pub fn encode(&self, text: &str, charset: Charset, null_terminated: bool) -> Encoded {
        let bytes = codec::encode(text, charset, null_terminated);
        Encoded {
            data: Some(self.copy(&bytes)),
            len: bytes.len() - if null_terminated { charset.unit_size() } else { 0 },
        }
    }

    /// Like [`Frame::encode`], mapping `None` to [`Encoded::NULL`].
    pub fn encode_opt(&self, text: Option<&str>, charset: Charset, null_terminated: bool) -> Encoded {
        match text {
            Some(text) => self.encode(text, charset, null_terminated),
            None => Encoded::NULL,
        }
    }
}

impl<'s> Drop for Frame<'s> {
    fn drop(&mut self) { self.stack.pointer.set(self.saved); }
}

thread_local! {
    static STACK: ScratchStack = ScratchStack::new(crate::config::get().stack_size);
}

/// Runs `f` with the calling thread's scratch stack.
pub fn with_stack<R, F>(f: F) -> R
where F: FnOnce(&ScratchStack) -> R {
    STACK.with(|stack| f(stack))
}

/// Zeroed heap scratch for sizes the stack cannot bound. Freed on drop.
#[derive(Debug)]
pub struct HeapBuffer {
    words: Vec<u64>,
    len: usize,
}

impl HeapBuffer {
    pub fn alloc(len: usize) -> HeapBuffer {
        HeapBuffer {
            words: vec![0u64; (len + 7) / 8],
            len,
        }
    }

    /// Room for `count` values of `T`.
    pub fn alloc_for<T>(count: usize) -> Result<HeapBuffer, ScratchError> {
        let element_size = mem::size_of::<T>();
        count
            .checked_mul(element_size)
            .map(HeapBuffer::alloc)
            .ok_or(ScratchError::SizeOverflow { count, element_size })
    }

    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn as_ptr<T>(&self) -> *const T { self.words.as_ptr() as *const T }

    pub fn as_mut_ptr<T>(&mut self) -> *mut T { self.words.as_mut_ptr() as *mut T }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.words.as_ptr() as *const u8, self.len) }
    }

    /// The first `count` values, clamped to the buffer size.
    pub fn to_vec<T: Copy>(&self, count: usize) -> Vec<T> {
        let count = count.min(self.len / mem::size_of::<T>().max(1));
        unsafe { std::slice::from_raw_parts(self.as_ptr::<T>(), count) }.to_vec()
    }
}
