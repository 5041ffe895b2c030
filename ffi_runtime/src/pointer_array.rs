////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{convert::TryFrom, os::raw::c_void};

use crate::{
    codec::{self, Charset},
    scratch::{Frame, ScratchError, Spill},
};

/// Strings encoded one by one for a `const char **` parameter.
///
/// The indirection buffer goes to scratch memory, spilling to the heap when the frame is full.
/// The strings themselves are owned here and released by [`StringArray::free`] (or on drop).
#[derive(Debug)]
pub struct StringArray {
    encoded: Vec<Box<[u8]>>,
    lengths: Vec<usize>,
}

impl StringArray {
    pub fn encode<S>(strings: &[S], charset: Charset, null_terminated: bool) -> StringArray
    where S: AsRef<str> {
        let mut encoded = Vec::with_capacity(strings.len());
        let mut lengths = Vec::with_capacity(strings.len());
        for s in strings {
            let bytes = codec::encode(s.as_ref(), charset, null_terminated);
            lengths.push(bytes.len() - if null_terminated { charset.unit_size() } else { 0 });
            encoded.push(bytes.into_boxed_slice());
        }
        StringArray { encoded, lengths }
    }

    /// The single-element form, `const char *const *string`.
    pub fn single(string: &str, charset: Charset, null_terminated: bool) -> StringArray {
        StringArray::encode(&[string], charset, null_terminated)
    }

    pub fn len(&self) -> usize { self.encoded.len() }

    pub fn is_empty(&self) -> bool { self.encoded.is_empty() }

    /// Encoded byte lengths, without terminators.
    pub fn lengths(&self) -> &[usize] { &self.lengths }

    /// Writes the array of string addresses to `frame`.
    pub fn pointers_in(&self, frame: &Frame) -> Spill {
        let pointers: Vec<*const c_void> = self.encoded.iter().map(|s| s.as_ptr() as *const c_void).collect();
        frame.copy(&pointers)
    }

    /// Writes the lengths as `i32`s to `frame`, for `const GLint *length` style parameters.
    pub fn int_lengths_in(&self, frame: &Frame) -> Result<Spill, ScratchError> {
        let lengths = self
            .lengths
            .iter()
            .map(|&len| i32::try_from(len).map_err(|_| ScratchError::LengthOverflow { len }))
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(frame.copy(&lengths))
    }

    /// Writes the lengths as `usize`s to `frame`, for `const size_t *lengths` style parameters.
    pub fn pointer_lengths_in(&self, frame: &Frame) -> Spill { frame.copy(&self.lengths) }

    /// Releases every encoded string and returns how many there were.
    pub fn free(self) -> usize {
        let count = self.encoded.len();
        drop(self.encoded);
        count
    }
}

/// Writes the addresses of `buffers` to `frame`, for `const void **` parameters.
pub fn buffer_pointers_in<T>(frame: &Frame, buffers: &[&[T]]) -> Spill {
    let pointers: Vec<*const c_void> = buffers.iter().map(|b| b.as_ptr() as *const c_void).collect();
    frame.copy(&pointers)
}

/// Writes the byte sizes of `buffers` to `frame`.
pub fn buffer_lengths_in<T>(frame: &Frame, buffers: &[&[T]]) -> Spill {
    let lengths: Vec<usize> = buffers.iter().map(|b| std::mem::size_of_val(*b)).collect();
    frame.copy(&lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::decode_nt, scratch::ScratchStack};

    #[test]
    fn pointers_address_each_encoded_string() {
        let stack = ScratchStack::new(1024);
        let frame = stack.push();
        let sources = ["#version 330 core\n", "void main() {}\n"];
        let array = StringArray::encode(&sources, Charset::Utf8, true);
        let pointers = array.pointers_in(&frame);
        let pointers = pointers.as_ptr::<*const c_void>();

        for (i, source) in sources.iter().enumerate() {
            let ptr = unsafe { *pointers.add(i) } as *const u8;
            let bytes = unsafe { std::slice::from_raw_parts(ptr, source.len() + 1) };
            assert_eq!(decode_nt(bytes, Charset::Utf8).unwrap(), *source);
        }
        assert_eq!(array.free(), 2);
    }

    #[test]
    fn lengths_exclude_terminators() {
        let stack = ScratchStack::new(1024);
        let frame = stack.push();
        let array = StringArray::encode(&["ab", "ü"], Charset::Utf16, true);
        assert_eq!(array.lengths(), &[4, 2]);
        let ints = array.int_lengths_in(&frame).unwrap();
        let lengths = ints.as_ptr::<i32>();
        assert_eq!(unsafe { [*lengths, *lengths.add(1)] }, [4, 2]);
        let sizes = array.pointer_lengths_in(&frame);
        assert_eq!(unsafe { *sizes.as_ptr::<usize>().add(1) }, 2);
    }

    #[test]
    fn free_releases_exactly_what_was_encoded() {
        assert_eq!(StringArray::single("uniform", Charset::Ascii, true).free(), 1);
        assert_eq!(StringArray::encode::<&str>(&[], Charset::Ascii, true).free(), 0);
    }

    #[test]
    fn buffer_arrays() {
        let stack = ScratchStack::new(1024);
        let frame = stack.push();
        let a = [1u32, 2, 3];
        let b = [4u32];
        let buffers: [&[u32]; 2] = [&a, &b];
        let pointers = buffer_pointers_in(&frame, &buffers);
        assert_eq!(unsafe { *pointers.as_ptr::<*const c_void>().add(1) } as usize, b.as_ptr() as usize);
        let lengths = buffer_lengths_in(&frame, &buffers);
        let lengths = lengths.as_ptr::<usize>();
        assert_eq!(unsafe { [*lengths, *lengths.add(1)] }, [12, 4]);
    }

    #[test]
    fn pointer_arrays_outgrow_the_frame() {
        let stack = ScratchStack::new(32);
        let frame = stack.push();
        let sources: Vec<String> = (0..64).map(|i| format!("line {}", i)).collect();
        let array = StringArray::encode(&sources, Charset::Utf8, false);
        let pointers = array.pointers_in(&frame);
        assert!(pointers.is_heap());
        let last = unsafe { *pointers.as_ptr::<*const c_void>().add(63) } as *const u8;
        assert_eq!(unsafe { std::slice::from_raw_parts(last, 7) }, b"line 63");
        let lengths = array.int_lengths_in(&frame).unwrap();
        assert_eq!(unsafe { *lengths.as_ptr::<i32>().add(10) }, 7);
    }

    #[test]
    fn oversized_lengths_are_rejected() {
        let array = StringArray {
            encoded: Vec::new(),
            lengths: vec![i32::MAX as usize + 1],
        };
        let stack = ScratchStack::new(64);
        let frame = stack.push();
        assert_eq!(
            array.int_lengths_in(&frame).unwrap_err(),
            ScratchError::LengthOverflow { len: i32::MAX as usize + 1 }
        );
    }
}
