////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Helpers the generated auto-size expressions call.

/// Element count of a buffer.
#[inline]
pub fn remaining<T>(buffer: &[T]) -> usize { buffer.len() }

/// Element count of an optional buffer, zero when it is absent.
#[inline]
pub fn remaining_or_zero<T>(buffer: Option<&[T]>) -> usize { buffer.map_or(0, remaining) }

/// Panics when `buffer` holds fewer than `size` elements.
#[inline]
pub fn check_buffer<T>(buffer: &[T], size: usize) {
    if buffer.len() < size {
        buffer_too_small(buffer.len(), size)
    }
}

#[inline(never)]
fn buffer_too_small(len: usize, size: usize) -> ! {
    panic!("buffer holds {} elements, at least {} are required", len, size)
}
