////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Character sequence encoding for native calls.

use std::{fmt, os::raw::c_char};

use thiserror::Error;

/// Text encodings native APIs accept. UTF-16 is native endian.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    Ascii,
    Utf8,
    Utf16,
}

impl Charset {
    /// Size of one code unit, which is also the size of the terminator.
    pub fn unit_size(self) -> usize {
        match self {
            Charset::Ascii | Charset::Utf8 => 1,
            Charset::Utf16 => 2,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Charset::Ascii => "ASCII",
            Charset::Utf8 => "UTF8",
            Charset::Utf16 => "UTF16",
        })
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("invalid UTF-16: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),
    #[error("{len} bytes is not a whole number of UTF-16 code units")]
    OddLength { len: usize },
}

/// Encodes `text`, appending a terminator when `null_terminated` is set.
///
/// Characters outside of ASCII are replaced with `?` when encoding to [`Charset::Ascii`].
pub fn encode(text: &str, charset: Charset, null_terminated: bool) -> Vec<u8> {
    let terminator = if null_terminated { charset.unit_size() } else { 0 };
    let mut out = Vec::with_capacity(encoded_len(text, charset) + terminator);
    match charset {
        Charset::Ascii => out.extend(text.chars().map(|c| if c.is_ascii() { c as u8 } else { b'?' })),
        Charset::Utf8 => out.extend_from_slice(text.as_bytes()),
        Charset::Utf16 => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_ne_bytes());
            }
        },
    }
    if null_terminated {
        out.extend(std::iter::repeat(0).take(charset.unit_size()));
    }
    out
}

/// Number of bytes `text` takes when encoded, without a terminator.
pub fn encoded_len(text: &str, charset: Charset) -> usize {
    match charset {
        Charset::Ascii => text.chars().count(),
        Charset::Utf8 => text.len(),
        Charset::Utf16 => text.encode_utf16().count() * 2,
    }
}

/// Decodes exactly `bytes`.
pub fn decode(bytes: &[u8], charset: Charset) -> Result<String, CodecError> {
    match charset {
        Charset::Ascii | Charset::Utf8 => Ok(std::str::from_utf8(bytes)?.to_owned()),
        Charset::Utf16 => {
            if bytes.len() % 2 != 0 {
                return Err(CodecError::OddLength { len: bytes.len() });
            }
            let units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_ne_bytes([c[0], c[1]])).collect();
            Ok(String::from_utf16(&units)?)
        },
    }
}

/// Decodes `bytes` up to the first terminator, or all of it if there is none.
pub fn decode_nt(bytes: &[u8], charset: Charset) -> Result<String, CodecError> {
    decode(&bytes[..nt_len(bytes, charset)], charset)
}

/// Decodes text a native function wrote into a caller-sized buffer.
///
/// Native functions truncate at a byte or code unit boundary, so a trailing partial character is
/// dropped. Anything else that is invalid becomes U+FFFD.
pub fn decode_lossy(bytes: &[u8], charset: Charset) -> String {
    match charset {
        Charset::Ascii | Charset::Utf8 => {
            String::from_utf8_lossy(&bytes[..complete_utf8_len(bytes)]).into_owned()
        },
        Charset::Utf16 => {
            let mut units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_ne_bytes([c[0], c[1]])).collect();
            if let Some(0xD800..=0xDBFF) = units.last().copied() {
                units.pop();
            }
            String::from_utf16_lossy(&units)
        },
    }
}

/// [`decode_lossy`] up to the first terminator.
pub fn decode_nt_lossy(bytes: &[u8], charset: Charset) -> String {
    decode_lossy(&bytes[..nt_len(bytes, charset)], charset)
}

/// Decodes a null-terminated string returned by a native function. A null pointer yields `None`.
///
/// # Safety
///
/// `ptr` must be null or point to a terminated string in `charset`.
pub unsafe fn decode_ptr(ptr: *const c_char, charset: Charset) -> Result<Option<String>, CodecError> {
    if ptr.is_null() {
        return Ok(None);
    }
    let ptr = ptr as *const u8;
    decode(std::slice::from_raw_parts(ptr, terminated_len(ptr, charset.unit_size())), charset).map(Some)
}

/// Like [`decode_ptr`], but never fails. See [`decode_lossy`].
///
/// # Safety
///
/// `ptr` must be null or point to a terminated string in `charset`.
pub unsafe fn decode_ptr_lossy(ptr: *const c_char, charset: Charset) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let ptr = ptr as *const u8;
    Some(decode_lossy(std::slice::from_raw_parts(ptr, terminated_len(ptr, charset.unit_size())), charset))
}

unsafe fn terminated_len(ptr: *const u8, unit: usize) -> usize {
    let mut len = 0;
    while (0..unit).any(|i| *ptr.add(len + i) != 0) {
        len += unit;
    }
    len
}

/// Length of `bytes` without an incomplete UTF-8 sequence at its end.
fn complete_utf8_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(4) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xF0..=0xFF => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if back < width { bytes.len() - back } else { bytes.len() };
    }
    bytes.len()
}

fn nt_len(bytes: &[u8], charset: Charset) -> usize {
    match charset {
        Charset::Ascii | Charset::Utf8 => bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len()),
        Charset::Utf16 => bytes
            .chunks_exact(2)
            .position(|c| c == [0, 0])
            .map_or(bytes.len() & !1, |units| units * 2),
    }
}
