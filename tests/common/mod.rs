//! Helpers shared by the driver tests.

#![allow(dead_code, unsafe_code)]

use std::ffi::{c_char, c_int};

/// Placeholder for exports a test never calls.
pub extern "system" fn unused() -> c_int {
    unreachable!("stub registered only to satisfy resolution")
}

/// Copy `text` plus a terminating NUL into a caller-provided buffer.
///
/// # Safety
///
/// `dst` must be valid for `text.len() + 1` bytes.
pub unsafe fn write_c_str(dst: *mut c_char, text: &str) -> c_int {
    std::ptr::copy_nonoverlapping(text.as_ptr().cast::<c_char>(), dst, text.len());
    *dst.add(text.len()) = 0;
    text.len() as c_int
}
