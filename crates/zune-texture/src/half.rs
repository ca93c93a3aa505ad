/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bit exact conversion between 32 bit and 16 bit floats
//!
//! Half floats are stored as raw `u16` bit patterns, this is the working
//! precision of mip generation and the input of the block encoder.
//!
//! The conversion is a straight bit manipulation, there is no rounding,
//! the mantissa is truncated to its top 10 bits.
//!
//!|input                          |output                 |
//!|-------------------------------|-----------------------|
//!| NaN                           | `0x0000`              |
//!| ±infinity                     | `±65504.0`            |
//!| too large for a half          | `±65504.0`            |
//!| too small for a half          | signed zero           |
//!
//! [`f16_to_f32`] does no special casing of denormals or NaNs, callers
//! pass finite values.

/// `1.0` as a half float
pub const F16_ONE: u16 = 0x3c00;
/// Largest finite half, `65504.0`
pub const F16_MAX: u16 = 0x7bff;
/// Smallest finite half, `-65504.0`
pub const F16_MIN: u16 = 0xfbff;

const F16_SIGN_MASK: u16 = 0x8000;

/// Convert a 32 bit float into a 16 bit float bit pattern
///
/// Overflow saturates to the largest finite half keyed by sign,
/// NaN becomes zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();

    let sign = (bits >> 31) & 0x1;
    let exp = (bits >> 23) & 0xff;
    let frac = bits & 0x7f_ffff;

    let is_negative = sign == 1;

    if exp == 0xff {
        // NaN
        if frac > 0 {
            return 0;
        }
        // infinity
        return if is_negative { F16_MIN } else { F16_MAX };
    }

    let exp = exp as i32 - 127 + 15;

    if exp >= 0x1f {
        return if is_negative { F16_MIN } else { F16_MAX };
    }
    if exp < 0 {
        // below the half range
        return (sign << 15) as u16;
    }

    let frac = frac >> 13;

    ((sign << 15) | ((exp as u32) << 10) | frac) as u16
}

/// Convert a 16 bit float bit pattern into a 32 bit float
pub fn f16_to_f32(value: u16) -> f32 {
    let value = value as u32;

    let sign = (value >> 15) & 0x1;
    let exp = (value >> 10) & 0x1f;
    let frac = value & 0x3ff;

    let exp = exp + (127 - 15);

    f32::from_bits((sign << 31) | (exp << 23) | (frac << 13))
}

/// Return true if the sign bit of the half is set
#[inline(always)]
pub const fn is_negative(value: u16) -> bool {
    value & F16_SIGN_MASK != 0
}

/// Convert a slice of 32 bit floats into halves
///
/// Only `min(from.len(), to.len())` items are converted
pub fn f32_slice_to_f16(from: &[f32], to: &mut [u16]) {
    for (old, new) in from.iter().zip(to.iter_mut()) {
        *new = f32_to_f16(*old);
    }
}

/// Convert a slice of halves into 32 bit floats
///
/// Only `min(from.len(), to.len())` items are converted
pub fn f16_slice_to_f32(from: &[u16], to: &mut [f32]) {
    for (old, new) in from.iter().zip(to.iter_mut()) {
        *new = f16_to_f32(*old);
    }
}
