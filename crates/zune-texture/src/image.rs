/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module represents a single image buffer
//!
//! An image buffer is
//!
//! - interleaved pixels
//!     - of a certain [`PixelFormat`]
//!         - with one or more mip levels stored back to back
//!
//! Level 0 is the full resolution image, each level after it halves
//! width and height (never going below 1) until a 1x1 level is reached.
//!
//! Buffers are never mutated across a format boundary, conversions
//! produce a new buffer.
use bytemuck::Pod;

use crate::errors::TextureErrors;
use crate::format::PixelFormat;

/// Represents a single image and its mip levels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    width:      u32,
    height:     u32,
    format:     PixelFormat,
    mip_levels: u32,
    data:       Vec<u8>
}

/// A view into a single level of an [`ImageBuffer`]
#[derive(Copy, Clone, Debug)]
pub struct MipLevel<'a> {
    /// Index of the level, 0 being full resolution
    pub level:  u32,
    pub width:  usize,
    pub height: usize,
    /// Bytes of this level only
    pub data:   &'a [u8]
}

/// Number of levels in a full chain for an image of these dimensions
///
/// This is `floor(log2(max(width,height))) + 1`
pub const fn mip_level_count(width: usize, height: usize) -> u32 {
    let largest = if width > height { width } else { height };

    if largest == 0 {
        return 1;
    }
    usize::BITS - largest.leading_zeros()
}

/// Dimensions of `level` for an image whose level 0 is `width` x `height`
pub const fn level_dimensions(width: usize, height: usize, level: u32) -> (usize, usize) {
    let level_width = width >> level;
    let level_height = height >> level;

    (
        if level_width == 0 { 1 } else { level_width },
        if level_height == 0 { 1 } else { level_height }
    )
}

impl ImageBuffer {
    /// Create a new single level image
    ///
    /// # Errors
    /// - If `data` length does not match the length required by
    /// `width`, `height` and `format`
    pub fn new(
        width: u32, height: u32, format: PixelFormat, data: Vec<u8>
    ) -> Result<ImageBuffer, TextureErrors> {
        Self::new_with_mip_levels(width, height, format, 1, data)
    }

    /// Create a new image containing `mip_levels` levels stored
    /// back to back in `data`
    ///
    /// # Errors
    /// - Zero width or height
    /// - Zero mip levels or more levels than the dimensions allow
    /// - If `data` length does not match the expected length
    pub fn new_with_mip_levels(
        width: u32, height: u32, format: PixelFormat, mip_levels: u32, data: Vec<u8>
    ) -> Result<ImageBuffer, TextureErrors> {
        let image = ImageBuffer {
            width,
            height,
            format,
            mip_levels,
            data
        };
        image.validate()?;

        Ok(image)
    }

    /// Create an `RGBAF16` image from half bit patterns
    ///
    /// # Errors
    /// See [`ImageBuffer::new`]
    pub fn from_f16(width: u32, height: u32, pixels: &[u16]) -> Result<ImageBuffer, TextureErrors> {
        let data = bytemuck::cast_slice::<u16, u8>(pixels).to_vec();

        Self::new(width, height, PixelFormat::RGBAF16, data)
    }

    /// Create an `RGBAF32` image from floats
    ///
    /// # Errors
    /// See [`ImageBuffer::new`]
    pub fn from_f32(width: u32, height: u32, pixels: &[f32]) -> Result<ImageBuffer, TextureErrors> {
        let data = bytemuck::cast_slice::<f32, u8>(pixels).to_vec();

        Self::new(width, height, PixelFormat::RGBAF32, data)
    }

    /// Number of bytes required to store an image with the following
    /// configuration
    pub fn expected_size(width: usize, height: usize, format: PixelFormat, mip_levels: u32) -> usize {
        (0..mip_levels)
            .map(|level| {
                let (level_width, level_height) = level_dimensions(width, height, level);
                format.level_size(level_width, level_height)
            })
            .sum()
    }

    /// Check that the image satisfies its size invariants
    ///
    /// # Errors
    /// See [`ImageBuffer::new_with_mip_levels`]
    pub fn validate(&self) -> Result<(), TextureErrors> {
        let (width, height) = self.dimensions();

        if width == 0 || height == 0 {
            return Err(TextureErrors::UnsupportedFormat(format!(
                "Zero sized image ({width}x{height})"
            )));
        }
        let max_levels = mip_level_count(width, height);

        if self.mip_levels == 0 || self.mip_levels > max_levels {
            return Err(TextureErrors::UnsupportedFormat(format!(
                "{} mip levels are invalid for a {width}x{height} image, expected 1..={max_levels}",
                self.mip_levels
            )));
        }
        let expected = Self::expected_size(width, height, self.format, self.mip_levels);

        if expected != self.data.len() {
            return Err(TextureErrors::LengthMismatch(expected, self.data.len()));
        }
        Ok(())
    }

    /// Width of level 0
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of level 0
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get image dimensions as a tuple of (width,height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of mip levels stored, always at least 1
    pub const fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    pub const fn is_compressed(&self) -> bool {
        self.format.is_compressed()
    }

    /// Raw bytes of all levels
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy the image bytes out as `T`
    ///
    /// The copy exists because the byte buffer is not guaranteed
    /// to be aligned for `T`.
    ///
    /// Returns `None` if `T` is not the size of a channel
    pub fn to_vec_of<T: Pod>(&self) -> Option<Vec<T>> {
        if self.format.component_size() != core::mem::size_of::<T>() {
            return None;
        }
        Some(bytemuck::pod_collect_to_vec::<u8, T>(&self.data))
    }

    /// Return a view of a single mip level or `None`
    /// if the level does not exist
    pub fn mip_level(&self, level: u32) -> Option<MipLevel<'_>> {
        self.levels().nth(level as usize)
    }

    /// Iterate over all mip levels, from the largest to the smallest
    pub fn levels(&self) -> impl Iterator<Item = MipLevel<'_>> {
        let (width, height) = self.dimensions();
        let format = self.format;
        let mut offset = 0;

        (0..self.mip_levels).map(move |level| {
            let (level_width, level_height) = level_dimensions(width, height, level);
            let size = format.level_size(level_width, level_height);

            let view = MipLevel {
                level,
                width: level_width,
                height: level_height,
                data: &self.data[offset..offset + size]
            };
            offset += size;

            view
        })
    }
}
