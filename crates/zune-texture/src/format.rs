/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel formats understood by the library
//!
//! Every size query is a pure function of the format tag.
//!
//!|Format        |channels|bytes per pixel|native type |
//!|--------------|--------|---------------|------------|
//!|`R8`          | 1      | 1             | [`u8`]     |
//!|`RG8`         | 2      | 2             | [`u8`]     |
//!|`RGB8`        | 3      | 3             | [`u8`]     |
//!|`RGBA8`       | 4      | 4             | [`u8`]     |
//!|`RGBAF16`     | 4      | 8             | half bits  |
//!|`RGBAF32`     | 4      | 16            | [`f32`]    |
//!|`BC6HSigned`  | 4      | 16 per 4x4 block           |
//!|`BC6HUnsigned`| 4      | 16 per 4x4 block           |

/// Width and height of a compressed block in pixels
pub const BLOCK_DIMENSION: usize = 4;
/// Size of a single compressed block in bytes
pub const BLOCK_BYTE_SIZE: usize = 16;

/// Pixel layout of an image buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    /// One 8 bit channel
    R8,
    /// Two 8 bit channels
    RG8,
    /// Three 8 bit channels
    RGB8,
    /// Four 8 bit channels
    RGBA8,
    /// Four 16 bit float channels, stored as raw half bits
    RGBAF16,
    /// Four 32 bit float channels
    RGBAF32,
    /// BC6H blocks, signed variant
    BC6HSigned,
    /// BC6H blocks, unsigned variant
    BC6HUnsigned
}

/// A single channel of a pixel
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    R,
    G,
    B,
    A
}

impl Channel {
    /// Position of the channel inside an RGBA pixel
    pub const fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
            Channel::A => 3
        }
    }
}

impl PixelFormat {
    /// Number of channels stored per pixel
    pub const fn num_components(self) -> usize {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::RG8 => 2,
            PixelFormat::RGB8 => 3,
            PixelFormat::RGBA8
            | PixelFormat::RGBAF16
            | PixelFormat::RGBAF32
            | PixelFormat::BC6HSigned
            | PixelFormat::BC6HUnsigned => 4
        }
    }

    /// Size of a single channel in bytes
    ///
    /// Compressed formats return 0 since channels are not
    /// individually addressable
    pub const fn component_size(self) -> usize {
        match self {
            PixelFormat::R8 | PixelFormat::RG8 | PixelFormat::RGB8 | PixelFormat::RGBA8 => 1,
            PixelFormat::RGBAF16 => 2,
            PixelFormat::RGBAF32 => 4,
            PixelFormat::BC6HSigned | PixelFormat::BC6HUnsigned => 0
        }
    }

    /// Bytes used by one pixel, zero for block compressed formats
    pub const fn bytes_per_pixel(self) -> usize {
        self.num_components() * self.component_size()
    }

    /// Return true if the format stores opaque compressed blocks
    pub const fn is_compressed(self) -> bool {
        matches!(self, PixelFormat::BC6HSigned | PixelFormat::BC6HUnsigned)
    }

    /// Return true if channels are stored as floating point numbers
    pub const fn is_float(self) -> bool {
        matches!(self, PixelFormat::RGBAF16 | PixelFormat::RGBAF32)
    }

    /// Return the 8 bit format holding `components` channels
    pub const fn from_components(components: usize) -> Option<PixelFormat> {
        match components {
            1 => Some(PixelFormat::R8),
            2 => Some(PixelFormat::RG8),
            3 => Some(PixelFormat::RGB8),
            4 => Some(PixelFormat::RGBA8),
            _ => None
        }
    }

    /// Number of bytes needed to store a single `width` x `height` level
    ///
    /// Compressed formats round dimensions up to the block size
    pub const fn level_size(self, width: usize, height: usize) -> usize {
        if self.is_compressed() {
            let blocks_x = block_aligned(width) / BLOCK_DIMENSION;
            let blocks_y = block_aligned(height) / BLOCK_DIMENSION;

            blocks_x * blocks_y * BLOCK_BYTE_SIZE
        } else {
            width * height * self.bytes_per_pixel()
        }
    }

    /// Human readable name of the format
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::R8 => "R8",
            PixelFormat::RG8 => "RG8",
            PixelFormat::RGB8 => "RGB8",
            PixelFormat::RGBA8 => "RGBA8",
            PixelFormat::RGBAF16 => "RGBAF16",
            PixelFormat::RGBAF32 => "RGBAF32",
            PixelFormat::BC6HSigned => "BC6HS",
            PixelFormat::BC6HUnsigned => "BC6HU"
        }
    }
}

/// Round a dimension up to the next multiple of the block size
pub const fn block_aligned(value: usize) -> usize {
    value.div_ceil(BLOCK_DIMENSION) * BLOCK_DIMENSION
}
