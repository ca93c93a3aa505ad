/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Mip chain generation
//!
//! Each level halves the previous one (floored, never below 1) by
//! averaging a 2x2 neighbourhood of the previous level.
//!
//! Samples outside the previous level are clamped to its last row/column,
//! so odd sized levels replicate their edge instead of reading past it.
//!
//! - `RGBAF16` is filtered in the half float domain, every channel is
//!  expanded to `f32`, averaged pairwise and re-encoded with
//!  [`f32_to_f16`].
//! - `RGBAF32` is averaged the same way without the re-encode.
//! - 8 bit formats use an integer box filter, `(p00 + p01 + p10 + p11) >> 2`.
//!
//! The chain is always rebuilt from level 0, an image that already carries
//! levels has them regenerated.
use log::{debug, trace};

use crate::errors::TextureErrors;
use crate::format::PixelFormat;
use crate::half::{f16_to_f32, f32_to_f16};
use crate::image::{level_dimensions, mip_level_count, ImageBuffer};
use crate::traits::OperationsTrait;

/// Build a full mip chain for an image
///
/// The result has `floor(log2(max(width,height))) + 1` levels
/// in the same format as the source.
#[derive(Default, Copy, Clone)]
pub struct GenerateMipmaps;

impl GenerateMipmaps {
    pub fn new() -> GenerateMipmaps {
        GenerateMipmaps
    }
}

impl OperationsTrait for GenerateMipmaps {
    fn name(&self) -> &'static str {
        "Generate mipmaps"
    }

    fn supported_formats(&self) -> &'static [PixelFormat] {
        &[
            PixelFormat::R8,
            PixelFormat::RG8,
            PixelFormat::RGB8,
            PixelFormat::RGBA8,
            PixelFormat::RGBAF16,
            PixelFormat::RGBAF32
        ]
    }

    fn execute_impl(&self, image: &ImageBuffer) -> Result<ImageBuffer, TextureErrors> {
        let format = image.format();
        let (width, height) = image.dimensions();
        let levels = mip_level_count(width, height);

        let base = image
            .mip_level(0)
            .ok_or(TextureErrors::UnsupportedOperation(self.name(), format))?
            .data;

        let data = match format {
            PixelFormat::RGBAF16 => {
                let base = bytemuck::pod_collect_to_vec::<u8, u16>(base);
                let chain = build_chain(&base, width, height, 4, levels, box_filter_f16);

                bytemuck::cast_slice::<u16, u8>(&chain).to_vec()
            }
            PixelFormat::RGBAF32 => {
                let base = bytemuck::pod_collect_to_vec::<u8, f32>(base);
                let chain = build_chain(&base, width, height, 4, levels, box_filter_f32);

                bytemuck::cast_slice::<f32, u8>(&chain).to_vec()
            }
            _ => build_chain(
                base,
                width,
                height,
                format.num_components(),
                levels,
                box_filter_u8
            )
        };
        debug!(
            "Generated {levels} mip level(s) for {width}x{height} {} image",
            format.name()
        );

        ImageBuffer::new_with_mip_levels(image.width(), image.height(), format, levels, data)
    }
}

// Samples are ordered p00, p10, p01, p11
fn box_filter_f16(samples: [u16; 4]) -> u16 {
    let [p00, p10, p01, p11] = samples.map(f16_to_f32);

    let top = (p00 + p10) / 2.0;
    let bottom = (p01 + p11) / 2.0;

    f32_to_f16((top + bottom) / 2.0)
}

fn box_filter_f32(samples: [f32; 4]) -> f32 {
    let [p00, p10, p01, p11] = samples;

    ((p00 + p10) / 2.0 + (p01 + p11) / 2.0) / 2.0
}

#[allow(clippy::cast_possible_truncation)]
fn box_filter_u8(samples: [u8; 4]) -> u8 {
    let [p00, p10, p01, p11] = samples.map(u16::from);

    ((p00 + p01 + p10 + p11) >> 2) as u8
}

/// Append every level after `base` and return the whole chain
fn build_chain<T: Copy>(
    base: &[T], width: usize, height: usize, components: usize, levels: u32,
    filter: fn([T; 4]) -> T
) -> Vec<T> {
    let mut chain = base.to_vec();
    let mut previous = base.to_vec();
    let (mut previous_width, mut previous_height) = (width, height);

    for level in 1..levels {
        let (level_width, level_height) = level_dimensions(width, height, level);

        let next = downsample(
            &previous,
            (previous_width, previous_height),
            (level_width, level_height),
            components,
            filter
        );
        trace!(
            "Mip level {level}: {level_width}x{level_height}, {} samples",
            next.len()
        );
        chain.extend_from_slice(&next);

        previous = next;
        previous_width = level_width;
        previous_height = level_height;
    }
    chain
}

/// Produce one level from the level above it
fn downsample<T: Copy>(
    src: &[T], (src_width, src_height): (usize, usize), (width, height): (usize, usize),
    components: usize, filter: fn([T; 4]) -> T
) -> Vec<T> {
    let mut output = Vec::with_capacity(width * height * components);

    let sample = |x: usize, y: usize, channel: usize| {
        let x = x.min(src_width - 1);
        let y = y.min(src_height - 1);

        src[(y * src_width + x) * components + channel]
    };

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x * 2, y * 2);

            for channel in 0..components {
                output.push(filter([
                    sample(sx, sy, channel),
                    sample(sx + 1, sy, channel),
                    sample(sx, sy + 1, channel),
                    sample(sx + 1, sy + 1, channel)
                ]));
            }
        }
    }
    output
}

impl ImageBuffer {
    /// Build a full mip chain for this image
    ///
    /// # Errors
    /// - [`TextureErrors::UnsupportedOperation`] for compressed images
    pub fn generate_mipmaps(&self) -> Result<ImageBuffer, TextureErrors> {
        GenerateMipmaps::new().execute(self)
    }
}
