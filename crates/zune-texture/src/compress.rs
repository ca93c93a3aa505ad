/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! BC6H compression of half float images
//!
//! The compressor walks every mip level of an `RGBAF16` image, splits it into
//! batches of 4x4 blocks (see [`tiler`](crate::tiler)) and hands each batch to a
//! [`BlockEncoder`]. Encoded blocks are appended level after level in left to
//! right, top to bottom order.
//!
//! Whether the signed or unsigned variant is used is decided once per image,
//! a single negative channel anywhere makes the whole image signed.
//!
//! Alongside the compressed image, a `RGBAF32` copy of the source is produced,
//! renderers upload it as a reference resource.
use log::{debug, trace};

use crate::errors::TextureErrors;
use crate::format::{PixelFormat, BLOCK_BYTE_SIZE};
use crate::half::is_negative;
use crate::image::ImageBuffer;
use crate::tiler::{batches, PixelBlock, BATCH_SIZE};

/// Bytes produced by a single encoder call
pub const BATCH_BYTE_SIZE: usize = BLOCK_BYTE_SIZE * BATCH_SIZE;

/// An external block encoder
///
/// Encoders consume [`BATCH_SIZE`] blocks at a time and produce
/// [`BLOCK_BYTE_SIZE`] bytes per block, in the order the blocks were given.
pub trait BlockEncoder {
    /// Name of the encoder, used in logs
    fn name(&self) -> &'static str;

    /// Encode a batch of blocks
    ///
    /// # Errors
    /// Encoder specific, e.g. a backend without a signed mode
    /// refusing `signed` batches
    fn encode_batch(
        &mut self, blocks: &[PixelBlock; BATCH_SIZE], signed: bool
    ) -> Result<[u8; BATCH_BYTE_SIZE], TextureErrors>;
}

/// Result of compressing an image
#[derive(Clone, Debug)]
pub struct CompressedTexture {
    /// BC6H blocks of every level
    pub compressed: ImageBuffer,
    /// `RGBAF32` expansion of the source with the same levels
    pub fallback:   ImageBuffer
}

/// Return true if any channel in `pixels` has its sign bit set
pub fn is_signed(pixels: &[u16]) -> bool {
    pixels.iter().any(|x| is_negative(*x))
}

/// Compress `RGBAF16` images into BC6H
pub struct Bc6hCompressor<E: BlockEncoder> {
    encoder: E
}

impl<E: BlockEncoder> Bc6hCompressor<E> {
    pub fn new(encoder: E) -> Bc6hCompressor<E> {
        Bc6hCompressor { encoder }
    }

    /// Return the encoder this compressor was created with
    pub fn into_inner(self) -> E {
        self.encoder
    }

    /// Compress every mip level of `image`
    ///
    /// # Errors
    /// - [`TextureErrors::UnsupportedOperation`] if the image is not `RGBAF16`
    /// - Any error the encoder reports
    pub fn compress(&mut self, image: &ImageBuffer) -> Result<CompressedTexture, TextureErrors> {
        if image.format() != PixelFormat::RGBAF16 {
            return Err(TextureErrors::UnsupportedOperation(
                "BC6H compression",
                image.format()
            ));
        }
        let (width, height) = image.dimensions();
        let signed = is_signed(&bytemuck::pod_collect_to_vec::<u8, u16>(image.data()));

        let format = if signed {
            PixelFormat::BC6HSigned
        } else {
            PixelFormat::BC6HUnsigned
        };
        debug!(
            "Compressing {width}x{height} image with {} level(s) to {} using {}",
            image.mip_levels(),
            format.name(),
            self.encoder.name()
        );

        let mut output =
            Vec::with_capacity(ImageBuffer::expected_size(width, height, format, image.mip_levels()));

        for level in image.levels() {
            let pixels = bytemuck::pod_collect_to_vec::<u8, u16>(level.data);
            let start = output.len();

            for batch in batches(level.width, level.height, &pixels) {
                let encoded = self.encoder.encode_batch(&batch.blocks, signed)?;
                // padding blocks are encoded but never stored
                output.extend_from_slice(&encoded[..batch.count * BLOCK_BYTE_SIZE]);
            }
            trace!(
                "Level {}: {}x{} compressed to {} bytes",
                level.level,
                level.width,
                level.height,
                output.len() - start
            );
        }

        let compressed = ImageBuffer::new_with_mip_levels(
            image.width(),
            image.height(),
            format,
            image.mip_levels(),
            output
        )?;
        let fallback = image.convert(PixelFormat::RGBAF32)?;

        Ok(CompressedTexture {
            compressed,
            fallback
        })
    }
}

#[cfg(feature = "bc6h")]
pub use ispc::IspcBc6hEncoder;

#[cfg(feature = "bc6h")]
mod ispc {
    use block_compression::encode::compress_rgba16;
    use block_compression::{BC6HSettings, CompressionVariant};
    use half::f16;

    use super::{BlockEncoder, BATCH_BYTE_SIZE};
    use crate::errors::TextureErrors;
    use crate::format::BLOCK_DIMENSION;
    use crate::options::CompressionQuality;
    use crate::tiler::{PixelBlock, BATCH_SIZE};

    // a batch is laid out as one row of blocks
    const BATCH_WIDTH: usize = BLOCK_DIMENSION * BATCH_SIZE;

    /// BC6H encoder backed by the ISPC derived kernels of `block_compression`
    ///
    /// The backend only has an unsigned mode, signed batches are refused.
    #[derive(Copy, Clone, Debug, Default)]
    pub struct IspcBc6hEncoder {
        quality: CompressionQuality
    }

    impl IspcBc6hEncoder {
        pub fn new(quality: CompressionQuality) -> IspcBc6hEncoder {
            IspcBc6hEncoder { quality }
        }

        fn settings(&self) -> BC6HSettings {
            match self.quality {
                CompressionQuality::VeryFast => BC6HSettings::very_fast(),
                CompressionQuality::Fast => BC6HSettings::fast(),
                CompressionQuality::Basic => BC6HSettings::basic(),
                CompressionQuality::Slow => BC6HSettings::slow(),
                CompressionQuality::VerySlow => BC6HSettings::very_slow()
            }
        }
    }

    impl BlockEncoder for IspcBc6hEncoder {
        fn name(&self) -> &'static str {
            "ispc-bc6h"
        }

        #[allow(clippy::cast_possible_truncation)]
        fn encode_batch(
            &mut self, blocks: &[PixelBlock; BATCH_SIZE], signed: bool
        ) -> Result<[u8; BATCH_BYTE_SIZE], TextureErrors> {
            if signed {
                return Err(TextureErrors::UnsupportedFormat(
                    "Signed BC6H is not supported by the ispc encoder, image contains negative values"
                        .to_string()
                ));
            }
            let mut pixels = vec![f16::ZERO; BATCH_WIDTH * BLOCK_DIMENSION * 4];

            for (index, block) in blocks.iter().enumerate() {
                for (i, pixel) in block.iter().enumerate() {
                    let x = index * BLOCK_DIMENSION + i % BLOCK_DIMENSION;
                    let y = i / BLOCK_DIMENSION;
                    let offset = (y * BATCH_WIDTH + x) * 4;

                    for (dst, src) in pixels[offset..offset + 4].iter_mut().zip(pixel) {
                        *dst = f16::from_bits(*src);
                    }
                }
            }
            let mut output = [0; BATCH_BYTE_SIZE];

            compress_rgba16(
                CompressionVariant::BC6H(self.settings()),
                &pixels,
                &mut output,
                BATCH_WIDTH as u32,
                BLOCK_DIMENSION as u32,
                (BATCH_WIDTH * 4) as u32
            );
            Ok(output)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::half::{f32_to_f16, F16_ONE};

    /// Records calls and writes the red channel of the
    /// first pixel of each block as the block bytes
    #[derive(Default)]
    pub(crate) struct RecordingEncoder {
        pub(crate) calls: Vec<bool>
    }

    impl BlockEncoder for RecordingEncoder {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn encode_batch(
            &mut self, blocks: &[PixelBlock; BATCH_SIZE], signed: bool
        ) -> Result<[u8; BATCH_BYTE_SIZE], TextureErrors> {
            self.calls.push(signed);

            let mut output = [0; BATCH_BYTE_SIZE];

            for (block, bytes) in blocks.iter().zip(output.chunks_exact_mut(BLOCK_BYTE_SIZE)) {
                bytes.fill(block[0][0] as u8);
            }
            Ok(output)
        }
    }

    fn image_from_fn(width: u32, height: u32, f: impl Fn(usize) -> [u16; 4]) -> ImageBuffer {
        let pixels: Vec<u16> = (0..(width * height) as usize).flat_map(f).collect();

        ImageBuffer::from_f16(width, height, &pixels).unwrap()
    }

    #[test]
    fn test_unsigned_image() {
        let image = image_from_fn(8, 8, |_| [F16_ONE; 4]);
        let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());
        let result = compressor.compress(&image).unwrap();

        assert_eq!(result.compressed.format(), PixelFormat::BC6HUnsigned);
        // 2 block rows of a single batch each
        assert_eq!(compressor.into_inner().calls, vec![false, false]);
    }

    #[test]
    fn test_one_negative_value_makes_image_signed() {
        let negative = f32_to_f16(-0.25);
        let image = image_from_fn(8, 8, |i| {
            if i == 63 {
                [F16_ONE, F16_ONE, negative, F16_ONE]
            } else {
                [F16_ONE; 4]
            }
        });
        let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());
        let result = compressor.compress(&image).unwrap();

        assert_eq!(result.compressed.format(), PixelFormat::BC6HSigned);
        // every batch is encoded signed, not only the one holding the value
        assert_eq!(compressor.into_inner().calls, vec![true, true]);
    }

    #[test]
    fn test_blocks_are_stored_in_order() {
        // 5x5 image, blocks start at pixels 0, 4, 20 and 24
        let image = image_from_fn(5, 5, |i| [i as u16; 4]);
        let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());
        let result = compressor.compress(&image).unwrap();

        let data = result.compressed.data();
        assert_eq!(data.len(), 4 * BLOCK_BYTE_SIZE);

        let firsts: Vec<u8> = data.chunks_exact(BLOCK_BYTE_SIZE).map(|x| x[0]).collect();
        assert_eq!(firsts, vec![0, 4, 20, 24]);
    }

    #[test]
    fn test_every_level_is_compressed() {
        let image = image_from_fn(300, 1, |_| [F16_ONE; 4]).generate_mipmaps().unwrap();
        let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());
        let result = compressor.compress(&image).unwrap();

        assert_eq!(result.compressed.mip_levels(), 9);
        assert_eq!(
            result.compressed.data().len(),
            ImageBuffer::expected_size(300, 1, PixelFormat::BC6HUnsigned, 9)
        );
        // 75 blocks -> 10 batches, then 38, 19, 10, 5, 3, 1, 1, 1 blocks
        let calls = compressor.into_inner().calls.len();
        assert_eq!(calls, 10 + 5 + 3 + 2 + 1 + 1 + 1 + 1 + 1);
    }

    #[test]
    fn test_fallback_is_f32() {
        let image = image_from_fn(4, 4, |_| [f32_to_f16(0.5); 4]);
        let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());
        let result = compressor.compress(&image).unwrap();

        assert_eq!(result.fallback.format(), PixelFormat::RGBAF32);
        assert_eq!(result.fallback.dimensions(), (4, 4));
        assert!(result
            .fallback
            .to_vec_of::<f32>()
            .unwrap()
            .iter()
            .all(|x| *x == 0.5));
    }

    #[test]
    fn test_only_half_images_are_accepted() {
        let image = ImageBuffer::new(4, 4, PixelFormat::RGBA8, vec![0; 64]).unwrap();
        let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());

        assert!(matches!(
            compressor.compress(&image),
            Err(TextureErrors::UnsupportedOperation(_, PixelFormat::RGBA8))
        ));
    }

    #[test]
    fn test_signedness_scan() {
        assert!(!is_signed(&[0, F16_ONE]));
        assert!(is_signed(&[0, 0x8000]));
        assert!(!is_signed(&[]));
    }

    #[cfg(feature = "bc6h")]
    #[test]
    fn test_ispc_encoder() {
        use crate::options::CompressionQuality;

        let mut encoder = IspcBc6hEncoder::new(CompressionQuality::VeryFast);

        let blocks = [[[F16_ONE; 4]; 16]; BATCH_SIZE];

        let output = encoder.encode_batch(&blocks, false).unwrap();
        let first = &output[..BLOCK_BYTE_SIZE];

        // identical inputs encode identically
        for encoded in output.chunks_exact(BLOCK_BYTE_SIZE) {
            assert_eq!(encoded, first);
        }
        assert!(matches!(
            encoder.encode_batch(&blocks, true),
            Err(TextureErrors::UnsupportedFormat(_))
        ));
    }
}
