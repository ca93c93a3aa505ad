/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Turn decoded images into textures
//!
//! [`prepare_texture`] chains the individual stages depending on the
//! image format and [`TextureOptions`]
//!
//! - 8 bit images are converted to the target format (if any), get their
//!  mip chain and are kept uncompressed.
//! - `RGBAF16` images get their mip chain and are BC6H compressed.
//!
//! Stages run in order, each one consuming the output of the previous.
use std::time::Instant;

use log::Level::Debug;
use log::{debug, log_enabled};

use crate::compress::{Bc6hCompressor, BlockEncoder};
use crate::convert::ConvertFormat;
use crate::errors::TextureErrors;
use crate::format::PixelFormat;
use crate::gpu::{upload_image, GpuResourceLayer};
use crate::image::ImageBuffer;
use crate::mipmap::GenerateMipmaps;
use crate::options::TextureOptions;
use crate::traits::OperationsTrait;

/// A texture ready to be uploaded
#[derive(Clone, Debug)]
pub enum PreparedTexture {
    /// Raw pixels with their mip levels
    Uncompressed(ImageBuffer),
    /// Block compressed levels plus a `RGBAF32` copy of the source
    Compressed {
        compressed: ImageBuffer,
        fallback:   ImageBuffer
    }
}

impl PreparedTexture {
    /// The image a renderer samples from
    pub const fn image(&self) -> &ImageBuffer {
        match self {
            PreparedTexture::Uncompressed(image) => image,
            PreparedTexture::Compressed { compressed, .. } => compressed
        }
    }

    pub const fn is_compressed(&self) -> bool {
        matches!(self, PreparedTexture::Compressed { .. })
    }
}

/// Device handles of an uploaded texture
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UploadedTexture<I> {
    Uncompressed(I),
    Compressed { compressed: I, fallback: I }
}

/// Build the list of operations `image` goes through before compression
fn operations(
    image: &ImageBuffer, options: &TextureOptions
) -> Result<Vec<Box<dyn OperationsTrait>>, TextureErrors> {
    let mut operations: Vec<Box<dyn OperationsTrait>> = vec![];
    let format = image.format();

    match format {
        PixelFormat::R8 | PixelFormat::RG8 | PixelFormat::RGB8 | PixelFormat::RGBA8 => {
            if let Some(target) = options.get_target_format() {
                if target != format {
                    operations.push(Box::new(ConvertFormat::new(target)));
                }
            }
        }
        PixelFormat::RGBAF32 => operations.push(Box::new(ConvertFormat::new(PixelFormat::RGBAF16))),
        PixelFormat::RGBAF16 => (),
        PixelFormat::BC6HSigned | PixelFormat::BC6HUnsigned => {
            return Err(TextureErrors::UnsupportedOperation("Prepare texture", format));
        }
    }
    if options.get_generate_mipmaps() {
        operations.push(Box::new(GenerateMipmaps::new()));
    }
    Ok(operations)
}

/// Run `image` through conversion, mip generation and compression
///
/// # Errors
/// - [`TextureErrors::UnsupportedOperation`] for already compressed images
/// - Any error raised by a stage or by `encoder`
pub fn prepare_texture<E: BlockEncoder>(
    image: ImageBuffer, options: &TextureOptions, encoder: E
) -> Result<PreparedTexture, TextureErrors> {
    let mut image = image;

    for operation in operations(&image, options)? {
        let start = Instant::now();

        image = operation.execute(&image)?;

        if log_enabled!(Debug) {
            debug!(
                "Finished running `{}` in {} ms",
                operation.name(),
                start.elapsed().as_millis()
            );
        }
    }

    if image.format() == PixelFormat::RGBAF16 && options.get_compress_hdr() {
        let start = Instant::now();
        let result = Bc6hCompressor::new(encoder).compress(&image)?;

        if log_enabled!(Debug) {
            debug!("Finished compression in {} ms", start.elapsed().as_millis());
        }
        return Ok(PreparedTexture::Compressed {
            compressed: result.compressed,
            fallback:   result.fallback
        });
    }
    Ok(PreparedTexture::Uncompressed(image))
}

/// Upload a prepared texture, compressed textures upload their fallback too
///
/// # Errors
/// Any error the layer reports
pub fn upload_texture<L: GpuResourceLayer>(
    layer: &mut L, texture: &PreparedTexture
) -> Result<UploadedTexture<L::Image>, TextureErrors> {
    match texture {
        PreparedTexture::Uncompressed(image) => {
            Ok(UploadedTexture::Uncompressed(upload_image(layer, image)?))
        }
        PreparedTexture::Compressed {
            compressed,
            fallback
        } => Ok(UploadedTexture::Compressed {
            compressed: upload_image(layer, compressed)?,
            fallback:   upload_image(layer, fallback)?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::tests::RecordingEncoder;
    use crate::gpu::tests::{Call, RecordingLayer};
    use crate::half::F16_ONE;

    #[test]
    fn test_ldr_is_converted_and_mipmapped() {
        let image = ImageBuffer::new(4, 4, PixelFormat::RGB8, vec![10; 48]).unwrap();
        let options = TextureOptions::default().set_target_format(Some(PixelFormat::RGBA8));

        let texture = prepare_texture(image, &options, RecordingEncoder::default()).unwrap();

        assert!(!texture.is_compressed());
        let image = texture.image();
        assert_eq!(image.format(), PixelFormat::RGBA8);
        assert_eq!(image.mip_levels(), 3);
        assert_eq!(&image.data()[..4], &[10, 10, 10, 255]);
    }

    #[test]
    fn test_mipmaps_can_be_disabled() {
        let image = ImageBuffer::new(4, 4, PixelFormat::R8, vec![1; 16]).unwrap();
        let options = TextureOptions::default().set_generate_mipmaps(false);

        let texture = prepare_texture(image.clone(), &options, RecordingEncoder::default()).unwrap();

        assert_eq!(texture.image(), &image);
    }

    #[test]
    fn test_hdr_is_compressed() {
        let image = ImageBuffer::from_f16(8, 8, &[F16_ONE; 8 * 8 * 4]).unwrap();

        let texture =
            prepare_texture(image, &TextureOptions::default(), RecordingEncoder::default()).unwrap();

        match &texture {
            PreparedTexture::Compressed {
                compressed,
                fallback
            } => {
                assert_eq!(compressed.format(), PixelFormat::BC6HUnsigned);
                assert_eq!(compressed.mip_levels(), 4);
                // 4 + 1 + 1 + 1 blocks
                assert_eq!(compressed.data().len(), 7 * 16);
                assert_eq!(fallback.format(), PixelFormat::RGBAF32);
                assert_eq!(fallback.mip_levels(), 4);
            }
            PreparedTexture::Uncompressed(_) => panic!("Expected a compressed texture")
        }
    }

    #[test]
    fn test_hdr_compression_can_be_disabled() {
        let image = ImageBuffer::from_f32(2, 2, &[0.5; 16]).unwrap();
        let options = TextureOptions::default().set_compress_hdr(false);

        let texture = prepare_texture(image, &options, RecordingEncoder::default()).unwrap();

        assert_eq!(texture.image().format(), PixelFormat::RGBAF16);
        assert_eq!(texture.image().mip_levels(), 2);
    }

    #[test]
    fn test_compressed_input_is_rejected() {
        let image = ImageBuffer::new(4, 4, PixelFormat::BC6HSigned, vec![0; 16]).unwrap();

        assert!(matches!(
            prepare_texture(image, &TextureOptions::default(), RecordingEncoder::default()),
            Err(TextureErrors::UnsupportedOperation(_, PixelFormat::BC6HSigned))
        ));
    }

    #[test]
    fn test_upload_compressed_uploads_fallback() {
        let image = ImageBuffer::from_f16(4, 4, &[F16_ONE; 64]).unwrap();
        let texture =
            prepare_texture(image, &TextureOptions::default(), RecordingEncoder::default()).unwrap();
        let mut layer = RecordingLayer::default();

        let uploaded = upload_texture(&mut layer, &texture).unwrap();

        assert_eq!(
            uploaded,
            UploadedTexture::Compressed {
                compressed: 1,
                fallback:   2
            }
        );
        let sends: Vec<&Call> = layer
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Send(..)))
            .collect();
        // one stream for the compressed image, one send per fallback level
        assert_eq!(sends.len(), 1 + 3);
    }
}
