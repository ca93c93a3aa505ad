/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! OpenEXR decoding support
//!
//! Only single part images with at most four channels are accepted.
//! Half and unsigned integer channels are promoted to `f32`.
//!
//! Channels come out of the container sorted by name (`A`, `B`, `G`, `R`),
//! they are copied in reverse to recover `R`, `G`, `B`, `A`.
//! Images without alpha get an alpha of `1.0`.
use std::io::Cursor;

use exr::meta::MetaData;
use exr::prelude::{read, FlatSamples, ReadChannels, ReadLayers};
use log::{trace, warn};
use zune_core::options::DecoderOptions;

use crate::codecs::checked_dimensions;
use crate::errors::TextureErrors;
use crate::image::ImageBuffer;
use crate::traits::DecoderTrait;

const MAX_CHANNELS: usize = 4;

/// Decoder for `.exr` images
pub struct ExrDecoder<'a> {
    data:       &'a [u8],
    options:    DecoderOptions,
    dimensions: Option<(usize, usize)>
}

impl<'a> ExrDecoder<'a> {
    pub fn new(data: &'a [u8]) -> ExrDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> ExrDecoder<'a> {
        ExrDecoder {
            data,
            options,
            dimensions: None
        }
    }

    /// Read the headers and reject images we cannot handle
    /// before decoding any pixels
    fn check_headers(&self) -> Result<(usize, usize), TextureErrors> {
        let strict = self.options.strict_mode();
        let meta = MetaData::read_from_buffered(Cursor::new(self.data), strict)?;

        if meta.headers.len() > 1 {
            warn!("Rejecting EXR image with {} parts", meta.headers.len());

            return Err(TextureErrors::UnsupportedFormat(format!(
                "Multi-part EXR images are not supported, image has {} parts",
                meta.headers.len()
            )));
        }
        let header = meta
            .headers
            .first()
            .ok_or_else(|| TextureErrors::DecodeErrors("EXR image has no headers".to_string()))?;

        check_channel_count(header.channels.list.len())?;

        let (width, height) = (header.layer_size.width(), header.layer_size.height());

        if width > self.options.max_width() {
            return Err(TextureErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(TextureErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }
        Ok((width, height))
    }
}

fn check_channel_count(channels: usize) -> Result<(), TextureErrors> {
    if channels > MAX_CHANNELS {
        return Err(TextureErrors::UnsupportedFormat(format!(
            "EXR images with more than {MAX_CHANNELS} channels are not supported, image has {channels}"
        )));
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn samples_to_f32(samples: &FlatSamples) -> Vec<f32> {
    match samples {
        FlatSamples::F16(values) => values.iter().map(|x| x.to_f32()).collect(),
        FlatSamples::F32(values) => values.clone(),
        FlatSamples::U32(values) => values.iter().map(|x| *x as f32).collect()
    }
}

/// Interleave planar channels stored in reverse order into RGBA pixels
///
/// Channels missing from the image are zero, except alpha which is `1.0`
///
/// # Errors
/// [`TextureErrors::UnsupportedFormat`] for more than four planes
pub fn interleave_reversed(
    planes: &[Vec<f32>], pixel_count: usize
) -> Result<Vec<f32>, TextureErrors> {
    check_channel_count(planes.len())?;

    let mut output = vec![0.0; pixel_count * 4];

    for (i, pixel) in output.chunks_exact_mut(4).enumerate() {
        pixel[3] = 1.0;

        for (channel, plane) in pixel.iter_mut().zip(planes.iter().rev()) {
            *channel = plane.get(i).copied().unwrap_or(0.0);
        }
    }
    Ok(output)
}

impl DecoderTrait for ExrDecoder<'_> {
    fn decode(&mut self) -> Result<ImageBuffer, TextureErrors> {
        let (width, height) = self.check_headers()?;

        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .all_channels()
            .all_layers()
            .all_attributes()
            .from_buffered(Cursor::new(self.data))?;

        let layer = image
            .layer_data
            .first()
            .ok_or_else(|| TextureErrors::DecodeErrors("EXR image has no layers".to_string()))?;

        let planes: Vec<Vec<f32>> = layer
            .channel_data
            .list
            .iter()
            .map(|channel| {
                trace!("EXR channel {}", channel.name);
                samples_to_f32(&channel.sample_data)
            })
            .collect();

        let pixels = interleave_reversed(&planes, width * height)?;
        self.dimensions = Some((width, height));

        let (width, height) = checked_dimensions(width, height)?;

        ImageBuffer::from_f32(width, height, &pixels)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "exr"
    }
}

#[cfg(test)]
mod tests {
    use exr::prelude::{
        AnyChannel, AnyChannels, Encoding, Image, ImageAttributes, IntegerBounds, Layer,
        LayerAttributes, SmallVec, Text, Vec2, WritableImage
    };

    use super::*;
    use crate::format::PixelFormat;

    fn channels(planes: &[(&str, Vec<f32>)]) -> AnyChannels<FlatSamples> {
        let list: SmallVec<[AnyChannel<FlatSamples>; 4]> = planes
            .iter()
            .map(|(name, data)| AnyChannel {
                name:              Text::new_or_none(name).unwrap(),
                sample_data:       FlatSamples::F32(data.clone()),
                quantize_linearly: false,
                sampling:          Vec2(1, 1)
            })
            .collect();

        AnyChannels::sort(list)
    }

    fn write_exr(width: usize, height: usize, planes: &[(&str, Vec<f32>)]) -> Vec<u8> {
        let image = Image::from_channels((width, height), channels(planes));

        let mut bytes = Vec::new();
        image.write().to_buffered(Cursor::new(&mut bytes)).unwrap();
        bytes
    }

    #[test]
    fn test_rgba_channels_are_reordered() {
        let bytes = write_exr(
            2,
            1,
            &[
                ("R", vec![1.0, 2.0]),
                ("G", vec![0.5, 0.5]),
                ("B", vec![0.25, 0.25]),
                ("A", vec![0.75, 1.0])
            ]
        );
        let mut decoder = ExrDecoder::new(&bytes);
        let image = decoder.decode().unwrap();

        assert_eq!(decoder.dimensions(), Some((2, 1)));
        assert_eq!(image.format(), PixelFormat::RGBAF32);
        assert_eq!(
            image.to_vec_of::<f32>().unwrap(),
            vec![1.0, 0.5, 0.25, 0.75, 2.0, 0.5, 0.25, 1.0]
        );
    }

    #[test]
    fn test_missing_alpha_is_opaque() {
        let bytes = write_exr(
            1,
            1,
            &[("R", vec![3.0]), ("G", vec![2.0]), ("B", vec![1.0])]
        );
        let image = ExrDecoder::new(&bytes).decode().unwrap();

        assert_eq!(image.to_vec_of::<f32>().unwrap(), vec![3.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_too_many_channels() {
        let bytes = write_exr(
            1,
            1,
            &[
                ("R", vec![0.0]),
                ("G", vec![0.0]),
                ("B", vec![0.0]),
                ("A", vec![0.0]),
                ("Z", vec![0.0])
            ]
        );

        assert!(matches!(
            ExrDecoder::new(&bytes).decode(),
            Err(TextureErrors::UnsupportedFormat(_))
        ));
        assert!(matches!(
            interleave_reversed(&[vec![], vec![], vec![], vec![], vec![]], 0),
            Err(TextureErrors::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_multi_part_is_rejected() {
        let layer = |name: &str| {
            Layer::new(
                (1, 1),
                LayerAttributes::named(Text::new_or_none(name).unwrap()),
                Encoding::UNCOMPRESSED,
                channels(&[("R", vec![1.0])])
            )
        };
        let image = Image::from_layers(
            ImageAttributes::new(IntegerBounds::from_dimensions((1, 1))),
            SmallVec::from_vec(vec![layer("first"), layer("second")])
        );
        let mut bytes = Vec::new();
        image.write().to_buffered(Cursor::new(&mut bytes)).unwrap();

        assert!(matches!(
            ExrDecoder::new(&bytes).decode(),
            Err(TextureErrors::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_dimension_limit() {
        let bytes = write_exr(4, 1, &[("R", vec![0.0; 4])]);
        let options = DecoderOptions::default().set_max_width(2);

        assert!(matches!(
            ExrDecoder::new_with_options(&bytes, options).decode(),
            Err(TextureErrors::TooLargeDimensions("width", 2, 4))
        ));
    }

    #[test]
    fn test_half_channels_are_promoted() {
        let list: SmallVec<[AnyChannel<FlatSamples>; 4]> = SmallVec::from_vec(vec![AnyChannel {
            name:              Text::new_or_none("Y").unwrap(),
            sample_data:       FlatSamples::F16(vec![exr::prelude::f16::from_f32(0.5)]),
            quantize_linearly: false,
            sampling:          Vec2(1, 1)
        }]);
        let image = Image::from_channels((1, 1), AnyChannels::sort(list));

        let mut bytes = Vec::new();
        image.write().to_buffered(Cursor::new(&mut bytes)).unwrap();

        let decoded = ExrDecoder::new(&bytes).decode().unwrap();
        assert_eq!(decoded.to_vec_of::<f32>().unwrap(), vec![0.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_garbage_fails() {
        let mut decoder = ExrDecoder::new(&[0x76, 0x2f, 0x31, 0x01, 0, 0]);

        assert!(matches!(decoder.decode(), Err(TextureErrors::DecodeErrors(_))));
    }
}
