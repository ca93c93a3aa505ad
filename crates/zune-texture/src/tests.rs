/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tests spanning several stages
#![cfg(test)]

use nanorand::{Rng, WyRand};

use crate::codecs::{load_from_memory, pfm, radiance, ImageFormat};
use crate::compress::tests::RecordingEncoder;
use crate::compress::Bc6hCompressor;
use crate::format::PixelFormat;
use crate::gpu::tests::{Call, RecordingLayer};
use crate::half::{f32_to_f16, F16_ONE};
use crate::image::ImageBuffer;
use crate::options::TextureOptions;
use crate::pipeline::{prepare_texture, upload_texture, PreparedTexture};

const RADIANCE: &[u8] =
    b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 2\n\x80\x40\x20\x81\x80\x40\x20\x81";

/// Sum of the level sizes, each level halving and never going below 1
fn chain_size(width: usize, height: usize, format: PixelFormat) -> (u32, usize) {
    let (mut w, mut h) = (width, height);
    let mut levels = 1;
    let mut size = format.level_size(w, h);

    while w > 1 || h > 1 {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        levels += 1;
        size += format.level_size(w, h);
    }
    (levels, size)
}

fn random_image(rand: &mut WyRand, width: u32, height: u32, format: PixelFormat) -> ImageBuffer {
    let mut data = vec![0_u8; format.level_size(width as usize, height as usize)];
    rand.fill(&mut data);

    ImageBuffer::new(width, height, format, data).unwrap()
}

#[test]
fn test_size_invariant_holds_after_every_stage() {
    let mut rand = WyRand::new_seed(0x1234);

    for (width, height) in [(1, 1), (3, 5), (17, 4), (64, 1), (33, 33)] {
        let image = random_image(&mut rand, width, height, PixelFormat::RGB8);

        let converted = image.convert(PixelFormat::RGBA8).unwrap();
        assert_eq!(converted.data().len(), width as usize * height as usize * 4);

        let chain = converted.generate_mipmaps().unwrap();
        let (levels, size) = chain_size(width as usize, height as usize, PixelFormat::RGBA8);
        assert_eq!(chain.mip_levels(), levels);
        assert_eq!(chain.data().len(), size);

        let hdr = chain.convert(PixelFormat::RGBAF16).unwrap();
        assert_eq!(hdr.data().len(), size * 2);

        let compressed = Bc6hCompressor::new(RecordingEncoder::default())
            .compress(&hdr)
            .unwrap();
        let (_, compressed_size) =
            chain_size(width as usize, height as usize, PixelFormat::BC6HUnsigned);
        assert_eq!(compressed.compressed.data().len(), compressed_size);
        assert_eq!(compressed.fallback.data().len(), size * 4);
    }
}

#[test]
fn test_wide_image_chain() {
    let image = ImageBuffer::from_f16(300, 1, &vec![F16_ONE; 300 * 4]).unwrap();
    let chain = image.generate_mipmaps().unwrap();

    assert_eq!(chain.mip_levels(), 9);

    let last = chain.mip_level(8).unwrap();
    assert_eq!((last.width, last.height), (1, 1));
    assert_eq!(chain.to_vec_of::<u16>().unwrap().last(), Some(&F16_ONE));
}

#[test]
fn test_single_negative_channel_switches_to_signed() {
    let mut rand = WyRand::new_seed(7);
    // positive finite halves only
    let mut pixels: Vec<u16> = (0..16 * 16 * 4)
        .map(|_| rand.generate_range(0_u16..0x7c00))
        .collect();

    let image = ImageBuffer::from_f16(16, 16, &pixels).unwrap();
    let result = Bc6hCompressor::new(RecordingEncoder::default())
        .compress(&image)
        .unwrap();
    assert_eq!(result.compressed.format(), PixelFormat::BC6HUnsigned);

    pixels[16 * 4 * 9 + 2] = f32_to_f16(-0.5);

    let image = ImageBuffer::from_f16(16, 16, &pixels).unwrap();
    let mut compressor = Bc6hCompressor::new(RecordingEncoder::default());
    let result = compressor.compress(&image).unwrap();

    assert_eq!(result.compressed.format(), PixelFormat::BC6HSigned);
    assert!(compressor.into_inner().calls.iter().all(|signed| *signed));
}

#[test]
fn test_8_bit_round_trip_with_random_data() {
    let mut rand = WyRand::new_seed(99);
    let image = random_image(&mut rand, 13, 7, PixelFormat::R8);

    let back = image
        .convert(PixelFormat::RGBA8)
        .and_then(|x| x.convert(PixelFormat::RG8))
        .and_then(|x| x.convert(PixelFormat::R8))
        .unwrap();

    assert_eq!(back, image);
}

#[test]
fn test_load_radiance_gives_half_floats() {
    assert_eq!(ImageFormat::guess_format(RADIANCE), ImageFormat::HDR);

    let image = load_from_memory(RADIANCE, &TextureOptions::default()).unwrap();

    assert_eq!(image.format(), PixelFormat::RGBAF16);
    assert_eq!(
        image.to_vec_of::<u16>().unwrap(),
        vec![0x3c00, 0x3800, 0x3400, 0x3c00, 0x3c00, 0x3800, 0x3400, 0x3c00]
    );
}

#[test]
fn test_load_wide_radiance_scanlines() {
    for (data, pixels) in [radiance::tests::rle_image(), radiance::tests::flat_image()] {
        assert_eq!(ImageFormat::guess_format(&data), ImageFormat::HDR);

        let image = load_from_memory(&data, &TextureOptions::default()).unwrap();
        let expected: Vec<u16> = pixels.iter().map(|x| f32_to_f16(*x)).collect();

        assert_eq!(image.format(), PixelFormat::RGBAF16);
        assert_eq!(image.to_vec_of::<u16>().unwrap(), expected);
    }
}

#[test]
fn test_load_float_map_gives_half_floats() {
    let data = pfm::tests::color_map();
    assert_eq!(ImageFormat::guess_format(&data), ImageFormat::PFM);

    let image = load_from_memory(&data, &TextureOptions::default()).unwrap();

    assert_eq!(image.format(), PixelFormat::RGBAF16);
    assert_eq!(
        image.to_vec_of::<u16>().unwrap(),
        vec![
            0x3c00, 0x4000, 0x4200, 0x3c00, 0x4400, 0x4500, 0x4600, 0x3c00, 0x3800, 0x3800,
            0x3800, 0x3c00, 0xbc00, 0x0000, 0x3c00, 0x3c00
        ]
    );
}

#[test]
fn test_load_exr_gives_half_floats() {
    use exr::prelude::{
        AnyChannel, AnyChannels, FlatSamples, Image, SmallVec, Text, Vec2, WritableImage
    };

    let list: SmallVec<[AnyChannel<FlatSamples>; 4]> = ["R", "G", "B"]
        .iter()
        .zip([2.0_f32, 0.5, 0.25])
        .map(|(name, value)| AnyChannel {
            name:              Text::new_or_none(*name).unwrap(),
            sample_data:       FlatSamples::F32(vec![value; 4]),
            quantize_linearly: false,
            sampling:          Vec2(1, 1)
        })
        .collect();
    let mut bytes = Vec::new();
    Image::from_channels((2, 2), AnyChannels::sort(list))
        .write()
        .to_buffered(std::io::Cursor::new(&mut bytes))
        .unwrap();

    assert_eq!(ImageFormat::guess_format(&bytes), ImageFormat::EXR);

    let image = load_from_memory(&bytes, &TextureOptions::default()).unwrap();

    assert_eq!(image.format(), PixelFormat::RGBAF16);
    assert_eq!(&image.to_vec_of::<u16>().unwrap()[..4], &[0x4000, 0x3800, 0x3400, 0x3c00]);
}

#[test]
fn test_load_limits_are_forwarded() {
    let options = TextureOptions::default().set_max_width(1);

    assert!(load_from_memory(RADIANCE, &options).is_err());
}

#[test]
fn test_radiance_file_to_gpu() {
    let options = TextureOptions::default();
    let image = load_from_memory(RADIANCE, &options).unwrap();

    let texture = prepare_texture(image, &options, RecordingEncoder::default()).unwrap();
    assert!(matches!(texture, PreparedTexture::Compressed { .. }));

    let mut layer = RecordingLayer::default();
    upload_texture(&mut layer, &texture).unwrap();

    let creates: Vec<&Call> = layer
        .calls
        .iter()
        .filter(|call| matches!(call, Call::Create(_)))
        .collect();
    assert_eq!(creates.len(), 2);
    // 2x1 has two levels, one block each
    assert_eq!(texture.image().data().len(), 2 * 16);
}
