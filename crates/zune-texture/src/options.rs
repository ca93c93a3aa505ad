/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Options influencing how textures are loaded and prepared
use zune_core::options::DecoderOptions;

use crate::format::PixelFormat;

/// Speed/quality trade off of the block encoder
///
/// Slower presets search more partitions and endpoint
/// candidates and give better quality.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CompressionQuality {
    VeryFast,
    Fast,
    Basic,
    Slow,
    #[default]
    VerySlow
}

impl CompressionQuality {
    pub const fn name(self) -> &'static str {
        match self {
            CompressionQuality::VeryFast => "very-fast",
            CompressionQuality::Fast => "fast",
            CompressionQuality::Basic => "basic",
            CompressionQuality::Slow => "slow",
            CompressionQuality::VerySlow => "very-slow"
        }
    }
}

/// Texture options
///
/// Options are consumed by the loaders in [`codecs`](crate::codecs) and
/// by [`prepare_texture`](crate::pipeline::prepare_texture)
#[derive(Debug, Copy, Clone)]
pub struct TextureOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:        usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height:       usize,
    /// Whether decoders should reject most recoverable errors
    ///
    /// - Default value: false
    strict_mode:      bool,
    /// Whether a mip chain is built for prepared textures
    ///
    /// - Default value: true
    generate_mipmaps: bool,
    /// Whether half float textures are block compressed
    ///
    /// - Default value: true
    compress_hdr:     bool,
    /// Format 8 bit textures are converted to before mip generation
    ///
    /// - Default value: None, keep the decoded format
    target_format:    Option<PixelFormat>,
    /// Block encoder preset
    ///
    /// - Default value: `CompressionQuality::VerySlow`
    quality:          CompressionQuality
}

impl Default for TextureOptions {
    fn default() -> Self {
        TextureOptions {
            max_width:        1 << 14,
            max_height:       1 << 14,
            strict_mode:      false,
            generate_mipmaps: true,
            compress_hdr:     true,
            target_format:    None,
            quality:          CompressionQuality::default()
        }
    }
}

impl TextureOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    pub const fn get_strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub const fn get_generate_mipmaps(&self) -> bool {
        self.generate_mipmaps
    }

    pub const fn get_compress_hdr(&self) -> bool {
        self.compress_hdr
    }

    pub const fn get_target_format(&self) -> Option<PixelFormat> {
        self.target_format
    }

    pub const fn get_quality(&self) -> CompressionQuality {
        self.quality
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Whether decoders should be strict in what they accept
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    pub fn set_generate_mipmaps(mut self, yes: bool) -> Self {
        self.generate_mipmaps = yes;
        self
    }

    pub fn set_compress_hdr(mut self, yes: bool) -> Self {
        self.compress_hdr = yes;
        self
    }

    /// Convert 8 bit textures to `format` before mips are built
    ///
    /// Compressed formats are rejected when the texture is prepared
    pub fn set_target_format(mut self, format: Option<PixelFormat>) -> Self {
        self.target_format = format;
        self
    }

    pub fn set_quality(mut self, quality: CompressionQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Options handed to the zune decoders
    ///
    /// 16 bit PNG images are stripped to 8 bits since raster
    /// textures are always 8 bits per channel
    pub fn to_decoder_options(&self) -> DecoderOptions {
        DecoderOptions::default()
            .set_max_width(self.max_width)
            .set_max_height(self.max_height)
            .set_strict_mode(self.strict_mode)
            .png_set_strip_to_8bit(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TextureOptions::default();

        assert_eq!(options.get_max_width(), 16384);
        assert_eq!(options.get_max_height(), 16384);
        assert!(!options.get_strict_mode());
        assert!(options.get_generate_mipmaps());
        assert!(options.get_compress_hdr());
        assert!(options.get_target_format().is_none());
        assert_eq!(options.get_quality(), CompressionQuality::VerySlow);
    }

    #[test]
    fn test_decoder_options_are_forwarded() {
        let options = TextureOptions::default()
            .set_max_width(10)
            .set_max_height(20)
            .set_strict_mode(true);

        let decoder = options.to_decoder_options();

        assert_eq!(decoder.max_width(), 10);
        assert_eq!(decoder.max_height(), 20);
        assert!(decoder.strict_mode());
        assert!(decoder.png_get_strip_to_8bit());
    }
}
