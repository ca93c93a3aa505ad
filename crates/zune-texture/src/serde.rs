/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "serde-support")]

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::codecs::ImageFormat;
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use crate::options::{CompressionQuality, TextureOptions};

impl Serialize for PixelFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(self.name())
    }
}

impl Serialize for ImageFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(self.name())
    }
}

impl Serialize for CompressionQuality {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(self.name())
    }
}

impl Serialize for ImageBuffer {
    /// Only the image description is serialized, pixels are left out
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ImageBuffer", 5)?;

        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.serialize_field("format", &self.format())?;
        state.serialize_field("mip_levels", &self.mip_levels())?;
        state.serialize_field("size", &self.data().len())?;

        state.end()
    }
}

impl Serialize for TextureOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("TextureOptions", 7)?;

        state.serialize_field("max_width", &self.get_max_width())?;
        state.serialize_field("max_height", &self.get_max_height())?;
        state.serialize_field("strict_mode", &self.get_strict_mode())?;
        state.serialize_field("generate_mipmaps", &self.get_generate_mipmaps())?;
        state.serialize_field("compress_hdr", &self.get_compress_hdr())?;
        state.serialize_field("target_format", &self.get_target_format())?;
        state.serialize_field("quality", &self.get_quality())?;

        state.end()
    }
}
