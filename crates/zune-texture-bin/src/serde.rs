/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use zune_texture::codecs::ImageFormat;
use zune_texture::image::mip_level_count;
use zune_texture::ImageBuffer;

/// Description of a probed file
pub struct Metadata<'a> {
    file:   String,
    size:   u64,
    format: ImageFormat,
    image:  &'a ImageBuffer
}

impl<'a> Metadata<'a> {
    pub fn new(file: String, size: u64, format: ImageFormat, image: &'a ImageBuffer) -> Metadata<'a> {
        Metadata {
            file,
            size,
            format,
            image
        }
    }
}

impl Serialize for Metadata<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let (width, height) = self.image.dimensions();
        let mut state = serializer.serialize_struct("Metadata", 5)?;

        state.serialize_field("file", &self.file)?;
        state.serialize_field("file_size", &self.size)?;
        state.serialize_field("container", &self.format)?;
        state.serialize_field("image", &self.image)?;
        state.serialize_field("full_mip_levels", &mip_level_count(width, height))?;

        state.end()
    }
}
