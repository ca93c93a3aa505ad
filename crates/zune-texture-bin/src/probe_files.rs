/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use zune_texture::codecs::{load_from_memory, ImageFormat};
use zune_texture::{TextureErrors, TextureOptions};

use crate::serde::Metadata;

/// Probe the input file, extract metadata, and print to standard output.
pub fn probe_input_file(args: &ArgMatches, options: &TextureOptions) -> Result<(), TextureErrors> {
    let Some(in_file) = args.get_one::<String>("in") else {
        return Ok(());
    };
    let data = std::fs::read(in_file)?;
    let format = ImageFormat::guess_format(&data);

    // set to high to remove restrictions.
    let options = options
        .set_max_width(usize::MAX)
        .set_max_height(usize::MAX);
    let image = load_from_memory(&data, &options)?;

    let metadata = Metadata::new(in_file.clone(), data.len() as u64, format, &image);

    let json = serde_json::to_string_pretty(&metadata).map_err(std::io::Error::from)?;
    println!("{json}");

    Ok(())
}
