/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, Command, ValueEnum};
use zune_texture::{CompressionQuality, PixelFormat};

/// 8 bit formats images can be converted to before mipmapping
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IPixelFormat {
    R8,
    RG8,
    RGB8,
    RGBA8
}

impl IPixelFormat {
    pub const fn to_pixel_format(self) -> PixelFormat {
        match self {
            IPixelFormat::R8 => PixelFormat::R8,
            IPixelFormat::RG8 => PixelFormat::RG8,
            IPixelFormat::RGB8 => PixelFormat::RGB8,
            IPixelFormat::RGBA8 => PixelFormat::RGBA8
        }
    }
}

impl ValueEnum for IPixelFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::R8, Self::RG8, Self::RGB8, Self::RGBA8]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::R8 => PossibleValue::new("r8"),
            Self::RG8 => PossibleValue::new("rg8"),
            Self::RGB8 => PossibleValue::new("rgb8"),
            Self::RGBA8 => PossibleValue::new("rgba8")
        })
    }
}

/// BC6H encoder effort
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IQuality(pub CompressionQuality);

impl ValueEnum for IQuality {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self(CompressionQuality::VeryFast),
            Self(CompressionQuality::Fast),
            Self(CompressionQuality::Basic),
            Self(CompressionQuality::Slow),
            Self(CompressionQuality::VerySlow)
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.0.name()))
    }
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("zune-texture")
        .about("Decode, mipmap and compress images into GPU textures")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input file to read data from")
            .action(ArgAction::Set)
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Output to write the texture to")
            .long_help("Output to write the texture to.\nThe file contains the raw bytes of every mip level, largest first")
            .action(ArgAction::Set)
            .required_unless_present("probe"))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Print information about the input file as json and exit"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the texture options"))
        .arg(Arg::new("no-mipmaps")
            .long("no-mipmaps")
            .action(ArgAction::SetTrue)
            .help_heading("OPERATIONS")
            .help("Do not generate a mip chain"))
        .arg(Arg::new("no-compress")
            .long("no-compress")
            .action(ArgAction::SetTrue)
            .help_heading("OPERATIONS")
            .help("Keep HDR images as half floats instead of BC6H"))
        .arg(Arg::new("format")
            .long("format")
            .help_heading("OPERATIONS")
            .help("Convert 8 bit images to this format")
            .value_parser(value_parser!(IPixelFormat)))
        .arg(Arg::new("quality")
            .long("quality")
            .help_heading("OPERATIONS")
            .help("BC6H encoder quality")
            .long_help("BC6H encoder quality.\nSlower settings search more block modes and give better results")
            .value_parser(value_parser!(IQuality)))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum width of images allowed")
            .default_value("16384")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum height of images allowed")
            .default_value("16384")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Treat most warnings as errors"))
}
