//! Parameter translation: one function per transformation family.
//!
//! Each function reads its parameters from the bag, validates them and
//! appends the matching `gm mogrify` flags. An absent parameter emits nothing
//! (gravity and interlace have defaults and always emit). Errors name the
//! parameter that caused them.

use crate::config::FormatConfig;
use crate::error::{ParamError, ParamResult};
use crate::params::Params;
use crate::types::is_jpeg_format;

use super::arguments::Arguments;

/// Resize target computed by [`resize`]; zero means "unconstrained".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u64,
    pub height: u64,
}

/// Output format resolved by [`format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub format: String,
    /// Whether the request asked for it explicitly (the tool then writes a
    /// suffixed output file).
    pub specified: bool,
}

fn flag(params: &Params, name: &str) -> ParamResult<bool> {
    if params.has(name) {
        params.get_bool(name)
    } else {
        Ok(false)
    }
}

fn dimension(params: &Params, name: &str) -> ParamResult<u64> {
    if !params.has(name) {
        return Ok(0);
    }
    let value = params.get_int(name)?;
    u64::try_from(value)
        .map_err(|_| ParamError::new(name, "must be greater than or equal to 0"))
}

/// `-resize WxH` with `^`, `!`, `>`, `<` modifiers.
pub fn resize(args: &mut Arguments, params: &Params) -> ParamResult<Dimensions> {
    let width = dimension(params, "width")?;
    let height = dimension(params, "height")?;
    if width == 0 && height == 0 {
        return Ok(Dimensions::default());
    }

    let side = |v: u64| if v == 0 { String::new() } else { v.to_string() };
    let mut geometry = format!("{}x{}", side(width), side(height));
    for (name, modifier) in [
        ("fill", '^'),
        ("ignore_ratio", '!'),
        ("only_shrink_larger", '>'),
        ("only_enlarge_smaller", '<'),
    ] {
        if flag(params, name)? {
            geometry.push(modifier);
        }
    }

    args.push_pair("-resize", geometry);
    Ok(Dimensions { width, height })
}

/// `-background #rgb` from 3, 4, 6 or 8 lowercase hex digits.
pub fn background(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if !params.has("background") {
        return Ok(());
    }
    let background = params.get_string("background")?;
    if !matches!(background.len(), 3 | 4 | 6 | 8) {
        return Err(ParamError::new(
            "background",
            "length must be equal to 3, 4, 6 or 8",
        ));
    }
    if !background
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    {
        return Err(ParamError::new(
            "background",
            "must only contain characters in 0-9a-f",
        ));
    }
    args.push_pair("-background", format!("#{background}"));
    Ok(())
}

/// `-gravity`, defaulting to `Center`.
pub fn gravity(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    let gravity = if params.has("gravity") {
        params.get_string("gravity")?
    } else {
        String::new()
    };
    let translated = match gravity.as_str() {
        "" => "Center",
        "n" => "North",
        "s" => "South",
        "e" => "East",
        "w" => "West",
        "ne" => "NorthEast",
        "se" => "SouthEast",
        "nw" => "NorthWest",
        "sw" => "SouthWest",
        _ => {
            return Err(ParamError::new(
                "gravity",
                "must be one of n, s, e, w, ne, se, nw or sw",
            ))
        }
    };
    args.push_pair("-gravity", translated);
    Ok(())
}

/// `-extent WxH`, only with both resize dimensions set.
pub fn extent(args: &mut Arguments, params: &Params, size: Dimensions) -> ParamResult<()> {
    if size.width == 0 || size.height == 0 {
        return Ok(());
    }
    if flag(params, "extent")? {
        args.push_pair("-extent", format!("{}x{}", size.width, size.height));
    }
    Ok(())
}

/// `-crop WxH[+X+Y] +repage` from `"w,h"` or `"w,h,x,y"`.
pub fn crop(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if !params.has("crop") {
        return Ok(());
    }
    let crop = params.get_string("crop")?;
    let fields = crop
        .split(',')
        .map(|field| field.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>();
    let geometry = match fields.as_deref() {
        Ok([width, height]) => format!("{width}x{height}"),
        Ok([width, height, x, y]) => format!("{width}x{height}+{x}+{y}"),
        Ok(_) => {
            return Err(ParamError::new(
                "crop",
                "Invalid crop request, parameters number mismatch",
            ))
        }
        Err(_) => {
            // Count mismatch wins over bad numbers so "1,2,x" reads as a count error
            let count = crop.split(',').count();
            let message = if count == 2 || count == 4 {
                "Invalid crop request, values must be non-negative integers"
            } else {
                "Invalid crop request, parameters number mismatch"
            };
            return Err(ParamError::new("crop", message));
        }
    };
    args.push_pair("-crop", geometry);
    args.push("+repage");
    Ok(())
}

/// `-rotate DEG` for 1..=359.
pub fn rotate(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if !params.has("rotate") {
        return Ok(());
    }
    let rotate = params.get_int("rotate")?;
    if rotate == 0 {
        return Ok(());
    }
    if !(0..=359).contains(&rotate) {
        return Err(ParamError::new("rotate", "Invalid rotate parameter"));
    }
    args.push_pair("-rotate", rotate.to_string());
    Ok(())
}

pub fn monochrome(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if flag(params, "monochrome")? {
        args.push("-monochrome");
    }
    Ok(())
}

pub fn grey(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if flag(params, "grey")? {
        args.push_pair("-colorspace", "GRAY");
    }
    Ok(())
}

/// `-trim`, placed first: trimming must happen before any other operation.
pub fn trim(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if flag(params, "trim")? {
        args.push_front("-trim");
    }
    Ok(())
}

/// `-interlace Line` unless `no_interlace` is set.
pub fn interlace(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if !flag(params, "no_interlace")? {
        args.push_pair("-interlace", "Line");
    }
    Ok(())
}

pub fn flip(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if flag(params, "flip")? {
        args.push("-flip");
    }
    Ok(())
}

pub fn flop(args: &mut Arguments, params: &Params) -> ParamResult<()> {
    if flag(params, "flop")? {
        args.push("-flop");
    }
    Ok(())
}

/// `-format FMT` when requested; otherwise the source format carries over.
pub fn format(
    args: &mut Arguments,
    params: &Params,
    formats: &FormatConfig,
    source_format: &str,
) -> ParamResult<ResolvedFormat> {
    if !params.has("format") {
        return Ok(ResolvedFormat {
            format: source_format.to_string(),
            specified: false,
        });
    }
    let format = params.get_string("format")?;
    if !formats.is_allowed(&format) {
        return Err(ParamError::new("format", "not allowed"));
    }
    args.push_pair("-format", format.clone());
    Ok(ResolvedFormat {
        format,
        specified: true,
    })
}

/// `-quality Q`; JPEG output caps it at 100.
pub fn quality(args: &mut Arguments, params: &Params, format: &str) -> ParamResult<()> {
    if !params.has("quality") {
        return Ok(());
    }
    let quality = params.get_int("quality")?;
    if quality < 0 {
        return Err(ParamError::new(
            "quality",
            "must be greater than or equal to 0",
        ));
    }
    if is_jpeg_format(format) && quality > 100 {
        return Err(ParamError::new("quality", "must be between 0 and 100"));
    }
    args.push_pair("-quality", quality.to_string());
    Ok(())
}
