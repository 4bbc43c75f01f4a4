//! Argument assembly: runs the translation steps in their fixed order.

use crate::config::FormatConfig;
use crate::error::ParamResult;
use crate::params::Params;

use super::arguments::Arguments;
use super::translate;

/// Every parameter name a translation step reads.
pub const RECOGNIZED_PARAMS: &[&str] = &[
    "width",
    "height",
    "fill",
    "ignore_ratio",
    "only_shrink_larger",
    "only_enlarge_smaller",
    "background",
    "gravity",
    "extent",
    "crop",
    "rotate",
    "monochrome",
    "grey",
    "trim",
    "no_interlace",
    "flip",
    "flop",
    "format",
    "quality",
];

/// Everything needed to run `gm mogrify` for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    /// Tool flags, without the `mogrify` verb and the file path
    pub arguments: Arguments,
    /// Output format
    pub format: String,
    /// Whether the format was requested explicitly
    pub format_specified: bool,
}

impl CommandPlan {
    /// Whether the tool has nothing to do.
    pub fn is_noop(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// Build the argument list for a request.
///
/// Order matters: extent reuses the resize dimensions, quality checks the
/// resolved format, and trim moves itself to the front. The first invalid
/// parameter aborts the build.
///
/// A bag with no recognized parameter yields an empty plan, even though
/// gravity and interlace would otherwise emit their defaults.
pub fn build_arguments(
    params: &Params,
    formats: &FormatConfig,
    source_format: &str,
) -> ParamResult<CommandPlan> {
    let mut arguments = Arguments::new();
    if !params.keys().any(|key| RECOGNIZED_PARAMS.contains(&key)) {
        return Ok(CommandPlan {
            arguments,
            format: source_format.to_string(),
            format_specified: false,
        });
    }

    let size = translate::resize(&mut arguments, params)?;
    translate::background(&mut arguments, params)?;
    translate::gravity(&mut arguments, params)?;
    translate::extent(&mut arguments, params, size)?;
    translate::crop(&mut arguments, params)?;
    translate::rotate(&mut arguments, params)?;
    translate::monochrome(&mut arguments, params)?;
    translate::grey(&mut arguments, params)?;
    translate::trim(&mut arguments, params)?;
    translate::interlace(&mut arguments, params)?;
    translate::flip(&mut arguments, params)?;
    translate::flop(&mut arguments, params)?;
    let resolved = translate::format(&mut arguments, params, formats, source_format)?;
    translate::quality(&mut arguments, params, &resolved.format)?;

    Ok(CommandPlan {
        arguments,
        format: resolved.format,
        format_specified: resolved.specified,
    })
}
