//! Pipeline orchestration - wires together argument assembly, the scratch
//! workspace, the `gm` process and result read-back.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::{Config, FormatConfig};
use crate::error::{ParamResult, Result};
use crate::params::Params;
use crate::types::Image;

use super::assemble::{build_arguments, CommandPlan};
use super::command::CommandRunner;
use super::workspace::Workspace;

/// Processes images with `gm mogrify`.
///
/// Holds no per-request state, so one processor can serve any number of
/// concurrent requests: each gets its own workspace and child process.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    runner: CommandRunner,
    formats: FormatConfig,
    temp_dir: Option<PathBuf>,
    prefix: String,
}

impl ImageProcessor {
    /// Create a new processor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            runner: CommandRunner::new(
                config.graphicsmagick.executable.clone(),
                config.graphicsmagick.timeout(),
            ),
            formats: config.formats.clone(),
            temp_dir: config.temp_dir(),
            prefix: config.workspace.prefix.clone(),
        }
    }

    /// Work out the command for `params` without running anything.
    pub fn plan(&self, image: &Image, params: &Params) -> ParamResult<CommandPlan> {
        build_arguments(params, &self.formats, &image.format)
    }

    /// Apply `params` to `image`.
    ///
    /// Returns the source image itself when there is nothing to do.
    pub async fn process(&self, image: &Image, params: &Params) -> Result<Image> {
        let start = Instant::now();

        let plan = self.plan(image, params)?;
        if plan.is_noop() {
            tracing::trace!("No GraphicsMagick arguments, returning source image");
            return Ok(image.clone());
        }

        let workspace =
            Workspace::create(self.temp_dir.as_deref(), &self.prefix, &image.data).await?;
        let command_line = plan.arguments.to_command_line(workspace.source());
        tracing::trace!("  Workspace: {:?}", start.elapsed());

        let run_start = Instant::now();
        self.runner.run(&command_line).await?;
        tracing::trace!("  GraphicsMagick: {:?}", run_start.elapsed());

        let output = workspace.output(plan.format_specified.then_some(plan.format.as_str()));
        let data = tokio::fs::read(&output).await?;

        tracing::debug!(
            "Processed {} image ({} bytes) into {} ({} bytes) in {:?}",
            image.format,
            image.data.len(),
            plan.format,
            data.len(),
            start.elapsed()
        );

        Ok(Image::new(plan.format, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;

    fn processor(executable: &str) -> ImageProcessor {
        let mut config = Config::default();
        config.graphicsmagick.executable = executable.to_string();
        ImageProcessor::new(&config)
    }

    #[tokio::test]
    async fn test_noop_returns_source_without_running() {
        let image = Image::new("jpeg", vec![1, 2, 3]);
        // The executable does not exist: any launch attempt would fail
        let result = processor("/nonexistent/gm")
            .process(&image, &Params::new().with("other", true))
            .await
            .unwrap();
        assert_eq!(result, image);
        assert_eq!(result.data.as_ptr(), image.data.as_ptr());
    }

    #[tokio::test]
    async fn test_param_error_before_launch() {
        let image = Image::new("jpeg", vec![1, 2, 3]);
        let err = processor("/nonexistent/gm")
            .process(&image, &Params::new().with("rotate", 400))
            .await
            .unwrap_err();
        assert_eq!(err.as_param().unwrap().param, "rotate");
    }

    #[tokio::test]
    async fn test_launch_failure_is_image_error() {
        let image = Image::new("jpeg", vec![1, 2, 3]);
        let err = processor("/nonexistent/gm")
            .process(&image, &Params::new().with("flip", true))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Image(_)));
        assert!(err.to_string().contains("GraphicsMagick command"));
    }

    #[test]
    fn test_plan_uses_source_format() {
        let image = Image::new("png", vec![]);
        let plan = processor("gm")
            .plan(&image, &Params::new().with("quality", 150))
            .unwrap();
        assert_eq!(plan.format, "png");
        assert!(!plan.format_specified);
    }
}
