//! Image servers: the upstream source contract and the GraphicsMagick layer.

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::params::Params;
use crate::pipeline::ImageProcessor;
use crate::types::Image;

/// Parameter namespace holding all GraphicsMagick parameters.
pub const PARAM_NAMESPACE: &str = "graphicsmagick";

/// Anything that can produce an image for a set of request parameters.
///
/// Uses `async_trait` so servers can be stacked behind `Box<dyn ImageServer>`.
#[async_trait]
pub trait ImageServer: Send + Sync {
    async fn get(&self, params: &Params) -> Result<Image>;
}

/// Always serves the same image.
#[derive(Debug, Clone)]
pub struct StaticServer {
    image: Image,
}

impl StaticServer {
    pub fn new(image: Image) -> Self {
        Self { image }
    }
}

#[async_trait]
impl ImageServer for StaticServer {
    async fn get(&self, _params: &Params) -> Result<Image> {
        Ok(self.image.clone())
    }
}

/// Processes images from an upstream server with GraphicsMagick.
///
/// All parameters are read from the `graphicsmagick` namespace and are
/// optional. Without that namespace (or with an empty one) the upstream image
/// is returned untouched.
///
/// | Param | Effect |
/// |---|---|
/// | `width`, `height` | `-resize` geometry |
/// | `fill` / `ignore_ratio` / `only_shrink_larger` / `only_enlarge_smaller` | `^` / `!` / `>` / `<` resize modifiers |
/// | `extent` | `-extent` with the resize geometry |
/// | `background` | `-background`, 3/4/6/8 lowercase hex digits |
/// | `gravity` | `-gravity`, default `Center` |
/// | `crop` | `-crop` + `+repage` |
/// | `rotate` | `-rotate` |
/// | `monochrome` | `-monochrome` |
/// | `grey` | `-colorspace GRAY` |
/// | `trim` | `-trim`, applied first |
/// | `no_interlace` | disables `-interlace Line` |
/// | `flip`, `flop` | `-flip`, `-flop` |
/// | `format` | `-format` |
/// | `quality` | `-quality` |
pub struct GraphicsMagickServer<S> {
    upstream: S,
    processor: ImageProcessor,
}

impl<S: ImageServer> GraphicsMagickServer<S> {
    pub fn new(upstream: S, config: &Config) -> Self {
        Self {
            upstream,
            processor: ImageProcessor::new(config),
        }
    }
}

#[async_trait]
impl<S: ImageServer> ImageServer for GraphicsMagickServer<S> {
    async fn get(&self, params: &Params) -> Result<Image> {
        let image = self.upstream.get(params).await?;
        if !params.has(PARAM_NAMESPACE) {
            return Ok(image);
        }
        let gm_params = params.get_params(PARAM_NAMESPACE)?;
        if gm_params.is_empty() {
            return Ok(image);
        }

        self.processor
            .process(&image, gm_params)
            .await
            .map_err(|err| match err {
                ServerError::Param(e) => ServerError::Param(e.prefixed(PARAM_NAMESPACE)),
                other => other,
            })
    }
}
