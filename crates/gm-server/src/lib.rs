//! gm-server - image server middleware backed by the GraphicsMagick CLI.
//!
//! Takes an image from an upstream server, turns the request's
//! `graphicsmagick.*` parameters into a `gm mogrify` command line, runs it on
//! a scratch copy of the image and returns the result.
//!
//! # Architecture
//!
//! ```text
//! Upstream → Params → Arguments → Workspace → gm mogrify (timeout) → Image
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use gm_server::{Config, GraphicsMagickServer, Image, ImageServer, Params, StaticServer};
//!
//! #[tokio::main]
//! async fn main() -> gm_server::Result<()> {
//!     let config = Config::load()?;
//!     let source = Image::new("jpeg", std::fs::read("photo.jpg")?);
//!     let server = GraphicsMagickServer::new(StaticServer::new(source), &config);
//!
//!     let params = Params::new().with(
//!         "graphicsmagick",
//!         Params::new().with("width", 300).with("format", "webp"),
//!     );
//!     let image = server.get(&params).await?;
//!     println!("{} bytes of {}", image.data.len(), image.format);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod server;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, ImageError, ParamError, ParamResult, ProcessError, Result, ServerError,
};
pub use params::{ParamValue, Params};
pub use pipeline::{CommandPlan, ImageProcessor};
pub use server::{GraphicsMagickServer, ImageServer, StaticServer, PARAM_NAMESPACE};
pub use types::Image;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_static_server_roundtrip() {
        let image = Image::new("png", vec![1, 2, 3]);
        let server = GraphicsMagickServer::new(StaticServer::new(image.clone()), &Config::default());
        assert_eq!(server.get(&Params::new()).await.unwrap(), image);
    }
}
