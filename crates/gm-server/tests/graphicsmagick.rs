//! End-to-end tests against stand-in `gm` executables.
//!
//! The scripts are shell stand-ins for `gm mogrify`, so these tests only run
//! on Unix.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use gm_server::{
    Config, GraphicsMagickServer, Image, ImageServer, Params, ServerError, StaticServer,
    PARAM_NAMESPACE,
};
use tempfile::TempDir;

/// Writes its own command line as the output image, honoring the `-format`
/// output suffix the way mogrify does.
const ECHO_GM: &str = r#"#!/bin/sh
fmt=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "-format" ]; then fmt="$arg"; fi
    prev="$arg"
    last="$arg"
done
out="$last"
if [ -n "$fmt" ]; then out="$last.$fmt"; fi
printf '%s\n' "$@" > "$out"
"#;

/// Records its pid next to the workspace, then hangs.
const SLOW_GM: &str = r#"#!/bin/sh
for arg in "$@"; do last="$arg"; done
echo $$ > "$(dirname "$last")/../gm.pid"
exec sleep 30
"#;

const FAILING_GM: &str = r#"#!/bin/sh
echo "gm mogrify: Unable to open file" >&2
exit 1
"#;

/// Succeeds without writing anything.
const LAZY_GM: &str = "#!/bin/sh\nexit 0\n";

/// All scripts are written once, before any test spawns a process, so no
/// script is ever executed while a write handle to it is open.
fn scripts() -> &'static Path {
    static SCRIPTS: OnceLock<TempDir> = OnceLock::new();
    SCRIPTS
        .get_or_init(|| {
            let dir = tempfile::tempdir().unwrap();
            for (name, body) in [
                ("echo-gm", ECHO_GM),
                ("slow-gm", SLOW_GM),
                ("failing-gm", FAILING_GM),
                ("lazy-gm", LAZY_GM),
            ] {
                let path = dir.path().join(name);
                std::fs::write(&path, body).unwrap();
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            }
            dir
        })
        .path()
}

struct Harness {
    base: TempDir,
    config: Config,
}

impl Harness {
    fn new(script: &str) -> Self {
        let base = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.graphicsmagick.executable = scripts().join(script).to_string_lossy().into_owned();
        config.graphicsmagick.timeout_ms = 10_000;
        config.workspace.temp_dir = Some(base.path().to_path_buf());
        Self { base, config }
    }

    fn server(&self, source: Image) -> GraphicsMagickServer<StaticServer> {
        GraphicsMagickServer::new(StaticServer::new(source), &self.config)
    }

    /// Scratch directories left behind under the base directory.
    fn leftover_workspaces(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.base.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.is_dir())
            .collect()
    }
}

fn source() -> Image {
    Image::new("jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
}

fn request(gm: Params) -> Params {
    Params::new().with(PARAM_NAMESPACE, gm)
}

fn command_line(image: &Image) -> Vec<String> {
    String::from_utf8(image.data.to_vec())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn test_runs_mogrify_with_ordered_arguments() {
    let harness = Harness::new("echo-gm");
    let params = request(
        Params::new()
            .with("width", 100)
            .with("height", 50)
            .with("fill", true)
            .with("ignore_ratio", true)
            .with("trim", true)
            .with("format", "png"),
    );

    let image = harness.server(source()).get(&params).await.unwrap();

    assert_eq!(image.format, "png");
    let line = command_line(&image);
    assert_eq!(
        &line[..line.len() - 1],
        [
            "mogrify",
            "-trim",
            "-resize",
            "100x50^!",
            "-gravity",
            "Center",
            "-interlace",
            "Line",
            "-format",
            "png",
        ]
    );
    let file = PathBuf::from(line.last().unwrap());
    assert_eq!(file.file_name().unwrap(), "image");
    assert!(file.starts_with(harness.base.path()));
    assert!(harness.leftover_workspaces().is_empty());
}

#[tokio::test]
async fn test_in_place_output_keeps_source_format() {
    let harness = Harness::new("echo-gm");
    let params = request(Params::new().with("crop", "10,20,5,5").with("no_interlace", true));

    let image = harness.server(source()).get(&params).await.unwrap();

    assert_eq!(image.format, "jpeg");
    let line = command_line(&image);
    assert_eq!(
        &line[..line.len() - 1],
        ["mogrify", "-gravity", "Center", "-crop", "10x20+5+5", "+repage"]
    );
    assert!(harness.leftover_workspaces().is_empty());
}

#[tokio::test]
async fn test_passthrough_skips_workspace() {
    let harness = Harness::new("failing-gm");
    let image = source();

    let result = harness
        .server(image.clone())
        .get(&request(Params::new().with("unrelated", "value")))
        .await
        .unwrap();

    assert_eq!(result.data.as_ptr(), image.data.as_ptr());
    assert_eq!(std::fs::read_dir(harness.base.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_tool_failure_is_image_error() {
    let harness = Harness::new("failing-gm");

    let err = harness
        .server(source())
        .get(&request(Params::new().with("flip", true)))
        .await
        .unwrap_err();

    match &err {
        ServerError::Image(e) => {
            assert!(e.message.starts_with("GraphicsMagick command:"));
            assert!(e.message.contains("Unable to open file"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(harness.leftover_workspaces().is_empty());
}

#[tokio::test]
async fn test_timeout_kills_tool_and_cleans_up() {
    let mut harness = Harness::new("slow-gm");
    harness.config.graphicsmagick.timeout_ms = 500;

    let start = Instant::now();
    let err = harness
        .server(source())
        .get(&request(Params::new().with("rotate", 90)))
        .await
        .unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(matches!(err, ServerError::Image(_)));
    assert!(err.to_string().contains("timeout after 500ms"));
    assert!(harness.leftover_workspaces().is_empty());

    let pid = std::fs::read_to_string(harness.base.path().join("gm.pid")).unwrap();
    if Path::new("/proc/self").exists() {
        assert!(!Path::new("/proc").join(pid.trim()).exists());
    }
}

#[tokio::test]
async fn test_missing_result_file_is_io_error() {
    let harness = Harness::new("lazy-gm");

    let err = harness
        .server(source())
        .get(&request(Params::new().with("format", "webp")))
        .await
        .unwrap_err();

    assert!(matches!(err, ServerError::Io(_)));
    assert!(harness.leftover_workspaces().is_empty());
}

#[tokio::test]
async fn test_missing_temp_dir_is_io_error() {
    let mut harness = Harness::new("echo-gm");
    harness.config.workspace.temp_dir = Some(harness.base.path().join("missing"));

    let err = harness
        .server(source())
        .get(&request(Params::new().with("flop", true)))
        .await
        .unwrap_err();

    assert!(matches!(err, ServerError::Io(_)));
}

#[tokio::test]
async fn test_concurrent_requests_are_isolated() {
    let harness = Harness::new("echo-gm");
    let server = harness.server(source());

    let first = request(Params::new().with("width", 10));
    let second = request(Params::new().with("height", 20).with("format", "gif"));
    let (a, b) = tokio::join!(server.get(&first), server.get(&second));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(command_line(&a).contains(&"10x".to_string()));
    assert!(command_line(&b).contains(&"x20".to_string()));
    assert_eq!(b.format, "gif");
    assert_ne!(command_line(&a).last(), command_line(&b).last());
    assert!(harness.leftover_workspaces().is_empty());
}

#[tokio::test]
async fn test_param_errors_never_launch() {
    let harness = Harness::new("slow-gm");

    let err = harness
        .server(source())
        .get(&request(Params::new().with("quality", 150)))
        .await
        .unwrap_err();

    assert_eq!(err.as_param().unwrap().param, "graphicsmagick.quality");
    assert_eq!(std::fs::read_dir(harness.base.path()).unwrap().count(), 0);
}
