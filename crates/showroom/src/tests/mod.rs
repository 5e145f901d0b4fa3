//! End-to-end session tests
//!
//! Sessions here run against an in-memory asset source and the headless
//! renderer, driven with explicit timestamps.

mod scenarios;

use crate::assets::model::tests::logo_glb;
use crate::assets::texture::tests::tiny_exr;
use crate::assets::{AssetSource, FileSource, MemorySource};
use crate::config::ShowroomConfig;
use crate::foundation::math::{Point3, Vec3};
use crate::render::HeadlessRenderer;
use crate::session::Session;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

pub(crate) const WIDTH: u32 = 1280;
pub(crate) const HEIGHT: u32 = 720;

/// Source serving every stock asset
pub(crate) fn stock_source() -> Rc<MemorySource> {
    let assets = ShowroomConfig::default().assets;
    Rc::new(
        MemorySource::new()
            .with(assets.background, tiny_exr())
            .with(assets.sofa, logo_glb())
            .with(assets.logo, logo_glb()),
    )
}

/// Directory holding the stock assets on disk
pub(crate) fn stock_dir(tag: &str) -> PathBuf {
    let assets = ShowroomConfig::default().assets;
    let dir = std::env::temp_dir().join(format!("showroom-{}-{}", tag, std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    for (name, bytes) in [
        (&assets.background, tiny_exr()),
        (&assets.sofa, logo_glb()),
        (&assets.logo, logo_glb()),
    ] {
        std::fs::write(dir.join(name), bytes).expect("write asset");
    }
    dir
}

/// Session reading `dir` in chunks of `chunk_size` bytes
pub(crate) fn file_session(dir: &PathBuf, chunk_size: usize) -> Session {
    let mut config = ShowroomConfig::default();
    config.window.width = WIDTH;
    config.window.height = HEIGHT;
    Session::new(
        config,
        Rc::new(FileSource::new(dir).with_chunk_size(chunk_size)),
        Box::new(HeadlessRenderer::new(WIDTH, HEIGHT)),
    )
    .expect("session")
}

/// Session over `source`, not yet loading
pub(crate) fn session_with(source: &Rc<MemorySource>) -> Session {
    let mut config = ShowroomConfig::default();
    config.window.width = WIDTH;
    config.window.height = HEIGHT;
    Session::new(
        config,
        Rc::clone(source) as Rc<dyn AssetSource>,
        Box::new(HeadlessRenderer::new(WIDTH, HEIGHT)),
    )
    .expect("session")
}

/// Session with every stock asset loaded by a frame at t = 0
pub(crate) fn loaded_session() -> (Session, Rc<MemorySource>) {
    let source = stock_source();
    let mut session = session_with(&source);
    session.start_loading().expect("loading");
    session.frame(Duration::ZERO).expect("frame");
    assert!(session.spawner().has_template());
    (session, source)
}

pub(crate) fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Window pixel at which `point` appears
pub(crate) fn screen_position(session: &Session, point: Vec3) -> (f64, f64) {
    let ndc = session
        .camera()
        .view_projection_matrix()
        .transform_point(&Point3::from(point));
    let x = (f64::from(ndc.x) + 1.0) / 2.0 * f64::from(WIDTH);
    let y = (1.0 - f64::from(ndc.y)) / 2.0 * f64::from(HEIGHT);
    (x, y)
}

/// Move the pointer to the centre of the window, which picks the origin
pub(crate) fn point_at_centre(session: &mut Session) {
    session.pointer_moved(f64::from(WIDTH) / 2.0, f64::from(HEIGHT) / 2.0);
}
