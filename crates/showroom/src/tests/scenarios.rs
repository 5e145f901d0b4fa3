//! Spawning, eviction, caching, hover and loading driven through a session

use super::*;
use crate::assets::texture::tests::tiny_exr;
use crate::controls::OptionName;
use crate::input::{reference_plane, PointerButton};
use crate::render::RenderSettings;
use crate::scene::Color;
use crate::session::{LOGO_KEY, SOFA_KEY};
use crate::spawn::SpawnOutcome;
use approx::assert_relative_eq;

/// Stage bodies that exist before anything is spawned
const STAGE_BODIES: usize = 3;

fn assert_pool_aligned(session: &Session) {
    let pool = session.pool();
    assert_eq!(session.physics().body_count(), STAGE_BODIES + pool.len());
    assert!(pool
        .iter()
        .all(|pair| session.scene().contains(pair.object) && session.physics().contains(pair.body)));
}

#[test]
fn test_holding_for_1050ms_creates_eleven_pairs() {
    let (mut session, _) = loaded_session();
    point_at_centre(&mut session);

    assert!(matches!(
        session.pointer_pressed(PointerButton::Primary, ms(0)),
        SpawnOutcome::Created(_)
    ));
    // A 240 Hz host: far more ticks than creations
    for t in (4..=1_050).step_by(4) {
        session.frame(ms(t)).expect("frame");
    }
    session.pointer_released(PointerButton::Primary);
    session.frame(ms(1_100)).expect("frame");

    // Creations at 0, 100, ..., 1000 ms
    assert_eq!(session.pool().len(), 11);
    assert_eq!(session.spawner().created(), 11);
    assert_eq!(session.spawner().evicted(), 0);
    let times: Vec<_> = session.pool().iter().map(|p| p.created_at.as_millis()).collect();
    assert_eq!(times, (0..=10).map(|i| i * 100).collect::<Vec<_>>());
    assert_pool_aligned(&session);
}

#[test]
fn test_single_spawn_lives_for_exactly_its_lifetime() {
    let (mut session, _) = loaded_session();
    point_at_centre(&mut session);

    let SpawnOutcome::Created(pair) = session.pointer_pressed(PointerButton::Primary, ms(0)) else {
        panic!("expected a creation");
    };
    session.pointer_released(PointerButton::Primary);

    for t in [16, 5_000, 9_999] {
        session.frame(ms(t)).expect("frame");
        assert!(session.scene().contains(pair.object));
        assert!(session.physics().contains(pair.body));
    }

    session.frame(ms(10_000)).expect("frame");
    assert!(!session.scene().contains(pair.object));
    assert!(!session.physics().contains(pair.body));
    assert!(session.pool().is_empty());
    assert_pool_aligned(&session);
}

#[test]
fn test_eviction_order_matches_creation_order() {
    let (mut session, _) = loaded_session();
    point_at_centre(&mut session);

    session.pointer_pressed(PointerButton::Primary, ms(0));
    for t in (10..=450).step_by(10) {
        session.frame(ms(t)).expect("frame");
    }
    session.pointer_released(PointerButton::Primary);
    let created: Vec<_> = session.pool().iter().copied().collect();
    assert_eq!(created.len(), 5);

    let mut evicted = Vec::new();
    for t in (9_900..=10_500).step_by(10) {
        let before: Vec<_> = session.pool().iter().copied().collect();
        session.frame(ms(t)).expect("frame");
        evicted.extend(before.into_iter().filter(|p| !session.scene().contains(p.object)));
        assert_pool_aligned(&session);
    }
    assert_eq!(evicted, created);
}

#[test]
fn test_late_frame_evicts_one_head_per_expired_timer() {
    let (mut session, _) = loaded_session();
    point_at_centre(&mut session);

    session.pointer_pressed(PointerButton::Primary, ms(0));
    for t in [100, 200, 300] {
        session.frame(ms(t)).expect("frame");
    }
    session.pointer_released(PointerButton::Primary);
    assert_eq!(session.pool().len(), 4);

    // Host stalled: timers for 0, 100 and 200 ms all expired before this frame
    session.frame(ms(10_250)).expect("frame");
    assert_eq!(session.pool().len(), 1);
    assert_eq!(session.pool().front().map(|p| p.created_at), Some(ms(300)));
    assert_pool_aligned(&session);
}

#[test]
fn test_press_before_logo_loads_spawns_once_it_arrives() {
    let source = stock_source();
    let mut session = session_with(&source);
    session.start_loading().expect("loading");
    point_at_centre(&mut session);

    assert_eq!(
        session.pointer_pressed(PointerButton::Primary, ms(0)),
        SpawnOutcome::NoTemplate
    );
    session.frame(ms(16)).expect("frame");
    assert_eq!(session.pool().len(), 1);
    assert_eq!(session.spawner().last_creation(), Some(ms(16)));
}

#[test]
fn test_no_spawn_before_the_pointer_moves() {
    let (mut session, _) = loaded_session();
    assert_eq!(
        session.pointer_pressed(PointerButton::Primary, ms(0)),
        SpawnOutcome::NoPickPoint
    );
    session.frame(ms(16)).expect("frame");
    assert!(session.pool().is_empty());
}

#[test]
fn test_repeated_loading_hits_the_cache() {
    let (mut session, source) = loaded_session();
    let first = session.cached_model(LOGO_KEY).expect("logo");

    session.start_loading().expect("loading");
    session.frame(ms(16)).expect("frame");

    let assets = session.config().assets.clone();
    assert_eq!(session.loads_started(), 3);
    for url in [&assets.background, &assets.sofa, &assets.logo] {
        assert_eq!(source.fetch_count(url), 1, "{url}");
    }
    let second = session.cached_model(LOGO_KEY).expect("logo");
    assert!(Rc::ptr_eq(&first, &second));

    // Sofa and showcase logo are placed once
    let placed = |name: &str| session.scene().iter().filter(|(_, o)| o.name == name).count();
    assert_eq!(placed("sofa"), 1);
    assert_eq!(placed("logo"), 1);
}

#[test]
fn test_hover_highlight_tracks_the_pointer_every_frame() {
    let (mut session, _) = loaded_session();
    let target = session.stage().hover_sphere;
    let color = |session: &Session| {
        session
            .scene()
            .get(target)
            .and_then(|o| o.material())
            .map(|m| m.color)
    };

    let sphere = session.scene().get(target).expect("sphere").transform.position;
    let (x, y) = screen_position(&session, sphere);
    session.pointer_moved(x, y);
    assert!(session.frame(ms(16)).expect("frame").hovered);
    assert_eq!(color(&session), Some(Color::BLUE));

    session.pointer_moved(0.0, 0.0);
    assert!(!session.frame(ms(32)).expect("frame").hovered);
    assert_eq!(color(&session), Some(Color::RED));

    // The reset colour follows the panel
    session.set_sphere_color(Color::GREEN);
    session.frame(ms(48)).expect("frame");
    assert_eq!(color(&session), Some(Color::GREEN));
}

#[test]
fn test_loading_indicator_hides_when_every_item_settles() {
    let source = stock_source();
    let mut session = session_with(&source);
    assert!(!session.progress().is_visible());

    session.start_loading().expect("loading");
    assert!(session.progress().is_visible());
    assert_eq!(session.progress().items_total(), 3);
    assert_relative_eq!(session.render_settings().exposure, 1.0);

    session.frame(ms(0)).expect("frame");
    assert!(!session.progress().is_visible());
    assert_eq!(session.progress().items_loaded(), 3);
    assert!(session.scene().environment.environment.is_some());
    assert_relative_eq!(session.render_settings().exposure, RenderSettings::ENVIRONMENT_EXPOSURE);
}

#[test]
fn test_failed_asset_leaves_the_others_working() {
    let assets = ShowroomConfig::default().assets;
    let source = Rc::new(
        MemorySource::new()
            .with(assets.background, tiny_exr())
            .with(assets.logo, logo_glb()),
    );
    let mut session = session_with(&source);
    session.start_loading().expect("loading");
    session.frame(ms(0)).expect("frame");

    let progress = session.progress();
    assert!(progress.is_complete());
    assert_eq!(progress.items_failed(), 1);
    assert!(session.cached_model(SOFA_KEY).is_none());
    assert!(session.spawner().has_template());
    assert!(session.scene().iter().all(|(_, o)| o.name != "sofa"));
}

#[test]
fn test_position_controls_survive_the_oscillation() {
    let (mut session, _) = loaded_session();
    let target = session.stage().hover_sphere;

    assert_relative_eq!(session.set_option(OptionName::X, 7.5).expect("numeric"), 7.5, epsilon = 1e-5);
    session.set_option(OptionName::Y, 1.0).expect("numeric");
    session.set_option(OptionName::Speed, 0.0).expect("numeric");
    session.frame(ms(16)).expect("frame");

    let position = session.scene().get(target).expect("sphere").transform.position;
    assert_relative_eq!(position.x, 7.5, epsilon = 1e-5);
    // y = base + 2|sin(phase)|, and the phase has advanced by 0.01 once
    let phase: f32 = 0.01;
    assert_relative_eq!(position.y, 1.0 + 2.0 * phase.sin().abs(), epsilon = 1e-5);
    assert!(session.toggle_wireframe());
}

#[test]
fn test_file_loads_advance_one_chunk_per_frame() {
    let dir = stock_dir("paced");
    let logo = ShowroomConfig::default().assets.logo;
    let size = std::fs::metadata(dir.join(&logo)).expect("logo").len();
    let mut session = file_session(&dir, 32);
    session.start_loading().expect("loading");

    session.frame(ms(0)).expect("frame");
    let item = session.progress().item(&logo).expect("outstanding");
    assert_eq!(item.loaded, 32);
    assert_eq!(item.total, Some(size));
    assert!(session.progress().is_visible());
    assert!(!session.spawner().has_template());

    session.frame(ms(16)).expect("frame");
    assert_eq!(session.progress().item(&logo).map(|i| i.loaded), Some(64));

    let mut t = 16;
    while session.progress().is_visible() && t < 100_000 {
        t += 16;
        session.frame(ms(t)).expect("frame");
    }
    assert!(!session.progress().is_visible());
    assert_eq!(session.progress().items_loaded(), 3);
    assert!(session.spawner().has_template());
    // One chunk per frame: the logo needed at least size / 32 frames
    assert!(t / 16 >= size / 32);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_resize_keeps_centre_pick_on_the_origin() {
    let (mut session, _) = loaded_session();
    session.resized(800, 600).expect("resize");
    assert_relative_eq!(session.camera().aspect, 800.0 / 600.0, epsilon = 1e-6);

    session.pointer_moved(400.0, 300.0);
    let point = session.pick_point().expect("pick");
    assert_relative_eq!(point.norm(), 0.0, epsilon = 1e-3);

    // The old centre pixel is now off-centre
    session.pointer_moved(f64::from(WIDTH) / 2.0, f64::from(HEIGHT) / 2.0);
    assert!(session.pick_point().expect("pick").norm() > 0.1);
}

#[test]
fn test_orbit_drag_picks_on_the_moved_cameras_plane() {
    let (mut session, _) = loaded_session();
    point_at_centre(&mut session);
    let initial = session.camera().clone();

    session.pointer_pressed(PointerButton::Secondary, ms(0));
    session.pointer_moved(f64::from(WIDTH) / 2.0 + 120.0, f64::from(HEIGHT) / 2.0 + 40.0);
    session.pointer_released(PointerButton::Secondary);
    assert!((session.camera().position - initial.position).norm() > 0.1);
    assert_relative_eq!(session.camera().distance(), initial.distance(), epsilon = 1e-3);
    assert!(session.pool().is_empty());

    let point = session.pick_point().expect("pick");
    let moved = reference_plane(session.camera()).expect("plane");
    let original = reference_plane(&initial).expect("plane");
    assert_relative_eq!(moved.distance_to_point(point), 0.0, epsilon = 1e-3);
    assert!(original.distance_to_point(point).abs() > 1e-2);
}

#[test]
fn test_scroll_zooms_and_keeps_centre_pick() {
    let (mut session, _) = loaded_session();
    point_at_centre(&mut session);
    let before = session.camera().distance();

    session.scrolled(2.0);
    assert_relative_eq!(session.camera().distance(), before * 0.81, epsilon = 1e-3);
    let point = session.pick_point().expect("pick");
    assert_relative_eq!(point.norm(), 0.0, epsilon = 1e-3);

    session.scrolled(-2.0);
    assert_relative_eq!(session.camera().distance(), before, epsilon = 1e-3);
}
