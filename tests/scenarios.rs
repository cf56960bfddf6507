//! End-to-end navigation scenarios: raw events in, camera pose out.

use std::sync::Arc;

use bevy_geo_cam::{controller::task::TaskKind, extensions::tether::FixedTarget, prelude::*};
use bevy_input::keyboard::KeyCode;
use bevy_math::{DVec2, DVec3};

const CENTER: DVec2 = DVec2::new(640.0, 360.0);

struct World {
    cam: GeoCam,
    camera: RenderCamera,
    geo: Ellipsoid,
}

impl World {
    fn new(cam: GeoCam) -> Self {
        let mut world = Self {
            cam,
            camera: RenderCamera::new(CameraProjection::default(), Viewport::default()),
            geo: Ellipsoid::WGS84,
        };
        world.send(NavEvent::Frame { time: 0.0 });
        world
    }

    fn send(&mut self, event: NavEvent) -> bool {
        let mut ctx = NavContext {
            camera: &mut self.camera,
            geo: &self.geo,
            scene: None,
        };
        self.cam.handle(&event, &mut ctx)
    }

    fn frame(&mut self, time: f64) {
        self.send(NavEvent::Frame { time });
    }

    fn height(&self) -> f64 {
        self.geo.to_cartographic(self.cam.pose.center).z
    }
}

fn pointer(position: DVec2, buttons: ButtonMask, time: f64) -> PointerSample {
    PointerSample {
        position,
        buttons,
        modifiers: Modifiers::NONE,
        time,
    }
}

fn click(world: &mut World, position: DVec2, time: f64) {
    world.send(NavEvent::ButtonPress(pointer(position, ButtonMask::LEFT, time)));
    world.send(NavEvent::ButtonRelease(pointer(
        position,
        ButtonMask::NONE,
        time + 0.1,
    )));
}

fn drag(world: &mut World, from: DVec2, to: DVec2, start: f64) {
    let steps = 4;
    world.send(NavEvent::ButtonPress(pointer(from, ButtonMask::LEFT, start)));
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        world.send(NavEvent::Move(pointer(
            from.lerp(to, t),
            ButtonMask::LEFT,
            start + 0.02 * i as f64,
        )));
    }
    world.send(NavEvent::ButtonRelease(pointer(
        to,
        ButtonMask::NONE,
        start + 0.02 * (steps + 1) as f64,
    )));
}

#[test]
fn starts_at_home() {
    let world = World::new(GeoCam::default());
    let radius = Ellipsoid::WGS84.semi_major;
    assert!(world
        .cam
        .pose
        .center
        .abs_diff_eq(DVec3::new(radius, 0.0, 0.0), 1e-6));
    assert!((world.cam.pose.distance - 3.5 * radius).abs() < 1e-6);
    // The first frame writes the pose into the camera.
    assert!(world
        .camera
        .eye()
        .abs_diff_eq(DVec3::new(4.5 * radius, 0.0, 0.0), 1e-3));
}

#[test]
fn scroll_up_zooms_in_over_a_fifth_of_a_second() {
    let mut world = World::new(GeoCam::default());
    let start = world.cam.pose.distance;

    assert!(world.send(NavEvent::Scroll {
        delta: DVec2::new(0.0, -1.0),
        position: CENTER,
        time: 0.0,
    }));
    let task = *world.cam.task();
    assert_eq!(task.kind(), TaskKind::Zoom);
    assert_ne!(task.rate(), DVec2::ZERO);
    assert!((task.remaining() - 0.2).abs() < 1e-12);

    world.frame(0.1);
    let after_tick = world.cam.pose.distance;
    assert!(after_tick < start);
    assert!((after_tick - start * 0.85).abs() < 1e-3);

    world.frame(0.5);
    assert!(world.cam.pose.distance < after_tick);
    assert_eq!(world.cam.task().kind(), TaskKind::None);
}

#[test]
fn scroll_down_zooms_out() {
    let mut world = World::new(GeoCam::default());
    let start = world.cam.pose.distance;
    world.send(NavEvent::Scroll {
        delta: DVec2::new(0.0, 3.0),
        position: CENTER,
        time: 0.0,
    });
    world.frame(0.3);
    assert!(world.cam.pose.distance > start);
}

#[test]
fn geocentric_pan_keeps_height() {
    let mut world = World::new(GeoCam::default());
    let start = world.cam.pose.center;
    assert!(world.height().abs() < 1e-3);

    drag(&mut world, CENTER, CENTER + DVec2::new(120.0, 40.0), 0.0);
    world.frame(0.2);

    assert!(world.cam.pose.center.distance(start) > 1.0);
    assert!(world.height().abs() < 1e-3, "height {}", world.height());
}

#[test]
fn arrow_key_pans_west() {
    let mut world = World::new(GeoCam::default());
    assert!(world.send(NavEvent::KeyPress {
        key: KeyCode::ArrowLeft,
        modifiers: Modifiers::NONE,
        time: 0.0,
    }));
    assert_eq!(world.cam.task().kind(), TaskKind::Pan);
    world.frame(0.3);
    // East is +Y at the prime meridian, so panning left moves the center toward -Y.
    assert!(world.cam.pose.center.y < -1.0);
    assert!(world.height().abs() < 1e-3);
    assert!(!world.cam.task().is_active());
}

#[test]
fn space_goes_home() {
    let mut world = World::new(GeoCam::default());
    let home = world.cam.pose;
    drag(&mut world, CENTER, CENTER + DVec2::new(-200.0, 0.0), 0.0);
    assert_ne!(world.cam.pose.center, home.center);

    world.send(NavEvent::KeyPress {
        key: KeyCode::Space,
        modifiers: Modifiers::NONE,
        time: 1.0,
    });
    assert!(world.cam.pose.center.abs_diff_eq(home.center, 1e-6));
    assert_eq!(world.cam.pose.distance, home.distance);
}

#[test]
fn double_click_flies_to_the_point() {
    let mut world = World::new(GeoCam::default());
    let radius = Ellipsoid::WGS84.semi_major;
    let start = world.cam.pose.distance;

    click(&mut world, CENTER, 0.0);
    assert!(!world.cam.is_setting_viewpoint());
    click(&mut world, CENTER, 0.2);
    assert!(world.cam.is_setting_viewpoint());

    world.frame(0.4);
    world.frame(0.9);
    assert!(world.cam.is_setting_viewpoint());
    world.frame(1.5);
    assert!(!world.cam.is_setting_viewpoint());

    assert!((world.cam.pose.distance - start * 0.4).abs() < 1e-3);
    assert!(world
        .cam
        .pose
        .center
        .abs_diff_eq(DVec3::new(radius, 0.0, 0.0), 1e-3));
}

#[test]
fn a_drag_cancels_a_flight() {
    let mut world = World::new(GeoCam::default());
    world.cam.set_viewpoint(
        &Viewpoint::at(DVec3::new(1.0, 0.5, 0.0)),
        3.0,
        &Ellipsoid::WGS84,
    );
    world.frame(0.1);
    assert!(world.cam.is_setting_viewpoint());
    drag(&mut world, CENTER, CENTER + DVec2::new(30.0, 0.0), 0.2);
    assert!(!world.cam.is_setting_viewpoint());
}

#[test]
fn viewpoint_round_trips_through_cartographic() {
    let mut world = World::new(GeoCam::default());
    let target = Viewpoint::at(DVec3::new(0.3, 0.8, 0.0))
        .with_heading_pitch(0.5, -0.7)
        .with_range(20_000.0);
    world.cam.set_viewpoint(&target, 0.0, &Ellipsoid::WGS84);

    let read = world.cam.viewpoint(&Ellipsoid::WGS84);
    let focal = read.focal_point.unwrap();
    assert!((focal.x - 0.3).abs() < 1e-9);
    assert!((focal.y - 0.8).abs() < 1e-9);
    assert!((read.heading.unwrap() - 0.5).abs() < 1e-9);
    assert!((read.pitch.unwrap() + 0.7).abs() < 1e-9);
    assert!((read.range.unwrap() - 20_000.0).abs() < 1e-6);
}

#[test]
fn p_toggles_orthographic_and_back() {
    let mut world = World::new(GeoCam::default());
    let perspective = world.camera.projection;
    let key = |time| NavEvent::KeyPress {
        key: KeyCode::KeyP,
        modifiers: Modifiers::NONE,
        time,
    };

    world.send(key(0.0));
    assert!(world.camera.projection.is_orthographic());

    // Scrolling an orthographic camera scales the frustum instead of moving.
    let distance = world.cam.pose.distance;
    let CameraProjection::Orthographic { right: before, .. } = world.camera.projection else {
        panic!("expected orthographic");
    };
    world.send(NavEvent::Scroll {
        delta: DVec2::new(0.0, -1.0),
        position: CENTER,
        time: 0.1,
    });
    world.frame(0.2);
    let CameraProjection::Orthographic { right: after, .. } = world.camera.projection else {
        panic!("expected orthographic");
    };
    assert_ne!(before, after);
    assert_eq!(world.cam.pose.distance, distance);

    world.send(key(0.5));
    assert_eq!(world.camera.projection, perspective);
}

#[test]
fn ctrl_drag_rotates_continuously() {
    let mut world = World::new(GeoCam::default());
    world.send(NavEvent::KeyPress {
        key: KeyCode::ControlLeft,
        modifiers: Modifiers::LEFT_CONTROL,
        time: 0.0,
    });
    world.send(NavEvent::ButtonPress(pointer(CENTER, ButtonMask::LEFT, 0.0)));
    world.send(NavEvent::Move(pointer(
        CENTER + DVec2::new(60.0, 0.0),
        ButtonMask::LEFT,
        0.05,
    )));
    assert!(world.cam.is_continuous());

    let before = world.cam.pose.local_rotation;
    world.frame(0.1);
    let first = world.cam.pose.local_rotation;
    assert!(first.angle_between(before) > 1e-3);

    // Holding still keeps turning.
    world.frame(0.2);
    assert!(world.cam.pose.local_rotation.angle_between(first) > 1e-3);
    assert_eq!(world.cam.pose.center, world.cam.home_pose(&world.geo).center);
}

#[test]
fn throw_carries_a_drag_on() {
    let mut settings = Settings::default();
    settings.set_throwing_enabled(true);
    let mut world = World::new(GeoCam::new(Some(Arc::new(settings))));

    drag(&mut world, CENTER, CENTER + DVec2::new(80.0, 0.0), 0.0);
    assert!(world.cam.is_throwing());
    let released = world.cam.pose.center;
    world.frame(0.2);
    assert!(world.cam.pose.center.distance(released) > 1.0);

    // Decays to a stop.
    for i in 1..600 {
        world.frame(0.2 + i as f64 / 60.0);
    }
    assert!(!world.cam.is_throwing());
}

#[test]
fn tether_follows_until_the_user_moves() {
    let mut world = World::new(GeoCam::default());
    let target = Ellipsoid::WGS84.to_world(DVec3::new(0.2, 0.1, 0.0));
    world
        .cam
        .tether_to(Arc::new(FixedTarget(target)), 0.5, &Ellipsoid::WGS84);
    assert!(world.cam.is_tethering());
    world.frame(0.1);
    world.frame(0.7);
    world.frame(0.8);
    assert!(world.cam.is_tethering());
    assert!(world.cam.pose.center.abs_diff_eq(target, 1e-3));

    drag(&mut world, CENTER, CENTER + DVec2::new(10.0, 10.0), 1.0);
    assert!(!world.cam.is_tethering());
}

#[test]
fn replacing_settings_reclamps_distance() {
    let mut world = World::new(GeoCam::default());
    let mut settings = Settings::default();
    settings.set_min_max_distance(10.0, 1000.0);
    world.cam.apply_settings(Arc::new(settings));
    assert_eq!(world.cam.pose.distance, 1000.0);

    world.cam.settings_mut().set_min_max_distance(10.0, 500.0);
    world.frame(0.1);
    assert_eq!(world.cam.pose.distance, 500.0);
    assert!(!world.cam.settings().is_dirty());
}

#[test]
fn unbound_inputs_are_ignored() {
    let mut world = World::new(GeoCam::new(Some(Arc::new(Settings::unbound()))));
    let home = world.cam.pose;
    assert!(!world.send(NavEvent::KeyPress {
        key: KeyCode::ArrowLeft,
        modifiers: Modifiers::NONE,
        time: 0.0,
    }));
    assert!(!world.send(NavEvent::Scroll {
        delta: DVec2::new(0.0, -1.0),
        position: CENTER,
        time: 0.0,
    }));
    drag(&mut world, CENTER, CENTER + DVec2::new(50.0, 0.0), 0.1);
    world.frame(0.5);
    assert_eq!(world.cam.pose, home);
}

#[test]
fn planar_pinch_zooms() {
    let geo = FlatSurface::square(10_000.0);
    let mut cam = GeoCam::default();
    let mut camera = RenderCamera::new(CameraProjection::default(), Viewport::default());
    let mut send = |cam: &mut GeoCam, event: NavEvent| {
        let mut ctx = NavContext {
            camera: &mut camera,
            geo: &geo,
            scene: None,
        };
        cam.handle(&event, &mut ctx)
    };
    send(&mut cam, NavEvent::Frame { time: 0.0 });
    assert_eq!(cam.pose.center, DVec3::ZERO);
    let start = cam.pose.distance;
    assert_eq!(start, 35_000.0);

    let down = |id, x, time| NavEvent::TouchDown {
        id,
        position: DVec2::new(x, 360.0),
        time,
    };
    send(&mut cam, down(1, 600.0, 0.0));
    send(&mut cam, down(2, 680.0, 0.0));
    // Spread the fingers apart: zoom in.
    assert!(send(
        &mut cam,
        NavEvent::TouchMove {
            id: 2,
            position: DVec2::new(780.0, 360.0),
            time: 0.05,
        }
    ));
    assert!(cam.pose.distance < start);
}

#[test]
fn two_finger_twist_turns_the_heading() {
    let mut world = World::new(GeoCam::default());
    let home = world.cam.pose;
    assert!(home.heading_pitch().0.abs() < 1e-9);

    let finger = |id, position, time| NavEvent::TouchDown { id, position, time };
    world.send(finger(1, DVec2::new(600.0, 360.0), 0.0));
    assert!(world.send(finger(2, DVec2::new(680.0, 360.0), 0.0)));

    // Swing the second finger 30 degrees about the first, keeping the spread.
    let angle = std::f64::consts::FRAC_PI_6;
    let swung = DVec2::new(600.0, 360.0) + DVec2::from_angle(angle) * 80.0;
    assert!(world.send(NavEvent::TouchMove {
        id: 2,
        position: swung,
        time: 0.05,
    }));

    // The midpoint drifts too, which the two-finger drag adds to the heading.
    let drift = (swung.x - 680.0) * 0.5 * world.cam.settings().sensitivity().touch;
    let (heading, _) = world.cam.pose.heading_pitch();
    assert!((heading - (angle + drift)).abs() < 1e-6, "{heading}");
    assert!(world.cam.pose.center.abs_diff_eq(home.center, 1e-6));
    assert!((world.cam.pose.distance / home.distance - 1.0).abs() < 1e-9);

    world.send(NavEvent::TouchUp {
        id: 2,
        position: swung,
        time: 0.1,
    });
    world.send(NavEvent::TouchUp {
        id: 1,
        position: DVec2::new(600.0, 360.0),
        time: 0.1,
    });
    assert!(!world.cam.task().is_active());
}
