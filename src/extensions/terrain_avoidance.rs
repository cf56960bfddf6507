//! Keep the eye above the scene.
//!
//! Enabled with [`Settings::set_terrain_avoidance_enabled`]. After every frame's motion the
//! controller probes straight up and down through the eye. If the eye has come within the
//! minimum clearance of whatever it hits, the distance is reset to reach from the focal point to
//! the clearance height above the hit, keeping the orientation.

use bevy_log::prelude::*;
use bevy_math::DVec3;

use crate::{
    controller::{motion::center_rotation, pose::Pose, settings::Settings},
    services::{closest_intersection, GeoService, IntersectionService},
};

/// Pull the eye up to the minimum clearance above the scene. Returns `true` if the pose changed.
pub fn avoid_terrain(
    pose: &mut Pose,
    settings: &Settings,
    geo: &dyn GeoService,
    scene: &dyn IntersectionService,
) -> bool {
    let eye = pose.eye();
    let up = center_rotation(geo, eye) * DVec3::Z;
    let clearance = settings.terrain_avoidance_min_distance();
    let reach = geo.semi_major_axis();

    let start = eye + up * reach;
    let end = eye - up * reach;
    let Some(hit) = closest_intersection(scene, start, end) else {
        return false;
    };
    if (eye - hit).dot(up) >= clearance {
        return false;
    }

    let focal_point = pose.center + pose.center_rotation * pose.offset;
    let safe_eye = hit + up * clearance;
    let distance = (safe_eye - focal_point).length();
    if !distance.is_finite() {
        return false;
    }
    trace!("Terrain avoidance pulled the distance from {} to {distance}", pose.distance);
    pose.set_distance(distance, settings);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::pose::rotation_from_heading_pitch,
        services::{FlatSurface, Intersection},
    };

    /// A wall of height `height` covering `x > 0`.
    struct Ridge {
        height: f64,
    }

    impl IntersectionService for Ridge {
        fn intersect_segment(&self, start: DVec3, end: DVec3) -> Vec<Intersection> {
            let dz = end.z - start.z;
            if dz.abs() < f64::EPSILON {
                return Vec::new();
            }
            let ratio = (self.height - start.z) / dz;
            let point = start + (end - start) * ratio;
            if (0.0..=1.0).contains(&ratio) && point.x > 0.0 {
                vec![Intersection { ratio, point }]
            } else {
                Vec::new()
            }
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.set_terrain_avoidance_enabled(true);
        settings.set_terrain_avoidance_min_distance(5.0);
        settings
    }

    #[test]
    fn lifts_an_eye_inside_the_clearance() {
        let geo = FlatSurface::square(1000.0);
        let settings = settings();
        // Looking west 45 degrees down puts the eye above x > 0, over the ridge.
        let mut pose = Pose {
            local_rotation: rotation_from_heading_pitch(
                -std::f64::consts::FRAC_PI_2,
                -std::f64::consts::FRAC_PI_4,
            ),
            distance: 20.0,
            ..Default::default()
        };
        let eye = pose.eye();
        assert!(eye.x > 0.0 && eye.z > 12.0 && eye.z < 17.0);

        let ridge = Ridge { height: 12.0 };
        assert!(avoid_terrain(&mut pose, &settings, &geo, &ridge));
        let expected = DVec3::new(eye.x, 0.0, 17.0).length();
        assert!((pose.distance - expected).abs() < 1e-9);
        assert!(pose.eye().z > eye.z);
        let (heading, pitch) = pose.heading_pitch();
        assert!((heading + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((pitch + std::f64::consts::FRAC_PI_4).abs() < 1e-9);

        let mut high = Pose {
            center: DVec3::new(50.0, 0.0, 0.0),
            distance: 100.0,
            ..Default::default()
        };
        assert!(!avoid_terrain(&mut high, &settings, &geo, &ridge));
        assert_eq!(high.distance, 100.0);
    }

    #[test]
    fn nothing_below_is_a_no_op() {
        let geo = FlatSurface::square(1000.0);
        let mut pose = Pose {
            center: DVec3::new(-50.0, 0.0, 0.0),
            distance: 3.0,
            ..Default::default()
        };
        assert!(!avoid_terrain(&mut pose, &settings(), &geo, &Ridge { height: 0.0 }));
        assert_eq!(pose.distance, 3.0);
    }
}
