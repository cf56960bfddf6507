//! Timed flights between viewpoints.
//!
//! A [`ViewpointTransition`] interpolates position, heading, pitch, range, and offset between two
//! [`ResolvedViewpoint`]s. Long flights arc up and back down, with easing curves that spend more
//! time near the ground than at altitude.

use std::f64::consts::PI;

use bevy_log::prelude::*;
use bevy_math::DVec3;
use bevy_reflect::Reflect;

use super::{
    pose::{normalize_azim_rad, rotation_from_heading_pitch, Pose},
    settings::{Settings, TransitionSettings},
};
use crate::services::GeoService;

/// Altitude differences are measured against this scale when picking easing coefficients.
const ACCEL_SCALE: f64 = 1e5;
/// Easing applied to the travelled fraction of the globe when deriving a duration.
const AUTO_DURATION_ACCEL: f64 = -4.5;
/// Below this angle two positions are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// A camera placement where any field may be left unset, to be filled from the current pose.
///
/// The focal point is cartographic (`longitude`, `latitude` in radians and height) on a globe,
/// and a world position on a plane. Angles are in radians.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct Viewpoint {
    /// Optional label.
    pub name: Option<String>,
    /// Where the camera looks.
    pub focal_point: Option<DVec3>,
    /// Clockwise from north.
    pub heading: Option<f64>,
    /// Negative when looking down.
    pub pitch: Option<f64>,
    /// Distance from the focal point to the eye.
    pub range: Option<f64>,
    /// Offset of the focal point in its tangent frame.
    pub offset: Option<DVec3>,
}

impl Viewpoint {
    /// A viewpoint looking at `focal_point`, with everything else taken from the current pose.
    pub fn at(focal_point: DVec3) -> Self {
        Self {
            focal_point: Some(focal_point),
            ..Default::default()
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the heading and pitch, in radians.
    pub fn with_heading_pitch(mut self, heading: f64, pitch: f64) -> Self {
        self.heading = Some(heading);
        self.pitch = Some(pitch);
        self
    }

    /// Set the range.
    pub fn with_range(mut self, range: f64) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the focal point offset.
    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Fill unset fields from `current` and convert the focal point to world space.
    pub fn resolve(&self, current: &ResolvedViewpoint, geo: &dyn GeoService) -> ResolvedViewpoint {
        ResolvedViewpoint {
            position: self
                .focal_point
                .map(|p| geo.to_world(p))
                .unwrap_or(current.position),
            heading: self.heading.unwrap_or(current.heading),
            pitch: self.pitch.unwrap_or(current.pitch),
            range: self.range.unwrap_or(current.range),
            offset: self.offset.unwrap_or(current.offset),
        }
    }
}

/// A fully specified viewpoint with its focal point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ResolvedViewpoint {
    /// World space focal point.
    pub position: DVec3,
    /// Radians clockwise from north.
    pub heading: f64,
    /// Radians, negative looking down.
    pub pitch: f64,
    /// Distance from the focal point to the eye.
    pub range: f64,
    /// Offset of the focal point in its tangent frame.
    pub offset: DVec3,
}

impl ResolvedViewpoint {
    /// Read a pose as a viewpoint.
    pub fn from_pose(pose: &Pose) -> Self {
        let (heading, pitch) = pose.heading_pitch();
        Self {
            position: pose.center,
            heading,
            pitch,
            range: pose.distance,
            offset: pose.offset,
        }
    }

    /// Convert to a [`Viewpoint`] with a cartographic focal point.
    pub fn to_viewpoint(&self, geo: &dyn GeoService) -> Viewpoint {
        Viewpoint {
            name: None,
            focal_point: Some(geo.to_cartographic(self.position)),
            heading: Some(self.heading),
            pitch: Some(self.pitch),
            range: Some(self.range),
            offset: Some(self.offset),
        }
    }

    /// Height of the eye above the focal point.
    fn eye_height(&self) -> f64 {
        self.range * (-self.pitch).sin()
    }

    /// Place the camera at this viewpoint. Pitch is clamped to the settings, range to the
    /// distance bounds and the offset to the offset bounds.
    pub fn apply_to(&self, pose: &mut Pose, settings: &Settings, geo: &dyn GeoService) {
        pose.set_center(self.position, geo);
        pose.set_distance(self.range, settings);
        pose.offset = settings.clamp_offset(self.offset);

        let heading = normalize_azim_rad(self.heading);
        let pitch = self.pitch.clamp(
            settings.min_pitch().to_radians(),
            settings.max_pitch().to_radians(),
        );
        pose.local_rotation = rotation_from_heading_pitch(heading, pitch);
    }
}

/// `x / (x + y - y x)`, a cheap stand-in for `x^y` on `[0, 1]`.
pub fn pow_fast(x: f64, y: f64) -> f64 {
    x / (x + y - y * x)
}

/// Ease `t` on `[0, 1]`: positive `a` starts slow, negative `a` starts fast.
pub fn accel_interp(t: f64, a: f64) -> f64 {
    if a == 0.0 {
        t
    } else if a > 0.0 {
        pow_fast(t, a)
    } else {
        1.0 - pow_fast(1.0 - t, -a)
    }
}

/// Hermite smoothstep on `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn log_coefficient(ratio: f64) -> f64 {
    if ratio > 1.0 {
        ratio.log10()
    } else {
        0.0
    }
}

/// Interpolate between two world positions on a globe, keeping the angular motion uniform and
/// blending the radius linearly.
pub fn slerp_position(from: DVec3, to: DVec3, t: f64) -> DVec3 {
    let (Some(a), Some(b)) = (from.try_normalize(), to.try_normalize()) else {
        return from.lerp(to, t);
    };
    let radius = from.length() + (to.length() - from.length()) * t;
    let angle = a.angle_between(b);
    if angle < PARALLEL_EPSILON || PI - angle < PARALLEL_EPSILON {
        return from
            .lerp(to, t)
            .try_normalize()
            .map(|dir| dir * radius)
            .unwrap_or_else(|| from.lerp(to, t));
    }
    let sin = angle.sin();
    let dir = a * (((1.0 - t) * angle).sin() / sin) + b * ((t * angle).sin() / sin);
    dir * radius
}

/// Easing coefficients for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
enum Easing {
    /// Rise to the apex then fall to the destination, easing each half separately.
    Arc { up: f64, down: f64 },
    /// Straight flight with a single easing coefficient.
    Direct { accel: f64 },
}

/// An in-flight move from one viewpoint to another.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ViewpointTransition {
    start: ResolvedViewpoint,
    end: ResolvedViewpoint,
    duration: f64,
    arc_height: f64,
    easing: Easing,
    geocentric: bool,
    start_time: Option<f64>,
}

impl ViewpointTransition {
    /// Plan a flight from `start` to `end`.
    ///
    /// With automatic durations enabled, `duration` is ignored in favor of one derived from how
    /// far around the world the flight goes.
    pub fn new(
        start: ResolvedViewpoint,
        end: ResolvedViewpoint,
        duration: f64,
        tunables: &TransitionSettings,
        geo: &dyn GeoService,
    ) -> Self {
        let de = (end.position - start.position).length();
        let h0 = start.eye_height();
        let h1 = end.eye_height();
        let dh = h1 - h0;

        let arc_height = if tunables.arc_viewpoints {
            (de - dh.abs()).max(0.0)
        } else {
            0.0
        };

        let easing = if arc_height > 0.0 {
            let apex = 2.0 * (h0 + h1) + arc_height;
            Easing::Arc {
                up: log_coefficient((apex - h0).abs() / ACCEL_SCALE),
                down: -log_coefficient((apex - h1).abs() / ACCEL_SCALE),
            }
        } else {
            let dh2 = dh / ACCEL_SCALE;
            Easing::Direct {
                accel: dh2.signum() * log_coefficient(dh2.abs()),
            }
        };

        let duration = if tunables.auto_duration {
            let semi_major = geo.semi_major_axis();
            let travelled = if semi_major > 0.0 {
                (de / semi_major).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let ratio = accel_interp(travelled, AUTO_DURATION_ACCEL);
            tunables.min_duration + ratio * (tunables.max_duration - tunables.min_duration)
        } else {
            duration.max(0.0)
        };

        debug!("Viewpoint transition over {duration:.2}s, arc height {arc_height:.1}");
        Self {
            start,
            end,
            duration,
            arc_height,
            easing,
            geocentric: geo.is_geocentric(),
            start_time: None,
        }
    }

    /// Where the flight started.
    pub fn start(&self) -> &ResolvedViewpoint {
        &self.start
    }

    /// Where the flight ends.
    pub fn end(&self) -> &ResolvedViewpoint {
        &self.end
    }

    /// Replace the destination, used when following a moving target.
    pub fn set_end(&mut self, end: ResolvedViewpoint) {
        self.end = end;
    }

    /// Seconds the flight takes.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Extra range added at the middle of the flight.
    pub fn arc_height(&self) -> f64 {
        self.arc_height
    }

    /// Eased progress in `[0, 1]` at `now`. The first call fixes the start time.
    pub fn progress(&mut self, now: f64) -> f64 {
        let start_time = *self.start_time.get_or_insert(now);
        let t = if self.duration > 0.0 {
            ((now - start_time) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.ease(t)
    }

    /// Map linear time to eased progress.
    pub fn ease(&self, t: f64) -> f64 {
        if t >= 1.0 {
            return 1.0;
        }
        match self.easing {
            Easing::Arc { up, down } => {
                let tp = if t <= 0.5 {
                    0.5 * accel_interp(2.0 * t, up)
                } else {
                    0.5 + 0.5 * accel_interp(2.0 * (t - 0.5), down)
                };
                smoothstep(smoothstep(tp))
            }
            Easing::Direct { accel } => {
                if t > 0.0 {
                    smoothstep(accel_interp(t, accel))
                } else {
                    t
                }
            }
        }
    }

    /// The viewpoint at eased progress `tp`.
    pub fn sample(&self, tp: f64) -> ResolvedViewpoint {
        let (start, end) = (&self.start, &self.end);
        let position = if self.geocentric {
            slerp_position(start.position, end.position, tp)
        } else {
            start.position.lerp(end.position, tp)
        };
        ResolvedViewpoint {
            position,
            heading: start.heading + normalize_azim_rad(end.heading - start.heading) * tp,
            pitch: start.pitch + (end.pitch - start.pitch) * tp,
            range: start.range + (end.range - start.range) * tp + (PI * tp).sin() * self.arc_height,
            offset: start.offset.lerp(end.offset, tp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Ellipsoid, FlatSurface};

    fn viewpoint(position: DVec3, heading: f64, range: f64) -> ResolvedViewpoint {
        ResolvedViewpoint {
            position,
            heading,
            pitch: -0.8,
            range,
            offset: DVec3::ZERO,
        }
    }

    #[test]
    fn easing_helpers() {
        assert_eq!(accel_interp(0.3, 0.0), 0.3);
        assert_eq!(pow_fast(1.0, 3.0), 1.0);
        assert_eq!(pow_fast(0.0, 3.0), 0.0);
        assert!(accel_interp(0.5, 2.0) < 0.5);
        assert!(accel_interp(0.5, -2.0) > 0.5);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(log_coefficient(0.5), 0.0);
        assert_eq!(log_coefficient(1000.0), 3.0);
    }

    #[test]
    fn progress_is_monotone_and_ends_at_one() {
        let wgs84 = Ellipsoid::WGS84;
        let a = viewpoint(wgs84.to_world(DVec3::new(0.0, 0.0, 0.0)), 0.0, 1e4);
        let b = viewpoint(wgs84.to_world(DVec3::new(1.0, 0.5, 0.0)), 2.0, 5e6);
        for arc in [true, false] {
            let tunables = TransitionSettings {
                arc_viewpoints: arc,
                ..Default::default()
            };
            let mut transition = ViewpointTransition::new(a, b, 4.0, &tunables, &wgs84);
            assert_eq!(transition.progress(10.0), 0.0);
            let mut last = 0.0;
            for i in 1..=200 {
                let tp = transition.progress(10.0 + i as f64 * 0.02);
                assert!(tp >= last - 1e-12, "arc {arc}: {tp} < {last}");
                assert!((0.0..=1.0).contains(&tp));
                last = tp;
            }
            assert_eq!(transition.progress(14.0), 1.0);
            assert_eq!(transition.progress(100.0), 1.0);
        }
    }

    #[test]
    fn endpoints_match_start_and_end() {
        let wgs84 = Ellipsoid::WGS84;
        let a = viewpoint(wgs84.to_world(DVec3::new(0.2, 0.1, 0.0)), 3.0, 2e4);
        let b = viewpoint(wgs84.to_world(DVec3::new(-1.0, 0.7, 500.0)), -3.0, 8e5);
        let transition = ViewpointTransition::new(a, b, 2.0, &Default::default(), &wgs84);
        assert!(transition.arc_height() > 0.0);

        let first = transition.sample(0.0);
        assert!(first.position.abs_diff_eq(a.position, 1e-6));
        assert_eq!(first.range, a.range);
        assert_eq!(first.heading, a.heading);

        let last = transition.sample(1.0);
        assert!(last.position.abs_diff_eq(b.position, 1e-6));
        assert!((last.range - b.range).abs() < 1e-6);
        // Shortest way around: 3.0 to -3.0 crosses PI.
        assert!((normalize_azim_rad(last.heading) - b.heading).abs() < 1e-9);
        assert!(transition.sample(0.5).heading.abs() > 3.0);
    }

    #[test]
    fn arc_lifts_the_middle_of_the_flight() {
        let flat = FlatSurface::square(1e7);
        let a = viewpoint(DVec3::ZERO, 0.0, 1000.0);
        let b = viewpoint(DVec3::new(5e5, 0.0, 0.0), 0.0, 1000.0);
        let transition = ViewpointTransition::new(a, b, 2.0, &Default::default(), &flat);
        assert_eq!(transition.arc_height(), 5e5);
        assert!((transition.sample(0.5).range - (1000.0 + 5e5)).abs() < 1e-6);

        let tunables = TransitionSettings {
            arc_viewpoints: false,
            ..Default::default()
        };
        let flat_flight = ViewpointTransition::new(a, b, 2.0, &tunables, &flat);
        assert_eq!(flat_flight.arc_height(), 0.0);
        assert_eq!(flat_flight.sample(0.5).range, 1000.0);
        assert_eq!(flat_flight.sample(0.5).position, DVec3::new(2.5e5, 0.0, 0.0));
    }

    #[test]
    fn auto_duration_grows_with_distance() {
        let wgs84 = Ellipsoid::WGS84;
        let tunables = TransitionSettings {
            auto_duration: true,
            ..Default::default()
        };
        let a = viewpoint(wgs84.to_world(DVec3::ZERO), 0.0, 1e4);
        let near = viewpoint(wgs84.to_world(DVec3::new(0.001, 0.0, 0.0)), 0.0, 1e4);
        let far = viewpoint(wgs84.to_world(DVec3::new(3.0, 0.0, 0.0)), 0.0, 1e4);
        let short = ViewpointTransition::new(a, near, 100.0, &tunables, &wgs84).duration();
        let long = ViewpointTransition::new(a, far, 100.0, &tunables, &wgs84).duration();
        assert!(short >= 3.0 && short < long && long <= 8.0, "{short} {long}");
        assert_eq!(
            ViewpointTransition::new(a, a, 0.0, &tunables, &wgs84).duration(),
            3.0
        );
    }

    #[test]
    fn slerp_keeps_radius_on_sphere() {
        let from = DVec3::new(10.0, 0.0, 0.0);
        let to = DVec3::new(0.0, 10.0, 0.0);
        let mid = slerp_position(from, to, 0.5);
        assert!((mid.length() - 10.0).abs() < 1e-12);
        assert!((mid.x - mid.y).abs() < 1e-12);
        let same = slerp_position(from, from, 0.3);
        assert!(same.abs_diff_eq(from, 1e-12));
    }

    #[test]
    fn resolve_fills_missing_fields() {
        let flat = FlatSurface::square(100.0);
        let current = viewpoint(DVec3::new(1.0, 2.0, 0.0), 0.5, 30.0);
        let resolved = Viewpoint::default().with_range(12.0).resolve(&current, &flat);
        assert_eq!(resolved.position, current.position);
        assert_eq!(resolved.heading, 0.5);
        assert_eq!(resolved.range, 12.0);

        let round = current.to_viewpoint(&flat).resolve(&resolved, &flat);
        assert_eq!(round, current);
    }

    #[test]
    fn applied_offsets_respect_the_offset_bounds() {
        let flat = FlatSurface::square(100.0);
        let shifted = ResolvedViewpoint {
            offset: DVec3::new(8.0, -8.0, 1.0),
            ..viewpoint(DVec3::new(1.0, 2.0, 0.0), 0.0, 30.0)
        };

        let mut pose = Pose::default();
        let mut settings = Settings::default();
        shifted.apply_to(&mut pose, &settings, &flat);
        assert_eq!(pose.offset, DVec3::new(0.0, 0.0, 1.0));

        settings.set_max_offset(5.0, 10.0);
        shifted.apply_to(&mut pose, &settings, &flat);
        assert_eq!(pose.offset, DVec3::new(5.0, -8.0, 1.0));
        assert_eq!(ResolvedViewpoint::from_pose(&pose).offset, pose.offset);
    }
}
