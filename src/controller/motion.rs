//! Pose mutations driven by input: pan, rotate, zoom, and recentering on the surface.
//!
//! Every motion is a method on [`Pose`] that takes the [`Settings`] to clamp against and the
//! services it needs. Degenerate geometry leaves the pose untouched.

use bevy_log::prelude::*;
use bevy_math::{DQuat, DVec2, DVec3};

use super::{
    camera::{CameraProjection, RenderCamera},
    pose::{heading_pitch, Pose},
    settings::Settings,
    zoom,
};
use crate::services::{closest_intersection, rotation_only, GeoService, IntersectionService};

/// Pan speed as a fraction of the distance per unit of input.
const PAN_SCALE: f64 = 0.3;
/// Pitch never rises above this, in degrees, even if the settings allow it.
const ROTATE_PITCH_CEILING: f64 = -0.1;
/// Fraction of the distance searched past the focal point when recentering.
const RECENTER_REACH: f64 = 1.5;
/// Length of rays cast at the surface when the scene has no hit.
const FAR_RAY: f64 = 1e10;

/// Orientation of the surface tangent frame at `point`.
pub fn center_rotation(geo: &dyn GeoService, point: DVec3) -> DQuat {
    DQuat::from_mat4(&rotation_only(geo.local_to_world(point))).normalize()
}

/// `point` moved to the cartographic height of `reference`.
pub fn adjust_to_same_height(geo: &dyn GeoService, reference: DVec3, point: DVec3) -> DVec3 {
    let height = geo.to_cartographic(reference).z;
    let mut carto = geo.to_cartographic(point);
    carto.z = height;
    geo.to_world(carto)
}

/// The default pose center and distance for a surface.
///
/// Globes look at the prime meridian on the equator from three and a half radii up. Planes look
/// at the middle of their bounds from three and a half times their half-width.
pub fn home_center_distance(geo: &dyn GeoService) -> (DVec3, f64) {
    if geo.is_geocentric() {
        let radius = geo.semi_major_axis();
        (DVec3::new(radius, 0.0, 0.0), radius * 3.5)
    } else {
        let (min, max) = geo.bounds();
        let radius = (max.x - min.x) * 0.5;
        let middle = (min + max) * 0.5;
        (DVec3::new(middle.x, middle.y, 0.0), radius * 3.5)
    }
}

/// The world point under a pointer position: the closest scene hit, else the surface.
pub fn pick_world_point(
    camera: &RenderCamera,
    position: DVec2,
    geo: &dyn GeoService,
    scene: Option<&dyn IntersectionService>,
) -> Option<DVec3> {
    let (origin, direction) = camera.pick_ray(position)?;
    let end = origin + direction * FAR_RAY;
    scene
        .and_then(|scene| closest_intersection(scene, origin, end))
        .or_else(|| geo.intersect_geocentric_line(origin, end))
}

impl Pose {
    /// Move the center, re-deriving the tangent frame from the surface.
    pub fn set_center(&mut self, center: DVec3, geo: &dyn GeoService) {
        self.center = center;
        self.center_rotation = center_rotation(geo, center);
    }

    /// Set the distance, clamped to the configured bounds.
    pub fn set_distance(&mut self, distance: f64, settings: &Settings) {
        self.distance = settings.clamp_distance(distance);
    }

    /// Slide the center across the surface in screen-aligned directions.
    ///
    /// The screen vertical is projected onto the tangent plane so panning up moves away from the
    /// camera rather than into the ground. On a globe the center keeps its height.
    pub fn pan(&mut self, dx: f64, dy: f64, geo: &dyn GeoService) {
        let world_from_view = self.world_from_view();
        let Some(x_axis) = world_from_view.x_axis.truncate().try_normalize() else {
            return;
        };
        let center_up = self.center_rotation * DVec3::Z;
        let Some(y_axis) = center_up.cross(x_axis).try_normalize() else {
            return;
        };

        let offset = (x_axis * dx + y_axis * dy) * (-PAN_SCALE * self.distance);
        let mut new_center = self.center + offset;
        if geo.is_geocentric() {
            new_center = adjust_to_same_height(geo, self.center, new_center);
        }
        if new_center.is_finite() {
            self.set_center(new_center, geo);
        }
    }

    /// Turn the camera: `dx` radians of heading about the local up and `dy` radians of pitch
    /// about the camera's side axis.
    ///
    /// A pitch change that would leave `[min_pitch, max(max_pitch, -0.1)]` is dropped whole,
    /// while the heading change still applies.
    pub fn rotate(&mut self, dx: f64, dy: f64, settings: &Settings) {
        let (_, old_pitch) = heading_pitch(self.local_rotation);
        let min_pitch = settings.min_pitch().to_radians();
        let max_pitch = settings.max_pitch().max(ROTATE_PITCH_CEILING).to_radians();
        let dy = if (min_pitch..=max_pitch).contains(&(old_pitch + dy)) {
            dy
        } else {
            0.0
        };

        let side = (self.local_rotation * DVec3::X).normalize();
        let azim = DQuat::from_axis_angle(DVec3::Z, -dx);
        let elev = DQuat::from_axis_angle(side, dy);
        let rotation = (azim * elev * self.local_rotation).normalize();
        if rotation.is_finite() {
            self.local_rotation = rotation;
        }
    }

    /// Move toward (`dy < 0`) or away from (`dy > 0`) the focal point.
    ///
    /// Orthographic projections are scaled instead. With zoom-to-mouse enabled and a `target`
    /// under the pointer, the camera also drifts toward the target.
    pub fn zoom(
        &mut self,
        dy: f64,
        projection: &mut CameraProjection,
        target: Option<DVec3>,
        settings: &Settings,
        geo: &dyn GeoService,
    ) {
        if zoom::zoom_orthographic(projection, dy) {
            return;
        }

        let new_distance = zoom::zoomed_distance(self.distance, dy);
        let target = target.filter(|_| settings.zoom_to_mouse());
        let Some(target) = target else {
            self.set_distance(new_distance, settings);
            return;
        };

        if geo.is_geocentric() {
            if let Some(rotation) = zoom::globe_zoom_rotation(self, target, new_distance) {
                self.set_center(rotation * self.center, geo);
            }
            self.set_distance(new_distance, settings);
        } else {
            let new_distance = settings.clamp_distance(new_distance);
            match zoom::plane_zoom_focus(self, target, new_distance) {
                Some((focus, distance)) => {
                    let center = focus - self.center_rotation * self.offset;
                    self.set_center(center, geo);
                    self.set_distance(distance, settings);
                }
                None => self.set_distance(new_distance, settings),
            }
        }
    }

    /// Re-anchor the center where the view ray meets the scene or the surface. The distance is
    /// left as it was, so the eye moves with the center. Returns `false` if the ray meets nothing.
    pub fn recalculate_center_from_look_vector(
        &mut self,
        geo: &dyn GeoService,
        scene: Option<&dyn IntersectionService>,
    ) -> bool {
        let eye = self.eye();
        let look = self.look();

        let scene_hit = scene.and_then(|scene| {
            closest_intersection(scene, eye, eye + look * self.distance * RECENTER_REACH)
        });
        let hit = match scene_hit {
            Some(hit) => hit,
            None if geo.is_geocentric() => {
                match geo.intersect_geocentric_line(eye, eye + look * FAR_RAY) {
                    Some(hit) => hit,
                    None => return false,
                }
            }
            None => {
                if look.z.abs() <= f64::EPSILON {
                    return false;
                }
                let t = -eye.z / look.z;
                if t < 0.0 {
                    return false;
                }
                eye + look * t
            }
        };

        let new_center = if geo.is_geocentric() {
            match self.center.try_normalize() {
                Some(dir) => dir * hit.length(),
                None => hit,
            }
        } else {
            hit
        };
        trace!("Recentered on {new_center:?}");
        self.set_center(new_center, geo);
        true
    }
}
