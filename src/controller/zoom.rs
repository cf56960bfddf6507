//! Zoom math: orthographic frustum scaling and zooming toward a point under the pointer.

use bevy_math::{DQuat, DVec3};

use super::{camera::CameraProjection, pose::Pose};

/// Per-step scale applied to an orthographic frustum.
pub const ORTHO_ZOOM_STEP: f64 = 1.0625;

/// Local frame heights at or below this are treated as behind the focal point.
const MIN_TARGET_HEIGHT: f64 = 1e-9;

/// The frustum scale for an orthographic zoom step in the direction of `dy`.
pub fn ortho_zoom_factor(dy: f64) -> f64 {
    if dy > 0.0 {
        ORTHO_ZOOM_STEP.recip()
    } else {
        ORTHO_ZOOM_STEP
    }
}

/// Scale an orthographic projection for a zoom input. Returns `false` if the projection is not
/// orthographic and the zoom should move the camera instead.
pub fn zoom_orthographic(projection: &mut CameraProjection, dy: f64) -> bool {
    projection.scale_orthographic(ortho_zoom_factor(dy))
}

/// The distance after a zoom input of `dy`, before clamping.
pub fn zoomed_distance(distance: f64, dy: f64) -> f64 {
    distance * (1.0 + dy)
}

/// On a globe, the rotation that carries the center toward `target` in proportion to how far
/// the zoom moves the camera in.
///
/// The fraction of the distance covered by the zoom is corrected for the earth's curvature by
/// the ratio of the center's radius to the target's height in the center's tangent frame.
/// Returns `None` when the center or target is degenerate.
pub fn globe_zoom_rotation(pose: &Pose, target: DVec3, new_distance: f64) -> Option<DQuat> {
    if pose.distance <= 0.0 {
        return None;
    }
    let from = pose.center.try_normalize()?;
    let to = target.try_normalize()?;

    let mut ratio = (pose.distance - new_distance) / pose.distance;
    let target_local = pose.center_rotation.inverse() * target;
    if target_local.z > MIN_TARGET_HEIGHT {
        ratio *= pose.center.length() / target_local.z;
    }

    let center_to_target = DQuat::from_rotation_arc(from, to);
    let rotation = DQuat::IDENTITY.slerp(center_to_target, ratio);
    rotation.is_finite().then_some(rotation)
}

/// On a plane, slide the eye toward `target` by the change in distance and return the new
/// focal point and distance, keeping the view direction.
///
/// The new focal point sits on the view ray at the height of the old one. Returns `None` when
/// the view ray is parallel to that height or the focal point would land behind the eye.
pub fn plane_zoom_focus(pose: &Pose, target: DVec3, new_distance: f64) -> Option<(DVec3, f64)> {
    let eye = pose.eye();
    let toward_target = (target - eye).try_normalize()?;
    let new_eye = eye + toward_target * (pose.distance - new_distance);

    let look = pose.look();
    if look.z.abs() <= f64::EPSILON {
        return None;
    }
    let focus = pose.center + pose.center_rotation * pose.offset;
    let t = (focus.z - new_eye.z) / look.z;
    (t > 0.0).then(|| (new_eye + look * t, t))
}
