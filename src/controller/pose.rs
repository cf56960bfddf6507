//! The camera pose relative to the surface, and the angle conventions used to read and write it.
//!
//! A pose is expressed in the local tangent frame at its center: X east, Y north, Z up. The
//! camera looks along its local -Z with +Y up, so an identity [`Pose::local_rotation`] looks
//! straight down with north at the top of the screen.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use bevy_math::{DMat4, DQuat, DVec3};
use bevy_reflect::Reflect;

/// Where the camera is and how it is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Pose {
    /// The focal point on (or near) the surface.
    pub center: DVec3,
    /// Orientation of the local tangent frame at `center`.
    pub center_rotation: DQuat,
    /// Heading and pitch on top of the tangent frame.
    pub local_rotation: DQuat,
    /// Distance from the focal point to the eye.
    pub distance: f64,
    /// Offset of the focal point from `center`, in the tangent frame.
    pub offset: DVec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            center_rotation: DQuat::IDENTITY,
            local_rotation: DQuat::IDENTITY,
            distance: 1.0,
            offset: DVec3::ZERO,
        }
    }
}

impl Pose {
    /// The camera-to-world transform:
    /// `translate(center) * center_rotation * translate(offset) * local_rotation * translate(0, 0, distance)`.
    pub fn world_from_view(&self) -> DMat4 {
        DMat4::from_translation(self.center)
            * DMat4::from_quat(self.center_rotation)
            * DMat4::from_translation(self.offset)
            * DMat4::from_quat(self.local_rotation)
            * DMat4::from_translation(DVec3::new(0.0, 0.0, self.distance))
    }

    /// The eye position in world space.
    pub fn eye(&self) -> DVec3 {
        self.world_from_view().w_axis.truncate()
    }

    /// The viewing direction in world space.
    pub fn look(&self) -> DVec3 {
        self.center_rotation * (self.local_rotation * DVec3::NEG_Z)
    }

    /// Heading and pitch of the local rotation, in radians.
    pub fn heading_pitch(&self) -> (f64, f64) {
        heading_pitch(self.local_rotation)
    }
}

/// Decompose a local rotation into heading (clockwise from north) and pitch (negative looking
/// down), both in radians.
///
/// Near the poles of the view sphere the look vector no longer carries a heading, so it is
/// read from the camera up vector instead.
pub fn heading_pitch(rotation: DQuat) -> (f64, f64) {
    let look = rotation * DVec3::NEG_Z;
    let up = rotation * DVec3::Y;
    let pitch = look.z.clamp(-1.0, 1.0).asin();
    let heading = if look.z < -0.9 {
        up.x.atan2(up.y)
    } else if look.z > 0.9 {
        (-up.x).atan2(-up.y)
    } else {
        look.x.atan2(look.y)
    };
    (normalize_azim_rad(heading), pitch)
}

/// The local rotation for a heading and pitch, in radians.
pub fn rotation_from_heading_pitch(heading: f64, pitch: f64) -> DQuat {
    let azim = DQuat::from_axis_angle(DVec3::Z, -heading);
    let elev = DQuat::from_axis_angle(DVec3::X, pitch + FRAC_PI_2);
    (azim * elev).normalize()
}

/// Wrap an azimuth into `(-PI, PI]`.
pub fn normalize_azim_rad(mut azim: f64) -> f64 {
    if azim.abs() > TAU {
        azim %= TAU;
    }
    if azim <= -PI {
        azim += TAU;
    }
    if azim > PI {
        azim -= TAU;
    }
    azim
}
