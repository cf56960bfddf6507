//! The render camera the controller drives: a view transform, a projection, and the screen
//! rectangle it renders into.

use bevy_math::{DMat4, DVec2, DVec3};
use bevy_reflect::Reflect;

/// The projection of a [`RenderCamera`].
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum CameraProjection {
    /// A symmetric perspective frustum. `far` may be infinite.
    Perspective {
        /// Vertical field of view, in radians.
        fov_y: f64,
        /// Width over height.
        aspect: f64,
        /// Near plane distance.
        near: f64,
        /// Far plane distance.
        far: f64,
    },
    /// An axis-aligned orthographic box in view space.
    Orthographic {
        /// Left plane.
        left: f64,
        /// Right plane.
        right: f64,
        /// Bottom plane.
        bottom: f64,
        /// Top plane.
        top: f64,
        /// Near plane distance.
        near: f64,
        /// Far plane distance.
        far: f64,
    },
    /// A perspective frustum whose clip planes are fit to the ellipsoid horizon by the
    /// renderer. For navigation it behaves like [`CameraProjection::Perspective`].
    EllipsoidPerspective {
        /// Vertical field of view, in radians.
        fov_y: f64,
        /// Width over height.
        aspect: f64,
        /// Near plane distance.
        near: f64,
        /// Far plane distance.
        far: f64,
    },
}

impl Default for CameraProjection {
    fn default() -> Self {
        Self::Perspective {
            fov_y: std::f64::consts::FRAC_PI_4,
            aspect: 1.0,
            near: 1.0,
            far: f64::INFINITY,
        }
    }
}

impl CameraProjection {
    /// Is this an orthographic projection?
    pub fn is_orthographic(&self) -> bool {
        matches!(self, CameraProjection::Orthographic { .. })
    }

    /// The view-to-clip matrix, with a `[0, 1]` depth range.
    pub fn clip_from_view(&self) -> DMat4 {
        match *self {
            CameraProjection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            }
            | CameraProjection::EllipsoidPerspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                if far.is_finite() {
                    DMat4::perspective_rh(fov_y, aspect, near, far)
                } else {
                    DMat4::perspective_infinite_rh(fov_y, aspect, near)
                }
            }
            CameraProjection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => DMat4::orthographic_rh(left, right, bottom, top, near, far),
        }
    }

    /// An orthographic projection whose extent matches this perspective frustum at `distance`
    /// in front of the eye. `None` if this is already orthographic.
    pub fn to_orthographic(&self, distance: f64) -> Option<CameraProjection> {
        match *self {
            CameraProjection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            }
            | CameraProjection::EllipsoidPerspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                let half_height = distance * (fov_y * 0.5).tan();
                let half_width = half_height * aspect;
                let far = if far.is_finite() {
                    far
                } else {
                    distance * 100.0
                };
                Some(CameraProjection::Orthographic {
                    left: -half_width,
                    right: half_width,
                    bottom: -half_height,
                    top: half_height,
                    near,
                    far,
                })
            }
            CameraProjection::Orthographic { .. } => None,
        }
    }

    /// Multiply the horizontal and vertical extent of an orthographic projection. Returns
    /// `false` for perspective projections.
    pub fn scale_orthographic(&mut self, factor: f64) -> bool {
        match self {
            CameraProjection::Orthographic {
                left,
                right,
                bottom,
                top,
                ..
            } => {
                *left *= factor;
                *right *= factor;
                *bottom *= factor;
                *top *= factor;
                true
            }
            _ => false,
        }
    }
}

/// The screen rectangle a camera renders into, in logical pixels with the origin at the top
/// left.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Viewport {
    /// Top left corner.
    pub offset: DVec2,
    /// Width and height.
    pub extent: DVec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: DVec2::ZERO,
            extent: DVec2::new(1280.0, 720.0),
        }
    }
}

impl Viewport {
    /// Width over height, or `1.0` for an empty viewport.
    pub fn aspect(&self) -> f64 {
        if self.extent.y > 0.0 {
            self.extent.x / self.extent.y
        } else {
            1.0
        }
    }

    /// Is the pixel position inside the viewport?
    pub fn contains(&self, position: DVec2) -> bool {
        let local = position - self.offset;
        local.cmpge(DVec2::ZERO).all() && local.cmplt(self.extent).all()
    }

    /// Device-normalized coordinates used for navigation deltas: `x` spans
    /// `[-aspect, aspect]` and `y` spans `[-1, 1]`, growing downward like pixels.
    pub fn ndc(&self, position: DVec2) -> DVec2 {
        let extent = self.extent.max(DVec2::ONE);
        let unit = (position - self.offset) / extent * 2.0 - DVec2::ONE;
        DVec2::new(unit.x * self.aspect(), unit.y)
    }

    /// Clip space coordinates of a pixel position, `[-1, 1]` on both axes with `y` up.
    pub fn clip(&self, position: DVec2) -> DVec2 {
        let extent = self.extent.max(DVec2::ONE);
        let unit = (position - self.offset) / extent * 2.0 - DVec2::ONE;
        DVec2::new(unit.x, -unit.y)
    }
}

/// The camera being navigated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct RenderCamera {
    /// Camera-to-world transform. Rewritten by the controller every frame.
    pub world_from_view: DMat4,
    /// Projection from view space to clip space.
    pub projection: CameraProjection,
    /// The render area, used to normalize pointer positions.
    pub viewport: Viewport,
}

impl RenderCamera {
    /// Create a new render camera with an identity view transform.
    pub fn new(projection: CameraProjection, viewport: Viewport) -> Self {
        Self {
            world_from_view: DMat4::IDENTITY,
            projection,
            viewport,
        }
    }

    /// The eye position in world space.
    pub fn eye(&self) -> DVec3 {
        self.world_from_view.w_axis.truncate()
    }

    /// A world space ray through the pixel at `position`, as an origin on the near plane and a
    /// unit direction. `None` when the projection cannot be inverted.
    pub fn pick_ray(&self, position: DVec2) -> Option<(DVec3, DVec3)> {
        let clip_from_view = self.projection.clip_from_view();
        if clip_from_view.determinant().abs() <= f64::EPSILON * f64::EPSILON {
            return None;
        }
        let view_from_clip = clip_from_view.inverse();
        let clip = self.viewport.clip(position);

        let near = view_from_clip.project_point3(clip.extend(0.0));
        let mid = view_from_clip.project_point3(clip.extend(0.5));
        let origin = self.world_from_view.transform_point3(near);
        let direction = self
            .world_from_view
            .transform_vector3(mid - near)
            .try_normalize()?;
        origin.is_finite().then_some((origin, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_is_aspect_scaled_and_y_down() {
        let viewport = Viewport {
            offset: DVec2::new(10.0, 20.0),
            extent: DVec2::new(200.0, 100.0),
        };
        assert_eq!(viewport.ndc(DVec2::new(10.0, 20.0)), DVec2::new(-2.0, -1.0));
        assert_eq!(viewport.ndc(DVec2::new(110.0, 70.0)), DVec2::ZERO);
        assert_eq!(viewport.ndc(DVec2::new(210.0, 120.0)), DVec2::new(2.0, 1.0));
        assert_eq!(viewport.clip(DVec2::new(210.0, 120.0)), DVec2::new(1.0, -1.0));
        assert!(viewport.contains(DVec2::new(15.0, 25.0)));
        assert!(!viewport.contains(DVec2::new(5.0, 25.0)));
    }

    #[test]
    fn center_ray_looks_down_negative_z() {
        let mut camera = RenderCamera::new(CameraProjection::default(), Viewport::default());
        camera.world_from_view = DMat4::from_translation(DVec3::new(0.0, 0.0, 10.0));
        let (origin, direction) = camera.pick_ray(DVec2::new(640.0, 360.0)).unwrap();
        assert!(direction.abs_diff_eq(DVec3::NEG_Z, 1e-9));
        assert!((origin.truncate()).length() < 1e-9);
        assert!(origin.z < 10.0);
    }

    #[test]
    fn orthographic_matches_frustum_at_distance() {
        let perspective = CameraProjection::Perspective {
            fov_y: std::f64::consts::FRAC_PI_2,
            aspect: 2.0,
            near: 0.1,
            far: 1000.0,
        };
        let Some(CameraProjection::Orthographic {
            left, top, far, ..
        }) = perspective.to_orthographic(10.0)
        else {
            panic!("expected orthographic");
        };
        assert!((top - 10.0).abs() < 1e-9);
        assert!((left + 20.0).abs() < 1e-9);
        assert_eq!(far, 1000.0);

        let mut ortho = perspective.to_orthographic(10.0).unwrap();
        assert!(ortho.to_orthographic(10.0).is_none());
        assert!(ortho.scale_orthographic(0.5));
        let mut persp = perspective;
        assert!(!persp.scale_orthographic(0.5));
    }
}
