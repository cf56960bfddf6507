//! Capability interfaces the controller queries about the world it navigates, plus reference
//! implementations for a WGS84-style [`Ellipsoid`] and a [`FlatSurface`].
//!
//! The controller never owns the scene or the geospatial model. It asks these traits for local
//! tangent frames, cartographic conversions, and line intersections, and treats every miss as a
//! normal branch rather than an error.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_math::{DMat4, DVec3, DVec4};
use bevy_reflect::Reflect;

/// Coordinate services for the surface the camera moves over.
///
/// Cartographic coordinates are `(longitude, latitude, height)` with angles in radians for
/// geocentric surfaces. Planar surfaces use their world coordinates directly.
pub trait GeoService: Send + Sync {
    /// The local tangent frame at `point`: X east, Y north, Z up, translated to `point`.
    fn local_to_world(&self, point: DVec3) -> DMat4;
    /// Is the world a round (ellipsoidal, earth-centered) one?
    fn is_geocentric(&self) -> bool;
    /// Equatorial radius, or the nominal half-extent of a planar world.
    fn semi_major_axis(&self) -> f64;
    /// Minimum and maximum corners of the world extent.
    fn bounds(&self) -> (DVec3, DVec3);
    /// Convert a world position to cartographic coordinates.
    fn to_cartographic(&self, world: DVec3) -> DVec3;
    /// Convert cartographic coordinates back to a world position.
    fn to_world(&self, cartographic: DVec3) -> DVec3;
    /// Intersect the segment `start..end` with the reference surface, returning the hit
    /// closest to `start`.
    fn intersect_geocentric_line(&self, start: DVec3, end: DVec3) -> Option<DVec3>;
}

/// A single hit reported by an [`IntersectionService`].
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Intersection {
    /// Position of the hit along the queried segment, `0.0` at the start and `1.0` at the end.
    pub ratio: f64,
    /// World space position of the hit.
    pub point: DVec3,
}

/// Line segment queries against the rendered scene (terrain, models).
pub trait IntersectionService: Send + Sync {
    /// All hits along `start..end`, in no particular order.
    fn intersect_segment(&self, start: DVec3, end: DVec3) -> Vec<Intersection>;
}

/// The hit closest to `start`, if the service reports any.
pub fn closest_intersection(
    scene: &dyn IntersectionService,
    start: DVec3,
    end: DVec3,
) -> Option<DVec3> {
    scene
        .intersect_segment(start, end)
        .into_iter()
        .filter(|hit| hit.ratio.is_finite())
        .min_by(|a, b| a.ratio.total_cmp(&b.ratio))
        .map(|hit| hit.point)
}

/// The services every [`GeoCam`](crate::controller::component::GeoCam) in the world navigates
/// with. Defaults to a WGS84 [`Ellipsoid`] and no scene intersections.
#[derive(Resource, Clone)]
pub struct GeoServices {
    /// Coordinate services for the surface.
    pub geo: Arc<dyn GeoService>,
    /// Scene intersections, used for picking, zoom-to-mouse, and terrain avoidance.
    pub scene: Option<Arc<dyn IntersectionService>>,
}

impl Default for GeoServices {
    fn default() -> Self {
        Self {
            geo: Arc::new(Ellipsoid::WGS84),
            scene: None,
        }
    }
}

impl GeoServices {
    /// Navigate `geo` without scene intersections.
    pub fn new(geo: impl GeoService + 'static) -> Self {
        Self {
            geo: Arc::new(geo),
            scene: None,
        }
    }

    /// Add scene intersections.
    pub fn with_scene(mut self, scene: impl IntersectionService + 'static) -> Self {
        self.scene = Some(Arc::new(scene));
        self
    }
}

/// Orientation part of a local frame, with the translation column zeroed.
pub fn rotation_only(frame: DMat4) -> DMat4 {
    DMat4::from_cols(frame.x_axis, frame.y_axis, frame.z_axis, DVec4::W)
}

/// An oblate spheroid centered at the world origin with its polar axis along Z.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Ellipsoid {
    /// Equatorial radius.
    pub semi_major: f64,
    /// Polar radius.
    pub semi_minor: f64,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Ellipsoid {
    /// The WGS84 reference ellipsoid, in meters.
    pub const WGS84: Self = Self {
        semi_major: 6_378_137.0,
        semi_minor: 6_356_752.314_245_179,
    };

    /// A perfect sphere, handy when exact round numbers matter more than realism.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            semi_minor: radius,
        }
    }

    /// First eccentricity squared.
    fn e2(&self) -> f64 {
        let a2 = self.semi_major * self.semi_major;
        (a2 - self.semi_minor * self.semi_minor) / a2
    }

    /// Radius of curvature in the prime vertical.
    fn prime_vertical_radius(&self, sin_lat: f64) -> f64 {
        self.semi_major / (1.0 - self.e2() * sin_lat * sin_lat).sqrt()
    }
}

impl GeoService for Ellipsoid {
    fn local_to_world(&self, point: DVec3) -> DMat4 {
        let carto = self.to_cartographic(point);
        let (sin_lon, cos_lon) = carto.x.sin_cos();
        let (sin_lat, cos_lat) = carto.y.sin_cos();

        let east = DVec3::new(-sin_lon, cos_lon, 0.0);
        let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        DMat4::from_cols(
            east.extend(0.0),
            north.extend(0.0),
            up.extend(0.0),
            point.extend(1.0),
        )
    }

    fn is_geocentric(&self) -> bool {
        true
    }

    fn semi_major_axis(&self) -> f64 {
        self.semi_major
    }

    fn bounds(&self) -> (DVec3, DVec3) {
        let extent = DVec3::new(self.semi_major, self.semi_major, self.semi_minor);
        (-extent, extent)
    }

    fn to_cartographic(&self, world: DVec3) -> DVec3 {
        let e2 = self.e2();
        let p = world.truncate().length();
        let lon = world.y.atan2(world.x);

        // Fixed-point iteration on geodetic latitude; converges to double precision well
        // within the iteration budget for any point outside the core.
        let mut lat = world.z.atan2(p * (1.0 - e2));
        for _ in 0..8 {
            let n = self.prime_vertical_radius(lat.sin());
            lat = (world.z + e2 * n * lat.sin()).atan2(p);
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let height = p * cos_lat + world.z * sin_lat
            - self.semi_major * (1.0 - e2 * sin_lat * sin_lat).sqrt();
        DVec3::new(lon, lat, height)
    }

    fn to_world(&self, cartographic: DVec3) -> DVec3 {
        let (sin_lon, cos_lon) = cartographic.x.sin_cos();
        let (sin_lat, cos_lat) = cartographic.y.sin_cos();
        let n = self.prime_vertical_radius(sin_lat);
        let h = cartographic.z;
        DVec3::new(
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - self.e2()) + h) * sin_lat,
        )
    }

    fn intersect_geocentric_line(&self, start: DVec3, end: DVec3) -> Option<DVec3> {
        // Scale the problem into unit-sphere space and solve the quadratic there.
        let scale = DVec3::new(
            self.semi_major.recip(),
            self.semi_major.recip(),
            self.semi_minor.recip(),
        );
        let origin = start * scale;
        let dir = (end - start) * scale;

        let a = dir.length_squared();
        if a <= f64::EPSILON {
            return None;
        }
        let b = 2.0 * origin.dot(dir);
        let c = origin.length_squared() - 1.0;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);
        let t = [t0, t1]
            .into_iter()
            .find(|t| (0.0..=1.0).contains(t))?;
        Some(start + (end - start) * t)
    }
}

/// A flat world: the `z = 0` plane bounded by an axis-aligned extent.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FlatSurface {
    /// Minimum corner of the mapped extent.
    pub min: DVec3,
    /// Maximum corner of the mapped extent.
    pub max: DVec3,
}

impl FlatSurface {
    /// A square map of the given half-width centered at the origin.
    pub fn square(half_width: f64) -> Self {
        Self {
            min: DVec3::new(-half_width, -half_width, 0.0),
            max: DVec3::new(half_width, half_width, 0.0),
        }
    }
}

impl GeoService for FlatSurface {
    fn local_to_world(&self, point: DVec3) -> DMat4 {
        DMat4::from_translation(point)
    }

    fn is_geocentric(&self) -> bool {
        false
    }

    fn semi_major_axis(&self) -> f64 {
        (self.max.x - self.min.x) * 0.5
    }

    fn bounds(&self) -> (DVec3, DVec3) {
        (self.min, self.max)
    }

    fn to_cartographic(&self, world: DVec3) -> DVec3 {
        world
    }

    fn to_world(&self, cartographic: DVec3) -> DVec3 {
        cartographic
    }

    fn intersect_geocentric_line(&self, start: DVec3, end: DVec3) -> Option<DVec3> {
        let dz = end.z - start.z;
        if dz.abs() <= f64::EPSILON {
            return None;
        }
        let t = -start.z / dz;
        (0.0..=1.0)
            .contains(&t)
            .then(|| start + (end - start) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartographic_round_trip() {
        let wgs84 = Ellipsoid::WGS84;
        for (lon, lat, h) in [
            (0.0, 0.0, 0.0),
            (1.2, 0.7, 1500.0),
            (-2.9, -1.4, 25_000.0),
            (0.3, 1.5707, 10.0),
        ] {
            let world = wgs84.to_world(DVec3::new(lon, lat, h));
            let back = wgs84.to_cartographic(world);
            assert!((back.x - lon).abs() < 1e-9, "lon {back:?}");
            assert!((back.y - lat).abs() < 1e-9, "lat {back:?}");
            assert!((back.z - h).abs() < 1e-4, "height {back:?}");
        }
    }

    #[test]
    fn tangent_frame_at_prime_meridian() {
        let wgs84 = Ellipsoid::WGS84;
        let frame = wgs84.local_to_world(DVec3::new(wgs84.semi_major, 0.0, 0.0));
        assert!(frame.x_axis.truncate().abs_diff_eq(DVec3::Y, 1e-12));
        assert!(frame.y_axis.truncate().abs_diff_eq(DVec3::Z, 1e-12));
        assert!(frame.z_axis.truncate().abs_diff_eq(DVec3::X, 1e-12));
        let rot = rotation_only(frame);
        assert_eq!(rot.w_axis, DVec4::W);
    }

    #[test]
    fn line_hits_near_side_of_ellipsoid() {
        let sphere = Ellipsoid::sphere(10.0);
        let hit = sphere
            .intersect_geocentric_line(DVec3::new(30.0, 0.0, 0.0), DVec3::new(-30.0, 0.0, 0.0))
            .unwrap();
        assert!(hit.abs_diff_eq(DVec3::new(10.0, 0.0, 0.0), 1e-9));
        assert!(sphere
            .intersect_geocentric_line(DVec3::new(30.0, 0.0, 0.0), DVec3::new(30.0, 30.0, 0.0))
            .is_none());
    }

    #[test]
    fn closest_hit_wins() {
        struct TwoHits;
        impl IntersectionService for TwoHits {
            fn intersect_segment(&self, _: DVec3, _: DVec3) -> Vec<Intersection> {
                vec![
                    Intersection {
                        ratio: 0.8,
                        point: DVec3::splat(8.0),
                    },
                    Intersection {
                        ratio: 0.2,
                        point: DVec3::splat(2.0),
                    },
                ]
            }
        }
        let hit = closest_intersection(&TwoHits, DVec3::ZERO, DVec3::splat(10.0));
        assert_eq!(hit, Some(DVec3::splat(2.0)));
    }

    #[test]
    fn flat_surface_plane_hit() {
        let flat = FlatSurface::square(100.0);
        let hit = flat.intersect_geocentric_line(DVec3::new(1.0, 2.0, 10.0), DVec3::new(1.0, 2.0, -10.0));
        assert_eq!(hit, Some(DVec3::new(1.0, 2.0, 0.0)));
        assert_eq!(flat.semi_major_axis(), 100.0);
    }
}
