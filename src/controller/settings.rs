//! Provides [`Settings`], the tunables shared by every motion the controller performs.
//!
//! Setters clamp their inputs to the documented invariants and mark the settings dirty so the
//! controller can re-apply the distance limits on the next frame. Pitch limits take effect on
//! the next rotation.

use bevy_log::prelude::*;
use bevy_math::{DVec2, DVec3};
use bevy_reflect::Reflect;

use super::bindings::BindingTable;

/// Lowest pitch, in degrees, the camera may look down.
pub const MIN_PITCH_LIMIT: f64 = -89.9;
/// Highest pitch, in degrees, the camera may look up.
pub const MAX_PITCH_LIMIT: f64 = 89.0;

/// How a tethered camera follows its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum TetherMode {
    /// Follow the target position only.
    #[default]
    Center,
    /// Follow the target position and turn with its heading.
    CenterAndHeading,
}

/// Input sensitivity scalars, multiplied into the deltas of each device.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Sensitivity {
    /// Pointer drags.
    pub mouse: f64,
    /// Discrete key presses.
    pub keyboard: f64,
    /// Wheel and trackpad scrolls.
    pub scroll: f64,
    /// Touch gestures, applied to pixel distances.
    pub touch: f64,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            mouse: 1.0,
            keyboard: 1.0,
            scroll: 1.0,
            touch: 0.005,
        }
    }
}

/// Tunables for timed viewpoint transitions.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TransitionSettings {
    /// Lift the camera along an arc when flying between distant viewpoints.
    pub arc_viewpoints: bool,
    /// Derive the duration from the distance travelled instead of the requested duration.
    pub auto_duration: bool,
    /// Shortest automatic duration, in seconds.
    pub min_duration: f64,
    /// Longest automatic duration, in seconds.
    pub max_duration: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            arc_viewpoints: true,
            auto_duration: false,
            min_duration: 3.0,
            max_duration: 8.0,
        }
    }
}

/// Everything that configures how inputs move the camera.
///
/// A controller holds its settings behind an [`Arc`](std::sync::Arc); mutate through
/// [`GeoCam::settings_mut`](crate::controller::component::GeoCam::settings_mut), which clones
/// the snapshot only if it is shared.
#[derive(Debug, Clone, Reflect)]
pub struct Settings {
    #[reflect(ignore)]
    bindings: BindingTable,
    sensitivity: Sensitivity,
    min_pitch: f64,
    max_pitch: f64,
    max_offset: DVec2,
    min_distance: f64,
    max_distance: f64,
    tether_mode: TetherMode,
    transitions: TransitionSettings,
    terrain_avoidance: bool,
    terrain_avoidance_min_distance: f64,
    throwing: bool,
    throw_decay_rate: f64,
    zoom_to_mouse: bool,
    single_axis_rotation: bool,
    dirty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bindings: BindingTable::with_default_bindings(),
            sensitivity: Sensitivity::default(),
            min_pitch: MIN_PITCH_LIMIT,
            max_pitch: -1.0,
            max_offset: DVec2::ZERO,
            min_distance: 1.0,
            max_distance: f64::MAX,
            tether_mode: TetherMode::default(),
            transitions: TransitionSettings::default(),
            terrain_avoidance: false,
            terrain_avoidance_min_distance: 1.0,
            throwing: false,
            throw_decay_rate: 0.05,
            zoom_to_mouse: false,
            single_axis_rotation: false,
            dirty: false,
        }
    }
}

impl Settings {
    /// Settings with an empty binding table.
    pub fn unbound() -> Self {
        Self {
            bindings: BindingTable::default(),
            ..Default::default()
        }
    }

    /// The action bindings.
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Mutable access to the action bindings.
    pub fn bindings_mut(&mut self) -> &mut BindingTable {
        self.dirty = true;
        &mut self.bindings
    }

    /// Device sensitivities.
    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Replace the device sensitivities.
    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
        self.dirty = true;
    }

    /// Lowest allowed pitch, in degrees.
    pub fn min_pitch(&self) -> f64 {
        self.min_pitch
    }

    /// Highest allowed pitch, in degrees.
    pub fn max_pitch(&self) -> f64 {
        self.max_pitch
    }

    /// Set the pitch bounds, in degrees. `min` is clamped to `[-89.9, 89]` and `max` to
    /// `[min, 89]`.
    pub fn set_min_max_pitch(&mut self, min: f64, max: f64) {
        let clamped_min = min.clamp(MIN_PITCH_LIMIT, MAX_PITCH_LIMIT);
        let clamped_max = max.clamp(clamped_min, MAX_PITCH_LIMIT);
        if clamped_min != min || clamped_max != max {
            warn!("Pitch bounds ({min}, {max}) clamped to ({clamped_min}, {clamped_max})");
        }
        self.min_pitch = clamped_min;
        self.max_pitch = clamped_max;
        self.dirty = true;
    }

    /// Largest local offset of the focal point from the center, per tangent axis. Offsets
    /// applied from a viewpoint are clamped to it, so the default keeps the focal point on the
    /// center.
    pub fn max_offset(&self) -> DVec2 {
        self.max_offset
    }

    /// Clamp the tangent-plane components of an offset to `±max_offset`. Height is left alone.
    pub fn clamp_offset(&self, offset: DVec3) -> DVec3 {
        DVec3::new(
            offset.x.clamp(-self.max_offset.x, self.max_offset.x),
            offset.y.clamp(-self.max_offset.y, self.max_offset.y),
            offset.z,
        )
    }

    /// Set the offset bounds. Negative values are clamped to zero.
    pub fn set_max_offset(&mut self, x: f64, y: f64) {
        self.max_offset = DVec2::new(x.max(0.0), y.max(0.0));
        self.dirty = true;
    }

    /// Closest the camera may get to the center.
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Furthest the camera may get from the center.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Set the distance bounds. `max` is raised to `min` if it is smaller.
    pub fn set_min_max_distance(&mut self, min: f64, max: f64) {
        if max < min {
            warn!("Max distance {max} is below min distance {min}; raising it");
        }
        self.min_distance = min;
        self.max_distance = max.max(min);
        self.dirty = true;
    }

    /// Clamp a distance to the configured bounds.
    pub fn clamp_distance(&self, distance: f64) -> f64 {
        distance.clamp(self.min_distance, self.max_distance)
    }

    /// How tethered cameras follow their target.
    pub fn tether_mode(&self) -> TetherMode {
        self.tether_mode
    }

    /// Set how tethered cameras follow their target.
    pub fn set_tether_mode(&mut self, mode: TetherMode) {
        self.tether_mode = mode;
        self.dirty = true;
    }

    /// Viewpoint transition tunables.
    pub fn transitions(&self) -> TransitionSettings {
        self.transitions
    }

    /// Enable or disable arcing between distant viewpoints.
    pub fn set_arc_viewpoint_transitions(&mut self, enabled: bool) {
        self.transitions.arc_viewpoints = enabled;
        self.dirty = true;
    }

    /// Enable or disable distance-derived transition durations.
    pub fn set_auto_viewpoint_duration_enabled(&mut self, enabled: bool) {
        self.transitions.auto_duration = enabled;
        self.dirty = true;
    }

    /// Set the automatic duration bounds in seconds. `min` is clamped to be non-negative and
    /// `max` to be at least `min`.
    pub fn set_auto_viewpoint_duration_limits(&mut self, min: f64, max: f64) {
        let min = min.max(0.0);
        self.transitions.min_duration = min;
        self.transitions.max_duration = max.max(min);
        self.dirty = true;
    }

    /// Is terrain avoidance enabled?
    pub fn terrain_avoidance(&self) -> bool {
        self.terrain_avoidance
    }

    /// Minimum clearance between the eye and the terrain.
    pub fn terrain_avoidance_min_distance(&self) -> f64 {
        self.terrain_avoidance_min_distance
    }

    /// Enable or disable terrain avoidance.
    pub fn set_terrain_avoidance_enabled(&mut self, enabled: bool) {
        self.terrain_avoidance = enabled;
        self.dirty = true;
    }

    /// Set the minimum clearance. Negative values are clamped to zero.
    pub fn set_terrain_avoidance_min_distance(&mut self, distance: f64) {
        self.terrain_avoidance_min_distance = distance.max(0.0);
        self.dirty = true;
    }

    /// Does releasing a drag throw the camera?
    pub fn throwing(&self) -> bool {
        self.throwing
    }

    /// Fraction of the throw velocity lost per 60 Hz frame.
    pub fn throw_decay_rate(&self) -> f64 {
        self.throw_decay_rate
    }

    /// Enable or disable throwing.
    pub fn set_throwing_enabled(&mut self, enabled: bool) {
        self.throwing = enabled;
        self.dirty = true;
    }

    /// Set the throw decay, clamped to `[0, 1]`.
    pub fn set_throw_decay_rate(&mut self, rate: f64) {
        self.throw_decay_rate = rate.clamp(0.0, 1.0);
        self.dirty = true;
    }

    /// Does zooming move toward the point under the pointer?
    pub fn zoom_to_mouse(&self) -> bool {
        self.zoom_to_mouse
    }

    /// Enable or disable zooming toward the pointer.
    pub fn set_zoom_to_mouse(&mut self, enabled: bool) {
        self.zoom_to_mouse = enabled;
        self.dirty = true;
    }

    /// Do continuous rotations move along one axis at a time?
    pub fn single_axis_rotation(&self) -> bool {
        self.single_axis_rotation
    }

    /// Enable or disable single-axis continuous rotation.
    pub fn set_single_axis_rotation(&mut self, enabled: bool) {
        self.single_axis_rotation = enabled;
        self.dirty = true;
    }

    /// Has a setter run since the last [`clear_dirty`](Self::clear_dirty)?
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge pending changes.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
