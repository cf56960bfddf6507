//! The primary [`Component`] of the controller, [`GeoCam`].

use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_input::keyboard::KeyCode;
use bevy_log::prelude::*;
use bevy_math::{prelude::*, DVec2, DVec3};
use bevy_reflect::prelude::*;
use bevy_render::{
    camera::{OrthographicProjection, PerspectiveProjection, ScalingMode},
    prelude::*,
};
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    bindings::{Action, ActionType, ButtonMask, EventKind, InputMask, Modifiers, ScrollDirection},
    camera::{CameraProjection, RenderCamera, Viewport},
    inputs::{
        is_click, pointer_delta, ContinuousGesture, NavEvent, PointerSample, PointerTracking,
        TouchTracking,
    },
    momentum::Throw,
    motion::{home_center_distance, pick_world_point},
    pose::Pose,
    settings::Settings,
    task::{Task, TaskKind},
    transition::{ResolvedViewpoint, Viewpoint, ViewpointTransition},
};
use crate::{
    extensions::{
        terrain_avoidance::avoid_terrain,
        tether::{Tether, TetherTarget},
    },
    input::NavEventQueue,
    services::{GeoService, GeoServices, IntersectionService},
};

/// Seconds a key press or scroll step plays out over unless its binding says otherwise.
const DEFAULT_TASK_DURATION: f64 = 0.2;
/// Seconds a goto flight takes unless its binding says otherwise.
const DEFAULT_GOTO_DURATION: f64 = 1.0;
/// Scroll steps are this much stronger than key presses.
const SCROLL_STEP: f64 = 1.5;

/// The world the controller is navigating, borrowed for the length of one event.
pub struct NavContext<'a> {
    /// The camera being driven. Its view transform is rewritten on every frame event.
    pub camera: &'a mut RenderCamera,
    /// Coordinate services for the surface.
    pub geo: &'a dyn GeoService,
    /// Scene intersections, if the application provides them.
    pub scene: Option<&'a dyn IntersectionService>,
}

/// Tracks all state of a camera's controller, including its inputs, motion, and settings.
///
/// Feed it [`NavEvent`]s through [`GeoCam::handle`], or let the
/// [`GeoCamPlugin`](crate::controller::GeoCamPlugin) do so from Bevy's input events. Discrete
/// inputs become timed [`Task`]s, drags move the [`Pose`] directly or drive a continuous
/// gesture, and every [`NavEvent::Frame`] advances whatever is in flight and writes the pose
/// into the camera.
///
/// The [`Settings`] are an [`Arc`] snapshot. Edits through [`GeoCam::settings_mut`] copy the
/// settings first if they are shared, so the owner can hand the same settings to many cameras.
#[derive(Debug, Clone, Reflect, Component)]
pub struct GeoCam {
    /// Bindings, sensitivities, and limits.
    #[reflect(ignore)]
    settings: Arc<Settings>,
    /// Where the camera is. Written to the render camera on every frame event.
    pub pose: Pose,
    /// Overrides the surface's default home center and distance.
    home: Option<(DVec3, f64)>,
    task: Task,
    tracking: PointerTracking,
    continuous: ContinuousGesture,
    throw: Option<Throw>,
    transition: Option<ViewpointTransition>,
    #[reflect(ignore)]
    tether: Option<Tether>,
    /// Where scroll and drag zooms head, picked when the zoom starts.
    zoom_target: Option<DVec3>,
    #[reflect(ignore)]
    touches: TouchTracking,
    /// The projection [`ActionType::ToggleProjection`] swaps back to.
    saved_projection: Option<CameraProjection>,
    initialized: bool,
}

impl Default for GeoCam {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GeoCam {
    /// Create a controller. Without `settings`, the defaults and stock bindings are used.
    ///
    /// The pose is placed at the surface's home the first time the controller sees the surface.
    pub fn new(settings: Option<Arc<Settings>>) -> Self {
        Self {
            settings: settings.unwrap_or_default(),
            pose: Pose::default(),
            home: None,
            task: Task::default(),
            tracking: PointerTracking::default(),
            continuous: ContinuousGesture::default(),
            throw: None,
            transition: None,
            tether: None,
            zoom_target: None,
            touches: TouchTracking::default(),
            saved_projection: None,
            initialized: false,
        }
    }

    /// Use `center` and `distance` as home instead of the surface's default.
    pub fn with_home(mut self, center: DVec3, distance: f64) -> Self {
        self.home = Some((center, distance));
        self
    }

    /// The current settings snapshot.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Edit the settings, copying them first if another owner shares the snapshot.
    pub fn settings_mut(&mut self) -> &mut Settings {
        Arc::make_mut(&mut self.settings)
    }

    /// Replace the settings wholesale. Any pending task is dropped and the distance is re-clamped.
    pub fn apply_settings(&mut self, settings: Arc<Settings>) {
        self.settings = settings;
        self.task.clear();
        self.pose.set_distance(self.pose.distance, &self.settings);
    }

    /// The task in progress.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Is the camera moving because of a throw?
    pub fn is_throwing(&self) -> bool {
        self.throw.is_some()
    }

    /// Is a continuous drag gesture driving the camera?
    pub fn is_continuous(&self) -> bool {
        self.continuous.active
    }

    /// The pose [`GeoCam::home`] moves to.
    pub fn home_pose(&self, geo: &dyn GeoService) -> Pose {
        let (center, distance) = self.home.unwrap_or_else(|| home_center_distance(geo));
        let mut pose = Pose::default();
        pose.set_center(center, geo);
        pose.set_distance(distance, &self.settings);
        pose
    }

    /// Change where [`GeoCam::home`] moves to.
    pub fn set_home(&mut self, center: DVec3, distance: f64) {
        self.home = Some((center, distance));
    }

    /// Move to the home pose, looking straight down, and drop any gesture in progress.
    ///
    /// Straight down is a pitch of -90 degrees, below the lowest pitch rotation allows. Heading
    /// still turns from there, but a pitch change only applies once it lands inside the bounds.
    pub fn home(&mut self, geo: &dyn GeoService) {
        self.initialized = true;
        self.pose = self.home_pose(geo);
        self.cancel_viewpoint();
        self.clear_events(true);
        debug!("Home: center {:?}, distance {}", self.pose.center, self.pose.distance);
    }

    fn ensure_initialized(&mut self, geo: &dyn GeoService) {
        if !self.initialized {
            self.home(geo);
        }
    }

    /// The current pose as a viewpoint with a cartographic focal point.
    pub fn viewpoint(&self, geo: &dyn GeoService) -> Viewpoint {
        ResolvedViewpoint::from_pose(&self.pose).to_viewpoint(geo)
    }

    /// Go to `viewpoint`, over `duration` seconds, or immediately when `duration` is not
    /// positive. Unset fields keep their current values.
    pub fn set_viewpoint(&mut self, viewpoint: &Viewpoint, duration: f64, geo: &dyn GeoService) {
        self.ensure_initialized(geo);
        self.cancel_viewpoint();
        let current = ResolvedViewpoint::from_pose(&self.pose);
        let end = viewpoint.resolve(&current, geo);
        self.fly_to(current, end, duration, geo);
    }

    fn fly_to(
        &mut self,
        start: ResolvedViewpoint,
        end: ResolvedViewpoint,
        duration: f64,
        geo: &dyn GeoService,
    ) {
        self.task.clear();
        self.throw = None;
        if duration > 0.0 {
            self.transition = Some(ViewpointTransition::new(
                start,
                end,
                duration,
                &self.settings.transitions(),
                geo,
            ));
        } else {
            end.apply_to(&mut self.pose, &self.settings, geo);
        }
    }

    /// Stop any viewpoint transition and tether.
    pub fn cancel_viewpoint(&mut self) {
        if self.transition.take().is_some() {
            debug!("Viewpoint transition cancelled");
        }
        self.tether = None;
    }

    /// Is a viewpoint transition in flight?
    pub fn is_setting_viewpoint(&self) -> bool {
        self.transition.is_some()
    }

    /// Is the camera following a tether target?
    pub fn is_tethering(&self) -> bool {
        self.tether.is_some()
    }

    /// Fly to `target` over `duration` seconds, then keep following it until the user moves the
    /// camera or another viewpoint is set.
    pub fn tether_to(
        &mut self,
        target: Arc<dyn TetherTarget>,
        duration: f64,
        geo: &dyn GeoService,
    ) {
        self.ensure_initialized(geo);
        self.cancel_viewpoint();
        let current = ResolvedViewpoint::from_pose(&self.pose);
        let end = ResolvedViewpoint {
            position: target.world_position(),
            ..current
        };
        self.fly_to(current, end, duration, geo);
        self.tether = Some(Tether::new(target));
    }

    /// Forget the gesture in progress.
    fn clear_events(&mut self, including_keys: bool) {
        self.continuous.reset();
        self.tracking.clear(including_keys);
        self.task.clear();
        self.zoom_target = None;
        self.throw = None;
    }

    /// Feed one event to the controller. Returns `true` if the controller consumed it.
    pub fn handle(&mut self, event: &NavEvent, ctx: &mut NavContext) -> bool {
        self.ensure_initialized(ctx.geo);
        match *event {
            NavEvent::KeyPress {
                key,
                modifiers,
                time,
            } => self.on_key_press(key, modifiers, time, ctx),
            NavEvent::KeyRelease { .. } => {
                self.tracking.key_modifiers = Modifiers::NONE;
                false
            }
            NavEvent::ButtonPress(sample) => self.on_button_press(sample),
            NavEvent::ButtonRelease(sample) => self.on_button_release(sample, ctx),
            NavEvent::Move(sample) => self.on_move(sample, ctx),
            NavEvent::Scroll {
                delta,
                position,
                time,
            } => self.on_scroll(delta, position, time, ctx),
            NavEvent::TouchDown { id, position, time } => {
                self.touches.down(id, position);
                match self.touches.count() {
                    1 => self.on_button_press(touch_sample(position, ButtonMask::LEFT, time)),
                    _ => {
                        self.clear_events(false);
                        true
                    }
                }
            }
            NavEvent::TouchMove { id, position, time } => {
                let count = self.touches.count();
                let gesture = self.touches.moved(id, position);
                match (count, gesture) {
                    (1, _) => self.on_move(touch_sample(position, ButtonMask::LEFT, time), ctx),
                    (2, Some(gesture)) => self.on_multi_touch(
                        gesture.spread,
                        gesture.twist,
                        gesture.drag,
                        ctx,
                    ),
                    _ => false,
                }
            }
            NavEvent::TouchUp { id, position, time } => {
                let count = self.touches.count();
                self.touches.up(id);
                if count == 1 {
                    self.on_button_release(touch_sample(position, ButtonMask::NONE, time), ctx)
                } else {
                    self.clear_events(false);
                    true
                }
            }
            NavEvent::Frame { time } => {
                self.on_frame(time, ctx);
                false
            }
        }
    }

    fn on_key_press(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        time: f64,
        ctx: &mut NavContext,
    ) -> bool {
        self.tracking.key_modifiers = modifiers;
        let action = self
            .settings
            .bindings()
            .action(EventKind::KeyDown, InputMask::Key(key), modifiers);

        match action.kind {
            ActionType::None => false,
            ActionType::Home => {
                self.home(ctx.geo);
                true
            }
            ActionType::ToggleProjection => {
                self.toggle_projection(ctx.camera);
                true
            }
            _ => {
                let rate = action.direction().unit_delta() * self.settings.sensitivity().keyboard;
                let rate = action.options.apply(rate);
                let duration = action.options.duration_or(DEFAULT_TASK_DURATION);
                self.register_task(action.kind, rate, duration, time)
            }
        }
    }

    fn on_button_press(&mut self, sample: PointerSample) -> bool {
        self.clear_events(false);
        self.cancel_viewpoint();
        self.tracking.down = Some(sample);
        self.tracking.push_move(sample);
        true
    }

    fn on_button_release(&mut self, sample: PointerSample, ctx: &mut NavContext) -> bool {
        let Some(down) = self.tracking.down else {
            self.clear_events(true);
            return false;
        };
        self.tracking.up = Some(sample);

        if is_click(&down, &sample, &ctx.camera.viewport) {
            let bindings = self.settings.bindings();
            let input = InputMask::Buttons(down.buttons);
            let double_click = self.tracking.register_click(down);
            let mut action = Action::NULL;
            if double_click {
                action = bindings.action(EventKind::DoubleClick, input, down.modifiers);
            }
            if action.is_none() {
                action = bindings.action(EventKind::Click, input, down.modifiers);
            }
            self.clear_events(true);
            self.handle_point_action(action, down.position, ctx);
            return true;
        }

        let last_drag = self.tracking.last_drag;
        self.clear_events(true);
        if self.settings.throwing() {
            if let Some((action, delta)) = last_drag {
                self.throw = Throw::new(action.kind, delta, sample.time);
            }
        }
        true
    }

    fn on_move(&mut self, sample: PointerSample, ctx: &mut NavContext) -> bool {
        if sample.buttons.is_empty() {
            if self.tracking.moved_with_buttons() {
                self.clear_events(true);
            }
            self.tracking.push_move(sample);
            return false;
        }

        self.tracking.push_move(sample);
        let Some(previous) = self.tracking.previous else {
            return true;
        };
        let action = self.settings.bindings().action(
            EventKind::Drag,
            InputMask::Buttons(sample.buttons),
            self.tracking.key_modifiers,
        );
        if action.is_none() {
            return false;
        }

        let delta = pointer_delta(previous.position, sample.position, &ctx.camera.viewport)
            * self.settings.sensitivity().mouse;
        let delta = action.options.apply(delta);
        if delta == DVec2::ZERO {
            return true;
        }

        self.cancel_viewpoint();
        if action.kind.is_zoom() && self.zoom_target.is_none() && self.settings.zoom_to_mouse() {
            let at = self.tracking.down.map_or(sample.position, |down| down.position);
            self.zoom_target = pick_world_point(ctx.camera, at, ctx.geo, ctx.scene);
        }

        if action.options.is_continuous() {
            self.continuous.accumulate(action, delta, sample.time);
        } else {
            self.continuous.active = false;
            self.apply_motion(action.kind, delta, ctx);
            self.tracking.last_drag = Some((action, delta));
        }
        true
    }

    fn on_scroll(&mut self, delta: DVec2, position: DVec2, time: f64, ctx: &mut NavContext) -> bool {
        let Some(direction) = ScrollDirection::from_delta(delta) else {
            return false;
        };
        let action = self.settings.bindings().action(
            EventKind::Scroll,
            InputMask::Scroll(direction),
            self.tracking.key_modifiers,
        );
        if action.is_none() {
            return false;
        }

        if self.settings.zoom_to_mouse() {
            self.zoom_target = pick_world_point(ctx.camera, position, ctx.geo, ctx.scene);
        }
        let rate = action.direction().unit_delta()
            * SCROLL_STEP
            * self.settings.sensitivity().scroll;
        let rate = action.options.apply(rate);
        let duration = action.options.duration_or(DEFAULT_TASK_DURATION);
        self.register_task(action.kind, rate, duration, time)
    }

    fn on_multi_touch(
        &mut self,
        spread: f64,
        twist: f64,
        drag: DVec2,
        ctx: &mut NavContext,
    ) -> bool {
        let touch = self.settings.sensitivity().touch;
        let gestures = [
            (EventKind::Pinch, DVec2::new(0.0, -spread * touch)),
            (EventKind::Twist, DVec2::new(twist, 0.0)),
            (EventKind::MultiDrag, DVec2::new(drag.x, -drag.y) * touch),
        ];
        let mut handled = false;
        for (event, delta) in gestures {
            let action = self
                .settings
                .bindings()
                .action(event, InputMask::None, Modifiers::NONE);
            let delta = action.options.apply(delta);
            if action.is_none() || delta == DVec2::ZERO {
                continue;
            }
            self.cancel_viewpoint();
            self.apply_motion(action.kind, delta, ctx);
            handled = true;
        }
        handled
    }

    fn register_task(&mut self, action: ActionType, rate: DVec2, duration: f64, now: f64) -> bool {
        let kind = if action.is_pan() {
            TaskKind::Pan
        } else if action.is_rotate() {
            TaskKind::Rotate
        } else if action.is_zoom() {
            TaskKind::Zoom
        } else {
            return false;
        };
        self.cancel_viewpoint();
        self.throw = None;
        self.task.set(kind, rate, duration, now);
        true
    }

    fn handle_point_action(&mut self, action: Action, position: DVec2, ctx: &mut NavContext) {
        match action.kind {
            ActionType::Home => self.home(ctx.geo),
            ActionType::ToggleProjection => self.toggle_projection(ctx.camera),
            ActionType::Goto => {
                let Some(point) = pick_world_point(ctx.camera, position, ctx.geo, ctx.scene) else {
                    trace!("Goto at {position} missed the world");
                    return;
                };
                let current = ResolvedViewpoint::from_pose(&self.pose);
                let end = ResolvedViewpoint {
                    position: point,
                    range: current.range * action.options.range_factor(),
                    ..current
                };
                let duration = action.options.duration_or(DEFAULT_GOTO_DURATION);
                self.fly_to(current, end, duration, ctx.geo);
            }
            _ => {}
        }
    }

    /// Swap between the current projection and an orthographic one matching it at the current
    /// distance.
    fn toggle_projection(&mut self, camera: &mut RenderCamera) {
        if let Some(saved) = self.saved_projection.take() {
            camera.projection = saved;
            debug!("Restored {:?}", camera.projection);
            return;
        }
        match camera.projection.to_orthographic(self.pose.distance) {
            Some(orthographic) => {
                self.saved_projection = Some(camera.projection);
                camera.projection = orthographic;
                debug!("Switched to {orthographic:?}");
            }
            None => warn!("Cannot switch {:?} to orthographic", camera.projection),
        }
    }

    /// Apply a motion delta to the pose.
    fn apply_motion(&mut self, action: ActionType, delta: DVec2, ctx: &mut NavContext) {
        if action.is_pan() {
            self.pose.pan(delta.x, delta.y, ctx.geo);
        } else if action.is_rotate() {
            self.pose.rotate(delta.x, delta.y, &self.settings);
        } else if action.is_zoom() {
            self.pose.zoom(
                delta.y,
                &mut ctx.camera.projection,
                self.zoom_target,
                &self.settings,
                ctx.geo,
            );
        }
    }

    fn on_frame(&mut self, now: f64, ctx: &mut NavContext) {
        if self.settings.is_dirty() {
            self.pose.set_distance(self.pose.distance, &self.settings);
            if let Some(settings) = Arc::get_mut(&mut self.settings) {
                settings.clear_dirty();
            }
        }

        if let Some((action, mut delta)) = self.continuous.service(now) {
            if action.kind.is_rotate() && self.settings.single_axis_rotation() {
                if delta.x.abs() > delta.y.abs() {
                    delta.y = 0.0;
                } else {
                    delta.x = 0.0;
                }
            }
            self.apply_motion(action.kind, delta, ctx);
        }

        if let Some(mut throw) = self.throw.take() {
            if let Some(delta) = throw.service(now, self.settings.throw_decay_rate()) {
                self.apply_motion(throw.action(), delta, ctx);
                self.throw = Some(throw);
            }
        }

        if let Some((kind, delta)) = self.task.service(now) {
            let action = match kind {
                TaskKind::Pan => ActionType::Pan,
                TaskKind::Rotate => ActionType::Rotate,
                TaskKind::Zoom => ActionType::Zoom,
                TaskKind::None => ActionType::None,
            };
            self.apply_motion(action, delta, ctx);
        }

        self.service_transition(now, ctx.geo);

        let flying = self.transition.is_some() || self.tether.is_some();
        if let Some(scene) = ctx.scene.filter(|_| self.settings.terrain_avoidance() && !flying) {
            avoid_terrain(&mut self.pose, &self.settings, ctx.geo, scene);
        }

        ctx.camera.world_from_view = self.pose.world_from_view();
    }

    fn service_transition(&mut self, now: f64, geo: &dyn GeoService) {
        let Some(transition) = self.transition.as_mut() else {
            if let Some(tether) = self.tether.as_mut() {
                tether.follow(&mut self.pose, self.settings.tether_mode(), geo);
            }
            return;
        };

        if let Some(tether) = &self.tether {
            let end = ResolvedViewpoint {
                position: tether.position(),
                ..*transition.end()
            };
            transition.set_end(end);
        }

        let t = transition.progress(now);
        if t >= 1.0 {
            transition.end().apply_to(&mut self.pose, &self.settings, geo);
            self.transition = None;
            debug!("Viewpoint transition complete");
        } else {
            transition
                .sample(t)
                .apply_to(&mut self.pose, &self.settings, geo);
        }
    }

    /// Run every controller in the world over the input gathered this frame, then write the
    /// resulting poses into the camera transforms and projections.
    pub fn update_camera_positions(
        mut cameras: Query<(&mut GeoCam, &Camera, &mut Transform, &mut Projection)>,
        services: Res<GeoServices>,
        mut queue: ResMut<NavEventQueue>,
        time: Res<Time>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        let now = time.elapsed_secs_f64();
        for (mut controller, camera, mut transform, mut projection) in cameras.iter_mut() {
            let Some(mut render_camera) = render_camera(camera, &projection) else {
                continue;
            };
            render_camera.world_from_view = controller.pose.world_from_view();
            let viewport = render_camera.viewport;
            let mut ctx = NavContext {
                camera: &mut render_camera,
                geo: services.geo.as_ref(),
                scene: services.scene.as_deref(),
            };

            for event in queue.events() {
                if !accepts(event, &viewport) {
                    continue;
                }
                controller.handle(event, &mut ctx);
            }
            controller.handle(&NavEvent::Frame { time: now }, &mut ctx);

            let new_transform = Transform::from_matrix(render_camera.world_from_view.as_mat4());
            if new_transform != *transform {
                *transform = new_transform;
                redraw.write(RequestRedraw);
            }
            write_projection(&render_camera.projection, &mut projection);
        }
        queue.clear();
    }
}

fn touch_sample(position: DVec2, buttons: ButtonMask, time: f64) -> PointerSample {
    PointerSample {
        position,
        buttons,
        modifiers: Modifiers::NONE,
        time,
    }
}

/// Presses, scrolls, and touches that start outside a camera's viewport belong to another camera.
fn accepts(event: &NavEvent, viewport: &Viewport) -> bool {
    match *event {
        NavEvent::ButtonPress(sample) => viewport.contains(sample.position),
        NavEvent::Scroll { position, .. } | NavEvent::TouchDown { position, .. } => {
            viewport.contains(position)
        }
        _ => true,
    }
}

/// Read a Bevy camera into the controller's camera model.
fn render_camera(camera: &Camera, projection: &Projection) -> Option<RenderCamera> {
    let rect = camera.logical_viewport_rect()?;
    let viewport = Viewport {
        offset: rect.min.as_dvec2(),
        extent: rect.size().as_dvec2(),
    };
    let projection = match projection {
        Projection::Perspective(perspective) => CameraProjection::Perspective {
            fov_y: perspective.fov as f64,
            aspect: viewport.aspect(),
            near: perspective.near as f64,
            far: perspective.far as f64,
        },
        Projection::Orthographic(orthographic) => CameraProjection::Orthographic {
            left: orthographic.area.min.x as f64,
            right: orthographic.area.max.x as f64,
            bottom: orthographic.area.min.y as f64,
            top: orthographic.area.max.y as f64,
            near: orthographic.near as f64,
            far: orthographic.far as f64,
        },
        Projection::Custom(_) => {
            warn_once!("Custom projections are not supported by GeoCam.");
            return None;
        }
    };
    Some(RenderCamera::new(projection, viewport))
}

/// Write the controller's projection back into the Bevy camera, if it changed kind or extent.
fn write_projection(projection: &CameraProjection, target: &mut Projection) {
    match (*projection, &mut *target) {
        (
            CameraProjection::Orthographic {
                left,
                right,
                bottom,
                top,
                ..
            },
            Projection::Orthographic(orthographic),
        ) => {
            let width = (right - left) as f32;
            let height = (top - bottom) as f32;
            let area = Rect::new(left as f32, bottom as f32, right as f32, top as f32);
            if orthographic.area != area {
                orthographic.scale = 1.0;
                orthographic.scaling_mode = ScalingMode::Fixed { width, height };
            }
        }
        (
            CameraProjection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            },
            _,
        ) => {
            *target = Projection::Orthographic(OrthographicProjection {
                near: near as f32,
                far: far as f32,
                scaling_mode: ScalingMode::Fixed {
                    width: (right - left) as f32,
                    height: (top - bottom) as f32,
                },
                ..OrthographicProjection::default_3d()
            });
        }
        (
            CameraProjection::Perspective {
                fov_y, near, far, ..
            }
            | CameraProjection::EllipsoidPerspective {
                fov_y, near, far, ..
            },
            Projection::Orthographic(_),
        ) => {
            *target = Projection::Perspective(PerspectiveProjection {
                fov: fov_y as f32,
                near: near as f32,
                far: if far.is_finite() { far as f32 } else { f32::MAX },
                ..Default::default()
            });
        }
        _ => {}
    }
}
