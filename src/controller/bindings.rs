//! Maps normalized input signatures to semantic camera [`Action`]s.
//!
//! A [`BindingTable`] is keyed on [`InputSpec`]: the kind of event, the button/key/scroll mask
//! that produced it, and the modifier keys held at the time. Lookups never fail; a miss resolves
//! to [`Action::NULL`].

use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    ops::{BitOr, BitOrAssign},
    sync::Arc,
};

use bevy_input::{keyboard::KeyCode, mouse::MouseButton};
use bevy_log::prelude::*;
use bevy_math::DVec2;
use bevy_reflect::Reflect;

/// The kind of input event a binding responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum EventKind {
    /// Pointer moved while one or more buttons are held.
    Drag,
    /// Buttons pressed and released without moving.
    Click,
    /// A second click with the same buttons shortly after the first.
    DoubleClick,
    /// A key was pressed.
    KeyDown,
    /// Mouse wheel or trackpad scroll.
    Scroll,
    /// Two fingers moving apart or together.
    Pinch,
    /// Two fingers rotating about their midpoint.
    Twist,
    /// Two fingers moving in the same direction.
    MultiDrag,
}

/// A set of modifier keys. Left and right variants are tracked separately; the unsided
/// constants are the union of both sides.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self(0);
    /// Left shift key.
    pub const LEFT_SHIFT: Self = Self(1 << 0);
    /// Right shift key.
    pub const RIGHT_SHIFT: Self = Self(1 << 1);
    /// Left control key.
    pub const LEFT_CONTROL: Self = Self(1 << 2);
    /// Right control key.
    pub const RIGHT_CONTROL: Self = Self(1 << 3);
    /// Left alt key.
    pub const LEFT_ALT: Self = Self(1 << 4);
    /// Right alt key.
    pub const RIGHT_ALT: Self = Self(1 << 5);
    /// Left super key.
    pub const LEFT_SUPER: Self = Self(1 << 6);
    /// Right super key.
    pub const RIGHT_SUPER: Self = Self(1 << 7);
    /// Num Lock is on.
    pub const NUM_LOCK: Self = Self(1 << 8);
    /// Caps Lock is on.
    pub const CAPS_LOCK: Self = Self(1 << 9);

    /// Either shift key.
    pub const SHIFT: Self = Self(Self::LEFT_SHIFT.0 | Self::RIGHT_SHIFT.0);
    /// Either control key.
    pub const CONTROL: Self = Self(Self::LEFT_CONTROL.0 | Self::RIGHT_CONTROL.0);
    /// Either alt key.
    pub const ALT: Self = Self(Self::LEFT_ALT.0 | Self::RIGHT_ALT.0);
    /// Either super (logo) key.
    pub const SUPER: Self = Self(Self::LEFT_SUPER.0 | Self::RIGHT_SUPER.0);

    const LOCKS: Self = Self(Self::NUM_LOCK.0 | Self::CAPS_LOCK.0);

    /// Raw bit representation.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Are all modifiers in `other` also set in `self`?
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Is any modifier in `other` set in `self`?
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// `self` with every modifier in `other` cleared.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// `self` with the lock keys cleared.
    pub const fn without_locks(self) -> Self {
        self.without(Self::LOCKS)
    }

    /// The modifier bit a key toggles, if it is a modifier key.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        Some(match key {
            KeyCode::ShiftLeft => Self::LEFT_SHIFT,
            KeyCode::ShiftRight => Self::RIGHT_SHIFT,
            KeyCode::ControlLeft => Self::LEFT_CONTROL,
            KeyCode::ControlRight => Self::RIGHT_CONTROL,
            KeyCode::AltLeft => Self::LEFT_ALT,
            KeyCode::AltRight => Self::RIGHT_ALT,
            KeyCode::SuperLeft => Self::LEFT_SUPER,
            KeyCode::SuperRight => Self::RIGHT_SUPER,
            KeyCode::NumLock => Self::NUM_LOCK,
            KeyCode::CapsLock => Self::CAPS_LOCK,
            _ => return None,
        })
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#012b})", self.0)
    }
}

/// A set of mouse buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct ButtonMask(u8);

impl ButtonMask {
    /// No buttons.
    pub const NONE: Self = Self(0);
    /// Left button.
    pub const LEFT: Self = Self(1);
    /// Middle button.
    pub const MIDDLE: Self = Self(2);
    /// Right button.
    pub const RIGHT: Self = Self(4);

    /// Is no button in the set?
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `self` with every button in `other` cleared.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// The mask bit for a bevy mouse button. Buttons without a navigation meaning map to
    /// [`ButtonMask::NONE`].
    pub fn from_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Right => Self::RIGHT,
            _ => Self::NONE,
        }
    }
}

impl BitOr for ButtonMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Which way a scroll event moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum ScrollDirection {
    /// Toward the left.
    Left,
    /// Toward the right.
    Right,
    /// Upward.
    Up,
    /// Downward.
    Down,
}

impl ScrollDirection {
    /// Classify a scroll delta. Horizontal motion wins over vertical; a zero delta has no
    /// direction.
    pub fn from_delta(delta: DVec2) -> Option<Self> {
        if delta.x < 0.0 {
            Some(Self::Left)
        } else if delta.x > 0.0 {
            Some(Self::Right)
        } else if delta.y < 0.0 {
            Some(Self::Up)
        } else if delta.y > 0.0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// The device-specific part of an [`InputSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum InputMask {
    /// Touch gestures carry no mask.
    None,
    /// A keyboard key.
    Key(KeyCode),
    /// One or more mouse buttons, held together.
    Buttons(ButtonMask),
    /// A scroll direction.
    Scroll(ScrollDirection),
}

/// The signature of an input event used as a binding key.
///
/// Specs order by event kind, then input, then modifiers. Two specs that differ only in the
/// Num Lock modifier compare equal.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct InputSpec {
    /// What happened.
    pub event: EventKind,
    /// Which key, button combination, or scroll direction triggered it.
    pub input: InputMask,
    /// Modifier keys held when it happened.
    pub modifiers: Modifiers,
}

impl InputSpec {
    /// Create a new spec.
    pub fn new(event: EventKind, input: InputMask, modifiers: Modifiers) -> Self {
        Self {
            event,
            input,
            modifiers,
        }
    }

    fn key_modifiers(&self) -> Modifiers {
        self.modifiers.without(Modifiers::NUM_LOCK)
    }
}

impl PartialEq for InputSpec {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event
            && self.input == other.input
            && self.key_modifiers() == other.key_modifiers()
    }
}

impl Eq for InputSpec {}

impl Ord for InputSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event
            .cmp(&other.event)
            .then_with(|| self.input.cmp(&other.input))
            .then_with(|| self.key_modifiers().cmp(&other.key_modifiers()))
    }
}

impl PartialOrd for InputSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for InputSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event.hash(state);
        self.input.hash(state);
        self.key_modifiers().hash(state);
    }
}

/// A direction implied by an [`ActionType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Direction {
    /// No direction.
    None,
    /// Toward the left.
    Left,
    /// Toward the right.
    Right,
    /// Upward.
    Up,
    /// Downward.
    Down,
}

impl Direction {
    /// The unit delta a discrete (keyboard or scroll) input in this direction produces.
    pub fn unit_delta(self) -> DVec2 {
        match self {
            Direction::None => DVec2::ZERO,
            Direction::Left => DVec2::new(1.0, 0.0),
            Direction::Right => DVec2::new(-1.0, 0.0),
            Direction::Up => DVec2::new(0.0, -1.0),
            Direction::Down => DVec2::new(0.0, 1.0),
        }
    }
}

/// Semantic camera operations an input can be bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum ActionType {
    /// Does nothing. The result of every lookup miss.
    #[default]
    None,
    /// Return to the home pose.
    Home,
    /// Fly to the point under the pointer.
    Goto,
    /// Pan by the input delta.
    Pan,
    /// Pan toward the left.
    PanLeft,
    /// Pan toward the right.
    PanRight,
    /// Pan upward.
    PanUp,
    /// Pan downward.
    PanDown,
    /// Rotate by the input delta.
    Rotate,
    /// Rotate toward the left.
    RotateLeft,
    /// Rotate toward the right.
    RotateRight,
    /// Rotate upward.
    RotateUp,
    /// Rotate downward.
    RotateDown,
    /// Zoom by the vertical input delta.
    Zoom,
    /// Zoom toward the center.
    ZoomIn,
    /// Zoom away from the center.
    ZoomOut,
    /// Swap between perspective and orthographic projections.
    ToggleProjection,
}

impl ActionType {
    /// The direction this action implies for discrete inputs.
    pub fn direction(self) -> Direction {
        match self {
            ActionType::PanLeft | ActionType::RotateLeft => Direction::Left,
            ActionType::PanRight | ActionType::RotateRight => Direction::Right,
            ActionType::PanUp | ActionType::RotateUp | ActionType::ZoomIn => Direction::Up,
            ActionType::PanDown | ActionType::RotateDown | ActionType::ZoomOut => Direction::Down,
            _ => Direction::None,
        }
    }

    /// Is this one of the pan actions?
    pub fn is_pan(self) -> bool {
        matches!(
            self,
            ActionType::Pan
                | ActionType::PanLeft
                | ActionType::PanRight
                | ActionType::PanUp
                | ActionType::PanDown
        )
    }

    /// Is this one of the rotate actions?
    pub fn is_rotate(self) -> bool {
        matches!(
            self,
            ActionType::Rotate
                | ActionType::RotateLeft
                | ActionType::RotateRight
                | ActionType::RotateUp
                | ActionType::RotateDown
        )
    }

    /// Is this one of the zoom actions?
    pub fn is_zoom(self) -> bool {
        matches!(
            self,
            ActionType::Zoom | ActionType::ZoomIn | ActionType::ZoomOut
        )
    }
}

/// Per-binding tuning. Every field is optional; unset fields fall back to the defaults
/// documented on the accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct ActionOptions {
    /// Multiplier on the horizontal delta.
    pub scale_x: Option<f64>,
    /// Multiplier on the vertical delta.
    pub scale_y: Option<f64>,
    /// Drag bindings only: keep moving while the button is held, at a speed proportional to
    /// the pointer's offset, instead of tracking the pointer directly.
    pub continuous: Option<bool>,
    /// Suppress the smaller of the two delta axes.
    pub single_axis: Option<bool>,
    /// Goto bindings only: the range at the destination relative to the current one.
    pub goto_range_factor: Option<f64>,
    /// Seconds over which a discrete action or goto flight plays out.
    pub duration: Option<f64>,
}

impl ActionOptions {
    /// Set both scale factors.
    pub fn with_scale(mut self, x: f64, y: f64) -> Self {
        self.scale_x = Some(x);
        self.scale_y = Some(y);
        self
    }

    /// Set only the vertical scale factor.
    pub fn with_scale_y(mut self, y: f64) -> Self {
        self.scale_y = Some(y);
        self
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = Some(continuous);
        self
    }

    /// Set the single-axis flag.
    pub fn with_single_axis(mut self, single_axis: bool) -> Self {
        self.single_axis = Some(single_axis);
        self
    }

    /// Set the goto range factor.
    pub fn with_goto_range_factor(mut self, factor: f64) -> Self {
        self.goto_range_factor = Some(factor);
        self
    }

    /// Set the duration in seconds.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Scale factors, `1.0` when unset.
    pub fn scale(&self) -> DVec2 {
        DVec2::new(self.scale_x.unwrap_or(1.0), self.scale_y.unwrap_or(1.0))
    }

    /// `false` when unset.
    pub fn is_continuous(&self) -> bool {
        self.continuous.unwrap_or(false)
    }

    /// `false` when unset.
    pub fn is_single_axis(&self) -> bool {
        self.single_axis.unwrap_or(false)
    }

    /// `1.0` when unset.
    pub fn range_factor(&self) -> f64 {
        self.goto_range_factor.unwrap_or(1.0)
    }

    /// The configured duration, or `default` when unset.
    pub fn duration_or(&self, default: f64) -> f64 {
        self.duration.unwrap_or(default)
    }

    /// Apply the scale and single-axis options to an input delta.
    pub fn apply(&self, delta: DVec2) -> DVec2 {
        let mut delta = delta * self.scale();
        if self.is_single_axis() {
            if delta.x.abs() > delta.y.abs() {
                delta.y = 0.0;
            } else {
                delta.x = 0.0;
            }
        }
        delta
    }
}

/// A bound camera operation and its options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct Action {
    /// What to do.
    pub kind: ActionType,
    /// How to do it.
    pub options: ActionOptions,
}

impl Action {
    /// The action every lookup miss resolves to.
    pub const NULL: Self = Self {
        kind: ActionType::None,
        options: ActionOptions {
            scale_x: None,
            scale_y: None,
            continuous: None,
            single_axis: None,
            goto_range_factor: None,
            duration: None,
        },
    };

    /// Create a new action.
    pub fn new(kind: ActionType, options: ActionOptions) -> Self {
        Self { kind, options }
    }

    /// The direction implied by the action type.
    pub fn direction(&self) -> Direction {
        self.kind.direction()
    }

    /// Is this the null action?
    pub fn is_none(&self) -> bool {
        self.kind == ActionType::None
    }
}

/// Decides which table keys a single [`BindingTable::bind`] call writes.
pub trait BindingExpander: Send + Sync + 'static {
    /// The specs to register for a requested spec.
    fn expand(&self, spec: InputSpec) -> Vec<InputSpec>;
}

/// Registers exactly the requested spec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactBinding;

impl BindingExpander for ExactBinding {
    fn expand(&self, spec: InputSpec) -> Vec<InputSpec> {
        vec![spec]
    }
}

/// Registers the requested input plus every left-only and right-only variant of each
/// both-sides modifier it holds, so binding `Ctrl` also matches `LCtrl` or `RCtrl` alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidedModifierExpansion;

impl BindingExpander for SidedModifierExpansion {
    fn expand(&self, spec: InputSpec) -> Vec<InputSpec> {
        let groups = [
            (Modifiers::SHIFT, Modifiers::LEFT_SHIFT, Modifiers::RIGHT_SHIFT),
            (
                Modifiers::CONTROL,
                Modifiers::LEFT_CONTROL,
                Modifiers::RIGHT_CONTROL,
            ),
            (Modifiers::ALT, Modifiers::LEFT_ALT, Modifiers::RIGHT_ALT),
            (Modifiers::SUPER, Modifiers::LEFT_SUPER, Modifiers::RIGHT_SUPER),
        ];

        let mut variants = vec![spec.modifiers];
        for (both, left, right) in groups {
            if !spec.modifiers.contains(both) {
                continue;
            }
            variants = variants
                .into_iter()
                .flat_map(|m| {
                    let rest = m.without(both);
                    [m, rest | left, rest | right]
                })
                .collect();
        }

        variants
            .into_iter()
            .map(|modifiers| InputSpec { modifiers, ..spec })
            .collect()
    }
}

/// The table mapping input signatures to actions.
#[derive(Clone)]
pub struct BindingTable {
    map: HashMap<InputSpec, Action>,
    expander: Arc<dyn BindingExpander>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new(ExactBinding)
    }
}

impl fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("bindings", &self.map.len())
            .field("expander", &"<strategy>")
            .finish()
    }
}

impl BindingTable {
    /// An empty table using the given modifier expansion strategy.
    pub fn new(expander: impl BindingExpander) -> Self {
        Self {
            map: HashMap::new(),
            expander: Arc::new(expander),
        }
    }

    /// Replace the expansion strategy used by future [`bind`](Self::bind) calls.
    pub fn set_expander(&mut self, expander: impl BindingExpander) {
        self.expander = Arc::new(expander);
    }

    /// Insert or overwrite a binding.
    pub fn bind(&mut self, spec: InputSpec, action: Action) {
        for spec in self.expander.expand(spec) {
            self.map.insert(spec, action);
        }
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of registered table keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every registered binding, in [`InputSpec`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&InputSpec, &Action)> {
        let mut bindings: Vec<_> = self.map.iter().collect();
        bindings.sort_unstable_by(|a, b| a.0.cmp(b.0));
        bindings.into_iter()
    }

    /// Bind a drag with the given buttons held.
    pub fn bind_mouse(
        &mut self,
        kind: ActionType,
        buttons: ButtonMask,
        modifiers: Modifiers,
        options: ActionOptions,
    ) {
        self.bind(
            InputSpec::new(EventKind::Drag, InputMask::Buttons(buttons), modifiers),
            Action::new(kind, options),
        );
    }

    /// Bind a click with the given buttons.
    pub fn bind_mouse_click(
        &mut self,
        kind: ActionType,
        buttons: ButtonMask,
        modifiers: Modifiers,
        options: ActionOptions,
    ) {
        self.bind(
            InputSpec::new(EventKind::Click, InputMask::Buttons(buttons), modifiers),
            Action::new(kind, options),
        );
    }

    /// Bind a double click with the given buttons.
    pub fn bind_mouse_double_click(
        &mut self,
        kind: ActionType,
        buttons: ButtonMask,
        modifiers: Modifiers,
        options: ActionOptions,
    ) {
        self.bind(
            InputSpec::new(EventKind::DoubleClick, InputMask::Buttons(buttons), modifiers),
            Action::new(kind, options),
        );
    }

    /// Bind a key press.
    pub fn bind_key(
        &mut self,
        kind: ActionType,
        key: KeyCode,
        modifiers: Modifiers,
        options: ActionOptions,
    ) {
        self.bind(
            InputSpec::new(EventKind::KeyDown, InputMask::Key(key), modifiers),
            Action::new(kind, options),
        );
    }

    /// Bind a scroll in the given direction.
    pub fn bind_scroll(
        &mut self,
        kind: ActionType,
        direction: ScrollDirection,
        modifiers: Modifiers,
        options: ActionOptions,
    ) {
        self.bind(
            InputSpec::new(EventKind::Scroll, InputMask::Scroll(direction), modifiers),
            Action::new(kind, options),
        );
    }

    /// Bind the two-finger pinch gesture.
    pub fn bind_pinch(&mut self, kind: ActionType, options: ActionOptions) {
        self.bind(
            InputSpec::new(EventKind::Pinch, InputMask::None, Modifiers::NONE),
            Action::new(kind, options),
        );
    }

    /// Bind the two-finger twist gesture.
    pub fn bind_twist(&mut self, kind: ActionType, options: ActionOptions) {
        self.bind(
            InputSpec::new(EventKind::Twist, InputMask::None, Modifiers::NONE),
            Action::new(kind, options),
        );
    }

    /// Bind the two-finger drag gesture.
    pub fn bind_multi_drag(&mut self, kind: ActionType, options: ActionOptions) {
        self.bind(
            InputSpec::new(EventKind::MultiDrag, InputMask::None, Modifiers::NONE),
            Action::new(kind, options),
        );
    }

    /// Resolve an input to its bound action. Lock keys are ignored.
    pub fn action(&self, event: EventKind, input: InputMask, modifiers: Modifiers) -> Action {
        let spec = InputSpec::new(event, input, modifiers.without_locks());
        match self.map.get(&spec) {
            Some(action) => *action,
            None => {
                trace!("No binding for {spec:?}");
                Action::NULL
            }
        }
    }

    /// The stock navigation bindings.
    ///
    /// Modifier bindings match either side of the keyboard.
    pub fn with_default_bindings() -> Self {
        let mut table = Self::new(SidedModifierExpansion);
        let none = Modifiers::NONE;
        let plain = ActionOptions::default();

        table.bind_key(ActionType::Home, KeyCode::Space, none, plain);

        let zoom_drag = ActionOptions::default()
            .with_continuous(true)
            .with_scale_y(5.0);
        table.bind_mouse(ActionType::Zoom, ButtonMask::RIGHT, none, zoom_drag);
        table.bind_mouse(
            ActionType::Zoom,
            ButtonMask::RIGHT,
            Modifiers::CONTROL,
            zoom_drag,
        );

        table.bind_mouse(ActionType::Pan, ButtonMask::LEFT, none, plain);

        let rotate_drag = zoom_drag.with_scale(9.0, 9.0);
        table.bind_mouse(ActionType::Rotate, ButtonMask::MIDDLE, none, plain);
        table.bind_mouse(
            ActionType::Rotate,
            ButtonMask::LEFT | ButtonMask::RIGHT,
            none,
            plain,
        );
        table.bind_mouse(
            ActionType::Rotate,
            ButtonMask::MIDDLE,
            Modifiers::CONTROL,
            rotate_drag,
        );
        table.bind_mouse(
            ActionType::Rotate,
            ButtonMask::LEFT,
            Modifiers::CONTROL,
            rotate_drag,
        );

        table.bind_scroll(ActionType::ZoomIn, ScrollDirection::Up, none, plain);
        table.bind_scroll(ActionType::ZoomOut, ScrollDirection::Down, none, plain);

        table.bind_key(ActionType::PanLeft, KeyCode::ArrowLeft, none, plain);
        table.bind_key(ActionType::PanRight, KeyCode::ArrowRight, none, plain);
        table.bind_key(ActionType::PanUp, KeyCode::ArrowUp, none, plain);
        table.bind_key(ActionType::PanDown, KeyCode::ArrowDown, none, plain);

        table.bind_mouse_double_click(
            ActionType::Goto,
            ButtonMask::LEFT,
            none,
            ActionOptions::default().with_goto_range_factor(0.4),
        );
        table.bind_mouse_double_click(
            ActionType::Goto,
            ButtonMask::RIGHT,
            none,
            ActionOptions::default().with_goto_range_factor(2.5),
        );

        table.bind_pinch(ActionType::Zoom, plain);
        table.bind_twist(ActionType::Rotate, plain);
        table.bind_multi_drag(ActionType::Rotate, plain);

        table.bind_key(ActionType::ToggleProjection, KeyCode::KeyP, none, plain);

        table
    }
}
