//! Live-tunable options and the control panel that edits them
//!
//! Each numeric control clamps to its declared range and snaps to its step
//! before the value is stored and written into the scene. No other
//! validation happens.

use crate::scene::{Color, ObjectId, SceneGraph, SceneObject};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Control panel errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// No control has that name
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// The control exists but holds another kind of value
    #[error("Option '{name}' is not a {expected} control")]
    WrongKind {
        /// Control name
        name: OptionName,
        /// Kind the caller assumed
        expected: &'static str,
    },
}

/// The fixed set of tunable options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    /// Oscillation speed of the hover sphere
    Speed,
    /// Hover sphere X position
    X,
    /// Hover sphere base Y position
    Y,
    /// Hover sphere Z position
    Z,
    /// Hover sphere default colour
    SphereColor,
    /// Hover sphere wireframe toggle
    Wireframe,
}

impl OptionName {
    /// Every option, in panel order
    pub const ALL: [Self; 6] = [Self::Speed, Self::X, Self::Y, Self::Z, Self::SphereColor, Self::Wireframe];

    /// Name shown on the panel
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::SphereColor => "sphereColor",
            Self::Wireframe => "wireframe",
        }
    }

    /// Range and step of a numeric option
    pub const fn numeric(self) -> Option<NumericControl> {
        match self {
            Self::Speed => Some(NumericControl::new(0.0, 0.1, 0.01)),
            Self::X | Self::Y | Self::Z => Some(NumericControl::new(0.0, 10.0, 0.01)),
            Self::SphereColor | Self::Wireframe => None,
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ControlError::UnknownOption(s.to_string()))
    }
}

/// A slider: closed range plus step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericControl {
    /// Lowest value
    pub min: f32,
    /// Highest value
    pub max: f32,
    /// Granularity
    pub step: f32,
}

impl NumericControl {
    /// Declare a slider
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp into range, then snap to the nearest step
    pub fn apply(&self, value: f32) -> f32 {
        let clamped = if value.is_nan() { self.min } else { value.clamp(self.min, self.max) };
        if self.step > 0.0 {
            ((clamped / self.step).round() * self.step).clamp(self.min, self.max)
        } else {
            clamped
        }
    }
}

/// Current values of the tunable options
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Hover sphere default colour
    pub sphere_color: Color,
    /// Hover sphere wireframe toggle
    pub wireframe: bool,
    /// Hover sphere X position
    pub x: f32,
    /// Hover sphere base Y position
    pub y: f32,
    /// Hover sphere Z position
    pub z: f32,
    /// Oscillation speed
    pub speed: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sphere_color: Color::RED,
            wireframe: false,
            x: 4.0,
            y: 2.0,
            z: 4.0,
            speed: 0.01,
        }
    }
}

impl Options {
    /// Current value of a numeric option
    pub fn number(&self, name: OptionName) -> Option<f32> {
        match name {
            OptionName::Speed => Some(self.speed),
            OptionName::X => Some(self.x),
            OptionName::Y => Some(self.y),
            OptionName::Z => Some(self.z),
            OptionName::SphereColor | OptionName::Wireframe => None,
        }
    }
}

/// Colours the panel cycles through
const PALETTE: [Color; 6] = [
    Color::RED,
    Color::from_hex(0xff8800),
    Color::from_hex(0xffff00),
    Color::GREEN,
    Color::from_hex(0x00ffff),
    Color::from_hex(0xff00ff),
];

/// Panel bound to one scene object
#[derive(Debug, Clone)]
pub struct ControlPanel {
    options: Options,
    target: ObjectId,
}

impl ControlPanel {
    /// Panel editing `target`
    pub fn new(target: ObjectId, options: Options) -> Self {
        Self { options, target }
    }

    /// Current values
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Object the panel writes into
    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// Set a numeric option; returns the stored value after clamping and snapping
    pub fn set_number(&mut self, name: OptionName, value: f32, scene: &mut SceneGraph) -> Result<f32, ControlError> {
        let wrong_kind = ControlError::WrongKind {
            name,
            expected: "numeric",
        };
        let control = name.numeric().ok_or_else(|| wrong_kind.clone())?;
        let (slot, axis) = match name {
            OptionName::Speed => (&mut self.options.speed, None),
            OptionName::X => (&mut self.options.x, Some(0)),
            OptionName::Y => (&mut self.options.y, Some(1)),
            OptionName::Z => (&mut self.options.z, Some(2)),
            OptionName::SphereColor | OptionName::Wireframe => return Err(wrong_kind),
        };

        let value = control.apply(value);
        *slot = value;
        if let (Some(axis), Some(object)) = (axis, scene.get_mut(self.target)) {
            object.transform.position[axis] = value;
        }

        log::debug!("Option {} = {}", name, value);
        Ok(value)
    }

    /// Move a numeric option by whole steps
    pub fn nudge(&mut self, name: OptionName, steps: i32, scene: &mut SceneGraph) -> Result<f32, ControlError> {
        let (Some(control), Some(current)) = (name.numeric(), self.options.number(name)) else {
            return Err(ControlError::WrongKind {
                name,
                expected: "numeric",
            });
        };
        #[allow(clippy::cast_precision_loss)]
        let delta = control.step * steps as f32;
        self.set_number(name, current + delta, scene)
    }

    /// Set the target's colour
    pub fn set_color(&mut self, color: Color, scene: &mut SceneGraph) {
        self.options.sphere_color = color;
        if let Some(material) = scene.get_mut(self.target).and_then(SceneObject::material_mut) {
            material.color = color;
        }
        log::debug!("Option {} = {}", OptionName::SphereColor, color);
    }

    /// Advance the colour through a fixed palette
    pub fn cycle_color(&mut self, scene: &mut SceneGraph) -> Color {
        let next = PALETTE
            .iter()
            .position(|c| *c == self.options.sphere_color)
            .map_or(PALETTE[0], |i| PALETTE[(i + 1) % PALETTE.len()]);
        self.set_color(next, scene);
        next
    }

    /// Set the target's wireframe flag
    pub fn set_wireframe(&mut self, wireframe: bool, scene: &mut SceneGraph) {
        self.options.wireframe = wireframe;
        if let Some(material) = scene.get_mut(self.target).and_then(SceneObject::material_mut) {
            material.wireframe = wireframe;
        }
        log::debug!("Option {} = {}", OptionName::Wireframe, wireframe);
    }

    /// Flip the wireframe flag
    pub fn toggle_wireframe(&mut self, scene: &mut SceneGraph) -> bool {
        let wireframe = !self.options.wireframe;
        self.set_wireframe(wireframe, scene);
        wireframe
    }
}
