//! Per-target composition of scalar channel values into property updates.
//!
//! Position axes are gathered into one `Vec3` and Euler axes into one `Quat`.
//! Axes without a curve contribute 0. Morph weights pass straight through.

use glam::Vec3;

use crate::binding::Binding;
use crate::interp::functions::euler_to_quat;
use crate::outputs::PropertyUpdate;

/// Stack-only accumulator for one target; no allocation per tick.
#[derive(Clone, Debug, Default)]
pub struct PoseAccumulator {
    position: [f32; 3],
    has_position: bool,
    euler: [f32; 3],
    has_euler: bool,
    movement: Option<f32>,
    fov: Option<f32>,
}

impl PoseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a channel value. Morph weights are returned immediately as an
    /// update since they do not compose with other channels.
    #[inline]
    pub fn add(&mut self, binding: &Binding, value: f32) -> Option<PropertyUpdate> {
        match binding {
            Binding::Position(axis) => {
                self.position[axis.index()] = value;
                self.has_position = true;
            }
            Binding::Euler(axis) => {
                self.euler[axis.index()] = value;
                self.has_euler = true;
            }
            Binding::Move => self.movement = Some(value),
            Binding::Fov => self.fov = Some(value),
            Binding::Morph(name) => {
                return Some(PropertyUpdate::MorphWeight {
                    name: name.clone(),
                    weight: value,
                })
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        !self.has_position && !self.has_euler && self.movement.is_none() && self.fov.is_none()
    }

    /// Emit composed updates in application order: position, rotation, move, fov.
    pub fn finalize(self, mut emit: impl FnMut(PropertyUpdate)) {
        if self.has_position {
            emit(PropertyUpdate::LocalPosition(Vec3::from_array(self.position)));
        }
        if self.has_euler {
            emit(PropertyUpdate::LocalRotation(euler_to_quat(Vec3::from_array(
                self.euler,
            ))));
        }
        if let Some(d) = self.movement {
            emit(PropertyUpdate::Move(d));
        }
        if let Some(f) = self.fov {
            emit(PropertyUpdate::Fov(f));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Axis;
    use glam::Quat;

    #[test]
    fn composes_axes_and_orders_updates() {
        let mut acc = PoseAccumulator::new();
        assert!(acc.add(&Binding::Move, 5.0).is_none());
        acc.add(&Binding::Position(Axis::Z), 3.0);
        acc.add(&Binding::Position(Axis::X), 1.0);
        acc.add(&Binding::Euler(Axis::Y), 0.0);
        let mut out = Vec::new();
        acc.finalize(|u| out.push(u));
        assert_eq!(
            out,
            vec![
                PropertyUpdate::LocalPosition(Vec3::new(1.0, 0.0, 3.0)),
                PropertyUpdate::LocalRotation(Quat::IDENTITY),
                PropertyUpdate::Move(5.0),
            ]
        );
    }

    #[test]
    fn morph_passes_through() {
        let mut acc = PoseAccumulator::new();
        let update = acc.add(&Binding::Morph("blink".into()), 0.5);
        assert_eq!(
            update,
            Some(PropertyUpdate::MorphWeight {
                name: "blink".into(),
                weight: 0.5
            })
        );
        assert!(acc.is_empty());
    }
}
