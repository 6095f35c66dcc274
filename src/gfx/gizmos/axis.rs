//! The three world axes a translation handle can be dragged along.

use cgmath::Vector3;

use crate::gfx::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit direction of the axis
    pub fn direction(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Handle color: X red, Y green, Z blue
    pub fn color(&self) -> Color {
        match self {
            Axis::X => Color::new(255, 0, 0),
            Axis::Y => Color::new(0, 255, 0),
            Axis::Z => Color::new(0, 0, 255),
        }
    }
}
