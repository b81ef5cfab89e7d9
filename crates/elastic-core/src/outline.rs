use std::ops::{Index, IndexMut};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default distance each control point travels outward on touch-down.
pub const DEFAULT_OVERSHOOT_AMOUNT: f32 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.x * 0.5
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn mid_y(&self) -> f32 {
        self.origin.y + self.size.y * 0.5
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.min_x(), self.min_y())
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.max_x(), self.min_y())
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.max_x(), self.max_y())
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min_x(), self.max_y())
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// The same rectangle moved so its origin is zero.
    pub fn local(&self) -> Self {
        Self {
            origin: Vec2::ZERO,
            size: self.size,
        }
    }
}

/// One side of the boundary, in clockwise order starting at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Unit vector pointing away from the boundary.
    pub fn outward(self) -> Vec2 {
        match self {
            Edge::Top => Vec2::NEG_Y,
            Edge::Right => Vec2::X,
            Edge::Bottom => Vec2::Y,
            Edge::Left => Vec2::NEG_X,
        }
    }

    /// Corners joined by this edge's curve, in drawing order.
    pub fn corners(self, bounds: &Bounds) -> (Vec2, Vec2) {
        match self {
            Edge::Top => (bounds.top_left(), bounds.top_right()),
            Edge::Right => (bounds.top_right(), bounds.bottom_right()),
            Edge::Bottom => (bounds.bottom_right(), bounds.bottom_left()),
            Edge::Left => (bounds.bottom_left(), bounds.top_left()),
        }
    }

    /// Midpoint of this edge on `bounds`, which is where its control point rests.
    pub fn midpoint(self, bounds: &Bounds) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(bounds.mid_x(), bounds.min_y()),
            Edge::Right => Vec2::new(bounds.max_x(), bounds.mid_y()),
            Edge::Bottom => Vec2::new(bounds.mid_x(), bounds.max_y()),
            Edge::Left => Vec2::new(bounds.min_x(), bounds.mid_y()),
        }
    }
}

/// A value per edge. Used for positions, whether rest, target or live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    pub top: Vec2,
    pub right: Vec2,
    pub bottom: Vec2,
    pub left: Vec2,
}

impl ControlPoints {
    pub fn from_fn(mut f: impl FnMut(Edge) -> Vec2) -> Self {
        Self {
            top: f(Edge::Top),
            right: f(Edge::Right),
            bottom: f(Edge::Bottom),
            left: f(Edge::Left),
        }
    }

    /// Edge midpoints of `bounds`.
    pub fn rest_for(bounds: &Bounds) -> Self {
        Self::from_fn(|edge| edge.midpoint(bounds))
    }

    pub fn map(&self, mut f: impl FnMut(Edge, Vec2) -> Vec2) -> Self {
        Self::from_fn(|edge| f(edge, self[edge]))
    }

    /// Per-point linear interpolation. `t` is not clamped so spring
    /// overshoot past the target carries through.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        self.map(|edge, from| from + (other[edge] - from) * t)
    }

    /// Every point pushed `amount` along its edge's outward axis.
    pub fn displaced(&self, amount: f32) -> Self {
        self.map(|edge, p| p + edge.outward() * amount)
    }
}

impl Index<Edge> for ControlPoints {
    type Output = Vec2;

    fn index(&self, edge: Edge) -> &Vec2 {
        match edge {
            Edge::Top => &self.top,
            Edge::Right => &self.right,
            Edge::Bottom => &self.bottom,
            Edge::Left => &self.left,
        }
    }
}

impl IndexMut<Edge> for ControlPoints {
    fn index_mut(&mut self, edge: Edge) -> &mut Vec2 {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        }
    }
}

/// Rest and model positions of the four control points.
///
/// `positions` is what the points are set to: equal to `rest` when idle, or
/// the target of the running spring while animating. The live value the
/// spring is currently showing is owned by the spring runner, not here.
#[derive(Clone, Debug, Default)]
pub struct ControlPointModel {
    rest: ControlPoints,
    positions: ControlPoints,
}

impl ControlPointModel {
    pub fn new(bounds: &Bounds) -> Self {
        let rest = ControlPoints::rest_for(bounds);
        Self {
            rest,
            positions: rest,
        }
    }

    /// Recompute rest positions from `bounds`.
    ///
    /// When `animating` the model positions are left alone so the running
    /// spring keeps its targets.
    pub fn layout_rest_positions(&mut self, bounds: &Bounds, animating: bool) {
        self.rest = ControlPoints::rest_for(bounds);
        if !animating {
            self.positions = self.rest;
        }
    }

    pub fn rest(&self) -> &ControlPoints {
        &self.rest
    }

    pub fn positions(&self) -> &ControlPoints {
        &self.positions
    }

    pub fn set_positions(&mut self, positions: ControlPoints) {
        self.positions = positions;
    }

    pub fn snap_to_rest(&mut self) {
        self.positions = self.rest;
    }

    /// Current model positions pushed outward by `amount`.
    pub fn overshoot_targets(&self, amount: f32) -> ControlPoints {
        self.positions.displaced(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_positions_sit_on_edge_midpoints() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let model = ControlPointModel::new(&bounds);
        let rest = model.rest();
        assert_eq!(rest.top, Vec2::new(50.0, 0.0));
        assert_eq!(rest.right, Vec2::new(100.0, 20.0));
        assert_eq!(rest.bottom, Vec2::new(50.0, 40.0));
        assert_eq!(rest.left, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn rest_positions_follow_offset_bounds() {
        let bounds = Bounds::new(10.0, 5.0, 20.0, 10.0);
        let rest = ControlPoints::rest_for(&bounds);
        assert_eq!(rest.top, Vec2::new(20.0, 5.0));
        assert_eq!(rest.right, Vec2::new(30.0, 10.0));
        assert_eq!(rest.bottom, Vec2::new(20.0, 15.0));
        assert_eq!(rest.left, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn layout_is_idempotent() {
        let bounds = Bounds::from_size(64.0, 30.0);
        let mut model = ControlPointModel::default();
        model.layout_rest_positions(&bounds, false);
        let first = model.clone();
        model.layout_rest_positions(&bounds, false);
        assert_eq!(first.rest(), model.rest());
        assert_eq!(first.positions(), model.positions());
    }

    #[test]
    fn layout_while_animating_keeps_positions() {
        let mut model = ControlPointModel::new(&Bounds::from_size(100.0, 40.0));
        let targets = model.overshoot_targets(10.0);
        model.set_positions(targets);

        model.layout_rest_positions(&Bounds::from_size(200.0, 80.0), true);

        assert_eq!(model.rest().right, Vec2::new(200.0, 40.0));
        assert_eq!(*model.positions(), targets);
    }

    #[test]
    fn overshoot_moves_along_each_axis() {
        let model = ControlPointModel::new(&Bounds::from_size(100.0, 40.0));
        let targets = model.overshoot_targets(10.0);
        assert_eq!(targets.top, Vec2::new(50.0, -10.0));
        assert_eq!(targets.right, Vec2::new(110.0, 20.0));
        assert_eq!(targets.bottom, Vec2::new(50.0, 50.0));
        assert_eq!(targets.left, Vec2::new(-10.0, 20.0));
    }

    #[test]
    fn lerp_extrapolates_past_one() {
        let a = ControlPoints::rest_for(&Bounds::from_size(10.0, 10.0));
        let b = a.displaced(10.0);
        let past = a.lerp(&b, 1.5);
        assert_eq!(past.top, Vec2::new(5.0, -15.0));
        assert_eq!(past.left, Vec2::new(-15.0, 5.0));
    }
}
