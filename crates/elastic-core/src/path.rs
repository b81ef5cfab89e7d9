use glam::Vec2;
use lyon_path::math::point;
use lyon_tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use crate::error::ElasticError;
use crate::outline::{Bounds, ControlPoints, Edge};

/// Default flattening tolerance, in the same units as the bounds.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadSegment {
    pub from: Vec2,
    pub ctrl: Vec2,
    pub to: Vec2,
}

impl QuadSegment {
    pub fn point_at(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        self.from * (mt * mt) + self.ctrl * (2.0 * mt * t) + self.to * (t * t)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElasticPath {
    /// Segments in drawing order: top, right, bottom, left.
    pub segments: [QuadSegment; 4],
}

/// Build the outline for `bounds` bent by `points`.
pub fn build_path(points: &ControlPoints, bounds: &Bounds) -> ElasticPath {
    let segments = Edge::ALL.map(|edge| {
        let (from, to) = edge.corners(bounds);
        QuadSegment {
            from,
            ctrl: points[edge],
            to,
        }
    });
    ElasticPath { segments }
}

impl ElasticPath {
    /// Outline of `bounds` with every control point at rest.
    pub fn rest(bounds: &Bounds) -> Self {
        build_path(&ControlPoints::rest_for(bounds), bounds)
    }

    pub fn start(&self) -> Vec2 {
        self.segments[0].from
    }

    pub fn segment(&self, edge: Edge) -> &QuadSegment {
        &self.segments[edge_index(edge)]
    }

    pub fn point_at(&self, edge: Edge, t: f32) -> Vec2 {
        self.segment(edge).point_at(t)
    }

    /// Polyline approximation, `segments_per_edge` steps per curve.
    /// The closing point is not repeated.
    pub fn flatten(&self, segments_per_edge: usize) -> Vec<Vec2> {
        let steps = segments_per_edge.max(1);
        let mut points = Vec::with_capacity(steps * 4);
        for segment in &self.segments {
            for i in 0..steps {
                points.push(segment.point_at(i as f32 / steps as f32));
            }
        }
        points
    }

    /// Bounding box of the segment end and control points. Contains the curve.
    pub fn control_bounds(&self) -> Bounds {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for segment in &self.segments {
            for p in [segment.from, segment.ctrl, segment.to] {
                min = min.min(p);
                max = max.max(p);
            }
        }
        Bounds {
            origin: min,
            size: max - min,
        }
    }

    pub fn to_lyon_path(&self) -> lyon_path::Path {
        let mut builder = lyon_path::Path::builder();
        let start = self.start();
        builder.begin(point(start.x, start.y));
        for segment in &self.segments {
            builder.quadratic_bezier_to(
                point(segment.ctrl.x, segment.ctrl.y),
                point(segment.to.x, segment.to.y),
            );
        }
        builder.close();
        builder.build()
    }

    /// Fill-tessellate the outline into triangles.
    pub fn tessellate(&self, tolerance: f32) -> Result<ShapeMesh, ElasticError> {
        let path = self.to_lyon_path();
        let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
        let mut tessellator = FillTessellator::new();
        tessellator.tessellate_path(
            &path,
            &FillOptions::tolerance(tolerance),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                vertex.position().to_array()
            }),
        )?;
        Ok(ShapeMesh {
            vertices: buffers.vertices,
            indices: buffers.indices,
        })
    }
}

fn edge_index(edge: Edge) -> usize {
    match edge {
        Edge::Top => 0,
        Edge::Right => 1,
        Edge::Bottom => 2,
        Edge::Left => 3,
    }
}

/// Triangle list produced by [`ElasticPath::tessellate`].
#[derive(Clone, Debug, Default)]
pub struct ShapeMesh {
    pub vertices: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl ShapeMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]].map(|i| Vec2::from_array(self.vertices[i as usize])))
    }

    /// Total covered area.
    pub fn area(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| (b - a).perp_dot(c - a).abs() * 0.5)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rest_path_runs_through_corners() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let path = ElasticPath::rest(&bounds);

        assert_eq!(path.start(), bounds.top_left());
        assert_eq!(path.point_at(Edge::Top, 1.0), bounds.top_right());
        assert_eq!(path.point_at(Edge::Right, 1.0), bounds.bottom_right());
        assert_eq!(path.point_at(Edge::Bottom, 1.0), bounds.bottom_left());
        assert_eq!(path.point_at(Edge::Left, 1.0), bounds.top_left());
    }

    #[test]
    fn rest_path_edges_are_straight() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let path = ElasticPath::rest(&bounds);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert_relative_eq!(path.point_at(Edge::Top, t).y, 0.0);
            assert_relative_eq!(path.point_at(Edge::Right, t).x, 100.0, epsilon = 1e-4);
            assert_relative_eq!(path.point_at(Edge::Bottom, t).y, 40.0, epsilon = 1e-4);
            assert_relative_eq!(path.point_at(Edge::Left, t).x, 0.0);
        }
    }

    #[test]
    fn square_rest_path_is_symmetric() {
        let bounds = Bounds::from_size(50.0, 50.0);
        let path = ElasticPath::rest(&bounds);
        let center = Vec2::splat(25.0);
        for i in 0..=8 {
            let t = i as f32 / 8.0;
            let top = path.point_at(Edge::Top, t) - center;
            let right = path.point_at(Edge::Right, t) - center;
            // a quarter turn clockwise maps the top edge onto the right edge
            assert_relative_eq!(right.x, -top.y, epsilon = 1e-4);
            assert_relative_eq!(right.y, top.x, epsilon = 1e-4);
        }
    }

    #[test]
    fn displaced_handle_bulges_its_edge() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let points = ControlPoints::rest_for(&bounds).displaced(10.0);
        let path = build_path(&points, &bounds);

        // a quadratic reaches half its handle offset at t = 0.5
        assert_relative_eq!(path.point_at(Edge::Top, 0.5).y, -5.0);
        assert_relative_eq!(path.point_at(Edge::Right, 0.5).x, 105.0);
        assert_relative_eq!(path.point_at(Edge::Bottom, 0.5).y, 45.0);
        assert_relative_eq!(path.point_at(Edge::Left, 0.5).x, -5.0);
    }

    #[test]
    fn flatten_starts_at_top_left_without_repeating_it() {
        let path = ElasticPath::rest(&Bounds::from_size(10.0, 10.0));
        let points = path.flatten(4);
        assert_eq!(points.len(), 16);
        assert_eq!(points[0], Vec2::ZERO);
        assert_eq!(points[4], Vec2::new(10.0, 0.0));
        assert_ne!(points[15], Vec2::ZERO);
    }

    #[test]
    fn control_bounds_cover_overshoot() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let path = build_path(&ControlPoints::rest_for(&bounds).displaced(10.0), &bounds);
        let outer = path.control_bounds();
        assert_eq!(outer.origin, Vec2::new(-10.0, -10.0));
        assert_eq!(outer.size, Vec2::new(120.0, 60.0));
    }

    #[test]
    fn rest_mesh_covers_the_boundary() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let mesh = ElasticPath::rest(&bounds).tessellate(DEFAULT_TOLERANCE).unwrap();
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert_relative_eq!(mesh.area(), 4000.0, epsilon = 0.5);
    }

    #[test]
    fn bulged_mesh_is_larger_than_rest() {
        let bounds = Bounds::from_size(100.0, 40.0);
        let bulged = build_path(&ControlPoints::rest_for(&bounds).displaced(10.0), &bounds);
        let mesh = bulged.tessellate(0.01).unwrap();
        // each bulge adds 2/3 * base * height of a parabolic segment
        let expected = 4000.0 + 2.0 * (2.0 / 3.0) * (100.0 * 5.0 + 40.0 * 5.0);
        assert_relative_eq!(mesh.area(), expected, epsilon = 5.0);
    }
}
