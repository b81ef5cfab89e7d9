use glam::Vec2;
use log::{debug, trace};

use crate::animation::{AnalyticSpringRunner, Spring, SpringRunner, SpringStatus};
use crate::outline::{Bounds, ControlPointModel, ControlPoints, DEFAULT_OVERSHOOT_AMOUNT};
use crate::path::{build_path, ElasticPath};
use crate::ticker::{FrameTicker, ManualTicker};

/// Linear RGBA, 0..1.
pub type Rgba = [f32; 4];

pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Alpha at or below zero, or not a number.
pub fn is_transparent(color: Rgba) -> bool {
    let alpha = color[3];
    alpha.is_nan() || alpha <= 0.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Control points pushed outward after a touch.
    Overshoot,
    /// Springing back to rest.
    Settle,
}

/// What a toolkit binding forwards its native lifecycle hooks into.
pub trait ElasticSurface {
    fn layout(&mut self, bounds: Bounds);

    /// Returns whether the touch started an animation.
    fn touch_down(&mut self) -> bool;

    /// One display frame. Returns the rebuilt path, or `None` when idle.
    fn frame(&mut self, dt: f32) -> Option<&ElasticPath>;
}

pub struct ElasticView<R = AnalyticSpringRunner, T = ManualTicker> {
    bounds: Bounds,
    points: ControlPointModel,
    path: ElasticPath,
    phase: Phase,
    overshoot_amount: f32,
    overshoot_spring: Spring,
    settle_spring: Spring,
    fill_color: Option<Rgba>,
    background_color: Rgba,
    runner: R,
    ticker: T,
}

impl ElasticView {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_parts(bounds, AnalyticSpringRunner::new(), ManualTicker::new())
    }
}

impl<R: SpringRunner, T: FrameTicker> ElasticView<R, T> {
    pub fn with_parts(bounds: Bounds, runner: R, ticker: T) -> Self {
        let points = ControlPointModel::new(&bounds);
        let path = build_path(points.positions(), &bounds);
        Self {
            bounds,
            points,
            path,
            phase: Phase::Idle,
            overshoot_amount: DEFAULT_OVERSHOOT_AMOUNT,
            overshoot_spring: Spring::OVERSHOOT,
            settle_spring: Spring::SETTLE,
            fill_color: None,
            background_color: TRANSPARENT,
            runner,
            ticker,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn overshoot_amount(&self) -> f32 {
        self.overshoot_amount
    }

    /// Takes effect on the next touch. Negative values bend the edges inward.
    pub fn set_overshoot_amount(&mut self, amount: f32) {
        self.overshoot_amount = amount;
    }

    pub fn overshoot_spring(&self) -> Spring {
        self.overshoot_spring
    }

    pub fn settle_spring(&self) -> Spring {
        self.settle_spring
    }

    pub fn set_springs(&mut self, overshoot: Spring, settle: Spring) {
        self.overshoot_spring = overshoot;
        self.settle_spring = settle;
    }

    /// Colour the outline is filled with. `None` until a visible colour is set.
    pub fn fill_color(&self) -> Option<Rgba> {
        self.fill_color
    }

    /// The view's own rectangular background. Always transparent so only the
    /// outline shows.
    pub fn background_color(&self) -> Rgba {
        self.background_color
    }

    /// A visible colour becomes the outline fill. A transparent one leaves the
    /// fill as it was.
    pub fn set_background_color(&mut self, color: Rgba) {
        if !is_transparent(color) {
            self.fill_color = Some(color);
        }
        self.background_color = TRANSPARENT;
    }

    pub fn rest_points(&self) -> &ControlPoints {
        self.points.rest()
    }

    /// Where the control points are set to go, not where they are drawn.
    pub fn model_points(&self) -> &ControlPoints {
        self.points.positions()
    }

    /// Where the control points are drawn this frame.
    pub fn presented_points(&self) -> ControlPoints {
        if self.is_animating() {
            if let Some(live) = self.runner.presentation() {
                return live;
            }
        }
        *self.points.positions()
    }

    pub fn path(&self) -> &ElasticPath {
        &self.path
    }

    /// The view never takes input; whatever sits underneath handles it.
    pub fn hit_test(&self, _point: Vec2) -> bool {
        false
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    fn rebuild_path(&mut self) {
        self.path = build_path(&self.presented_points(), &self.bounds);
    }

    fn begin_overshoot(&mut self) {
        let from = self.presented_points();
        let to = self.points.overshoot_targets(self.overshoot_amount);
        debug!(
            "elastic: overshoot by {} ({}s, damping {})",
            self.overshoot_amount, self.overshoot_spring.duration, self.overshoot_spring.damping
        );

        self.ticker.start();
        self.phase = Phase::Overshoot;
        self.points.set_positions(to);
        self.runner.run_spring(from, to, self.overshoot_spring);
    }

    fn begin_settle(&mut self) {
        let from = self
            .runner
            .presentation()
            .unwrap_or(*self.points.positions());
        // rest is read now so bounds changes during overshoot are honoured
        let to = *self.points.rest();
        debug!("elastic: settling back to rest");

        self.phase = Phase::Settle;
        self.points.set_positions(to);
        self.runner.run_spring(from, to, self.settle_spring);
    }

    fn finish(&mut self) {
        debug!("elastic: animation finished");
        self.ticker.stop();
        self.phase = Phase::Idle;
        self.points.snap_to_rest();
        self.path = build_path(self.points.rest(), &self.bounds);
    }
}

impl<R: SpringRunner, T: FrameTicker> ElasticSurface for ElasticView<R, T> {
    fn layout(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        let animating = self.is_animating();
        self.points.layout_rest_positions(&bounds, animating);
        self.rebuild_path();
    }

    fn touch_down(&mut self) -> bool {
        if self.is_animating() {
            debug!("elastic: touch ignored during {:?}", self.phase);
            return false;
        }
        self.begin_overshoot();
        true
    }

    fn frame(&mut self, dt: f32) -> Option<&ElasticPath> {
        if !self.is_animating() {
            return None;
        }

        let status = self.runner.advance(dt);
        self.rebuild_path();
        trace!("elastic: frame {:?} {:?}", self.phase, status);

        if status == SpringStatus::Finished {
            match self.phase {
                Phase::Overshoot => self.begin_settle(),
                Phase::Settle => self.finish(),
                Phase::Idle => {}
            }
        }

        Some(&self.path)
    }
}
