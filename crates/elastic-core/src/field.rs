use glam::Vec2;

use crate::animation::{AnalyticSpringRunner, SpringRunner};
use crate::outline::{Bounds, DEFAULT_OVERSHOOT_AMOUNT};
use crate::path::ElasticPath;
use crate::ticker::{FrameTicker, ManualTicker};
use crate::view::{is_transparent, ElasticSurface, ElasticView, Rgba, TRANSPARENT};

pub struct ElasticTextField<R = AnalyticSpringRunner, T = ManualTicker> {
    bounds: Bounds,
    overshoot_amount: f32,
    background_color: Rgba,
    text: String,
    placeholder: String,
    elastic: ElasticView<R, T>,
}

impl ElasticTextField {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_view(ElasticView::new(bounds.local()), bounds)
    }
}

impl<R: SpringRunner, T: FrameTicker> ElasticTextField<R, T> {
    pub fn with_view(elastic: ElasticView<R, T>, bounds: Bounds) -> Self {
        let mut field = Self {
            bounds,
            overshoot_amount: DEFAULT_OVERSHOOT_AMOUNT,
            background_color: TRANSPARENT,
            text: String::new(),
            placeholder: String::new(),
            elastic,
        };
        field.elastic.set_overshoot_amount(field.overshoot_amount);
        field.elastic.layout(bounds.local());
        field
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn overshoot_amount(&self) -> f32 {
        self.overshoot_amount
    }

    pub fn set_overshoot_amount(&mut self, amount: f32) {
        self.overshoot_amount = amount;
        self.elastic.set_overshoot_amount(amount);
    }

    /// The field's own background, which stays transparent.
    pub fn background_color(&self) -> Rgba {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Rgba) {
        if !is_transparent(color) {
            self.elastic.set_background_color(color);
        }
        self.background_color = TRANSPARENT;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// `point` is in the same space as [`Self::bounds`].
    pub fn hit_test(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }

    pub fn elastic(&self) -> &ElasticView<R, T> {
        &self.elastic
    }

    pub fn elastic_mut(&mut self) -> &mut ElasticView<R, T> {
        &mut self.elastic
    }
}

impl<R: SpringRunner, T: FrameTicker> ElasticSurface for ElasticTextField<R, T> {
    /// Positions the field. The elastic view fills it exactly, in local space.
    fn layout(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.elastic.layout(bounds.local());
    }

    fn touch_down(&mut self) -> bool {
        self.elastic.touch_down()
    }

    fn frame(&mut self, dt: f32) -> Option<&ElasticPath> {
        self.elastic.frame(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Phase;

    #[test]
    fn elastic_view_fills_the_field() {
        let mut field = ElasticTextField::new(Bounds::new(20.0, 30.0, 100.0, 40.0));
        assert_eq!(field.elastic().bounds(), Bounds::from_size(100.0, 40.0));

        field.layout(Bounds::new(0.0, 0.0, 300.0, 44.0));
        assert_eq!(field.elastic().bounds(), Bounds::from_size(300.0, 44.0));
    }

    #[test]
    fn overshoot_amount_is_forwarded() {
        let mut field = ElasticTextField::new(Bounds::from_size(100.0, 40.0));
        assert_eq!(field.elastic().overshoot_amount(), DEFAULT_OVERSHOOT_AMOUNT);
        field.set_overshoot_amount(24.0);
        assert_eq!(field.overshoot_amount(), 24.0);
        assert_eq!(field.elastic().overshoot_amount(), 24.0);
    }

    #[test]
    fn background_colour_is_redirected() {
        let mut field = ElasticTextField::new(Bounds::from_size(100.0, 40.0));
        let blue = [0.1, 0.3, 0.9, 1.0];
        field.set_background_color(blue);
        assert_eq!(field.background_color(), TRANSPARENT);
        assert_eq!(field.elastic().fill_color(), Some(blue));
        assert_eq!(field.elastic().background_color(), TRANSPARENT);

        field.set_background_color(TRANSPARENT);
        assert_eq!(field.elastic().fill_color(), Some(blue));
    }

    #[test]
    fn touches_are_forwarded_and_field_stays_interactive() {
        let mut field = ElasticTextField::new(Bounds::new(10.0, 10.0, 100.0, 40.0));
        assert!(field.hit_test(Vec2::new(50.0, 30.0)));
        assert!(!field.hit_test(Vec2::new(5.0, 30.0)));

        assert!(field.touch_down());
        assert_eq!(field.elastic().phase(), Phase::Overshoot);
        assert!(!field.touch_down());
    }

    #[test]
    fn text_content_is_plain_storage() {
        let mut field = ElasticTextField::new(Bounds::from_size(100.0, 40.0));
        field.set_placeholder("Email");
        field.text_mut().push_str("hi@");
        field.set_text(format!("{}example.com", field.text()));
        assert_eq!(field.text(), "hi@example.com");
        assert_eq!(field.placeholder(), "Email");
    }
}
