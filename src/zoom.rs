//! Whole-view zoom
//!
//! The page scale is a pure visual transform of the composed view (ruler
//! and vector surface together). It never triggers layout or redraw.

use crate::config::TransformOrigin;
use crate::domain::{Bounds, PageScale, Point, ScaleState, Size, normalize_rect};

/// Receives the page scale whenever it changes
pub trait ZoomDisplay {
    /// `slider` is the rounded percentage, `label` the text form (`"110%"`)
    fn show_page_scale(&mut self, slider: u32, label: &str);
}

/// Uniform scale about an anchor of the composed view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub origin: TransformOrigin,
}

impl ViewTransform {
    /// Where `point` of the unscaled view appears after zooming
    pub fn map_point(&self, point: Point, view: Size) -> Point {
        let (ax, ay) = self.origin.anchor();
        let ox = ax * view.width as f64;
        let oy = ay * view.height as f64;
        Point::new(
            ox + (point.x - ox) * self.scale,
            oy + (point.y - oy) * self.scale,
        )
    }

    /// Visible extent of the zoomed view, in unscaled coordinates
    pub fn visual_bounds(&self, view: Size) -> Bounds {
        let top_left = self.map_point(Point::new(0.0, 0.0), view);
        let bottom_right = self.map_point(Point::new(view.width as f64, view.height as f64), view);
        normalize_rect(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }
}

#[derive(Clone, Copy, Debug)]
struct DragGesture {
    start: Point,
    start_scale: f64,
}

/// Sole writer of the page scale
#[derive(Debug)]
pub struct ZoomController {
    step: f64,
    sensitivity: f64,
    origin: TransformOrigin,
    drag: Option<DragGesture>,
}

impl ZoomController {
    pub fn new(step: f64, sensitivity: f64, origin: TransformOrigin) -> Self {
        Self {
            step,
            sensitivity,
            origin,
            drag: None,
        }
    }

    pub fn origin(&self) -> TransformOrigin {
        self.origin
    }

    pub fn set_origin(&mut self, origin: TransformOrigin) {
        log::debug!("Transform origin set to {}", origin.name());
        self.origin = origin;
    }

    pub fn transform(&self, scales: &ScaleState) -> ViewTransform {
        ViewTransform {
            scale: scales.page().get(),
            origin: self.origin,
        }
    }

    /// Set the page scale (clamped) and mirror it to the display
    pub fn set_page_scale<D: ZoomDisplay>(
        &self,
        scales: &mut ScaleState,
        value: f64,
        display: &mut D,
    ) -> PageScale {
        let scale = scales.set_page(value);
        let percent = scale.percent();
        display.show_page_scale(percent, &format!("{percent}%"));
        log::debug!("Page scale {} -> {}", value, scale.get());
        scale
    }

    pub fn zoom_in<D: ZoomDisplay>(&self, scales: &mut ScaleState, display: &mut D) -> PageScale {
        let next = scales.page().get() * self.step;
        self.set_page_scale(scales, next, display)
    }

    pub fn zoom_out<D: ZoomDisplay>(&self, scales: &mut ScaleState, display: &mut D) -> PageScale {
        let next = scales.page().get() / self.step;
        self.set_page_scale(scales, next, display)
    }

    pub fn reset<D: ZoomDisplay>(&self, scales: &mut ScaleState, display: &mut D) -> PageScale {
        self.set_page_scale(scales, 1.0, display)
    }

    /// Slider input in percent
    pub fn set_percent<D: ZoomDisplay>(
        &self,
        scales: &mut ScaleState,
        percent: f64,
        display: &mut D,
    ) -> PageScale {
        self.set_page_scale(scales, percent / 100.0, display)
    }

    /// Capture the scale at the start of a drag on the zoom handle
    pub fn begin_drag(&mut self, scales: &ScaleState, at: Point) {
        self.drag = Some(DragGesture {
            start: at,
            start_scale: scales.page().get(),
        });
    }

    /// Recompute the scale from the total pointer travel since `begin_drag`
    pub fn drag_to<D: ZoomDisplay>(
        &mut self,
        scales: &mut ScaleState,
        at: Point,
        display: &mut D,
    ) -> Option<PageScale> {
        let drag = self.drag?;
        let delta = ((at.x - drag.start.x) + (at.y - drag.start.y)) / self.sensitivity;
        Some(self.set_page_scale(scales, drag.start_scale * (1.0 + delta), display))
    }

    /// Finish the drag; the last computed scale stays
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingZoomDisplay {
        pub shown: Vec<(u32, String)>,
    }

    impl ZoomDisplay for RecordingZoomDisplay {
        fn show_page_scale(&mut self, slider: u32, label: &str) {
            self.shown.push((slider, label.to_string()));
        }
    }

    fn controller() -> ZoomController {
        ZoomController::new(1.1, 600.0, TransformOrigin::TopLeft)
    }

    #[test]
    fn test_set_page_scale_clamps() {
        let mut scales = ScaleState::default();
        let mut display = RecordingZoomDisplay::default();
        let zoom = controller();

        assert_eq!(zoom.set_page_scale(&mut scales, 1000.0, &mut display).get(), 5.0);
        assert_eq!(zoom.set_page_scale(&mut scales, 0.001, &mut display).get(), 0.05);
        assert_eq!(
            display.shown,
            vec![(500, "500%".to_string()), (5, "5%".to_string())]
        );
    }

    #[test]
    fn test_step_zoom_and_reset() {
        let mut scales = ScaleState::default();
        let mut display = RecordingZoomDisplay::default();
        let zoom = controller();

        zoom.zoom_in(&mut scales, &mut display);
        assert!((scales.page().get() - 1.1).abs() < 1e-12);
        zoom.zoom_out(&mut scales, &mut display);
        assert!((scales.page().get() - 1.0).abs() < 1e-12);
        zoom.set_percent(&mut scales, 250.0, &mut display);
        assert_eq!(scales.page().get(), 2.5);
        zoom.reset(&mut scales, &mut display);
        assert_eq!(scales.page().get(), 1.0);
        assert_eq!(display.shown.last().unwrap().1, "100%");
    }

    #[test]
    fn test_zoom_in_saturates() {
        let mut scales = ScaleState::default();
        let mut display = RecordingZoomDisplay::default();
        let zoom = controller();
        for _ in 0..100 {
            zoom.zoom_in(&mut scales, &mut display);
        }
        assert_eq!(scales.page().get(), 5.0);
    }

    #[test]
    fn test_drag_uses_scale_at_gesture_start() {
        let mut scales = ScaleState::default();
        let mut display = RecordingZoomDisplay::default();
        let mut zoom = controller();
        zoom.set_page_scale(&mut scales, 2.0, &mut display);

        assert_eq!(zoom.drag_to(&mut scales, Point::new(5.0, 5.0), &mut display), None);

        zoom.begin_drag(&scales, Point::new(100.0, 100.0));
        // +300 px total travel: 2.0 * (1 + 0.5)
        let scale = zoom.drag_to(&mut scales, Point::new(250.0, 250.0), &mut display);
        assert_eq!(scale.map(PageScale::get), Some(3.0));
        // moving back recomputes from the start, not from 3.0
        let scale = zoom.drag_to(&mut scales, Point::new(40.0, 100.0), &mut display);
        assert_eq!(scale.map(PageScale::get), Some(1.8));

        assert!(zoom.end_drag());
        assert!(!zoom.is_dragging());
        assert_eq!(scales.page().get(), 1.8);
        assert!(!zoom.end_drag());
    }

    #[test]
    fn test_drag_far_negative_clamps() {
        let mut scales = ScaleState::default();
        let mut display = RecordingZoomDisplay::default();
        let mut zoom = controller();
        zoom.begin_drag(&scales, Point::new(0.0, 0.0));
        let scale = zoom.drag_to(&mut scales, Point::new(-2000.0, 0.0), &mut display);
        assert_eq!(scale.map(PageScale::get), Some(0.05));
    }

    #[test]
    fn test_transform_origins() {
        let view = Size::new(100, 200);
        let top_left = ViewTransform {
            scale: 0.5,
            origin: TransformOrigin::TopLeft,
        };
        assert_eq!(
            top_left.visual_bounds(view),
            Bounds {
                left: 0.0,
                top: 0.0,
                right: 50.0,
                bottom: 100.0
            }
        );

        let center = ViewTransform {
            scale: 2.0,
            origin: TransformOrigin::Center,
        };
        assert_eq!(center.map_point(Point::new(50.0, 100.0), view), Point::new(50.0, 100.0));
        assert_eq!(
            center.visual_bounds(view),
            Bounds {
                left: -50.0,
                top: -100.0,
                right: 150.0,
                bottom: 300.0
            }
        );

        let bottom_right = ViewTransform {
            scale: 0.5,
            origin: TransformOrigin::BottomRight,
        };
        assert_eq!(
            bottom_right.map_point(Point::new(0.0, 0.0), view),
            Point::new(50.0, 100.0)
        );
    }
}
