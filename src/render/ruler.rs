//! Ruler strip rendering
//!
//! The ruler is planned first (which ticks, where, with which labels) and
//! then painted. The plan is deterministic, so painting the same plan twice
//! yields the same pixels.

use super::geometry::{FontStyle, LineStyle, palette, ruler};
use super::raster::RasterSurface;
use crate::config::RulerStyle;
use crate::domain::{AxisMapping, LabelInterval, RulerTick, Size};

/// Sizes derived from the ruler scale, each floored at its minimum
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RulerMetrics {
    pub size: Size,
    pub font_px: f32,
    pub major_tick: f32,
    pub minor_tick: f32,
    pub label_inset: f32,
}

fn scaled(base: f32, floor: f32, ruler_scale: f64) -> f32 {
    floor.max((base as f64 * ruler_scale).round() as f32)
}

impl RulerMetrics {
    pub fn new(style: &RulerStyle, size: Size, ruler_scale: f64) -> Self {
        Self {
            size,
            font_px: scaled(style.font_base, style.font_floor, ruler_scale),
            major_tick: scaled(style.major_tick_base, style.major_tick_floor, ruler_scale),
            minor_tick: scaled(style.minor_tick_base, style.minor_tick_floor, ruler_scale),
            label_inset: style.label_inset,
        }
    }

    /// Keep label text fully on the surface near the top and bottom edges
    pub fn label_y(&self, y: f32) -> f32 {
        let half = self.font_px / 2.0;
        y.max(half).min(self.size.height as f32 - half)
    }
}

/// One tick as it will be painted
#[derive(Clone, Debug, PartialEq)]
pub struct TickMark {
    pub value: i64,
    pub y: f32,
    pub emphasized: bool,
    /// Label text and its clamped vertical center
    pub label: Option<(String, f32)>,
}

impl TickMark {
    fn from_tick(tick: &RulerTick, metrics: &RulerMetrics) -> Self {
        let y = tick.y as f32;
        Self {
            value: tick.value,
            y,
            emphasized: tick.is_emphasized(),
            label: tick
                .is_labeled
                .then(|| (tick.value.to_string(), metrics.label_y(y))),
        }
    }
}

/// Every tick of one ruler frame, in paint order
#[derive(Clone, Debug, PartialEq)]
pub struct RulerPlan {
    pub metrics: RulerMetrics,
    pub marks: Vec<TickMark>,
    ticks: Vec<RulerTick>,
}

impl RulerPlan {
    /// Classify every integer of the range, then order the marks so plain
    /// ticks go down first, interval ticks next and the two boundaries last.
    pub fn build(mapping: &AxisMapping, interval: LabelInterval, metrics: RulerMetrics) -> Self {
        let bounds = mapping.bounds();
        let (min, max) = (bounds.min(), bounds.max());
        let ticks: Vec<RulerTick> = bounds
            .values()
            .map(|value| {
                RulerTick::classify(value, mapping.value_to_pixel(value), min, max, interval)
            })
            .collect();

        let plain = ticks.iter().filter(|tick| !tick.is_emphasized());
        let interior = ticks
            .iter()
            .filter(|tick| tick.is_emphasized() && !tick.is_boundary);
        let boundaries = ticks.first().into_iter().chain(ticks.last());
        let marks = plain
            .chain(interior)
            .chain(boundaries)
            .map(|tick| TickMark::from_tick(tick, &metrics))
            .collect();

        Self {
            metrics,
            marks,
            ticks,
        }
    }

    /// One classified tick per integer of the range, `min` first
    pub fn ticks(&self) -> &[RulerTick] {
        &self.ticks
    }

    /// Values that receive a label, in paint order
    pub fn labeled_values(&self) -> Vec<i64> {
        self.marks
            .iter()
            .filter(|mark| mark.label.is_some())
            .map(|mark| mark.value)
            .collect()
    }
}

/// Draws tick marks and labels onto the ruler surface
#[derive(Clone, Debug)]
pub struct RulerRenderer {
    style: RulerStyle,
}

impl RulerRenderer {
    pub fn new(style: RulerStyle) -> Self {
        Self { style }
    }

    /// Redraw the ruler. With no usable range the surface is left untouched.
    pub fn render<S: RasterSurface>(
        &self,
        surface: &mut S,
        mapping: Option<&AxisMapping>,
        interval: LabelInterval,
        ruler_scale: f64,
    ) -> Option<RulerPlan> {
        let mapping = mapping?;
        let metrics = RulerMetrics::new(&self.style, surface.size(), ruler_scale);
        let plan = RulerPlan::build(mapping, interval, metrics);
        paint(surface, &plan);
        log::debug!(
            "Ruler redrawn: {} ticks, {} labels, font {}px",
            plan.marks.len(),
            plan.labeled_values().len(),
            metrics.font_px
        );
        Some(plan)
    }
}

fn paint<S: RasterSurface>(surface: &mut S, plan: &RulerPlan) {
    let metrics = &plan.metrics;
    let width = metrics.size.width as f32;
    let height = metrics.size.height as f32;

    surface.clear();
    surface.fill_rect(0.0, 0.0, width, height, palette::WHITE);

    let edge_x = width - ruler::EDGE_INSET;
    surface.stroke_line(
        (edge_x, 0.0),
        (edge_x, height),
        LineStyle {
            width: ruler::EDGE_WIDTH,
            color: palette::BLACK,
        },
    );

    for mark in &plan.marks {
        let (length, stroke) = if mark.emphasized {
            (metrics.major_tick, ruler::MAJOR_STROKE)
        } else {
            (metrics.minor_tick, ruler::MINOR_STROKE)
        };
        surface.stroke_line(
            (width - length, mark.y),
            (width, mark.y),
            LineStyle {
                width: stroke,
                color: palette::BLACK,
            },
        );

        if let Some((text, label_y)) = &mark.label {
            surface.fill_text(
                text,
                metrics.label_inset,
                *label_y,
                FontStyle {
                    size: metrics.font_px,
                    bold: mark.emphasized,
                },
                palette::BLACK,
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::RangeBounds;
    use crate::domain::geometry::Size;
    use crate::render::geometry::Rgba8;
    use crate::render::grid::GridRenderer;
    use crate::scene::{NodeKind, RetainedScene};
    use crate::render::pixmap::tests::surface as pixmap_surface;

    /// Raster fake that records every call
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub size: Size,
        pub lines: Vec<((f32, f32), (f32, f32), LineStyle)>,
        pub texts: Vec<(String, f32, f32, FontStyle)>,
        pub clears: usize,
    }

    impl RecordingSurface {
        pub(crate) fn new(size: Size) -> Self {
            Self {
                size,
                ..Default::default()
            }
        }
    }

    impl RasterSurface for RecordingSurface {
        fn size(&self) -> Size {
            self.size
        }
        fn resize(&mut self, size: Size) {
            self.size = size;
            self.lines.clear();
            self.texts.clear();
        }
        fn clear(&mut self) {
            self.clears += 1;
            self.lines.clear();
            self.texts.clear();
        }
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgba8) {}
        fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle) {
            self.lines.push((from, to, style));
        }
        fn fill_text(&mut self, text: &str, x: f32, y: f32, font: FontStyle, _color: Rgba8) {
            self.texts.push((text.to_string(), x, y, font));
        }
    }

    fn mapping(min: i64, max: i64) -> AxisMapping {
        RangeBounds::new(min, max).unwrap().mapping(5000.0)
    }

    fn interval(value: i64) -> LabelInterval {
        LabelInterval::from_input(Some(value), 10)
    }

    #[test]
    fn test_zero_to_hundred_by_ten() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mut surface = RecordingSurface::new(Size::new(80, 5000));
        let plan = renderer
            .render(&mut surface, Some(&mapping(0, 100)), interval(10), 1.0)
            .unwrap();

        let ticks = plan.ticks();
        assert_eq!(ticks.len(), 101);
        let emphasized: Vec<i64> = ticks
            .iter()
            .filter(|t| t.is_emphasized())
            .map(|t| t.value)
            .collect();
        assert_eq!(emphasized, (0..=100).step_by(10).collect::<Vec<_>>());

        let mut labels = plan.labeled_values();
        labels.sort_unstable();
        assert_eq!(labels, (0..=100).step_by(10).collect::<Vec<_>>());

        // edge line + 90 minor + 9 interior major + 2 boundary
        assert_eq!(surface.lines.len(), 1 + 90 + 9 + 2);
        assert_eq!(surface.texts.len(), 11);
    }

    #[test]
    fn test_boundaries_labeled_when_interval_misaligned() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mut surface = RecordingSurface::new(Size::new(80, 5000));
        let plan = renderer
            .render(&mut surface, Some(&mapping(3, 25)), interval(7), 1.0)
            .unwrap();

        let mut labels = plan.labeled_values();
        labels.sort_unstable();
        assert_eq!(labels, vec![3, 7, 14, 21, 25]);

        let bold: Vec<&str> = surface
            .texts
            .iter()
            .filter(|(_, _, _, font)| font.bold)
            .map(|(text, ..)| text.as_str())
            .collect();
        assert_eq!(bold, vec!["7", "14", "21", "3", "25"]);
    }

    #[test]
    fn test_marks_follow_tick_classification() {
        let plan = RulerPlan::build(
            &mapping(-4, 17),
            interval(5),
            RulerMetrics::new(&RulerStyle::default(), Size::new(80, 5000), 1.0),
        );
        assert_eq!(plan.marks.len(), plan.ticks().len());
        for tick in plan.ticks() {
            let mark = plan.marks.iter().find(|m| m.value == tick.value).unwrap();
            assert_eq!(mark.y, tick.y as f32);
            assert_eq!(mark.emphasized, tick.is_emphasized());
            assert_eq!(mark.label.is_some(), tick.is_labeled);
        }
    }

    #[test]
    fn test_large_bounds_keep_unit_spacing() {
        let min = 1_i64 << 60;
        let mapping = RangeBounds::new(min, min + 10).unwrap().mapping(500.0);
        let plan = RulerPlan::build(
            &mapping,
            interval(4),
            RulerMetrics::new(&RulerStyle::default(), Size::new(80, 500), 1.0),
        );

        let mut scene = RetainedScene::new();
        GridRenderer::new(400.0).render(&mut scene, Some(&mapping));
        let grid_ys: Vec<f64> = scene
            .nodes()
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Line(line) => Some(line.from.y),
                _ => None,
            })
            .collect();

        let tick_ys: Vec<f64> = plan.ticks().iter().map(|t| t.y).collect();
        assert_eq!(tick_ys, grid_ys);
        assert_eq!(tick_ys[3], 150.0);
        assert_eq!(plan.labeled_values(), vec![min + 4, min + 8, min, min + 10]);
    }

    #[test]
    fn test_boundary_on_interval_not_duplicated() {
        let plan = RulerPlan::build(
            &mapping(0, 20),
            interval(10),
            RulerMetrics::new(&RulerStyle::default(), Size::new(80, 5000), 1.0),
        );
        let zero_marks = plan.marks.iter().filter(|m| m.value == 0).count();
        assert_eq!(zero_marks, 1);
        assert_eq!(plan.labeled_values(), vec![10, 0, 20]);
    }

    #[test]
    fn test_labels_clamped_inside_surface() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mut surface = RecordingSurface::new(Size::new(80, 5000));
        renderer
            .render(&mut surface, Some(&mapping(0, 10)), interval(5), 1.0)
            .unwrap();

        let y_of = |label: &str| {
            surface
                .texts
                .iter()
                .find(|(text, ..)| text == label)
                .map(|(_, _, y, _)| *y)
                .unwrap()
        };
        assert_eq!(y_of("0"), 8.0);
        assert_eq!(y_of("10"), 4992.0);
        assert_eq!(y_of("5"), 2500.0);
        assert!(surface.texts.iter().all(|(_, x, ..)| *x == 6.0));
    }

    #[test]
    fn test_sizes_floor_at_minimum() {
        let style = RulerStyle::default();
        let tiny = RulerMetrics::new(&style, Size::new(4, 5000), 0.05);
        assert_eq!(tiny.font_px, 10.0);
        assert_eq!(tiny.major_tick, 6.0);
        assert_eq!(tiny.minor_tick, 3.0);

        let large = RulerMetrics::new(&style, Size::new(160, 5000), 2.0);
        assert_eq!(large.font_px, 32.0);
        assert_eq!(large.major_tick, 24.0);
        assert_eq!(large.minor_tick, 12.0);
    }

    #[test]
    fn test_label_x_independent_of_ruler_scale() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mut surface = RecordingSurface::new(Size::new(240, 5000));
        renderer
            .render(&mut surface, Some(&mapping(0, 10)), interval(5), 3.0)
            .unwrap();
        assert!(surface.texts.iter().all(|(_, x, ..)| *x == 6.0));
    }

    #[test]
    fn test_invalid_range_leaves_surface_untouched() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mut surface = pixmap_surface(Size::new(80, 500));
        let mapping = RangeBounds::new(0, 10).unwrap().mapping(500.0);
        renderer
            .render(&mut surface, Some(&mapping), interval(5), 1.0)
            .unwrap();
        let before = surface.pixmap().unwrap().data().to_vec();

        assert!(
            renderer
                .render(&mut surface, None, interval(5), 1.0)
                .is_none()
        );
        assert_eq!(surface.pixmap().unwrap().data(), &before[..]);
    }

    #[test]
    fn test_redraw_is_pixel_identical() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mapping = RangeBounds::new(-20, 30).unwrap().mapping(600.0);
        let mut surface = pixmap_surface(Size::new(80, 600));

        let first_plan = renderer
            .render(&mut surface, Some(&mapping), interval(10), 1.0)
            .unwrap();
        let first = surface.pixmap().unwrap().data().to_vec();
        let second_plan = renderer
            .render(&mut surface, Some(&mapping), interval(10), 1.0)
            .unwrap();

        assert_eq!(first_plan, second_plan);
        assert_eq!(surface.pixmap().unwrap().data(), &first[..]);
    }

    #[test]
    fn test_background_is_opaque_white() {
        let renderer = RulerRenderer::new(RulerStyle::default());
        let mapping = RangeBounds::new(0, 2).unwrap().mapping(400.0);
        let mut surface = pixmap_surface(Size::new(80, 400));
        renderer
            .render(&mut surface, Some(&mapping), interval(10), 1.0)
            .unwrap();

        assert_eq!(surface.pixel(40, 100), Some(palette::WHITE));
        // right edge separator
        let [r, _, _, a] = surface.pixel(78, 100).unwrap();
        assert_eq!(a, 255);
        assert!(r < 64);
    }
}
