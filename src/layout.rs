//! Stage layout
//!
//! The composed view is the ruler strip followed by the vector surface.
//! Only the ruler strip follows the ruler scale; the vector surface keeps
//! the fixed stage size. Page zoom is applied after layout and never
//! changes these numbers.

use crate::domain::Size;
use crate::render::raster::RasterSurface;
use crate::scene::{Scene, SurfaceFrame};

/// Pixel geometry of both surfaces for one ruler scale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageLayout {
    /// Raster ruler surface
    pub ruler: Size,
    /// Vector surface, placed immediately right of the ruler
    pub vector: Size,
}

impl StageLayout {
    pub fn vector_offset_x(&self) -> u32 {
        self.ruler.width
    }

    /// Size of ruler and vector surface side by side
    pub fn composed(&self) -> Size {
        Size::new(
            self.ruler.width.saturating_add(self.vector.width),
            self.vector.height,
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutEngine {
    base_ruler_width: u32,
    stage: Size,
}

impl LayoutEngine {
    pub fn new(base_ruler_width: u32, stage: Size) -> Self {
        Self {
            base_ruler_width,
            stage,
        }
    }

    pub fn compute(&self, ruler_scale: f64) -> StageLayout {
        let width = (self.base_ruler_width as f64 * ruler_scale).round();
        // saturating float-to-int cast; non-finite scales are refused upstream
        let ruler_width = width.max(0.0) as u32;
        StageLayout {
            ruler: Size::new(ruler_width, self.stage.height),
            vector: self.stage,
        }
    }

    /// Resize the ruler surface and reposition the vector surface.
    ///
    /// The caller must redraw ruler and grid afterwards.
    pub fn apply<R: RasterSurface, S: Scene>(&self, layout: &StageLayout, ruler: &mut R, scene: &mut S) {
        ruler.resize(layout.ruler);
        scene.set_frame(SurfaceFrame {
            offset_x: layout.vector_offset_x() as f64,
            width: layout.vector.width as f64,
            height: layout.vector.height as f64,
        });
        log::debug!(
            "Layout: ruler {}x{}, vector surface at x={} ({}x{})",
            layout.ruler.width,
            layout.ruler.height,
            layout.vector_offset_x(),
            layout.vector.width,
            layout.vector.height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ruler::tests::RecordingSurface;
    use crate::scene::RetainedScene;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(80, Size::new(5000, 5000))
    }

    #[test]
    fn test_ruler_width_follows_ruler_scale() {
        assert_eq!(engine().compute(1.0).ruler, Size::new(80, 5000));
        assert_eq!(engine().compute(1.5).ruler, Size::new(120, 5000));
        assert_eq!(engine().compute(0.33).ruler.width, 26);
        assert_eq!(engine().compute(0.001).ruler.width, 0);
    }

    #[test]
    fn test_vector_surface_is_fixed() {
        for scale in [0.1, 1.0, 4.0] {
            let layout = engine().compute(scale);
            assert_eq!(layout.vector, Size::new(5000, 5000));
            assert_eq!(layout.vector_offset_x(), layout.ruler.width);
        }
        assert_eq!(engine().compute(2.0).composed(), Size::new(5160, 5000));
    }

    #[test]
    fn test_apply_resizes_both_surfaces() {
        let engine = engine();
        let layout = engine.compute(2.0);
        let mut ruler = RecordingSurface::new(Size::new(80, 5000));
        let mut scene = RetainedScene::new();

        engine.apply(&layout, &mut ruler, &mut scene);
        assert_eq!(ruler.size, Size::new(160, 5000));
        assert_eq!(
            scene.frame(),
            SurfaceFrame {
                offset_x: 160.0,
                width: 5000.0,
                height: 5000.0
            }
        );
    }
}
