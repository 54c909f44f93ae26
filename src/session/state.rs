use crate::config::{StageConfig, TransformOrigin};
use crate::domain::{AxisMapping, Bounds, LabelInterval, PageScale, Point, RangeModel, ScaleState, Size};
use crate::layout::{LayoutEngine, StageLayout};
use crate::navigation::{TargetLocator, Viewport};
use crate::overlays::registry::{AttachOutcome, OverlayPlacement};
use crate::overlays::{OverlayRegistry, SlotId, UploadTicket};
use crate::render::grid::GridRenderer;
use crate::render::pixmap::PixmapSurface;
use crate::render::text::LabelFonts;
use crate::render::ruler::{RulerPlan, RulerRenderer};
use crate::scene::{NodeKind, RetainedScene, Scene, SurfaceFrame, Tag};
use crate::session::display::ControlDisplay;
use crate::session::messages::DecodeResult;
use crate::zoom::ZoomController;
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

/// Decode work handed to the background pool
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeJob {
    pub ticket: UploadTicket,
    pub path: PathBuf,
}

/// Everything the stage shows, plus the collaborators that present it
pub struct StageSession<V: Viewport, D: ControlDisplay> {
    config: StageConfig,
    range: RangeModel,
    scales: ScaleState,
    interval: LabelInterval,
    layout_engine: LayoutEngine,
    layout: StageLayout,
    ruler_surface: PixmapSurface,
    ruler_renderer: RulerRenderer,
    grid: GridRenderer,
    scene: RetainedScene,
    overlays: OverlayRegistry,
    locator: TargetLocator,
    zoom: ZoomController,
    /// Last ruler frame drawn from a valid range
    last_ruler: Option<RulerPlan>,
    viewport: V,
    display: D,
}

impl<V: Viewport, D: ControlDisplay> StageSession<V, D> {
    /// Build the stage and draw the initial frame. Fails only when the
    /// bundled label fonts cannot be parsed.
    pub fn new(config: StageConfig, viewport: V, display: D) -> Result<Self> {
        let stage = Size::new(config.stage_width, config.stage_height);
        let layout_engine = LayoutEngine::new(config.ruler.base_width, stage);
        let layout = layout_engine.compute(1.0);
        let placement = OverlayPlacement {
            inset_x: config.overlay_inset as f64,
            stage_height: config.stage_height as f64,
        };

        let mut session = Self {
            range: RangeModel::new(Some(config.initial_min), Some(config.initial_max)),
            scales: ScaleState::default(),
            interval: LabelInterval::from_input(None, config.default_interval),
            layout_engine,
            layout,
            ruler_surface: PixmapSurface::new(layout.ruler, LabelFonts::bundled()?),
            ruler_renderer: RulerRenderer::new(config.ruler.clone()),
            grid: GridRenderer::new(config.stage_width as f64),
            scene: RetainedScene::new(),
            overlays: OverlayRegistry::new(config.initial_slots, placement),
            locator: TargetLocator::new(config.stage_width as f64),
            zoom: ZoomController::new(
                config.zoom_step,
                config.drag_sensitivity,
                config.initial_origin,
            ),
            last_ruler: None,
            viewport,
            display,
            config,
        };
        session.init();
        Ok(session)
    }

    fn init(&mut self) {
        self.zoom.set_origin(self.config.initial_origin);
        self.scales.set_ruler(1.0);
        self.relayout();
        self.zoom.reset(&mut self.scales, &mut self.display);
        self.viewport.scroll_to(0.0, false);
        for slot in self.overlays.slots() {
            self.display.show_slot_opacity(slot.label(), slot.opacity_pct());
        }
        log::info!(
            "Stage ready: {}x{} px, range {:?}..{:?}",
            self.config.stage_width,
            self.config.stage_height,
            self.range.min(),
            self.range.max()
        );
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn range(&self) -> &RangeModel {
        &self.range
    }

    pub fn scales(&self) -> &ScaleState {
        &self.scales
    }

    pub fn interval(&self) -> LabelInterval {
        self.interval
    }

    pub fn layout(&self) -> StageLayout {
        self.layout
    }

    pub fn ruler_surface(&self) -> &PixmapSurface {
        &self.ruler_surface
    }

    pub fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn last_ruler(&self) -> Option<&RulerPlan> {
        self.last_ruler.as_ref()
    }

    pub fn gridlines(&self) -> usize {
        self.scene.count_tagged(Tag::Grid)
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Value-to-pixel mapping for the current range and stage height
    pub fn mapping(&self) -> Option<AxisMapping> {
        let bounds = self.range.bounds()?;
        Some(bounds.mapping(self.config.stage_height as f64))
    }

    // ========================================================================
    // Range, interval and ruler scale
    // ========================================================================

    /// Redraw grid and ruler from the current state.
    ///
    /// With an invalid range nothing is touched and `false` is returned.
    pub fn redraw(&mut self) -> bool {
        let Some(mapping) = self.mapping() else {
            log::debug!(
                "Range {:?}..{:?} is not usable, keeping last render",
                self.range.min(),
                self.range.max()
            );
            return false;
        };

        let bounds = mapping.bounds();
        if bounds.is_large() {
            log::warn!(
                "Range {}..{} spans {} units; drawing one tick and one gridline per unit",
                bounds.min(),
                bounds.max(),
                bounds.unit_count()
            );
        }

        self.grid.render(&mut self.scene, Some(&mapping));
        self.last_ruler = self.ruler_renderer.render(
            &mut self.ruler_surface,
            Some(&mapping),
            self.interval,
            self.scales.ruler(),
        );
        self.locator.keep_on_top(&mut self.scene);
        true
    }

    pub fn set_min(&mut self, min: Option<i64>) -> bool {
        self.range.set_min(min);
        self.redraw()
    }

    pub fn set_max(&mut self, max: Option<i64>) -> bool {
        self.range.set_max(max);
        self.redraw()
    }

    pub fn set_range(&mut self, min: Option<i64>, max: Option<i64>) -> bool {
        self.range.set_bounds(min, max);
        self.redraw()
    }

    /// Interval input changed; unusable values fall back to the default
    pub fn set_interval(&mut self, input: Option<i64>) -> bool {
        self.interval = LabelInterval::from_input(input, self.config.default_interval);
        self.redraw()
    }

    /// Ruler scale input changed, in percent. Unusable input is ignored.
    pub fn set_ruler_scale_percent(&mut self, percent: Option<f64>) -> bool {
        let Some(percent) = percent else {
            log::debug!("Non-numeric ruler scale ignored");
            return false;
        };
        if !self.scales.set_ruler(percent / 100.0) {
            log::warn!("Ruler scale {}% ignored", percent);
            return false;
        }
        self.relayout();
        true
    }

    fn relayout(&mut self) {
        self.layout = self.layout_engine.compute(self.scales.ruler());
        self.layout_engine
            .apply(&self.layout, &mut self.ruler_surface, &mut self.scene);
        self.display.show_ruler_scale(&self.scales.ruler_label());
        self.redraw();
    }

    // ========================================================================
    // Navigation and zoom
    // ========================================================================

    pub fn go_to(&mut self, value: Option<i64>) -> Option<f64> {
        let mapping = self.mapping();
        self.locator
            .go_to(&mut self.scene, &mut self.viewport, mapping.as_ref(), value)
    }

    pub fn marker_y(&self) -> Option<f64> {
        self.locator.marker_y(&self.scene)
    }

    /// Range value under the marker, for the current range
    pub fn marker_value(&self) -> Option<i64> {
        Some(self.mapping()?.pixel_to_value(self.marker_y()?))
    }

    pub fn zoom_in(&mut self) -> PageScale {
        self.zoom.zoom_in(&mut self.scales, &mut self.display)
    }

    pub fn zoom_out(&mut self) -> PageScale {
        self.zoom.zoom_out(&mut self.scales, &mut self.display)
    }

    pub fn reset_zoom(&mut self) -> PageScale {
        self.zoom.reset(&mut self.scales, &mut self.display)
    }

    pub fn set_zoom_percent(&mut self, percent: f64) -> PageScale {
        self.zoom
            .set_percent(&mut self.scales, percent, &mut self.display)
    }

    pub fn set_origin(&mut self, origin: TransformOrigin) {
        self.zoom.set_origin(origin);
    }

    pub fn begin_zoom_drag(&mut self, at: Point) {
        self.zoom.begin_drag(&self.scales, at);
    }

    pub fn zoom_drag_to(&mut self, at: Point) -> Option<PageScale> {
        self.zoom.drag_to(&mut self.scales, at, &mut self.display)
    }

    pub fn end_zoom_drag(&mut self) -> bool {
        self.zoom.end_drag()
    }

    /// Visible part of the composed view, in unscaled coordinates
    pub fn visual_bounds(&self) -> Bounds {
        self.zoom
            .transform(&self.scales)
            .visual_bounds(self.layout.composed())
    }

    // ========================================================================
    // Upload slots
    // ========================================================================

    fn slot_id(&self, label: &str) -> Option<SlotId> {
        let id = self.overlays.find(label);
        if id.is_none() {
            log::warn!("No upload slot named {:?}", label);
        }
        id
    }

    /// A file was chosen for a slot. Returns the decode to run off the loop.
    pub fn begin_upload(&mut self, label: &str, path: PathBuf) -> Option<DecodeJob> {
        let id = self.slot_id(label)?;
        let name = crate::overlays::decode::display_name(&path);
        let ticket = self.overlays.request(id, name)?;
        log::debug!("Decoding {} for slot {}", path.display(), label);
        Some(DecodeJob { ticket, path })
    }

    /// Apply a finished decode. Returns whether the scene changed.
    pub fn finish_upload(&mut self, decoded: DecodeResult) -> bool {
        let DecodeResult {
            ticket,
            source,
            result,
        } = decoded;

        let image = match result {
            Ok(image) => image,
            Err(err) => {
                log::error!("Failed to load {}: {:#}", source.display(), err);
                self.overlays.fail(ticket);
                return false;
            }
        };

        match self.overlays.attach(&mut self.scene, ticket, image) {
            AttachOutcome::Attached { spawned, .. } => {
                self.locator.keep_on_top(&mut self.scene);
                if let Some(slot) = spawned.and_then(|id| self.overlays.slot(id)) {
                    self.display.show_slot_added(slot.label());
                    self.display
                        .show_slot_opacity(slot.label(), slot.opacity_pct());
                }
                true
            }
            AttachOutcome::Stale => false,
            AttachOutcome::UnknownSlot => {
                log::warn!("Decoded {} for a slot that no longer exists", source.display());
                false
            }
        }
    }

    /// Opacity slider of a slot; empty slots ignore it
    pub fn set_slot_opacity(&mut self, label: &str, pct: Option<i64>) -> Option<u8> {
        let id = self.slot_id(label)?;
        if !self.overlays.slot(id)?.is_populated() {
            log::debug!("Slot {} is empty, opacity ignored", label);
            return None;
        }
        let pct = self.overlays.set_opacity(&mut self.scene, id, pct?)?;
        self.display.show_slot_opacity(label, pct);
        Some(pct)
    }

    pub fn delete_slot(&mut self, label: &str) -> bool {
        let Some(id) = self.slot_id(label) else {
            return false;
        };
        let removed = self.overlays.detach(&mut self.scene, id);
        if let Some(slot) = self.overlays.slot(id) {
            self.display
                .show_slot_opacity(slot.label(), slot.opacity_pct());
        }
        removed
    }

    pub fn move_slot(&mut self, label: &str, x: f64, y: f64) -> bool {
        let Some(id) = self.slot_id(label) else {
            return false;
        };
        self.overlays
            .move_to(&mut self.scene, id, Point::new(x, y))
    }

    pub fn resize_slot(&mut self, label: &str, sx: f64, sy: f64) -> bool {
        let Some(id) = self.slot_id(label) else {
            return false;
        };
        self.overlays.scale_to(&mut self.scene, id, sx, sy)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    pub fn status(&self) -> StatusReport {
        StatusReport {
            min: self.range.min(),
            max: self.range.max(),
            valid: self.range.bounds().is_some(),
            interval: self.interval.get(),
            ruler_scale: self.scales.ruler_label(),
            ruler_width: self.layout.ruler.width,
            page_scale: self.scales.page().percent(),
            origin: self.zoom.origin(),
            visual: self.visual_bounds(),
            vector: self.scene.frame(),
            gridlines: self.gridlines(),
            marker_y: self.marker_y(),
            marker_value: self.marker_value(),
            slots: self.slot_lines(),
        }
    }

    /// One line per slot: label, file, rendered size and opacity
    pub fn slot_lines(&self) -> Vec<String> {
        self.overlays
            .slots()
            .iter()
            .map(|slot| {
                let image = slot
                    .nodes()
                    .and_then(|nodes| self.scene.node(nodes.image))
                    .and_then(|node| match &node.kind {
                        NodeKind::Image(image) => Some(image),
                        _ => None,
                    });
                match (slot.input(), image) {
                    (Some(name), Some(image)) => {
                        let (width, height) = image.rendered_size();
                        format!(
                            "{}  {}  {:.0}x{:.0} px  opacity {}%",
                            slot.label(),
                            name,
                            width,
                            height,
                            slot.opacity_pct()
                        )
                    }
                    _ => format!("{}  (empty)", slot.label()),
                }
            })
            .collect()
    }
}

/// Snapshot of the session for the `status` command
#[derive(Clone, Debug, PartialEq)]
pub struct StatusReport {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub valid: bool,
    pub interval: i64,
    pub ruler_scale: String,
    pub ruler_width: u32,
    pub page_scale: u32,
    pub origin: TransformOrigin,
    pub visual: Bounds,
    /// Placement of the vector surface in the composed view
    pub vector: SurfaceFrame,
    pub gridlines: usize,
    pub marker_y: Option<f64>,
    pub marker_value: Option<i64>,
    pub slots: Vec<String>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<i64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        write!(f, "range: {}..{}", show(self.min), show(self.max))?;
        if !self.valid {
            write!(f, " (invalid, showing last render)")?;
        }
        writeln!(f)?;
        writeln!(f, "interval: {}", self.interval)?;
        writeln!(f, "ruler scale: {} (width {} px)", self.ruler_scale, self.ruler_width)?;
        writeln!(
            f,
            "vector surface: {:.0}x{:.0} at x={:.0}",
            self.vector.width, self.vector.height, self.vector.offset_x
        )?;
        writeln!(
            f,
            "page scale: {}% about {} (visible {:.0},{:.0} to {:.0},{:.0})",
            self.page_scale,
            self.origin.name(),
            self.visual.left,
            self.visual.top,
            self.visual.right,
            self.visual.bottom
        )?;
        writeln!(f, "gridlines: {}", self.gridlines)?;
        match (self.marker_y, self.marker_value) {
            (Some(y), Some(value)) => writeln!(f, "marker: {} (y={:.1})", value, y)?,
            (Some(y), None) => writeln!(f, "marker: y={:.1}", y)?,
            _ => writeln!(f, "marker: none")?,
        }
        write!(f, "slots:")?;
        for line in &self.slots {
            write!(f, "\n  {}", line)?;
        }
        Ok(())
    }
}
