//! Upload slots and the overlay nodes they own
//!
//! Each upload control is a slot with a stable identity. A slot owns at most
//! one image node and the transform handle bound to it. Slots form an
//! open-ended list: the first successful upload into a slot appends one new
//! empty slot, so there is always somewhere to put the next image.

use crate::domain::Point;
use crate::overlays::OverlayImage;
use crate::scene::{ImageNode, NodeId, RedrawScope, Scene, Tag};

/// Opacity of a fresh or reset slot, in percent
pub const DEFAULT_OPACITY: u8 = 100;

/// Stable identity of an upload slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

/// Letter label for the `index`-th slot: A..Z, then AA, AB, ...
pub fn slot_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Image node and the handle bound to it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayNodes {
    pub image: NodeId,
    pub handle: NodeId,
}

#[derive(Clone, Debug)]
pub struct OverlaySlot {
    id: SlotId,
    label: String,
    /// Name of the file currently shown in this slot
    input: Option<String>,
    pending: Option<String>,
    nodes: Option<OverlayNodes>,
    opacity_pct: u8,
    /// Whether this slot already appended its successor
    spawned_next: bool,
    /// Bumped on every upload request and on delete
    generation: u64,
}

impl OverlaySlot {
    fn new(id: SlotId, label: String) -> Self {
        Self {
            id,
            label,
            input: None,
            pending: None,
            nodes: None,
            opacity_pct: DEFAULT_OPACITY,
            spawned_next: false,
            generation: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn nodes(&self) -> Option<OverlayNodes> {
        self.nodes
    }

    pub fn opacity_pct(&self) -> u8 {
        self.opacity_pct
    }

    pub fn is_populated(&self) -> bool {
        self.nodes.is_some()
    }
}

/// Proof that an upload was requested for a slot at a given generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadTicket {
    pub slot: SlotId,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttachOutcome {
    Attached {
        image: NodeId,
        /// Image node destroyed by this attach
        replaced: Option<NodeId>,
        /// Empty slot appended because this was the slot's first upload
        spawned: Option<SlotId>,
    },
    /// A newer request (or a delete) superseded this one
    Stale,
    UnknownSlot,
}

/// Where fresh overlays land on the vector surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    pub inset_x: f64,
    pub stage_height: f64,
}

impl OverlayPlacement {
    /// Uniform scale that makes `image` exactly as tall as the stage
    pub fn fit_scale(&self, image: &OverlayImage) -> f64 {
        self.stage_height / image.height() as f64
    }
}

#[derive(Debug)]
pub struct OverlayRegistry {
    slots: Vec<OverlaySlot>,
    placement: OverlayPlacement,
    next_id: u32,
}

impl OverlayRegistry {
    pub fn new(initial_slots: usize, placement: OverlayPlacement) -> Self {
        let mut registry = Self {
            slots: Vec::new(),
            placement,
            next_id: 0,
        };
        for _ in 0..initial_slots.max(1) {
            registry.add_slot();
        }
        registry
    }

    /// Append an empty slot
    pub fn add_slot(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        let label = slot_label(self.next_id as usize);
        self.next_id += 1;
        log::debug!("Upload slot {} added", label);
        self.slots.push(OverlaySlot::new(id, label));
        id
    }

    pub fn slots(&self) -> &[OverlaySlot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&OverlaySlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut OverlaySlot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    /// Find a slot by its label, case-insensitively
    pub fn find(&self, label: &str) -> Option<SlotId> {
        self.slots
            .iter()
            .find(|s| s.label.eq_ignore_ascii_case(label.trim()))
            .map(|s| s.id)
    }

    /// Record that `input_name` was chosen for a slot and a decode is starting.
    ///
    /// Any decode still in flight for the slot becomes stale.
    pub fn request(&mut self, id: SlotId, input_name: impl Into<String>) -> Option<UploadTicket> {
        let slot = self.slot_mut(id)?;
        slot.generation += 1;
        slot.pending = Some(input_name.into());
        Some(UploadTicket {
            slot: id,
            generation: slot.generation,
        })
    }

    /// A decode for `ticket` failed; the slot keeps whatever it showed before
    pub fn fail(&mut self, ticket: UploadTicket) {
        if let Some(slot) = self.slot_mut(ticket.slot)
            && slot.generation == ticket.generation
        {
            slot.pending = None;
        }
    }

    /// Place a decoded image into the slot the ticket was issued for
    pub fn attach<S: Scene>(
        &mut self,
        scene: &mut S,
        ticket: UploadTicket,
        image: OverlayImage,
    ) -> AttachOutcome {
        let placement = self.placement;
        let Some(slot) = self.slot_mut(ticket.slot) else {
            return AttachOutcome::UnknownSlot;
        };
        if slot.generation != ticket.generation {
            log::debug!(
                "Discarding stale upload for slot {} (generation {} < {})",
                slot.label,
                ticket.generation,
                slot.generation
            );
            return AttachOutcome::Stale;
        }

        let replaced = slot.nodes.take().map(|old| {
            scene.destroy(old.image);
            scene.destroy(old.handle);
            old.image
        });

        let scale = placement.fit_scale(&image);
        let image_id = scene.add_image(
            Tag::Overlay,
            ImageNode {
                image,
                position: Point::new(placement.inset_x, 0.0),
                scale_x: scale,
                scale_y: scale,
                opacity: slot.opacity_pct as f64 / 100.0,
                draggable: true,
            },
        );
        let Some(handle) = scene.add_handle(Tag::Overlay, image_id) else {
            // add_image just created the target
            scene.destroy(image_id);
            return AttachOutcome::UnknownSlot;
        };
        scene.request_redraw(RedrawScope::Full);

        slot.nodes = Some(OverlayNodes {
            image: image_id,
            handle,
        });
        slot.input = slot.pending.take();
        log::info!(
            "Slot {} shows {} at scale {:.3}, opacity {}%",
            slot.label,
            slot.input.as_deref().unwrap_or("<image>"),
            scale,
            slot.opacity_pct
        );

        let spawn = !slot.spawned_next;
        slot.spawned_next = true;
        let spawned = spawn.then(|| self.add_slot());

        AttachOutcome::Attached {
            image: image_id,
            replaced,
            spawned,
        }
    }

    /// Change a populated slot's opacity. Returns the clamped percentage.
    pub fn set_opacity<S: Scene>(&mut self, scene: &mut S, id: SlotId, pct: i64) -> Option<u8> {
        let slot = self.slot_mut(id)?;
        let nodes = slot.nodes?;
        let pct = pct.clamp(0, 100) as u8;
        let image = scene.image_mut(nodes.image)?;
        image.opacity = pct as f64 / 100.0;
        slot.opacity_pct = pct;
        scene.request_redraw(RedrawScope::Node(nodes.image));
        Some(pct)
    }

    /// Remove a slot's overlay and reset it to an empty slot
    pub fn detach<S: Scene>(&mut self, scene: &mut S, id: SlotId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        // invalidate any decode still in flight
        slot.generation += 1;
        slot.pending = None;
        slot.input = None;
        slot.opacity_pct = DEFAULT_OPACITY;
        let Some(nodes) = slot.nodes.take() else {
            return false;
        };
        scene.destroy(nodes.image);
        scene.destroy(nodes.handle);
        scene.request_redraw(RedrawScope::Full);
        log::info!("Slot {} cleared", slot.label);
        true
    }

    /// Drag a slot's image to an absolute position through its handle
    pub fn move_to<S: Scene>(&mut self, scene: &mut S, id: SlotId, position: Point) -> bool {
        self.with_handle_target(scene, id, |image| image.position = position)
    }

    /// Scale a slot's image through its handle
    pub fn scale_to<S: Scene>(&mut self, scene: &mut S, id: SlotId, sx: f64, sy: f64) -> bool {
        if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
            return false;
        }
        self.with_handle_target(scene, id, |image| {
            image.scale_x = sx;
            image.scale_y = sy;
        })
    }

    fn with_handle_target<S: Scene>(
        &mut self,
        scene: &mut S,
        id: SlotId,
        f: impl FnOnce(&mut ImageNode),
    ) -> bool {
        let Some(nodes) = self.slot(id).and_then(|s| s.nodes) else {
            return false;
        };
        let Some(target) = scene.handle_target(nodes.handle) else {
            return false;
        };
        let Some(image) = scene.image_mut(target) else {
            return false;
        };
        if !image.draggable {
            return false;
        }
        f(image);
        scene.request_redraw(RedrawScope::Node(target));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RetainedScene;
    use crate::scene::retained::dangling_handles;

    fn registry() -> OverlayRegistry {
        OverlayRegistry::new(
            2,
            OverlayPlacement {
                inset_x: 10.0,
                stage_height: 5000.0,
            },
        )
    }

    fn upload(
        registry: &mut OverlayRegistry,
        scene: &mut RetainedScene,
        id: SlotId,
        width: u32,
        height: u32,
    ) -> AttachOutcome {
        let ticket = registry.request(id, format!("{width}x{height}.png")).unwrap();
        registry.attach(scene, ticket, OverlayImage::blank(width, height).unwrap())
    }

    fn image_of(scene: &RetainedScene, id: NodeId) -> &ImageNode {
        match &scene.node(id).unwrap().kind {
            crate::scene::NodeKind::Image(image) => image,
            other => panic!("not an image: {other:?}"),
        }
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(0), "A");
        assert_eq!(slot_label(2), "C");
        assert_eq!(slot_label(25), "Z");
        assert_eq!(slot_label(26), "AA");
        assert_eq!(slot_label(27), "AB");
        assert_eq!(slot_label(702), "AAA");
    }

    #[test]
    fn test_attach_fits_stage_height() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();

        let AttachOutcome::Attached { image, replaced, .. } =
            upload(&mut registry, &mut scene, a, 2000, 1000)
        else {
            panic!("upload was not attached");
        };
        assert_eq!(replaced, None);

        let node = image_of(&scene, image);
        assert_eq!(node.scale_x, 5.0);
        assert_eq!(node.scale_y, 5.0);
        assert_eq!(node.rendered_size().1, 5000.0);
        assert_eq!(node.position, Point::new(10.0, 0.0));
        assert_eq!(node.opacity, 1.0);
        assert_eq!(registry.slot(a).unwrap().input(), Some("2000x1000.png"));
    }

    #[test]
    fn test_replace_keeps_opacity_and_destroys_old_nodes() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("a").unwrap();

        upload(&mut registry, &mut scene, a, 100, 100);
        let old = registry.slot(a).unwrap().nodes().unwrap();
        assert_eq!(registry.set_opacity(&mut scene, a, 40), Some(40));

        let AttachOutcome::Attached { image, replaced, .. } =
            upload(&mut registry, &mut scene, a, 50, 200)
        else {
            panic!("replacement was not attached");
        };
        assert_eq!(replaced, Some(old.image));
        assert!(scene.node(old.image).is_none());
        assert!(scene.node(old.handle).is_none());
        assert_eq!(scene.count_tagged(Tag::Overlay), 2);
        assert_eq!(image_of(&scene, image).opacity, 0.4);
        assert_eq!(registry.slot(a).unwrap().opacity_pct(), 40);
        assert!(dangling_handles(&scene).is_empty());
    }

    #[test]
    fn test_detach_resets_opacity() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();

        upload(&mut registry, &mut scene, a, 100, 100);
        registry.set_opacity(&mut scene, a, 25);
        assert!(registry.detach(&mut scene, a));

        let slot = registry.slot(a).unwrap();
        assert!(!slot.is_populated());
        assert_eq!(slot.input(), None);
        assert_eq!(slot.opacity_pct(), DEFAULT_OPACITY);
        assert_eq!(scene.count_tagged(Tag::Overlay), 0);

        let AttachOutcome::Attached { image, .. } = upload(&mut registry, &mut scene, a, 10, 10)
        else {
            panic!("upload after delete was not attached");
        };
        assert_eq!(image_of(&scene, image).opacity, 1.0);
        let b = registry.find("B").unwrap();
        assert!(!registry.detach(&mut scene, b));
    }

    #[test]
    fn test_first_upload_spawns_exactly_one_slot() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();

        let AttachOutcome::Attached { spawned, .. } = upload(&mut registry, &mut scene, a, 1, 1)
        else {
            panic!();
        };
        let c = spawned.unwrap();
        assert_eq!(registry.slot(c).unwrap().label(), "C");
        assert_eq!(registry.slots().len(), 3);

        // replacing and deleting never spawn again
        let AttachOutcome::Attached { spawned, .. } = upload(&mut registry, &mut scene, a, 1, 1)
        else {
            panic!();
        };
        assert_eq!(spawned, None);
        registry.detach(&mut scene, a);
        upload(&mut registry, &mut scene, a, 1, 1);
        assert_eq!(registry.slots().len(), 3);
    }

    #[test]
    fn test_stale_decode_is_discarded() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();

        let first = registry.request(a, "first.png").unwrap();
        let second = registry.request(a, "second.png").unwrap();

        let outcome = registry.attach(&mut scene, second, OverlayImage::blank(4, 4).unwrap());
        assert!(matches!(outcome, AttachOutcome::Attached { .. }));
        let outcome = registry.attach(&mut scene, first, OverlayImage::blank(8, 8).unwrap());
        assert_eq!(outcome, AttachOutcome::Stale);
        assert_eq!(registry.slot(a).unwrap().input(), Some("second.png"));
        assert_eq!(scene.count_tagged(Tag::Overlay), 2);
    }

    #[test]
    fn test_delete_invalidates_inflight_decode() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();

        let ticket = registry.request(a, "late.png").unwrap();
        registry.detach(&mut scene, a);
        let outcome = registry.attach(&mut scene, ticket, OverlayImage::blank(4, 4).unwrap());
        assert_eq!(outcome, AttachOutcome::Stale);
        assert!(!registry.slot(a).unwrap().is_populated());
    }

    #[test]
    fn test_failed_decode_keeps_previous_overlay() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();

        upload(&mut registry, &mut scene, a, 10, 10);
        let nodes = registry.slot(a).unwrap().nodes();
        let ticket = registry.request(a, "broken.png").unwrap();
        registry.fail(ticket);

        let slot = registry.slot(a).unwrap();
        assert_eq!(slot.nodes(), nodes);
        assert_eq!(slot.input(), Some("10x10.png"));
    }

    #[test]
    fn test_opacity_clamps_and_redraws_single_node() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();
        assert_eq!(registry.set_opacity(&mut scene, a, 50), None);

        upload(&mut registry, &mut scene, a, 10, 10);
        let (full_before, partial_before) = scene.redraw_counts();
        assert_eq!(registry.set_opacity(&mut scene, a, 250), Some(100));
        assert_eq!(registry.set_opacity(&mut scene, a, -3), Some(0));
        assert_eq!(scene.redraw_counts(), (full_before, partial_before + 2));
    }

    #[test]
    fn test_move_and_scale_through_handle() {
        let mut registry = registry();
        let mut scene = RetainedScene::new();
        let a = registry.find("A").unwrap();
        assert!(!registry.move_to(&mut scene, a, Point::new(1.0, 1.0)));

        upload(&mut registry, &mut scene, a, 10, 10);
        let image = registry.slot(a).unwrap().nodes().unwrap().image;
        assert!(registry.move_to(&mut scene, a, Point::new(250.0, -40.0)));
        assert!(registry.scale_to(&mut scene, a, 2.0, 3.0));
        assert!(!registry.scale_to(&mut scene, a, 0.0, 3.0));

        let node = image_of(&scene, image);
        assert_eq!(node.position, Point::new(250.0, -40.0));
        assert_eq!((node.scale_x, node.scale_y), (2.0, 3.0));
    }
}
