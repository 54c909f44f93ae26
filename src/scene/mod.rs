//! Retained vector scene
//!
//! The vector surface is modeled as a z-ordered list of drawables (lines,
//! images) plus interactive transform handles, each bound to one image.
//! Gridlines and the marker carry a [`Tag`] so a redraw can remove exactly
//! its own previous nodes.

pub mod retained;

pub use retained::RetainedScene;

use crate::domain::Point;
use crate::overlays::OverlayImage;
use crate::render::geometry::Rgba8;

/// Stable handle to a scene node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Group identity used for selective destruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Grid,
    Marker,
    Overlay,
}

/// Straight stroked line
#[derive(Clone, Debug, PartialEq)]
pub struct LineNode {
    pub from: Point,
    pub to: Point,
    pub color: Rgba8,
    pub width: f32,
    /// On/off dash lengths; `None` for a solid line
    pub dash: Option<[f32; 2]>,
}

impl LineNode {
    /// Solid horizontal line spanning `[0, width]` at `y`
    pub fn horizontal(y: f64, span: f64, color: Rgba8, width: f32) -> Self {
        Self {
            from: Point::new(0.0, y),
            to: Point::new(span, y),
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(mut self, pattern: [f32; 2]) -> Self {
        self.dash = Some(pattern);
        self
    }
}

/// Raster image placed on the vector surface
#[derive(Clone, Debug)]
pub struct ImageNode {
    pub image: OverlayImage,
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// 0.0 (invisible) ..= 1.0 (opaque)
    pub opacity: f64,
    pub draggable: bool,
}

impl ImageNode {
    /// Rendered size in stage pixels
    pub fn rendered_size(&self) -> (f64, f64) {
        (
            self.image.width() as f64 * self.scale_x,
            self.image.height() as f64 * self.scale_y,
        )
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Line(LineNode),
    Image(ImageNode),
    /// Drag/scale affordance bound to one image node
    Handle { target: NodeId },
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub tag: Option<Tag>,
    pub kind: NodeKind,
}

/// Placement of the vector surface inside the composed view
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceFrame {
    /// Horizontal offset from the left edge of the composed view
    pub offset_x: f64,
    pub width: f64,
    pub height: f64,
}

/// How much of the scene a redraw request covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawScope {
    Full,
    Node(NodeId),
}

pub trait Scene {
    /// Add a node on top of everything else
    fn add(&mut self, tag: Option<Tag>, kind: NodeKind) -> NodeId;

    /// Remove one node. Returns false if it did not exist.
    fn destroy(&mut self, id: NodeId) -> bool;

    /// Remove every node carrying `tag`, returning how many went away
    fn destroy_tagged(&mut self, tag: Tag) -> usize;

    fn raise_to_top(&mut self, id: NodeId) -> bool;

    fn node(&self, id: NodeId) -> Option<&SceneNode>;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode>;

    fn set_frame(&mut self, frame: SurfaceFrame);

    fn frame(&self) -> SurfaceFrame;

    fn request_redraw(&mut self, scope: RedrawScope);

    fn add_line(&mut self, tag: Tag, line: LineNode) -> NodeId {
        self.add(Some(tag), NodeKind::Line(line))
    }

    fn add_image(&mut self, tag: Tag, image: ImageNode) -> NodeId {
        self.add(Some(tag), NodeKind::Image(image))
    }

    /// Bind a transform handle to an existing image node
    fn add_handle(&mut self, tag: Tag, target: NodeId) -> Option<NodeId> {
        let is_image = matches!(
            self.node(target).map(|node| &node.kind),
            Some(NodeKind::Image(_))
        );
        is_image.then(|| self.add(Some(tag), NodeKind::Handle { target }))
    }

    fn image_mut(&mut self, id: NodeId) -> Option<&mut ImageNode> {
        match self.node_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Image(image)) => Some(image),
            _ => None,
        }
    }

    /// The image a transform handle is bound to
    fn handle_target(&self, handle: NodeId) -> Option<NodeId> {
        match self.node(handle).map(|node| &node.kind) {
            Some(NodeKind::Handle { target }) => Some(*target),
            _ => None,
        }
    }
}
