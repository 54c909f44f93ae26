//! In-memory scene used by the application and tests

use super::{NodeId, NodeKind, RedrawScope, Scene, SceneNode, SurfaceFrame, Tag};

/// Scene that keeps nodes in a z-ordered list, bottom first
#[derive(Debug, Default)]
pub struct RetainedScene {
    nodes: Vec<SceneNode>,
    next_id: u64,
    frame: SurfaceFrame,
    full_redraws: usize,
    partial_redraws: usize,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes bottom to top
    #[cfg(test)]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn count_tagged(&self, tag: Tag) -> usize {
        self.nodes.iter().filter(|n| n.tag == Some(tag)).count()
    }

    #[cfg(test)]
    pub fn top(&self) -> Option<&SceneNode> {
        self.nodes.last()
    }

    /// Redraw requests seen so far, as (full, single node)
    #[cfg(test)]
    pub fn redraw_counts(&self) -> (usize, usize) {
        (self.full_redraws, self.partial_redraws)
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }
}

impl Scene for RetainedScene {
    fn add(&mut self, tag: Option<Tag>, kind: NodeKind) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        self.nodes.push(SceneNode { id, tag, kind });
        id
    }

    fn destroy(&mut self, id: NodeId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    fn destroy_tagged(&mut self, tag: Tag) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.tag != Some(tag));
        before - self.nodes.len()
    }

    fn raise_to_top(&mut self, id: NodeId) -> bool {
        match self.position(id) {
            Some(index) => {
                let node = self.nodes.remove(index);
                self.nodes.push(node);
                true
            }
            None => false,
        }
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn set_frame(&mut self, frame: SurfaceFrame) {
        self.frame = frame;
    }

    fn frame(&self) -> SurfaceFrame {
        self.frame
    }

    fn request_redraw(&mut self, scope: RedrawScope) {
        match scope {
            RedrawScope::Full => self.full_redraws += 1,
            RedrawScope::Node(_) => self.partial_redraws += 1,
        }
        log::trace!(
            "Redraw requested: {:?} ({} full, {} partial so far)",
            scope,
            self.full_redraws,
            self.partial_redraws
        );
    }
}

/// Handles whose target image no longer exists
#[cfg(test)]
pub(crate) fn dangling_handles(scene: &RetainedScene) -> Vec<NodeId> {
    let ids: std::collections::HashSet<NodeId> = scene.nodes().iter().map(|n| n.id).collect();
    scene
        .nodes()
        .iter()
        .filter_map(|n| match n.kind {
            NodeKind::Handle { target } if !ids.contains(&target) => Some(n.id),
            _ => None,
        })
        .collect()
}
