//! Placement registry: at most one component per kind.

use rc_core::{ComponentKind, DROP_OFFSET, Point, Vec2, near_anchor};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::Component;

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The body of a component (start a drag).
    Body(ComponentKind),
    /// The outbound anchor of a component (start a connection).
    Outbound(ComponentKind),
}

/// Components on the canvas, one slot per kind, remembered in placement order.
#[derive(Debug, Clone, Default)]
pub struct PlacementRegistry {
    slots: [Option<Component>; ComponentKind::COUNT],
    /// Placement order; later entries are drawn on top.
    order: Vec<ComponentKind>,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a component with its top-left corner at `position`.
    pub fn place(&mut self, kind: ComponentKind, position: Point) -> GraphResult<&Component> {
        let slot = &mut self.slots[kind.index()];
        if slot.is_some() {
            return Err(GraphError::DuplicateKind { kind });
        }
        self.order.push(kind);
        debug!(%kind, x = position.x, y = position.y, "placed component");
        Ok(slot.insert(Component::new(kind, position)))
    }

    /// Place a component dropped at a pointer position.
    pub fn place_at_drop(&mut self, kind: ComponentKind, drop: Point) -> GraphResult<&Component> {
        self.place(kind, drop - Vec2::new(DROP_OFFSET, DROP_OFFSET))
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.slots[kind.index()].as_ref()
    }

    pub fn get_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.slots[kind.index()].as_mut()
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Move a placed component; anchors follow automatically.
    pub fn move_to(&mut self, kind: ComponentKind, position: Point) -> GraphResult<()> {
        let comp = self.get_mut(kind).ok_or(GraphError::NotPlaced { kind })?;
        comp.position = position;
        Ok(())
    }

    /// Record `source -> dest` on both endpoints' link fields.
    pub fn link(&mut self, source: ComponentKind, dest: ComponentKind) -> GraphResult<()> {
        if !self.contains(dest) {
            return Err(GraphError::NotPlaced { kind: dest });
        }
        let src = self
            .get_mut(source)
            .ok_or(GraphError::NotPlaced { kind: source })?;
        src.outbound = Some(dest);
        if let Some(dst) = self.get_mut(dest) {
            dst.inbound = Some(source);
        }
        Ok(())
    }

    /// Components in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> + '_ {
        self.order.iter().filter_map(|k| self.get(*k))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn set_animating(&mut self, animating: bool) {
        for comp in self.slots.iter_mut().flatten() {
            comp.animating = animating;
        }
    }

    pub fn remove_all(&mut self) {
        self.slots = Default::default();
        self.order.clear();
    }

    /// Topmost component whose body contains `p`.
    pub fn component_at(&self, p: Point) -> Option<ComponentKind> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|k| self.get(*k).is_some_and(|c| c.contains(p)))
    }

    /// Resolve a pointer press, topmost first; a body wins over an anchor of
    /// the same component.
    pub fn press_target(&self, p: Point) -> Option<PressTarget> {
        for &kind in self.order.iter().rev() {
            let Some(comp) = self.get(kind) else {
                continue;
            };
            if comp.contains(p) {
                return Some(PressTarget::Body(kind));
            }
            if near_anchor(comp.anchors().outbound, p) {
                return Some(PressTarget::Outbound(kind));
            }
        }
        None
    }

    /// First component (other than `from`) whose inbound anchor is near `p`.
    pub fn inbound_anchor_at(&self, p: Point, from: ComponentKind) -> Option<ComponentKind> {
        self.iter()
            .filter(|c| c.kind != from)
            .find(|c| near_anchor(c.anchors().inbound, p))
            .map(|c| c.kind)
    }
}
