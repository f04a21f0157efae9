//! Core graph data structures.

use rc_core::{Anchors, ComponentKind, Particle, Point, QuadCurve, body_contains};

use crate::error::GraphResult;
use crate::registry::PlacementRegistry;
use crate::validate::{self, StartBlocker};
use crate::validator::{ConnectionValidator, ProposalOutcome};

/// A placed component.
///
/// Links are stored by kind: the registry holds at most one component per
/// kind, so a kind names a component unambiguously.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    /// Top-left corner of the body.
    pub position: Point,
    pub inbound: Option<ComponentKind>,
    pub outbound: Option<ComponentKind>,
    /// Set while the simulation runs; renderers use it for motion effects.
    pub animating: bool,
}

impl Component {
    pub fn new(kind: ComponentKind, position: Point) -> Self {
        Self {
            kind,
            position,
            inbound: None,
            outbound: None,
            animating: false,
        }
    }

    /// Anchor points, recomputed from the current position.
    pub fn anchors(&self) -> Anchors {
        Anchors::for_kind(self.kind, self.position)
    }

    pub fn contains(&self, p: Point) -> bool {
        body_contains(self.position, p)
    }
}

/// Directed pipe from `source`'s outbound anchor to `dest`'s inbound anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: ComponentKind,
    pub dest: ComponentKind,
    /// Live particles; only ever non-empty while this pipe is active.
    pub particles: Vec<Particle>,
}

impl Connection {
    pub fn new(source: ComponentKind, dest: ComponentKind) -> Self {
        Self {
            source,
            dest,
            particles: Vec::new(),
        }
    }

    pub fn links(&self, source: ComponentKind, dest: ComponentKind) -> bool {
        self.source == source && self.dest == dest
    }

    /// Pipe curve for the current component positions.
    ///
    /// Returns `None` if either endpoint is no longer placed.
    pub fn curve(&self, registry: &PlacementRegistry) -> Option<QuadCurve> {
        let start = registry.get(self.source)?.anchors().outbound;
        let end = registry.get(self.dest)?.anchors().inbound;
        Some(QuadCurve::between(start, end))
    }
}

/// Placement registry, accepted connections and the validator, owned together.
#[derive(Debug, Clone)]
pub struct CycleGraph {
    registry: PlacementRegistry,
    connections: Vec<Connection>,
    validator: ConnectionValidator,
}

impl CycleGraph {
    /// Empty graph whose validator starts with `max_lives`.
    pub fn new(max_lives: u8) -> Self {
        Self {
            registry: PlacementRegistry::new(),
            connections: Vec::new(),
            validator: ConnectionValidator::new(max_lives),
        }
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PlacementRegistry {
        &mut self.registry
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    pub fn validator(&self) -> &ConnectionValidator {
        &self.validator
    }

    pub fn place(&mut self, kind: ComponentKind, position: Point) -> GraphResult<&Component> {
        self.registry.place(kind, position)
    }

    pub fn propose(
        &mut self,
        source: ComponentKind,
        dest: ComponentKind,
    ) -> GraphResult<ProposalOutcome> {
        self.validator
            .propose(&mut self.registry, &mut self.connections, source, dest)
    }

    pub fn is_complete(&self) -> bool {
        validate::is_complete_cycle(&self.registry, &self.connections)
    }

    pub fn check_startable(&self) -> Result<(), StartBlocker> {
        validate::check_startable(&self.registry, &self.connections)
    }

    /// Drop every particle on every pipe.
    pub fn clear_particles(&mut self) {
        for conn in &mut self.connections {
            conn.particles.clear();
        }
    }

    /// Remove all components and connections and restore lives.
    pub fn reset(&mut self) {
        self.registry.remove_all();
        self.connections.clear();
        self.validator.restore();
    }
}
