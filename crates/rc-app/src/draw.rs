//! Frame snapshot handed to a renderer.
//!
//! Connections come first so components paint over pipe ends.

use rc_core::{Anchors, ComponentKind, Point, QuadCurve, RefrigerantState};
use rc_graph::CycleGraph;
use rc_sim::{Phase, particle_position};

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDraw {
    pub position: Point,
    pub size: f64,
    pub length: f64,
    pub state: RefrigerantState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDraw {
    pub source: ComponentKind,
    pub dest: ComponentKind,
    pub curve: QuadCurve,
    /// Carries flow in the current phase.
    pub active: bool,
    pub particles: Vec<ParticleDraw>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDraw {
    pub kind: ComponentKind,
    pub position: Point,
    pub anchors: Anchors,
    pub animating: bool,
}

/// Ordered draw list: every connection, then every component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub connections: Vec<ConnectionDraw>,
    pub components: Vec<ComponentDraw>,
}

impl DrawList {
    /// Snapshot `graph`; `phase` is `None` while stopped.
    pub fn build(graph: &CycleGraph, phase: Option<Phase>) -> Self {
        let registry = graph.registry();
        let connections = graph
            .connections()
            .iter()
            .filter_map(|conn| {
                let curve = conn.curve(registry)?;
                let particles = conn
                    .particles
                    .iter()
                    .map(|p| ParticleDraw {
                        position: particle_position(&curve, p),
                        size: p.size,
                        length: p.length,
                        state: p.state,
                    })
                    .collect();
                Some(ConnectionDraw {
                    source: conn.source,
                    dest: conn.dest,
                    curve,
                    active: phase.is_some_and(|ph| ph.is_active(conn.source, conn.dest)),
                    particles,
                })
            })
            .collect();

        let components = registry
            .iter()
            .map(|c| ComponentDraw {
                kind: c.kind,
                position: c.position,
                anchors: c.anchors(),
                animating: c.animating,
            })
            .collect();

        Self {
            connections,
            components,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.connections.iter().map(|c| c.particles.len()).sum()
    }
}
