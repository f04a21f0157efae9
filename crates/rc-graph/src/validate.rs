//! Cycle completeness check.

use rc_core::ComponentKind;
use thiserror::Error;

use crate::graph::Connection;
use crate::registry::PlacementRegistry;

/// Why the simulation cannot start yet.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartBlocker {
    #[error("All 4 components must be placed ({placed} on the canvas)")]
    MissingComponents { placed: usize },

    #[error("All components must be connected in order ({connected} of 4 connections)")]
    MissingConnections { connected: usize },

    #[error("The cycle is not complete; check the connections")]
    IncompleteCycle,
}

/// Whether following outbound links from the compressor visits every kind
/// exactly once, in successor-table order, and comes back to the compressor.
///
/// Every connection must also be a successor-table edge, so the only
/// accepted shape is compressor -> condenser -> valve -> evaporator -> compressor.
pub fn is_complete_cycle(registry: &PlacementRegistry, connections: &[Connection]) -> bool {
    if registry.len() != ComponentKind::COUNT || connections.len() != ComponentKind::COUNT {
        return false;
    }

    if !connections.iter().all(|c| c.source.successor() == c.dest) {
        return false;
    }

    let Some(start) = registry.get(ComponentKind::Compressor) else {
        return false;
    };

    let mut visited = [false; ComponentKind::COUNT];
    visited[ComponentKind::Compressor.index()] = true;
    let mut count = 1;

    let mut prev = ComponentKind::Compressor;
    let mut current = start.outbound;
    while let Some(kind) = current {
        if visited[kind.index()] || prev.successor() != kind {
            break;
        }
        visited[kind.index()] = true;
        count += 1;
        prev = kind;
        current = registry.get(kind).and_then(|c| c.outbound);
    }

    count == ComponentKind::COUNT
        && prev.successor() == ComponentKind::Compressor
        && current == Some(ComponentKind::Compressor)
}

/// Start preconditions, each failing with its own reason.
pub fn check_startable(
    registry: &PlacementRegistry,
    connections: &[Connection],
) -> Result<(), StartBlocker> {
    if registry.len() != ComponentKind::COUNT {
        return Err(StartBlocker::MissingComponents {
            placed: registry.len(),
        });
    }
    if connections.len() != ComponentKind::COUNT {
        return Err(StartBlocker::MissingConnections {
            connected: connections.len(),
        });
    }
    if !is_complete_cycle(registry, connections) {
        return Err(StartBlocker::IncompleteCycle);
    }
    Ok(())
}
