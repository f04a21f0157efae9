//! Connection validation against the fixed successor table.

use rc_core::ComponentKind;
use tracing::{info, warn};

use crate::error::{GraphError, GraphResult};
use crate::graph::Connection;
use crate::registry::PlacementRegistry;

/// Result of proposing a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalOutcome {
    /// A new connection was created.
    Accepted,
    /// The same pair was already connected; nothing changed, no penalty.
    AlreadyConnected,
    /// Wrong successor; one life was lost.
    Rejected { lives_left: u8 },
    /// Wrong successor and it cost the last life; the session is over.
    GameOver,
    /// The session had already ended; the proposal was ignored.
    Ignored,
}

impl ProposalOutcome {
    pub fn is_penalty(self) -> bool {
        matches!(self, ProposalOutcome::Rejected { .. } | ProposalOutcome::GameOver)
    }
}

/// Remaining attempts before the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lives {
    remaining: u8,
    max: u8,
}

impl Lives {
    pub fn new(max: u8) -> Self {
        Self {
            remaining: max,
            max,
        }
    }

    pub fn remaining(self) -> u8 {
        self.remaining
    }

    pub fn max(self) -> u8 {
        self.max
    }

    pub fn is_exhausted(self) -> bool {
        self.remaining == 0
    }

    /// Lose one life, saturating at zero. Returns what is left.
    fn lose(&mut self) -> u8 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    fn restore(&mut self) {
        self.remaining = self.max;
    }
}

/// Enforces the successor table and keeps the shared life counter.
#[derive(Debug, Clone)]
pub struct ConnectionValidator {
    lives: Lives,
}

impl ConnectionValidator {
    pub fn new(max_lives: u8) -> Self {
        Self {
            lives: Lives::new(max_lives),
        }
    }

    pub fn lives(&self) -> Lives {
        self.lives
    }

    /// Whether lives ran out; only a reset reopens the session.
    pub fn is_ended(&self) -> bool {
        self.lives.is_exhausted()
    }

    pub fn restore(&mut self) {
        self.lives.restore();
    }

    /// Judge `source -> dest` and, if legal and new, record it.
    ///
    /// Both endpoints must be placed. Any pair other than the successor-table
    /// pair costs a life, including a component linked to itself.
    pub fn propose(
        &mut self,
        registry: &mut PlacementRegistry,
        connections: &mut Vec<Connection>,
        source: ComponentKind,
        dest: ComponentKind,
    ) -> GraphResult<ProposalOutcome> {
        if self.is_ended() {
            return Ok(ProposalOutcome::Ignored);
        }
        for kind in [source, dest] {
            if !registry.contains(kind) {
                return Err(GraphError::NotPlaced { kind });
            }
        }

        if source.successor() != dest {
            let lives_left = self.lives.lose();
            warn!(%source, %dest, lives_left, "wrong connection order");
            if lives_left == 0 {
                return Ok(ProposalOutcome::GameOver);
            }
            return Ok(ProposalOutcome::Rejected { lives_left });
        }

        if connections.iter().any(|c| c.links(source, dest)) {
            return Ok(ProposalOutcome::AlreadyConnected);
        }

        registry.link(source, dest)?;
        connections.push(Connection::new(source, dest));
        info!(%source, %dest, "connection accepted");
        Ok(ProposalOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::Vec2;

    fn full_registry() -> PlacementRegistry {
        let mut reg = PlacementRegistry::new();
        for kind in ComponentKind::ALL {
            reg.place(kind, Vec2::default()).unwrap();
        }
        reg
    }

    #[test]
    fn accepts_successor() {
        let mut reg = full_registry();
        let mut conns = Vec::new();
        let mut v = ConnectionValidator::new(3);
        let out = v
            .propose(
                &mut reg,
                &mut conns,
                ComponentKind::Condenser,
                ComponentKind::ExpansionValve,
            )
            .unwrap();
        assert_eq!(out, ProposalOutcome::Accepted);
        assert_eq!(conns.len(), 1);
        assert_eq!(v.lives().remaining(), 3);
    }

    #[test]
    fn duplicate_is_silent() {
        let mut reg = full_registry();
        let mut conns = Vec::new();
        let mut v = ConnectionValidator::new(3);
        let (s, d) = (ComponentKind::Compressor, ComponentKind::Condenser);
        v.propose(&mut reg, &mut conns, s, d).unwrap();
        let out = v.propose(&mut reg, &mut conns, s, d).unwrap();
        assert_eq!(out, ProposalOutcome::AlreadyConnected);
        assert_eq!(conns.len(), 1);
        assert_eq!(v.lives().remaining(), 3);
    }

    #[test]
    fn self_link_costs_a_life() {
        let mut reg = full_registry();
        let mut conns = Vec::new();
        let mut v = ConnectionValidator::new(3);
        let out = v
            .propose(
                &mut reg,
                &mut conns,
                ComponentKind::Evaporator,
                ComponentKind::Evaporator,
            )
            .unwrap();
        assert_eq!(out, ProposalOutcome::Rejected { lives_left: 2 });
        assert!(conns.is_empty());
    }

    #[test]
    fn unplaced_endpoint_is_an_error() {
        let mut reg = PlacementRegistry::new();
        reg.place(ComponentKind::Compressor, Vec2::default())
            .unwrap();
        let mut conns = Vec::new();
        let mut v = ConnectionValidator::new(3);
        let err = v
            .propose(
                &mut reg,
                &mut conns,
                ComponentKind::Compressor,
                ComponentKind::Condenser,
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::NotPlaced {
                kind: ComponentKind::Condenser
            }
        );
        assert_eq!(v.lives().remaining(), 3);
    }

    #[test]
    fn lives_saturate() {
        let mut lives = Lives::new(1);
        assert_eq!(lives.lose(), 0);
        assert_eq!(lives.lose(), 0);
        assert!(lives.is_exhausted());
        lives.restore();
        assert_eq!(lives.remaining(), 1);
    }
}
