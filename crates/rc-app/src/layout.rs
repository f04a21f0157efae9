//! Puzzle layouts: placements and proposed links, stored as YAML.
//!
//! ```yaml
//! placements:
//!   - { kind: compressor, x: 320, y: 60 }
//!   - { kind: condenser, x: 560, y: 220 }
//! links:
//!   - { from: compressor, to: condenser }
//! ```

use std::path::Path;

use rc_core::{ComponentKind, Vec2};
use rc_graph::ProposalOutcome;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: ComponentKind,
    pub x: f64,
    pub y: f64,
    /// Treat `(x, y)` as a drop point rather than the body origin.
    #[serde(default)]
    pub drop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: ComponentKind,
    pub to: ComponentKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// What happened to one layout entry when replayed.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    Placed(ComponentKind),
    PlacementRejected { kind: ComponentKind, reason: String },
    Proposed { link: Link, outcome: ProposalOutcome },
    ProposalFailed { link: Link, reason: String },
}

impl Layout {
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Layout(format!("Failed to parse layout YAML: {}", e)))
    }

    /// Load layout from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::Layout(format!("Failed to serialize layout: {}", e)))
    }

    /// Place everything, then propose every link, in file order.
    ///
    /// Rejections are reported per step rather than aborting the replay, so a
    /// layout with mistakes still shows how many lives it would cost.
    pub fn replay(&self, session: &mut Session) -> Vec<ReplayStep> {
        let mut steps = Vec::with_capacity(self.placements.len() + self.links.len());
        for p in &self.placements {
            let point = Vec2::new(p.x, p.y);
            let placed = if p.drop {
                session.place_at_drop(p.kind, point)
            } else {
                session.place(p.kind, point)
            };
            steps.push(match placed {
                Ok(()) => ReplayStep::Placed(p.kind),
                Err(e) => ReplayStep::PlacementRejected {
                    kind: p.kind,
                    reason: e.to_string(),
                },
            });
        }
        for &link in &self.links {
            steps.push(match session.propose(link.from, link.to) {
                Ok(outcome) => ReplayStep::Proposed { link, outcome },
                Err(e) => ReplayStep::ProposalFailed {
                    link,
                    reason: e.to_string(),
                },
            });
        }
        steps
    }
}
