//! The four component kinds of a vapour-compression cycle.
//!
//! Everything that varies per kind (legal successor, anchor geometry, labels)
//! lives in a static table indexed by [`ComponentKind::index`], so adding a
//! match arm can never be forgotten for one kind and not another.

use core::fmt;
use core::str::FromStr;

use crate::error::RcError;
use crate::geometry::Vec2;

/// Component role in the refrigeration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComponentKind {
    Compressor,
    Condenser,
    #[cfg_attr(feature = "serde", serde(alias = "expansion", alias = "valve"))]
    ExpansionValve,
    Evaporator,
}

/// Fixed inbound/outbound anchor offsets relative to a component's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorOffsets {
    pub inbound: Vec2,
    pub outbound: Vec2,
}

struct KindInfo {
    successor: ComponentKind,
    anchors: AnchorOffsets,
    slug: &'static str,
    label: &'static str,
}

/// Width and height of every component body.
pub const BODY_SIZE: f64 = 90.0;

const fn offsets(ix: f64, iy: f64, ox: f64, oy: f64) -> AnchorOffsets {
    AnchorOffsets {
        inbound: Vec2 { x: ix, y: iy },
        outbound: Vec2 { x: ox, y: oy },
    }
}

// Indexed by ComponentKind::index().
const KIND_TABLE: [KindInfo; 4] = [
    KindInfo {
        successor: ComponentKind::Condenser,
        anchors: offsets(-40.0, 40.0, BODY_SIZE + 20.0, -20.0),
        slug: "compressor",
        label: "Compressor",
    },
    KindInfo {
        successor: ComponentKind::ExpansionValve,
        anchors: offsets(-20.0, -20.0, 20.0, BODY_SIZE + 20.0),
        slug: "condenser",
        label: "Condenser",
    },
    KindInfo {
        successor: ComponentKind::Evaporator,
        anchors: offsets(-20.0, 0.0, BODY_SIZE + 20.0, 0.0),
        slug: "expansion_valve",
        label: "Expansion valve",
    },
    KindInfo {
        successor: ComponentKind::Compressor,
        anchors: offsets(BODY_SIZE + 20.0, 40.0, -40.0, 40.0),
        slug: "evaporator",
        label: "Evaporator",
    },
];

impl ComponentKind {
    /// All kinds, in table order.
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Compressor,
        ComponentKind::Condenser,
        ComponentKind::ExpansionValve,
        ComponentKind::Evaporator,
    ];

    /// Number of distinct kinds.
    pub const COUNT: usize = 4;

    /// Dense 0-based index, stable for table lookups.
    pub const fn index(self) -> usize {
        match self {
            ComponentKind::Compressor => 0,
            ComponentKind::Condenser => 1,
            ComponentKind::ExpansionValve => 2,
            ComponentKind::Evaporator => 3,
        }
    }

    /// The only kind this one may feed into.
    pub fn successor(self) -> ComponentKind {
        KIND_TABLE[self.index()].successor
    }

    pub fn anchor_offsets(self) -> AnchorOffsets {
        KIND_TABLE[self.index()].anchors
    }

    /// Machine name used in layout files.
    pub fn slug(self) -> &'static str {
        KIND_TABLE[self.index()].slug
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        KIND_TABLE[self.index()].label
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentKind {
    type Err = RcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match needle.as_str() {
            "expansion" | "valve" => return Ok(ComponentKind::ExpansionValve),
            _ => {}
        }
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.slug() == needle)
            .ok_or_else(|| RcError::UnknownKind { name: s.to_string() })
    }
}
