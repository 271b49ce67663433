//! Scroll edges and per-container edge state

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four scroll boundaries of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges, in the order they are evaluated during a refresh
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Lowercase name used in logs and callbacks
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Edge::Top => 1 << 0,
            Edge::Bottom => 1 << 1,
            Edge::Left => 1 << 2,
            Edge::Right => 1 << 3,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of reached edges (atTop, atBottom, atLeft, atRight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeSet(u8);

impl EdgeSet {
    /// No edge reached
    pub const EMPTY: EdgeSet = EdgeSet(0);

    /// Every edge reached
    pub const ALL: EdgeSet = EdgeSet(0b1111);

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn contains(self, edge: Edge) -> bool {
        self.0 & edge.bit() != 0
    }

    pub fn set(&mut self, edge: Edge, reached: bool) {
        if reached {
            self.0 |= edge.bit();
        } else {
            self.0 &= !edge.bit();
        }
    }

    /// Builder-style variant of [`EdgeSet::set`]
    pub fn with(mut self, edge: Edge, reached: bool) -> Self {
        self.set(edge, reached);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn at_top(self) -> bool {
        self.contains(Edge::Top)
    }

    pub fn at_bottom(self) -> bool {
        self.contains(Edge::Bottom)
    }

    pub fn at_left(self) -> bool {
        self.contains(Edge::Left)
    }

    pub fn at_right(self) -> bool {
        self.contains(Edge::Right)
    }

    /// Iterate the reached edges in evaluation order
    pub fn iter(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |e| self.contains(*e))
    }

    /// Edges whose state differs between `self` and `other`
    pub fn changed(self, other: EdgeSet) -> EdgeSet {
        EdgeSet(self.0 ^ other.0)
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut set = EdgeSet::EMPTY;
        for edge in iter {
            set.set(edge, true);
        }
        set
    }
}

impl fmt::Display for EdgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for edge in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(edge.as_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Which axes of a container currently overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl ScrollDirection {
    pub fn from_axes(horizontal: bool, vertical: bool) -> Self {
        match (horizontal, vertical) {
            (false, false) => ScrollDirection::None,
            (true, false) => ScrollDirection::Horizontal,
            (false, true) => ScrollDirection::Vertical,
            (true, true) => ScrollDirection::Both,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, ScrollDirection::Horizontal | ScrollDirection::Both)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, ScrollDirection::Vertical | ScrollDirection::Both)
    }
}
