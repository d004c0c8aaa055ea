/// One edge of an [`Anchor`].
///
/// A fractional edge is a coordinate measured as a fraction of the parent's
/// size on that axis. An absolute edge is a distance in world units: from
/// the parent's near edge for `min_*` fields, and inset from the far edge
/// for `max_*` fields, which gives absolute anchors margin semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorEdge {
    /// Edge value: a fraction, or a unit distance when `absolute`.
    pub value: f32,
    /// Treat `value` as a literal unit distance instead of a fraction.
    pub absolute: bool,
}

impl AnchorEdge {
    /// A fractional edge.
    pub const fn fraction(value: f32) -> Self {
        Self {
            value,
            absolute: false,
        }
    }

    /// An absolute edge, in world units.
    pub const fn absolute(value: f32) -> Self {
        Self {
            value,
            absolute: true,
        }
    }

    /// Resolve this edge as a `min` coordinate inside a parent of `size`.
    pub fn resolve_min(self, size: f32) -> f32 {
        if self.absolute {
            self.value
        } else {
            self.value * size
        }
    }

    /// Resolve this edge as a `max` coordinate inside a parent of `size`.
    pub fn resolve_max(self, size: f32) -> f32 {
        if self.absolute {
            size - self.value
        } else {
            self.value * size
        }
    }
}

/// Layout directive that places a node in a box derived from its parent.
///
/// The box runs from the resolved `min` edges to the resolved `max` edges on
/// each axis. The node's own position, rotation and scale are then applied
/// inside that box. Anchors only take effect on nodes with a participating
/// parent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub min_x: AnchorEdge,
    pub min_y: AnchorEdge,
    pub min_z: AnchorEdge,
    pub max_x: AnchorEdge,
    pub max_y: AnchorEdge,
    pub max_z: AnchorEdge,
}

impl Anchor {
    /// Zero-sized box at the parent's centre on X/Y, spanning Z.
    pub const CENTER: Self = Self {
        min_x: AnchorEdge::fraction(0.5),
        min_y: AnchorEdge::fraction(0.5),
        min_z: AnchorEdge::fraction(0.0),
        max_x: AnchorEdge::fraction(0.5),
        max_y: AnchorEdge::fraction(0.5),
        max_z: AnchorEdge::fraction(1.0),
    };

    /// Box covering the whole parent.
    pub const STRETCH: Self = Self {
        min_x: AnchorEdge::fraction(0.0),
        min_y: AnchorEdge::fraction(0.0),
        min_z: AnchorEdge::fraction(0.0),
        max_x: AnchorEdge::fraction(1.0),
        max_y: AnchorEdge::fraction(1.0),
        max_z: AnchorEdge::fraction(1.0),
    };

    /// Box inset from the parent by fixed margins on X/Y, spanning Z.
    pub const fn margins(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            min_x: AnchorEdge::absolute(left),
            min_y: AnchorEdge::absolute(top),
            min_z: AnchorEdge::fraction(0.0),
            max_x: AnchorEdge::absolute(right),
            max_y: AnchorEdge::absolute(bottom),
            max_z: AnchorEdge::fraction(1.0),
        }
    }

    /// `min` edges as `[x, y, z]`.
    pub fn min(&self) -> [AnchorEdge; 3] {
        [self.min_x, self.min_y, self.min_z]
    }

    /// `max` edges as `[x, y, z]`.
    pub fn max(&self) -> [AnchorEdge; 3] {
        [self.max_x, self.max_y, self.max_z]
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::STRETCH
    }
}
