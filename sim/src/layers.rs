//! Collision layers used to filter probes and pick slope thresholds.

use serde::{Deserialize, Serialize};

/// A single collision layer, `0..=31`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layer(u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);
    /// Step geometry; walkable at the more permissive stairs angle.
    pub const STAIRS: Layer = Layer(1);
    /// Characters. Excluded from ground probes and camera obstruction by default.
    pub const AGENT: Layer = Layer(2);
    /// Loose dynamic props.
    pub const PROP: Layer = Layer(3);

    pub const fn new(index: u8) -> Self {
        assert!(index < 32, "layer index out of range");
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn bit(self) -> u32 {
        1 << self.0
    }
}

/// Bit set of [`Layer`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn from_layers(layers: &[Layer]) -> Self {
        layers.iter().fold(Self::NONE, |mask, layer| mask.with(*layer))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub const fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.bit())
    }

    pub const fn without(self, layer: Layer) -> Self {
        Self(self.0 & !layer.bit())
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
