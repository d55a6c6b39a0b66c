//! Board configuration
//!
//! One value describes a whole build: bus address, pointer policy,
//! orientation, debounce policy and sensor topology. The firmware loads it
//! from `board.toml` at startup instead of selecting variants at compile
//! time.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use chessboard_protocol::DEFAULT_ADDRESS;

use super::hardware::SensorConfig;
use crate::debounce::FilterPolicy;
use crate::orientation::{Orientation, Rotation};
use crate::registers::PointerMode;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Bus target settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// 7-bit target address
    pub address: u8,
    pub pointer_mode: PointerMode,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            pointer_mode: PointerMode::Fixed,
        }
    }
}

/// Where the horizontal flip is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlipStage {
    /// Folded into bit assignment while scanning
    #[default]
    Scan,
    /// Applied by the orientation transform after the filter
    Transform,
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    pub version: u8,
    pub bus: BusConfig,
    pub orientation: Orientation,
    pub flip_stage: FlipStage,
    pub debounce: FilterPolicy,
    pub sensor: SensorConfig,
}

impl Default for BoardConfig {
    /// The reference build: shift registers, 90° rotation, flipped
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            bus: BusConfig::default(),
            orientation: Orientation::new(Rotation::Deg90, true),
            flip_stage: FlipStage::Scan,
            debounce: FilterPolicy::default(),
            sensor: SensorConfig::default(),
        }
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sampler should fold the flip into its scan
    pub fn scan_flip(&self) -> bool {
        self.orientation.flip && self.flip_stage == FlipStage::Scan && !self.is_simulated()
    }

    /// Orientation the pipeline applies after the filter
    ///
    /// The simulated board is already canonical, so it gets the identity.
    pub fn transform_orientation(&self) -> Orientation {
        if self.is_simulated() {
            Orientation::IDENTITY
        } else if self.flip_stage == FlipStage::Scan {
            self.orientation.without_flip()
        } else {
            self.orientation
        }
    }

    /// Filter policy the pipeline runs with
    pub fn filter_policy(&self) -> FilterPolicy {
        if self.is_simulated() {
            FilterPolicy::Passthrough
        } else {
            self.debounce
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.sensor, SensorConfig::Simulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_stage_moves_flip_to_sampler() {
        let config = BoardConfig::default();
        assert!(config.scan_flip());
        assert_eq!(
            config.transform_orientation(),
            Orientation::new(Rotation::Deg90, false)
        );
    }

    #[test]
    fn test_transform_stage_keeps_flip() {
        let config = BoardConfig {
            flip_stage: FlipStage::Transform,
            ..BoardConfig::default()
        };
        assert!(!config.scan_flip());
        assert!(config.transform_orientation().flip);
    }

    #[test]
    fn test_simulated_is_canonical() {
        let config = BoardConfig {
            sensor: SensorConfig::Simulated,
            ..BoardConfig::default()
        };
        assert!(!config.scan_flip());
        assert_eq!(config.transform_orientation(), Orientation::IDENTITY);
        assert_eq!(config.filter_policy(), FilterPolicy::Passthrough);
    }
}
