//! Resources: a quantity of a commodity plus the quality it is delivered at.

use std::fmt;

use crate::types::quantity::from_fixed_trimmed;

/// A quantity of material with a quality descriptor.
///
/// Two resources are compatible when their units and quality both match;
/// a request can only be filled by offers of a compatible resource.
///
/// ## Example
///
/// ```
/// use commodity_clearing::types::Resource;
/// use commodity_clearing::types::quantity::units;
///
/// let offered = Resource::new("kg", "natu", units(15));
/// let wanted = Resource::new("kg", "natu", units(10));
/// let other = Resource::new("kg", "leu", units(10));
///
/// assert!(wanted.is_compatible(&offered));
/// assert!(!wanted.is_compatible(&other));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Resource {
    /// Unit of measure, e.g. "kg"
    pub units: String,

    /// Quality descriptor, e.g. an isotopic recipe name
    pub quality: String,

    /// Quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,
}

impl Resource {
    pub fn new(units: impl Into<String>, quality: impl Into<String>, quantity: u64) -> Self {
        Self {
            units: units.into(),
            quality: quality.into(),
            quantity,
        }
    }

    /// Quality-equality predicate used before any match.
    #[inline]
    pub fn is_compatible(&self, other: &Resource) -> bool {
        self.units == other.units && self.quality == other.quality
    }

    /// Same units and quality, different quantity.
    pub fn with_quantity(&self, quantity: u64) -> Self {
        Self {
            units: self.units.clone(),
            quality: self.quality.clone(),
            quantity,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} of {}",
            from_fixed_trimmed(self.quantity),
            self.units,
            self.quality
        )
    }
}
