use std::collections::HashSet;

use super::ShapeDescriptor;
use crate::error::{ConfigError, Result};
use crate::raster::Label;

/// Default label of the container wall.
pub const WALL_LABEL: Label = 3;

/// Hands out object labels: solids first, liquids strictly above them.
///
/// The solid range is fixed up front so liquid labels can never collide
/// with a solid label allocated later.
#[derive(Debug, Clone)]
pub struct LabelAllocator {
    next_solid: Label,
    solid_end: Label,
    next_liquid: Label,
}

impl LabelAllocator {
    /// Reserves `solid_count` solid labels starting right above `wall_label`.
    #[must_use]
    pub fn new(wall_label: Label, solid_count: usize) -> Self {
        let first = wall_label + 1;
        let count = Label::try_from(solid_count).unwrap_or(Label::MAX - first);
        let solid_end = first.saturating_add(count);
        Self {
            next_solid: first,
            solid_end,
            next_liquid: solid_end,
        }
    }

    /// Next solid label, or `None` once the reserved range is used up.
    pub fn solid(&mut self) -> Option<Label> {
        if self.next_solid >= self.solid_end {
            return None;
        }
        let label = self.next_solid;
        self.next_solid += 1;
        Some(label)
    }

    /// Next liquid label.
    pub fn liquid(&mut self) -> Label {
        let label = self.next_liquid;
        self.next_liquid += 1;
        label
    }
}

/// Checks the label invariants of a descriptor list: solid labels are
/// positive, above the wall label and unique; liquid labels are unique and
/// above every solid label.
///
/// # Errors
///
/// Returns the first violated invariant as a [`ConfigError`].
pub fn validate_labels(descriptors: &[ShapeDescriptor], wall_label: Label) -> Result<()> {
    let mut seen = HashSet::new();
    let mut max_solid = wall_label;
    for d in descriptors {
        if d.label <= wall_label {
            return Err(ConfigError::InvalidInput(format!(
                "solid label {} must be above the wall label {wall_label}",
                d.label
            ))
            .into());
        }
        if !seen.insert(d.label) {
            return Err(ConfigError::DuplicateLabel(d.label).into());
        }
        max_solid = max_solid.max(d.label);
    }
    for liquid in descriptors.iter().filter_map(|d| d.liquid.as_ref()) {
        if liquid.label <= max_solid {
            return Err(ConfigError::LiquidLabelOrder {
                liquid: liquid.label,
                max_solid,
            }
            .into());
        }
        if !seen.insert(liquid.label) {
            return Err(ConfigError::DuplicateLabel(liquid.label).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{LiquidSpec, ShapeGeometry};

    fn ellipse(label: Label) -> ShapeDescriptor {
        ShapeDescriptor::new(
            ShapeGeometry::Ellipse {
                semi_axes: [4.0, 4.0],
                rotation: 0.0,
            },
            label,
        )
    }

    fn liquid(label: Label) -> LiquidSpec {
        LiquidSpec {
            level: 0.5,
            wall_thickness: 1,
            label,
            material: None,
        }
    }

    #[test]
    fn allocator_orders_liquids_after_solids() {
        let mut alloc = LabelAllocator::new(WALL_LABEL, 3);
        assert_eq!(alloc.solid(), Some(4));
        assert_eq!(alloc.liquid(), 7);
        assert_eq!(alloc.solid(), Some(5));
        assert_eq!(alloc.solid(), Some(6));
        assert_eq!(alloc.solid(), None);
        assert_eq!(alloc.liquid(), 8);
    }

    #[test]
    fn valid_list_passes() {
        let list = vec![ellipse(4), ellipse(5).with_liquid(liquid(6))];
        assert!(validate_labels(&list, WALL_LABEL).is_ok());
    }

    #[test]
    fn duplicate_solid_rejected() {
        let list = vec![ellipse(4), ellipse(4)];
        assert!(validate_labels(&list, WALL_LABEL).is_err());
    }

    #[test]
    fn liquid_below_solid_rejected() {
        let list = vec![ellipse(4).with_liquid(liquid(5)), ellipse(6)];
        assert!(validate_labels(&list, WALL_LABEL).is_err());
    }

    #[test]
    fn label_at_or_below_wall_rejected() {
        assert!(validate_labels(&[ellipse(WALL_LABEL)], WALL_LABEL).is_err());
    }
}
