//! Protocol stage vocabulary and section templates.

use crate::model::{ApproachVariant, FixedStage};

/// Marker that makes a stage heading a numbered approach.
pub const APPROACH_MARKER: &str = "approach";

/// Returns the stages matched by heading equality.
#[must_use]
pub fn fixed() -> &'static [FixedStage] {
    FIXED
}

/// Returns the approach variants in match order.
///
/// `without stimulation` must precede `stimulation`, which it contains.
#[must_use]
pub fn approach_variants() -> &'static [ApproachVariant] {
    APPROACH_VARIANTS
}

const FIXED: &[FixedStage] = &[
    FixedStage {
        heading: "preparation",
        key: "preparation",
        title: "Preparation",
        template: "ca-imaging_preparation",
    },
    FixedStage {
        heading: "cell culture",
        key: "cell_culture",
        title: "Cell culture",
        template: "ca-imaging_cell_culture",
    },
    FixedStage {
        heading: "fluo-3 staining",
        key: "fluo-3_staining",
        title: "Fluo-3 Staining",
        template: "ca-imaging_fluo-3_staining",
    },
];

const APPROACH_VARIANTS: &[ApproachVariant] = &[
    ApproachVariant {
        marker: "without stimulation",
        suffix: "without_stimulation",
        template: "ca-imaging_approach_without_stimulation",
    },
    ApproachVariant {
        marker: "stimulation",
        suffix: "with_stimulation",
        template: "ca-imaging_approach_with_stimulation",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_precedes_with() {
        let variants = approach_variants();
        assert!(variants[0].marker.contains(variants[1].marker));
    }

    #[test]
    fn stage_keys_unique() {
        let mut keys = std::collections::HashSet::new();
        for stage in fixed() {
            assert!(keys.insert(stage.key));
        }
    }
}
