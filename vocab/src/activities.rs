//! Activity vocabulary: free-text phrases mapped to OBI, NCIT and OMIT classes.
//!
//! Several phrases may denote the same class (`add` and `fill` both denote
//! "adding a material entity into a target"); the classifier collapses them.

use crate::model::ActivityPhrase;

const OBI_WASHING: &str = "http://purl.obolibrary.org/obo/OBI_0302888";
const OBI_ADDING_MATERIAL: &str = "http://purl.obolibrary.org/obo/OBI_0000274";
const OBI_MATERIAL_SEPARATION: &str = "http://purl.obolibrary.org/obo/OBI_0600014";
const OBI_STORAGE: &str = "http://purl.obolibrary.org/obo/OBI_0302893";
const OBI_CREATING_MIXTURE: &str = "http://purl.obolibrary.org/obo/OBI_0000685";
const OBI_ADMINISTRATION: &str = "http://purl.obolibrary.org/obo/OBI_0000995";
const OBI_MATERIAL_PROCESSING: &str = "http://purl.obolibrary.org/obo/OBI_0000094";
const NCIT_SHAKE: &str = "http://purl.obolibrary.org/obo/NCIT_C64646";
const APOLLO_COUNTING: &str = "http://purl.obolibrary.org/obo/APOLLO_SV_00000033";
const NCIT_CALCULATION: &str = "http://purl.obolibrary.org/obo/NCIT_C54125";
const OBI_CENTRIFUGATION: &str = "http://purl.obolibrary.org/obo/OBI_0302886";
const NCIT_PREPARATION: &str = "http://purl.obolibrary.org/obo/NCIT_C25625";
const NCIT_FIX: &str = "http://purl.obolibrary.org/obo/NCIT_C52253";
const NCIT_ACTIVATION: &str = "http://purl.obolibrary.org/obo/NCIT_C64382";
const OBI_IMAGE_CREATION: &str = "http://purl.obolibrary.org/obo/OBI_0001007";
const OMIT_ELECTRIC_STIMULATION: &str = "http://purl.obolibrary.org/obo/OMIT_0005807";

/// Returns the built-in activity phrase table.
#[must_use]
pub fn phrases() -> &'static [ActivityPhrase] {
    PHRASES
}

const PHRASES: &[ActivityPhrase] = &[
    ActivityPhrase { phrase: "wash", class: OBI_WASHING, label: "washing" },
    ActivityPhrase {
        phrase: "add",
        class: OBI_ADDING_MATERIAL,
        label: "adding a material entity into a target",
    },
    ActivityPhrase {
        phrase: "fill",
        class: OBI_ADDING_MATERIAL,
        label: "adding a material entity into a target",
    },
    ActivityPhrase {
        phrase: "suction",
        class: OBI_MATERIAL_SEPARATION,
        label: "material component separation",
    },
    ActivityPhrase { phrase: "incubate", class: OBI_STORAGE, label: "storage" },
    ActivityPhrase { phrase: "store", class: OBI_STORAGE, label: "storage" },
    ActivityPhrase {
        phrase: "stop the reaction",
        class: OBI_CREATING_MIXTURE,
        label: "creating a mixture of molecules in solution",
    },
    ActivityPhrase {
        phrase: "replace",
        class: OBI_ADMINISTRATION,
        label: "administration of material to specimen",
    },
    ActivityPhrase {
        phrase: "relocate",
        class: OBI_MATERIAL_PROCESSING,
        label: "material processing",
    },
    ActivityPhrase {
        phrase: "transfer",
        class: OBI_MATERIAL_PROCESSING,
        label: "material processing",
    },
    // "take out" of a fridge could also be read as acclimatization (OBI_0600011).
    ActivityPhrase {
        phrase: "take out",
        class: OBI_MATERIAL_PROCESSING,
        label: "material processing",
    },
    ActivityPhrase { phrase: "resuspend", class: NCIT_SHAKE, label: "Shake" },
    ActivityPhrase { phrase: "count", class: APOLLO_COUNTING, label: "counting" },
    ActivityPhrase { phrase: "calculate", class: NCIT_CALCULATION, label: "Calculation" },
    ActivityPhrase {
        phrase: "centrifugate",
        class: OBI_CENTRIFUGATION,
        label: "centrifugation",
    },
    ActivityPhrase { phrase: "prepare", class: NCIT_PREPARATION, label: "Preparation" },
    ActivityPhrase { phrase: "set", class: NCIT_PREPARATION, label: "Preparation" },
    ActivityPhrase { phrase: "place", class: NCIT_FIX, label: "Fix" },
    ActivityPhrase { phrase: "attach", class: NCIT_FIX, label: "Fix" },
    ActivityPhrase { phrase: "switch on", class: NCIT_ACTIVATION, label: "Activation" },
    ActivityPhrase { phrase: "analyse", class: OBI_IMAGE_CREATION, label: "image creation" },
    ActivityPhrase {
        phrase: "stimulation",
        class: OMIT_ELECTRIC_STIMULATION,
        label: "Electric Stimulation",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_are_lower_case() {
        for entry in phrases() {
            assert_eq!(entry.phrase, entry.phrase.to_lowercase(), "{}", entry.phrase);
        }
    }

    #[test]
    fn phrases_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in phrases() {
            assert!(seen.insert(entry.phrase), "Duplicate phrase: {}", entry.phrase);
        }
    }

    #[test]
    fn synonyms_share_a_class() {
        let class_of = |p: &str| phrases().iter().find(|e| e.phrase == p).map(|e| e.class);
        assert_eq!(class_of("add"), class_of("fill"));
        assert_eq!(class_of("incubate"), class_of("store"));
    }
}
