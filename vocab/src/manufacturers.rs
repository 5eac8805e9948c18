//! Manufacturer directory.
//!
//! Keys are matched by substring against the lower-cased supplier text of a
//! catalog item; the first key in table order that matches wins.

use crate::model::Manufacturer;

/// Returns the built-in manufacturer directory.
#[must_use]
pub fn directory() -> &'static [Manufacturer] {
    MANUFACTURERS
}

const MANUFACTURERS: &[Manufacturer] = &[
    Manufacturer {
        key: "atcc",
        name: "ATCC (American Type Culture Collection)",
        id: Some("http://purl.obolibrary.org/obo/CLO_0000006"),
    },
    Manufacturer {
        key: "biochrom fcs superior",
        name: "Biochrom FCS Superior, Merck KGaA, Darmstadt, Germany",
        id: None,
    },
    Manufacturer { key: "carl zeiss", name: "Carl Zeiss AG, Oberkochen, Germany", id: None },
    Manufacturer { key: "cellvis", name: "Cellvis", id: None },
    Manufacturer { key: "eppendorf", name: "Eppendorf", id: None },
    Manufacturer { key: "greiner", name: "Greiner", id: None },
    Manufacturer { key: "ionoptix", name: "IonOptix", id: None },
    Manufacturer {
        key: "life technologies corporation",
        name: "Life Technologies Corporation, Eugene, Oregon, US",
        id: None,
    },
    Manufacturer {
        key: "life technologies gmbh",
        name: "Life Technologies GmbH, Darmstadt, Germany",
        id: None,
    },
    Manufacturer { key: "ols omni life sciences", name: "OLS Omni Life Sciences", id: None },
    Manufacturer { key: "ratiopharm gmbh", name: "Ratiopharm GmbH, Ulm, Germany", id: None },
    Manufacturer { key: "sanyo", name: "SANYO", id: None },
    Manufacturer {
        key: "serva electrophoresis gmbh",
        name: "SERVA Electrophoresis GmbH, Heidelberg, Germany",
        id: None,
    },
    Manufacturer { key: "sigma aldrich", name: "Sigma Aldrich, Munich, Germany", id: None },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_unique_and_lower_case() {
        let mut seen = std::collections::HashSet::new();
        for m in directory() {
            assert_eq!(m.key, m.key.to_lowercase());
            assert!(seen.insert(m.key), "Duplicate manufacturer key: {}", m.key);
        }
    }
}
