//! Physical-quantity shapes recognized in step descriptions.
//!
//! Duration and voltage values carry `xsd:nonNegativeInteger` although their
//! patterns admit signed and fractional tokens. The engine keeps the datatype
//! and reports non-conforming tokens.

use crate::model::{NumericDatatype, QuantityShape, Unit};

const OBI_TEMPERATURE_SPECIFICATION: &str = "http://purl.obolibrary.org/obo/OBI_0002138";
const OBI_SCALAR_VALUE_SPECIFICATION: &str = "http://purl.obolibrary.org/obo/OBI_0001931";

/// Returns the built-in quantity shapes.
#[must_use]
pub fn shapes() -> &'static [QuantityShape] {
    SHAPES
}

const CELSIUS: &[Unit] = &[Unit {
    token: "C",
    iri: "http://purl.obolibrary.org/obo/UO_0000027",
    label: "degree Celsius",
}];

const HERTZ: &[Unit] = &[Unit {
    token: "Hz",
    iri: "http://purl.obolibrary.org/obo/UO_0000106",
    label: "hertz",
}];

const DURATION: &[Unit] = &[
    Unit { token: "min", iri: "http://purl.obolibrary.org/obo/UO_0000031", label: "minute" },
    Unit { token: "ms", iri: "http://purl.obolibrary.org/obo/UO_0000028", label: "millisecond" },
];

const VOLT: &[Unit] = &[Unit {
    token: "V",
    iri: "http://purl.obolibrary.org/obo/UO_0000218",
    label: "volt",
}];

const SHAPES: &[QuantityShape] = &[
    QuantityShape {
        name: "temperature",
        class: OBI_TEMPERATURE_SPECIFICATION,
        pattern: r"(?P<value>[+-]?[.\d]+)\s*°\s*(?P<unit>[A-Za-z])",
        units: CELSIUS,
        datatype: NumericDatatype::Decimal,
    },
    QuantityShape {
        name: "frequency",
        class: OBI_SCALAR_VALUE_SPECIFICATION,
        pattern: r"(?P<value>[+-]?[.\d]+)\s*(?P<unit>Hz)",
        units: HERTZ,
        datatype: NumericDatatype::Decimal,
    },
    QuantityShape {
        name: "duration",
        class: OBI_SCALAR_VALUE_SPECIFICATION,
        pattern: r"(?P<value>[+-]?[.\d]+)\s*(?P<unit>min|ms)",
        units: DURATION,
        datatype: NumericDatatype::NonNegativeInteger,
    },
    QuantityShape {
        name: "voltage",
        class: OBI_SCALAR_VALUE_SPECIFICATION,
        pattern: r"(?P<value>[+-]?[.\d]+)\s*(?P<unit>V)",
        units: VOLT,
        datatype: NumericDatatype::NonNegativeInteger,
    },
];
