//! Physical-quantity extraction.
//!
//! Each quantity shape is scanned independently over a step's link-free
//! description. Every mention becomes its own unnamed value specification;
//! mentions are never merged, even when the text repeats a value.

use eln_vocab::{iris, NumericDatatype, QuantityShape, Unit};
use regex::Regex;

use crate::context::ModelContext;
use crate::diagnostics::DiagnosticKind;
use crate::error::{ConvertError, Result};
use crate::graph::{Iri, Literal, Node};

/// One extracted quantity mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpecification {
    /// Quantity shape name.
    pub quantity: &'static str,
    /// Value-specification class IRI.
    pub class: &'static str,
    /// Matched text, verbatim.
    pub label: String,
    /// Leading signed-decimal token.
    pub value: String,
    /// Datatype of the value literal.
    pub datatype: NumericDatatype,
    /// Resolved unit.
    pub unit: &'static Unit,
}

impl ValueSpecification {
    /// Returns true if `value` is a lexically valid instance of its datatype.
    #[must_use]
    pub fn conforms(&self) -> bool {
        match self.datatype {
            NumericDatatype::Decimal => true,
            NumericDatatype::NonNegativeInteger => {
                let digits = self.value.strip_prefix('+').unwrap_or(&self.value);
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            }
        }
    }
}

/// Compiled quantity patterns.
#[derive(Debug, Clone)]
pub struct ParameterExtractor {
    shapes: Vec<(&'static QuantityShape, Regex)>,
}

impl ParameterExtractor {
    /// Compiles the patterns of `shapes`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Pattern`] if a pattern does not compile.
    pub fn new(shapes: &'static [QuantityShape]) -> Result<Self> {
        let shapes = shapes
            .iter()
            .map(|shape| -> Result<_> { Ok((shape, Regex::new(shape.pattern)?)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { shapes })
    }

    /// Extracts every quantity mention of `text`, shape by shape.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownUnit`] if a mention's unit token is not
    /// one of its shape's recognized units.
    pub fn extract(&self, text: &str) -> Result<Vec<ValueSpecification>> {
        let mut out = Vec::new();
        for (shape, pattern) in &self.shapes {
            for caps in pattern.captures_iter(text) {
                let label = caps.get(0).map_or("", |m| m.as_str());
                let value = caps.name("value").map_or("", |m| m.as_str());
                let token = caps.name("unit").map_or("", |m| m.as_str());
                let unit = shape.unit(token).ok_or_else(|| ConvertError::UnknownUnit {
                    quantity: shape.name,
                    unit: token.to_owned(),
                    text: label.to_owned(),
                })?;
                out.push(ValueSpecification {
                    quantity: shape.name,
                    class: shape.class,
                    label: label.to_owned(),
                    value: value.to_owned(),
                    datatype: shape.datatype,
                    unit,
                });
            }
        }
        Ok(out)
    }

    /// Extracts quantities from `text` and attaches them to `step`.
    ///
    /// Blank-node labels derive from `hint`, the step's local key. Returns the
    /// number of value specifications attached.
    ///
    /// # Errors
    ///
    /// See [`ParameterExtractor::extract`].
    pub fn attach(
        &self,
        ctx: &mut ModelContext<'_>,
        step: &Iri,
        hint: &str,
        text: &str,
    ) -> Result<usize> {
        let specs = self.extract(text)?;
        for spec in &specs {
            if !spec.conforms() {
                ctx.diagnostics.report(
                    DiagnosticKind::NonIntegerQuantity,
                    step.as_str(),
                    format!(
                        "{} value \"{}\" is not a non-negative integer",
                        spec.quantity, spec.value
                    ),
                );
            }
            let node: Node = ctx.graph.fresh_blank(hint);
            ctx.graph.insert(&node, iris::RDF_TYPE, Iri::new(spec.class));
            ctx.graph.insert(&node, iris::RDFS_LABEL, Literal::plain(spec.label.as_str()));
            ctx.graph.insert(
                &node,
                iris::PROV_VALUE,
                Literal::typed(spec.value.as_str(), spec.datatype.iri()),
            );
            ctx.graph.insert(
                &node,
                iris::IAO_HAS_MEASUREMENT_UNIT_LABEL,
                Iri::new(spec.unit.iri),
            );
            ctx.graph.insert(step, iris::OBI_HAS_VALUE_SPECIFICATION, &node);
        }
        Ok(specs.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::fixtures;
    use crate::input::Catalog;
    use eln_vocab::Vocabulary;

    fn extractor() -> ParameterExtractor {
        ParameterExtractor::new(Vocabulary::builtin().quantities).unwrap()
    }

    #[test]
    fn temperature_and_duration() {
        let specs = extractor().extract("incubate at 37°C for 5 min").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].quantity, "temperature");
        assert_eq!(specs[0].value, "37");
        assert_eq!(specs[0].label, "37°C");
        assert_eq!(specs[0].unit.label, "degree Celsius");
        assert_eq!(specs[1].quantity, "duration");
        assert_eq!(specs[1].value, "5");
        assert_eq!(specs[1].unit.label, "minute");
    }

    #[test]
    fn unknown_temperature_unit_is_fatal() {
        let err = extractor().extract("heat to 37°Z").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownUnit { quantity: "temperature", .. }));
    }

    #[test]
    fn frequency_voltage_and_milliseconds() {
        let specs = extractor().extract("stimulate with 0.5 Hz, 40 V pulses of 10 ms").unwrap();
        let names: Vec<_> = specs.iter().map(|s| (s.quantity, s.value.as_str())).collect();
        assert_eq!(
            names,
            [("frequency", "0.5"), ("duration", "10"), ("voltage", "40")]
        );
    }

    #[test]
    fn every_mention_is_a_fresh_node() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let step = ctx.ids.step("preparation", 1);
        let n = extractor()
            .attach(&mut ctx, &step, "preparation/1", "5 min, then again 5 min")
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            ctx.graph
                .objects(&Node::from(&step), iris::OBI_HAS_VALUE_SPECIFICATION)
                .count(),
            2
        );
    }

    #[test]
    fn fractional_duration_keeps_datatype_and_warns() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let step = ctx.ids.step("preparation", 1);
        extractor().attach(&mut ctx, &step, "preparation/1", "wait 2.5 min").unwrap();
        let literal = Literal::typed("2.5", iris::XSD_NON_NEGATIVE_INTEGER);
        assert_eq!(ctx.graph.triples(None, Some(iris::PROV_VALUE), Some(&literal.into())).count(), 1);
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::NonIntegerQuantity), 1);
    }
}
