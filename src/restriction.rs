//! Classification of class expressions into restriction kinds.

use crate::ontology::ClassExpression;

/// Closed set of restriction shapes.
///
/// Anything that is not one of the twenty OWL restriction or range
/// constructors below is [`RestrictionKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RestrictionKind {
    ObjectSomeValuesFrom,
    ObjectAllValuesFrom,
    ObjectMinCardinality,
    ObjectMaxCardinality,
    ObjectExactCardinality,
    ObjectHasValue,
    ObjectOneOf,
    ObjectComplementOf,
    ObjectIntersectionOf,
    ObjectUnionOf,
    DataSomeValuesFrom,
    DataAllValuesFrom,
    DataMinCardinality,
    DataMaxCardinality,
    DataExactCardinality,
    DataHasValue,
    DataOneOf,
    DataComplementOf,
    DataIntersectionOf,
    DataUnionOf,
    Unknown,
}

impl RestrictionKind {
    pub fn is_object(self) -> bool {
        matches!(
            self,
            RestrictionKind::ObjectSomeValuesFrom
                | RestrictionKind::ObjectAllValuesFrom
                | RestrictionKind::ObjectMinCardinality
                | RestrictionKind::ObjectMaxCardinality
                | RestrictionKind::ObjectExactCardinality
                | RestrictionKind::ObjectHasValue
                | RestrictionKind::ObjectOneOf
                | RestrictionKind::ObjectComplementOf
                | RestrictionKind::ObjectIntersectionOf
                | RestrictionKind::ObjectUnionOf
        )
    }

    pub fn is_data(self) -> bool {
        self != RestrictionKind::Unknown && !self.is_object()
    }

    /// Min, max or exact cardinality of either kind.
    pub fn is_cardinality(self) -> bool {
        matches!(
            self,
            RestrictionKind::ObjectMinCardinality
                | RestrictionKind::ObjectMaxCardinality
                | RestrictionKind::ObjectExactCardinality
                | RestrictionKind::DataMinCardinality
                | RestrictionKind::DataMaxCardinality
                | RestrictionKind::DataExactCardinality
        )
    }

    /// Restrictions on a property, as opposed to enumerations and boolean
    /// constructors.
    pub fn is_property_restriction(self) -> bool {
        matches!(
            self,
            RestrictionKind::ObjectSomeValuesFrom
                | RestrictionKind::ObjectAllValuesFrom
                | RestrictionKind::ObjectMinCardinality
                | RestrictionKind::ObjectMaxCardinality
                | RestrictionKind::ObjectExactCardinality
                | RestrictionKind::ObjectHasValue
                | RestrictionKind::DataSomeValuesFrom
                | RestrictionKind::DataAllValuesFrom
                | RestrictionKind::DataMinCardinality
                | RestrictionKind::DataMaxCardinality
                | RestrictionKind::DataExactCardinality
                | RestrictionKind::DataHasValue
        )
    }

    /// Boolean constructors (complement, intersection, union).
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            RestrictionKind::ObjectComplementOf
                | RestrictionKind::ObjectIntersectionOf
                | RestrictionKind::ObjectUnionOf
                | RestrictionKind::DataComplementOf
                | RestrictionKind::DataIntersectionOf
                | RestrictionKind::DataUnionOf
        )
    }
}

/// Classify a class expression.
pub fn classify(expression: &ClassExpression) -> RestrictionKind {
    match expression {
        ClassExpression::ObjectSomeValuesFrom { .. } => RestrictionKind::ObjectSomeValuesFrom,
        ClassExpression::ObjectAllValuesFrom { .. } => RestrictionKind::ObjectAllValuesFrom,
        ClassExpression::ObjectMinCardinality { .. } => RestrictionKind::ObjectMinCardinality,
        ClassExpression::ObjectMaxCardinality { .. } => RestrictionKind::ObjectMaxCardinality,
        ClassExpression::ObjectExactCardinality { .. } => RestrictionKind::ObjectExactCardinality,
        ClassExpression::ObjectHasValue { .. } => RestrictionKind::ObjectHasValue,
        ClassExpression::ObjectOneOf { .. } => RestrictionKind::ObjectOneOf,
        ClassExpression::ObjectComplementOf { .. } => RestrictionKind::ObjectComplementOf,
        ClassExpression::ObjectIntersectionOf { .. } => RestrictionKind::ObjectIntersectionOf,
        ClassExpression::ObjectUnionOf { .. } => RestrictionKind::ObjectUnionOf,
        ClassExpression::DataSomeValuesFrom { .. } => RestrictionKind::DataSomeValuesFrom,
        ClassExpression::DataAllValuesFrom { .. } => RestrictionKind::DataAllValuesFrom,
        ClassExpression::DataMinCardinality { .. } => RestrictionKind::DataMinCardinality,
        ClassExpression::DataMaxCardinality { .. } => RestrictionKind::DataMaxCardinality,
        ClassExpression::DataExactCardinality { .. } => RestrictionKind::DataExactCardinality,
        ClassExpression::DataHasValue { .. } => RestrictionKind::DataHasValue,
        ClassExpression::DataOneOf { .. } => RestrictionKind::DataOneOf,
        ClassExpression::DataComplementOf { .. } => RestrictionKind::DataComplementOf,
        ClassExpression::DataIntersectionOf { .. } => RestrictionKind::DataIntersectionOf,
        ClassExpression::DataUnionOf { .. } => RestrictionKind::DataUnionOf,
        ClassExpression::Class { .. }
        | ClassExpression::Datatype { .. }
        | ClassExpression::ObjectHasSelf { .. } => RestrictionKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn class() -> Box<ClassExpression> {
        Box::new(ClassExpression::class("urn:ex:C"))
    }

    fn datatype() -> Box<ClassExpression> {
        Box::new(ClassExpression::datatype(
            "http://www.w3.org/2001/XMLSchema#string",
        ))
    }

    fn p() -> String {
        "urn:ex:p".to_string()
    }

    #[test]
    fn classifies_all_known_shapes() {
        let cases = vec![
            (
                ClassExpression::ObjectSomeValuesFrom {
                    property: p(),
                    filler: class(),
                },
                RestrictionKind::ObjectSomeValuesFrom,
            ),
            (
                ClassExpression::ObjectAllValuesFrom {
                    property: p(),
                    filler: class(),
                },
                RestrictionKind::ObjectAllValuesFrom,
            ),
            (
                ClassExpression::ObjectMinCardinality {
                    property: p(),
                    cardinality: 1,
                    filler: None,
                },
                RestrictionKind::ObjectMinCardinality,
            ),
            (
                ClassExpression::ObjectMaxCardinality {
                    property: p(),
                    cardinality: 2,
                    filler: Some(class()),
                },
                RestrictionKind::ObjectMaxCardinality,
            ),
            (
                ClassExpression::ObjectExactCardinality {
                    property: p(),
                    cardinality: 1,
                    filler: None,
                },
                RestrictionKind::ObjectExactCardinality,
            ),
            (
                ClassExpression::ObjectHasValue {
                    property: p(),
                    value: "urn:ex:alice".into(),
                },
                RestrictionKind::ObjectHasValue,
            ),
            (
                ClassExpression::ObjectOneOf {
                    individuals: vec!["urn:ex:a".into()],
                },
                RestrictionKind::ObjectOneOf,
            ),
            (
                ClassExpression::ObjectComplementOf { operand: class() },
                RestrictionKind::ObjectComplementOf,
            ),
            (
                ClassExpression::ObjectIntersectionOf {
                    operands: vec![*class()],
                },
                RestrictionKind::ObjectIntersectionOf,
            ),
            (
                ClassExpression::ObjectUnionOf {
                    operands: vec![*class()],
                },
                RestrictionKind::ObjectUnionOf,
            ),
            (
                ClassExpression::DataSomeValuesFrom {
                    property: p(),
                    filler: datatype(),
                },
                RestrictionKind::DataSomeValuesFrom,
            ),
            (
                ClassExpression::DataAllValuesFrom {
                    property: p(),
                    filler: datatype(),
                },
                RestrictionKind::DataAllValuesFrom,
            ),
            (
                ClassExpression::DataMinCardinality {
                    property: p(),
                    cardinality: 0,
                    filler: None,
                },
                RestrictionKind::DataMinCardinality,
            ),
            (
                ClassExpression::DataMaxCardinality {
                    property: p(),
                    cardinality: 1,
                    filler: Some(datatype()),
                },
                RestrictionKind::DataMaxCardinality,
            ),
            (
                ClassExpression::DataExactCardinality {
                    property: p(),
                    cardinality: 1,
                    filler: None,
                },
                RestrictionKind::DataExactCardinality,
            ),
            (
                ClassExpression::DataHasValue {
                    property: p(),
                    value: json!("fixed"),
                },
                RestrictionKind::DataHasValue,
            ),
            (
                ClassExpression::DataOneOf {
                    values: vec![json!("a"), json!("b")],
                },
                RestrictionKind::DataOneOf,
            ),
            (
                ClassExpression::DataComplementOf {
                    operand: datatype(),
                },
                RestrictionKind::DataComplementOf,
            ),
            (
                ClassExpression::DataIntersectionOf {
                    operands: vec![*datatype()],
                },
                RestrictionKind::DataIntersectionOf,
            ),
            (
                ClassExpression::DataUnionOf {
                    operands: vec![*datatype()],
                },
                RestrictionKind::DataUnionOf,
            ),
        ];

        assert_eq!(cases.len(), 20);
        for (expression, expected) in cases {
            assert_eq!(classify(&expression), expected, "{:?}", expression);
            assert_ne!(expected, RestrictionKind::Unknown);
        }
    }

    #[test]
    fn unrecognized_shapes_are_unknown() {
        assert_eq!(classify(&class()), RestrictionKind::Unknown);
        assert_eq!(classify(&datatype()), RestrictionKind::Unknown);
        assert_eq!(
            classify(&ClassExpression::ObjectHasSelf { property: p() }),
            RestrictionKind::Unknown
        );
    }

    #[test]
    fn kind_predicates() {
        assert!(RestrictionKind::ObjectUnionOf.is_object());
        assert!(RestrictionKind::DataUnionOf.is_data());
        assert!(!RestrictionKind::Unknown.is_data());
        assert!(!RestrictionKind::Unknown.is_object());
        assert!(RestrictionKind::DataExactCardinality.is_cardinality());
        assert!(!RestrictionKind::DataOneOf.is_property_restriction());
        assert!(RestrictionKind::ObjectHasValue.is_property_restriction());
        assert!(RestrictionKind::ObjectComplementOf.is_boolean());
    }
}
