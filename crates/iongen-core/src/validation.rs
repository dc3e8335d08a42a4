use crate::constraints::{Constraint, ValidValues};
use crate::schema::TypeDefinition;
use crate::value::{Element, Value, values_match};

/// One failed constraint check.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
}

impl Violation {
    fn new(constraint: &str, message: impl Into<String>) -> Self {
        Self {
            constraint: constraint.to_string(),
            message: message.into(),
        }
    }
}

/// Check an element against a schema type independently of the generator.
/// Returns every violated constraint; an empty result means conformance.
pub fn validate(element: &Element, definition: &TypeDefinition) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(expected) = definition.type_tag {
        let actual = element.ion_type();
        if actual != expected {
            violations.push(Violation::new(
                "type",
                format!("expected {expected}, found {actual}"),
            ));
        }
    }

    for constraint in definition.constraints.iter() {
        match constraint {
            Constraint::ValidValues(ValidValues::Set(allowed)) => {
                if !allowed.iter().any(|value| values_match(element, value)) {
                    violations.push(Violation::new("valid_values", "value not in declared set"));
                }
            }
            Constraint::ValidValues(ValidValues::Range(range)) => match element.as_f64() {
                Some(value) if range.contains(value) => {}
                Some(value) => violations.push(Violation::new(
                    "valid_values",
                    format!("{value} outside declared range"),
                )),
                None => violations.push(Violation::new(
                    "valid_values",
                    "range applies to ordered scalar values only",
                )),
            },
            Constraint::ContainerLength(range) => match container_length(element) {
                Some(length) if range.contains(length) => {}
                Some(length) => violations.push(Violation::new(
                    "container_length",
                    format!("container has {length} members"),
                )),
                None => violations.push(Violation::new(
                    "container_length",
                    "value is not a container",
                )),
            },
            Constraint::CodepointLength(range) => match element.as_text() {
                Some(text) if range.contains(text.chars().count() as u64) => {}
                Some(text) => violations.push(Violation::new(
                    "codepoint_length",
                    format!("text has {} code points", text.chars().count()),
                )),
                None => violations.push(Violation::new(
                    "codepoint_length",
                    "value is not text",
                )),
            },
            Constraint::ByteLength(range) => match byte_length(element) {
                Some(length) if range.contains(length) => {}
                Some(length) => violations.push(Violation::new(
                    "byte_length",
                    format!("value occupies {length} bytes"),
                )),
                None => violations.push(Violation::new(
                    "byte_length",
                    "value has no byte length",
                )),
            },
            Constraint::Precision(range) => match &element.value {
                Value::Decimal(decimal) if range.contains(decimal.precision()) => {}
                Value::Decimal(decimal) => violations.push(Violation::new(
                    "precision",
                    format!("coefficient has {} digits", decimal.precision()),
                )),
                _ => violations.push(Violation::new("precision", "value is not a decimal")),
            },
            Constraint::Contains(members) => {
                let children = element.children();
                for member in members {
                    if !children.iter().any(|child| values_match(child, member)) {
                        violations
                            .push(Violation::new("contains", "required member is missing"));
                    }
                }
            }
            Constraint::Element(child_def) => {
                let children: Vec<&Element> = match &element.value {
                    Value::List(items) | Value::Sexp(items) => items.iter().collect(),
                    Value::Struct(fields) => fields.iter().map(|(_, value)| value).collect(),
                    _ => {
                        violations
                            .push(Violation::new("element", "value is not a container"));
                        continue;
                    }
                };
                for child in children {
                    if !validate(child, child_def).is_empty() {
                        violations.push(Violation::new(
                            "element",
                            "container member violates element type",
                        ));
                    }
                }
            }
            Constraint::Fields(fields) => {
                let Value::Struct(actual) = &element.value else {
                    violations.push(Violation::new("fields", "value is not a struct"));
                    continue;
                };
                for (name, field_def) in fields {
                    match actual.iter().find(|(field, _)| field == name) {
                        Some((_, value)) => {
                            if !validate(value, field_def).is_empty() {
                                violations.push(Violation::new(
                                    "fields",
                                    format!("field '{name}' violates its type"),
                                ));
                            }
                        }
                        None => violations.push(Violation::new(
                            "fields",
                            format!("field '{name}' is missing"),
                        )),
                    }
                }
            }
            Constraint::Annotations(required) => {
                for annotation in required {
                    if !element.annotations.contains(annotation) {
                        violations.push(Violation::new(
                            "annotations",
                            format!("annotation '{annotation}' is missing"),
                        ));
                    }
                }
            }
            Constraint::AnyOf(branches) => {
                if matching_branches(element, branches) == 0 {
                    violations.push(Violation::new(
                        "any_of",
                        "value satisfies no alternative",
                    ));
                }
            }
            Constraint::OneOf(branches) => {
                let matches = matching_branches(element, branches);
                if matches != 1 {
                    violations.push(Violation::new(
                        "one_of",
                        format!("value satisfies {matches} alternatives, expected exactly one"),
                    ));
                }
            }
            Constraint::Not(inner) => {
                if validate(element, inner).is_empty() {
                    violations.push(Violation::new(
                        "not",
                        "value satisfies the excluded type",
                    ));
                }
            }
        }
    }

    violations
}

/// Number of branches of a combinator the element satisfies.
pub fn matching_branches(element: &Element, branches: &[TypeDefinition]) -> usize {
    branches
        .iter()
        .filter(|branch| validate(element, branch).is_empty())
        .count()
}

fn container_length(element: &Element) -> Option<u64> {
    match &element.value {
        Value::List(items) | Value::Sexp(items) => Some(items.len() as u64),
        Value::Struct(fields) => Some(fields.len() as u64),
        _ => None,
    }
}

fn byte_length(element: &Element) -> Option<u64> {
    match &element.value {
        Value::String(text) | Value::Symbol(text) => Some(text.len() as u64),
        Value::Blob(bytes) | Value::Clob(bytes) => Some(bytes.len() as u64),
        _ => None,
    }
}
