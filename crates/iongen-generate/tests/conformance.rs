use serde_json::json;

use iongen_core::{IonType, TypeDefinition, Value, validate};
use iongen_generate::{GenContext, GenerationError, generate};

const SEEDS: u64 = 32;

fn definition(document: serde_json::Value) -> TypeDefinition {
    TypeDefinition::from_json(&document).expect("definition parses")
}

/// Generate one value per seed and assert that every one of them passes
/// the validator for its own definition.
fn assert_conforms(def: &TypeDefinition) {
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(def, &mut ctx).expect("generation succeeds");
        let violations = validate(&element, def);
        assert!(
            violations.is_empty(),
            "seed {seed} produced {element:?} with violations {violations:?}"
        );
    }
}

#[test]
fn unconstrained_scalars_conform() {
    for tag in ["null", "bool", "int", "float", "decimal", "timestamp", "string", "symbol"] {
        assert_conforms(&definition(json!({"type": tag})));
    }
}

#[test]
fn int_respects_a_closed_range() {
    let def = definition(json!({
        "type": "int",
        "constraints": {"valid_values": {"min": -5, "max": 5}}
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let Value::Int(value) = element.value else {
            panic!("expected an int, got {element:?}");
        };
        assert!((-5..=5).contains(&value));
    }
}

#[test]
fn int_respects_exclusive_bounds() {
    let def = definition(json!({
        "type": "int",
        "constraints": {
            "valid_values": {"min": 0, "max": 3, "min_exclusive": true, "max_exclusive": true}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let Value::Int(value) = element.value else {
            panic!("expected an int");
        };
        assert!((1..=2).contains(&value));
    }
}

#[test]
fn float_set_is_drawn_verbatim() {
    let def = definition(json!({
        "type": "float",
        "constraints": {"valid_values": [1.5, 2.5, 4.0]}
    }));
    assert_conforms(&def);
}

#[test]
fn decimal_respects_range_and_precision() {
    let def = definition(json!({
        "type": "decimal",
        "constraints": {
            "valid_values": {"min": 1, "max": 100},
            "precision": {"min": 1, "max": 7}
        }
    }));
    assert_conforms(&def);
}

#[test]
fn timestamp_respects_rfc3339_bounds() {
    let def = definition(json!({
        "type": "timestamp",
        "constraints": {
            "valid_values": {"min": "2020-01-01T00:00:00Z", "max": "2021-01-01T00:00:00Z"}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        assert_eq!(element.ion_type(), IonType::Timestamp);
        let seconds = element.as_f64().expect("timestamps are numeric");
        assert!((1_577_836_800.0..=1_609_459_200.0).contains(&seconds));
        assert!(validate(&element, &def).is_empty());
    }
}

#[test]
fn timestamp_set_members_conform() {
    let def = definition(json!({
        "type": "timestamp",
        "constraints": {"valid_values": ["2021-06-01T00:00:00Z", "2022-06-01T00:00:00Z"]}
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        assert!(matches!(element.value, Value::Timestamp(_)));
        let violations = validate(&element, &def);
        assert!(
            violations.is_empty(),
            "seed {seed} produced {element:?} with violations {violations:?}"
        );
    }
}

#[test]
fn lob_set_members_conform() {
    let def = definition(json!({
        "type": "blob",
        "constraints": {"valid_values": ["hi", "there"]}
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        assert!(matches!(element.value, Value::Blob(_)));
        assert!(validate(&element, &def).is_empty());
    }
}

#[test]
fn string_respects_codepoint_length() {
    let def = definition(json!({
        "type": "string",
        "constraints": {"codepoint_length": {"min": 4, "max": 9}}
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let length = element.as_text().expect("strings have text").chars().count();
        assert!((4..=9).contains(&length));
    }
}

#[test]
fn string_respects_codepoint_and_byte_length_together() {
    let def = definition(json!({
        "type": "string",
        "constraints": {
            "codepoint_length": {"min": 2, "max": 12},
            "byte_length": {"min": 6, "max": 8}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let text = element.as_text().expect("strings have text");
        assert!((6..=8).contains(&text.len()));
        assert!(validate(&element, &def).is_empty());
    }
}

#[test]
fn byte_length_alone_bounds_a_string() {
    let def = definition(json!({
        "type": "string",
        "constraints": {"byte_length": {"min": 20, "max": 30}}
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let text = element.as_text().expect("strings have text");
        assert!((20..=30).contains(&text.len()), "seed {seed} produced {} bytes", text.len());
        assert!(validate(&element, &def).is_empty());
    }
}

#[test]
fn symbol_set_is_coerced_to_symbols() {
    let def = definition(json!({
        "type": "symbol",
        "constraints": {"valid_values": ["red", "green", "blue"]}
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let Value::Symbol(text) = &element.value else {
            panic!("expected a symbol, got {element:?}");
        };
        assert!(["red", "green", "blue"].contains(&text.as_str()));
    }
}

#[test]
fn lobs_respect_byte_length() {
    for tag in ["blob", "clob"] {
        let def = definition(json!({
            "type": tag,
            "constraints": {"byte_length": {"min": 3, "max": 10}}
        }));
        assert_conforms(&def);
    }
}

#[test]
fn list_respects_container_length_and_element() {
    let def = definition(json!({
        "type": "list",
        "constraints": {
            "container_length": {"min": 2, "max": 5},
            "element": {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 9}}}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        assert!((2..=5).contains(&element.children().len()));
        for child in element.children() {
            let Value::Int(value) = child.value else {
                panic!("expected int members");
            };
            assert!((0..=9).contains(&value));
        }
    }
}

#[test]
fn sexp_conforms_like_a_list() {
    let def = definition(json!({
        "type": "sexp",
        "constraints": {
            "container_length": 3,
            "element": {"type": "bool"}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        assert_eq!(element.ion_type(), IonType::Sexp);
        assert_eq!(element.children().len(), 3);
    }
}

#[test]
fn contains_members_always_appear() {
    let def = definition(json!({
        "type": "list",
        "constraints": {
            "container_length": {"min": 3, "max": 6},
            "contains": [1, 2, 3],
            "element": {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 100}}}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        for required in [1_i64, 2, 3] {
            assert!(
                element
                    .children()
                    .iter()
                    .any(|child| child.value == Value::Int(required)),
                "seed {seed} lost required member {required} in {element:?}"
            );
        }
        assert!(validate(&element, &def).is_empty());
    }
}

#[test]
fn struct_generates_every_declared_field() {
    let def = definition(json!({
        "type": "struct",
        "constraints": {
            "fields": {
                "id": {"type": "int", "constraints": {"valid_values": {"min": 1, "max": 1000}}},
                "name": {"type": "string", "constraints": {"codepoint_length": {"min": 1, "max": 8}}},
                "active": {"type": "bool"}
            }
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let Value::Struct(fields) = &element.value else {
            panic!("expected a struct");
        };
        assert_eq!(fields.len(), 3);
        assert!(validate(&element, &def).is_empty());
    }
}

#[test]
fn nested_containers_conform() {
    let def = definition(json!({
        "type": "struct",
        "constraints": {
            "fields": {
                "tags": {
                    "type": "list",
                    "constraints": {
                        "container_length": {"min": 1, "max": 3},
                        "element": {"type": "symbol"}
                    }
                },
                "owner": {
                    "type": "struct",
                    "constraints": {
                        "fields": {"id": {"type": "int"}}
                    }
                }
            }
        }
    }));
    assert_conforms(&def);
}

#[test]
fn annotations_are_appended() {
    let def = definition(json!({
        "type": "int",
        "constraints": {"annotations": ["audited", "internal"]}
    }));
    let mut ctx = GenContext::new(Some(5));
    let element = generate(&def, &mut ctx).expect("generation succeeds");
    assert_eq!(element.annotations, vec!["audited", "internal"]);
}

#[test]
fn any_of_matches_at_least_one_branch() {
    let def = definition(json!({
        "constraints": {
            "any_of": [
                {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 10}}},
                {"type": "string", "constraints": {"codepoint_length": {"min": 1, "max": 4}}}
            ]
        }
    }));
    assert_conforms(&def);
}

#[test]
fn one_of_with_disjoint_branches_conforms() {
    let def = definition(json!({
        "constraints": {
            "one_of": [
                {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 10}}},
                {"type": "int", "constraints": {"valid_values": {"min": 100, "max": 110}}}
            ]
        }
    }));
    assert_conforms(&def);
}

#[test]
fn one_of_with_identical_branches_is_ambiguous() {
    let def = definition(json!({
        "constraints": {
            "one_of": [
                {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 10}}},
                {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 10}}}
            ]
        }
    }));
    let mut ctx = GenContext::new(Some(1));
    let err = generate(&def, &mut ctx).unwrap_err();
    assert!(matches!(err, GenerationError::AmbiguousOneOf(_)), "got {err:?}");
}

#[test]
fn not_excludes_a_subrange() {
    let def = definition(json!({
        "type": "int",
        "constraints": {
            "valid_values": {"min": 0, "max": 1000},
            "not": {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 50}}}
        }
    }));
    for seed in 0..SEEDS {
        let mut ctx = GenContext::new(Some(seed));
        let element = generate(&def, &mut ctx).expect("generation succeeds");
        let Value::Int(value) = element.value else {
            panic!("expected an int");
        };
        assert!((51..=1000).contains(&value), "seed {seed} produced {value}");
    }
}

#[test]
fn not_covering_the_whole_range_is_unsatisfiable() {
    let def = definition(json!({
        "type": "int",
        "constraints": {
            "valid_values": {"min": 0, "max": 10},
            "not": {"type": "int", "constraints": {"valid_values": {"min": 0, "max": 10}}}
        }
    }));
    let mut ctx = GenContext::new(Some(1));
    let err = generate(&def, &mut ctx).unwrap_err();
    assert!(matches!(err, GenerationError::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn inverted_length_bounds_are_unsatisfiable() {
    let def = definition(json!({
        "type": "string",
        "constraints": {"codepoint_length": {"min": 10, "max": 5}}
    }));
    let mut ctx = GenContext::new(Some(1));
    let err = generate(&def, &mut ctx).unwrap_err();
    assert!(matches!(err, GenerationError::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn contains_beyond_the_maximum_length_is_unsatisfiable() {
    let def = definition(json!({
        "type": "list",
        "constraints": {
            "container_length": {"max": 2},
            "contains": [1, 2, 3]
        }
    }));
    let mut ctx = GenContext::new(Some(1));
    let err = generate(&def, &mut ctx).unwrap_err();
    assert!(matches!(err, GenerationError::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn empty_int_range_is_unsatisfiable() {
    let def = definition(json!({
        "type": "int",
        "constraints": {"valid_values": {"min": 7, "max": 3}}
    }));
    let mut ctx = GenContext::new(Some(1));
    let err = generate(&def, &mut ctx).unwrap_err();
    assert!(matches!(err, GenerationError::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn nesting_beyond_the_depth_bound_fails() {
    let mut document = json!({"type": "int"});
    for _ in 0..40 {
        document = json!({
            "type": "list",
            "constraints": {"container_length": 1, "element": document}
        });
    }
    let def = definition(document);
    let mut ctx = GenContext::new(Some(1));
    let err = generate(&def, &mut ctx).unwrap_err();
    assert!(matches!(err, GenerationError::Unsatisfiable(_)), "got {err:?}");
}

#[test]
fn equal_seeds_produce_equal_values() {
    let def = definition(json!({
        "type": "struct",
        "constraints": {
            "fields": {
                "id": {"type": "int"},
                "label": {"type": "string", "constraints": {"codepoint_length": {"min": 1, "max": 12}}}
            }
        }
    }));
    let mut first = GenContext::new(Some(11));
    let mut second = GenContext::new(Some(11));
    for _ in 0..8 {
        let a = generate(&def, &mut first).expect("generation succeeds");
        let b = generate(&def, &mut second).expect("generation succeeds");
        assert_eq!(a, b);
    }
}
