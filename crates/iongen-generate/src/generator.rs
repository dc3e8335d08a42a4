use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use iongen_core::{
    Decimal, Element, Error, IonType, NumericRange, TypeDefinition, ValidValues, Value,
    matching_branches, validate,
};

use crate::context::GenContext;
use crate::errors::GenerationError;

const MAX_ONE_OF_ATTEMPTS: u32 = 16;
const MAX_NOT_ATTEMPTS: u32 = 16;
const MAX_PRECISION_ATTEMPTS: u32 = 16;

const DEFAULT_TEXT_MAX: u64 = 16;
const DEFAULT_LOB_MAX: u64 = 32;
const DEFAULT_SEQUENCE_MAX: u64 = 8;
const DEFAULT_STRUCT_MAX: u64 = 4;
const DEFAULT_FLOAT_BOUND: f64 = 1.0e9;
const DEFAULT_DECIMAL_BOUND: f64 = 1.0e6;

// 2000-01-01T00:00:00Z .. 2035-01-01T00:00:00Z
const DEFAULT_TIMESTAMP_MIN: i64 = 946_684_800;
const DEFAULT_TIMESTAMP_MAX: i64 = 2_051_222_400;

const TEXT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SYMBOL_HEAD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Produce one value conforming to every constraint of `definition`.
/// Randomness and the recursion bound come from the context; nothing else
/// is consumed.
pub fn generate(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    ctx.enter()?;
    let result = generate_inner(definition, ctx);
    ctx.leave();
    result
}

fn generate_inner(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    let excluded = definition.constraints.not();
    let attempts = if excluded.is_some() {
        MAX_NOT_ATTEMPTS
    } else {
        1
    };

    let mut produced = None;
    for _ in 0..attempts {
        let candidate = produce(definition, ctx)?;
        if let Some(excluded) = excluded
            && validate(&candidate, excluded).is_empty()
        {
            continue;
        }
        produced = Some(candidate);
        break;
    }
    let mut element = produced.ok_or_else(|| {
        GenerationError::Unsatisfiable(
            "no value outside the excluded type within the retry budget".to_string(),
        )
    })?;

    if let Some(required) = definition.constraints.annotations() {
        for annotation in required {
            if !element.annotations.contains(annotation) {
                element.annotations.push(annotation.clone());
            }
        }
    }
    Ok(element)
}

fn produce(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    if let Some(branches) = definition.constraints.one_of() {
        return generate_one_of(branches, ctx);
    }
    if let Some(branches) = definition.constraints.any_of() {
        let branch = pick_branch(branches, ctx);
        return generate(branch, ctx);
    }
    generate_typed(definition, ctx)
}

/// Branches may overlap in acceptable value space, so the candidate is
/// cross-validated against every alternative and regenerated while more
/// than one matches.
fn generate_one_of(
    branches: &[TypeDefinition],
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    for _ in 0..MAX_ONE_OF_ATTEMPTS {
        let branch = pick_branch(branches, ctx);
        let candidate = generate(branch, ctx)?;
        if matching_branches(&candidate, branches) == 1 {
            return Ok(candidate);
        }
    }
    Err(GenerationError::AmbiguousOneOf(format!(
        "no candidate matched exactly one of {} alternatives within {} attempts",
        branches.len(),
        MAX_ONE_OF_ATTEMPTS
    )))
}

fn pick_branch<'a>(branches: &'a [TypeDefinition], ctx: &mut GenContext) -> &'a TypeDefinition {
    let index = ctx.rng.random_range(0..branches.len());
    &branches[index]
}

fn generate_typed(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    let tag = definition.type_tag.ok_or_else(|| {
        Error::InvalidSchema("type definition has no type tag".to_string())
    })?;

    // Set members were already aligned with the type tag during
    // normalization; any member is a conforming value as declared.
    if let Some(ValidValues::Set(values)) = definition.constraints.valid_values() {
        return values
            .choose(&mut ctx.rng)
            .cloned()
            .ok_or_else(|| GenerationError::Unsatisfiable("empty value set".to_string()));
    }

    match tag {
        IonType::Null => Ok(Element::new(Value::Null)),
        IonType::Bool => Ok(Element::new(Value::Bool(ctx.rng.random_bool(0.5)))),
        IonType::Int => sample_int(definition, ctx),
        IonType::Float => sample_float(definition, ctx),
        IonType::Decimal => sample_decimal(definition, ctx),
        IonType::Timestamp => sample_timestamp(definition, ctx),
        IonType::String => sample_text(definition, ctx, IonType::String),
        IonType::Symbol => sample_text(definition, ctx, IonType::Symbol),
        IonType::Blob => sample_lob(definition, ctx, IonType::Blob),
        IonType::Clob => sample_lob(definition, ctx, IonType::Clob),
        IonType::List => sample_sequence(definition, ctx, IonType::List),
        IonType::Sexp => sample_sequence(definition, ctx, IonType::Sexp),
        IonType::Struct => sample_struct(definition, ctx),
    }
}

fn declared_range(definition: &TypeDefinition) -> NumericRange {
    match definition.constraints.valid_values() {
        Some(ValidValues::Range(range)) => *range,
        _ => NumericRange::default(),
    }
}

fn sample_int(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    let range = declared_range(definition);
    let lo = match range.min {
        Some(min) => int_lower_bound(min, range.min_exclusive),
        None => i64::MIN,
    };
    let hi = match range.max {
        Some(max) => int_upper_bound(max, range.max_exclusive),
        None => i64::MAX,
    };
    if lo > hi {
        return Err(GenerationError::Unsatisfiable(format!(
            "empty int range [{lo}, {hi}]"
        )));
    }
    Ok(Element::new(Value::Int(ctx.rng.random_range(lo..=hi))))
}

fn int_lower_bound(min: f64, exclusive: bool) -> i64 {
    let mut bound = min.ceil() as i64;
    if exclusive && min.fract() == 0.0 {
        bound = bound.saturating_add(1);
    }
    bound
}

fn int_upper_bound(max: f64, exclusive: bool) -> i64 {
    let mut bound = max.floor() as i64;
    if exclusive && max.fract() == 0.0 {
        bound = bound.saturating_sub(1);
    }
    bound
}

fn sample_float(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    let range = declared_range(definition);
    let mut lo = range.min.unwrap_or(-DEFAULT_FLOAT_BOUND);
    let mut hi = range.max.unwrap_or(DEFAULT_FLOAT_BOUND);
    let nudge = (hi - lo).abs().max(1.0) * f64::EPSILON * 4.0;
    if range.min_exclusive {
        lo += nudge;
    }
    if range.max_exclusive {
        hi -= nudge;
    }
    if lo > hi {
        return Err(GenerationError::Unsatisfiable(format!(
            "empty float range [{lo}, {hi}]"
        )));
    }
    Ok(Element::new(Value::Float(ctx.rng.random_range(lo..=hi))))
}

fn sample_decimal(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    let range = declared_range(definition);
    let min = range.min.unwrap_or(-DEFAULT_DECIMAL_BOUND);
    let max = range.max.unwrap_or(DEFAULT_DECIMAL_BOUND);
    let precision = definition.constraints.precision();

    // Sample an integer coefficient inside the scaled bounds so the exact
    // decimal value is range-contained without rounding drift.
    let mut feasible = Vec::new();
    for scale in 0..=4_i32 {
        let factor = 10_f64.powi(scale);
        let lo = int_lower_bound(min * factor, range.min_exclusive);
        let hi = int_upper_bound(max * factor, range.max_exclusive);
        if lo <= hi {
            feasible.push((scale, lo, hi));
        }
    }
    let (scale, lo, hi) = *feasible
        .choose(&mut ctx.rng)
        .ok_or_else(|| GenerationError::Unsatisfiable("empty decimal range".to_string()))?;

    for _ in 0..MAX_PRECISION_ATTEMPTS {
        let coefficient = ctx.rng.random_range(lo..=hi);
        let decimal = Decimal::new(coefficient, -scale);
        if precision.is_none_or(|range| range.contains(decimal.precision())) {
            return Ok(Element::new(Value::Decimal(decimal)));
        }
    }
    Err(GenerationError::Unsatisfiable(
        "no decimal satisfies both range and precision".to_string(),
    ))
}

fn sample_timestamp(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    let range = declared_range(definition);
    let lo = match range.min {
        Some(min) => int_lower_bound(min, range.min_exclusive),
        None => DEFAULT_TIMESTAMP_MIN,
    };
    let hi = match range.max {
        Some(max) => int_upper_bound(max, range.max_exclusive),
        None => DEFAULT_TIMESTAMP_MAX,
    };
    if lo > hi {
        return Err(GenerationError::Unsatisfiable(
            "empty timestamp range".to_string(),
        ));
    }
    let seconds = ctx.rng.random_range(lo..=hi);
    let instant = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
        GenerationError::Unsatisfiable("timestamp outside the representable range".to_string())
    })?;
    Ok(Element::new(Value::Timestamp(instant)))
}

/// The sample is restricted to single-byte characters, so code-point and
/// byte counts coincide and the two declared ranges intersect directly.
/// Defaults apply only after the intersection, so a declared bound on
/// either constraint is never defeated by the other's default.
fn sample_text(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
    tag: IonType,
) -> Result<Element, GenerationError> {
    let default_min = if tag == IonType::Symbol { 1 } else { 0 };
    let declared = definition
        .constraints
        .codepoint_length()
        .unwrap_or_default()
        .intersect(definition.constraints.byte_length().unwrap_or_default());
    let (lo, hi) = declared.resolve(default_min, DEFAULT_TEXT_MAX).ok_or_else(|| {
        GenerationError::Unsatisfiable(
            "text length bounds have an empty intersection".to_string(),
        )
    })?;

    let length = ctx.rng.random_range(lo..=hi) as usize;
    let mut text = String::with_capacity(length);
    for index in 0..length {
        let charset = if tag == IonType::Symbol && index == 0 {
            SYMBOL_HEAD_CHARSET
        } else {
            TEXT_CHARSET
        };
        let byte = charset[ctx.rng.random_range(0..charset.len())];
        text.push(byte as char);
    }
    let value = match tag {
        IonType::Symbol => Value::Symbol(text),
        _ => Value::String(text),
    };
    Ok(Element::new(value))
}

fn sample_lob(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
    tag: IonType,
) -> Result<Element, GenerationError> {
    let bytes = definition.constraints.byte_length().unwrap_or_default();
    let (lo, hi) = bytes
        .resolve(0, DEFAULT_LOB_MAX)
        .ok_or_else(|| length_conflict("byte_length"))?;
    let length = ctx.rng.random_range(lo..=hi) as usize;
    let payload = match tag {
        IonType::Clob => (0..length)
            .map(|_| ctx.rng.random_range(0x20..=0x7e_u8))
            .collect(),
        _ => {
            let mut buffer = vec![0_u8; length];
            ctx.rng.fill(buffer.as_mut_slice());
            buffer
        }
    };
    let value = match tag {
        IonType::Clob => Value::Clob(payload),
        _ => Value::Blob(payload),
    };
    Ok(Element::new(value))
}

/// Required `contains` members are reserved first and emitted verbatim;
/// remaining slots are filled against the `element` type. Final order is
/// randomized per the no-particular-order contract.
fn sample_sequence(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
    tag: IonType,
) -> Result<Element, GenerationError> {
    let required: Vec<Element> = definition
        .constraints
        .contains()
        .map(|members| members.to_vec())
        .unwrap_or_default();
    let lengths = definition
        .constraints
        .container_length()
        .unwrap_or_default();
    let (lo, hi) = lengths
        .resolve(0, DEFAULT_SEQUENCE_MAX)
        .ok_or_else(|| length_conflict("container_length"))?;
    if required.len() as u64 > hi {
        return Err(GenerationError::Unsatisfiable(format!(
            "{} contains members exceed the maximum container length {hi}",
            required.len()
        )));
    }

    let lo = lo.max(required.len() as u64);
    let total = ctx.rng.random_range(lo..=hi);
    let filler = total - required.len() as u64;
    let filler_def = definition
        .constraints
        .element()
        .cloned()
        .unwrap_or_else(|| TypeDefinition::of(IonType::Int));

    let mut members = required;
    for _ in 0..filler {
        members.push(generate(&filler_def, ctx)?);
    }
    members.shuffle(&mut ctx.rng);

    let value = match tag {
        IonType::Sexp => Value::Sexp(members),
        _ => Value::List(members),
    };
    Ok(Element::new(value))
}

fn sample_struct(
    definition: &TypeDefinition,
    ctx: &mut GenContext,
) -> Result<Element, GenerationError> {
    if let Some(declared) = definition.constraints.fields() {
        let mut fields = Vec::with_capacity(declared.len());
        for (name, field_def) in declared {
            fields.push((name.clone(), generate(field_def, ctx)?));
        }
        return Ok(Element::new(Value::Struct(fields)));
    }

    let lengths = definition
        .constraints
        .container_length()
        .unwrap_or_default();
    let (lo, hi) = lengths
        .resolve(0, DEFAULT_STRUCT_MAX)
        .ok_or_else(|| length_conflict("container_length"))?;
    let count = ctx.rng.random_range(lo..=hi);
    let filler_def = definition
        .constraints
        .element()
        .cloned()
        .unwrap_or_else(|| TypeDefinition::of(IonType::Int));

    let mut fields = Vec::with_capacity(count as usize);
    for index in 0..count {
        fields.push((format!("field_{index}"), generate(&filler_def, ctx)?));
    }
    Ok(Element::new(Value::Struct(fields)))
}

fn length_conflict(constraint: &str) -> GenerationError {
    GenerationError::Unsatisfiable(format!(
        "{constraint} declares a minimum above its maximum"
    ))
}
