//! Rubric trait <-> schema.org `Rating` conversion.
//!
//! Numeric encoding:
//! - boolean trait: `bestRating = 1`, `worstRating = 0`
//! - score trait: `bestRating = max_score`, `worstRating = min_score`
//!   (defaults 5 and 1), with `min_score < max_score`
//!
//! On import an LLM rating with exactly `(1, 0)` is a boolean trait and
//! anything else is a score trait. A genuine 0..1 score trait is therefore
//! read back as boolean; the encoding cannot tell them apart.
//!
//! Regex, metric and callable traits carry their extra fields as
//! `additionalProperty` entries. Their family is taken from
//! `additionalType`, never from the bounds.

use serde_json::Value;

use crate::codec::property::{PropertyIndex, json_property};
use crate::error::{ConversionError, Result};
use crate::model::id::rating_id;
use crate::model::{
    CallableTrait, EvaluationMode, LlmRubricTrait, MetricRubricTrait, PropertyValue, Rating,
    RegexTrait, RubricTrait, TraitFamily, TraitKind, TraitScope,
};
use crate::vocab::additional_types::*;
use crate::vocab::properties;
use crate::vocab::types;

/// Bounds of a boolean trait as `(best, worst)`.
pub const BOOLEAN_BOUNDS: (f64, f64) = (1.0, 0.0);

/// Returns the `additionalType` tag for a family in a scope.
pub fn additional_type(family: TraitFamily, scope: TraitScope) -> &'static str {
    match (family, scope) {
        (TraitFamily::Llm, TraitScope::Global) => GLOBAL_RUBRIC_TRAIT,
        (TraitFamily::Llm, TraitScope::QuestionSpecific) => QUESTION_RUBRIC_TRAIT,
        (TraitFamily::Regex, TraitScope::Global) => GLOBAL_REGEX_TRAIT,
        (TraitFamily::Regex, TraitScope::QuestionSpecific) => QUESTION_REGEX_TRAIT,
        (TraitFamily::Metric, TraitScope::Global) => GLOBAL_METRIC_TRAIT,
        (TraitFamily::Metric, TraitScope::QuestionSpecific) => QUESTION_METRIC_TRAIT,
        (TraitFamily::Callable, TraitScope::Global) => GLOBAL_CALLABLE_TRAIT,
        (TraitFamily::Callable, TraitScope::QuestionSpecific) => QUESTION_CALLABLE_TRAIT,
    }
}

/// Parses an `additionalType` tag into family and scope.
pub fn classify_additional_type(tag: &str) -> Option<(TraitFamily, TraitScope)> {
    let classified = match tag {
        GLOBAL_RUBRIC_TRAIT => (TraitFamily::Llm, TraitScope::Global),
        QUESTION_RUBRIC_TRAIT => (TraitFamily::Llm, TraitScope::QuestionSpecific),
        GLOBAL_REGEX_TRAIT => (TraitFamily::Regex, TraitScope::Global),
        QUESTION_REGEX_TRAIT => (TraitFamily::Regex, TraitScope::QuestionSpecific),
        GLOBAL_METRIC_TRAIT => (TraitFamily::Metric, TraitScope::Global),
        QUESTION_METRIC_TRAIT => (TraitFamily::Metric, TraitScope::QuestionSpecific),
        GLOBAL_CALLABLE_TRAIT => (TraitFamily::Callable, TraitScope::Global),
        QUESTION_CALLABLE_TRAIT => (TraitFamily::Callable, TraitScope::QuestionSpecific),
        _ => return None,
    };
    Some(classified)
}

/// Checks a score range for export, returning `(best, worst)`.
pub fn validate_score_range(trait_name: &str, min: f64, max: f64) -> Result<(f64, f64)> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(ConversionError::InvalidScoreRange {
            trait_name: trait_name.to_string(),
            min,
            max,
        });
    }
    Ok((max, min))
}

fn kind_bounds(name: &str, kind: TraitKind, min: f64, max: f64) -> Result<(f64, f64)> {
    match kind {
        TraitKind::Boolean => Ok(BOOLEAN_BOUNDS),
        TraitKind::Score => validate_score_range(name, min, max),
    }
}

/// Encodes a rubric trait as a `Rating` tagged for `scope`.
///
/// The rating id is derived from the trait name, so the same trait always
/// yields the same id across exports.
pub fn trait_to_rating(t: &RubricTrait, scope: TraitScope) -> Result<Rating> {
    let (best, worst, extra) = match t {
        RubricTrait::Llm(llm) => {
            let (min, max) = llm.score_bounds();
            let (best, worst) = kind_bounds(&llm.name, llm.kind, min, max)?;
            (best, worst, None)
        }
        RubricTrait::Regex(regex) => {
            let props = vec![
                PropertyValue::new(properties::PATTERN, regex.pattern.as_str()),
                PropertyValue::new(properties::CASE_SENSITIVE, regex.case_sensitive),
                PropertyValue::new(properties::INVERT_RESULT, regex.invert_result),
            ];
            (BOOLEAN_BOUNDS.0, BOOLEAN_BOUNDS.1, Some(props))
        }
        RubricTrait::Metric(metric) => {
            let props = vec![
                PropertyValue::new(properties::EVALUATION_MODE, metric.evaluation_mode.as_str()),
                json_property(properties::METRICS, &metric.metrics)?,
                json_property(properties::TP_INSTRUCTIONS, &metric.tp_instructions)?,
                json_property(properties::TN_INSTRUCTIONS, &metric.tn_instructions)?,
                PropertyValue::new(properties::REPEATED_EXTRACTION, metric.repeated_extraction),
            ];
            (BOOLEAN_BOUNDS.0, BOOLEAN_BOUNDS.1, Some(props))
        }
        RubricTrait::Callable(callable) => {
            let min = callable.min_score.unwrap_or(crate::model::rubric::DEFAULT_MIN_SCORE);
            let max = callable.max_score.unwrap_or(crate::model::rubric::DEFAULT_MAX_SCORE);
            let (best, worst) = kind_bounds(&callable.name, callable.kind, min, max)?;
            let props = vec![json_property(properties::CALLABLE, callable)?];
            (best, worst, Some(props))
        }
    };

    Ok(Rating {
        type_tag: types::RATING.to_string(),
        id: Some(rating_id(t.name())),
        name: t.name().to_string(),
        description: t.description().map(str::to_string),
        best_rating: Some(best),
        worst_rating: Some(worst),
        additional_type: additional_type(t.family(), scope).to_string(),
        additional_property: extra,
    })
}

fn rating_label(r: &Rating) -> String {
    if !r.name.is_empty() {
        r.name.clone()
    } else {
        r.id.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// Reads and checks a rating's bounds, returning `(best, worst)`.
fn rating_bounds(r: &Rating) -> Result<(f64, f64)> {
    let (best, worst) = match (r.best_rating, r.worst_rating) {
        (Some(best), Some(worst)) => (best, worst),
        (None, _) => {
            return Err(ConversionError::invalid_rating(rating_label(r), "bestRating must be a number"));
        }
        (_, None) => {
            return Err(ConversionError::invalid_rating(rating_label(r), "worstRating must be a number"));
        }
    };
    if !best.is_finite() || !worst.is_finite() {
        return Err(ConversionError::invalid_rating(
            rating_label(r),
            format!("bounds must be finite (bestRating={best}, worstRating={worst})"),
        ));
    }
    if (best, worst) != BOOLEAN_BOUNDS && worst >= best {
        return Err(ConversionError::invalid_rating(
            rating_label(r),
            format!("worstRating ({worst}) must be less than bestRating ({best})"),
        ));
    }
    Ok((best, worst))
}

fn decode_list(index: &PropertyIndex<'_>, name: &'static str, rating: &Rating) -> Result<Vec<String>> {
    let Some(value) = index.get(name) else {
        return Ok(Vec::new());
    };
    let decoded = match value {
        Value::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    };
    decoded.map_err(|e| {
        ConversionError::invalid_rating(rating_label(rating), format!("malformed `{name}`: {e}"))
    })
}

/// Decodes a `Rating` back into a rubric trait and the scope it was tagged with.
pub fn rating_to_trait(r: &Rating) -> Result<(TraitScope, RubricTrait)> {
    if r.name.trim().is_empty() {
        return Err(ConversionError::invalid_rating(
            rating_label(r),
            "name must be a non-empty string",
        ));
    }
    let Some((family, scope)) = classify_additional_type(&r.additional_type) else {
        return Err(ConversionError::invalid_rating(
            rating_label(r),
            format!("unrecognized additionalType {:?}", r.additional_type),
        ));
    };
    let (best, worst) = rating_bounds(r)?;

    let props = r.additional_property.as_deref().unwrap_or(&[]);
    let index = PropertyIndex::new(props);
    let description = r.description.clone();

    let decoded = match family {
        TraitFamily::Llm => {
            let t = if (best, worst) == BOOLEAN_BOUNDS {
                LlmRubricTrait {
                    name: r.name.clone(),
                    description,
                    kind: TraitKind::Boolean,
                    min_score: None,
                    max_score: None,
                }
            } else {
                LlmRubricTrait {
                    name: r.name.clone(),
                    description,
                    kind: TraitKind::Score,
                    min_score: Some(worst),
                    max_score: Some(best),
                }
            };
            RubricTrait::Llm(t)
        }
        TraitFamily::Regex => {
            let Some(pattern) = index.get_str(properties::PATTERN) else {
                return Err(ConversionError::MissingField {
                    field: properties::PATTERN,
                    context: format!("regex rating {:?}", rating_label(r)),
                });
            };
            RubricTrait::Regex(RegexTrait {
                name: r.name.clone(),
                description,
                pattern: pattern.to_string(),
                case_sensitive: index.get_bool(properties::CASE_SENSITIVE).unwrap_or(true),
                invert_result: index.get_bool(properties::INVERT_RESULT).unwrap_or(false),
            })
        }
        TraitFamily::Metric => {
            let evaluation_mode = match index.get_str(properties::EVALUATION_MODE) {
                None => EvaluationMode::default(),
                Some(mode) => EvaluationMode::parse(mode).ok_or_else(|| {
                    ConversionError::invalid_rating(
                        rating_label(r),
                        format!("unknown evaluation_mode {mode:?}"),
                    )
                })?,
            };
            RubricTrait::Metric(MetricRubricTrait {
                name: r.name.clone(),
                description,
                evaluation_mode,
                metrics: decode_list(&index, properties::METRICS, r)?,
                tp_instructions: decode_list(&index, properties::TP_INSTRUCTIONS, r)?,
                tn_instructions: decode_list(&index, properties::TN_INSTRUCTIONS, r)?,
                repeated_extraction: index
                    .get_bool(properties::REPEATED_EXTRACTION)
                    .unwrap_or(true),
            })
        }
        TraitFamily::Callable => {
            let Some(raw) = index.get_str(properties::CALLABLE) else {
                return Err(ConversionError::MissingField {
                    field: properties::CALLABLE,
                    context: format!("callable rating {:?}", rating_label(r)),
                });
            };
            let callable: CallableTrait = serde_json::from_str(raw).map_err(|e| {
                ConversionError::invalid_rating(rating_label(r), format!("malformed `callable`: {e}"))
            })?;
            RubricTrait::Callable(callable)
        }
    };

    Ok((scope, decoded))
}
