//! Rubric and rubric trait types.
//!
//! A rubric is an ordered list of traits, each belonging to exactly one
//! family. The internal JSON form groups traits by family
//! (`llm_traits`, `regex_traits`, `callable_traits`, `metric_traits`);
//! in memory they are a single [`RubricTrait`] sum type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scoring semantics of an LLM-judged trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    Boolean,
    Score,
}

impl TraitKind {
    fn boolean() -> Self {
        TraitKind::Boolean
    }
}

/// Trait family, mirrored by the `additionalType` tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitFamily {
    Llm,
    Regex,
    Metric,
    Callable,
}

/// Where a trait applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitScope {
    /// Dataset-level, applies to every question.
    Global,
    /// Owned by a single question.
    QuestionSpecific,
}

/// Default lower bound of a score trait without an explicit `min_score`.
pub const DEFAULT_MIN_SCORE: f64 = 1.0;

/// Default upper bound of a score trait without an explicit `max_score`.
pub const DEFAULT_MAX_SCORE: f64 = 5.0;

/// A trait judged by an LLM, either pass/fail or on a bounded score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRubricTrait {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: TraitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
}

impl LlmRubricTrait {
    /// Creates a pass/fail trait.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: TraitKind::Boolean,
            min_score: None,
            max_score: None,
        }
    }

    /// Creates a score trait with explicit bounds.
    pub fn score(name: impl Into<String>, min_score: f64, max_score: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: TraitKind::Score,
            min_score: Some(min_score),
            max_score: Some(max_score),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `(min, max)` with the defaults applied.
    pub fn score_bounds(&self) -> (f64, f64) {
        (
            self.min_score.unwrap_or(DEFAULT_MIN_SCORE),
            self.max_score.unwrap_or(DEFAULT_MAX_SCORE),
        )
    }
}

fn default_true() -> bool {
    true
}

/// A trait evaluated by matching a regular expression against the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexTrait {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pattern: String,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    #[serde(default)]
    pub invert_result: bool,
}

impl RegexTrait {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            pattern: pattern.into(),
            case_sensitive: true,
            invert_result: false,
        }
    }
}

/// Which confusion-matrix cells a metric trait evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    TpOnly,
    FullMatrix,
}

impl EvaluationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationMode::TpOnly => "tp_only",
            EvaluationMode::FullMatrix => "full_matrix",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tp_only" => Some(EvaluationMode::TpOnly),
            "full_matrix" => Some(EvaluationMode::FullMatrix),
            _ => None,
        }
    }
}

/// A confusion-matrix trait computing precision/recall style metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRubricTrait {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub evaluation_mode: EvaluationMode,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub tp_instructions: Vec<String>,
    #[serde(default)]
    pub tn_instructions: Vec<String>,
    #[serde(default = "default_true")]
    pub repeated_extraction: bool,
}

impl MetricRubricTrait {
    pub fn new(name: impl Into<String>, metrics: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            evaluation_mode: EvaluationMode::TpOnly,
            metrics,
            tp_instructions: Vec::new(),
            tn_instructions: Vec::new(),
            repeated_extraction: true,
        }
    }
}

/// A server-defined trait backed by serialized code.
///
/// Read-only on this side: everything beyond name, kind and bounds is kept
/// in `payload` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableTrait {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "TraitKind::boolean")]
    pub kind: TraitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// One rubric trait, discriminated by family.
#[derive(Debug, Clone, PartialEq)]
pub enum RubricTrait {
    Llm(LlmRubricTrait),
    Regex(RegexTrait),
    Metric(MetricRubricTrait),
    Callable(CallableTrait),
}

impl RubricTrait {
    pub fn name(&self) -> &str {
        match self {
            RubricTrait::Llm(t) => &t.name,
            RubricTrait::Regex(t) => &t.name,
            RubricTrait::Metric(t) => &t.name,
            RubricTrait::Callable(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            RubricTrait::Llm(t) => t.description.as_deref(),
            RubricTrait::Regex(t) => t.description.as_deref(),
            RubricTrait::Metric(t) => t.description.as_deref(),
            RubricTrait::Callable(t) => t.description.as_deref(),
        }
    }

    pub fn family(&self) -> TraitFamily {
        match self {
            RubricTrait::Llm(_) => TraitFamily::Llm,
            RubricTrait::Regex(_) => TraitFamily::Regex,
            RubricTrait::Metric(_) => TraitFamily::Metric,
            RubricTrait::Callable(_) => TraitFamily::Callable,
        }
    }
}

impl From<LlmRubricTrait> for RubricTrait {
    fn from(t: LlmRubricTrait) -> Self {
        RubricTrait::Llm(t)
    }
}

impl From<RegexTrait> for RubricTrait {
    fn from(t: RegexTrait) -> Self {
        RubricTrait::Regex(t)
    }
}

impl From<MetricRubricTrait> for RubricTrait {
    fn from(t: MetricRubricTrait) -> Self {
        RubricTrait::Metric(t)
    }
}

impl From<CallableTrait> for RubricTrait {
    fn from(t: CallableTrait) -> Self {
        RubricTrait::Callable(t)
    }
}

/// An ordered collection of rubric traits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RubricGroups", into = "RubricGroups")]
pub struct Rubric {
    pub traits: Vec<RubricTrait>,
}

impl Rubric {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, t: impl Into<RubricTrait>) {
        self.traits.push(t.into());
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RubricTrait> {
        self.traits.iter()
    }

    /// Iterates over the LLM-judged traits only.
    pub fn llm_traits(&self) -> impl Iterator<Item = &LlmRubricTrait> {
        self.traits.iter().filter_map(|t| match t {
            RubricTrait::Llm(t) => Some(t),
            _ => None,
        })
    }

    /// Finds a trait by name.
    pub fn get(&self, name: &str) -> Option<&RubricTrait> {
        self.traits.iter().find(|t| t.name() == name)
    }
}

impl From<Vec<RubricTrait>> for Rubric {
    fn from(traits: Vec<RubricTrait>) -> Self {
        Self { traits }
    }
}

impl FromIterator<RubricTrait> for Rubric {
    fn from_iter<I: IntoIterator<Item = RubricTrait>>(iter: I) -> Self {
        Self {
            traits: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Rubric {
    type Item = &'a RubricTrait;
    type IntoIter = std::slice::Iter<'a, RubricTrait>;

    fn into_iter(self) -> Self::IntoIter {
        self.traits.iter()
    }
}

/// Grouped on-disk shape of a [`Rubric`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct RubricGroups {
    #[serde(default, alias = "traits")]
    llm_traits: Vec<LlmRubricTrait>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    regex_traits: Vec<RegexTrait>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    callable_traits: Vec<CallableTrait>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    metric_traits: Vec<MetricRubricTrait>,
}

impl From<RubricGroups> for Rubric {
    fn from(groups: RubricGroups) -> Self {
        let mut traits = Vec::with_capacity(
            groups.llm_traits.len()
                + groups.regex_traits.len()
                + groups.callable_traits.len()
                + groups.metric_traits.len(),
        );
        traits.extend(groups.llm_traits.into_iter().map(RubricTrait::Llm));
        traits.extend(groups.regex_traits.into_iter().map(RubricTrait::Regex));
        traits.extend(groups.callable_traits.into_iter().map(RubricTrait::Callable));
        traits.extend(groups.metric_traits.into_iter().map(RubricTrait::Metric));
        Self { traits }
    }
}

impl From<Rubric> for RubricGroups {
    fn from(rubric: Rubric) -> Self {
        let mut groups = RubricGroups::default();
        for t in rubric.traits {
            match t {
                RubricTrait::Llm(t) => groups.llm_traits.push(t),
                RubricTrait::Regex(t) => groups.regex_traits.push(t),
                RubricTrait::Callable(t) => groups.callable_traits.push(t),
                RubricTrait::Metric(t) => groups.metric_traits.push(t),
            }
        }
        groups
    }
}
