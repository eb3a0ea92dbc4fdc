//! Fixed wire vocabulary of the JSON-LD checkpoint format.
//!
//! Everything the codecs, the validator and the detectors agree on lives
//! here: type tags, trait family tags, sidecar property names and the
//! `@context` block.

use serde_json::{Value, json};

/// Version tag of the internal checkpoint format.
pub const INTERNAL_FORMAT_VERSION: &str = "2.0";

/// Namespace prefix for every emitted identifier.
pub const ID_PREFIX: &str = "urn:uuid:";

/// Placeholder prefix for questions imported without an identifier.
pub const POSITIONAL_ID_PREFIX: &str = "question_";

/// Programming language tag used when none is configured.
pub const DEFAULT_PROGRAMMING_LANGUAGE: &str = "Python";

/// Opaque repository tag carried on every `SoftwareSourceCode`.
pub const CODE_REPOSITORY: &str = "karenina-benchmarks";

/// schema.org type tags.
pub mod types {
    pub const DATA_FEED: &str = "DataFeed";
    pub const DATA_FEED_ITEM: &str = "DataFeedItem";
    pub const QUESTION: &str = "Question";
    pub const ANSWER: &str = "Answer";
    pub const SOFTWARE_SOURCE_CODE: &str = "SoftwareSourceCode";
    pub const RATING: &str = "Rating";
    pub const PROPERTY_VALUE: &str = "PropertyValue";
    pub const PERSON: &str = "Person";
    pub const ORGANIZATION: &str = "Organization";
    pub const CREATIVE_WORK: &str = "CreativeWork";
}

/// `additionalType` tags distinguishing trait family and scope.
pub mod additional_types {
    pub const GLOBAL_RUBRIC_TRAIT: &str = "GlobalRubricTrait";
    pub const QUESTION_RUBRIC_TRAIT: &str = "QuestionSpecificRubricTrait";
    pub const GLOBAL_REGEX_TRAIT: &str = "GlobalRegexTrait";
    pub const QUESTION_REGEX_TRAIT: &str = "QuestionSpecificRegexTrait";
    pub const GLOBAL_METRIC_TRAIT: &str = "GlobalMetricRubricTrait";
    pub const QUESTION_METRIC_TRAIT: &str = "QuestionSpecificMetricRubricTrait";
    pub const GLOBAL_CALLABLE_TRAIT: &str = "GlobalCallableTrait";
    pub const QUESTION_CALLABLE_TRAIT: &str = "QuestionSpecificCallableTrait";

    /// Every tag a `Rating` may carry.
    pub const ALL: [&str; 8] = [
        GLOBAL_RUBRIC_TRAIT,
        QUESTION_RUBRIC_TRAIT,
        GLOBAL_REGEX_TRAIT,
        QUESTION_REGEX_TRAIT,
        GLOBAL_METRIC_TRAIT,
        QUESTION_METRIC_TRAIT,
        GLOBAL_CALLABLE_TRAIT,
        QUESTION_CALLABLE_TRAIT,
    ];
}

/// `PropertyValue` names used as sidecar slots.
pub mod properties {
    pub const FINISHED: &str = "finished";
    pub const ORIGINAL_ANSWER_TEMPLATE: &str = "original_answer_template";
    pub const AUTHOR: &str = "author";
    pub const SOURCES: &str = "sources";
    pub const CONVERSION_METADATA: &str = "conversion_metadata";

    /// Prefix reserved for round-tripped custom metadata.
    pub const CUSTOM_PREFIX: &str = "custom_";

    // Trait family payloads carried on a `Rating`.
    pub const PATTERN: &str = "pattern";
    pub const CASE_SENSITIVE: &str = "case_sensitive";
    pub const INVERT_RESULT: &str = "invert_result";
    pub const EVALUATION_MODE: &str = "evaluation_mode";
    pub const METRICS: &str = "metrics";
    pub const TP_INSTRUCTIONS: &str = "tp_instructions";
    pub const TN_INSTRUCTIONS: &str = "tn_instructions";
    pub const REPEATED_EXTRACTION: &str = "repeated_extraction";
    pub const CALLABLE: &str = "callable";
}

/// Returns the `@context` block attached to every exported document.
pub fn schema_org_context() -> Value {
    json!({
        "@version": 1.1,
        "@vocab": "http://schema.org/",
        "DataFeed": "DataFeed",
        "DataFeedItem": "DataFeedItem",
        "Question": "Question",
        "Answer": "Answer",
        "SoftwareSourceCode": "SoftwareSourceCode",
        "Rating": "Rating",
        "PropertyValue": "PropertyValue",
        "dataFeedElement": { "@id": "dataFeedElement", "@container": "@set" },
        "item": { "@id": "item", "@type": "@id" },
        "acceptedAnswer": { "@id": "acceptedAnswer", "@type": "@id" },
        "hasPart": { "@id": "hasPart", "@type": "@id" },
        "rating": { "@id": "rating", "@container": "@set" },
        "additionalProperty": { "@id": "additionalProperty", "@container": "@set" },
        "keywords": { "@id": "keywords", "@container": "@set" }
    })
}
