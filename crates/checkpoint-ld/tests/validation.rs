use checkpoint_ld::{
    CheckpointBuilder, ConversionError, ConversionOptions, ErrorKind, LlmRubricTrait,
    load_checkpoint, to_document, validate,
};
use serde_json::{Value, json};

fn exported() -> Value {
    let cp = CheckpointBuilder::new()
        .global_trait(LlmRubricTrait::boolean("concise"))
        .item("q1", |q| {
            q.question("What is 2 + 2?")
                .raw_answer("4")
                .template("class Answer(BaseAnswer):\n    value: int\n")
                .rubric_trait(LlmRubricTrait::score("accuracy", 1.0, 5.0))
        })
        .build();
    serde_json::to_value(to_document(&cp, &ConversionOptions::default()).unwrap()).unwrap()
}

fn violations(doc: &Value) -> Vec<String> {
    match validate(doc) {
        Err(ConversionError::Validation { violations }) => violations,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn exported_documents_validate() {
    validate(&exported()).unwrap();
}

#[test]
fn missing_answer_text_is_located() {
    let mut doc = exported();
    doc["dataFeedElement"][0]["item"]["acceptedAnswer"]
        .as_object_mut()
        .unwrap()
        .remove("text");

    let found = violations(&doc);
    assert_eq!(found, ["$.dataFeedElement[0].item.acceptedAnswer: missing answer text"]);
}

#[test]
fn every_problem_is_reported_at_once() {
    let mut doc = exported();
    doc["@type"] = json!("Dataset");
    doc["rating"][0]["bestRating"] = json!("high");
    doc["dataFeedElement"][0]["item"]["rating"][0]["worstRating"] = json!(9);
    doc["dataFeedElement"][0]["item"]["hasPart"]["@type"] = json!("Code");

    let found = violations(&doc);
    assert_eq!(found.len(), 4, "{found:#?}");
    assert!(found[0].starts_with("$: expected @type \"DataFeed\""));
    assert!(found.iter().any(|v| v == "$.rating[0]: bestRating must be a number"));
    assert!(found.iter().any(|v| v.starts_with("$.dataFeedElement[0].item.rating[0]: worstRating (9)")));
    assert!(found.iter().any(|v| v.starts_with("$.dataFeedElement[0].item.hasPart: expected @type")));

    let err = validate(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string().lines().count(), 4);
}

#[test]
fn misplaced_scope_tags_rejected() {
    let mut doc = exported();
    doc["rating"][0]["additionalType"] = json!("QuestionSpecificRubricTrait");
    doc["dataFeedElement"][0]["item"]["rating"][0]["additionalType"] = json!("GlobalRubricTrait");

    let found = violations(&doc);
    assert_eq!(
        found,
        [
            "$.dataFeedElement[0].item.rating[0]: GlobalRubricTrait is not allowed inside a question",
            "$.rating[0]: QuestionSpecificRubricTrait is not allowed at dataset level",
        ]
    );
}

#[test]
fn unknown_additional_type_rejected() {
    let mut doc = exported();
    doc["rating"][0]["additionalType"] = json!("GlobalVibeTrait");
    let found = violations(&doc);
    assert_eq!(found, ["$.rating[0]: unrecognized additionalType \"GlobalVibeTrait\""]);
}

#[test]
fn load_refuses_invalid_external_documents() {
    let mut doc = exported();
    doc["rating"][0]["name"] = json!("   ");

    let err = load_checkpoint(doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("rating name must be a non-empty string"));
}

#[test]
fn non_document_roots_rejected() {
    for doc in [json!([]), json!("DataFeed"), json!(null)] {
        assert_eq!(violations(&doc), ["$: document must be a JSON object"]);
    }
}

#[test]
fn both_item_lists_rejected_before_import() {
    let mut doc = exported();
    doc["hasPart"] = json!([]);

    let found = violations(&doc);
    assert_eq!(found, ["$: both `dataFeedElement` and `hasPart` present"]);

    let err = load_checkpoint(doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn validated_has_part_documents_load() {
    let mut doc = exported();
    let items = doc.as_object_mut().unwrap().remove("dataFeedElement").unwrap();
    doc["hasPart"] = items;

    validate(&doc).unwrap();
    assert_eq!(load_checkpoint(doc).unwrap().len(), 1);
}
