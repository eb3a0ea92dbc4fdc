use std::time::{Duration, Instant};

use checkpoint_ld::vocab::additional_types;
use checkpoint_ld::{
    Agent, CallableTrait, CheckpointBuilder, CheckpointFormat, ConversionOptions, EvaluationMode,
    LlmRubricTrait, MetricRubricTrait, RegexTrait, RubricTrait, TraitKind, UnifiedCheckpoint,
    detect_format, from_document, load_checkpoint, parse_checkpoint, parse_document, to_document,
};
use serde_json::{Value, json};

fn capitals() -> UnifiedCheckpoint {
    CheckpointBuilder::new()
        .name("Capitals")
        .global_trait(LlmRubricTrait::boolean("concise"))
        .global_trait(RegexTrait::new("no apology", "(?i)sorry"))
        .item("q-paris", |q| {
            q.question("What is the capital of France?")
                .raw_answer("Paris")
                .template("class Answer(BaseAnswer):\n    capital: str\n")
                .finished(true)
                .rubric_trait(LlmRubricTrait::score("accuracy", -10.0, 10.0))
                .author(Agent::person("Ada"))
        })
        .item("q-rome", |q| {
            q.question("What is the capital of Italy?")
                .raw_answer("Rome")
                .template("class Answer(BaseAnswer):\n    capital: str\n")
        })
        .build()
}

#[test]
fn empty_checkpoint_exports_and_imports() {
    let doc = to_document(&UnifiedCheckpoint::new(), &ConversionOptions::default()).unwrap();
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["@type"], "DataFeed");
    assert!(value["@context"].is_object());
    assert_eq!(value["dataFeedElement"], json!([]));
    assert_eq!(detect_format(&value), Some(CheckpointFormat::External));

    let back = from_document(&doc).unwrap();
    assert!(back.checkpoint.is_empty());
    assert!(back.global_rubric.is_none());
}

#[test]
fn custom_score_range_survives() {
    let doc = to_document(&capitals(), &ConversionOptions::default()).unwrap();
    let rating = &doc.data_feed_element[0].item.rating.as_ref().unwrap()[0];
    assert_eq!(rating.worst_rating, Some(-10.0));
    assert_eq!(rating.best_rating, Some(10.0));

    let back = from_document(&doc).unwrap();
    let rubric = back.checkpoint["q-paris"].question_rubric.as_ref().unwrap();
    match rubric.get("accuracy") {
        Some(RubricTrait::Llm(t)) => {
            assert_eq!(t.kind, TraitKind::Score);
            assert_eq!((t.min_score, t.max_score), (Some(-10.0), Some(10.0)));
        }
        other => panic!("expected score trait, got {other:?}"),
    }
}

#[test]
fn global_and_question_traits_stay_separate() {
    let doc = to_document(&capitals(), &ConversionOptions::default()).unwrap();

    let global = doc.rating.as_ref().unwrap();
    let tags: Vec<&str> = global.iter().map(|r| r.additional_type.as_str()).collect();
    assert_eq!(
        tags,
        [additional_types::GLOBAL_RUBRIC_TRAIT, additional_types::GLOBAL_REGEX_TRAIT]
    );

    for entry in &doc.data_feed_element {
        for rating in entry.item.rating.iter().flatten() {
            assert!(!rating.additional_type.starts_with("Global"));
            assert_ne!(rating.name, "concise");
        }
    }

    let back = from_document(&doc).unwrap();
    assert_eq!(back.global_rubric.as_ref().map(|r| r.len()), Some(2));
    assert!(back.checkpoint["q-rome"].question_rubric.is_none());
    assert_eq!(back.checkpoint, capitals().checkpoint);
}

#[test]
fn thousand_items_convert_quickly() {
    let mut builder = CheckpointBuilder::new().global_trait(LlmRubricTrait::boolean("safe"));
    for i in 0..1000 {
        builder = builder.item(format!("q{i:04}"), |q| {
            q.question(format!("Question number {i}?"))
                .raw_answer(format!("{i}"))
                .template("class Answer(BaseAnswer):\n    value: int\n")
                .rubric_trait(LlmRubricTrait::score("precision", 1.0, 5.0))
                .custom("batch", "a")
        });
    }
    let cp = builder.build();

    let start = Instant::now();
    let doc = to_document(&cp, &ConversionOptions::default()).unwrap();
    let back = from_document(&doc).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(back.checkpoint.len(), 1000);
    assert_eq!(back.checkpoint, cp.checkpoint);
    assert!(elapsed < Duration::from_secs(1), "round trip took {elapsed:?}");
}

#[test]
fn corrupted_author_does_not_fail_import() {
    let doc = to_document(&capitals(), &ConversionOptions::default()).unwrap();
    let mut value = serde_json::to_value(&doc).unwrap();

    let props = value["dataFeedElement"][0]["item"]["additionalProperty"]
        .as_array_mut()
        .unwrap();
    let author = props.iter_mut().find(|p| p["name"] == "author").unwrap();
    author["value"] = Value::String("{\"@type\": \"Person\", \"name\": ".to_string());

    let back = load_checkpoint(value).unwrap();
    let item = &back.checkpoint["q-paris"];
    assert!(item.author.is_none());
    assert_eq!(item.raw_answer, "Paris");
    assert!(item.finished);
}

#[test]
fn metric_and_callable_traits_roundtrip() {
    let mut metric = MetricRubricTrait::new(
        "entity recall",
        vec!["precision".to_string(), "recall".to_string()],
    );
    metric.evaluation_mode = EvaluationMode::FullMatrix;
    metric.tp_instructions = vec!["mentions BRCA1".to_string()];
    metric.tn_instructions = vec!["does not mention TP53".to_string()];
    metric.repeated_extraction = false;

    let mut payload = serde_json::Map::new();
    payload.insert("callable_code".to_string(), json!("gASVAAAA"));
    let callable = CallableTrait {
        name: "length check".to_string(),
        description: Some("Answer is short".to_string()),
        kind: TraitKind::Boolean,
        min_score: None,
        max_score: None,
        payload,
    };

    let cp = CheckpointBuilder::new()
        .global_trait(callable.clone())
        .item("q", |q| {
            q.question("Which genes?")
                .raw_answer("BRCA1")
                .template("t")
                .rubric_trait(metric.clone())
        })
        .build();

    let doc = to_document(&cp, &ConversionOptions::default()).unwrap();
    let back = from_document(&doc).unwrap();

    match back.global_rubric.as_ref().and_then(|r| r.get("length check")) {
        Some(RubricTrait::Callable(t)) => {
            assert_eq!(t.description.as_deref(), Some("Answer is short"));
            assert_eq!(t.payload.get("callable_code"), Some(&json!("gASVAAAA")));
        }
        other => panic!("expected callable trait, got {other:?}"),
    }
    let rubric = back.checkpoint["q"].question_rubric.as_ref().unwrap();
    assert_eq!(rubric.get("entity recall"), Some(&RubricTrait::Metric(metric)));
}

#[test]
fn zero_one_score_reads_back_as_boolean() {
    let cp = CheckpointBuilder::new()
        .global_trait(LlmRubricTrait::score("binary", 0.0, 1.0))
        .build();
    let doc = to_document(&cp, &ConversionOptions::default()).unwrap();
    let back = from_document(&doc).unwrap();

    match back.global_rubric.as_ref().and_then(|r| r.get("binary")) {
        Some(RubricTrait::Llm(t)) => assert_eq!(t.kind, TraitKind::Boolean),
        other => panic!("expected llm trait, got {other:?}"),
    }
}

#[test]
fn internal_json_loads_grouped_rubrics() {
    let text = r#"{
        "version": "2.0",
        "global_rubric": {
            "traits": [
                { "name": "clarity", "kind": "score", "min_score": 1, "max_score": 5 }
            ],
            "regex_traits": [
                { "name": "has citation", "pattern": "\\[\\d+\\]" }
            ]
        },
        "checkpoint": {
            "q1": {
                "question": "2 + 2?",
                "raw_answer": "4",
                "answer_template": "class Answer(BaseAnswer):\n    value: int\n",
                "finished": true,
                "custom_metadata": { "difficulty": "trivial" }
            }
        }
    }"#;

    let cp = parse_checkpoint(text).unwrap();
    let global = cp.global_rubric.as_ref().unwrap();
    assert_eq!(global.len(), 2);
    match global.get("has citation") {
        Some(RubricTrait::Regex(t)) => assert!(t.case_sensitive),
        other => panic!("expected regex trait, got {other:?}"),
    }

    let doc = to_document(&cp, &ConversionOptions::format_conversion()).unwrap();
    let text = serde_json::to_string_pretty(&doc).unwrap();
    let back = from_document(&parse_document(&text).unwrap()).unwrap();
    assert_eq!(back.checkpoint, cp.checkpoint);
    assert_eq!(back.global_rubric, cp.global_rubric);
}

#[test]
fn has_part_alias_is_accepted() {
    let doc = to_document(&capitals(), &ConversionOptions::default()).unwrap();
    let mut value = serde_json::to_value(&doc).unwrap();
    let obj = value.as_object_mut().unwrap();
    let items = obj.remove("dataFeedElement").unwrap();
    obj.insert("hasPart".to_string(), items);

    let back = load_checkpoint(value).unwrap();
    assert_eq!(back.checkpoint.len(), 2);
    assert!(back.checkpoint.contains_key("q-rome"));
}
