//! Integration tests for formwork-validation

use chrono::{Days, NaiveDate};
use formwork_validation::*;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn engine_with(config: EngineConfig) -> ValidationEngine {
    ValidationEngine::builder()
        .config(config)
        .clock(FixedClock(today()))
        .build()
        .unwrap()
}

fn error_keys(result: &ValidationResult, id: u32) -> Vec<String> {
    result.field_errors(FieldId(id)).iter().map(|v| v.key.clone()).collect()
}

// =============================================================================
// Scheduling
// =============================================================================

#[test]
fn test_independent_fields_follow_declaration_order() {
    let schema = FormSchema::builder("plain")
        .field(FieldBuilder::text("zeta").id(1))
        .field(FieldBuilder::text("alpha").id(2))
        .field(FieldBuilder::text("mid").id(3).order(1))
        .build()
        .unwrap();
    let snapshots = schema.extract(&FormValues::new()).unwrap();

    let result = ValidationEngine::new().unwrap().validate(&snapshots).unwrap();
    // zeta is at 0; alpha and mid share 1 and sort by name
    assert_eq!(result.evaluated(), &[FieldId(1), FieldId(2), FieldId(3)]);
}

#[test]
fn test_dependency_chain_is_respected() {
    let schema = FormSchema::builder("chain")
        .field(FieldBuilder::text("c").id(3).validate_after(2))
        .field(FieldBuilder::text("b").id(2).validate_after(1))
        .field(FieldBuilder::text("a").id(1))
        .build()
        .unwrap();
    let snapshots = schema.extract(&FormValues::new()).unwrap();

    let order: Vec<&str> = schedule(&snapshots).into_iter().map(FieldSnapshot::name).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn test_dangling_dependency_is_skipped_unless_strict() {
    let builder = FormSchema::builder("dangling")
        .field(FieldBuilder::text("a").id(1).rule(RuleConfig::required()))
        .field(FieldBuilder::text("b").id(2).validate_after(7).rule(RuleConfig::required()));

    let schema = builder.clone().build().unwrap();
    let snapshots = schema.extract(&FormValues::new()).unwrap();
    let result = ValidationEngine::new().unwrap().validate(&snapshots).unwrap();
    assert_eq!(result.evaluated(), &[FieldId(1)]);
    assert!(!result.was_evaluated(FieldId(2)));

    let error = builder.strict_dependencies(true).build().unwrap_err();
    assert!(matches!(error, SchemaError::DanglingDependency { target: 7, .. }));
}

// =============================================================================
// Stop policies
// =============================================================================

fn two_failing_fields() -> Snapshots {
    FormSchema::builder("policy")
        .field(
            FieldBuilder::text("f1")
                .id(1)
                .rule(RuleConfig::MaxLength(2))
                .rule(RuleConfig::IntType),
        )
        .field(FieldBuilder::text("f2").id(2).rule(RuleConfig::required()))
        .build()
        .unwrap()
        .extract(&FormValues::new().text("f1", "abc").text("f2", ""))
        .unwrap()
}

#[test]
fn test_stop_policies() {
    let snapshots = two_failing_fields();

    let all = engine_with(EngineConfig::default()).validate(&snapshots).unwrap();
    assert_eq!(error_keys(&all, 1), vec!["maxLength", "intType"]);
    assert_eq!(error_keys(&all, 2), vec!["required"]);

    let stop_all = engine_with(EngineConfig::default().with_stop_policy(StopPolicy::StopAllIfAny))
        .validate(&snapshots)
        .unwrap();
    assert_eq!(error_keys(&stop_all, 1), vec!["maxLength"]);
    assert!(!stop_all.was_evaluated(FieldId(2)));

    let resume = engine_with(EngineConfig::default().with_stop_policy(StopPolicy::StopAndResumeNext))
        .validate(&snapshots)
        .unwrap();
    assert_eq!(error_keys(&resume, 1), vec!["maxLength"]);
    assert_eq!(error_keys(&resume, 2), vec!["required"]);
}

// =============================================================================
// Built-in rules through the engine
// =============================================================================

#[test]
fn test_code_point_length() {
    let schema = FormSchema::builder("kana")
        .field(FieldBuilder::text("five").id(1).rule(RuleConfig::Length(5)))
        .field(FieldBuilder::text("four").id(2).rule(RuleConfig::Length(4)))
        .build()
        .unwrap();
    let engine = ValidationEngine::new().unwrap();

    let ok = schema
        .extract(&FormValues::new().text("five", "あいうえお").text("four", "あいう𠮷"))
        .unwrap();
    assert!(!engine.validate(&ok).unwrap().has_error());

    let bad = schema.extract(&FormValues::new().text("five", "あいう𠮷")).unwrap();
    assert_eq!(error_keys(&engine.validate(&bad).unwrap(), 1), vec!["length"]);
}

#[test]
fn test_head_is_dummy_select() {
    let schema = FormSchema::builder("pref")
        .field(
            FieldBuilder::select("prefecture")
                .id(1)
                .head_is_dummy(true)
                .rule(RuleConfig::required()),
        )
        .build()
        .unwrap();
    let engine = ValidationEngine::new().unwrap();

    let placeholder = schema.extract(&FormValues::new().text("prefecture", "0")).unwrap();
    assert!(engine.validate(&placeholder).unwrap().has_error());

    let chosen = schema.extract(&FormValues::new().text("prefecture", "13")).unwrap();
    assert!(!engine.validate(&chosen).unwrap().has_error());
}

#[test]
fn test_min_value_fails_closed() {
    let schema = FormSchema::builder("price")
        .field(FieldBuilder::text("price").id(1).rule(RuleConfig::MinValue(100)))
        .build()
        .unwrap();
    let engine = ValidationEngine::new().unwrap();

    for (value, fails) in [("99", true), ("100", false), ("a", true)] {
        let snapshots = schema.extract(&FormValues::new().text("price", value)).unwrap();
        assert_eq!(engine.validate(&snapshots).unwrap().has_error(), fails, "value {}", value);
    }
}

#[test]
fn test_singlebyte_under_shift_jis() {
    let schema = FormSchema::builder("code")
        .field(FieldBuilder::text("code").id(1).rule(RuleConfig::Singlebyte))
        .build()
        .unwrap();
    let engine = engine_with(EngineConfig::default().with_character_encoding("SJIS"));

    let ascii = schema.extract(&FormValues::new().text("code", "1")).unwrap();
    assert!(!engine.validate(&ascii).unwrap().has_error());

    let wide = schema.extract(&FormValues::new().text("code", "あ")).unwrap();
    assert_eq!(error_keys(&engine.validate(&wide).unwrap(), 1), vec!["singlebyte"]);
}

#[test]
fn test_past_date_with_locale_pattern() {
    let schema = FormSchema::builder("history")
        .field(
            FieldBuilder::text("happened")
                .id(1)
                .rule(RuleConfig::DatePattern { pattern: None })
                .rule(RuleConfig::PastDate {
                    pattern: None,
                    allow_today: false,
                }),
        )
        .build()
        .unwrap();
    let engine = engine_with(EngineConfig::default().with_locale("ja-JP"));
    let format = |date: NaiveDate| date.format("%Y/%m/%d").to_string();

    let check = |date: NaiveDate| {
        let snapshots = schema.extract(&FormValues::new().text("happened", format(date))).unwrap();
        engine.validate(&snapshots).unwrap().has_error()
    };

    assert!(check(today()));
    assert!(!check(today().checked_sub_days(Days::new(1)).unwrap()));
    assert!(check(today().checked_add_days(Days::new(1)).unwrap()));

    let garbled = schema.extract(&FormValues::new().text("happened", "June 1st")).unwrap();
    assert_eq!(error_keys(&engine.validate(&garbled).unwrap(), 1), vec!["datePattern"]);
}

#[test]
fn test_required_if_not_empty() {
    let schema = FormSchema::builder("shipping")
        .field(FieldBuilder::text("company").id(1))
        .field(
            FieldBuilder::text("department")
                .id(2)
                .rule(RuleSpec::required_if_not_empty(FieldId(1))),
        )
        .build()
        .unwrap();
    let engine = ValidationEngine::new().unwrap();

    let private = schema.extract(&FormValues::new().text("company", "")).unwrap();
    assert!(!engine.validate(&private).unwrap().has_error());

    let business = schema.extract(&FormValues::new().text("company", "ACME")).unwrap();
    assert_eq!(error_keys(&engine.validate(&business).unwrap(), 2), vec!["required"]);
}

// =============================================================================
// Single-field mode and sessions
// =============================================================================

#[test]
fn test_single_field_mode_ignores_dependencies() {
    let schema = Arc::new(
        FormSchema::builder("pair")
            .field(FieldBuilder::text("password").id(1).rule(RuleConfig::MinLength(8)))
            .field(
                FieldBuilder::text("confirm")
                    .id(2)
                    .validate_after(1)
                    .rule(RuleConfig::required()),
            )
            .build()
            .unwrap(),
    );
    let engine = ValidationEngine::new().unwrap();
    let mut session = FormSession::new(&engine);
    session.bind(schema);
    session.capture(&FormValues::new().text("password", "short")).unwrap();

    let result = session.validate_field(FieldId(2)).unwrap();
    assert_eq!(result.evaluated(), &[FieldId(2)]);
    assert_eq!(error_keys(result, 2), vec!["required"]);
    assert!(result.field_errors(FieldId(1)).is_empty());
}

// =============================================================================
// Entity mapping
// =============================================================================

entity! {
    pub struct Member {
        pub name: String,
        pub age: u32,
        pub points: Option<i64>,
        pub newsletter: bool,
        pub interests: Vec<String>,
    }
}

struct MemberForm {
    name: String,
    age: String,
    points: String,
    interests: Vec<String>,
}

impl Form for MemberForm {
    fn describe(schema: FormSchemaBuilder) -> FormSchemaBuilder {
        schema
            .field(FieldBuilder::text("name").id(1).rule(RuleConfig::required()))
            .field(FieldBuilder::text("age").id(2).rule(RuleConfig::IntType))
            .field(FieldBuilder::text("points").id(3).rule(RuleConfig::IntType))
            .field(FieldBuilder::checkbox("interests").id(4))
    }

    fn values(&self) -> FormValues {
        FormValues::new()
            .text("name", self.name.clone())
            .text("age", self.age.clone())
            .text("points", self.points.clone())
            .list("interests", self.interests.clone())
    }
}

#[test]
fn test_round_trip_into_entity() {
    let engine = ValidationEngine::new().unwrap();
    let form = MemberForm {
        name: "Sato".into(),
        age: "34".into(),
        points: String::new(),
        interests: vec!["chess".into()],
    };

    assert!(!engine.validate_form(&form).unwrap().has_error());
    let member: Member = engine.map_form(&form).unwrap();
    assert_eq!(
        member,
        Member {
            name: "Sato".into(),
            age: 34,
            points: None,
            newsletter: false,
            interests: vec!["chess".into()],
        }
    );
}

#[test]
fn test_empty_numeric_field_keeps_zero() {
    let engine = ValidationEngine::new().unwrap();
    let form = MemberForm {
        name: "Ito".into(),
        age: String::new(),
        points: "12".into(),
        interests: Vec::new(),
    };

    let member: Member = engine.map_form(&form).unwrap();
    assert_eq!(member.age, 0);
    assert_eq!(member.points, Some(12));
}

#[test]
fn test_coercion_error_propagates() {
    let engine = ValidationEngine::new().unwrap();
    let form = MemberForm {
        name: "Ito".into(),
        age: "-1".into(),
        points: String::new(),
        interests: Vec::new(),
    };

    // IntType accepts it, u32 does not
    assert!(!engine.validate_form(&form).unwrap().has_error());
    let error = engine.map_form::<_, Member>(&form).unwrap_err();
    assert!(matches!(error, EngineError::Coercion { ref field, .. } if field == "age"));
}

// =============================================================================
// Messages
// =============================================================================

#[test]
fn test_rendered_messages() {
    let schema = FormSchema::builder("profile")
        .field(FieldBuilder::text("nick").id(1).label("Nickname").rule(RuleConfig::MaxLength(4)))
        .build()
        .unwrap();
    let snapshots = schema.extract(&FormValues::new().text("nick", "longname")).unwrap();
    let result = ValidationEngine::new().unwrap().validate(&snapshots).unwrap();

    let messages = result.messages(&MessageCatalog::default());
    assert_eq!(
        messages,
        vec![(FieldId(1), vec!["Nickname must be at most 4 characters.".to_string()])]
    );

    let json = result.to_json(&MessageCatalog::default().with("maxLength", "{0} ≤ {1}"));
    assert_eq!(json["errors"][0]["violations"][0]["message"], "Nickname ≤ 4");
}
