use criterion::{Criterion, criterion_group, criterion_main};
use formwork::prelude::*;
use formwork::schedule;
use std::hint::black_box;

entity! {
    pub struct Contact {
        pub name: String,
        pub age: u32,
        pub weight: f64,
        pub tags: Vec<String>,
    }
}

fn contact_schema() -> FormSchema {
    FormSchema::builder("contact")
        .field(
            FieldBuilder::text("name")
                .id(1)
                .rule(RuleConfig::required())
                .rule(RuleConfig::MaxLength(32)),
        )
        .field(
            FieldBuilder::text("age")
                .id(2)
                .rule(RuleConfig::IntType)
                .rule(RuleConfig::MinValue(0))
                .rule(RuleConfig::MaxValue(150)),
        )
        .field(FieldBuilder::text("weight").id(3).rule(RuleConfig::FloatType))
        .field(
            FieldBuilder::text("email")
                .id(4)
                .validate_after(1)
                .rule(RuleConfig::Email),
        )
        .field(
            FieldBuilder::checkbox("tags")
                .id(5)
                .rule(RuleSpec::required_if_not_empty(FieldId(4))),
        )
        .build()
        .unwrap()
}

fn contact_values(name: &str) -> FormValues {
    FormValues::new()
        .text("name", name)
        .text("age", "42")
        .text("weight", "61.5")
        .text("email", "someone@example.com")
        .list("tags", ["work", "family"])
}

fn chain_schema(len: u32) -> FormSchema {
    (1..=len)
        .fold(FormSchema::builder("chain"), |builder, id| {
            let field = FieldBuilder::text(format!("f{}", id)).id(id);
            let field = if id > 1 { field.validate_after(id - 1) } else { field };
            builder.field(field.rule(RuleConfig::required()))
        })
        .build()
        .unwrap()
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");

    let flat = contact_schema().extract(&contact_values("Kim")).unwrap();
    group.bench_function("contact_form", |b| b.iter(|| schedule(black_box(&flat)).len()));

    let chain = chain_schema(200).extract(&FormValues::new()).unwrap();
    group.bench_function("chain_200", |b| b.iter(|| schedule(black_box(&chain)).len()));

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let schema = contact_schema();
    let valid = schema.extract(&contact_values("Kim")).unwrap();
    let invalid = schema.extract(&contact_values("")).unwrap();

    for policy in [StopPolicy::ContinueAll, StopPolicy::StopAllIfAny, StopPolicy::StopAndResumeNext] {
        let engine = ValidationEngine::builder()
            .config(EngineConfig::default().with_stop_policy(policy))
            .build()
            .unwrap();

        group.bench_function(format!("valid_{}", policy), |b| {
            b.iter(|| engine.validate(black_box(&valid)).unwrap())
        });
        group.bench_function(format!("invalid_{}", policy), |b| {
            b.iter(|| engine.validate(black_box(&invalid)).unwrap())
        });
    }

    group.finish();
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");
    let engine = ValidationEngine::builder()
        .config(EngineConfig::default().with_character_encoding("Shift_JIS"))
        .build()
        .unwrap();

    let cases = [
        ("length", RuleConfig::Length(5), "あいうえお"),
        ("katakana", RuleConfig::Katakana, "カタカナー"),
        ("singlebyte_sjis", RuleConfig::Singlebyte, "abcdefghij"),
        ("multibyte_sjis", RuleConfig::Multibyte, "全角文字です"),
        ("date_pattern", RuleConfig::DatePattern { pattern: Some("%Y-%m-%d".into()) }, "2024-02-29"),
    ];

    for (name, rule, value) in cases {
        let schema = FormSchema::builder(name)
            .field(FieldBuilder::text("value").id(1).rule(rule))
            .build()
            .unwrap();
        let snapshots = schema.extract(&FormValues::new().text("value", value)).unwrap();
        group.bench_function(name, |b| b.iter(|| engine.validate(black_box(&snapshots)).unwrap()));
    }

    group.finish();
}

fn bench_map_to_entity(c: &mut Criterion) {
    let snapshots = contact_schema().extract(&contact_values("Kim")).unwrap();

    c.bench_function("map_to_entity", |b| {
        b.iter(|| map_to_entity::<Contact>(black_box(&snapshots)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_schedule,
    bench_validate,
    bench_rules,
    bench_map_to_entity
);
criterion_main!(benches);
