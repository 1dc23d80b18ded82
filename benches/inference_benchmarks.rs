//! Benchmarks for the fuzzy diagnosis pipeline
//!
//! Measures end-to-end diagnosis cost as the rule base grows, and the
//! isolated cost of aggregation at different universe resolutions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use herddx::{
    DefuzzificationMethod, EngineConfig, FuzzyEngine, FuzzySet, MembershipFunction, Parameter,
    ParameterRole, Registry, Rule, RuleTerm,
};
use indexmap::IndexMap;

fn build_registry(num_inputs: usize) -> Registry {
    let mut registry = Registry::new();
    for i in 0..num_inputs {
        let name = format!("input_{i}");
        registry.add_parameter(Parameter::new(&name, "", 0.0, 100.0, ParameterRole::Input));
        for (set, center) in [("low", 20.0), ("mid", 50.0), ("high", 80.0)] {
            registry
                .add_fuzzy_set(FuzzySet::new(
                    set,
                    &name,
                    MembershipFunction::Triangular {
                        a: center - 25.0,
                        b: center,
                        c: center + 25.0,
                    },
                ))
                .expect("valid set");
        }
    }
    registry.add_parameter(Parameter::new("risk", "%", 0.0, 100.0, ParameterRole::Output));
    for (set, center) in [("low", 20.0), ("mid", 50.0), ("high", 80.0)] {
        registry
            .add_fuzzy_set(FuzzySet::new(
                set,
                "risk",
                MembershipFunction::Triangular {
                    a: center - 20.0,
                    b: center,
                    c: center + 20.0,
                },
            ))
            .expect("valid set");
    }
    registry
}

fn build_rules(num_rules: usize, num_inputs: usize) -> Vec<Rule> {
    let sets = ["low", "mid", "high"];
    (0..num_rules)
        .map(|i| {
            let input = format!("input_{}", i % num_inputs);
            Rule::new(
                format!("rule_{i}"),
                vec![RuleTerm::new(&input, sets[i % 3])],
                vec![RuleTerm::new("risk", sets[(i + 1) % 3])],
            )
            .with_weight(1.0 - (i % 10) as f64 * 0.05)
        })
        .collect()
}

fn build_inputs(num_inputs: usize) -> IndexMap<String, f64> {
    (0..num_inputs)
        .map(|i| (format!("input_{i}"), 30.0 + (i % 50) as f64))
        .collect()
}

fn bench_diagnose_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnose");
    for num_rules in [10, 100, 1000] {
        let num_inputs = 8;
        let registry = build_registry(num_inputs);
        let rules = build_rules(num_rules, num_inputs);
        let inputs = build_inputs(num_inputs);
        let engine = FuzzyEngine::new();

        group.bench_with_input(
            BenchmarkId::from_parameter(num_rules),
            &num_rules,
            |b, _| {
                b.iter(|| {
                    engine
                        .diagnose(&inputs, &registry, &rules, DefuzzificationMethod::Centroid)
                        .expect("diagnosis succeeds")
                })
            },
        );
    }
    group.finish();
}

fn bench_universe_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let num_inputs = 4;
    let registry = build_registry(num_inputs);
    let rules = build_rules(50, num_inputs);
    let inputs = build_inputs(num_inputs);

    for resolution in [101usize, 501, 1001] {
        let engine =
            FuzzyEngine::with_config(EngineConfig::default().with_resolution(resolution));
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, _| {
                b.iter(|| {
                    engine
                        .diagnose(&inputs, &registry, &rules, DefuzzificationMethod::Centroid)
                        .expect("diagnosis succeeds")
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_diagnose_scaling, bench_universe_resolution);
criterion_main!(benches);
