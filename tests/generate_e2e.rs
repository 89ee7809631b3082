//! End-to-end tests for the `generate`, `verify` and `inspect` commands.
//!
//! Fixtures under `tests/fixtures/` describe a Customer/Order graph: three
//! customers with String identifiers, five orders, and a PLACED relationship
//! from Customer to Order.

use chrono::NaiveDate;
use datagen_cypher::{parse_script, ScriptUnit};
use graph_datagen::commands::{generate, inspect, verify};
use graph_datagen::{GenerateArgs, InspectArgs, VerifyArgs};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const REQUIRED_FIXTURES: [&str; 4] = [
    "schema_analysis.json",
    "generation_plan.json",
    "value_lists.json",
    "generation_rules.json",
];

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy the fixtures into `dir`, optionally including the cardinality rules.
fn stage_fixtures(dir: &Path, with_cardinality: bool) {
    let mut names = REQUIRED_FIXTURES.to_vec();
    if with_cardinality {
        names.push("cardinality_rules.json");
    }
    for name in names {
        fs::copy(fixtures_dir().join(name), dir.join(name)).unwrap();
    }
}

fn pinned_args(config_dir: &Path, output: PathBuf) -> GenerateArgs {
    GenerateArgs {
        config_dir: config_dir.to_path_buf(),
        output,
        seed: Some(42),
        now: NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0),
        ..Default::default()
    }
}

fn read_units(path: &Path) -> HashMap<String, ScriptUnit> {
    let text = fs::read_to_string(path).unwrap();
    parse_script(&text)
        .unwrap()
        .into_iter()
        .map(|unit| (unit.parameter.clone(), unit))
        .collect()
}

fn column<'a>(unit: &'a ScriptUnit, key: &str) -> Vec<&'a Value> {
    unit.payload
        .as_array()
        .unwrap()
        .iter()
        .map(|row| &row[key])
        .collect()
}

#[test]
fn test_customer_order_scenario_without_cardinality_rules() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), false);
    let output = dir.path().join("generated_data.cypher");

    let report = generate::run(&pinned_args(dir.path(), output.clone())).unwrap();
    assert_eq!(report.summary.nodes_planned, 8);
    assert_eq!(report.summary.nodes_generated, 8);
    assert_eq!(report.summary.relationships_generated, 3);
    assert_eq!(report.stats.node_units, 2);
    assert_eq!(report.stats.relationship_units, 1);

    let units = read_units(&output);
    assert_eq!(units.len(), 3);

    let customers = &units["nodes_Customer"];
    let mut customer_ids: Vec<&str> = column(customers, "customerID")
        .into_iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    customer_ids.sort_unstable();
    assert_eq!(
        customer_ids,
        vec!["Customer_0001", "Customer_0002", "Customer_0003"]
    );

    let orders = &units["nodes_Order"];
    assert_eq!(orders.rows(), 5);
    let order_ids: HashSet<&str> = column(orders, "orderID")
        .into_iter()
        .map(|v| v.as_str().unwrap())
        .collect();

    // min(3, 5) relationships, every customer a source exactly once
    let placed = &units["rels_Customer_PLACED_Order"];
    assert_eq!(placed.rows(), 3);
    let sources: HashSet<&str> = column(placed, "source_id")
        .into_iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(sources, customer_ids.iter().copied().collect());
    let targets: HashSet<&str> = column(placed, "target_id")
        .into_iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(targets.len(), 3);
    assert!(targets.is_subset(&order_ids));
}

#[test]
fn test_generated_values_follow_lists_and_rules() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), false);
    let output = dir.path().join("out.cypher");
    generate::run(&pinned_args(dir.path(), output.clone())).unwrap();

    let units = read_units(&output);
    let customers = &units["nodes_Customer"];
    let orders = &units["nodes_Order"];

    let names = ["Ada Lovelace", "Grace Hopper", "Edsger Dijkstra"];
    for name in column(customers, "name") {
        assert!(names.contains(&name.as_str().unwrap()));
    }
    for date in column(customers, "signupDate") {
        let date = NaiveDate::parse_from_str(date.as_str().unwrap(), "%Y-%m-%d").unwrap();
        assert!(date >= NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert!(date <= NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }
    for active in column(customers, "active") {
        assert!(active.is_boolean());
    }

    let notes = ["leave at door; ring twice", "gift wrap", "express"];
    for note in column(orders, "note") {
        assert!(notes.contains(&note.as_str().unwrap()));
    }
    for quantity in column(orders, "quantity") {
        let quantity = quantity.as_i64().unwrap();
        assert!((1..=10).contains(&quantity));
    }
    for total in column(orders, "total") {
        let total = total.as_f64().unwrap();
        assert!((5.0..=250.0).contains(&total));
    }
}

#[test]
fn test_same_seed_and_now_reproduce_identical_script() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), true);
    let first = dir.path().join("first.cypher");
    let second = dir.path().join("second.cypher");

    let a = generate::run(&pinned_args(dir.path(), first.clone())).unwrap();
    let b = generate::run(&pinned_args(dir.path(), second.clone())).unwrap();
    assert_eq!(a.summary.seed, b.summary.seed);
    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );

    let header = fs::read_to_string(&first).unwrap();
    assert!(header.starts_with("// Generated by graph-datagen on 2024-03-15T09:00:00\n"));
    assert!(header.contains("// Seed: 42\n"));
    assert!(header.contains("// Total Nodes Planned: 8\n"));
}

#[test]
fn test_explicit_cardinality_rules() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), true);
    let output = dir.path().join("out.cypher");
    generate::run(&pinned_args(dir.path(), output.clone())).unwrap();

    let units = read_units(&output);
    let placed = &units["rels_Customer_PLACED_Order"];
    let mut per_source: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in placed.payload.as_array().unwrap() {
        let source = row["source_id"].as_str().unwrap();
        let target = row["target_id"].as_str().unwrap();
        assert!(
            per_source.entry(source).or_default().insert(target),
            "duplicate pair {source} -> {target}"
        );
    }
    assert_eq!(per_source.len(), 3);
    for targets in per_source.values() {
        assert!((1..=2).contains(&targets.len()));
    }
}

#[test]
fn test_batch_size_splits_units() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), false);
    let output = dir.path().join("out.cypher");
    let args = GenerateArgs {
        batch_size: Some(2),
        ..pinned_args(dir.path(), output.clone())
    };
    let report = generate::run(&args).unwrap();

    // Customer 3 -> 2 units, Order 5 -> 3 units, PLACED 3 -> 2 units
    assert_eq!(report.stats.node_units, 5);
    assert_eq!(report.stats.relationship_units, 2);

    let verified = verify::run(&VerifyArgs { script: output }).unwrap();
    assert_eq!(verified.units, 7);
    assert_eq!(verified.rows, 11);
}

#[test]
fn test_verify_emitted_script() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), false);
    let output = dir.path().join("out.cypher");
    generate::run(&pinned_args(dir.path(), output.clone())).unwrap();

    let report = verify::run(&VerifyArgs { script: output }).unwrap();
    assert_eq!(report.units, 3);
    assert_eq!(report.rows, 3 + 5 + 3);
}

#[test]
fn test_missing_required_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    stage_fixtures(dir.path(), false);
    fs::remove_file(dir.path().join("value_lists.json")).unwrap();

    let err = generate::run(&pinned_args(dir.path(), dir.path().join("out.cypher"))).unwrap_err();
    assert!(format!("{err:#}").contains("value_lists.json"));
    assert!(!dir.path().join("out.cypher").exists());
}

#[test]
fn test_inspect_fixture_schema() {
    let args = InspectArgs {
        config_dir: fixtures_dir(),
        schema: PathBuf::from("schema_analysis.json"),
        output: None,
    };
    let report = inspect::run(&args).unwrap();
    assert!(report.contains("Node: Customer (active, customerID, name, signupDate)"));
    assert!(report.contains("  -> [PLACED] -> Order (note, orderID, quantity, total)"));
    assert!(!report.contains("Isolated labels"));
}
