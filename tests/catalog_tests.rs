//! Catalog Integration Tests
//!
//! Built-in reference data, JSON catalog files and job planning.

use std::io::Write;

use welltegra::catalog::{Catalog, CatalogError};
use welltegra::ConveyanceType;

#[test]
fn builtin_procedures_match_their_objectives() {
    let catalog = Catalog::builtin().unwrap();
    let expected = [
        ("obj1", ConveyanceType::ELine, 800.0, 0.25, 11),
        ("obj2", ConveyanceType::CoiledTubing, 2500.0, 0.35, 10),
        ("obj3", ConveyanceType::Slickline, 150.0, 0.15, 11),
    ];
    for (objective, conveyance, tool_weight, friction, steps) in expected {
        let procedure = catalog.procedure_for(objective).unwrap();
        assert_eq!(procedure.conveyance, conveyance, "{objective}");
        assert!((procedure.tool_weight - tool_weight).abs() < f64::EPSILON);
        assert!((procedure.friction_coefficient - friction).abs() < f64::EPSILON);
        assert_eq!(procedure.steps.len(), steps);
        assert!(!procedure.tfa_model.alarm_upper.is_empty());
    }
}

#[test]
fn every_problem_links_to_a_plannable_objective() {
    let catalog = Catalog::builtin().unwrap();
    for problem in &catalog.problems {
        let plan = catalog.plan_from_problem("W666", &problem.id).unwrap();
        assert!(problem.linked_objectives.contains(&plan.objective.id));
    }
}

#[test]
fn case_study_wells_have_history_but_no_survey() {
    let catalog = Catalog::builtin().unwrap();
    for id in ["M-21", "S-15", "F-11"] {
        let well = catalog.well(id).unwrap();
        assert_eq!(well.history.len(), 2, "{id}");
        assert!(well.survey().is_empty());
        assert!(!well.is_simulation_ready());
    }
}

#[test]
fn catalog_file_roundtrip() {
    let catalog = Catalog::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();

    let loaded = Catalog::load_from_file(&path).unwrap();
    assert_eq!(loaded, catalog);
}

#[test]
fn site_catalog_with_custom_well() {
    let json = r#"{
        "wells": [{
            "id": "A-1",
            "name": "Alpha 1",
            "field": "Test Field",
            "status": "Shut-in",
            "issue": "Tight spot at 3,000ft",
            "deviation": [{"md": 0, "angle": 0}, {"md": 2000, "angle": 20}],
            "completion": {
                "equipment": [
                    {"item": "Collapsed joint", "top": 3000, "isProblem": true, "restriction": 0.5}
                ]
            }
        }],
        "objectives": [{"id": "drift", "name": "Drift run", "description": "Gauge ring drift"}],
        "procedures": {
            "drift": {
                "name": "Slickline drift",
                "conveyance": "Slickline",
                "toolWeight": 120,
                "frictionCoefficient": 0.2,
                "steps": ["RIH to 3,100ft", "POOH."],
                "tfaModel": {"pickUp": [], "slackOff": [], "alarmUpper": [], "alarmLower": []}
            }
        }
    }"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let catalog = Catalog::load_from_file(file.path()).unwrap();
    let plan = catalog.plan("A-1", "drift").unwrap();
    assert!(plan.well.is_simulation_ready());
    assert_eq!(plan.procedure.steps.len(), 2);
    assert!(catalog.problems.is_empty());
}

#[test]
fn unknown_conveyance_is_malformed() {
    let json = r#"{
        "procedures": {
            "x": {
                "name": "Bad", "conveyance": "Drill Pipe", "toolWeight": 1,
                "frictionCoefficient": 0.1, "steps": [], "tfaModel": {}
            }
        }
    }"#;
    assert!(matches!(
        Catalog::from_json_str(json),
        Err(CatalogError::Malformed(_))
    ));
}

#[test]
fn missing_catalog_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Catalog::load_from_file(&dir.path().join("nope.json")),
        Err(CatalogError::Io(_, _))
    ));
}
