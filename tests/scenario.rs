//! Scenario replay and state persistence tests

use panelstack::config::PanelConfig;
use panelstack::cli::Scenario;
use panelstack::persist::{restore_state, save_state, RegionState};
use panelstack::replay::Replay;
use panelstack::theme::Theme;
use panelstack::view::{draw_panels, DrawList, Icon};

const DRAG_SCENARIO: &str = r#"
panel_types:
  - idname: PT_a
    label: Alpha
  - idname: PT_b
    label: Beta
steps:
  - layout
  # Grab Alpha by its drag handle and drop it below Beta
  - press: { x: 290, y: 590 }
  - move: { x: 290, y: 300 }
  - release: { x: 290, y: 300 }
  - tick: { ms: 1000 }
  - layout
"#;

fn names(replay: &Replay) -> Vec<String> {
    replay.rows().into_iter().map(|row| row.name).collect()
}

fn replay_file(contents: &str) -> (tempfile::TempDir, Scenario) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.yaml");
    std::fs::write(&path, contents).unwrap();
    let scenario = Scenario::load(&path).unwrap();
    (dir, scenario)
}

// ========================================================================
// Replay
// ========================================================================

#[test]
fn test_drag_scenario_reorders_panels() {
    let (_dir, scenario) = replay_file(DRAG_SCENARIO);
    let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
    replay.run(&scenario.steps).unwrap();

    assert_eq!(names(&replay), vec!["PT_b", "PT_a"]);
    let rows = replay.rows();
    assert_eq!(rows[0].ofs.1, -120);
    assert_eq!(rows[1].ofs.1, -240);
    assert!(rows.iter().all(|row| row.state.is_none()));

    let json = serde_json::to_string(&rows).unwrap();
    assert!(json.contains("\"name\":\"PT_b\""));
}

#[test]
fn test_shipped_scenarios_replay() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        let scenario = Scenario::load(&path).unwrap();
        let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
        replay
            .run(&scenario.steps)
            .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        assert!(!replay.rows().is_empty(), "{}", path.display());
    }
}

#[test]
fn test_bad_step_reports_its_index() {
    let scenario = Scenario::from_yaml(
        r#"
panel_types:
  - idname: PT_a
steps:
  - layout
  - key: { key: hyper }
"#,
    )
    .unwrap();
    let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
    let err = replay.run(&scenario.steps).unwrap_err();
    assert!(err.starts_with("step 2"), "{}", err);
}

#[test]
fn test_missing_scenario_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = Scenario::load(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(err.contains("Failed to read scenario"));
}

// ========================================================================
// Persistence
// ========================================================================

#[test]
fn test_saved_order_survives_a_new_session() {
    let (dir, scenario) = replay_file(DRAG_SCENARIO);
    let state_path = dir.path().join("state.yaml");

    let mut first = Replay::new(&scenario, PanelConfig::default()).unwrap();
    first.run(&scenario.steps).unwrap();
    save_state(&first.region, &state_path).unwrap();

    let mut second = Replay::new(&scenario, PanelConfig::default()).unwrap();
    restore_state(&mut second.region, &state_path).unwrap();
    second.layout();

    assert_eq!(names(&second), names(&first));
    assert_eq!(second.rows(), first.rows());
}

#[test]
fn test_state_yaml_and_json_agree() {
    let (_dir, scenario) = replay_file(DRAG_SCENARIO);
    let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
    replay.run(&scenario.steps).unwrap();

    let state = RegionState::capture(&replay.region);
    let from_yaml = RegionState::from_yaml(&state.to_yaml().unwrap()).unwrap();
    let from_json = RegionState::from_json(&state.to_json().unwrap()).unwrap();
    assert_eq!(from_yaml, state);
    assert_eq!(from_json, state);
}

// ========================================================================
// Drawing
// ========================================================================

#[test]
fn test_draw_replayed_layout() {
    let (_dir, scenario) = replay_file(DRAG_SCENARIO);
    let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
    replay.run(&scenario.steps).unwrap();

    let mut list = DrawList::new(7);
    draw_panels(&replay.region, &Theme::default(), &mut list);

    let titles: Vec<&str> = list.texts().map(|(text, _)| text).collect();
    assert!(titles.contains(&"Alpha"));
    assert!(titles.contains(&"Beta"));
    assert_eq!(list.icons().filter(|&icon| icon == Icon::DisclosureDown).count(), 2);
}
