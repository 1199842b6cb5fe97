//! Scenario replay against a live region
//!
//! Drives the same entry points a host would: layout passes through
//! `layout_region`, input and timers through `update`. The clock is
//! simulated so animations finish deterministically.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cli::{Scenario, ScenarioBuilder, Step};
use crate::commands::Cmd;
use crate::config::PanelConfig;
use crate::messages::Msg;
use crate::model::{PanelId, Point, Region, RegionContext};
use crate::update::{layout_region, panel_state, sync_instanced, update};

/// One line of the printed layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRow {
    pub name: String,
    pub depth: usize,
    pub sort_order: i32,
    pub ofs: (i32, i32),
    pub size: (i32, i32),
    pub closed: bool,
    pub pinned: bool,
    pub active: bool,
    pub state: Option<String>,
}

pub struct Replay {
    pub region: Region,
    pub ctx: RegionContext,
    pub builder: ScenarioBuilder,
    /// Identifiers of the instanced list items, in list order
    pub instances: Vec<String>,
    /// Every command returned by `update`, in order
    pub cmds: Vec<Cmd>,
}

impl Replay {
    pub fn new(scenario: &Scenario, config: PanelConfig) -> Result<Self, String> {
        Ok(Self {
            region: scenario.build_region(config)?,
            ctx: RegionContext::new(Instant::now(), Point::default()),
            builder: scenario.builder(),
            instances: Vec::new(),
            cmds: Vec::new(),
        })
    }

    /// Run a layout pass, rebuilding instanced panels if the list changed
    pub fn layout(&mut self) -> (i32, i32) {
        sync_instanced(&mut self.region, Some(&mut self.ctx), &self.instances, |_| None);
        layout_region(&mut self.region, &mut self.ctx, &mut self.builder)
    }

    fn send(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.region, &mut self.ctx, msg) {
            self.cmds.extend(cmd.into_vec());
        }
    }

    pub fn step(&mut self, step: &Step) -> Result<(), String> {
        match step {
            Step::Layout => {
                self.layout();
            }
            Step::Tick { ms } => {
                self.ctx.now += Duration::from_millis(*ms);
                self.send(Msg::Tick);
            }
            Step::Category(idname) => self.send(Msg::SetActiveCategory(idname.clone())),
            Step::Instances(items) => self.instances = items.clone(),
            Step::Search(matches) => {
                self.region.search_filter.active = !matches.is_empty();
                self.region.search_filter.update = true;
                self.builder.search_matches = matches.clone();
            }
            Step::ContentChanged => self.send(Msg::ContentChanged),
            _ => {
                if let Some(event) = step.to_event()? {
                    self.send(Msg::Input(event));
                }
            }
        }
        Ok(())
    }

    pub fn run(&mut self, steps: &[Step]) -> Result<(), String> {
        for (i, step) in steps.iter().enumerate() {
            tracing::debug!(index = i, ?step, "replay step");
            self.step(step).map_err(|e| format!("step {}: {}", i + 1, e))?;
        }
        Ok(())
    }

    fn collect_rows(&self, id: PanelId, depth: usize, rows: &mut Vec<PanelRow>) {
        let panel = &self.region.panels[id];
        let state = panel
            .interaction
            .as_ref()
            .map(|_| format!("{:?}", panel_state(&self.region, id)));
        rows.push(PanelRow {
            name: panel.name.clone(),
            depth,
            sort_order: panel.sort_order,
            ofs: (panel.ofs_x, panel.ofs_y),
            size: (panel.size_x, panel.size_y),
            closed: panel.flags.closed,
            pinned: panel.flags.pinned,
            active: panel.runtime.active,
            state,
        });
        for &child in &panel.children {
            self.collect_rows(child, depth + 1, rows);
        }
    }

    /// Every panel, top-level panels in display order
    pub fn rows(&self) -> Vec<PanelRow> {
        let mut roots = self.region.panels.roots().to_vec();
        roots.sort_by_key(|&id| self.region.panels[id].sort_order);

        let mut rows = Vec::new();
        for id in roots {
            self.collect_rows(id, 0, &mut rows);
        }
        rows
    }

    /// Human-readable layout table
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        if let Some(category) = self.region.category_active() {
            let _ = writeln!(out, "category: {}", category);
        }
        let _ = writeln!(
            out,
            "{:<28} {:>5} {:>12} {:>10}  flags",
            "panel", "order", "offset", "size"
        );
        for row in self.rows() {
            let name = format!("{}{}", "  ".repeat(row.depth), row.name);
            let mut flags = Vec::new();
            if !row.active {
                flags.push("inactive".to_string());
            }
            if row.closed {
                flags.push("closed".to_string());
            }
            if row.pinned {
                flags.push("pinned".to_string());
            }
            if let Some(state) = &row.state {
                flags.push(state.to_lowercase());
            }
            let _ = writeln!(
                out,
                "{:<28} {:>5} {:>12} {:>10}  {}",
                name,
                row.sort_order,
                format!("{},{}", row.ofs.0, row.ofs.1),
                format!("{}x{}", row.size.0, row.size.1),
                flags.join(" ")
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_collapse_and_animate() {
        let scenario = Scenario::from_yaml(
            r#"
panel_types:
  - idname: PT_a
  - idname: PT_b
steps:
  - layout
  - press: { x: 50, y: 590 }
  - release: { x: 50, y: 590 }
  - tick: { ms: 400 }
  - layout
"#,
        )
        .unwrap();
        let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
        replay.run(&scenario.steps).unwrap();

        let rows = replay.rows();
        assert!(rows[0].closed);
        assert_eq!(rows[0].state, None);
        // B moved up under A's header
        assert_eq!(rows[1].ofs.1 + rows[1].size.1 + 20, -20);
        assert!(replay.cmds.contains(&Cmd::Redraw));
        assert!(replay.format_table().contains("closed"));
    }

    #[test]
    fn test_replay_instances() {
        let scenario = Scenario::from_yaml(
            r#"
panel_types:
  - idname: MOD_PT_a
    instanced: true
  - idname: MOD_PT_b
    instanced: true
steps:
  - instances: [MOD_PT_a, MOD_PT_b, MOD_PT_a]
  - layout
"#,
        )
        .unwrap();
        let mut replay = Replay::new(&scenario, PanelConfig::default()).unwrap();
        replay.run(&scenario.steps).unwrap();

        let names: Vec<String> = replay.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["MOD_PT_a", "MOD_PT_b", "MOD_PT_a"]);
    }
}
