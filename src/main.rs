use anyhow::{Context, Result};
use clap::Parser;

use panelstack::cli::{CliArgs, Scenario};
use panelstack::persist::{restore_state, save_state};
use panelstack::replay::Replay;
use panelstack::theme::{load_theme, Theme};
use panelstack::view::{draw_category_tabs, draw_panels, DrawList};

fn main() -> Result<()> {
    panelstack::tracing::init();

    let args = CliArgs::parse();
    let config = args.load_config();

    let scenario = Scenario::load(&args.scenario).map_err(anyhow::Error::msg)?;
    let mut replay = Replay::new(&scenario, config.clone()).map_err(anyhow::Error::msg)?;

    if let Some(path) = &args.restore_state {
        restore_state(&mut replay.region, path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("restoring {}", path.display()))?;
    }

    replay
        .run(&scenario.steps)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("replaying {}", args.scenario.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&replay.rows())?);
    } else {
        print!("{}", replay.format_table());
    }

    if args.draw {
        let theme = load_theme(&config.theme).unwrap_or_else(|e| {
            tracing::warn!("Failed to load theme '{}': {}", config.theme, e);
            Theme::default()
        });
        let mut list = DrawList::new(7);
        draw_category_tabs(&mut replay.region, &theme, &mut list);
        draw_panels(&replay.region, &theme, &mut list);
        for item in &list.items {
            println!("{:?}", item);
        }
    }

    if let Some(path) = &args.save_state {
        save_state(&replay.region, path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("saving {}", path.display()))?;
    }

    Ok(())
}
