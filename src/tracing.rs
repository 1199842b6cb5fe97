//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging panel
//! layout and interaction state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=layout=debug` - layout diffs only
//! - `RUST_LOG=panelstack::update::interaction=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/panelstack/logs/panelstack.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::Region;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). The file layer always
/// logs at debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::log_prefix());
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A host may have installed its own subscriber already
    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        tracing::debug!("Keeping existing subscriber: {}", e);
    }
}

/// Lightweight snapshot of panel geometry for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub panels: Vec<PanelInfo>,
    pub handler_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelInfo {
    pub name: String,
    pub ofs: (i32, i32),
    pub size: (i32, i32),
    pub closed: bool,
    pub sort_order: i32,
}

impl LayoutSnapshot {
    pub fn from_region(region: &Region) -> Self {
        Self {
            panels: region
                .panels
                .all()
                .into_iter()
                .map(|id| {
                    let p = &region.panels[id];
                    PanelInfo {
                        name: p.name.clone(),
                        ofs: (p.ofs_x, p.ofs_y),
                        size: (p.size_x, p.size_y),
                        closed: p.flags.closed,
                        sort_order: p.sort_order,
                    }
                })
                .collect(),
            handler_count: region.handlers.len(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &LayoutSnapshot) -> Option<String> {
        if self.panels.len() != other.panels.len() {
            return Some(format!(
                "panel count: {} → {}",
                self.panels.len(),
                other.panels.len()
            ));
        }

        let mut changes = Vec::new();
        for (before, after) in self.panels.iter().zip(&other.panels) {
            if before.ofs != after.ofs {
                changes.push(format!(
                    "{}: ofs ({},{}) → ({},{})",
                    after.name, before.ofs.0, before.ofs.1, after.ofs.0, after.ofs.1
                ));
            }
            if before.size != after.size {
                changes.push(format!(
                    "{}: size {}x{} → {}x{}",
                    after.name, before.size.0, before.size.1, after.size.0, after.size.1
                ));
            }
            if before.closed != after.closed {
                let status = if after.closed { "closed" } else { "opened" };
                changes.push(format!("{}: {}", after.name, status));
            }
            if before.sort_order != after.sort_order {
                changes.push(format!(
                    "{}: order {} → {}",
                    after.name, before.sort_order, after.sort_order
                ));
            }
        }
        if self.handler_count != other.handler_count {
            changes.push(format!(
                "handlers: {} → {}",
                self.handler_count, other.handler_count
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
