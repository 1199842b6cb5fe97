//! Transient interaction state for panels being dragged, resized or animated

use std::time::{Duration, Instant};

use super::geometry::Point;
use super::tree::PanelId;

/// Modal state of a panel; idle panels carry no `InteractionState` at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Dragging,
    DraggingResize,
    /// Declared for completeness; nothing enters it
    WaitingForUntab,
    Animating,
    Exiting,
}

impl PanelState {
    /// States in which the panel follows the pointer
    pub fn is_drag(self) -> bool {
        matches!(self, PanelState::Dragging | PanelState::DraggingResize)
    }

    /// States that run a repeating timer
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            PanelState::Dragging | PanelState::DraggingResize | PanelState::Animating
        )
    }
}

/// Repeating timer owned by an interaction; polled by `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub interval: Duration,
    pub next_fire: Instant,
}

impl TimerHandle {
    pub fn start(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_fire: now + interval,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_fire
    }

    /// Schedule the next fire one interval after `now`
    pub fn rearm(&mut self, now: Instant) {
        self.next_fire = now + self.interval;
    }
}

#[derive(Debug, Clone)]
pub struct InteractionState {
    pub state: PanelState,
    pub timer: Option<TimerHandle>,
    pub start_time: Instant,

    /// Window-space pointer position when the state was entered
    pub start_pointer: Point,
    pub start_ofs: (i32, i32),
    pub start_size: (i32, i32),
    /// View scroll origin when the state was entered
    pub start_cur_xmin: f32,
    pub start_cur_ymin: f32,

    /// Set while dragging and kept through the animation that follows the drop
    pub is_drag_drop: bool,
}

impl InteractionState {
    pub fn new(state: PanelState, now: Instant) -> Self {
        Self {
            state,
            timer: None,
            start_time: now,
            start_pointer: Point::default(),
            start_ofs: (0, 0),
            start_size: (0, 0),
            start_cur_xmin: 0.0,
            start_cur_ymin: 0.0,
            is_drag_drop: false,
        }
    }
}

/// Result of offering an event to a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResult {
    /// Let later handlers and the region router see the event
    Continue,
    /// The event was consumed
    Break,
}

/// Entry in a region's modal handler stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModalHandler {
    /// Drives a panel's drag, resize or animation
    Panel(PanelId),
    /// Sweeping over headers with the button held sets them all to one state
    DragCollapse {
        /// Panels swept over get closed when the first one was open
        was_first_open: bool,
        /// Pointer position where the sweep started (window space)
        xy_init: Point,
    },
}

impl ModalHandler {
    pub fn panel(&self) -> Option<PanelId> {
        match self {
            ModalHandler::Panel(id) => Some(*id),
            ModalHandler::DragCollapse { .. } => None,
        }
    }
}
