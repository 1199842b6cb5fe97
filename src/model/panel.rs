//! Panel records stored in the region's panel tree

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::interaction::InteractionState;
use super::panel_type::PanelTypeId;
use super::tree::PanelId;

/// Screen edge a panel is snapped to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Snap {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

/// Persistent per-panel flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelFlags {
    pub closed: bool,
    pub pinned: bool,
    /// Selected for drawing on top (set while dragging)
    pub selected: bool,
    /// Instanced list was reordered by drag-and-drop; list needs a rebuild
    pub list_order_changed: bool,
}

/// Flags that only live for one layout pass (or one pass transition)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeFlags {
    /// Begun during the current layout pass
    pub active: bool,
    /// Was active during the previous layout pass
    pub was_active: bool,
    /// Most recently begun panel in its sibling list this pass
    pub last_added: bool,
    /// Size changed; layout should animate into place
    pub anim_align: bool,
    /// Created but not yet measured
    pub new_added: bool,
    /// Contains a property matching the region's search filter
    pub search_match: bool,
}

impl RuntimeFlags {
    /// Reset for a new layout pass, remembering whether the panel was active
    pub fn begin_pass(&mut self) {
        let was_active = self.active;
        *self = RuntimeFlags {
            was_active,
            ..RuntimeFlags::default()
        };
    }
}

/// Caller-supplied data shared by a panel and all of its sub-panels
///
/// Cloning shares the same allocation; the data is dropped once, when the
/// last panel referencing it goes away.
#[derive(Clone)]
pub struct CustomData(Rc<dyn Any>);

impl CustomData {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &CustomData) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of panels (and other holders) sharing this data
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl fmt::Debug for CustomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomData({:p})", Rc::as_ptr(&self.0))
    }
}

/// A node in the panel tree
#[derive(Debug, Clone)]
pub struct Panel {
    /// Type this panel was created from; `None` once the type is gone
    pub type_id: Option<PanelTypeId>,
    /// Identity: the type's idname
    pub name: String,
    /// Header label
    pub draw_name: String,

    /// Offset of the bottom of the content area, region-local view space
    pub ofs_x: i32,
    pub ofs_y: i32,
    /// Total size including active sub-panels, excluding the header
    pub size_x: i32,
    pub size_y: i32,
    /// Size of this panel's own content from the last layout pass
    pub block_size_x: i32,
    pub block_size_y: i32,
    /// Horizontal offset applied for category tabs during the last align
    pub region_ofs_x: i32,

    /// Display order key among siblings
    pub sort_order: i32,
    pub flags: PanelFlags,
    pub snap: Snap,
    pub runtime: RuntimeFlags,

    pub custom_data: Option<CustomData>,
    /// Present only while the panel is being dragged, resized or animated
    pub interaction: Option<InteractionState>,

    pub parent: Option<PanelId>,
    pub children: Vec<PanelId>,
}

impl Panel {
    pub fn new(type_id: PanelTypeId, name: impl Into<String>) -> Self {
        Self {
            type_id: Some(type_id),
            name: name.into(),
            draw_name: String::new(),
            ofs_x: 0,
            ofs_y: 0,
            size_x: 0,
            size_y: 0,
            block_size_x: 0,
            block_size_y: 0,
            region_ofs_x: 0,
            sort_order: 0,
            flags: PanelFlags::default(),
            snap: Snap::None,
            runtime: RuntimeFlags::default(),
            custom_data: None,
            interaction: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags.closed
    }

    pub fn is_active(&self) -> bool {
        self.runtime.active
    }

    pub fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }

    /// Whether the current interaction started as a drag-and-drop
    pub fn is_dragging(&self) -> bool {
        self.interaction
            .as_ref()
            .is_some_and(|state| state.is_drag_drop)
    }

    /// Bottom edge of the content, also the bottom edge when collapsed
    ///
    /// Closed panels keep their open size, so their offset is shifted down by
    /// it; adding it back gives where the header actually sits.
    pub fn real_ofs_y(&self) -> i32 {
        if self.flags.closed {
            self.ofs_y + self.size_y
        } else {
            self.ofs_y
        }
    }

    /// Visual top edge of the panel (top of the header, if any)
    pub fn top_edge(&self, header_height: i32) -> i32 {
        self.ofs_y + self.size_y + header_height
    }
}
