//! Panel type descriptors
//!
//! A `PanelType` is the immutable capability descriptor a host registers
//! once per session. Panels point back at their type through a
//! `PanelTypeId`, an index into the `PanelTypeRegistry`.

use super::panel::Panel;

/// Index of a panel type in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelTypeId(pub usize);

/// Capability flags for a panel type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelTypeFlags {
    /// Panel has no header; it can never be collapsed
    pub no_header: bool,
    /// New panels of this type start closed
    pub default_closed: bool,
    /// Draw as an inset box with margins
    pub draw_box: bool,
    /// One panel per external list item rather than one per type
    pub instanced: bool,
}

/// Move a list item to a new index after drag-and-drop (panel, new index)
pub type ReorderFn = fn(&Panel, usize);
/// Read the packed expansion bitfield stored on the panel's list item
pub type GetExpandFlagFn = fn(&Panel) -> u32;
/// Store the packed expansion bitfield on the panel's list item
pub type SetExpandFlagFn = fn(&Panel, u32);

/// Optional per-type behaviour, checked at each call site
#[derive(Clone, Copy, Default)]
pub struct PanelCallbacks {
    pub reorder: Option<ReorderFn>,
    pub get_list_data_expand_flag: Option<GetExpandFlagFn>,
    pub set_list_data_expand_flag: Option<SetExpandFlagFn>,
}

impl std::fmt::Debug for PanelCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelCallbacks")
            .field("reorder", &self.reorder.is_some())
            .field(
                "get_list_data_expand_flag",
                &self.get_list_data_expand_flag.is_some(),
            )
            .field(
                "set_list_data_expand_flag",
                &self.set_list_data_expand_flag.is_some(),
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PanelType {
    /// Stable identifier, also the name of panels created from this type
    pub idname: String,
    /// Label shown in the header
    pub label: String,
    /// Tab category this panel is grouped under (empty = none)
    pub category: String,
    /// Context string used for filtering and "collapse all" grouping (empty = none)
    pub context: String,
    pub flags: PanelTypeFlags,
    /// Parent type; makes this a sub-panel type
    pub parent: Option<PanelTypeId>,
    /// Sub-panel types, filled in by the registry
    pub children: Vec<PanelTypeId>,
    pub callbacks: PanelCallbacks,
}

impl PanelType {
    pub fn new(idname: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            idname: idname.into(),
            label: label.into(),
            category: String::new(),
            context: String::new(),
            flags: PanelTypeFlags::default(),
            parent: None,
            children: Vec::new(),
            callbacks: PanelCallbacks::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_flags(mut self, flags: PanelTypeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn no_header(mut self) -> Self {
        self.flags.no_header = true;
        self
    }

    pub fn default_closed(mut self) -> Self {
        self.flags.default_closed = true;
        self
    }

    pub fn draw_box(mut self) -> Self {
        self.flags.draw_box = true;
        self
    }

    pub fn instanced(mut self) -> Self {
        self.flags.instanced = true;
        self
    }

    pub fn with_parent(mut self, parent: PanelTypeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_callbacks(mut self, callbacks: PanelCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn is_subpanel(&self) -> bool {
        self.parent.is_some()
    }
}

/// All panel types known to a region, in registration order
#[derive(Debug, Clone, Default)]
pub struct PanelTypeRegistry {
    types: Vec<PanelType>,
}

impl PanelTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, linking it into its parent's child list
    ///
    /// Parents must be registered before their children.
    pub fn register(&mut self, mut panel_type: PanelType) -> PanelTypeId {
        let id = PanelTypeId(self.types.len());
        panel_type.children.clear();
        if let Some(parent) = panel_type.parent {
            assert!(
                parent.0 < self.types.len(),
                "parent of '{}' must be registered first",
                panel_type.idname
            );
            self.types[parent.0].children.push(id);
        }
        self.types.push(panel_type);
        id
    }

    pub fn get(&self, id: PanelTypeId) -> &PanelType {
        &self.types[id.0]
    }

    pub fn find(&self, idname: &str) -> Option<PanelTypeId> {
        self.types
            .iter()
            .position(|t| t.idname == idname)
            .map(PanelTypeId)
    }

    /// Whether any registered type uses this category
    pub fn has_category(&self, category: &str) -> bool {
        self.types.iter().any(|t| t.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PanelTypeId, &PanelType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (PanelTypeId(i), t))
    }

    /// Types with no parent, in registration order
    pub fn top_level(&self) -> impl Iterator<Item = (PanelTypeId, &PanelType)> {
        self.iter().filter(|(_, t)| t.parent.is_none())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::ops::Index<PanelTypeId> for PanelTypeRegistry {
    type Output = PanelType;

    fn index(&self, id: PanelTypeId) -> &PanelType {
        self.get(id)
    }
}
