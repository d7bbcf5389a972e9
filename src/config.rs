use crate::core::SelectLevel;

/// Schema-wide settings shared by every field of a row type
///
/// Built once when the schema is declared; fields read it through their
/// owning [`RowFields`](crate::schema::RowFields).
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    /// First segment of auto-generated local text keys
    pub local_text_root: String,

    /// Select level given to newly declared fields
    pub default_select_level: SelectLevel,

    /// Whether rows record which fields were explicitly assigned
    pub track_assignments: bool,

    /// Skip JSON properties that match no field instead of failing
    pub ignore_unknown_json_fields: bool,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self {
            local_text_root: "Db".to_string(),
            default_select_level: SelectLevel::Default,
            track_assignments: true,
            ignore_unknown_json_fields: false,
        }
    }

    /// Set the local text key root
    pub fn local_text_root(mut self, root: &str) -> Self {
        self.local_text_root = root.to_string();
        self
    }

    /// Set the default select level
    pub fn default_select_level(mut self, level: SelectLevel) -> Self {
        self.default_select_level = level;
        self
    }

    /// Enable or disable assignment tracking
    pub fn track_assignments(mut self, enabled: bool) -> Self {
        self.track_assignments = enabled;
        self
    }

    /// Tolerate unknown properties in JSON input
    pub fn ignore_unknown_json_fields(mut self, ignore: bool) -> Self {
        self.ignore_unknown_json_fields = ignore;
        self
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self::new()
    }
}
