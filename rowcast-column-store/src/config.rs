/// How [`ColumnStore::fill`](crate::ColumnStore::fill) treats columns that were not
/// written for the row being committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillPolicy {
    /// Commit unconditionally. Columns that were not written lag behind the row counter.
    #[default]
    Lenient,
    /// Refuse the commit unless every column holds exactly one value for the pending row.
    Strict,
}

/// Run-time configuration for a [`ColumnStore`](crate::ColumnStore).
#[derive(Debug, Clone, Default)]
pub struct ColumnStoreConfig {
    pub fill_policy: FillPolicy,
}

impl ColumnStoreConfig {
    pub fn strict() -> Self {
        Self {
            fill_policy: FillPolicy::Strict,
        }
    }
}
