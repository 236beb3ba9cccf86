/// Order in which columns appear in the exported schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Sorted by column name, the store's iteration order.
    #[default]
    Lexicographic,
    /// The order in which columns were added to the store.
    Declaration,
}

/// Treatment of columns that hold fewer values than the store has committed rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RaggedPolicy {
    /// Pad the missing tail with nulls; the field is marked nullable.
    #[default]
    PadWithNulls,
    /// Fail the export.
    Reject,
}

/// Configuration for [`ColumnarExporter`](crate::ColumnarExporter).
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub column_order: ColumnOrder,
    pub ragged: RaggedPolicy,
    /// Export text columns as UTF-8 arrays instead of skipping them.
    pub include_text: bool,
}
