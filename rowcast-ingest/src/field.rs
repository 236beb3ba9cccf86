use rowcast_column_store::ScalarKind;

/// A field as declared by a source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Free-text type hint, e.g. `"pt/F"`.
    pub type_hint: String,
    /// Set for compound (class-typed) fields, which are never materialized.
    pub class_name: Option<String>,
}

impl FieldDecl {
    /// A plain scalar leaf.
    pub fn leaf(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: type_hint.into(),
            class_name: None,
        }
    }

    /// A compound field holding an instance of `class_name`.
    pub fn compound(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: String::new(),
            class_name: Some(class_name.into()),
        }
    }

    pub fn is_compound(&self) -> bool {
        self.class_name.is_some()
    }
}

/// A source field whose scalar kind has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub kind: ScalarKind,
    /// Position of the field in the source table's declaration list.
    pub source_index: usize,
}
