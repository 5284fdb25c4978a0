//! # Column Specifications
//!
//! A [`ColumnSpec`] pairs a column name with its declared [`LogicalType`]
//! and nullability. The table builder validates every ingested cell against
//! its column's spec, and the frozen table checks each store's decoded kind
//! against it at construction.

use super::LogicalType;

/// Declared name, type, and nullability of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    name: String,
    logical_type: LogicalType,
    nullable: bool,
}

impl ColumnSpec {
    /// Creates a non-nullable column spec.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable: false,
        }
    }

    /// Creates a nullable column spec.
    pub fn nullable(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable: true,
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared logical type.
    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    /// Returns true if the column admits NULL.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_accessors() {
        let spec = ColumnSpec::new("id", LogicalType::Int8);
        assert_eq!(spec.name(), "id");
        assert_eq!(spec.logical_type(), LogicalType::Int8);
        assert!(!spec.is_nullable());
    }

    #[test]
    fn nullable_constructor() {
        let spec = ColumnSpec::nullable("note", LogicalType::Text);
        assert!(spec.is_nullable());
        assert_eq!(spec.logical_type(), LogicalType::Text);
    }
}
