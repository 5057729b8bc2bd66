use serde::{Deserialize, Deserializer, Serialize};

/// Coarse SQL type of a column, as the catalog describes it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// Integer number
    Int,
    /// Floating-point number
    Double,
    /// Text
    String,
    /// Boolean
    Bool,
    /// Raw bytes
    Bytes,
    /// Point in time (nanoseconds)
    Timestamp,
    /// Time span (nanoseconds)
    Duration,
    /// Row identifier
    Id,
    /// Type not declared or not recognised
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ColumnType::from_sql_name(&name))
    }
}

impl ColumnType {
    /// Parse a catalog type name. Unrecognised names map to `Unknown`.
    pub fn from_sql_name(name: &str) -> ColumnType {
        match name.trim().to_ascii_uppercase().as_str() {
            "INT" | "LONG" | "UINT" => ColumnType::Int,
            "DOUBLE" | "FLOAT" => ColumnType::Double,
            "STRING" => ColumnType::String,
            "BOOL" | "BOOLEAN" => ColumnType::Bool,
            "BYTES" => ColumnType::Bytes,
            "TIMESTAMP" => ColumnType::Timestamp,
            "DURATION" => ColumnType::Duration,
            "ID" | "JOINID" => ColumnType::Id,
            _ => ColumnType::Unknown,
        }
    }

    /// Whether values of this type can be summed or averaged.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Double | ColumnType::Timestamp | ColumnType::Duration)
    }

    /// Upper-case name used when printing schemas.
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::Double => "DOUBLE",
            ColumnType::String => "STRING",
            ColumnType::Bool => "BOOL",
            ColumnType::Bytes => "BYTES",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Duration => "DURATION",
            ColumnType::Id => "ID",
            ColumnType::Unknown => "UNKNOWN",
        }
    }
}
