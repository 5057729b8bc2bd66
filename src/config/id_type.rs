use serde::{Deserialize, Serialize};

/// Strategy used for allocating structured-query node identifiers.
///
/// - `Int`: sequential identifiers (`<prefix>1`, `<prefix>2`, ...). Deterministic.
/// - `Uuid`: random v4 UUID strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum IdType {
    /// Sequential integer identifiers (default).
    #[default]
    Int,
    /// UUID string identifiers.
    Uuid,
}
