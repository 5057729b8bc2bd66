use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Comparison applied by a filter. Serialized with the names the execution
/// engine expects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "EQUAL")]
    Eq,
    #[serde(rename = "NOT_EQUAL")]
    Ne,
    #[serde(rename = "LESS_THAN")]
    Lt,
    #[serde(rename = "LESS_THAN_EQUAL")]
    Le,
    #[serde(rename = "GREATER_THAN")]
    Gt,
    #[serde(rename = "GREATER_THAN_EQUAL")]
    Ge,
    #[serde(rename = "IS_NULL")]
    IsNull,
    #[serde(rename = "IS_NOT_NULL")]
    IsNotNull,
    #[serde(rename = "GLOB")]
    Glob,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Eq => write!(f, "="),
            FilterOp::Ne => write!(f, "!="),
            FilterOp::Lt => write!(f, "<"),
            FilterOp::Le => write!(f, "<="),
            FilterOp::Gt => write!(f, ">"),
            FilterOp::Ge => write!(f, ">="),
            FilterOp::IsNull => write!(f, "IS NULL"),
            FilterOp::IsNotNull => write!(f, "IS NOT NULL"),
            FilterOp::Glob => write!(f, "GLOB"),
        }
    }
}

impl fmt::Debug for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterOp({})", self)
    }
}

impl FilterOp {
    /// Operators that take no right-hand side.
    pub fn is_unary(self) -> bool {
        matches!(self, FilterOp::IsNull | FilterOp::IsNotNull)
    }
}

/// Right-hand side of a binary filter.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Double(NotNan<f64>),
    String(String),
}

impl FilterValue {
    /// `None` for NaN.
    pub fn double(value: f64) -> Option<Self> {
        NotNan::new(value).ok().map(FilterValue::Double)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self { FilterValue::Int(value) }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self { FilterValue::Int(value as i64) }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self { FilterValue::String(value.to_string()) }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self { FilterValue::String(value) }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Int(i) => write!(f, "{}", i),
            FilterValue::Double(n) => write!(f, "{}", n.into_inner()),
            FilterValue::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl fmt::Debug for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Int(_) => write!(f, "Int({})", self),
            FilterValue::Double(_) => write!(f, "Double({})", self),
            FilterValue::String(_) => write!(f, "String({})", self),
        }
    }
}

/// One row predicate. A node's filters are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Upstream name of the filtered column.
    pub column: String,
    pub op: FilterOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl Filter {
    pub fn new(column: &str, op: FilterOp, value: Option<FilterValue>) -> Self {
        Self { column: column.to_string(), op, value }
    }

    pub fn compare(column: &str, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self::new(column, op, Some(value.into()))
    }

    pub fn is_null(column: &str) -> Self {
        Self::new(column, FilterOp::IsNull, None)
    }

    pub fn is_not_null(column: &str) -> Self {
        Self::new(column, FilterOp::IsNotNull, None)
    }

    pub fn glob(column: &str, pattern: &str) -> Self {
        Self::new(column, FilterOp::Glob, Some(pattern.into()))
    }

    /// A filter is complete when its operator has the operand it needs:
    /// none for IS [NOT] NULL, a string for GLOB, any value otherwise.
    pub fn is_complete(&self) -> bool {
        match (self.op, &self.value) {
            (op, _) if op.is_unary() => true,
            (FilterOp::Glob, Some(FilterValue::String(_))) => true,
            (FilterOp::Glob, _) => false,
            (_, value) => value.is_some(),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) if !self.op.is_unary() => write!(f, "{} {} {}", self.column, self.op, value),
            _ => write!(f, "{} {}", self.column, self.op),
        }
    }
}
