//! Attribute values stored per node.

use crate::error::{PandoraError, PandoraResult};
use serde::{Deserialize, Serialize};

/// One attribute value. Persisted as tagged JSON in `attributes.value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    Text(String),
    TextList(Vec<String>),
    Int(i64),
    Float(f64),
    FloatList(Vec<f64>),
}

impl AttrValue {
    /// Short kind label used in decode errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::TextList(_) => "text_list",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::FloatList(_) => "float_list",
        }
    }

    /// # Errors
    /// - `InvalidInput` for NaN or infinite floats, which JSON cannot hold.
    pub(crate) fn encode(&self) -> PandoraResult<String> {
        let finite = match self {
            Self::Float(value) => value.is_finite(),
            Self::FloatList(values) => values.iter().all(|value| value.is_finite()),
            _ => true,
        };
        if !finite {
            return Err(PandoraError::InvalidInput(format!(
                "{} attribute must only hold finite numbers",
                self.kind_name()
            )));
        }
        serde_json::to_string(self)
            .map_err(|err| PandoraError::InvalidData(format!("cannot encode attribute: {err}")))
    }

    pub(crate) fn decode(raw: &str) -> PandoraResult<Self> {
        serde_json::from_str(raw).map_err(|err| {
            PandoraError::InvalidData(format!("cannot decode attribute value `{raw}`: {err}"))
        })
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(value: Vec<f64>) -> Self {
        Self::FloatList(value)
    }
}

impl From<&[f64]> for AttrValue {
    fn from(value: &[f64]) -> Self {
        Self::FloatList(value.to_vec())
    }
}
