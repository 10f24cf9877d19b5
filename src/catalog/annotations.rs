//! Provider-specific facts attached to tables, columns, keys, indexes and
//! migration operations.

use crate::constants::CLUSTERED_ANNOTATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name/value bag, kept sorted by name so that equality and serialized
/// output do not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(BTreeMap<String, Value>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Some(true)`/`Some(false)` when clustering was declared explicitly.
    pub fn clustered(&self) -> Option<bool> {
        self.get(CLUSTERED_ANNOTATION).and_then(Value::as_bool)
    }

    pub fn set_clustered(&mut self, clustered: bool) {
        self.set(CLUSTERED_ANNOTATION, clustered);
    }
}

/// Anything that carries an annotation bag.
pub trait Annotated {
    fn annotations_mut(&mut self) -> &mut Annotations;

    fn with_annotation(mut self, name: &str, value: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.annotations_mut().set(name, value);
        self
    }
}

macro_rules! impl_annotated {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Annotated for $ty {
                fn annotations_mut(&mut self) -> &mut Annotations {
                    &mut self.annotations
                }
            }
        )*
    };
}

impl_annotated!(
    super::table::Column,
    super::table::Table,
    super::constraint::PrimaryKey,
    super::constraint::UniqueConstraint,
    super::constraint::ForeignKey,
    super::index::Index,
    super::sequence::Sequence,
);
