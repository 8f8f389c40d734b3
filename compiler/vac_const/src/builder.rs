//! Builder phase for container values.
//!
//! The constant evaluator creates a container, fills its children one at a
//! time as it evaluates them, then freezes it. Each key or index may be
//! assigned once; a second assignment is an upstream bug and is rejected.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use vac_ir::{Idx, Name};

use crate::value::{AggregateValue, ArrayValue};
use crate::ConstValue;

/// Misuse of a builder. Always an internal-consistency error in the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstError {
    FieldAlreadySet { field: Name },
    IndexOutOfBounds { index: usize, length: usize },
    ElementAlreadySet { index: usize },
    /// `finish()` on an array with unpopulated slots.
    IncompleteArray { missing: Vec<usize> },
}

impl fmt::Display for ConstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstError::FieldAlreadySet { field } => {
                write!(f, "field {field:?} of constant aggregate assigned twice")
            }
            ConstError::IndexOutOfBounds { index, length } => write!(
                f,
                "constant array index {index} out of bounds for length {length}"
            ),
            ConstError::ElementAlreadySet { index } => {
                write!(f, "constant array element {index} assigned twice")
            }
            ConstError::IncompleteArray { missing } => write!(
                f,
                "constant array frozen with {} unpopulated element(s), first at {}",
                missing.len(),
                missing.first().copied().unwrap_or_default()
            ),
        }
    }
}

impl std::error::Error for ConstError {}

/// Incrementally populated constructor call.
#[derive(Debug)]
pub struct AggregateBuilder {
    constructed_type: Idx,
    fields: Vec<(Name, ConstValue)>,
    index: FxHashMap<Name, usize>,
}

impl AggregateBuilder {
    pub fn new(constructed_type: Idx) -> Self {
        Self {
            constructed_type,
            fields: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Widen the type the value is used as (boxing into a supertype).
    pub fn set_constructed_type(&mut self, ty: Idx) {
        self.constructed_type = ty;
    }

    pub fn set_field(&mut self, field: Name, value: ConstValue) -> Result<(), ConstError> {
        if self.index.contains_key(&field) {
            return Err(ConstError::FieldAlreadySet { field });
        }
        self.index.insert(field, self.fields.len());
        self.fields.push((field, value));
        Ok(())
    }

    /// Chaining form of [`set_field`](Self::set_field).
    pub fn with_field(mut self, field: Name, value: ConstValue) -> Result<Self, ConstError> {
        self.set_field(field, value)?;
        Ok(self)
    }

    pub fn field(&self, field: Name) -> Option<&ConstValue> {
        self.index.get(&field).map(|&i| &self.fields[i].1)
    }

    /// Freeze into an immutable value.
    pub fn finish(self) -> ConstValue {
        ConstValue::Aggregate(Arc::new(AggregateValue {
            constructed_type: self.constructed_type,
            fields: self.fields,
            index: self.index,
        }))
    }
}

/// Incrementally populated fixed-length array.
#[derive(Debug)]
pub struct ArrayBuilder {
    element_type: Idx,
    slots: Vec<Option<ConstValue>>,
}

impl ArrayBuilder {
    pub fn new(element_type: Idx, length: usize) -> Self {
        Self {
            element_type,
            slots: vec![None; length],
        }
    }

    pub fn declared_length(&self) -> usize {
        self.slots.len()
    }

    pub fn set_element(&mut self, index: usize, value: ConstValue) -> Result<(), ConstError> {
        let length = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ConstError::IndexOutOfBounds { index, length })?;
        if slot.is_some() {
            return Err(ConstError::ElementAlreadySet { index });
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Freeze into an immutable value. Every index must be populated.
    pub fn finish(self) -> Result<ConstValue, ConstError> {
        let missing: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.is_none().then_some(i))
            .collect();
        if !missing.is_empty() {
            return Err(ConstError::IncompleteArray { missing });
        }
        let elements = self.slots.into_iter().flatten().collect();
        Ok(ConstValue::Array(Arc::new(ArrayValue {
            element_type: self.element_type,
            elements,
        })))
    }
}
