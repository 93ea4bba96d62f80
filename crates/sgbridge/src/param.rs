// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named, typed parameter slots and the per-object directory holding them.
//!
//! A domain object registers each of its parameters once, at construction,
//! and keeps the returned [`Slot`] to read its own configuration. The
//! directory exposes the same slots type-erased, so the accessor table can
//! read and write them knowing only the parameter name.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::Result;
use crate::types::TypeDescriptor;
use crate::value::BoundaryValue;

/// A concrete storage type that can live in a parameter slot.
///
/// `from_boundary` carries the write-side validation: it either converts
/// the supplied value into storage (promoting integers where allowed) or
/// reports why it cannot.
pub trait ParamType: Send + Sync + Sized + 'static {
    const DESCRIPTOR: TypeDescriptor;

    fn to_boundary(&self) -> Result<BoundaryValue>;

    fn from_boundary(value: BoundaryValue) -> Result<Self>;
}

/// Storage for one parameter.
pub struct Slot<T> {
    value: RwLock<T>,
}

impl<T: ParamType> Slot<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
        }
    }

    /// Borrow the current value.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.value.read()
    }

    pub fn set(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: ParamType + Clone> Slot<T> {
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

pub(crate) trait ErasedSlot: Send + Sync {
    fn descriptor(&self) -> TypeDescriptor;
    fn as_any(&self) -> &dyn Any;
}

impl<T: ParamType> ErasedSlot for Slot<T> {
    fn descriptor(&self) -> TypeDescriptor {
        T::DESCRIPTOR
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-erased handle on one named slot.
#[derive(Clone)]
pub struct Parameter {
    name: &'static str,
    slot: Arc<dyn ErasedSlot>,
}

impl Parameter {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Storage type fixed at registration.
    pub fn descriptor(&self) -> TypeDescriptor {
        self.slot.descriptor()
    }

    pub(crate) fn storage(&self) -> &dyn Any {
        self.slot.as_any()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("type", &self.descriptor().name)
            .finish()
    }
}

/// Parameters of one object, in registration order.
#[derive(Default, Clone, Debug)]
pub struct ParameterDirectory {
    entries: Vec<Parameter>,
}

impl ParameterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot and return the typed handle the owner keeps.
    ///
    /// Re-registering a name replaces the earlier entry in place.
    pub fn register<T: ParamType>(&mut self, name: &'static str, initial: T) -> Arc<Slot<T>> {
        let slot = Arc::new(Slot::new(initial));
        let param = Parameter {
            name,
            slot: Arc::clone(&slot) as Arc<dyn ErasedSlot>,
        };
        match self.entries.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = param,
            None => self.entries.push(param),
        }
        slot
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|p| p.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
