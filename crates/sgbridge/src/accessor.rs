// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Accessor registration table.
//!
//! Maps every concrete storage type to a `read` and a `write` function over
//! its type-erased slot. The table is built once per process, the first
//! time a [`DomainObject`](crate::object::DomainObject) is constructed, and
//! is read-only afterwards.
//!
//! # Write validation
//!
//! Writes go through [`ParamType::from_boundary`] before the slot lock is
//! taken:
//!
//! 1. Integer storage accepts the other integer kind. `int32` widens into
//!    `int64` exactly; `int64` narrows into `int32` only when the value fits.
//! 2. Every other storage requires the exact kind and shape.
//! 3. Object storage requires the wrapper's family to match the slot.
//!
//! A rejected write leaves the stored value untouched.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use nalgebra::{DMatrix, DVector};

use crate::domain::{CombinationRule, Distance, Evaluation, Features, Kernel, Labels, Machine};
use crate::error::{Error, Result};
use crate::object::{DomainObject, ObjectRef};
use crate::param::{ParamType, Parameter, Slot};
use crate::types::{Element, ObjectFamily, StorageKey, TypeDescriptor};
use crate::value::BoundaryValue;

// ============================================================================
// Storage types
// ============================================================================

impl ParamType for i32 {
    const DESCRIPTOR: TypeDescriptor = <i32 as Element>::SCALAR;

    fn to_boundary(&self) -> Result<BoundaryValue> {
        Ok(BoundaryValue::Int32(*self))
    }

    fn from_boundary(value: BoundaryValue) -> Result<Self> {
        match value {
            BoundaryValue::Int32(v) => Ok(v),
            BoundaryValue::Int64(v) => i32::try_from(v)
                .map_err(|_| Error::mismatch("int32", format!("int64 {} (out of range)", v))),
            other => Err(Error::mismatch(Self::DESCRIPTOR.name, other.type_name())),
        }
    }
}

impl ParamType for i64 {
    const DESCRIPTOR: TypeDescriptor = <i64 as Element>::SCALAR;

    fn to_boundary(&self) -> Result<BoundaryValue> {
        Ok(BoundaryValue::Int64(*self))
    }

    fn from_boundary(value: BoundaryValue) -> Result<Self> {
        match value {
            BoundaryValue::Int64(v) => Ok(v),
            BoundaryValue::Int32(v) => Ok(i64::from(v)),
            other => Err(Error::mismatch(Self::DESCRIPTOR.name, other.type_name())),
        }
    }
}

macro_rules! float_storage {
    ($ty:ty, $variant:ident) => {
        impl ParamType for $ty {
            const DESCRIPTOR: TypeDescriptor = <$ty as Element>::SCALAR;

            fn to_boundary(&self) -> Result<BoundaryValue> {
                Ok(BoundaryValue::$variant(*self))
            }

            fn from_boundary(value: BoundaryValue) -> Result<Self> {
                match value {
                    BoundaryValue::$variant(v) => Ok(v),
                    other => Err(Error::mismatch(Self::DESCRIPTOR.name, other.type_name())),
                }
            }
        }
    };
}

float_storage!(f32, Float32);
float_storage!(f64, Float64);

impl<T: Element> ParamType for DVector<T> {
    const DESCRIPTOR: TypeDescriptor = T::VECTOR;

    fn to_boundary(&self) -> Result<BoundaryValue> {
        Ok(BoundaryValue::Vector(T::wrap_vector(self.clone())))
    }

    fn from_boundary(value: BoundaryValue) -> Result<Self> {
        match value {
            BoundaryValue::Vector(v) => T::unwrap_vector(v)
                .map_err(|other| Error::mismatch(T::VECTOR.name, other.descriptor().name)),
            other => Err(Error::mismatch(T::VECTOR.name, other.type_name())),
        }
    }
}

impl<T: Element> ParamType for DMatrix<T> {
    const DESCRIPTOR: TypeDescriptor = T::MATRIX;

    fn to_boundary(&self) -> Result<BoundaryValue> {
        Ok(BoundaryValue::Matrix(T::wrap_matrix(self.clone())))
    }

    fn from_boundary(value: BoundaryValue) -> Result<Self> {
        match value {
            BoundaryValue::Matrix(m) => T::unwrap_matrix(m)
                .map_err(|other| Error::mismatch(T::MATRIX.name, other.descriptor().name)),
            other => Err(Error::mismatch(T::MATRIX.name, other.type_name())),
        }
    }
}

/// Object-valued storage: an optional shared handle of one family.
macro_rules! object_storage {
    ($trait:ident, $family:ident) => {
        impl ParamType for Option<Arc<dyn $trait>> {
            const DESCRIPTOR: TypeDescriptor = TypeDescriptor::object(ObjectFamily::$family);

            fn to_boundary(&self) -> Result<BoundaryValue> {
                match self {
                    Some(inner) => Ok(BoundaryValue::Object(DomainObject::from(Arc::clone(inner)))),
                    None => Err(Error::EmptySlot {
                        location: String::new(),
                    }),
                }
            }

            fn from_boundary(value: BoundaryValue) -> Result<Self> {
                match value {
                    BoundaryValue::Object(obj) => match obj.into_inner() {
                        ObjectRef::$family(inner) => Ok(Some(inner)),
                        other => Err(Error::mismatch(
                            ObjectFamily::$family.name(),
                            other.family().name(),
                        )),
                    },
                    other => Err(Error::mismatch(ObjectFamily::$family.name(), other.type_name())),
                }
            }
        }
    };
}

object_storage!(Kernel, Kernel);
object_storage!(Machine, Machine);
object_storage!(Distance, Distance);
object_storage!(Features, Features);
object_storage!(CombinationRule, CombinationRule);
object_storage!(Labels, Labels);
object_storage!(Evaluation, Evaluation);

// ============================================================================
// Accessors
// ============================================================================

type ReadFn = fn(&dyn Any) -> Result<BoundaryValue>;
type WriteFn = fn(&dyn Any, BoundaryValue) -> Result<()>;

fn downcast<T: ParamType>(storage: &dyn Any) -> Result<&Slot<T>> {
    storage.downcast_ref::<Slot<T>>().ok_or_else(|| {
        Error::InvariantViolation(format!("Storage does not hold {}", T::DESCRIPTOR.name))
    })
}

fn read_slot<T: ParamType>(storage: &dyn Any) -> Result<BoundaryValue> {
    downcast::<T>(storage)?.read().to_boundary()
}

fn write_slot<T: ParamType>(storage: &dyn Any, value: BoundaryValue) -> Result<()> {
    let slot = downcast::<T>(storage)?;
    let converted = T::from_boundary(value)?;
    slot.set(converted);
    Ok(())
}

/// Read/write pair for one storage type.
#[derive(Clone, Copy)]
pub struct AccessorEntry {
    pub descriptor: TypeDescriptor,
    read: ReadFn,
    write: WriteFn,
}

impl AccessorEntry {
    fn of<T: ParamType>() -> Self {
        Self {
            descriptor: T::DESCRIPTOR,
            read: read_slot::<T>,
            write: write_slot::<T>,
        }
    }
}

impl std::fmt::Debug for AccessorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorEntry")
            .field("descriptor", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}

static TABLE: OnceLock<AccessorTable> = OnceLock::new();
static BUILDS: AtomicUsize = AtomicUsize::new(0);

/// Process-wide storage type -> accessor map.
#[derive(Debug)]
pub struct AccessorTable {
    entries: HashMap<StorageKey, AccessorEntry>,
}

impl AccessorTable {
    /// The table, built on first call. Concurrent first callers all observe
    /// the same instance.
    pub fn global() -> &'static AccessorTable {
        TABLE.get_or_init(Self::build)
    }

    /// Number of times the table has been constructed in this process.
    pub fn builds() -> usize {
        BUILDS.load(Ordering::SeqCst)
    }

    fn build() -> Self {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        let mut table = Self {
            entries: HashMap::new(),
        };

        table.register_numeric::<i32>();
        table.register_numeric::<i64>();
        table.register_numeric::<f32>();
        table.register_numeric::<f64>();

        table.register::<Option<Arc<dyn Kernel>>>();
        table.register::<Option<Arc<dyn Machine>>>();
        table.register::<Option<Arc<dyn Distance>>>();
        table.register::<Option<Arc<dyn Features>>>();
        table.register::<Option<Arc<dyn CombinationRule>>>();
        table.register::<Option<Arc<dyn Labels>>>();
        table.register::<Option<Arc<dyn Evaluation>>>();

        log::debug!("[accessor] table built with {} entries", table.len());
        table
    }

    fn register_numeric<T: Element>(&mut self)
    where
        T: ParamType,
    {
        self.register::<T>();
        self.register::<DVector<T>>();
        self.register::<DMatrix<T>>();
    }

    fn register<T: ParamType>(&mut self) {
        match self.entries.entry(T::DESCRIPTOR.key) {
            Entry::Occupied(_) => {
                log::warn!("[accessor] {} registered twice, keeping the first", T::DESCRIPTOR.name);
            }
            Entry::Vacant(slot) => {
                slot.insert(AccessorEntry::of::<T>());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: StorageKey) -> Option<&AccessorEntry> {
        self.entries.get(&key)
    }

    fn lookup(&self, param: &Parameter) -> Result<&AccessorEntry> {
        let descriptor = param.descriptor();
        self.entry(descriptor.key).ok_or_else(|| {
            Error::UnsupportedOperation(format!("no accessor registered for {}", descriptor.name))
        })
    }

    /// Copy the parameter's current value out.
    pub fn read(&self, param: &Parameter) -> Result<BoundaryValue> {
        let entry = self.lookup(param)?;
        (entry.read)(param.storage())
    }

    /// Validate `value` against the parameter's storage and store it.
    pub fn write(&self, param: &Parameter, value: BoundaryValue) -> Result<()> {
        let entry = self.lookup(param)?;
        (entry.write)(param.storage(), value)
    }
}
