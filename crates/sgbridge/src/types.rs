// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type tags for values crossing the boundary.
//!
//! Every value read from or written to a parameter is labelled with a
//! [`TypeDescriptor`]: its [`ValueKind`], the [`Shape`] of the container it
//! lives in and a canonical name used in diagnostics. Descriptors are
//! `'static` constants; nothing here changes at runtime.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::value::{BoundaryValue, NumericMatrix, NumericVector};

/// Closed set of value kinds a caller can hand across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int32,
    Int64,
    Float32,
    Float64,
    /// Handle to another domain object.
    Object,
}

impl ValueKind {
    /// Canonical kind name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Object => "object",
        }
    }

    /// Size of one element in bytes (None for object handles).
    pub const fn element_size(self) -> Option<usize> {
        match self {
            Self::Int32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Float64 => Some(8),
            Self::Object => None,
        }
    }

    /// True for the integer kinds that take part in promotion.
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Container a value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    Vector,
    Matrix,
}

/// Domain object families a handle can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectFamily {
    Kernel,
    Machine,
    Distance,
    Features,
    File,
    CombinationRule,
    Labels,
    Evaluation,
}

impl ObjectFamily {
    /// All families, in declaration order.
    pub const ALL: [ObjectFamily; 8] = [
        Self::Kernel,
        Self::Machine,
        Self::Distance,
        Self::Features,
        Self::File,
        Self::CombinationRule,
        Self::Labels,
        Self::Evaluation,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Kernel => "Kernel",
            Self::Machine => "Machine",
            Self::Distance => "Distance",
            Self::Features => "Features",
            Self::File => "File",
            Self::CombinationRule => "CombinationRule",
            Self::Labels => "Labels",
            Self::Evaluation => "Evaluation",
        }
    }
}

impl fmt::Display for ObjectFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of the accessor table: one per concrete storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Scalar(ValueKind),
    Vector(ValueKind),
    Matrix(ValueKind),
    Object(ObjectFamily),
}

/// Immutable description of a concrete storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Accessor table key.
    pub key: StorageKey,
    /// Canonical name (`int32`, `Matrix<float64>`, `Distance`, ...).
    pub name: &'static str,
}

impl TypeDescriptor {
    pub const fn scalar(kind: ValueKind, name: &'static str) -> Self {
        Self {
            key: StorageKey::Scalar(kind),
            name,
        }
    }

    pub const fn vector(kind: ValueKind, name: &'static str) -> Self {
        Self {
            key: StorageKey::Vector(kind),
            name,
        }
    }

    pub const fn matrix(kind: ValueKind, name: &'static str) -> Self {
        Self {
            key: StorageKey::Matrix(kind),
            name,
        }
    }

    pub const fn object(family: ObjectFamily) -> Self {
        Self {
            key: StorageKey::Object(family),
            name: family.name(),
        }
    }

    /// Kind of the value (element kind for containers).
    pub const fn kind(&self) -> ValueKind {
        match self.key {
            StorageKey::Scalar(kind) | StorageKey::Vector(kind) | StorageKey::Matrix(kind) => kind,
            StorageKey::Object(_) => ValueKind::Object,
        }
    }

    pub const fn shape(&self) -> Shape {
        match self.key {
            StorageKey::Vector(_) => Shape::Vector,
            StorageKey::Matrix(_) => Shape::Matrix,
            StorageKey::Scalar(_) | StorageKey::Object(_) => Shape::Scalar,
        }
    }

    /// Expected family for object-valued storage.
    pub const fn family(&self) -> Option<ObjectFamily> {
        match self.key {
            StorageKey::Object(family) => Some(family),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Numeric element types that can live in scalar, vector and matrix slots.
pub trait Element:
    nalgebra::Scalar
    + Copy
    + bytemuck::Pod
    + num_traits::ToPrimitive
    + num_traits::Zero
    + fmt::Display
    + Send
    + Sync
{
    const KIND: ValueKind;
    const SCALAR: TypeDescriptor;
    const VECTOR: TypeDescriptor;
    const MATRIX: TypeDescriptor;

    fn into_boundary(self) -> BoundaryValue;
    fn wrap_vector(vector: DVector<Self>) -> NumericVector;
    fn wrap_matrix(matrix: DMatrix<Self>) -> NumericMatrix;
    /// Hands the vector back unchanged when it holds another element kind.
    fn unwrap_vector(vector: NumericVector) -> Result<DVector<Self>, NumericVector>;
    /// Hands the matrix back unchanged when it holds another element kind.
    fn unwrap_matrix(matrix: NumericMatrix) -> Result<DMatrix<Self>, NumericMatrix>;
}

macro_rules! impl_element {
    ($ty:ty, $kind:ident, $name:literal) => {
        impl Element for $ty {
            const KIND: ValueKind = ValueKind::$kind;
            const SCALAR: TypeDescriptor = TypeDescriptor::scalar(ValueKind::$kind, $name);
            const VECTOR: TypeDescriptor =
                TypeDescriptor::vector(ValueKind::$kind, concat!("Vector<", $name, ">"));
            const MATRIX: TypeDescriptor =
                TypeDescriptor::matrix(ValueKind::$kind, concat!("Matrix<", $name, ">"));

            fn into_boundary(self) -> BoundaryValue {
                BoundaryValue::$kind(self)
            }

            fn wrap_vector(vector: DVector<Self>) -> NumericVector {
                NumericVector::$kind(vector)
            }

            fn wrap_matrix(matrix: DMatrix<Self>) -> NumericMatrix {
                NumericMatrix::$kind(matrix)
            }

            fn unwrap_vector(vector: NumericVector) -> Result<DVector<Self>, NumericVector> {
                match vector {
                    NumericVector::$kind(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn unwrap_matrix(matrix: NumericMatrix) -> Result<DMatrix<Self>, NumericMatrix> {
                match matrix {
                    NumericMatrix::$kind(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

impl_element!(i32, Int32, "int32");
impl_element!(i64, Int64, "int64");
impl_element!(f32, Float32, "float32");
impl_element!(f64, Float64, "float64");
