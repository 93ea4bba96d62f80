// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Values crossing the boundary.
//!
//! [`BoundaryValue`] is the only representation callers see: scalars are
//! copies, containers are owned dense copies and object values are fresh
//! wrappers sharing the referenced object.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::object::DomainObject;
use crate::types::{Element, Shape, TypeDescriptor, ValueKind};

/// Dispatch an expression over the four numeric variants of a container enum.
macro_rules! numeric_dispatch {
    ($value:expr, $container:ident, $inner:ident => $body:expr) => {
        match $value {
            $container::Int32($inner) => $body,
            $container::Int64($inner) => $body,
            $container::Float32($inner) => $body,
            $container::Float64($inner) => $body,
        }
    };
}

fn to_f64<T: Element>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Dense column vector of any numeric element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericVector {
    Int32(DVector<i32>),
    Int64(DVector<i64>),
    Float32(DVector<f32>),
    Float64(DVector<f64>),
}

impl NumericVector {
    pub fn kind(&self) -> ValueKind {
        self.descriptor().kind()
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Int32(_) => <i32 as Element>::VECTOR,
            Self::Int64(_) => <i64 as Element>::VECTOR,
            Self::Float32(_) => <f32 as Element>::VECTOR,
            Self::Float64(_) => <f64 as Element>::VECTOR,
        }
    }

    pub fn len(&self) -> usize {
        numeric_dispatch!(self, NumericVector, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements converted to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        numeric_dispatch!(self, NumericVector, v => v.iter().copied().map(to_f64).collect())
    }

    /// Native-endian element bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        numeric_dispatch!(self, NumericVector, v => bytemuck::cast_slice(v.as_slice()).to_vec())
    }
}

/// Dense matrix of any numeric element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericMatrix {
    Int32(DMatrix<i32>),
    Int64(DMatrix<i64>),
    Float32(DMatrix<f32>),
    Float64(DMatrix<f64>),
}

impl NumericMatrix {
    /// Build a `rows x cols` matrix from row-major element bytes.
    ///
    /// Object kinds are rejected before anything is read. The buffer must
    /// hold at least `rows * cols` elements; trailing bytes are ignored.
    pub fn from_row_major(kind: ValueKind, bytes: &[u8], rows: usize, cols: usize) -> Result<Self> {
        match kind {
            ValueKind::Int32 => decode_row_major::<i32>(bytes, rows, cols).map(Self::Int32),
            ValueKind::Int64 => decode_row_major::<i64>(bytes, rows, cols).map(Self::Int64),
            ValueKind::Float32 => decode_row_major::<f32>(bytes, rows, cols).map(Self::Float32),
            ValueKind::Float64 => decode_row_major::<f64>(bytes, rows, cols).map(Self::Float64),
            ValueKind::Object => Err(Error::UnsupportedOperation(
                "object handles cannot be stored in a matrix".to_string(),
            )),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.descriptor().kind()
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Int32(_) => <i32 as Element>::MATRIX,
            Self::Int64(_) => <i64 as Element>::MATRIX,
            Self::Float32(_) => <f32 as Element>::MATRIX,
            Self::Float64(_) => <f64 as Element>::MATRIX,
        }
    }

    pub fn nrows(&self) -> usize {
        numeric_dispatch!(self, NumericMatrix, m => m.nrows())
    }

    pub fn ncols(&self) -> usize {
        numeric_dispatch!(self, NumericMatrix, m => m.ncols())
    }

    /// Copy converted to `f64`, same shape.
    pub fn to_f64_matrix(&self) -> DMatrix<f64> {
        numeric_dispatch!(self, NumericMatrix, m => m.map(to_f64))
    }

    /// Native-endian element bytes in row-major order.
    pub fn to_row_major_bytes(&self) -> Vec<u8> {
        numeric_dispatch!(self, NumericMatrix, m => {
            let transposed = m.transpose();
            bytemuck::cast_slice(transposed.as_slice()).to_vec()
        })
    }
}

fn decode_row_major<T: Element>(bytes: &[u8], rows: usize, cols: usize) -> Result<DMatrix<T>> {
    let size = std::mem::size_of::<T>();
    let needed = rows
        .checked_mul(cols)
        .and_then(|count| count.checked_mul(size))
        .ok_or_else(|| {
            Error::InvariantViolation(format!("{}x{} {} matrix is too large", rows, cols, T::KIND))
        })?;

    if bytes.len() < needed {
        return Err(Error::InvariantViolation(format!(
            "Buffer holds {} bytes, a {}x{} {} matrix needs {}",
            bytes.len(),
            rows,
            cols,
            T::KIND,
            needed
        )));
    }

    let elements: Vec<T> = bytes[..needed]
        .chunks_exact(size)
        .map(bytemuck::pod_read_unaligned::<T>)
        .collect();
    Ok(DMatrix::from_row_slice(rows, cols, &elements))
}

/// One value crossing the interface, tagged by its variant.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryValue {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Fresh wrapper sharing ownership of the referenced object.
    Object(DomainObject),
    Vector(NumericVector),
    Matrix(NumericMatrix),
}

impl BoundaryValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
            Self::Object(_) => ValueKind::Object,
            Self::Vector(v) => v.kind(),
            Self::Matrix(m) => m.kind(),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Self::Vector(_) => Shape::Vector,
            Self::Matrix(_) => Shape::Matrix,
            _ => Shape::Scalar,
        }
    }

    /// Name used in diagnostics (`int32`, `Matrix<float64>`, object family).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object(obj) => obj.family().name(),
            Self::Vector(v) => v.descriptor().name,
            Self::Matrix(m) => m.descriptor().name,
            scalar => scalar.kind().name(),
        }
    }

    /// Numeric scalar as `f64`, None for objects and containers.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int32(v) => Some(f64::from(v)),
            Self::Int64(v) => v.to_f64(),
            Self::Float32(v) => Some(f64::from(v)),
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DomainObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&NumericMatrix> {
        match self {
            Self::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&NumericVector> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for BoundaryValue {
                fn from(value: $ty) -> Self {
                    value.into_boundary()
                }
            }
        )*
    };
}

scalar_from!(i32, i64, f32, f64);

impl From<DomainObject> for BoundaryValue {
    fn from(obj: DomainObject) -> Self {
        Self::Object(obj)
    }
}

impl<T: Element> From<DVector<T>> for BoundaryValue {
    fn from(vector: DVector<T>) -> Self {
        Self::Vector(T::wrap_vector(vector))
    }
}

impl<T: Element> From<DMatrix<T>> for BoundaryValue {
    fn from(matrix: DMatrix<T>) -> Self {
        Self::Matrix(T::wrap_matrix(matrix))
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for NumericVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        numeric_dispatch!(self, NumericVector, v => write_list(f, v.iter()))
    }
}

impl fmt::Display for NumericMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        numeric_dispatch!(self, NumericMatrix, m => {
            f.write_str("[")?;
            for (i, row) in m.row_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_list(f, row.iter())?;
            }
            f.write_str("]")
        })
    }
}

impl fmt::Display for BoundaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::Float32(v) => write!(f, "{}", v),
            Self::Float64(v) => write!(f, "{}", v),
            Self::Object(obj) => f.write_str(obj.name()),
            Self::Vector(v) => write!(f, "{}", v),
            Self::Matrix(m) => write!(f, "{}", m),
        }
    }
}
