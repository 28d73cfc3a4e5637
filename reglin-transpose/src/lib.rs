//! Offset-aware transpose of register-resident matrices.
//!
//! A register-resident matrix is a run of registers, one per column. The
//! column's rows sit in a contiguous lane range starting at a lane offset, so
//! a matrix can share registers with other data without being copied into a
//! canonical position first.
//!
//! ```text
//!   input (rows=2, cols=3, offset_in=1)     output (3x2, offset_out=0)
//!   reg:  c0  c1  c2                         reg:  r0  r1
//!   lane0  .   .   .                         lane0 a00 a10
//!   lane1 a00 a01 a02            ──▶         lane1 a01 a11
//!   lane2 a10 a11 a12                        lane2 a02 a12
//!   lane3  .   .   .                         lane3  ~   ~    <- tail policy
//! ```
//!
//! # Tail policies
//!
//! Lanes of an output register outside the logical extent are governed by
//! [`TailPolicy`]:
//! - [`TailPolicy::Overwrite`]: whatever the in-register transpose leaves there
//! - [`TailPolicy::SetZero`]: zero
//! - [`TailPolicy::KeepUnused`]: the destination register's previous contents
//!
//! # Example
//!
//! ```rust
//! use reglin_core::{Matrix, RegisterKind};
//! use reglin_transpose::{transpose_matrix, TailPolicy};
//!
//! let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
//! let t = transpose_matrix(RegisterKind::M128, 1, 0, TailPolicy::SetZero, &a).unwrap();
//! assert_eq!(t, a.transpose());
//! ```

pub mod kernel;
pub mod micro_kernel;
pub mod packed;
pub mod shape;

pub use kernel::{transpose, transpose_into};
pub use micro_kernel::{LaneKernel, MicroKernel};
pub use packed::{pack_columns, transpose_matrix, unpack_columns};
pub use shape::{RegisterPlacement, TailPolicy, TransposeShape};

pub use reglin_core::{KernelError, Register, RegisterKind, Result};
