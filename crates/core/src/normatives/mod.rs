//! Regulatory (normative) files.
//!
//! Fixed-width text reports sent to the regulator: the monthly P41 payment
//! summary and the accounts/balances file, plus the name rules of the D50
//! account registry.

pub mod error;
pub mod fixed_width;
pub mod names;
pub mod service;
pub mod types;


pub use error::NormativeError;
pub use fixed_width::{Align, shift, white_space_fill, zero_shift};
pub use names::{clean_name, clear_rut, format_name};
pub use service::NormativeService;
pub use types::*;
