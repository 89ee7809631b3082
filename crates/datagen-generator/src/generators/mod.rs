//! Primitive value samplers.
//!
//! These functions only know how to draw a value from an already-resolved
//! range or list. Rule lookup, fallbacks and warnings live in
//! [`crate::synthesizer`].

pub mod categorical;
pub mod numeric;
pub mod temporal;

pub use categorical::{generate_bool, pick_from_list};
pub use numeric::{generate_float_range, generate_int_range, FLOAT_DECIMALS};
pub use temporal::{generate_date_between, generate_datetime_between};
