//! Statement-family parser drivers.

pub mod hsbc;
