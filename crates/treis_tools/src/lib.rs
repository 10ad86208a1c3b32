//! Generic containers used alongside `treis_libc`.

pub mod array2d;
pub mod enum_variant;
