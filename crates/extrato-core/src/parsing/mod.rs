//! Field normalizers and header parsing. Everything here is pure.

pub mod codes;
pub mod header;
pub mod period;
pub mod values;
