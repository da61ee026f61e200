pub mod attribute;
pub mod bit_coder;
pub mod buffer;
pub(crate) mod corner_table;
pub mod mesh;
pub mod shared;
