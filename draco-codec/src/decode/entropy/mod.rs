pub(crate) mod rans;
pub(crate) mod symbol_coding;
