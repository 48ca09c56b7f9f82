// Pipeline processing stages, in the order a run applies them

pub mod normalize;
pub mod validate;
pub mod filter;
pub mod aggregate;
