pub mod dsl;
pub mod effects;
pub mod stitch;
