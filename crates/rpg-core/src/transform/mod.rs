pub mod name_normalizer;
pub mod resource_tree;
pub mod spec_to_ir;
pub mod type_registry;

pub use spec_to_ir::transform;
