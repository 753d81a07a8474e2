pub mod emitters;
pub mod generator;
pub mod type_mapper;

pub use emitters::EmitOptions;
pub use generator::PhpClientGenerator;
