pub mod validate;

pub use validate::{compile_check, validate_instance, validate_instance_at};
