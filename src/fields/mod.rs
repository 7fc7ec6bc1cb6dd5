mod configuration;
mod values;

pub use configuration::{Configuration, FieldDescriptor, infer};
pub use values::{ValueSet, extract_values};
