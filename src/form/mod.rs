//! Form layer: the binding trait panels write through, plus an in-memory form.

pub mod binding;
pub mod memory;

pub use binding::{FormBinding, SelectOption, SubPanel, TableRow};
pub use memory::MemoryForm;
