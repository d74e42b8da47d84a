pub mod string_ops;

pub use string_ops::normalize_strings;
