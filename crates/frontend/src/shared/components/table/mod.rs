pub mod number_format;

pub use number_format::*;
