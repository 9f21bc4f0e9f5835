pub mod kind;

pub use fermat_error::Error;
