mod creator;
mod mutex;

pub use creator::*;
