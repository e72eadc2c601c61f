mod alloc;
mod bucket;
#[macro_use]
mod builder;
mod dict;
mod digest;
mod error;
mod opt;

// Public exports.
pub use bucket::Entry;
pub use dict::{Dict, Difference, Intersection, IntoIter, Iter};
pub use error::AllocError;
