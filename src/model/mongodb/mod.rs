mod bson;
mod collection;
mod errors;

pub use bson::Id;
pub use collection::{ensure_indexes_exist, Coll};
#[cfg(test)]
pub(crate) use collection::test_db;
pub use errors::is_duplicate_key_error;
