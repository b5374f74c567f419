mod base;
mod lifecycle;
mod store;

pub use base::{FieldPool, FieldPoolCore, NewFieldPool};
pub use lifecycle::{status_for_extension, status_for_new_deadline, FieldPoolLifecycle};
pub use store::FieldPoolStore;
