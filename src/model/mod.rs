pub mod api;
pub mod common;
pub mod db;
pub mod mongodb;

#[cfg(test)]
pub(crate) mod memory;
