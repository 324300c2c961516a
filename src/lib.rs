pub mod bench;
pub mod bulk;
pub mod conf;
pub mod core;
pub mod db;
pub mod model;

#[cfg(feature = "testutil")]
pub mod testutil;
