#![allow(dead_code)]

pub mod factories;
pub mod helpers;
pub mod http_stub;
pub mod test_db;
