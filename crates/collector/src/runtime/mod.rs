//! Runtime module: process lifecycle (boot, shutdown).

pub mod boot;
pub mod stop;
