// Docker log collector: listener -> parsers -> mapper -> publishers.

// Core infrastructure
pub mod client;
pub mod conf;
pub mod docker;
pub mod tlp;

// Pipeline engine
pub mod controller;
pub mod factory;
pub mod pipeline;
pub mod runtime;
