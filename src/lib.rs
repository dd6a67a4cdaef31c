pub mod actions;
pub mod config;
pub mod merge;
pub mod merge_utils;
pub mod prompt;
pub mod rpc;
