pub mod common;
pub mod config;
pub mod countdown;
pub mod interval;
pub mod stopwatch;
