#![warn(missing_docs, clippy::pedantic, clippy::perf)]
#![doc = include_str!(r"../README.md")]

pub mod calc;
pub mod commands;
pub mod structures;
