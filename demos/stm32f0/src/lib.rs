#![no_std]

pub mod board;
pub mod flash_storage;
pub mod time_source;
