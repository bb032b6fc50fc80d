#![forbid(unsafe_code)]

pub mod hash;
pub mod nonce;

pub mod box_crypto;
pub mod dead_drop;
pub mod onion;

pub mod utils;

#[cfg(test)]
mod proptests;
