#![forbid(unsafe_code)]

//! Conversation protocol engine for round-based anonymous messaging.
//!
//! A [`convo::Conversation`] turns each round of the mix network into one
//! fixed-size request and reconciles the network's response: sealing queued
//! text (or a heartbeat) for the peer, deriving the round's dead drop, and
//! detecting whether the peer is actually answering.

pub mod codec;
pub mod convo;
pub mod display;
pub mod errors;
pub mod pending;
pub mod pki;
pub mod types;
