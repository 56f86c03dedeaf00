//! # mediatree-engine - Remote Tree Retrieval
//!
//! The background retrieval engine: a persistent FIFO worker for container
//! expansions, a dedicated lane for root discovery, and the
//! [`RetrievalDispatcher`] façade the consumer drives.
//!
//! The consumer enqueues work through the dispatcher and drains
//! `RetrievalEvent`s from the channel returned by
//! [`RetrievalDispatcher::spawn`]; no engine code ever touches
//! consumer-owned structures.

pub mod dispatcher;
pub mod worker;

pub use dispatcher::RetrievalDispatcher;
pub use worker::ExpandRequest;
