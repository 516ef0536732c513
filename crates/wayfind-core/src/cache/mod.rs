//! In-memory caching primitives.
//!
//! `TtlCache` stores values for a fixed time-to-live and treats stale
//! entries as misses when they are read. It is memory-resident only;
//! nothing survives a process restart.

pub mod ttl;

pub use ttl::{CacheEntry, TtlCache, DEFAULT_TTL_SECS};
