//! The saved-places wishlist.
//!
//! `Wishlist` keeps the last full list and its ETag, revalidates with
//! `If-None-Match` on every read, and drops both whenever a write may have
//! changed the list on the server.

pub mod service;

pub use service::Wishlist;
