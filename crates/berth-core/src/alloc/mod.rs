//! Hash collections used across berth.
//!
//! The registry and splitter maps are touched on every pointer move, so they use AHash
//! instead of SipHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
