//! cellgraph_engine - Typed cells, single-hop lookups and dependency tracking.

pub mod engine;
