//! Wound tracker library: the report store, the resolver that reduces stored
//! snapshots to one current record per wound, and the services built on it.

pub mod backend;
