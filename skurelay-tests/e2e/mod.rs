//! End-to-end tests for the SKU relay
//!
//! Run the relay server and a stand-in GraphQL upstream on loopback and talk
//! to them over real HTTP.

mod upstream_roundtrip;
