//! Zip-to-coordinate resolution with a durable cache.
//!
//! Three layers, consulted in order: the in-memory/durable [`GeoCache`],
//! the remote [`GeocodeClient`], and (only when explicitly invoked) the
//! offline approximate-region table from `talentgeo-core`. The
//! [`ZipResolver`] ties them together and enforces the outbound rate
//! discipline for batch work.

mod cache;
mod client;
mod error;
mod resolver;

pub use cache::{CacheEntry, GeoCache};
pub use client::{GeocodeClient, GeocodedPlace};
pub use error::{CacheError, GeocodeError};
pub use resolver::{BatchOutcome, ResolvedZip, ZipResolver};
