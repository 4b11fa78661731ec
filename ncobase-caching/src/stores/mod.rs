//! Cache store implementations

#[cfg(feature = "moka")]
pub mod moka;
#[cfg(feature = "redis")]
pub mod redis;
#[cfg(feature = "ttl")]
pub mod ttl;

#[cfg(feature = "moka")]
pub use moka::MokaCache;
#[cfg(feature = "redis")]
pub use redis::RedisCache;
#[cfg(feature = "ttl")]
pub use ttl::TtlCache;
