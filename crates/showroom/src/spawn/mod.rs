//! Spawned object management
//!
//! [`Spawner`] decides when to create; [`SpawnPool`] owns what was created.

pub mod pool;
pub mod spawner;

pub use pool::{PooledPair, SpawnPool};
pub use spawner::{SpawnOutcome, SpawnTemplate, Spawner};
