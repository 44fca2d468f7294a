pub mod builders;
pub mod fake_spawner;

pub use builders::{EventScript, RecordingLogger};
pub use fake_spawner::{FakeSpawner, SpawnRequest};
