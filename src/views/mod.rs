pub mod assembler;
pub mod models;
pub mod query;

pub use assembler::{ViewAssembler, DEFAULT_FAN_OUT_LIMIT};
pub use models::{partition_by_status, JoinableGame, LobbyGame, LobbyPlayer, MyGame, NpcUser};
pub use query::{QueryCell, QueryState};
