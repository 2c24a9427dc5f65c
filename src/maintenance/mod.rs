pub mod dedup;
pub mod seed;
pub mod test_users;

pub use dedup::{cleanup_duplicate_players, find_duplicate_players, CleanupReport};
pub use seed::seed_npc_users;
pub use test_users::{provision_test_user, record_dev_user, TestUserSpec};
