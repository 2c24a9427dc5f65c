pub mod builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use builders::{game_with_status, seed_user};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
