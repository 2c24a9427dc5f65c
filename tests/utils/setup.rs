use std::sync::Arc;

use titan_lobby::identity::{IdentityProvider, InMemoryIdentityStore};
use titan_lobby::{AppContext, GameService, UserService, ViewAssembler};

use super::builders::seed_user;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Everything a workflow test needs: in-memory collections plus the
/// services and the assembler wired over them.
pub struct TestSetup {
    pub context: AppContext,
    pub identity: Arc<IdentityProvider>,
    pub user_service: UserService,
    pub game_service: GameService,
    pub assembler: ViewAssembler,
}

pub struct TestSetupBuilder {
    named_users: Vec<(String, String)>,
    fan_out_limit: usize,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            named_users: vec![],
            fan_out_limit: 4,
        }
    }

    /// Seeds a named user row per (id, display name) pair before the
    /// test body runs.
    pub fn with_users(mut self, users: Vec<(&str, &str)>) -> Self {
        self.named_users = users
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        self
    }

    pub fn with_alice_and_bob(self) -> Self {
        self.with_users(vec![("alice", "Alice"), ("bob", "Bob")])
    }

    pub fn with_fan_out_limit(mut self, limit: usize) -> Self {
        self.fan_out_limit = limit;
        self
    }

    pub async fn build(self) -> TestSetup {
        let context = AppContext::in_memory();

        for (id, name) in &self.named_users {
            seed_user(&context, id, name).await;
        }

        let identity = Arc::new(IdentityProvider::new(
            Arc::new(InMemoryIdentityStore::new()),
            Arc::new(InMemoryIdentityStore::new()),
        ));

        TestSetup {
            user_service: UserService::new(context.users.clone(), identity.clone()),
            game_service: GameService::new(context.games.clone(), context.players.clone()),
            assembler: ViewAssembler::new(
                context.games.clone(),
                context.players.clone(),
                context.users.clone(),
            )
            .with_fan_out_limit(self.fan_out_limit),
            identity,
            context,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
