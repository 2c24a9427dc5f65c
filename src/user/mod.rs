pub mod models;
pub mod repository;
pub mod service;

pub use models::User;
pub use repository::UserRepository;
pub use service::UserService;
