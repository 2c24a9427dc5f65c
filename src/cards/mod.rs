pub mod models;

pub use models::{
    CardColor, CardType, PlayerCard, PlayerResource, ProgressCard, ProgressGroup, ResourceCard,
    ResourceType,
};
