//! Collision layers.
//!
//! The physics collaborator reports contacts tagged by these categories.
//! Gameplay systems branch on layer membership, never on entity identity.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum Layer {
    #[default]
    Default,
    Player,
    Enemy,
    PlayerBullet,
    PowerUp,
}
