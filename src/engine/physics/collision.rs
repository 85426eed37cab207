use rapier2d::prelude::*;
use std::ops::BitOr;

/// Bit mask of collision categories, used by probes to pick what they detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(CollisionGroups::Player as u32);
    pub const GROUND: Self = Self(CollisionGroups::Ground as u32);
    pub const WALL: Self = Self(CollisionGroups::Wall as u32);

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any category in `other` is also in `self`
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Interaction groups for a scene query that should hit anything in this mask
    pub fn query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Group::from_bits_truncate(self.0))
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Collision groups for filtering what objects can collide with each other
///
/// Ground and wall are separate categories so the two locomotion probes can
/// tell a floor from a climbable surface even when both are static boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Player characters
    Player = 0b0000_0010,

    /// Floors and platforms the player can stand on
    Ground = 0b0000_0100,

    /// Vertical surfaces the player can slide down and jump off
    Wall = 0b0000_1000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Players never collide with each other
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Ground as u32 | CollisionGroups::Wall as u32,
            ),

            CollisionGroups::Ground | CollisionGroups::Wall => Group::from_bits_truncate(
                CollisionGroups::Player as u32 | CollisionGroups::Default as u32,
            ),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}
