//! The entity sum type: a small record per game-object kind, each carrying
//! its own counters, plus the command type entities communicate their
//! intents through and the running game statistics the turn pipeline
//! maintains.

use crate::geometry::Offset;

/// A monotonically increasing spawn counter, used only to give the
/// registry a stable "insertion order within variant" for dispatch — it is
/// not otherwise meaningful game state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

/// Which `Entity` variant occupies a position; also the registry's
/// per-variant dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Player,
    Skeleton,
    Wraith,
    FleshGolem,
    Adventurer,
    Paladin,
    Priest,
    Skull,
    Ladder,
}

impl EntityTag {
    /// Animate variants take turns; inanimate ones (Skull, Ladder) never
    /// act and so are skipped by turn dispatch.
    pub fn is_animate(&self) -> bool {
        !matches!(self, EntityTag::Skull | EntityTag::Ladder)
    }

    pub fn is_inanimate(&self) -> bool {
        !self.is_animate()
    }

    /// Faction: good NPCs defend the player, evil NPCs hunt them. The
    /// player is its own faction and neither Skulls nor Ladders take a side.
    pub fn is_good(&self) -> bool {
        matches!(self, EntityTag::Adventurer | EntityTag::Paladin | EntityTag::Priest)
    }

    pub fn is_evil(&self) -> bool {
        matches!(self, EntityTag::Skeleton | EntityTag::Wraith | EntityTag::FleshGolem)
    }

    /// The animate, non-player variants in their dispatch-priority order
    /// (§4.G: "by variant tag, then by insertion order within variant").
    pub const NPC_DISPATCH_ORDER: [EntityTag; 6] = [
        EntityTag::Skeleton,
        EntityTag::Wraith,
        EntityTag::FleshGolem,
        EntityTag::Adventurer,
        EntityTag::Paladin,
        EntityTag::Priest,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LadderDirection {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerEntity {
    pub offset: Offset,
    pub hp: i32,
    pub max_hp: i32,
    pub armor: i32,
    pub energy: i32,
    pub max_energy: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonEntity {
    pub offset: Offset,
    pub hp: i32,
    pub armor: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WraithEntity {
    pub offset: Offset,
    pub hp: i32,
    pub armor: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FleshGolemEntity {
    pub offset: Offset,
    pub hp: i32,
    pub armor: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdventurerEntity {
    pub offset: Offset,
    pub hp: i32,
    pub armor: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaladinEntity {
    pub offset: Offset,
    pub hp: i32,
    pub armor: i32,
    pub piety: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriestEntity {
    pub offset: Offset,
    pub hp: i32,
    pub armor: i32,
    pub piety: i32,
}

/// A dropped skull. `fresh` marks a skull still eligible for invocation;
/// it rots (becomes ineligible) some number of turns after being created.
/// Whether a skull is created fresh or rotted depends on the source that
/// produced it — see `Registry::process_command`'s Clash handling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkullEntity {
    pub offset: Offset,
    pub fresh: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LadderEntity {
    pub offset: Offset,
    pub direction: LadderDirection,
    /// A shackled up-ladder is not a valid reinforcement spawn point.
    pub shackled: bool,
}

/// A sum type over every game-object kind the registry stores. Each
/// variant's first logical field is its position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entity {
    Player(PlayerEntity),
    Skeleton(SkeletonEntity),
    Wraith(WraithEntity),
    FleshGolem(FleshGolemEntity),
    Adventurer(AdventurerEntity),
    Paladin(PaladinEntity),
    Priest(PriestEntity),
    Skull(SkullEntity),
    Ladder(LadderEntity),
}

impl Entity {
    pub fn offset(&self) -> Offset {
        match self {
            Entity::Player(e) => e.offset,
            Entity::Skeleton(e) => e.offset,
            Entity::Wraith(e) => e.offset,
            Entity::FleshGolem(e) => e.offset,
            Entity::Adventurer(e) => e.offset,
            Entity::Paladin(e) => e.offset,
            Entity::Priest(e) => e.offset,
            Entity::Skull(e) => e.offset,
            Entity::Ladder(e) => e.offset,
        }
    }

    pub fn tag(&self) -> EntityTag {
        match self {
            Entity::Player(_) => EntityTag::Player,
            Entity::Skeleton(_) => EntityTag::Skeleton,
            Entity::Wraith(_) => EntityTag::Wraith,
            Entity::FleshGolem(_) => EntityTag::FleshGolem,
            Entity::Adventurer(_) => EntityTag::Adventurer,
            Entity::Paladin(_) => EntityTag::Paladin,
            Entity::Priest(_) => EntityTag::Priest,
            Entity::Skull(_) => EntityTag::Skull,
            Entity::Ladder(_) => EntityTag::Ladder,
        }
    }

    pub fn hp(&self) -> Option<i32> {
        match self {
            Entity::Player(e) => Some(e.hp),
            Entity::Skeleton(e) => Some(e.hp),
            Entity::Wraith(e) => Some(e.hp),
            Entity::FleshGolem(e) => Some(e.hp),
            Entity::Adventurer(e) => Some(e.hp),
            Entity::Paladin(e) => Some(e.hp),
            Entity::Priest(e) => Some(e.hp),
            Entity::Skull(_) | Entity::Ladder(_) => None,
        }
    }
}

/// `{ kind, source, target }`: a command produced by `think()` (NPCs) or
/// by resolving a player intent, for the registry to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityCommandKind {
    None,
    Move,
    Clash,
    Consume,
    RandomWarp,
    TargetWarp,
    ConsumeWarp,
    CalciticInvocation,
    SpectralInvocation,
    SanguineInvocation,
    NecromanticAscendance,
    Exorcise,
    Resurrect,
    Anoint,
    SummonWraith,
    GrandSummoning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityCommand {
    pub kind: EntityCommandKind,
    pub source: Offset,
    pub target: Offset,
}

impl EntityCommand {
    pub fn new(kind: EntityCommandKind, source: Offset, target: Offset) -> EntityCommand {
        EntityCommand { kind, source, target }
    }

    pub fn none(source: Offset) -> EntityCommand {
        EntityCommand::new(EntityCommandKind::None, source, source)
    }
}

/// Running statistics for the current game, persisted across descents
/// (unlike the zone and registry, which are discarded each time).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameStats {
    pub game_depth: u32,
    pub player_kills: u32,
    pub minion_kills: u32,
    pub spawns_remaining: u32,
    pub wave_size: u32,
    pub turns_elapsed: u32,
    pub last_seed: u64,
}

impl GameStats {
    pub fn total_kills(&self) -> u32 {
        self.player_kills + self.minion_kills
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_kills_sums_player_and_minion_kills() {
        let stats = GameStats {
            player_kills: 3,
            minion_kills: 4,
            ..Default::default()
        };
        assert_eq!(stats.total_kills(), 7);
    }

    #[test]
    fn inanimate_variants_are_excluded_from_npc_dispatch() {
        assert!(!EntityTag::NPC_DISPATCH_ORDER.contains(&EntityTag::Skull));
        assert!(!EntityTag::NPC_DISPATCH_ORDER.contains(&EntityTag::Ladder));
        assert!(!EntityTag::NPC_DISPATCH_ORDER.contains(&EntityTag::Player));
    }

    #[test]
    fn faction_tags_are_mutually_exclusive() {
        for tag in EntityTag::NPC_DISPATCH_ORDER {
            assert_ne!(tag.is_good(), tag.is_evil());
        }
    }
}
