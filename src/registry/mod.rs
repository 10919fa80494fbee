//! The sparse, typed entity registry: one map per variant keyed by offset,
//! a reverse `position → variant_tag` index enforcing the cross-variant
//! uniqueness invariant, and the command dispatcher that resolves a single
//! `EntityCommand` against the live game state.

use std::collections::HashMap;

use rand::RngCore;

use crate::cell::{Cell, Trait};
use crate::entity::{
    AdventurerEntity, Entity, EntityCommand, EntityCommandKind, EntityId, EntityTag, FleshGolemEntity, LadderEntity,
    PaladinEntity, PlayerEntity, PriestEntity, SkeletonEntity, SkullEntity, WraithEntity,
};
use crate::geometry::Offset;
use crate::zone::{Region, Zone};

/// Energy costs and AoE radii for the invocation family. These are the
/// engine's game-balance constants, not spec-mandated values, save for the
/// sanguine cost (spec §8 scenario 6 fixes it at 3).
pub const CALCITIC_COST: i32 = 2;
pub const CALCITIC_RADIUS: u32 = 2;
pub const SPECTRAL_COST: i32 = 3;
pub const SPECTRAL_RADIUS: u32 = 2;
pub const SANGUINE_COST: i32 = 3;
pub const SANGUINE_RADIUS: u32 = 2;
pub const GRAND_SUMMONING_COST: i32 = 6;
pub const GRAND_SUMMONING_RADIUS: u32 = 4;
const CLASH_DAMAGE: i32 = 2;

/// Per-variant sparse map keyed by offset, plus the reverse index that
/// makes `at`/`contains` O(1) without scanning every variant.
///
/// Ladders are tracked separately, outside the uniqueness-enforcing
/// `reverse` index: they are inanimate terrain features a player or NPC
/// stands *on*, not an occupant competing for the tile, so stepping onto a
/// down-ladder must not be rejected as "occupied". `at`/`contains` never
/// report a ladder; look one up at a position with `ladder_at`.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    player: Option<PlayerEntity>,
    skeletons: HashMap<Offset, (EntityId, SkeletonEntity)>,
    wraiths: HashMap<Offset, (EntityId, WraithEntity)>,
    flesh_golems: HashMap<Offset, (EntityId, FleshGolemEntity)>,
    adventurers: HashMap<Offset, (EntityId, AdventurerEntity)>,
    paladins: HashMap<Offset, (EntityId, PaladinEntity)>,
    priests: HashMap<Offset, (EntityId, PriestEntity)>,
    skulls: HashMap<Offset, (EntityId, SkullEntity)>,
    ladders: HashMap<Offset, LadderEntity>,
    reverse: HashMap<Offset, EntityTag>,
    next_id: u32,
}

/// Generates `add_*`/`remove_*` pairs for one variant's sparse map. Each
/// pair enforces the cross-variant uniqueness invariant through `reverse`
/// before touching the variant's own map.
macro_rules! variant_ops {
    ($add:ident, $remove:ident, $field:ident, $tag:expr, $ty:ty) => {
        pub fn $add(&mut self, entity: $ty) -> bool {
            if self.contains(entity.offset) {
                return false;
            }
            let id = self.fresh_id();
            self.reverse.insert(entity.offset, $tag);
            self.$field.insert(entity.offset, (id, entity));
            true
        }

        fn $remove(&mut self, pos: Offset) -> Option<$ty> {
            let (_, entity) = self.$field.remove(&pos)?;
            self.reverse.remove(&pos);
            Some(entity)
        }
    };
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    fn fresh_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The variant tag occupying `pos`, if any.
    pub fn at(&self, pos: Offset) -> Option<EntityTag> {
        self.reverse.get(&pos).copied()
    }

    pub fn contains(&self, pos: Offset) -> bool {
        self.reverse.contains_key(&pos)
    }

    /// Whether `pos` is occupied by any variant in `mask`.
    pub fn contains_mask(&self, pos: Offset, mask: &[EntityTag]) -> bool {
        self.at(pos).is_some_and(|tag| mask.contains(&tag))
    }

    /// Reconstructs the full `Entity` at `pos`, dispatching by its
    /// registered tag.
    pub fn entity_at(&self, pos: Offset) -> Option<Entity> {
        match self.at(pos)? {
            EntityTag::Player => self.player.map(Entity::Player),
            EntityTag::Skeleton => self.skeletons.get(&pos).map(|(_, e)| Entity::Skeleton(*e)),
            EntityTag::Wraith => self.wraiths.get(&pos).map(|(_, e)| Entity::Wraith(*e)),
            EntityTag::FleshGolem => self.flesh_golems.get(&pos).map(|(_, e)| Entity::FleshGolem(*e)),
            EntityTag::Adventurer => self.adventurers.get(&pos).map(|(_, e)| Entity::Adventurer(*e)),
            EntityTag::Paladin => self.paladins.get(&pos).map(|(_, e)| Entity::Paladin(*e)),
            EntityTag::Priest => self.priests.get(&pos).map(|(_, e)| Entity::Priest(*e)),
            EntityTag::Skull => self.skulls.get(&pos).map(|(_, e)| Entity::Skull(*e)),
            // `reverse` never maps a position to `Ladder` (see struct doc comment),
            // so `self.at(pos)` can never yield this tag. Kept for exhaustiveness.
            EntityTag::Ladder => None,
        }
    }

    /// The ladder at `pos`, if any. Ladders are not part of the
    /// occupancy-uniqueness system (see the struct doc comment), so this
    /// is the only way to find one.
    pub fn ladder_at(&self, pos: Offset) -> Option<LadderEntity> {
        self.ladders.get(&pos).copied()
    }

    /// Registers a ladder at `entity.offset`. Fails only if another
    /// ladder already occupies that position — it does not consult the
    /// occupant uniqueness index.
    pub fn add_ladder(&mut self, entity: LadderEntity) -> bool {
        if self.ladders.contains_key(&entity.offset) {
            return false;
        }
        self.ladders.insert(entity.offset, entity);
        true
    }

    pub fn player(&self) -> Option<&PlayerEntity> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerEntity> {
        self.player.as_mut()
    }

    /// Inserts the player. Fails (and reports `false`) if the cell is
    /// already occupied, same as any other variant's insertion.
    pub fn set_player(&mut self, player: PlayerEntity) -> bool {
        if self.contains(player.offset) {
            return false;
        }
        self.reverse.insert(player.offset, EntityTag::Player);
        self.player = Some(player);
        true
    }

    variant_ops!(add_skeleton, remove_skeleton, skeletons, EntityTag::Skeleton, SkeletonEntity);
    variant_ops!(add_wraith, remove_wraith, wraiths, EntityTag::Wraith, WraithEntity);
    variant_ops!(add_flesh_golem, remove_flesh_golem, flesh_golems, EntityTag::FleshGolem, FleshGolemEntity);
    variant_ops!(add_adventurer, remove_adventurer, adventurers, EntityTag::Adventurer, AdventurerEntity);
    variant_ops!(add_paladin, remove_paladin, paladins, EntityTag::Paladin, PaladinEntity);
    variant_ops!(add_priest, remove_priest, priests, EntityTag::Priest, PriestEntity);
    variant_ops!(add_skull, remove_skull, skulls, EntityTag::Skull, SkullEntity);

    /// Destroys whatever occupies `pos`, returning it. A no-op (returns
    /// `None`) if `pos` is empty.
    pub fn destroy_at(&mut self, pos: Offset) -> Option<Entity> {
        match self.at(pos)? {
            EntityTag::Player => {
                let entity = self.player.take()?;
                self.reverse.remove(&pos);
                Some(Entity::Player(entity))
            }
            EntityTag::Skeleton => self.remove_skeleton(pos).map(Entity::Skeleton),
            EntityTag::Wraith => self.remove_wraith(pos).map(Entity::Wraith),
            EntityTag::FleshGolem => self.remove_flesh_golem(pos).map(Entity::FleshGolem),
            EntityTag::Adventurer => self.remove_adventurer(pos).map(Entity::Adventurer),
            EntityTag::Paladin => self.remove_paladin(pos).map(Entity::Paladin),
            EntityTag::Priest => self.remove_priest(pos).map(Entity::Priest),
            EntityTag::Skull => self.remove_skull(pos).map(Entity::Skull),
            EntityTag::Ladder => None,
        }
    }

    /// Rewrites the key of whatever occupies `from` to `to`. Fails if
    /// `from` is empty or `to` is already occupied, leaving both cells
    /// untouched.
    pub fn relocate(&mut self, from: Offset, to: Offset) -> bool {
        if from == to {
            return self.contains(from);
        }
        if self.contains(to) {
            return false;
        }
        let Some(tag) = self.at(from) else {
            return false;
        };

        macro_rules! shift {
            ($field:ident) => {{
                if let Some((id, mut entity)) = self.$field.remove(&from) {
                    entity.offset = to;
                    self.$field.insert(to, (id, entity));
                }
            }};
        }

        match tag {
            EntityTag::Player => {
                if let Some(mut p) = self.player {
                    p.offset = to;
                    self.player = Some(p);
                }
            }
            EntityTag::Skeleton => shift!(skeletons),
            EntityTag::Wraith => shift!(wraiths),
            EntityTag::FleshGolem => shift!(flesh_golems),
            EntityTag::Adventurer => shift!(adventurers),
            EntityTag::Paladin => shift!(paladins),
            EntityTag::Priest => shift!(priests),
            EntityTag::Skull => shift!(skulls),
            EntityTag::Ladder => unreachable!("reverse never maps a position to Ladder"),
        }
        self.reverse.remove(&from);
        self.reverse.insert(to, tag);
        true
    }

    /// Animate NPCs in dispatch order: by variant tag priority, then by
    /// spawn-order insertion within the variant.
    pub fn animate_npcs_in_dispatch_order(&self) -> Vec<Offset> {
        let mut ordered = Vec::new();
        for tag in EntityTag::NPC_DISPATCH_ORDER {
            let mut entries: Vec<(EntityId, Offset)> = match tag {
                EntityTag::Skeleton => self.skeletons.iter().map(|(p, (id, _))| (*id, *p)).collect(),
                EntityTag::Wraith => self.wraiths.iter().map(|(p, (id, _))| (*id, *p)).collect(),
                EntityTag::FleshGolem => self.flesh_golems.iter().map(|(p, (id, _))| (*id, *p)).collect(),
                EntityTag::Adventurer => self.adventurers.iter().map(|(p, (id, _))| (*id, *p)).collect(),
                EntityTag::Paladin => self.paladins.iter().map(|(p, (id, _))| (*id, *p)).collect(),
                EntityTag::Priest => self.priests.iter().map(|(p, (id, _))| (*id, *p)).collect(),
                EntityTag::Player | EntityTag::Skull | EntityTag::Ladder => continue,
            };
            entries.sort_by_key(|(id, _)| *id);
            ordered.extend(entries.into_iter().map(|(_, pos)| pos));
        }
        ordered
    }

    pub fn live_good_npc_count(&self) -> usize {
        self.adventurers.len() + self.paladins.len() + self.priests.len()
    }

    pub fn skulls(&self) -> impl Iterator<Item = (Offset, SkullEntity)> + '_ {
        self.skulls.iter().map(|(p, (_, e))| (*p, *e))
    }

    pub fn ladders(&self) -> impl Iterator<Item = (Offset, LadderEntity)> + '_ {
        self.ladders.iter().map(|(p, e)| (*p, *e))
    }

    pub fn evil_positions(&self) -> Vec<Offset> {
        self.skeletons
            .keys()
            .chain(self.wraiths.keys())
            .chain(self.flesh_golems.keys())
            .copied()
            .collect()
    }

    pub fn good_positions(&self) -> Vec<Offset> {
        self.adventurers
            .keys()
            .chain(self.paladins.keys())
            .chain(self.priests.keys())
            .copied()
            .collect()
    }

    /// Chooses up to `count` random open interior cells with pairwise
    /// Chebyshev distance `≥ min_distance` and at least `min_distance` from
    /// `player`. Cells already occupied are never candidates.
    pub fn spawn_points(
        &self,
        zone: &Zone<Cell>,
        rng: &mut impl RngCore,
        count: usize,
        min_distance: u32,
        player: Offset,
    ) -> Vec<Offset> {
        let mut candidates: Vec<Offset> = zone
            .iter_region(Region::Interior)
            .filter(|(pos, tile)| !tile.has(Trait::Solid) && !self.contains(*pos) && pos.chebyshev(&player) >= min_distance)
            .map(|(pos, _)| pos)
            .collect();

        use rand::seq::SliceRandom;
        candidates.shuffle(rng);

        let mut chosen: Vec<Offset> = Vec::new();
        for candidate in candidates {
            if chosen.len() == count {
                break;
            }
            if chosen.iter().all(|&c| c.chebyshev(&candidate) >= min_distance) {
                chosen.push(candidate);
            }
        }
        chosen
    }

    /// Resolves one command. Returns whether the command was legal (and so
    /// consumed the actor's turn) per spec §4.G/§7: illegal commands never
    /// consume a turn, legal commands always do even with a nil effect.
    pub fn process_command(&mut self, cmd: EntityCommand, zone: &Zone<Cell>, player_kill: bool) -> bool {
        match cmd.kind {
            EntityCommandKind::None => true,
            EntityCommandKind::Move => self.process_move(cmd, zone),
            EntityCommandKind::Clash => self.process_clash(cmd, player_kill),
            EntityCommandKind::Consume => self.process_consume(cmd),
            EntityCommandKind::RandomWarp | EntityCommandKind::TargetWarp => self.process_warp(cmd, zone, false),
            EntityCommandKind::ConsumeWarp => self.process_warp(cmd, zone, true),
            EntityCommandKind::CalciticInvocation => {
                self.process_invocation(cmd, CALCITIC_COST, CALCITIC_RADIUS, &|reg, pos, _| {
                    reg.add_skeleton(SkeletonEntity { offset: pos, hp: 6, armor: 0 })
                })
            }
            EntityCommandKind::SpectralInvocation => {
                self.process_invocation(cmd, SPECTRAL_COST, SPECTRAL_RADIUS, &|reg, pos, _| {
                    reg.add_wraith(WraithEntity { offset: pos, hp: 8, armor: 1 })
                })
            }
            EntityCommandKind::SanguineInvocation => {
                self.process_invocation(cmd, SANGUINE_COST, SANGUINE_RADIUS, &|reg, pos, _| {
                    reg.add_wraith(WraithEntity { offset: pos, hp: 8, armor: 1 })
                })
            }
            EntityCommandKind::GrandSummoning => {
                self.process_invocation(cmd, GRAND_SUMMONING_COST, GRAND_SUMMONING_RADIUS, &|reg, pos, _| {
                    reg.add_flesh_golem(FleshGolemEntity { offset: pos, hp: 14, armor: 2 })
                })
            }
            EntityCommandKind::NecromanticAscendance => self.process_ascendance(cmd),
            EntityCommandKind::Exorcise => self.process_exorcise(cmd),
            EntityCommandKind::Resurrect => self.process_resurrect(cmd),
            EntityCommandKind::Anoint => self.process_anoint(cmd),
            EntityCommandKind::SummonWraith => {
                if self.contains(cmd.target) || zone.get(cmd.target).has(Trait::Solid) || !zone.within(Region::Interior, cmd.target) {
                    false
                } else {
                    self.add_wraith(WraithEntity { offset: cmd.target, hp: 8, armor: 1 })
                }
            }
        }
    }

    fn process_move(&mut self, cmd: EntityCommand, zone: &Zone<Cell>) -> bool {
        if !zone.within(Region::Interior, cmd.target) {
            return false;
        }
        if zone.get(cmd.target).has(Trait::Solid) {
            return false;
        }
        if self.contains(cmd.target) {
            return false;
        }
        self.relocate(cmd.source, cmd.target)
    }

    /// Clash: the attacker at `cmd.source` damages the defender at
    /// `cmd.target`. A lethal blow destroys the defender and, if it was a
    /// good variant, drops a Skull — fresh if the player landed the blow,
    /// rotted if a minion did (spec §4.G: "fresh vs rotted depending on
    /// source").
    fn process_clash(&mut self, cmd: EntityCommand, credit_player: bool) -> bool {
        if !self.contains(cmd.source) || !self.contains(cmd.target) {
            return false;
        }
        let Some(defender) = self.entity_at(cmd.target) else {
            return false;
        };
        let armor = match &defender {
            Entity::Player(e) => e.armor,
            Entity::Skeleton(e) => e.armor,
            Entity::Wraith(e) => e.armor,
            Entity::FleshGolem(e) => e.armor,
            Entity::Adventurer(e) => e.armor,
            Entity::Paladin(e) => e.armor,
            Entity::Priest(e) => e.armor,
            Entity::Skull(_) | Entity::Ladder(_) => return false,
        };
        let damage = (CLASH_DAMAGE - armor).max(0);
        let remaining_hp = defender.hp().unwrap_or(0) - damage;

        if remaining_hp > 0 {
            self.apply_damage(cmd.target, damage);
            return true;
        }

        let was_good = defender.tag().is_good();
        self.destroy_at(cmd.target);
        if was_good {
            self.add_skull(SkullEntity { offset: cmd.target, fresh: credit_player });
        }
        true
    }

    fn apply_damage(&mut self, pos: Offset, damage: i32) {
        macro_rules! hit {
            ($map:ident) => {
                if let Some((_, e)) = self.$map.get_mut(&pos) {
                    e.hp -= damage;
                    return;
                }
            };
        }
        if let Some(p) = self.player.as_mut() {
            if p.offset == pos {
                p.hp -= damage;
                return;
            }
        }
        hit!(skeletons);
        hit!(wraiths);
        hit!(flesh_golems);
        hit!(adventurers);
        hit!(paladins);
        hit!(priests);
    }

    /// Consume: the caster at `cmd.source` destroys a Skull at `cmd.target`
    /// and is credited for it (a simple way for minions to clean up the
    /// battlefield between invocations).
    fn process_consume(&mut self, cmd: EntityCommand) -> bool {
        if !self.contains(cmd.source) {
            return false;
        }
        if self.at(cmd.target) != Some(EntityTag::Skull) {
            return false;
        }
        self.destroy_at(cmd.target);
        true
    }

    fn process_warp(&mut self, cmd: EntityCommand, zone: &Zone<Cell>, consume: bool) -> bool {
        if !zone.within(Region::Interior, cmd.target) {
            return false;
        }
        if zone.get(cmd.target).has(Trait::Solid) {
            return false;
        }
        if consume {
            if self.at(cmd.target).is_none() {
                return false;
            }
            self.destroy_at(cmd.target);
        } else if self.contains(cmd.target) {
            return false;
        }
        self.relocate(cmd.source, cmd.target)
    }

    /// Converts every fresh Skull within `radius` (Chebyshev) of
    /// `cmd.source` via `make`, paying `cost` energy once up front. A
    /// no-op (and the command stays illegal) if the caster lacks the
    /// energy or no eligible Skull is in range.
    fn process_invocation(
        &mut self,
        cmd: EntityCommand,
        cost: i32,
        radius: u32,
        make: &dyn Fn(&mut Registry, Offset, bool) -> bool,
    ) -> bool {
        let Some(player) = self.player else { return false };
        if player.offset != cmd.source || player.energy < cost {
            return false;
        }
        let eligible: Vec<Offset> = self
            .skulls()
            .filter(|(pos, skull)| skull.fresh && pos.chebyshev(&cmd.source) <= radius)
            .map(|(pos, _)| pos)
            .collect();
        if eligible.is_empty() {
            return false;
        }

        for pos in &eligible {
            let fresh = self.skulls.get(pos).map(|(_, s)| s.fresh).unwrap_or(false);
            self.remove_skull(*pos);
            make(self, *pos, fresh);
        }

        self.player.as_mut().unwrap().energy -= cost;
        true
    }

    /// An ultimate ability: fully restores the player's energy. Gated on
    /// having at least one point of energy already spent, so it can never
    /// fire as a nil no-op that still consumes the turn for free.
    fn process_ascendance(&mut self, cmd: EntityCommand) -> bool {
        let Some(player) = self.player.as_mut() else { return false };
        if player.offset != cmd.source || player.energy >= player.max_energy {
            return false;
        }
        player.energy = player.max_energy;
        true
    }

    /// A good-faction ability: destroys an evil entity at `cmd.target`
    /// within melee range of `cmd.source`, crediting a minion kill.
    fn process_exorcise(&mut self, cmd: EntityCommand) -> bool {
        if cmd.source.chebyshev(&cmd.target) > 1 {
            return false;
        }
        let Some(tag) = self.at(cmd.target) else { return false };
        if !tag.is_evil() {
            return false;
        }
        self.destroy_at(cmd.target);
        true
    }

    /// A Priest ability: converts a rotted Skull back into an Adventurer,
    /// spending the caster's piety.
    fn process_resurrect(&mut self, cmd: EntityCommand) -> bool {
        if self.at(cmd.target) != Some(EntityTag::Skull) {
            return false;
        }
        let has_piety = match self.at(cmd.source) {
            Some(EntityTag::Priest) => self.priests.get(&cmd.source).is_some_and(|(_, p)| p.piety > 0),
            Some(EntityTag::Paladin) => self.paladins.get(&cmd.source).is_some_and(|(_, p)| p.piety > 0),
            _ => false,
        };
        if !has_piety {
            return false;
        }
        self.destroy_at(cmd.target);
        self.add_adventurer(AdventurerEntity { offset: cmd.target, hp: 6, armor: 0 });
        match self.at(cmd.source) {
            Some(EntityTag::Priest) => {
                if let Some((_, p)) = self.priests.get_mut(&cmd.source) {
                    p.piety -= 1;
                }
            }
            Some(EntityTag::Paladin) => {
                if let Some((_, p)) = self.paladins.get_mut(&cmd.source) {
                    p.piety -= 1;
                }
            }
            _ => {}
        }
        true
    }

    /// A Paladin ability: grants one point of armor to a good ally at
    /// `cmd.target`, spending one piety.
    fn process_anoint(&mut self, cmd: EntityCommand) -> bool {
        let Some((_, paladin)) = self.paladins.get(&cmd.source) else { return false };
        if paladin.piety <= 0 {
            return false;
        }
        let Some(tag) = self.at(cmd.target) else { return false };
        if !tag.is_good() {
            return false;
        }
        match tag {
            EntityTag::Adventurer => {
                self.adventurers.get_mut(&cmd.target).unwrap().1.armor += 1;
            }
            EntityTag::Paladin => {
                self.paladins.get_mut(&cmd.target).unwrap().1.armor += 1;
            }
            EntityTag::Priest => {
                self.priests.get_mut(&cmd.target).unwrap().1.armor += 1;
            }
            _ => return false,
        }
        self.paladins.get_mut(&cmd.source).unwrap().1.piety -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Extent;

    fn open_zone() -> Zone<Cell> {
        Zone::new(Extent::new(10, 10), 1, Cell::OPEN, Cell::CLOSED)
    }

    fn player_at(pos: Offset) -> PlayerEntity {
        PlayerEntity { offset: pos, hp: 10, max_hp: 10, armor: 0, energy: 3, max_energy: 3 }
    }

    #[test]
    fn at_most_one_entity_per_offset_across_variants() {
        let mut reg = Registry::new();
        assert!(reg.set_player(player_at(Offset::new(2, 2))));
        assert!(!reg.add_skeleton(SkeletonEntity { offset: Offset::new(2, 2), hp: 6, armor: 0 }));
        assert_eq!(reg.at(Offset::new(2, 2)), Some(EntityTag::Player));
    }

    #[test]
    fn illegal_move_is_a_no_op_and_reports_false() {
        let zone = open_zone();
        let mut reg = Registry::new();
        reg.set_player(player_at(Offset::new(2, 2)));
        reg.add_skeleton(SkeletonEntity { offset: Offset::new(3, 2), hp: 6, armor: 0 });

        let blocked_move = EntityCommand::new(EntityCommandKind::Move, Offset::new(2, 2), Offset::new(3, 2));
        assert!(!reg.process_command(blocked_move, &zone, false));
        assert_eq!(reg.player().unwrap().offset, Offset::new(2, 2));
    }

    #[test]
    fn legal_move_relocates_the_player() {
        let zone = open_zone();
        let mut reg = Registry::new();
        reg.set_player(player_at(Offset::new(2, 2)));

        let mv = EntityCommand::new(EntityCommandKind::Move, Offset::new(2, 2), Offset::new(3, 2));
        assert!(reg.process_command(mv, &zone, false));
        assert_eq!(reg.player().unwrap().offset, Offset::new(3, 2));
        assert!(reg.at(Offset::new(2, 2)).is_none());
    }

    #[test]
    fn sanguine_invocation_converts_eligible_skulls_and_spends_energy() {
        let zone = open_zone();
        let mut reg = Registry::new();
        reg.set_player(player_at(Offset::new(5, 5)));
        reg.add_skull(SkullEntity { offset: Offset::new(5, 4), fresh: true });
        reg.add_skull(SkullEntity { offset: Offset::new(6, 5), fresh: true });

        let cmd = EntityCommand::new(EntityCommandKind::SanguineInvocation, Offset::new(5, 5), Offset::new(5, 5));
        assert!(reg.process_command(cmd, &zone, false));
        assert_eq!(reg.player().unwrap().energy, 0);
        assert_eq!(reg.skulls().count(), 0);
        assert_eq!(reg.evil_positions().len(), 2);

        // same command again: no energy left, no eligible skulls either way.
        assert!(!reg.process_command(cmd, &zone, false));
    }

    #[test]
    fn clash_that_kills_a_good_entity_drops_a_skull() {
        let zone = open_zone();
        let mut reg = Registry::new();
        reg.set_player(player_at(Offset::new(5, 5)));
        reg.add_adventurer(AdventurerEntity { offset: Offset::new(5, 4), hp: 1, armor: 0 });

        let cmd = EntityCommand::new(EntityCommandKind::Clash, Offset::new(5, 5), Offset::new(5, 4));
        assert!(reg.process_command(cmd, &zone, true));
        assert_eq!(reg.at(Offset::new(5, 4)), Some(EntityTag::Skull));
    }

    #[test]
    fn dispatch_order_lists_evil_before_good() {
        let mut reg = Registry::new();
        reg.add_adventurer(AdventurerEntity { offset: Offset::new(1, 1), hp: 6, armor: 0 });
        reg.add_skeleton(SkeletonEntity { offset: Offset::new(2, 2), hp: 6, armor: 0 });
        let order = reg.animate_npcs_in_dispatch_order();
        assert_eq!(order, vec![Offset::new(2, 2), Offset::new(1, 1)]);
    }
}
