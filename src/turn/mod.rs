//! The deterministic turn pipeline: `MainMenu → Loading → Playing ↔ Paused
//! → GameOver → Exiting` (plus a `Credits` branch), generation, and the
//! per-turn sequence that drives the roguelike loop — player intent → NPC
//! think → command resolution → spawn/reinforce → goal-map refresh.

use anyhow::{anyhow, Result};

use crate::area::Area;
use crate::cell::{Cell, Trait};
use crate::composer;
use crate::entity::{
    AdventurerEntity, EntityCommand, EntityCommandKind, EntityTag, GameStats, LadderDirection, LadderEntity,
    PaladinEntity, PlayerEntity, PriestEntity,
};
use crate::fov::shadow_cast;
use crate::geometry::{Cardinal, Distance, Extent};
use crate::path::Field;
use crate::registry::Registry;
use crate::rng::{Generator, TernaryApplicator};
use crate::timers::{Clock, Timer};
use crate::worker::{StopFlag, Worker};
use crate::zone::{Region, Zone};
use std::time::Duration;

/// Tuning knobs for a fresh engine, grounded on the `--width`/`--height`/
/// `--fill`/`--iterations`/`--threshold`/`--wave-size` CLI options.
#[derive(Clone, Copy, Debug)]
pub struct GenerationOptions {
    pub extent: Extent,
    pub border: u32,
    pub fill: f64,
    pub iterations: u32,
    pub threshold: u8,
    pub min_component: usize,
    pub wave_size: u32,
}

impl Default for GenerationOptions {
    fn default() -> GenerationOptions {
        GenerationOptions {
            extent: Extent::new(48, 32),
            border: 1,
            fill: 0.45,
            iterations: 4,
            threshold: 5,
            min_component: 4,
            wave_size: 4,
        }
    }
}

/// How often (in descents) a reinforcement wave spawns outside the normal
/// per-turn top-up.
pub const FLOORS_PER_REINFORCEMENT: u32 = 5;

/// How many turns a freshly spawned entity is immune to interaction before
/// it starts acting and can be targeted.
pub const FRESH_SPAWN_IMMUNITY: u32 = 1;

/// The minimum interval between accepted player intents.
const EPOCH_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    MainMenu,
    Loading,
    Playing,
    Paused,
    GameOver,
    Credits,
    Exiting,
}

/// A player command, already decoded from whatever reads scancodes
/// (out of scope per spec §1/§6) into the engine's own vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerIntent {
    Move(Cardinal),
    Wait,
    RandomWarp,
    TargetWarp(crate::geometry::Offset),
    CalciticInvocation,
    SpectralInvocation,
    SanguineInvocation,
    NecromanticAscendance,
}

/// The pure zone/registry construction at the heart of `generate_level`,
/// factored out so it can run either inline or inside a `begin_generation`
/// worker thread. Checks `stop` between the CA pass and the collapse pass
/// — the two expensive steps — and bails out early (an `Err`, treated by
/// the caller the same as cancellation) if asked to stop.
fn build_level(opts: GenerationOptions, rng: &mut Generator, stop: &StopFlag) -> Result<(Zone<Cell>, Registry)> {
    let mut zone: Zone<Cell> = Zone::new(opts.extent, opts.border, Cell::OPEN, Cell::CLOSED);
    zone.set_region(Region::Border, Cell::CLOSED);
    zone.generate(
        Region::Interior,
        rng,
        opts.fill,
        opts.iterations,
        opts.threshold,
        |c| c.has(Trait::Solid),
        |solid| Cell::OPEN.with(Trait::Solid, solid),
    );
    if stop.is_set() {
        return Err(anyhow!("generation cancelled"));
    }
    zone.collapse(Region::Interior, |c| c.has(Trait::Solid), opts.min_component, Cell::OPEN);

    let open_area = composer::keep_largest_component(&mut zone, Region::Interior, Cell::CLOSED);
    if open_area.is_empty() {
        return Err(anyhow!("generation failure: no open cell for the player after CA and largest-component selection"));
    }
    if stop.is_set() {
        return Err(anyhow!("generation cancelled"));
    }

    let mut registry = Registry::new();
    let player_pos = zone
        .find_random(Region::Interior, rng, |c| !c.has(Trait::Solid))
        .ok_or_else(|| anyhow!("generation failure: no open cell for the player after CA and largest-component selection"))?;
    registry.set_player(PlayerEntity { offset: player_pos, hp: 10, max_hp: 10, armor: 0, energy: 3, max_energy: 3 });

    let down_candidate = zone.find_random(Region::Interior, rng, |c| !c.has(Trait::Solid));
    if let Some(down) = down_candidate {
        if down != player_pos {
            registry.add_ladder(LadderEntity { offset: down, direction: LadderDirection::Down, shackled: false });
        }
    }
    if let Some(up) = zone.find_random(Region::Interior, rng, |c| !c.has(Trait::Solid)) {
        if Some(up) != down_candidate && up != player_pos {
            registry.add_ladder(LadderEntity { offset: up, direction: LadderDirection::Up, shackled: false });
        }
    }

    Ok((zone, registry))
}

/// The engine's owned state: zone, registry, goal maps, RNG, stats, and
/// the phase the pipeline is currently in. The renderer and input layers
/// receive only immutable borrows for the duration of a frame.
pub struct Engine {
    pub phase: Phase,
    pub options: GenerationOptions,
    pub zone: Zone<Cell>,
    pub registry: Registry,
    pub stats: GameStats,
    pub good_field: Field,
    pub evil_field: Field,
    rng: Generator,
    clock: Clock,
    epoch: Timer,
    fresh_spawns: std::collections::HashMap<crate::geometry::Offset, u32>,
}

impl Engine {
    pub fn new(options: GenerationOptions, seed: Option<u64>) -> Result<Engine> {
        let rng = match seed {
            Some(s) => Generator::from_seed(s),
            None => Generator::from_entropy(),
        };
        log::info!("engine seed: {}", rng.seed());

        let mut engine = Engine {
            phase: Phase::Loading,
            options,
            zone: Zone::new(options.extent, options.border, Cell::OPEN, Cell::CLOSED),
            registry: Registry::new(),
            stats: GameStats { wave_size: options.wave_size, last_seed: rng.seed(), ..Default::default() },
            good_field: Field::build(options.extent, &[], Distance::Octile, |_| false, |_| false),
            evil_field: Field::build(options.extent, &[], Distance::Octile, |_| false, |_| false),
            rng,
            clock: Clock::new(),
            epoch: Timer::new(EPOCH_INTERVAL),
            fresh_spawns: std::collections::HashMap::new(),
        };
        engine.generate_level()?;
        engine.phase = Phase::Playing;
        Ok(engine)
    }

    /// (Re)generates the zone and registry for the current depth: border
    /// closed, cellular-automata interior, small-component collapse, then
    /// keep only the largest open component. Fails (fatal, per spec §7
    /// error kind 1) if no open cell remains for the player.
    fn generate_level(&mut self) -> Result<()> {
        let (zone, registry) = build_level(self.options, &mut self.rng, &StopFlag::new())?;
        self.zone = zone;
        self.registry = registry;
        self.fresh_spawns.clear();
        self.spawn_good_npcs(self.stats.wave_size);
        self.rebuild_goal_maps();
        Ok(())
    }

    /// Moves generation to a background worker (spec §5: "map generation
    /// during `Loading`... publishes them via a phase transition"),
    /// handing the RNG to the worker by move and getting it back through
    /// `finish_generation`. The engine's own `rng` field holds a throwaway
    /// placeholder seed until then — it must not be drawn from meanwhile.
    pub fn begin_generation(&mut self) -> Worker<(Zone<Cell>, Registry, Generator)> {
        self.phase = Phase::Loading;
        let options = self.options;
        let mut rng = std::mem::replace(&mut self.rng, Generator::from_seed(0));
        Worker::spawn(move |stop| match build_level(options, &mut rng, &stop) {
            Ok((zone, registry)) => Some((zone, registry, rng)),
            Err(err) => {
                log::error!("{err}");
                None
            }
        })
    }

    /// Joins a worker started by `begin_generation`, installing its result
    /// and returning `Playing`, or falling back to `MainMenu` if the
    /// worker was cancelled or the generation failed.
    pub fn finish_generation(&mut self, worker: Worker<(Zone<Cell>, Registry, Generator)>) -> bool {
        let Some((zone, registry, rng)) = worker.join() else {
            self.phase = Phase::MainMenu;
            return false;
        };
        self.zone = zone;
        self.registry = registry;
        self.rng = rng;
        self.fresh_spawns.clear();
        self.spawn_good_npcs(self.stats.wave_size);
        self.rebuild_goal_maps();
        self.phase = Phase::Playing;
        true
    }

    /// Spawns up to `count` good NPCs at unshackled up-ladders not already
    /// occupied by a good NPC; variant chosen by a depth-indexed
    /// categorical split (adventurer/paladin/priest frequencies shift with
    /// wave size, per spec §4.H).
    fn spawn_good_npcs(&mut self, count: u32) {
        let ladders: Vec<_> = self
            .registry
            .ladders()
            .filter(|(_, l)| l.direction == LadderDirection::Up && !l.shackled)
            .map(|(pos, _)| pos)
            .collect();

        let applicator = TernaryApplicator::new("adventurer", "paladin", "priest");
        let mut spawned = 0u32;
        for pos in ladders {
            if spawned >= count {
                break;
            }
            if self.registry.contains(pos) {
                continue;
            }
            let bound = (10 + self.stats.game_depth).min(100);
            let pivot = bound.saturating_sub(self.stats.game_depth.min(bound - 1)) / 2;
            match applicator.draw(&mut self.rng, bound, pivot) {
                "adventurer" => {
                    self.registry.add_adventurer(AdventurerEntity { offset: pos, hp: 6, armor: 0 });
                }
                "paladin" => {
                    self.registry.add_paladin(PaladinEntity { offset: pos, hp: 8, armor: 1, piety: 1 });
                }
                _ => {
                    self.registry.add_priest(PriestEntity { offset: pos, hp: 5, armor: 0, piety: 2 });
                }
            }
            self.fresh_spawns.insert(pos, FRESH_SPAWN_IMMUNITY);
            spawned += 1;
        }
        self.stats.spawns_remaining = count.saturating_sub(spawned);
    }

    /// Rebuilds the good-toward-player and evil-toward-good goal maps.
    /// Good NPCs descend `good_field` to reach the player; evil NPCs
    /// descend `evil_field` to reach the nearest good NPC.
    fn rebuild_goal_maps(&mut self) {
        let extent = self.zone.extent();
        let passable = |p: crate::geometry::Offset| !self.zone.get(p).has(Trait::Solid);

        let player_goal = self.registry.player().map(|p| vec![p.offset]).unwrap_or_default();
        self.good_field = Field::build(extent, &player_goal, Distance::Octile, passable, |_| false);

        let good_goals = self.registry.good_positions();
        self.evil_field = Field::build(extent, &good_goals, Distance::Octile, passable, |_| false);
    }

    /// Decodes a player intent into the `entity_command` the registry will
    /// resolve. Invocations/ascendance are self-targeted (their AoE is
    /// centred on the caster).
    fn resolve_intent(&mut self, intent: PlayerIntent) -> Option<EntityCommand> {
        let player = self.registry.player()?.offset;
        Some(match intent {
            PlayerIntent::Move(dir) => {
                let target = player + dir.to_offset();
                // Bump-to-attack: moving into an occupied cell clashes
                // instead of failing as a blocked move.
                if self.registry.contains(target) {
                    EntityCommand::new(EntityCommandKind::Clash, player, target)
                } else {
                    EntityCommand::new(EntityCommandKind::Move, player, target)
                }
            }
            PlayerIntent::Wait => EntityCommand::none(player),
            PlayerIntent::RandomWarp => {
                let target = self
                    .zone
                    .find_random(Region::Interior, &mut self.rng, |c| !c.has(Trait::Solid))
                    .unwrap_or(player);
                EntityCommand::new(EntityCommandKind::RandomWarp, player, target)
            }
            PlayerIntent::TargetWarp(target) => EntityCommand::new(EntityCommandKind::TargetWarp, player, target),
            PlayerIntent::CalciticInvocation => EntityCommand::new(EntityCommandKind::CalciticInvocation, player, player),
            PlayerIntent::SpectralInvocation => EntityCommand::new(EntityCommandKind::SpectralInvocation, player, player),
            PlayerIntent::SanguineInvocation => EntityCommand::new(EntityCommandKind::SanguineInvocation, player, player),
            PlayerIntent::NecromanticAscendance => {
                EntityCommand::new(EntityCommandKind::NecromanticAscendance, player, player)
            }
        })
    }

    /// An NPC's `think()`: clash with an adjacent opposing-faction entity,
    /// otherwise descend the faction's goal map, otherwise wait.
    fn think(&self, tag: EntityTag, pos: crate::geometry::Offset) -> EntityCommand {
        let (field, enemy_positions) = if tag.is_good() {
            let mut enemies = self.registry.evil_positions();
            if let Some(player) = self.registry.player() {
                enemies.push(player.offset);
            }
            (&self.good_field, enemies)
        } else {
            (&self.evil_field, self.registry.good_positions())
        };

        if let Some(&target) = enemy_positions.iter().find(|&&e| e.chebyshev(&pos) <= 1) {
            return EntityCommand::new(EntityCommandKind::Clash, pos, target);
        }

        match field.descend(pos, |p| self.registry.contains(p) && p != pos) {
            Some(next) => EntityCommand::new(EntityCommandKind::Move, pos, next),
            None => EntityCommand::none(pos),
        }
    }

    /// Resolves one full turn. `intent` is `None` when the epoch has not
    /// elapsed yet; the pipeline then sits idle and nothing advances.
    pub fn step(&mut self, intent: Option<PlayerIntent>) -> bool {
        self.step_with_stop(intent, &StopFlag::new())
    }

    /// Resolves `intent` immediately, ignoring the epoch throttle. The
    /// headless demo binary drives the engine from line-oriented commands
    /// rather than a polled frame loop, so there is no frame rate for the
    /// epoch to throttle against.
    pub fn force_step(&mut self, intent: PlayerIntent) -> bool {
        self.epoch = Timer::new(Duration::from_millis(0));
        self.step(Some(intent))
    }

    /// Moves a single turn's resolution to a background worker (spec §5:
    /// "the per-turn resolver, which is dispatched to a worker to keep the
    /// renderer responsive"). The whole engine is moved into the worker
    /// thread and handed back through `Worker::join`; no state is shared
    /// while the worker runs. Cancelling mid-turn via `Worker::request_stop`
    /// stops dispatch before the next NPC, leaving the already-resolved
    /// commands in place (spec §5's "no entity observes a partially-updated
    /// registry" still holds per-command, just not across the whole turn).
    pub fn begin_turn(mut self, intent: Option<PlayerIntent>) -> Worker<Engine> {
        Worker::spawn(move |stop| {
            self.step_with_stop(intent, &stop);
            Some(self)
        })
    }

    fn step_with_stop(&mut self, intent: Option<PlayerIntent>, stop: &StopFlag) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let now = self.clock.now();
        if !self.epoch.ready(now) {
            return false;
        }
        let Some(intent) = intent else { return false };
        self.epoch.record(now);

        if let Some(cmd) = self.resolve_intent(intent) {
            let good_before = self.registry.good_positions().len();
            self.registry.process_command(cmd, &self.zone, true);
            let good_after = self.registry.good_positions().len();
            if good_after < good_before {
                self.stats.player_kills += 1;
            }
        }

        if self.registry.player().is_none() {
            self.phase = Phase::GameOver;
            return true;
        }

        for pos in self.registry.animate_npcs_in_dispatch_order() {
            if stop.is_set() {
                return true;
            }
            if self.is_fresh(pos) {
                continue;
            }
            let Some(tag) = self.registry.at(pos) else { continue };
            let cmd = self.think(tag, pos);
            let before_good = self.registry.good_positions().len();
            self.registry.process_command(cmd, &self.zone, false);
            let after_good = self.registry.good_positions().len();
            if tag.is_evil() && after_good < before_good {
                self.stats.minion_kills += 1;
            }
        }

        let remaining = self.stats.wave_size.saturating_sub(self.registry.live_good_npc_count() as u32);
        self.spawn_good_npcs(remaining);

        if self.stats.game_depth > 0 && self.stats.game_depth % FLOORS_PER_REINFORCEMENT == 0 && self.stats.turns_elapsed == 0 {
            self.spawn_good_npcs(2);
        }

        self.rebuild_goal_maps();
        self.advance_fresh_spawns();
        self.stats.turns_elapsed += 1;

        if let Some(player) = self.registry.player() {
            if let Some(ladder) = self.registry.ladder_at(player.offset) {
                if ladder.direction == LadderDirection::Down {
                    let _ = self.descend();
                }
            }
        }

        true
    }

    fn is_fresh(&self, pos: crate::geometry::Offset) -> bool {
        self.fresh_spawns.get(&pos).is_some_and(|&n| n > 0)
    }

    /// Advances fresh-spawn immunity counters, promoting spawns to acting
    /// entities once their timer elapses.
    fn advance_fresh_spawns(&mut self) {
        self.fresh_spawns.retain(|_, remaining| {
            *remaining -= 1;
            *remaining > 0
        });
    }

    /// Transitions `Playing → Loading`, increments `game_depth`, discards
    /// the zone and registry (keeping `stats`), and regenerates.
    pub fn descend(&mut self) -> Result<()> {
        self.phase = Phase::Loading;
        self.stats.game_depth += 1;
        self.stats.turns_elapsed = 0;
        self.generate_level()?;
        self.phase = Phase::Playing;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
        }
    }

    pub fn visible_from(&self, origin: crate::geometry::Offset, radius: u32) -> Area {
        shadow_cast(origin, radius, None, |p| !self.zone.get(p).has(Trait::Opaque))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_options() -> GenerationOptions {
        GenerationOptions {
            extent: Extent::new(20, 20),
            border: 1,
            fill: 0.4,
            iterations: 3,
            threshold: 5,
            min_component: 3,
            wave_size: 2,
        }
    }

    #[test]
    fn new_engine_starts_in_playing_with_a_live_player() {
        let engine = Engine::new(small_options(), Some(1)).expect("generation should succeed");
        assert_eq!(engine.phase, Phase::Playing);
        assert!(engine.registry.player().is_some());
    }

    #[test]
    fn border_cells_are_always_solid_and_opaque() {
        let engine = Engine::new(small_options(), Some(2)).expect("generation should succeed");
        for (_, tile) in engine.zone.iter_region(Region::Border) {
            assert!(tile.has(Trait::Solid));
            assert!(tile.has(Trait::Opaque));
        }
    }

    #[test]
    fn descending_increments_depth_and_regenerates() {
        let mut engine = Engine::new(small_options(), Some(3)).expect("generation should succeed");
        let depth_before = engine.stats.game_depth;
        engine.descend().expect("descent should regenerate");
        assert_eq!(engine.stats.game_depth, depth_before + 1);
        assert_eq!(engine.phase, Phase::Playing);
        assert!(engine.registry.player().is_some());
    }

    #[test]
    fn same_seed_produces_the_same_player_spawn() {
        let a = Engine::new(small_options(), Some(99)).unwrap();
        let b = Engine::new(small_options(), Some(99)).unwrap();
        assert_eq!(a.registry.player().unwrap().offset, b.registry.player().unwrap().offset);
    }

    #[test]
    fn background_generation_publishes_the_same_result_as_inline_generation() {
        let mut engine = Engine::new(small_options(), Some(42)).unwrap();
        let worker = engine.begin_generation();
        assert!(engine.finish_generation(worker));
        assert_eq!(engine.phase, Phase::Playing);
        assert!(engine.registry.player().is_some());
    }

    #[test]
    fn background_turn_returns_the_engine_with_the_turn_resolved() {
        let mut engine = Engine::new(small_options(), Some(7)).unwrap();
        engine.epoch = Timer::new(Duration::from_millis(0));
        let worker = engine.begin_turn(Some(PlayerIntent::Wait));
        let resolved = worker.join().expect("uncancelled turn should publish the engine");
        assert_eq!(resolved.stats.turns_elapsed, 1);
    }
}
