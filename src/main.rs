use anyhow::{anyhow, Error, Result};
use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_warrencore::prelude::*;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let options = EngineOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            _ => AdaptiveFormat::Default,
        })
        .start()?;

    WarrenServer::new(options).run()
}

/// A tiny line-oriented command protocol driving one `Engine` per session,
/// grounded on the teacher's `LTPServer::apply`: each line resolves at
/// most one player turn and prints the resulting render plus `GameStats`.
struct WarrenServer {
    options: EngineOptions,
    engine: Option<Engine>,
}

impl WarrenServer {
    fn new(options: EngineOptions) -> WarrenServer {
        WarrenServer { options, engine: None }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                return Ok(());
            }
            let args: Vec<&str> = line.split_whitespace().collect();
            let cmd = *args.first().unwrap_or(&"");
            if cmd == "quit" {
                return Ok(());
            }

            match self.apply(cmd, &args[1..]) {
                Ok(()) => log::debug!("command completed successfully: {cmd} {}", args[1..].join(" ")),
                Err(err) => {
                    log::warn!("recoverable error: {err}");
                    println!("err {err}");
                }
            }
        }
    }

    fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        match cmd {
            "" => Ok(()),
            "new" => self.new_game(args),
            "look" => self.look(),
            "move" => self.move_player(args),
            "wait" => self.turn(PlayerIntent::Wait),
            "warp" => self.warp(args),
            "invoke" => self.invoke(args),
            "ascend" => self.turn(PlayerIntent::NecromanticAscendance),
            _ => Err(anyhow!("unrecognized command {cmd}")),
        }
    }

    fn new_game(&mut self, args: &[&str]) -> Result<()> {
        let seed = args.first().map(|s| s.parse::<u64>()).transpose()?.or(self.options.seed);
        self.engine = Some(Engine::new(self.options.generation_options(), seed)?);
        self.look()
    }

    fn ensure_started(&mut self) -> Result<&mut Engine> {
        self.engine.as_mut().ok_or_else(|| anyhow!("no game in progress; use 'new' first"))
    }

    fn move_player(&mut self, args: &[&str]) -> Result<()> {
        let dir = parse_direction(args.first().copied().unwrap_or(""))?;
        self.turn(PlayerIntent::Move(dir))
    }

    fn warp(&mut self, args: &[&str]) -> Result<()> {
        match args {
            ["random"] => self.turn(PlayerIntent::RandomWarp),
            ["target", x, y] => {
                let target = Offset::new(x.parse()?, y.parse()?);
                self.turn(PlayerIntent::TargetWarp(target))
            }
            _ => Err(anyhow!("usage: warp random | warp target <x> <y>")),
        }
    }

    fn invoke(&mut self, args: &[&str]) -> Result<()> {
        match args.first().copied().unwrap_or("") {
            "calcitic" => self.turn(PlayerIntent::CalciticInvocation),
            "spectral" => self.turn(PlayerIntent::SpectralInvocation),
            "sanguine" => self.turn(PlayerIntent::SanguineInvocation),
            other => Err(anyhow!("unrecognized invocation {other}")),
        }
    }

    fn turn(&mut self, intent: PlayerIntent) -> Result<()> {
        self.ensure_started()?.force_step(intent);
        self.look()
    }

    fn look(&mut self) -> Result<()> {
        let engine = self.ensure_started()?;
        println!("{}", render(engine));
        let stats = engine.stats;
        println!(
            "depth {} turns {} player_kills {} minion_kills {} spawns_remaining {} seed {}",
            stats.game_depth, stats.turns_elapsed, stats.player_kills, stats.minion_kills, stats.spawns_remaining, stats.last_seed
        );
        Ok(())
    }
}

/// Renders the zone the player can currently see: `@` for the player, a
/// glyph per NPC variant, `#`/`.` for solid/open terrain, and a blank for
/// anything outside the FOV — this stands in for the SDL/atlas renderer
/// spec.md places out of scope.
fn render(engine: &Engine) -> String {
    let Some(player) = engine.registry.player() else {
        return String::new();
    };
    let visible = engine.visible_from(player.offset, 8);
    let extent = engine.zone.extent();

    let mut out = String::new();
    for y in 0..extent.h as i32 {
        for x in 0..extent.w as i32 {
            let pos = Offset::new(x, y);
            if !visible.contains(pos) {
                out.push(' ');
                continue;
            }
            let glyph = match engine.registry.at(pos) {
                Some(EntityTag::Player) => '@',
                Some(EntityTag::Skeleton) => 's',
                Some(EntityTag::Wraith) => 'w',
                Some(EntityTag::FleshGolem) => 'g',
                Some(EntityTag::Adventurer) => 'a',
                Some(EntityTag::Paladin) => 'p',
                Some(EntityTag::Priest) => 'r',
                Some(EntityTag::Skull) => '%',
                Some(EntityTag::Ladder) | None => {
                    if let Some(ladder) = engine.registry.ladder_at(pos) {
                        match ladder.direction {
                            LadderDirection::Down => '>',
                            LadderDirection::Up => '<',
                        }
                    } else if engine.zone.get(pos).has(Trait::Solid) {
                        '#'
                    } else {
                        '.'
                    }
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn parse_direction(token: &str) -> Result<Cardinal, Error> {
    let dir = match token {
        "n" | "north" | "8" => Cardinal::NORTH,
        "s" | "south" | "2" => Cardinal::SOUTH,
        "e" | "east" | "6" => Cardinal::EAST,
        "w" | "west" | "4" => Cardinal::WEST,
        "ne" | "northeast" | "9" => Cardinal::NORTH | Cardinal::EAST,
        "nw" | "northwest" | "7" => Cardinal::NORTH | Cardinal::WEST,
        "se" | "southeast" | "3" => Cardinal::SOUTH | Cardinal::EAST,
        "sw" | "southwest" | "1" => Cardinal::SOUTH | Cardinal::WEST,
        other => return Err(anyhow!("unrecognized direction {other}")),
    };
    Ok(dir)
}
