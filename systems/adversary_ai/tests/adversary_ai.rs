use std::num::NonZeroU32;

use maze_chase_core::{
    AdversaryId, AdversarySnapshot, AdversaryView, CellKind, Command, Direction, Event,
    Lifecycle, Position, ADVERSARY_COLORS,
};
use maze_chase_system_adversary_ai::{AdversaryAi, Config};
use maze_chase_system_spawning::{self as spawning, Spawning};
use maze_chase_world::{self as world, motion, query, Maze, World};

const UNITS: u32 = 5;

fn view(x: u32, y: u32, direction: Direction) -> AdversaryView {
    AdversaryView::from_snapshots(vec![AdversarySnapshot {
        id: AdversaryId::new(0),
        position: Position::new(x, y),
        direction,
        color: ADVERSARY_COLORS[0],
    }])
}

fn decide(ai: &mut AdversaryAi, maze: &Maze, view: &AdversaryView) -> Vec<Command> {
    let mut commands = Vec::new();
    ai.handle(Lifecycle::Running, view, maze, UNITS, &mut commands);
    commands
}

#[test]
fn single_exit_pen_is_left_the_same_way_for_every_seed() {
    let maze = Maze::parse(&["#####", "#s  #", "##_##", "##g##", "#####"]).expect("maze parses");
    for seed in 0..32 {
        let mut ai = AdversaryAi::new(Config::new(seed));
        assert_eq!(
            decide(&mut ai, &maze, &view(10, 15, Direction::Left)),
            vec![Command::TurnAdversary {
                adversary: AdversaryId::new(0),
                direction: Direction::Up,
            }]
        );
    }
}

#[test]
fn walled_in_adversary_is_held() {
    let maze = Maze::parse(&["s#", "#g"]).expect("maze parses");
    let mut ai = AdversaryAi::new(Config::new(1));
    assert_eq!(
        decide(&mut ai, &maze, &view(5, 5, Direction::Down)),
        vec![Command::HoldAdversary {
            adversary: AdversaryId::new(0)
        }]
    );
}

#[test]
fn never_reverses_at_an_open_junction() {
    let maze = Maze::parse(&["s    ", "     ", "     ", "     ", "    g"]).expect("maze parses");
    let mut ai = AdversaryAi::new(Config::new(0xdead_beef));
    let junction = view(10, 10, Direction::Right);

    let mut seen = Vec::new();
    for _ in 0..200 {
        let chosen = match decide(&mut ai, &maze, &junction).as_slice() {
            [] => Direction::Right,
            [Command::TurnAdversary { direction, .. }] => *direction,
            other => panic!("unexpected commands: {other:?}"),
        };
        assert_ne!(chosen, Direction::Left, "reversed at a junction");
        if !seen.contains(&chosen) {
            seen.push(chosen);
        }
    }
    seen.sort();
    assert_eq!(seen, vec![Direction::Up, Direction::Right, Direction::Down]);
}

#[test]
fn misaligned_adversaries_and_stopped_games_are_left_alone() {
    let maze = Maze::parse(&["s    ", "     ", "    g"]).expect("maze parses");
    let mut ai = AdversaryAi::new(Config::new(4));
    assert!(decide(&mut ai, &maze, &view(7, 5, Direction::Right)).is_empty());

    let mut commands = Vec::new();
    ai.handle(
        Lifecycle::Stopped,
        &view(5, 5, Direction::Right),
        &maze,
        UNITS,
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn adversaries_leave_the_classic_pen_without_entering_walls() {
    let units = NonZeroU32::new(UNITS).expect("non-zero");
    let mut world = World::new(Maze::classic().expect("classic maze parses"), units)
        .expect("resolution fits");
    let mut spawner = Spawning::new(spawning::Config::with_seed(0x00c0_ffee));
    let mut ai = AdversaryAi::new(Config::new(0x00c0_ffee));

    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);
    let mut commands = Vec::new();
    spawner.handle(&events, query::adversary_spawns(&world), &mut commands);
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }

    let mut escaped = false;
    for _ in 0..1_000 {
        let maze = query::maze(&world).clone();
        let adversaries = query::adversary_view(&world);
        ai.handle(
            query::lifecycle(&world),
            &adversaries,
            &maze,
            UNITS,
            &mut commands,
        );
        for command in &commands {
            if let Command::TurnAdversary {
                adversary,
                direction,
            } = command
            {
                let snapshot = adversaries
                    .iter()
                    .find(|candidate| candidate.id == *adversary)
                    .expect("turned adversary exists");
                let cell = snapshot.position.cell(UNITS);
                let target = maze.kind(maze.neighbor(cell, *direction));
                assert!(
                    !motion::is_blocked_for_adversary(target, maze.kind(cell)),
                    "turned into a blocked cell"
                );
            }
        }
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick, &mut events);

        for adversary in query::adversary_view(&world).iter() {
            let kind = maze.kind(adversary.position.cell(UNITS));
            assert_ne!(kind, CellKind::Wall, "adversary inside a wall");
            if !matches!(kind, CellKind::AdversarySpawn | CellKind::Restricted) {
                escaped = true;
            }
        }
    }

    assert!(escaped, "no adversary left the pen");
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AdversaryMoved { .. })));
}
