use maze_chase_core::{Command, Event, ADVERSARY_COLORS};
use maze_chase_system_spawning::{Config, Spawning};
use maze_chase_world::{self as world, query, World};

fn started_world() -> (World, Vec<Event>) {
    let mut world = World::classic().expect("classic maze parses");
    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);
    (world, events)
}

#[test]
fn releases_one_adversary_per_slot_on_start() {
    let (mut world, events) = started_world();
    let spawns = query::adversary_spawns(&world).to_vec();

    let mut spawning = Spawning::new(Config::with_seed(0x5eed));
    let mut commands = Vec::new();
    spawning.handle(&events, &spawns, &mut commands);
    assert_eq!(commands.len(), 4);

    for (command, expected_color) in commands.iter().zip(ADVERSARY_COLORS.iter()) {
        match command {
            Command::SpawnAdversary { spawn, color, .. } => {
                assert!(spawns.contains(spawn), "spawned outside the pen: {spawn:?}");
                assert_eq!(color, expected_color);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }

    let mut spawned = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut spawned);
    }
    assert_eq!(query::adversary_view(&world).len(), 4);
}

#[test]
fn ignores_events_without_a_start() {
    let (world, _) = started_world();
    let spawns = query::adversary_spawns(&world).to_vec();

    let mut spawning = Spawning::new(Config::with_seed(7));
    let mut commands = Vec::new();
    spawning.handle(&[Event::FrameAdvanced { frame: 1 }], &spawns, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn identical_seeds_choose_identical_spawns() {
    let (world, events) = started_world();
    let spawns = query::adversary_spawns(&world).to_vec();

    let run = |seed| {
        let mut spawning = Spawning::new(Config::new(6, ADVERSARY_COLORS.to_vec(), seed));
        let mut commands = Vec::new();
        spawning.handle(&events, &spawns, &mut commands);
        spawning.handle(&events, &spawns, &mut commands);
        commands
    };

    let first = run(0x1234_5678);
    assert_eq!(first.len(), 12);
    assert_eq!(first, run(0x1234_5678));
}

#[test]
fn no_spawns_means_no_commands() {
    let mut spawning = Spawning::new(Config::with_seed(3));
    let mut commands = Vec::new();
    spawning.handle(&[Event::SimulationStarted], &[], &mut commands);
    assert!(commands.is_empty());
}
