use std::time::Duration;

use push_knight_core::{
    CellCoord, Direction, EnemyKind, Event, Health, LevelSelection, OccupancyCode,
    SimulationConfig,
};
use push_knight_world::{query, Layout, World};

fn world_from(rows: &str) -> World {
    let layout = Layout::from_ascii(rows).expect("test layout parses");
    World::with_layout(SimulationConfig::default(), LevelSelection::One, &layout)
}

fn open_field() -> World {
    world_from(
        "
        ##########
        #........#
        #........#
        #........#
        #........#
        #...P....#
        #........#
        ##########
        ",
    )
}

fn place(world: &mut World, kind: EnemyKind, column: u32, row: u32) {
    assert!(
        world.spawn_enemy(kind, CellCoord::new(column, row)),
        "could not place {kind:?} at ({column}, {row})"
    );
}

#[test]
fn push_into_empty_cell_moves_the_enemy() {
    let mut world = open_field();
    place(&mut world, EnemyKind::Goblin, 5, 5);
    let _ = world.drain_events();

    assert!(world.attempt_move(Direction::East));

    assert_eq!(
        query::occupancy(&world, CellCoord::new(5, 5)),
        Some(OccupancyCode::Empty)
    );
    assert_eq!(
        query::occupancy(&world, CellCoord::new(6, 5)),
        Some(OccupancyCode::Enemy)
    );
    assert_eq!(query::player(&world).cell, CellCoord::new(4, 5));
    assert_eq!(
        world.drain_events(),
        vec![Event::EnemyMoved {
            from: CellCoord::new(5, 5),
            to: CellCoord::new(6, 5),
            health: Health::new(2),
        }]
    );
}

#[test]
fn push_arms_the_player_cooldown() {
    let mut world = open_field();
    place(&mut world, EnemyKind::Skeleton, 5, 5);

    assert_eq!(query::player(&world).push_cooldown, Duration::ZERO);
    assert!(world.attempt_move(Direction::East));
    assert_eq!(
        query::player(&world).push_cooldown,
        Duration::from_millis(500)
    );

    world.tick(Duration::from_millis(100));
    assert_eq!(
        query::player(&world).push_cooldown,
        Duration::from_millis(400)
    );
}

#[test]
fn push_into_wall_damages_without_moving() {
    let mut world = world_from(
        "
        ##########
        #........#
        #...P.#..#
        #........#
        ##########
        ",
    );
    place(&mut world, EnemyKind::Skeleton, 5, 2);
    let _ = world.drain_events();

    assert!(world.attempt_move(Direction::East));

    let skeleton = query::enemy_at(&world, CellCoord::new(5, 2)).expect("skeleton stays");
    assert_eq!(skeleton.health, Health::new(2));
    assert_eq!(
        world.drain_events(),
        vec![
            Event::EnemyDamaged {
                cell: CellCoord::new(5, 2),
                health: Health::new(2),
            },
            Event::Impact {
                cell: CellCoord::new(6, 2),
            },
        ]
    );
}

#[test]
fn push_into_spikes_uses_their_collision_damage() {
    let mut world = world_from(
        "
        #######
        #.P.^.#
        #######
        ",
    );
    place(&mut world, EnemyKind::Goblin, 3, 1);

    assert!(world.attempt_move(Direction::East));
    assert!(world.attempt_move(Direction::East));

    assert!(query::enemy_at(&world, CellCoord::new(3, 1)).is_none());
    assert_eq!(
        query::occupancy(&world, CellCoord::new(3, 1)),
        Some(OccupancyCode::Empty)
    );
    assert_eq!(query::wave_status(&world).defeated, 1);
}

#[test]
fn chain_push_shifts_every_link() {
    let mut world = open_field();
    place(&mut world, EnemyKind::Goblin, 5, 5);
    place(&mut world, EnemyKind::Skeleton, 6, 5);
    let _ = world.drain_events();

    assert!(world.attempt_move(Direction::East));

    assert_eq!(
        query::occupancy(&world, CellCoord::new(5, 5)),
        Some(OccupancyCode::Empty)
    );
    let goblin = query::enemy_at(&world, CellCoord::new(6, 5)).expect("goblin shifted");
    let skeleton = query::enemy_at(&world, CellCoord::new(7, 5)).expect("skeleton shifted");
    assert_eq!(goblin.kind, EnemyKind::Goblin);
    assert_eq!(skeleton.kind, EnemyKind::Skeleton);
    assert_eq!(
        world.drain_events(),
        vec![
            Event::EnemyMoved {
                from: CellCoord::new(6, 5),
                to: CellCoord::new(7, 5),
                health: Health::new(3),
            },
            Event::EnemyMoved {
                from: CellCoord::new(5, 5),
                to: CellCoord::new(6, 5),
                health: Health::new(2),
            },
        ]
    );
}

#[test]
fn blocked_chain_hurts_only_its_front() {
    let mut world = world_from(
        "
        #########
        #.P...#.#
        #########
        ",
    );
    place(&mut world, EnemyKind::Skeleton, 3, 1);
    place(&mut world, EnemyKind::Goblin, 4, 1);
    place(&mut world, EnemyKind::Brute, 5, 1);
    let _ = world.drain_events();

    assert!(world.attempt_move(Direction::East));

    let view = query::enemy_view(&world).into_vec();
    let cells: Vec<CellCoord> = view.iter().map(|enemy| enemy.cell).collect();
    assert_eq!(
        cells,
        vec![
            CellCoord::new(3, 1),
            CellCoord::new(4, 1),
            CellCoord::new(5, 1),
        ]
    );
    assert_eq!(view[0].health, Health::new(3));
    assert_eq!(view[1].health, Health::new(2));
    assert_eq!(view[2].health, Health::new(5));
    assert_eq!(
        world.drain_events(),
        vec![
            Event::EnemyDamaged {
                cell: CellCoord::new(5, 1),
                health: Health::new(5),
            },
            Event::Impact {
                cell: CellCoord::new(6, 1),
            },
        ]
    );
}

#[test]
fn push_past_the_grid_edge_changes_nothing() {
    let mut world = world_from("...P.");
    place(&mut world, EnemyKind::Goblin, 4, 0);
    let _ = world.drain_events();

    assert!(!world.attempt_move(Direction::East));

    assert!(query::enemy_at(&world, CellCoord::new(4, 0)).is_some());
    assert_eq!(query::player(&world).push_cooldown, Duration::ZERO);
    assert!(world.drain_events().is_empty());
}

#[test]
fn player_walks_onto_floor_and_campfires_but_not_walls() {
    let mut world = world_from(
        "
        ######
        #Pf^.#
        ######
        ",
    );

    assert!(!world.attempt_move(Direction::North));
    assert!(!world.attempt_move(Direction::West));
    assert!(world.attempt_move(Direction::East));
    assert!(!world.attempt_move(Direction::East));

    assert_eq!(query::player(&world).cell, CellCoord::new(2, 1));
    assert_eq!(
        world.drain_events(),
        vec![Event::PlayerMoved {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(2, 1),
        }]
    );
}

#[test]
fn pushed_enemy_burns_on_a_campfire_and_the_fire_survives() {
    let mut world = world_from(
        "
        ##########
        #...P.f..#
        ##########
        ",
    );
    place(&mut world, EnemyKind::Skeleton, 5, 1);
    let _ = world.drain_events();

    assert!(world.attempt_move(Direction::East));
    assert_eq!(
        world.drain_events(),
        vec![
            Event::EnemyMoved {
                from: CellCoord::new(5, 1),
                to: CellCoord::new(6, 1),
                health: Health::new(3),
            },
            Event::EnemyDamaged {
                cell: CellCoord::new(6, 1),
                health: Health::new(2),
            },
        ]
    );
    assert_eq!(
        query::occupancy(&world, CellCoord::new(6, 1)),
        Some(OccupancyCode::Enemy)
    );

    assert!(world.attempt_move(Direction::East));
    assert!(world.attempt_move(Direction::East));

    assert_eq!(
        query::occupancy(&world, CellCoord::new(6, 1)),
        Some(OccupancyCode::PassableHazard)
    );
    assert!(query::enemy_at(&world, CellCoord::new(7, 1)).is_some());
}

#[test]
fn traps_fire_on_pushed_enemies() {
    let mut world = world_from(
        "
        ##########
        #...P.T..#
        #........#
        #...t....#
        ##########
        ",
    );
    place(&mut world, EnemyKind::Skeleton, 5, 1);

    assert!(world.attempt_move(Direction::East));

    let skeleton = query::enemy_at(&world, CellCoord::new(6, 1)).expect("skeleton on trap");
    assert_eq!(skeleton.health, Health::new(2));
    let traps = query::traps(&world);
    assert!(!traps[0].active);
    assert!(traps[0].persistent);
    assert!(traps[1].active);
    assert!(!traps[1].persistent);

    for _ in 0..10 {
        world.tick(Duration::from_millis(100));
    }
    assert!(query::traps(&world)[0].active);
}

#[test]
fn single_use_trap_stays_spent() {
    let mut world = world_from(
        "
        ########
        #.P.t..#
        ########
        ",
    );
    place(&mut world, EnemyKind::Brute, 3, 1);

    assert!(world.attempt_move(Direction::East));
    assert_eq!(
        query::enemy_at(&world, CellCoord::new(4, 1)).map(|brute| brute.health),
        Some(Health::new(5))
    );

    for _ in 0..15 {
        world.tick(Duration::from_millis(100));
    }
    assert!(!query::traps(&world)[0].active);
}

#[test]
fn moves_after_death_are_rejected() {
    let mut world = world_from(
        "
        #####
        #Pf.#
        #####
        ",
    );
    assert!(world.attempt_move(Direction::East));
    for _ in 0..3 {
        world.tick(Duration::from_millis(16));
    }

    assert!(query::is_game_over(&world));
    assert!(!world.attempt_move(Direction::East));
}
