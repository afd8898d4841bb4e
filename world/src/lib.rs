#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Push Knight.
//!
//! [`World`] owns the grid, the player, enemies, traps, the wave director and
//! the event queue. State changes only through [`World::tick`],
//! [`World::attempt_move`] and [`apply`]; consumers read through [`query`] and
//! drain the ordered event stream once per frame.

mod entities;
mod events;
mod grid;
mod layout;

use std::time::Duration;

use log::{debug, info};
use push_knight_core::{
    CellCoord, Command, Direction, DirectionError, EnemyId, EnemyKind, Event, LevelSelection,
    OccupancyCode, SimulationConfig,
};
use push_knight_system_pathfinding::Pathfinder;
use push_knight_system_spawning::{Config as SpawnConfig, SpawnDirector};

use entities::{Enemy, Player, Trap};
use grid::Grid;

pub use events::EventQueue;
pub use layout::{Layout, LayoutError, TrapPlacement};

/// Represents the authoritative Push Knight world state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    grid: Grid,
    player: Player,
    enemies: Vec<Enemy>,
    traps: Vec<Trap>,
    director: SpawnDirector,
    pathfinder: Pathfinder,
    events: EventQueue,
    next_enemy_id: u32,
}

impl World {
    /// Creates a world on the procedurally generated arena.
    pub fn new(config: SimulationConfig, level: LevelSelection) -> Result<Self, LayoutError> {
        let layout = Layout::generate(&config)?;
        Ok(Self::with_layout(config, level, &layout))
    }

    /// Creates a world on a prepared layout.
    ///
    /// When the layout names no spawn points, the configured ones that fall
    /// inside the grid are used instead.
    #[must_use]
    pub fn with_layout(config: SimulationConfig, level: LevelSelection, layout: &Layout) -> Self {
        let mut grid = Grid::for_layout(layout);
        for &(cell, kind) in layout.obstacles() {
            grid.place_obstacle(cell, kind);
        }

        let traps = layout
            .traps()
            .iter()
            .map(|placement| {
                Trap::new(
                    placement.cell,
                    config.traps.damage,
                    placement.persistent,
                    config.traps.rearm,
                )
            })
            .collect();

        let spawn_points: Vec<CellCoord> = if layout.spawn_points().is_empty() {
            config
                .spawning
                .spawn_points
                .iter()
                .copied()
                .filter(|cell| grid.contains(*cell))
                .collect()
        } else {
            layout.spawn_points().to_vec()
        };
        let director = SpawnDirector::new(
            SpawnConfig::new(level, &config.spawning).with_spawn_points(spawn_points),
        );

        info!(
            "level {} ready on a {}x{} grid, player at {:?}",
            level.number(),
            layout.columns(),
            layout.rows(),
            layout.player_start()
        );

        Self {
            player: Player::new(layout.player_start(), config.player_max_health),
            pathfinder: Pathfinder::new(config.path_expansion_cap),
            grid,
            enemies: Vec::new(),
            traps,
            director,
            events: EventQueue::new(),
            next_enemy_id: 0,
            config,
        }
    }

    /// Advances the simulation by `dt`, clamped to the configured maximum.
    ///
    /// A zero delta and a dead player both leave the world untouched.
    pub fn tick(&mut self, dt: Duration) {
        let _ = self.advance(dt);
    }

    /// Moves the player one cell or pushes the enemy standing there.
    ///
    /// Returns whether anything changed: a step, a push, or a collision
    /// absorbed by the front of a push chain.
    pub fn attempt_move(&mut self, direction: Direction) -> bool {
        if !self.player.is_alive() {
            return false;
        }

        let from = self.player.cell();
        let Some(to) = from.step(direction) else {
            return false;
        };
        match self.grid.code(to) {
            Some(OccupancyCode::Enemy) => self.resolve_push(to, direction),
            Some(code) if code.admits_movement() => {
                self.player.move_to(to);
                self.events.push(Event::PlayerMoved { from, to });
                true
            }
            _ => false,
        }
    }

    /// Validates a raw `(dx, dy)` intent and forwards it to
    /// [`World::attempt_move`].
    pub fn attempt_move_delta(&mut self, dx: i32, dy: i32) -> Result<bool, DirectionError> {
        let direction = Direction::from_delta(dx, dy)?;
        Ok(self.attempt_move(direction))
    }

    /// Places an enemy outside the wave schedule.
    ///
    /// The cell must be empty floor not occupied by the player.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, cell: CellCoord) -> bool {
        if !is_spawn_cell_free(&self.grid, self.player.cell(), cell) {
            return false;
        }

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let enemy = Enemy::new(id, kind, cell);
        let health = enemy.health();
        self.grid.occupy_enemy(cell);
        self.enemies.push(enemy);
        self.events.push(Event::EnemySpawned { cell, kind, health });
        true
    }

    /// Removes and returns pending events in priority order.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    fn advance(&mut self, dt: Duration) -> bool {
        if dt.is_zero() || !self.player.is_alive() {
            return false;
        }
        let dt = dt.min(self.config.max_tick);

        self.player.advance(dt);
        for trap in &mut self.traps {
            trap.advance(dt);
        }
        self.advance_enemies(dt);
        self.resolve_deaths();
        self.drive_director(dt);
        self.apply_environment_damage();
        true
    }

    fn advance_enemies(&mut self, dt: Duration) {
        let target = self.player.cell();
        for index in 0..self.enemies.len() {
            if self.enemies[index].is_dead() || !self.enemies[index].ready_to_act(dt) {
                continue;
            }

            let cell = self.enemies[index].cell();
            if cell.chebyshev_distance(target) <= 1 {
                self.strike_player(index);
                continue;
            }

            let Some(direction) = self.pathfinder.next_step(cell, target, self.grid.view()) else {
                continue;
            };
            let Some(next) = cell.step(direction) else {
                continue;
            };
            if self
                .grid
                .code(next)
                .is_some_and(OccupancyCode::admits_movement)
            {
                self.commit_enemy_move(index, next);
            }
        }
    }

    fn strike_player(&mut self, index: usize) {
        let kind = self.enemies[index].kind();
        let damage = kind.stats().contact_damage;
        if damage == 0 {
            return;
        }
        if let Some(health) = self.player.take_damage(damage) {
            debug!("{kind:?} hit the player for {damage}, {} left", health.get());
            self.events.push(Event::PlayerDamaged {
                cell: self.player.cell(),
                health,
            });
        }
    }

    /// Moves an enemy and applies whatever waits in the destination cell.
    fn commit_enemy_move(&mut self, index: usize, to: CellCoord) {
        let from = self.enemies[index].cell();
        self.grid.vacate(from);
        self.grid.occupy_enemy(to);
        self.enemies[index].move_to(to);
        self.events.push(Event::EnemyMoved {
            from,
            to,
            health: self.enemies[index].health(),
        });

        if let Some(obstacle) = self.grid.obstacle(to) {
            let descriptor = obstacle.descriptor();
            if descriptor.passable {
                self.damage_enemy(index, descriptor.pass_damage);
            }
        }

        let trap_damage = self
            .traps
            .iter_mut()
            .find(|trap| trap.cell() == to && trap.is_active())
            .and_then(|trap| trap.trigger().then(|| trap.damage()));
        if let Some(damage) = trap_damage {
            self.damage_enemy(index, damage);
        }
    }

    fn damage_enemy(&mut self, index: usize, amount: u32) {
        if amount == 0 {
            return;
        }
        let enemy = &mut self.enemies[index];
        if enemy.take_damage(amount) {
            self.events.push(Event::EnemyDamaged {
                cell: enemy.cell(),
                health: enemy.health(),
            });
        }
    }

    /// Pushes the enemy at `first` along `direction`.
    ///
    /// Consecutive enemies form a chain. If the cell past the chain admits
    /// movement every link advances one cell, front first; if it holds an
    /// impassable obstacle only the front link takes collision damage. Off-grid
    /// pushes change nothing.
    fn resolve_push(&mut self, first: CellCoord, direction: Direction) -> bool {
        let mut chain = vec![first];
        let mut front = first;
        let (blocker, code) = loop {
            let Some(next) = front.step(direction) else {
                return false;
            };
            match self.grid.code(next) {
                None => return false,
                Some(OccupancyCode::Enemy) => {
                    chain.push(next);
                    front = next;
                }
                Some(code) => break (next, code),
            }
        };

        if code.admits_movement() {
            for &cell in chain.iter().rev() {
                let (Some(index), Some(to)) = (self.enemy_index_at(cell), cell.step(direction))
                else {
                    continue;
                };
                self.commit_enemy_move(index, to);
            }
            debug!("pushed {} enemies {:?}", chain.len(), direction);
        } else {
            let damage = self
                .grid
                .obstacle(blocker)
                .map_or(0, |obstacle| obstacle.descriptor().collision_damage);
            self.events.push(Event::Impact { cell: blocker });
            if let Some(index) = self.enemy_index_at(front) {
                debug!("enemy at {front:?} slammed into {blocker:?}");
                self.damage_enemy(index, damage);
            }
        }

        self.player.arm_push_cooldown(self.config.push_cooldown);
        self.resolve_deaths();
        true
    }

    /// Removes dead enemies in creation order. Blasts may kill further
    /// enemies, which are picked up by the same loop.
    fn resolve_deaths(&mut self) {
        while let Some(index) = self.enemies.iter().position(Enemy::is_dead) {
            let enemy = self.enemies.remove(index);
            let cell = enemy.cell();
            self.grid.vacate(cell);
            if enemy.kind().stats().behavior.explodes_on_death() {
                self.detonate(cell);
            }
            self.director.record_defeat();
            self.events.push(Event::EntityRemoved { cell });
            debug!("{:?} removed at {cell:?}", enemy.kind());
        }
    }

    fn detonate(&mut self, center: CellCoord) {
        let blast = self.config.blast;
        let radius = i32::try_from(blast.radius).unwrap_or(0);
        info!("explosion at {center:?}");
        self.events.push(Event::Impact { cell: center });

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let Some(cell) = center.offset(dx, dy) else {
                    continue;
                };
                if !self.grid.contains(cell) {
                    continue;
                }

                if self.player.cell() == cell {
                    if let Some(health) = self.player.take_damage(blast.damage) {
                        self.events.push(Event::PlayerDamaged { cell, health });
                    }
                }
                if let Some(index) = self.enemy_index_at(cell) {
                    self.damage_enemy(index, blast.damage);
                }
            }
        }
    }

    fn drive_director(&mut self, dt: Duration) {
        let player_cell = self.player.cell();
        let grid = &self.grid;
        let order = self
            .director
            .update(dt, self.enemies.len(), |cell| {
                is_spawn_cell_free(grid, player_cell, cell)
            });
        if let Some(order) = order {
            let _ = self.spawn_enemy(order.kind, order.cell);
        }
    }

    fn apply_environment_damage(&mut self) {
        let cell = self.player.cell();
        let Some(obstacle) = self.grid.obstacle(cell) else {
            return;
        };
        let descriptor = obstacle.descriptor();
        if !descriptor.passable || descriptor.pass_damage == 0 {
            return;
        }
        if let Some(health) = self.player.take_damage(descriptor.pass_damage) {
            self.events.push(Event::PlayerDamaged { cell, health });
        }
    }

    fn enemy_index_at(&self, cell: CellCoord) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.cell() == cell)
    }
}

fn is_spawn_cell_free(grid: &Grid, player_cell: CellCoord, cell: CellCoord) -> bool {
    cell != player_cell && grid.code(cell) == Some(OccupancyCode::Empty)
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Returns whether the command changed anything.
pub fn apply(world: &mut World, command: Command) -> bool {
    match command {
        Command::Tick { dt } => world.advance(dt),
        Command::MovePlayer { direction } => world.attempt_move(direction),
        Command::SpawnEnemy { kind, cell } => world.spawn_enemy(kind, cell),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use push_knight_core::{
        CellCoord, EnemySnapshot, EnemyView, ObstacleKind, OccupancyCode, OccupancyView,
        PlayerSnapshot, WaveStatus,
    };

    use super::World;

    /// Occupancy code of a cell, or `None` outside the grid.
    #[must_use]
    pub fn occupancy(world: &World, cell: CellCoord) -> Option<OccupancyCode> {
        world.grid.code(cell)
    }

    /// Static obstacle placed on a cell, if any.
    #[must_use]
    pub fn obstacle(world: &World, cell: CellCoord) -> Option<ObstacleKind> {
        world.grid.obstacle(cell)
    }

    /// Snapshot of the enemy standing on a cell.
    #[must_use]
    pub fn enemy_at(world: &World, cell: CellCoord) -> Option<EnemySnapshot> {
        world
            .enemies
            .iter()
            .find(|enemy| enemy.cell() == cell)
            .map(|enemy| enemy.snapshot())
    }

    /// Captures a read-only view of every live enemy in creation order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Current state of every trap.
    #[must_use]
    pub fn traps(world: &World) -> Vec<TrapSnapshot> {
        world
            .traps
            .iter()
            .map(|trap| TrapSnapshot {
                cell: trap.cell(),
                active: trap.is_active(),
                persistent: trap.is_persistent(),
            })
            .collect()
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Progress of the wave director.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        world.director.status()
    }

    /// Whether a finite level has run past its last wave.
    #[must_use]
    pub fn is_level_complete(world: &World) -> bool {
        world.director.is_level_complete()
    }

    /// Whether the player has died.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        !world.player.is_alive()
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.grid.view()
    }

    /// Immutable representation of a trap used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TrapSnapshot {
        /// Cell holding the trap.
        pub cell: CellCoord,
        /// Whether the trap fires on the next enemy stepping in.
        pub active: bool,
        /// Whether the trap re-arms after firing.
        pub persistent: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use push_knight_core::Health;

    fn arena() -> World {
        let layout = Layout::from_ascii(
            "
            #######
            #.....#
            #..P..#
            #.....#
            #######
            ",
        )
        .expect("layout");
        World::with_layout(SimulationConfig::default(), LevelSelection::One, &layout)
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut world = arena();
        assert!(world.spawn_enemy(EnemyKind::Brute, CellCoord::new(5, 1)));
        world.tick(Duration::from_millis(16));
        assert_eq!(
            query::enemy_view(&world).into_vec()[0].ready_in,
            Duration::from_millis(1200)
        );

        world.tick(Duration::from_secs(5));

        let enemies = query::enemy_view(&world).into_vec();
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].ready_in, Duration::from_millis(1100));
    }

    #[test]
    fn apply_reports_changes() {
        let mut world = arena();
        assert!(!apply(&mut world, Command::Tick { dt: Duration::ZERO }));
        assert!(apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16)
            }
        ));
        assert!(apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::West
            }
        ));
        assert!(!apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Goblin,
                cell: CellCoord::new(0, 0),
            }
        ));
        assert!(apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Goblin,
                cell: CellCoord::new(5, 3),
            }
        ));
    }

    #[test]
    fn spawn_refuses_the_player_cell_and_occupied_cells() {
        let mut world = arena();
        assert!(!world.spawn_enemy(EnemyKind::Goblin, CellCoord::new(3, 2)));
        assert!(world.spawn_enemy(EnemyKind::Goblin, CellCoord::new(1, 1)));
        assert!(!world.spawn_enemy(EnemyKind::Skeleton, CellCoord::new(1, 1)));
        assert!(!world.spawn_enemy(EnemyKind::Skeleton, CellCoord::new(9, 9)));

        let events = world.drain_events();
        assert_eq!(
            events,
            vec![Event::EnemySpawned {
                cell: CellCoord::new(1, 1),
                kind: EnemyKind::Goblin,
                health: Health::new(2),
            }]
        );
    }

    #[test]
    fn raw_deltas_are_validated() {
        let mut world = arena();
        assert_eq!(
            world.attempt_move_delta(1, 1),
            Err(DirectionError::NotCardinal { dx: 1, dy: 1 })
        );
        assert_eq!(world.attempt_move_delta(0, -1), Ok(true));
        assert_eq!(world.attempt_move_delta(0, -1), Ok(false));
    }
}
