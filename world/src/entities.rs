//! Player, enemy and trap state owned by the world.

use std::time::Duration;

use log::{debug, info};
use push_knight_core::{CellCoord, EnemyId, EnemyKind, EnemySnapshot, Health, PlayerSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Player {
    cell: CellCoord,
    health: Health,
    max_health: Health,
    push_cooldown: Duration,
}

impl Player {
    pub(crate) fn new(cell: CellCoord, max_health: Health) -> Self {
        Self {
            cell,
            health: max_health,
            max_health,
            push_cooldown: Duration::ZERO,
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_zero()
    }

    pub(crate) fn move_to(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.push_cooldown = self.push_cooldown.saturating_sub(dt);
    }

    pub(crate) fn arm_push_cooldown(&mut self, cooldown: Duration) {
        self.push_cooldown = cooldown;
    }

    /// Applies damage and returns the remaining health, or `None` when the
    /// player was already dead.
    pub(crate) fn take_damage(&mut self, amount: u32) -> Option<Health> {
        if !self.is_alive() {
            return None;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health.is_zero() {
            info!("player died at {:?}", self.cell);
        }
        Some(self.health)
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            health: self.health,
            max_health: self.max_health,
            alive: self.is_alive(),
            push_cooldown: self.push_cooldown,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    cell: CellCoord,
    health: Health,
    cooldown: Duration,
}

impl Enemy {
    /// New enemies act on the first tick after they appear.
    pub(crate) fn new(id: EnemyId, kind: EnemyKind, cell: CellCoord) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            cell,
            health: stats.max_health,
            cooldown: Duration::ZERO,
        }
    }

    pub(crate) fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health.is_zero()
    }

    pub(crate) fn move_to(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    /// Decrements the action cooldown and reports whether the enemy may act
    /// now, re-arming the cooldown when it does.
    pub(crate) fn ready_to_act(&mut self, dt: Duration) -> bool {
        self.cooldown = self.cooldown.saturating_sub(dt);
        if !self.cooldown.is_zero() {
            return false;
        }
        self.cooldown = self.kind.stats().step_interval;
        true
    }

    /// Applies damage unless the enemy is already dead.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        debug!(
            "{:?} at {:?} took {} damage, {} left",
            self.kind,
            self.cell,
            amount,
            self.health.get()
        );
        true
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        let stats = self.kind.stats();
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            health: self.health,
            max_health: stats.max_health,
            ready_in: self.cooldown,
            obstacle_like: stats.behavior.is_obstacle_like(),
        }
    }
}

/// Floor trap that hurts enemies stepping onto it.
#[derive(Clone, Debug)]
pub(crate) struct Trap {
    cell: CellCoord,
    damage: u32,
    persistent: bool,
    active: bool,
    rearm: Duration,
    remaining: Duration,
}

impl Trap {
    pub(crate) fn new(cell: CellCoord, damage: u32, persistent: bool, rearm: Duration) -> Self {
        Self {
            cell,
            damage,
            persistent,
            active: true,
            rearm,
            remaining: Duration::ZERO,
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn damage(&self) -> u32 {
        self.damage
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        if self.active || !self.persistent {
            return;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.active = true;
            debug!("trap at {:?} re-armed", self.cell);
        }
    }

    /// Fires the trap. Single-use traps stay disarmed afterwards.
    pub(crate) fn trigger(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if self.persistent {
            self.remaining = self.rearm;
        }
        info!("trap triggered at {:?}", self.cell);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_acts_once_per_interval() {
        let mut goblin = Enemy::new(EnemyId::new(0), EnemyKind::Goblin, CellCoord::new(1, 1));
        let frame = Duration::from_millis(100);

        assert_eq!(goblin.snapshot().ready_in, Duration::ZERO);
        assert!(goblin.ready_to_act(frame));
        assert_eq!(goblin.snapshot().ready_in, Duration::from_millis(400));

        assert!(!goblin.ready_to_act(frame));
        assert!(!goblin.ready_to_act(frame));
        assert!(!goblin.ready_to_act(frame));
        assert!(goblin.ready_to_act(frame));
    }

    #[test]
    fn dead_enemies_ignore_damage() {
        let mut boomer = Enemy::new(EnemyId::new(3), EnemyKind::Boomer, CellCoord::new(0, 0));
        assert!(boomer.take_damage(5));
        assert!(boomer.is_dead());
        assert!(!boomer.take_damage(1));
        assert_eq!(boomer.health(), Health::new(0));
    }

    #[test]
    fn player_dies_once() {
        let mut player = Player::new(CellCoord::new(2, 2), Health::new(3));
        assert_eq!(player.take_damage(2), Some(Health::new(1)));
        assert_eq!(player.take_damage(2), Some(Health::new(0)));
        assert!(!player.is_alive());
        assert_eq!(player.take_damage(1), None);
    }

    #[test]
    fn push_cooldown_decays() {
        let mut player = Player::new(CellCoord::new(0, 0), Health::new(3));
        player.arm_push_cooldown(Duration::from_millis(500));
        player.advance(Duration::from_millis(300));
        assert_eq!(player.snapshot().push_cooldown, Duration::from_millis(200));
        player.advance(Duration::from_millis(300));
        assert_eq!(player.snapshot().push_cooldown, Duration::ZERO);
    }

    #[test]
    fn persistent_traps_rearm_single_use_traps_do_not() {
        let rearm = Duration::from_secs(1);
        let mut persistent = Trap::new(CellCoord::new(0, 0), 1, true, rearm);
        let mut single = Trap::new(CellCoord::new(1, 0), 1, false, rearm);

        assert!(persistent.trigger());
        assert!(single.trigger());
        assert!(!persistent.trigger());

        persistent.advance(Duration::from_millis(600));
        assert!(!persistent.is_active());
        persistent.advance(Duration::from_millis(400));
        assert!(persistent.is_active());

        single.advance(Duration::from_secs(10));
        assert!(!single.is_active());
    }
}
