/// Level commands and the tick function.
///
/// Tick processing order (`Level::tick`):
///   1. Clock update
///   2. Countdown (expiry = game over)
///   3. Enemy movement (collision revert + hook), enemy contact kills
///   4. Fruit movement / hazard timers (cherry, pineapple, cactus)
///   5. Campfire relight
///   6. Hazard contact (fire, spikes, enemies) for every live player
///   7. Game-over check
///
/// Player command order (`Level::move_player`):
///   1. Reject invalid target (facing still updates)
///   2. Move, collect fruit on the cell
///   3. Completion / wave activation
///   4. Fire and spike kills (both players in co-op)
///   5. Enemy occupancy kill
///
/// Terrain questions go through `domain::rules`; this file applies the
/// answers and records events.

use crate::domain::ai::PlayerProfile;
use crate::domain::entity::Intent;
use crate::domain::fruit::FruitChange;
use crate::domain::location::{is_cardinal, Location};
use crate::domain::rules;
use super::event::{DeathCause, GameEvent};
use super::level::Level;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

impl Level {
    /// Advance the level to `now` and return the events produced.
    pub fn tick(&mut self, now: u64) -> Vec<GameEvent> {
        self.advance_clock(now);
        if !self.is_terminal() {
            self.resolve_timer();
        }
        if !self.is_terminal() {
            self.move_enemies();
            self.move_fruits(now);
            self.resolve_campfires();
            self.resolve_hazards();
            self.resolve_game_over();
        }
        self.take_events()
    }

    pub fn pause(&mut self) -> bool {
        self.timer.pause(self.now)
    }

    pub fn resume(&mut self) -> bool {
        self.timer.resume(self.now)
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

impl Level {
    /// One step for every enemy, in index order, then collision repair on
    /// the post-move cells: while two enemies share a cell, the later of
    /// the two that moved goes back to where it started and its collision
    /// hook runs. Ice an enemy smashes over a lit campfire puts the fire
    /// out. Enemies sharing a cell with a player kill that player; the
    /// level ends once nobody is left alive.
    pub fn move_enemies(&mut self) {
        if self.is_terminal() {
            return;
        }
        let before: Vec<Location> = self.enemies.iter().map(|e| e.location).collect();
        for i in 0..self.enemies.len() {
            let outcome = match self.enemies[i].profile {
                Some(profile) => {
                    let dir = profile.decide(&self.ai_view(), i);
                    self.enemies[i].follow(dir, &mut self.map)
                }
                None => {
                    let targets = self.live_player_locations();
                    let others: Vec<Location> = self
                        .enemies
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, e)| e.location)
                        .collect();
                    self.enemies[i].step_among(&targets, &others, &mut self.map, &mut self.rng)
                }
            };

            for &location in &outcome.broken_ice {
                self.events.push(GameEvent::IceBroken { location });
                self.douse(location);
            }
            if let Some(change) = outcome.charge {
                self.events.push(GameEvent::NarvalCharge { enemy: i, change });
            }
        }
        self.resolve_enemy_clashes(&before);
        self.resolve_enemy_contact();
        self.resolve_game_over();
    }

    /// Each pass reverts one enemy to its pre-move cell, so this ends
    /// after at most one pass per enemy.
    fn resolve_enemy_clashes(&mut self, before: &[Location]) {
        loop {
            let n = self.enemies.len();
            let clash = (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
                .filter(|&(i, j)| self.enemies[i].location == self.enemies[j].location)
                .find_map(|(i, j)| {
                    [j, i].into_iter().find(|&k| self.enemies[k].location != before[k])
                });
            let Some(k) = clash else { return };
            log::trace!("{} bumped into another enemy at {}", self.enemies[k].name, self.enemies[k].location);
            self.enemies[k].location = before[k];
            self.enemies[k].change_direction_on_enemy_collision(&mut self.rng);
        }
    }

    fn resolve_enemy_contact(&mut self) {
        for idx in 0..self.players.len() {
            let loc = self.players[idx].location;
            if self.players[idx].is_alive() && self.enemies.iter().any(|e| e.location == loc) {
                self.kill_player(idx, DeathCause::Enemy);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Fruits & obstacles
// ══════════════════════════════════════════════════════════════

impl Level {
    /// Move the moving fruits and run cherry / cactus timers.
    pub fn move_fruits(&mut self, now: u64) {
        self.advance_clock(now);
        if self.is_terminal() {
            return;
        }
        let timing = self.timing.fruit_timing();
        for i in 0..self.fruits.len() {
            if self.fruits[i].is_collected() {
                continue;
            }
            let occupied: Vec<Location> = self
                .players
                .iter()
                .map(|p| p.location)
                .chain(self.enemies.iter().map(|e| e.location))
                .chain(
                    self.fruits
                        .iter()
                        .enumerate()
                        .filter(|(j, f)| *j != i && !f.is_collected())
                        .map(|(_, f)| f.location),
                )
                .collect();
            let change = self.fruits[i].update(
                &self.map,
                self.now,
                timing,
                |l| occupied.contains(&l),
                &mut self.rng,
            );
            let event = match change {
                None => continue,
                Some(FruitChange::Teleported { from, to }) => GameEvent::CherryTeleported { from, to },
                Some(FruitChange::Moved { from, to }) => GameEvent::FruitMoved { from, to },
                Some(FruitChange::SpikesToggled { spikes }) => GameEvent::CactusToggled {
                    location: self.fruits[i].location,
                    spikes,
                },
            };
            self.events.push(event);
        }
    }

    fn resolve_campfires(&mut self) {
        for location in self.map.update_campfires(self.now, self.timing.campfire_relight_ms) {
            log::trace!("campfire at {location} relit");
            self.events.push(GameEvent::CampfireRelit { location });
        }
    }

    fn resolve_timer(&mut self) {
        if self.timer.update(self.now) {
            log::info!("time up, score {}", self.score);
            self.events.push(GameEvent::TimeUp);
            self.set_game_over();
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Player commands
// ══════════════════════════════════════════════════════════════

impl Level {
    /// Move player `idx` by a unit cardinal vector.
    pub fn move_player(&mut self, idx: usize, dx: i32, dy: i32) -> bool {
        let Some(from) = self.face(idx, (dx, dy)) else { return false };
        let Some(dest) = rules::player_step_target(&self.map, from, (dx, dy)) else { return false };

        self.players[idx].location = dest;
        self.collect_at(idx, dest);
        self.resolve_completion();
        self.resolve_hazards();
        self.resolve_game_over();
        true
    }

    pub fn move_player1(&mut self, dx: i32, dy: i32) -> bool {
        self.move_player(0, dx, dy)
    }

    pub fn move_player2(&mut self, dx: i32, dy: i32) -> bool {
        self.move_player(1, dx, dy)
    }

    /// Freeze empty cells outward from the player. Returns how many ice
    /// blocks now stand; cells over hot tiles melt and are not counted.
    pub fn create_ice_line(&mut self, idx: usize, dx: i32, dy: i32) -> usize {
        let Some(origin) = self.face(idx, (dx, dy)) else { return 0 };
        let plan = rules::plan_ice_line(&self.map, origin, (dx, dy), |l| self.is_occupied(l));

        for &location in &plan.cells {
            self.map.add_ice_wall(location);
            self.events.push(GameEvent::IceCreated { location });
        }
        for &location in &plan.melted {
            self.events.push(GameEvent::IceMelted { location });
        }
        plan.len()
    }

    /// Shatter consecutive ice outward from the player.
    pub fn break_ice_line(&mut self, idx: usize, dx: i32, dy: i32) -> usize {
        let Some(origin) = self.face(idx, (dx, dy)) else { return 0 };
        let plan = rules::plan_break_line(&self.map, origin, (dx, dy), |l| self.is_occupied(l));

        for &location in &plan.cells {
            self.map.remove_ice_wall(location);
            self.events.push(GameEvent::IceBroken { location });
        }
        for &location in &plan.doused {
            self.douse(location);
        }
        plan.len()
    }

    /// Break if the facing cell holds ice, otherwise create.
    pub fn ice_action(&mut self, idx: usize) -> usize {
        let Some(player) = self.players.get(idx) else { return 0 };
        let (dx, dy) = player.facing;
        if rules::facing_holds_ice(&self.map, player.location, player.facing) {
            self.break_ice_line(idx, dx, dy)
        } else {
            self.create_ice_line(idx, dx, dy)
        }
    }

    /// Route an AI or input decision through the command API.
    pub fn apply_intent(&mut self, idx: usize, intent: Intent) -> bool {
        if intent.is_idle() {
            return false;
        }
        if intent.use_ice {
            self.face(idx, intent.dir()).is_some() && self.ice_action(idx) > 0
        } else {
            self.move_player(idx, intent.dx, intent.dy)
        }
    }

    /// Let `profile` choose and perform player `idx`'s next action.
    pub fn autopilot(&mut self, idx: usize, profile: PlayerProfile) -> bool {
        let intent = profile.decide(&self.ai_view(), idx);
        self.apply_intent(idx, intent)
    }
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

impl Level {
    /// Turn a live player toward `dir`. Returns the player's location,
    /// or None if the command must be refused.
    fn face(&mut self, idx: usize, dir: (i32, i32)) -> Option<Location> {
        if self.is_terminal() || !is_cardinal(dir) {
            return None;
        }
        let player = self.players.get_mut(idx)?;
        if !player.is_alive() {
            return None;
        }
        player.facing = dir;
        Some(player.location)
    }

    /// Put out a lit campfire at `location`, if there is one.
    fn douse(&mut self, location: Location) {
        if let Some(fire) = self.map.campfire_at_mut(location).filter(|f| f.lit) {
            fire.extinguish(self.now);
            self.events.push(GameEvent::CampfireExtinguished { location });
        }
    }

    fn is_occupied(&self, loc: Location) -> bool {
        self.enemies.iter().any(|e| e.location == loc) || self.players.iter().any(|p| p.location == loc)
    }

    fn collect_at(&mut self, idx: usize, loc: Location) {
        for fruit in self
            .fruits
            .iter_mut()
            .filter(|f| f.location == loc && !f.is_collected() && !f.has_spikes())
        {
            let points = fruit.collect();
            self.score += points;
            self.collected += 1;
            self.events.push(GameEvent::FruitCollected {
                player: idx,
                name: fruit.name.clone(),
                location: loc,
                points,
            });
        }
    }

    fn resolve_completion(&mut self) {
        while !self.completed && self.total > 0 && self.collected >= self.total {
            if self.activate_next_wave() {
                // new fruit that spawned under a player is picked up at once
                let spots: Vec<(usize, Location)> = self
                    .players
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_alive())
                    .map(|(i, p)| (i, p.location))
                    .collect();
                for (i, loc) in spots {
                    self.collect_at(i, loc);
                }
            } else {
                self.completed = true;
                log::info!("level complete, score {}", self.score);
                self.events.push(GameEvent::LevelCompleted { score: self.score });
            }
        }
    }

    /// Fire, spikes and enemies against every live player.
    fn resolve_hazards(&mut self) {
        for idx in 0..self.players.len() {
            if !self.players[idx].is_alive() {
                continue;
            }
            let loc = self.players[idx].location;
            if self.map.is_lit_campfire(loc) {
                self.kill_player(idx, DeathCause::Campfire);
            } else if self.fruits.iter().any(|f| f.location == loc && f.is_lethal()) {
                self.kill_player(idx, DeathCause::Cactus);
            }
        }
        self.resolve_enemy_contact();
    }

    fn kill_player(&mut self, idx: usize, cause: DeathCause) {
        let player = &mut self.players[idx];
        if player.kill() {
            log::info!("player {} died at {} ({cause:?})", idx + 1, player.location);
            self.events.push(GameEvent::PlayerKilled { player: idx, location: player.location, cause });
        }
    }

    fn resolve_game_over(&mut self) {
        if self.is_terminal() || self.players.is_empty() {
            return;
        }
        if self.players.iter().all(|p| !p.is_alive()) {
            self.set_game_over();
        }
    }

    fn set_game_over(&mut self) {
        if !self.game_over {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::domain::entity::{Flavor, Player};
    use crate::domain::fruit::{Fruit, FruitType};
    use crate::domain::tile::TileMap;
    use crate::sim::layout::parse_layout;

    fn layout(rows: &[&str]) -> Level {
        parse_layout(rows, Timing::default(), 9).unwrap()
    }

    fn at(x: i32, y: i32) -> Location {
        Location::new(x, y)
    }

    // ── Movement & collection ──

    #[test]
    fn collecting_the_last_fruit_completes_the_level() {
        let mut l = layout(&[
            "#####",
            "#1B.#",
            "#####",
        ]);
        assert!(l.move_player1(1, 0));
        assert_eq!(l.score, 100);
        assert!(l.completed);
        let events = l.take_events();
        assert!(events.contains(&GameEvent::LevelCompleted { score: 100 }));
        // terminal: further commands are refused
        assert!(!l.move_player1(1, 0));
    }

    #[test]
    fn blocked_move_still_turns_the_player() {
        let mut l = layout(&[
            "#####",
            "#1*B#",
            "#####",
        ]);
        assert!(!l.move_player1(1, 0));
        assert_eq!(l.players[0].facing, (1, 0));
        assert_eq!(l.players[0].location, at(1, 1));
        assert!(!l.move_player1(1, 1));
        assert!(!l.move_player1(0, 0));
        assert_eq!(l.players[0].facing, (1, 0));
    }

    #[test]
    fn spiked_cactus_kills_instead_of_scoring() {
        let mut l = layout(&[
            "#####",
            "#1X.#",
            "#B..#",
            "#####",
        ]);
        if let crate::domain::fruit::FruitKind::Cactus { spikes, .. } = &mut l.fruits[0].kind {
            *spikes = true;
        }
        assert!(l.move_player1(1, 0));
        assert!(!l.players[0].is_alive());
        assert_eq!(l.score, 0);
        assert!(l.game_over);
    }

    #[test]
    fn lit_campfire_kills_only_the_mover_in_coop() {
        let mut l = layout(&[
            "######",
            "#1F2.#",
            "#B...#",
            "######",
        ]);
        assert!(l.move_player1(1, 0));
        assert!(!l.players[0].is_alive());
        assert!(l.players[1].is_alive());
        assert!(!l.game_over);
        assert!(!l.move_player1(-1, 0));
        let events = l.take_events();
        assert!(events.contains(&GameEvent::PlayerKilled {
            player: 0,
            location: at(2, 1),
            cause: DeathCause::Campfire,
        }));
    }

    #[test]
    fn waves_replace_fruit_then_complete() {
        let mut map = TileMap::new(6, 3);
        map.add_border();
        let mut l = Level::new(map, Timing::default(), 3, 0);
        l.add_player(Player::new(Flavor::Vanilla, at(1, 1)));
        l.add_fruit(Fruit::new(FruitType::Banana, at(2, 1)));
        l.add_wave(vec![Fruit::new(FruitType::Grapes, at(4, 1))]);

        assert!(l.move_player1(1, 0));
        assert!(!l.completed);
        assert_eq!(l.wave, 1);
        assert_eq!((l.collected, l.total), (0, 1));
        assert!(l.move_player1(1, 0));
        assert!(l.move_player1(1, 0));
        assert!(l.completed);
        assert_eq!(l.score, 150);
    }

    // ── Ice ──

    #[test]
    fn ice_line_stops_before_an_enemy() {
        let mut l = layout(&[
            "#######",
            "#1..M.#",
            "#B....#",
            "#######",
        ]);
        assert_eq!(l.create_ice_line(0, 1, 0), 2);
        assert!(l.map.has_ice_wall(at(2, 1)));
        assert!(l.map.has_ice_wall(at(3, 1)));
        assert!(!l.map.has_ice_wall(at(4, 1)));
        assert_eq!(l.break_ice_line(0, 1, 0), 2);
        assert_eq!(l.map.ice_count(), 0);
    }

    #[test]
    fn hot_tile_melts_ice_and_the_line_continues() {
        let mut l = layout(&[
            "######",
            "#1^..#",
            "#B...#",
            "######",
        ]);
        assert_eq!(l.create_ice_line(0, 1, 0), 2);
        assert!(!l.map.has_ice_wall(at(2, 1)));
        assert!(l.take_events().contains(&GameEvent::IceMelted { location: at(2, 1) }));
    }

    #[test]
    fn breaking_ice_over_fire_douses_it_until_relight() {
        let mut l = layout(&[
            "######",
            "#1F..#",
            "#B...#",
            "######",
        ]);
        assert_eq!(l.create_ice_line(0, 1, 0), 3);
        l.advance_clock(1_000);
        assert_eq!(l.break_ice_line(0, 1, 0), 3);
        assert!(!l.map.is_lit_campfire(at(2, 1)));
        assert!(l.take_events().contains(&GameEvent::CampfireExtinguished { location: at(2, 1) }));

        // safe to walk over while out
        assert!(l.move_player1(1, 0));
        assert!(l.players[0].is_alive());
        assert!(l.move_player1(1, 0));

        let events = l.tick(11_000);
        assert!(events.contains(&GameEvent::CampfireRelit { location: at(2, 1) }));
    }

    #[test]
    fn ice_action_toggles_in_facing_direction() {
        let mut l = layout(&[
            "#####",
            "#1..#",
            "#...#",
            "#..B#",
            "#####",
        ]);
        // default facing is down
        assert_eq!(l.ice_action(0), 2);
        assert!(l.map.has_ice_wall(at(1, 2)));
        assert_eq!(l.ice_action(0), 2);
        assert_eq!(l.map.ice_count(), 0);
    }

    #[test]
    fn ice_intent_faces_then_toggles() {
        let mut l = layout(&[
            "#####",
            "#1..#",
            "#..B#",
            "#####",
        ]);
        assert!(l.apply_intent(0, Intent::ice((1, 0))));
        assert_eq!(l.players[0].facing, (1, 0));
        assert_eq!(l.map.ice_count(), 2);
        assert!(!l.apply_intent(0, Intent::IDLE));
    }

    // ── Tick ──

    #[test]
    fn enemies_in_a_line_all_move() {
        let mut l = layout(&[
            "#######",
            "#1...B#",
            "#.TT..#",
            "#######",
        ]);
        l.move_enemies();
        assert_eq!(l.enemies[0].location, at(3, 2));
        assert_eq!(l.enemies[1].location, at(4, 2));
        assert_eq!(l.enemies[0].direction, (1, 0));
        assert_eq!(l.enemies[1].direction, (1, 0));
    }

    #[test]
    fn head_on_clash_reverts_the_later_enemy() {
        let mut l = layout(&[
            "#######",
            "#1...B#",
            "#.T.T.#",
            "#######",
        ]);
        l.enemies[1].direction = (-1, 0);
        l.move_enemies();
        assert_eq!(l.enemies[0].location, at(3, 2));
        assert_eq!(l.enemies[1].location, at(4, 2));
        assert_eq!(l.enemies[1].direction, (1, 0));
    }

    #[test]
    fn reverts_cascade_back_along_a_blocked_line() {
        let mut l = layout(&[
            "######",
            "#1..B#",
            "######",
            "#.TTT#",
            "######",
        ]);
        l.move_enemies();
        let cells: Vec<Location> = l.enemies.iter().map(|e| e.location).collect();
        assert_eq!(cells, vec![at(2, 3), at(3, 3), at(4, 3)]);
        assert!(l.enemies.iter().all(|e| e.direction == (-1, 0)));
    }

    #[test]
    fn narval_charge_kills_a_player_in_its_lane() {
        let mut l = layout(&[
            "########",
            "#W...1.#",
            "#B.....#",
            "########",
        ]);
        l.tick(100);
        assert_eq!(l.enemies[0].location, at(3, 1));
        assert!(l.move_player1(-1, 0));
        l.tick(200);
        assert_eq!(l.enemies[0].location, at(4, 1));
        assert!(!l.players[0].is_alive());
        assert!(l.game_over);
    }

    #[test]
    fn enemy_smashing_ice_over_fire_douses_it() {
        let mut l = layout(&[
            "#######",
            "#1.FK.#",
            "#B....#",
            "#######",
        ]);
        l.map.add_ice_wall(at(3, 1));
        let events = l.tick(100);
        assert_eq!(l.enemies[0].location, at(3, 1));
        assert!(!l.map.is_lit_campfire(at(3, 1)));
        assert!(events.contains(&GameEvent::CampfireExtinguished { location: at(3, 1) }));
    }

    #[test]
    fn chasing_enemy_kills_on_contact() {
        let mut l = layout(&[
            "#####",
            "#1.M#",
            "#B..#",
            "#####",
        ]);
        l.tick(100);
        assert!(l.players[0].is_alive());
        let events = l.tick(200);
        assert!(!l.players[0].is_alive());
        assert!(l.game_over);
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn expired_timer_ends_the_level() {
        let timing = Timing { time_limit_secs: 1, ..Timing::default() };
        let mut l = parse_layout(&["#####", "#1.B#", "#####"], timing, 1).unwrap();
        assert!(l.tick(999).is_empty());
        let events = l.tick(1_000);
        assert_eq!(events, vec![GameEvent::TimeUp, GameEvent::GameOver]);
        assert!(l.tick(2_000).is_empty());
    }

    #[test]
    fn paused_level_does_not_time_out() {
        let timing = Timing { time_limit_secs: 1, ..Timing::default() };
        let mut l = parse_layout(&["#####", "#1.B#", "#####"], timing, 1).unwrap();
        l.advance_clock(200);
        assert!(l.pause());
        l.tick(5_000);
        assert!(!l.game_over);
        assert!(l.resume());
        l.tick(5_799);
        assert!(!l.game_over);
        l.tick(5_800);
        assert!(l.game_over);
    }

    #[test]
    fn autopilot_drives_the_player_to_fruit() {
        let mut l = layout(&[
            "######",
            "#1...#",
            "#...B#",
            "######",
        ]);
        for _ in 0..4 {
            l.autopilot(0, PlayerProfile::Hungry);
        }
        assert!(l.completed);
    }
}
