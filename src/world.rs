// World orchestrator
//
// The World owns every entity of a running level, the task registry that
// drives them, and the collaborator sinks. It does three things:
// - routes each due task to the state machine it names (dispatch)
// - runs the 5 Hz logic tick: collisions, pickups, boss activation, sweeping
//   and throw admission, always in that order
// - hands a frame of draw calls to a render sink on request

use crate::boss::Boss;
use crate::clock::{Clock, SystemClock};
use crate::collision::{Collidable, colliding_indices};
use crate::config::{GameConfig, period_from_hz};
use crate::enemy::Enemy;
use crate::entity::{EntityId, EntityIds};
use crate::level::Level;
use crate::pickup::{Pickup, PickupKind};
use crate::player::Player;
use crate::projectile::{Impact, Projectile};
use crate::render::{Renderable, render_in_layer_order};
use crate::scenery::{BackgroundLayer, Cloud};
use crate::scheduler::{Task, TaskQueue};
use crate::sinks::{AudioSink, Cue, Hud, InputState, LogAudio, RenderSink, StatusBar, UiSignal, UiSink};
use crate::tick::TickContext;
use rand::rngs::StdRng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// The collaborators a world runs against. They outlive any one world so a
/// session can hand them to the next one on restart.
pub struct Services {
    pub clock: Box<dyn Clock>,
    pub audio: Box<dyn AudioSink>,
    pub ui: Box<dyn UiSink>,
}

impl Services {
    pub fn new(clock: Box<dyn Clock>, audio: Box<dyn AudioSink>, ui: Box<dyn UiSink>) -> Self {
        Services { clock, audio, ui }
    }

    /// Real time, log-only audio and a UI sink that only logs.
    pub fn detached() -> Self {
        Services::new(
            Box::new(SystemClock::new()),
            Box::new(LogAudio::default()),
            Box::new(LogUi),
        )
    }
}

struct LogUi;

impl UiSink for LogUi {
    fn signal(&mut self, signal: UiSignal) {
        log::debug!("ui signal {:?}", signal);
    }
}

/// How a level ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Lost,
    Won,
}

/// Forwards signals to the real UI sink while keeping the world's own HUD
/// copy and outcome in step.
struct SignalTap<'a> {
    hud: &'a mut Hud,
    outcome: &'a mut Option<Outcome>,
    inner: &'a mut dyn UiSink,
}

impl UiSink for SignalTap<'_> {
    fn signal(&mut self, signal: UiSignal) {
        match signal {
            UiSignal::Status(StatusBar::Health, value) => self.hud.health = value,
            UiSignal::Status(StatusBar::Bottles, value) => self.hud.bottles = value,
            UiSignal::Status(StatusBar::Coins, value) => self.hud.coins = value,
            UiSignal::Status(StatusBar::BossHealth, value) => self.hud.boss_health = value,
            UiSignal::GameOver => *self.outcome = Some(Outcome::Lost),
            UiSignal::Victory => *self.outcome = Some(Outcome::Won),
            UiSignal::RestartControls => {}
        }
        self.inner.signal(signal);
    }
}

fn percentage(count: usize, per_item: u32) -> u8 {
    (count as u64 * per_item as u64).min(100) as u8
}

/// World encapsulates all entities and state of one running level.
pub struct World {
    config: GameConfig,
    services: Services,
    tasks: TaskQueue,
    ids: EntityIds,
    rng: StdRng,
    player: Player,
    enemies: Vec<Enemy>,
    boss: Option<Boss>,
    projectiles: Vec<Projectile>,
    bottles: Vec<Pickup>,
    coins: Vec<Pickup>,
    backgrounds: Vec<BackgroundLayer>,
    clouds: Vec<Cloud>,
    input: InputState,
    camera_x: f32,
    bottles_held: usize,
    coins_held: usize,
    /// Cleared on launch, set again by the projectile's splash callback
    throw_ready: Rc<Cell<bool>>,
    game_started: bool,
    outcome: Option<Outcome>,
    hud: Hud,
}

impl World {
    /// Builds a world around `level` and registers every entity's tasks.
    ///
    /// Nothing moves toward the player until [`World::start`]; enemies poll
    /// for it on their own.
    pub fn new(config: GameConfig, level: Level, services: Services, rng: StdRng) -> Self {
        let now = services.clock.now();
        let mut tasks = TaskQueue::starting_at(now);
        let Level {
            mut ids,
            mut enemies,
            mut boss,
            mut bottles,
            coins,
            backgrounds,
            clouds,
        } = level;

        let player = Player::new(ids.next(), &config, now);
        player.spawn(&mut tasks, &config);
        for enemy in enemies.iter_mut() {
            enemy.spawn(&mut tasks, &config);
        }
        if let Some(boss) = boss.as_mut() {
            boss.spawn(&mut tasks, &config);
        }
        for bottle in bottles.iter_mut() {
            bottle.spawn(&mut tasks, &config);
        }
        for cloud in &clouds {
            cloud.spawn(&mut tasks, &config);
        }
        // Registered last so it runs after entity ticks due at the same time
        tasks.every(period_from_hz(config.world.logic_hz), Task::WorldLogic);

        let camera_x = -player.x() + config.player.camera_lead;
        log::info!(
            "World ready: {} enemies, {} bottles, {} coins, {} tasks",
            enemies.len(),
            bottles.len(),
            coins.len(),
            tasks.len()
        );

        World {
            config,
            services,
            tasks,
            ids,
            rng,
            player,
            enemies,
            boss,
            projectiles: Vec::new(),
            bottles,
            coins,
            backgrounds,
            clouds,
            input: InputState::default(),
            camera_x,
            bottles_held: 0,
            coins_held: 0,
            throw_ready: Rc::new(Cell::new(true)),
            game_started: false,
            outcome: None,
            hud: Hud::default(),
        }
    }

    /// Lets enemies start walking and starts the main music. Idempotent.
    pub fn start(&mut self) {
        if self.game_started {
            return;
        }
        self.game_started = true;
        let cue = Cue::MainMusic;
        self.services.audio.play_looped(cue, cue.volume());
        log::info!("Game started");
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    /// Runs every task due by the clock's current time, in due order.
    /// Returns how many tasks ran.
    pub fn update(&mut self) -> usize {
        let now = self.services.clock.now();
        let mut dispatched = 0;
        while let Some(due) = self.tasks.pop_due(now) {
            self.dispatch(due.task, due.at);
            dispatched += 1;
        }
        self.tasks.settle(now);
        dispatched
    }

    fn dispatch(&mut self, task: Task, now: Duration) {
        if task == Task::WorldLogic {
            self.logic_tick(now);
            return;
        }

        let World {
            config,
            services,
            tasks,
            rng,
            player,
            enemies,
            boss,
            projectiles,
            bottles,
            clouds,
            input,
            camera_x,
            game_started,
            outcome,
            hud,
            ..
        } = self;
        let mut ui = SignalTap {
            hud,
            outcome,
            inner: services.ui.as_mut(),
        };
        let mut ctx = TickContext {
            now,
            config,
            tasks,
            audio: services.audio.as_mut(),
            ui: &mut ui,
        };

        match task {
            Task::Gravity(id) if id == player.id() => player.on_physics_tick(&ctx),
            Task::Gravity(id) => {
                if let Some(bottle) = find_projectile(projectiles, id) {
                    bottle.on_physics_tick(&ctx);
                }
            }
            Task::PlayerMovement => *camera_x = player.on_movement_tick(&mut ctx, input),
            Task::PlayerAnimation => player.on_animation_tick(&mut ctx, input),
            Task::PlayerDeathFrame => player.on_death_frame(&mut ctx),
            Task::GameOver => {
                log::info!("Game over");
                ctx.signal(UiSignal::GameOver);
                ctx.play(Cue::LoseJingle);
                ctx.stop(Cue::MainMusic);
                let cancelled = ctx.tasks.cancel_all();
                log::debug!("Cancelled {} tasks on game over", cancelled);
                let delay = Duration::from_millis(ctx.config.player.restart_controls_delay_ms);
                ctx.tasks.after(delay, Task::RestartControls);
            }
            Task::RestartControls => ctx.signal(UiSignal::RestartControls),
            Task::EnemyAwaitStart(id) => {
                if let Some(enemy) = find_enemy(enemies, id) {
                    enemy.on_await_start(&mut ctx, *game_started);
                }
            }
            Task::EnemyWalk(id) => {
                if let Some(enemy) = find_enemy(enemies, id) {
                    enemy.on_walk(&mut ctx);
                }
            }
            Task::EnemyAnimation(id) => {
                if let Some(enemy) = find_enemy(enemies, id) {
                    enemy.on_animation(&mut ctx);
                }
            }
            Task::EnemyCollect(id) => {
                if let Some(enemy) = find_enemy(enemies, id) {
                    enemy.on_collect(&mut ctx);
                }
            }
            Task::BossAlert => {
                if let Some(boss) = boss.as_mut() {
                    boss.on_alert(&mut ctx);
                }
            }
            Task::BossWalk => {
                if let Some(boss) = boss.as_mut() {
                    boss.on_walk(&mut ctx, player.is_dead());
                }
            }
            Task::BossHurtFrame => {
                if let Some(boss) = boss.as_mut() {
                    boss.on_hurt_frame(&mut ctx);
                }
            }
            Task::BossHurtEnd => {
                if let Some(boss) = boss.as_mut() {
                    boss.on_hurt_end(&mut ctx);
                }
            }
            Task::BossDeathFrame => {
                if let Some(boss) = boss.as_mut() {
                    boss.on_death_frame(&mut ctx);
                }
            }
            Task::BossFinalize => {
                log::info!("Level won, tearing down");
                ctx.signal(UiSignal::RestartControls);
                ctx.stop(Cue::MainMusic);
                ctx.tasks.cancel_all();
            }
            Task::ProjectileDrift(id) => {
                if let Some(bottle) = find_projectile(projectiles, id) {
                    bottle.on_drift();
                }
            }
            Task::ProjectileSpin(id) => {
                if let Some(bottle) = find_projectile(projectiles, id) {
                    bottle.on_spin(&mut ctx);
                }
            }
            Task::ProjectileSplashFrame(id) => {
                if let Some(bottle) = find_projectile(projectiles, id) {
                    bottle.on_splash_frame(&mut ctx);
                }
            }
            Task::PickupAnimation(id) => {
                if let Some(bottle) = bottles.iter_mut().find(|b| b.id() == id) {
                    bottle.on_animation();
                }
            }
            Task::CloudDrift(id) => {
                if let Some(cloud) = clouds.iter_mut().find(|c| c.id() == id) {
                    cloud.on_drift(ctx.config, rng);
                }
            }
            Task::WorldLogic => {}
        }
    }

    /// One pass of world logic, in fixed order.
    fn logic_tick(&mut self, now: Duration) {
        let World {
            config,
            services,
            tasks,
            ids,
            player,
            enemies,
            boss,
            projectiles,
            bottles,
            coins,
            input,
            bottles_held,
            coins_held,
            throw_ready,
            outcome,
            hud,
            ..
        } = self;
        let mut ui = SignalTap {
            hud,
            outcome,
            inner: services.ui.as_mut(),
        };
        let mut ctx = TickContext {
            now,
            config,
            tasks,
            audio: services.audio.as_mut(),
            ui: &mut ui,
        };

        // (a) player vs roaming enemies
        if !player.is_dead() {
            for index in colliding_indices(&*player, enemies) {
                let enemy = &mut enemies[index];
                if enemy.is_dead() {
                    continue;
                }
                if player.is_above(&enemy.body.entity) {
                    if enemy.die(&mut ctx) {
                        player.bounce(ctx.config.player.stomp_bounce);
                    }
                } else {
                    damage_player(player, &mut ctx);
                    if player.is_dead() {
                        break;
                    }
                }
            }
        }

        // (b) player vs boss
        if let Some(boss) = boss.as_ref() {
            if !player.is_dead() && !boss.is_defeated() && player.is_colliding(boss) {
                damage_player(player, &mut ctx);
            }
        }

        // (c) projectiles vs boss, then vs roaming enemies
        for bottle in projectiles.iter_mut().filter(|b| b.is_in_flight()) {
            if let Some(boss) = boss.as_mut() {
                if !boss.is_defeated() && bottle.is_colliding(&*boss) {
                    boss.receive_projectile(&mut ctx);
                    bottle.splash(&mut ctx, Impact::InPlace);
                    continue;
                }
            }
            let target = enemies
                .iter_mut()
                .find(|enemy| !enemy.is_dead() && bottle.is_colliding(&**enemy));
            if let Some(enemy) = target {
                enemy.die(&mut ctx);
                bottle.splash(&mut ctx, Impact::InPlace);
            }
        }

        // (d) pickups
        if !player.is_dead() {
            let cap = ctx.config.pickups.bottle_cap;
            let per_item = ctx.config.pickups.percent_per_item;
            for index in colliding_indices(&*player, bottles) {
                let bottle = &mut bottles[index];
                if bottle.collected || *bottles_held >= cap {
                    continue;
                }
                bottle.collect(ctx.tasks);
                *bottles_held += 1;
                ctx.play(Cue::BottlePickup);
                let value = percentage(*bottles_held, per_item);
                ctx.signal(UiSignal::Status(StatusBar::Bottles, value));
            }
            for index in colliding_indices(&*player, coins) {
                let coin = &mut coins[index];
                if coin.collected {
                    continue;
                }
                coin.collect(ctx.tasks);
                *coins_held += 1;
                ctx.play(Cue::Coin);
                let value = percentage(*coins_held, per_item);
                ctx.signal(UiSignal::Status(StatusBar::Coins, value));
            }
        }
        bottles.retain(|item| !item.collected);
        coins.retain(|item| !item.collected);

        // (e) boss activation
        if let Some(boss) = boss.as_mut() {
            if player.x() > ctx.config.boss.activation_x && !boss.is_activated() {
                boss.activate(&mut ctx);
            }
        }

        // (f) sweep
        enemies.retain(|enemy| !enemy.is_collected());
        projectiles.retain_mut(|bottle| {
            if bottle.is_disposed() {
                bottle.cancel_tasks(ctx.tasks);
                false
            } else {
                true
            }
        });

        // Throw admission
        let can_throw = input.up
            && *bottles_held > 0
            && throw_ready.get()
            && !player.is_dead()
            && !player.facing_left();
        if can_throw {
            let spawn = &ctx.config.player;
            let position = (
                player.x() + spawn.throw_offset_x,
                player.body.entity.y + spawn.throw_offset_y,
            );
            let mut bottle = Projectile::launch(ids.next(), position, ctx.config);
            bottle.spawn(ctx.tasks, ctx.config);
            let ready = Rc::clone(throw_ready);
            bottle.set_on_splash(Box::new(move || ready.set(true)));
            throw_ready.set(false);
            *bottles_held -= 1;
            let value = percentage(*bottles_held, ctx.config.pickups.percent_per_item);
            ctx.signal(UiSignal::Status(StatusBar::Bottles, value));
            log::debug!("Threw bottle {:?}, {} left", bottle.id(), bottles_held);
            projectiles.push(bottle);
        }
    }

    /// Draws the current state: every live entity in layer order, then the HUD.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let mut renderables = Vec::with_capacity(
            self.backgrounds.len()
                + self.clouds.len()
                + self.bottles.len()
                + self.coins.len()
                + self.enemies.len()
                + self.projectiles.len()
                + 2,
        );
        renderables.extend(self.backgrounds.iter().map(Renderable::Background));
        renderables.extend(self.clouds.iter().map(Renderable::Cloud));
        renderables.extend(self.bottles.iter().map(Renderable::Pickup));
        renderables.extend(self.coins.iter().map(Renderable::Pickup));
        renderables.extend(self.enemies.iter().map(Renderable::Enemy));
        renderables.extend(self.boss.iter().map(Renderable::Boss));
        renderables.extend(self.projectiles.iter().map(Renderable::Projectile));
        renderables.push(Renderable::Player(&self.player));
        render_in_layer_order(sink, self.camera_x, renderables, &self.hud);
    }

    /// Cancels every outstanding task and silences the music. Returns how
    /// many tasks were cancelled.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.tasks.cancel_all();
        let audio = self.services.audio.as_mut();
        audio.stop(Cue::BossMusic);
        audio.stop(Cue::MainMusic);
        log::info!("World torn down, {} tasks cancelled", cancelled);
        cancelled
    }

    /// Tears the world down and hands back its collaborators.
    pub fn into_services(mut self) -> Services {
        self.teardown();
        self.services
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> Duration {
        self.services.clock.now()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn bottles(&self) -> &[Pickup] {
        &self.bottles
    }

    pub fn coins(&self) -> &[Pickup] {
        &self.coins
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    pub fn bottles_held(&self) -> usize {
        self.bottles_held
    }

    pub fn coins_held(&self) -> usize {
        self.coins_held
    }

    /// True when no thrown bottle is still in the air or splashing.
    pub fn can_throw(&self) -> bool {
        self.throw_ready.get()
    }

    pub fn is_started(&self) -> bool {
        self.game_started
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn count_tasks(&self, predicate: impl Fn(&Task) -> bool) -> usize {
        self.tasks.count(predicate)
    }
}

/// Contact damage with status update; starts the death sequence at zero.
fn damage_player(player: &mut Player, ctx: &mut TickContext) {
    player.body.hit(ctx.now, ctx.config.physics.contact_damage);
    let health = player.body.energy().percentage();
    ctx.signal(UiSignal::Status(StatusBar::Health, health));
    if player.is_dead() {
        player.play_death_animation(ctx);
    }
}

fn find_enemy(enemies: &mut [Enemy], id: EntityId) -> Option<&mut Enemy> {
    let found = enemies.iter_mut().find(|enemy| enemy.id() == id);
    if found.is_none() {
        log::trace!("No enemy {:?} for due task", id);
    }
    found
}

fn find_projectile(projectiles: &mut [Projectile], id: EntityId) -> Option<&mut Projectile> {
    projectiles.iter_mut().find(|bottle| bottle.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::enemy::EnemyVariant;
    use crate::level::LevelLayout;
    use crate::sinks::{AudioLog, FrameRecorder, SignalLog};
    use rand::SeedableRng;

    struct Rig {
        clock: ManualClock,
        audio: AudioLog,
        ui: SignalLog,
    }

    impl Rig {
        fn new() -> Self {
            Rig {
                clock: ManualClock::new(),
                audio: AudioLog::new(),
                ui: SignalLog::new(),
            }
        }

        fn world(&self, level: Level) -> World {
            let services = Services::new(
                Box::new(self.clock.clone()),
                Box::new(self.audio.clone()),
                Box::new(self.ui.clone()),
            );
            World::new(GameConfig::default(), level, services, StdRng::seed_from_u64(7))
        }

        fn run(&self, world: &mut World, millis: u64) {
            // Small steps, like display frames
            for _ in 0..millis / 10 {
                self.clock.advance(Duration::from_millis(10));
                world.update();
            }
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_new_world_registers_tasks() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.enemies.push(Enemy::at(id, EnemyVariant::Normal, &config, 800.0, 0.3));
        let world = rig.world(level);

        assert_eq!(world.count_tasks(|t| *t == Task::WorldLogic), 1);
        assert_eq!(world.count_tasks(|t| matches!(t, Task::EnemyAwaitStart(_))), 1);
        assert_eq!(world.count_tasks(|t| *t == Task::PlayerMovement), 1);
        assert_eq!(world.camera_x(), -20.0);
    }

    #[test]
    fn test_enemies_wait_for_start() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.enemies.push(Enemy::at(id, EnemyVariant::Small, &config, 800.0, 0.5));
        let mut world = rig.world(level);

        rig.run(&mut world, 500);
        assert_eq!(world.enemies()[0].body.entity.x, 800.0);

        world.start();
        rig.run(&mut world, 500);
        assert!(world.enemies()[0].body.entity.x < 800.0);
        assert_eq!(
            rig.audio.events().iter().filter(|e| **e == crate::sinks::AudioEvent::Loop(Cue::MainMusic)).count(),
            1
        );
    }

    #[test]
    fn test_stomp_kills_and_bounces() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.enemies.push(Enemy::at(id, EnemyVariant::Normal, &config, 150.0, 0.0));
        let mut world = rig.world(level);

        // Falling onto the enemy just before the first logic tick
        rig.clock.set(ms(199));
        world.update();
        let player = world.player_mut();
        player.body.entity.y = 95.0;
        player.body.velocity_y = -5.0;
        rig.clock.set(ms(200));
        world.update();

        assert!(world.enemies()[0].is_dead());
        assert_eq!(world.player().body.energy().value(), 100);
        assert_eq!(rig.audio.plays(Cue::Squeeze), 1);

        rig.run(&mut world, 800);
        assert!(world.enemies().is_empty());
    }

    #[test]
    fn test_contact_damage_updates_health_bar() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.enemies.push(Enemy::at(id, EnemyVariant::Normal, &config, 150.0, 0.0));
        let mut world = rig.world(level);

        rig.clock.set(ms(200));
        world.update();

        assert_eq!(world.player().body.energy().value(), 95);
        assert_eq!(rig.ui.status_history(StatusBar::Health), vec![95]);
        assert_eq!(world.hud().health, 95);
    }

    #[test]
    fn test_boss_contact_damages_player() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let mut boss = Boss::new(level.ids.next(), &config);
        boss.body.entity.x = 150.0;
        level.boss = Some(boss);
        let mut world = rig.world(level);

        rig.clock.set(ms(200));
        world.update();

        assert_eq!(world.player().body.energy().value(), 95);
        assert_eq!(rig.ui.status_history(StatusBar::Health), vec![95]);
        // Contact alone never hurts the boss
        assert_eq!(world.boss().map(|b| b.body.energy().value()), Some(100));
    }

    #[test]
    fn test_defeated_boss_deals_no_contact_damage() {
        let config = GameConfig::default();
        let mut level = Level::empty();
        let mut boss = Boss::new(level.ids.next(), &config);
        let mut harness = crate::tick::Harness::new();
        for _ in 0..5 {
            boss.receive_projectile(&mut harness.ctx(ms(0)));
        }
        assert!(boss.is_defeated());
        boss.body.entity.x = 150.0;
        level.boss = Some(boss);

        let rig = Rig::new();
        let mut world = rig.world(level);
        rig.run(&mut world, 400);

        assert_eq!(world.player().body.energy().value(), 100);
        assert!(rig.ui.status_history(StatusBar::Health).is_empty());
    }

    #[test]
    fn test_thrown_bottle_kills_roaming_enemy() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.bottles.push(Pickup::at(id, PickupKind::Bottle, &config, 160.0));
        // Raised into the bottle's arc, out of the player's reach
        let mut enemy = Enemy::at(level.ids.next(), EnemyVariant::Normal, &config, 330.0, 0.0);
        enemy.body.entity.y = 100.0;
        level.enemies.push(enemy);
        let mut world = rig.world(level);
        world.set_input(InputState {
            up: true,
            ..InputState::default()
        });

        // Picked up and thrown on the first logic tick
        rig.run(&mut world, 200);
        assert_eq!(world.projectiles().len(), 1);
        assert!(!world.can_throw());

        // Next logic tick: the bottle meets the enemy and detonates in place
        rig.run(&mut world, 200);
        assert!(world.enemies()[0].is_dead());
        assert_eq!(rig.audio.plays(Cue::Squeeze), 1);
        assert_eq!(rig.audio.plays(Cue::Splash), 1);
        assert_eq!(world.player().body.energy().value(), 100);

        // Collected 500 ms after death, swept on the following logic tick
        rig.run(&mut world, 700);
        assert!(world.enemies().is_empty());
        assert!(world.projectiles().is_empty());
        assert!(world.can_throw());
        assert_eq!(rig.audio.plays(Cue::Squeeze), 1);
    }

    #[test]
    fn test_bottle_pickup_respects_cap() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        for _ in 0..6 {
            let id = level.ids.next();
            level.bottles.push(Pickup::at(id, PickupKind::Bottle, &config, 160.0));
        }
        let mut world = rig.world(level);

        rig.clock.set(ms(200));
        world.update();

        assert_eq!(world.bottles_held(), 5);
        assert_eq!(world.bottles().len(), 1);
        assert_eq!(rig.audio.plays(Cue::BottlePickup), 5);
        assert_eq!(rig.ui.status_history(StatusBar::Bottles), vec![20, 40, 60, 80, 100]);
    }

    #[test]
    fn test_coins_are_uncapped() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        for _ in 0..7 {
            let id = level.ids.next();
            level.coins.push(Pickup::at(id, PickupKind::Coin, &config, 160.0));
        }
        let mut world = rig.world(level);

        rig.clock.set(ms(200));
        world.update();

        assert_eq!(world.coins_held(), 7);
        assert!(world.coins().is_empty());
        assert_eq!(rig.ui.status_history(StatusBar::Coins).last(), Some(&100));
    }

    #[test]
    fn test_boss_activates_past_threshold() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.boss = Some(Boss::new(id, &config));
        let mut world = rig.world(level);

        world.player_mut().body.entity.x = 1801.0;
        rig.run(&mut world, 200);

        let boss = world.boss().map(|b| b.is_activated());
        assert_eq!(boss, Some(true));
        assert_eq!(world.count_tasks(|t| *t == Task::BossWalk), 1);
    }

    #[test]
    fn test_throw_needs_bottle_and_facing_right() {
        let rig = Rig::new();
        let mut level = Level::empty();
        let config = GameConfig::default();
        let id = level.ids.next();
        level.bottles.push(Pickup::at(id, PickupKind::Bottle, &config, 160.0));
        let mut world = rig.world(level);
        world.set_input(InputState {
            up: true,
            ..InputState::default()
        });
        world.player_mut().body.entity.mirrored = true;

        rig.clock.set(ms(200));
        world.update();
        assert_eq!(world.bottles_held(), 1);
        assert!(world.projectiles().is_empty());

        world.player_mut().body.entity.mirrored = false;
        rig.clock.set(ms(400));
        world.update();
        assert_eq!(world.projectiles().len(), 1);
        assert_eq!(world.bottles_held(), 0);
        assert!(!world.can_throw());
    }

    #[test]
    fn test_render_draws_player_last_before_hud() {
        let rig = Rig::new();
        let mut rng = StdRng::seed_from_u64(3);
        let config = GameConfig::default();
        let level = Level::build(&LevelLayout::level_one(), &config, &mut rng);
        let world = rig.world(level);

        let mut recorder = FrameRecorder::default();
        world.render(&mut recorder);
        let last = recorder.calls.last().map(|call| call.x);
        assert_eq!(last, Some(120.0));
        assert_eq!(recorder.frames, 1);
        assert!(recorder.hud.is_some());
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let rig = Rig::new();
        let mut rng = StdRng::seed_from_u64(3);
        let config = GameConfig::default();
        let level = Level::build(&LevelLayout::level_one(), &config, &mut rng);
        let mut world = rig.world(level);
        world.start();

        assert!(world.teardown() > 0);
        assert_eq!(world.pending_tasks(), 0);
        rig.clock.advance(ms(5_000));
        assert_eq!(world.update(), 0);
    }
}
