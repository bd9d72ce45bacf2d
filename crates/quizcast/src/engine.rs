//! The engine: one task that owns every room, the catalog, presence,
//! and the holding area.
//!
//! All mutation funnels through one mpsc channel, so there is exactly
//! one logical event loop and no locks. Transports (whatever carries
//! the wire bytes) talk to the engine through an [`EngineHandle`]:
//! they announce connections with a per-connection event sender, feed
//! decoded commands in, and report disconnects.
//!
//! Timers are spawned tasks that post back into the same channel (see
//! [`crate::timer`]). A fired timer is only honored when its epoch
//! matches the room's pending timer AND the room is still in the state
//! the timer was armed from, so a manual reveal racing a countdown
//! expiry can never double-fire.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quizcast_catalog::{Catalog, CatalogStore};
use quizcast_game::{Audience, Effect, GameRoom, Player};
use quizcast_protocol::{ClientCommand, ConnId, RoomId, ServerEvent};
use quizcast_session::{HoldingArea, Presence, Role, SessionConfig, identity};
use tokio::sync::mpsc;

use crate::EngineConfig;
use crate::error::EngineError;
use crate::timer::{self, ActiveTimer, TimerKind};

/// Everything that can land on the engine's channel.
pub(crate) enum EngineMsg {
    Connected {
        conn: ConnId,
        sender: mpsc::UnboundedSender<ServerEvent>,
    },
    Disconnected {
        conn: ConnId,
    },
    Command {
        conn: ConnId,
        command: ClientCommand,
    },
    TimerTick {
        room: RoomId,
        epoch: u64,
        seconds_remaining: u64,
    },
    TimerFired {
        room: RoomId,
        epoch: u64,
        kind: TimerKind,
    },
}

/// Cheap cloneable handle for feeding the engine. One per transport
/// task, typically.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineMsg>,
}

impl EngineHandle {
    /// Announces a new connection and hands over its event sender.
    /// Events for this connection flow out through `sender` until
    /// [`disconnect`](Self::disconnect).
    pub fn connect(&self, conn: ConnId, sender: mpsc::UnboundedSender<ServerEvent>) {
        let _ = self.tx.send(EngineMsg::Connected { conn, sender });
    }

    /// Reports that a connection closed. Players get parked for the
    /// reconnection grace period.
    pub fn disconnect(&self, conn: ConnId) {
        let _ = self.tx.send(EngineMsg::Disconnected { conn });
    }

    /// Feeds one decoded command in.
    pub fn command(&self, conn: ConnId, command: ClientCommand) {
        let _ = self.tx.send(EngineMsg::Command { conn, command });
    }
}

struct RoomEntry {
    game: GameRoom,
    /// The room's single pending timer, if any.
    timer: Option<ActiveTimer>,
}

/// The engine state. Owned by its task; never shared.
pub struct Engine<S: CatalogStore> {
    catalog: Catalog<S>,
    rooms: HashMap<RoomId, RoomEntry>,
    presence: Presence,
    holding: HoldingArea<Player>,
    outbox: HashMap<ConnId, mpsc::UnboundedSender<ServerEvent>>,
    session: SessionConfig,
    next_epoch: u64,
    tx: mpsc::UnboundedSender<EngineMsg>,
}

impl<S: CatalogStore> Engine<S> {
    /// Loads the catalog, brings up the configured rooms, and spawns
    /// the engine task.
    ///
    /// # Errors
    /// [`EngineError::Catalog`] when the backing store can't be read.
    pub fn spawn(config: EngineConfig, store: S) -> Result<EngineHandle, EngineError> {
        let catalog = Catalog::load(store)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut rooms = HashMap::new();
        for id in &config.rooms {
            rooms.insert(
                *id,
                RoomEntry {
                    game: GameRoom::new(*id, config.default_settings),
                    timer: None,
                },
            );
        }

        tracing::info!(
            rooms = rooms.len(),
            questions = catalog.questions().len(),
            active = catalog.active_count(),
            "engine starting"
        );

        let engine = Engine {
            catalog,
            rooms,
            presence: Presence::new(),
            holding: HoldingArea::new(config.session.reconnect_grace_secs),
            outbox: HashMap::new(),
            session: config.session,
            next_epoch: 0,
            tx: tx.clone(),
        };
        let sweep_every = Duration::from_secs(engine.session.sweep_interval_secs);
        tokio::spawn(engine.run(rx, sweep_every));

        Ok(EngineHandle { tx })
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<EngineMsg>, sweep_every: Duration) {
        let mut sweep = tokio::time::interval(sweep_every);
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        sweep.tick().await; // the immediate first tick

        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    // Every handle dropped: shut down.
                    None => break,
                },
                _ = sweep.tick() => {
                    self.holding.sweep(tokio::time::Instant::now().into_std());
                }
            }
        }
        tracing::info!("engine stopped");
    }

    fn handle(&mut self, msg: EngineMsg) {
        match msg {
            EngineMsg::Connected { conn, sender } => {
                self.outbox.insert(conn, sender);
            }
            EngineMsg::Disconnected { conn } => self.on_disconnect(conn),
            EngineMsg::Command { conn, command } => self.on_command(conn, command),
            EngineMsg::TimerTick {
                room,
                epoch,
                seconds_remaining,
            } => self.on_tick(room, epoch, seconds_remaining),
            EngineMsg::TimerFired { room, epoch, kind } => self.on_timer_fired(room, epoch, kind),
        }
    }

    // -- Connection lifecycle -----------------------------------------------

    fn on_disconnect(&mut self, conn: ConnId) {
        self.outbox.remove(&conn);
        let Some((role, room)) = self.presence.detach(conn) else {
            return;
        };
        tracing::debug!(%conn, %role, %room, "connection closed");
        if role != Role::Player {
            return;
        }
        let Some(entry) = self.rooms.get_mut(&room) else {
            return;
        };
        if let Some((player, effects)) = entry.game.remove_player(conn) {
            let name = player.name.clone();
            self.holding.stash(room, &name, player, tokio::time::Instant::now().into_std());
            self.apply(room, effects);
        }
    }

    // -- Command routing ----------------------------------------------------

    fn on_command(&mut self, conn: ConnId, command: ClientCommand) {
        match command {
            ClientCommand::ConnectAsAdmin { room } | ClientCommand::SwitchAdminRoom { room } => {
                self.connect_admin(conn, room)
            }
            ClientCommand::ConnectAsDisplay { room } => self.connect_display(conn, room),
            ClientCommand::Join {
                room,
                name,
                lang,
                photo,
            } => self.join(conn, room, name, lang, photo),
            ClientCommand::SubmitAnswer { choice } => self.submit_answer(conn, choice),

            ClientCommand::Start {
                question_secs,
                answer_secs,
            } => self.start_round(conn, false, question_secs, answer_secs),
            ClientCommand::StartAutoplay {
                question_secs,
                answer_secs,
            } => self.start_round(conn, true, question_secs, answer_secs),
            ClientCommand::StopAutoplay => self.room_control(conn, "stop_autoplay", |game, _| {
                Ok(game.stop_autoplay())
            }),
            ClientCommand::Advance => self.room_control(conn, "advance", |game, now| {
                game.advance(now)
            }),
            ClientCommand::Reveal => self.room_control(conn, "reveal", |game, now| {
                game.reveal(now)
            }),
            ClientCommand::Reset => self.room_control(conn, "reset", |game, _| Ok(game.reset())),

            ClientCommand::CatalogAdd { question } => self.catalog_edit(conn, |catalog| {
                catalog.add(question).map(|_| true)
            }),
            ClientCommand::CatalogUpdate { index, question } => self.catalog_edit(conn, |catalog| {
                catalog.update(index, question)
            }),
            ClientCommand::CatalogDelete { index } => {
                self.catalog_edit(conn, |catalog| Ok(catalog.delete(index)))
            }
            ClientCommand::CatalogToggle { index } => {
                self.catalog_edit(conn, |catalog| Ok(catalog.toggle(index).is_some()))
            }
            ClientCommand::CatalogBulkToggle { activate_all } => {
                self.catalog_edit(conn, |catalog| {
                    catalog.bulk_toggle(activate_all);
                    Ok(true)
                })
            }
        }
    }

    fn connect_admin(&mut self, conn: ConnId, room: RoomId) {
        if !self.rooms.contains_key(&room) {
            return self.notify_error(conn, format!("unknown room {room}"));
        }
        if let Err(e) = self.presence.register(conn, Role::Admin, room) {
            return self.notify_error(conn, e.to_string());
        }
        tracing::info!(%conn, %room, "admin connected");
        if let Some(event) = self.admin_snapshot_event(room) {
            self.send_to(conn, event);
        }
    }

    fn connect_display(&mut self, conn: ConnId, room: RoomId) {
        let Some(entry) = self.rooms.get(&room) else {
            return self.notify_error(conn, format!("unknown room {room}"));
        };
        let snapshot = entry
            .game
            .snapshot(tokio::time::Instant::now().into_std(), self.catalog.active_count(), None);
        if let Err(e) = self.presence.register(conn, Role::Display, room) {
            return self.notify_error(conn, e.to_string());
        }
        tracing::info!(%conn, %room, "display connected");
        self.send_to(conn, snapshot);
    }

    fn join(
        &mut self,
        conn: ConnId,
        room: RoomId,
        name: String,
        lang: Option<String>,
        photo: Option<String>,
    ) {
        if !self.rooms.contains_key(&room) {
            return self.notify_error(conn, format!("unknown room {room}"));
        }
        let name = match identity::sanitize_name(&name, self.session.max_name_chars) {
            Ok(name) => name,
            Err(e) => return self.notify_error(conn, e.to_string()),
        };
        // An over-sized photo is dropped; the join itself still goes through.
        let photo = match identity::check_photo(photo, self.session.max_photo_bytes) {
            Ok(photo) => photo,
            Err(e) => {
                tracing::warn!(%conn, %room, error = %e, "photo dropped");
                None
            }
        };
        if let Err(e) = self.presence.register(conn, Role::Player, room) {
            return self.notify_error(conn, e.to_string());
        }

        let now = tokio::time::Instant::now().into_std();
        let (player, reconnected) = match self.holding.reclaim(room, &name, now) {
            Some(mut parked) => {
                // Keep score and history; refresh the mutable identity
                // bits the client may have changed since.
                parked.name = name;
                if let Some(lang) = lang {
                    parked.lang = lang;
                }
                if photo.is_some() {
                    parked.photo = photo;
                }
                (parked, true)
            }
            None => (
                Player::new(name, lang.unwrap_or_else(|| "en".into()), photo, now),
                false,
            ),
        };

        let live_active = self.catalog.active_count();
        let effects = match self.rooms.get_mut(&room) {
            Some(entry) => entry.game.join(conn, player, reconnected, now, live_active),
            None => return,
        };
        self.apply(room, effects);
    }

    fn submit_answer(&mut self, conn: ConnId, choice: usize) {
        let Some((Role::Player, room)) = self.presence.lookup(conn) else {
            return self.notify_error(conn, "join a room before answering");
        };
        let now = tokio::time::Instant::now().into_std();
        let effects = match self.rooms.get_mut(&room) {
            Some(entry) => entry.game.submit_answer(conn, choice, now),
            None => return,
        };
        self.apply(room, effects);
    }

    fn start_round(
        &mut self,
        conn: ConnId,
        autoplay: bool,
        question_secs: Option<u64>,
        answer_secs: Option<u64>,
    ) {
        let Some(room) = self.require_admin(conn) else {
            return;
        };
        let active = self.catalog.active_questions();
        let outcome = match self.rooms.get_mut(&room) {
            Some(entry) => entry.game.start(active, autoplay, question_secs, answer_secs),
            None => return,
        };
        match outcome {
            Ok(effects) => self.apply(room, effects),
            Err(e) => self.notify_error(conn, e.to_string()),
        }
    }

    /// Shared plumbing for the admin lifecycle commands that don't
    /// touch the catalog.
    fn room_control<F>(&mut self, conn: ConnId, op: &'static str, transition: F)
    where
        F: FnOnce(&mut GameRoom, Instant) -> Result<Vec<Effect>, quizcast_game::GameError>,
    {
        let Some(room) = self.require_admin(conn) else {
            return;
        };
        let outcome = match self.rooms.get_mut(&room) {
            Some(entry) => transition(&mut entry.game, tokio::time::Instant::now().into_std()),
            None => return,
        };
        match outcome {
            Ok(effects) => self.apply(room, effects),
            Err(e) => {
                tracing::debug!(%conn, %room, op, error = %e, "admin command rejected");
                self.notify_error(conn, e.to_string());
            }
        }
    }

    fn require_admin(&self, conn: ConnId) -> Option<RoomId> {
        match self.presence.lookup(conn) {
            Some((Role::Admin, room)) => Some(room),
            _ => {
                self.notify_error(conn, "admin access required");
                None
            }
        }
    }

    // -- Catalog ------------------------------------------------------------

    /// Role-gates and applies one catalog edit. The edit reports
    /// `Ok(false)` when the target index doesn't exist.
    fn catalog_edit<F>(&mut self, conn: ConnId, edit: F)
    where
        F: FnOnce(&mut Catalog<S>) -> Result<bool, quizcast_catalog::CatalogError>,
    {
        if self.require_admin(conn).is_none() {
            return;
        }
        match edit(&mut self.catalog) {
            Ok(true) => self.broadcast_catalog(),
            Ok(false) => self.notify_error(conn, "question index out of range"),
            Err(e) => self.notify_error(conn, e.to_string()),
        }
    }

    /// Catalog edits are global: every admin panel gets the new copy,
    /// and every room's admin view is re-synced (waiting rooms show the
    /// live active count as their question total).
    fn broadcast_catalog(&mut self) {
        let event = ServerEvent::CatalogChanged {
            questions: self.catalog.questions().to_vec(),
            version: self.catalog.version(),
        };
        let admins: Vec<ConnId> = self.presence.all_admins().collect();
        for conn in admins {
            self.send_to(conn, event.clone());
        }
        let room_ids: Vec<RoomId> = self.rooms.keys().copied().collect();
        for room in room_ids {
            self.admin_sync(room);
        }
    }

    // -- Timers -------------------------------------------------------------

    fn on_tick(&mut self, room: RoomId, epoch: u64, seconds_remaining: u64) {
        let current = self
            .rooms
            .get(&room)
            .and_then(|entry| entry.timer.as_ref());
        if !current.is_some_and(|t| t.epoch == epoch && t.kind == TimerKind::Countdown) {
            return; // stale tick from a cancelled countdown
        }
        let tick = ServerEvent::CountdownTick { seconds_remaining };
        self.fan_out(room, Role::Player, tick.clone());
        self.fan_out(room, Role::Display, tick);
    }

    fn on_timer_fired(&mut self, room: RoomId, epoch: u64, kind: TimerKind) {
        let Some(entry) = self.rooms.get_mut(&room) else {
            return;
        };
        if !entry.timer.as_ref().is_some_and(|t| t.epoch == epoch) {
            tracing::debug!(%room, epoch, "stale timer ignored");
            return;
        }
        entry.timer = None;

        let now = tokio::time::Instant::now().into_std();
        let effects = match kind {
            TimerKind::Countdown => entry.game.countdown_expired(now),
            TimerKind::AutoPlay(step) => entry.game.autoplay_step(step, now),
        };
        self.apply(room, effects);
    }

    fn cancel_timer(&mut self, room: RoomId) {
        if let Some(entry) = self.rooms.get_mut(&room) {
            if let Some(timer) = entry.timer.take() {
                timer.cancel();
            }
        }
    }

    fn bump_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }

    // -- Effect interpretation ----------------------------------------------

    fn apply(&mut self, room: RoomId, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send(audience, event) => self.deliver(room, audience, event),
                Effect::StartCountdown { seconds } => {
                    self.cancel_timer(room);
                    let epoch = self.bump_epoch();
                    let timer = timer::spawn_countdown(self.tx.clone(), room, seconds, epoch);
                    if let Some(entry) = self.rooms.get_mut(&room) {
                        entry.timer = Some(timer);
                    }
                }
                Effect::ScheduleAutoPlay { delay, step } => {
                    self.cancel_timer(room);
                    let epoch = self.bump_epoch();
                    let timer = timer::spawn_autoplay(self.tx.clone(), room, delay, step, epoch);
                    if let Some(entry) = self.rooms.get_mut(&room) {
                        entry.timer = Some(timer);
                    }
                }
                Effect::CancelTimer => self.cancel_timer(room),
                Effect::CancelAutoPlay => {
                    if let Some(entry) = self.rooms.get_mut(&room) {
                        let is_autoplay = entry
                            .timer
                            .as_ref()
                            .is_some_and(|t| matches!(t.kind, TimerKind::AutoPlay(_)));
                        if is_autoplay {
                            if let Some(timer) = entry.timer.take() {
                                timer.cancel();
                            }
                        }
                    }
                }
                Effect::AdminSync => self.admin_sync(room),
            }
        }
    }

    fn deliver(&self, room: RoomId, audience: Audience, event: ServerEvent) {
        match audience {
            Audience::Conn(conn) => self.send_to(conn, event),
            Audience::Players => self.fan_out(room, Role::Player, event),
            Audience::Admins => self.fan_out(room, Role::Admin, event),
            Audience::Displays => self.fan_out(room, Role::Display, event),
        }
    }

    fn fan_out(&self, room: RoomId, role: Role, event: ServerEvent) {
        let mut members = self.presence.members(room, role).peekable();
        if members.peek().is_none() {
            return;
        }
        for conn in members {
            if let Some(sender) = self.outbox.get(&conn) {
                let _ = sender.send(event.clone());
            }
        }
    }

    fn send_to(&self, conn: ConnId, event: ServerEvent) {
        if let Some(sender) = self.outbox.get(&conn) {
            // A closed receiver means the disconnect is already in the
            // channel behind us; nothing to do.
            let _ = sender.send(event);
        }
    }

    fn notify_error(&self, conn: ConnId, reason: impl Into<String>) {
        self.send_to(
            conn,
            ServerEvent::ErrorNotice {
                reason: reason.into(),
            },
        );
    }

    fn admin_snapshot_event(&self, room: RoomId) -> Option<ServerEvent> {
        let entry = self.rooms.get(&room)?;
        Some(ServerEvent::AdminSnapshot(entry.game.admin_snapshot(
            self.catalog.questions().to_vec(),
            self.catalog.active_count(),
            self.catalog.version(),
        )))
    }

    fn admin_sync(&self, room: RoomId) {
        if let Some(event) = self.admin_snapshot_event(room) {
            self.fan_out(room, Role::Admin, event);
        }
    }
}
