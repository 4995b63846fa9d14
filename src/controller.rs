//! Session controller.
//!
//! `GameController` is the single owner of a client's game: the turn state
//! machine, the second participant (remote peer or AI), the timer queue and
//! the renderer. Everything that can change the game arrives as a
//! `ControllerEvent` and is handled strictly in arrival order:
//!
//! ```text
//! UI intent ──┐
//! timer ──────┼──> queue ──> handle ──> TurnStateMachine ──> Renderer
//! relay ──────┘                              │
//!                                            └──> SyncProtocol / AiOpponent
//! ```
//!
//! Out-of-window intents (rolling on the opponent's turn, clicking a die
//! before the first roll) are logged at debug level and dropped.
//!
//! ## Driving time
//!
//! Nothing blocks. Delays are `Scheduler` entries; call `advance_by`,
//! `advance_to` or `run_until_idle` to fire them.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ai::{AiOpponent, TurnPolicy};
use crate::core::{
    Action, Category, EndReason, GameConfig, GameError, GameRng, GameSession, Mode, Result, Seat,
    DICE_COUNT, ROLLS_PER_TURN,
};
use crate::render::{Notice, Renderer};
use crate::sync::{Relay, RelayEvent, SyncProtocol};
use crate::turn::{Scheduler, TimerEvent, TurnStateMachine};

/// One unit of work for the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The local player pressed roll.
    Roll,
    /// The local player clicked a die.
    ToggleKeep(usize),
    /// The local player picked a category.
    Commit(Category),
    /// A scheduled delay elapsed.
    Timer(TimerEvent),
    /// The relay delivered something.
    Relay(RelayEvent),
}

#[derive(Debug)]
enum Participant {
    Remote(SyncProtocol),
    Ai(AiOpponent),
}

/// Owns and drives one client's session.
pub struct GameController<D: Renderer> {
    config: GameConfig,
    machine: TurnStateMachine,
    scheduler: Scheduler,
    participant: Participant,
    renderer: D,
    queue: VecDeque<ControllerEvent>,
    end_notified: bool,
}

fn session_rng(config: &GameConfig) -> GameRng {
    config.seed.map_or_else(GameRng::from_entropy, GameRng::new)
}

impl<D: Renderer> GameController<D> {
    /// Start a single-player game against the AI. The human moves first.
    pub fn single_player(config: GameConfig, renderer: D) -> Result<Self> {
        config.validate()?;
        let mut machine = TurnStateMachine::new(Mode::Singleplayer, session_rng(&config));
        let ai = AiOpponent::new(machine.rng_mut().fork());
        machine.start_match(Seat::Me);
        Ok(Self::assemble(config, machine, Participant::Ai(ai), renderer))
    }

    /// Create a multiplayer client on `relay`. The game starts when the
    /// relay reports a match.
    pub fn multiplayer(config: GameConfig, relay: impl Relay + 'static, renderer: D) -> Result<Self> {
        config.validate()?;
        let machine = TurnStateMachine::new(Mode::Multiplayer, session_rng(&config));
        let protocol = SyncProtocol::new(relay, config.wire_format);
        Ok(Self::assemble(config, machine, Participant::Remote(protocol), renderer))
    }

    fn assemble(
        config: GameConfig,
        machine: TurnStateMachine,
        participant: Participant,
        mut renderer: D,
    ) -> Self {
        renderer.init_display(config.display_width, config.display_height);
        let mut controller = Self {
            config,
            machine,
            scheduler: Scheduler::new(),
            participant,
            renderer,
            queue: VecDeque::new(),
            end_notified: false,
        };
        controller.refresh();
        controller
    }

    // === Accessors ===

    #[must_use]
    pub fn session(&self) -> &GameSession {
        self.machine.session()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &D {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut D {
        &mut self.renderer
    }

    /// Check if an immediate yacht is waiting for its auto-score.
    #[must_use]
    pub fn yacht_pending(&self) -> bool {
        self.machine.yacht_pending()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.machine.session().is_game_over()
    }

    /// Inbound sequence anomalies seen from the peer. Always 0 against the AI.
    #[must_use]
    pub fn desync_count(&self) -> u32 {
        match &self.participant {
            Participant::Remote(protocol) => protocol.desync_count(),
            Participant::Ai(_) => 0,
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next scheduled event is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    // === Intents ===

    /// Queue an event without processing it.
    pub fn dispatch(&mut self, event: ControllerEvent) {
        self.queue.push_back(event);
    }

    /// Roll the unkept dice.
    pub fn roll(&mut self) {
        self.dispatch(ControllerEvent::Roll);
        self.process();
    }

    /// Renderer callback for a click on die `index`.
    pub fn die_clicked(&mut self, index: usize) {
        self.dispatch(ControllerEvent::ToggleKeep(index));
        self.process();
    }

    /// Score the current dice in `category`.
    pub fn commit(&mut self, category: Category) {
        self.dispatch(ControllerEvent::Commit(category));
        self.process();
    }

    /// Play the whole local turn with `policy` (autopilot).
    ///
    /// Returns false without doing anything if it is not the local turn. An
    /// immediate yacht leaves the commit to its scheduled auto-score.
    pub fn autoplay_turn(&mut self, policy: &impl TurnPolicy) -> bool {
        if !self.machine.session().is_my_turn() {
            return false;
        }
        let turn = self.machine.session().turn_number();
        self.roll();

        for _ in 1..ROLLS_PER_TURN {
            let session = self.machine.session();
            if session.turn_number() != turn || session.rolls_left() == 0 {
                break;
            }
            let keep = policy.keep(session.dice(), session.scorecard(Seat::Me));
            let mask = session.dice().kept_mask();
            let toggles: Vec<usize> = (0..DICE_COUNT)
                .filter(|i| mask[*i] != keep.contains(i))
                .collect();
            for index in toggles {
                self.die_clicked(index);
            }
            if keep.len() == DICE_COUNT {
                break;
            }
            self.roll();
        }

        let session = self.machine.session();
        if self.machine.yacht_pending() || session.turn_number() != turn {
            return true;
        }
        if let Some(category) = policy.choose_category(session.dice(), session.scorecard(Seat::Me)) {
            self.commit(category);
        }
        true
    }

    // === Event loop ===

    /// Handle queued events, pulling in relay deliveries, until nothing is
    /// left. Returns how many events were handled.
    pub fn process(&mut self) -> usize {
        let mut handled = 0;
        loop {
            self.pump_relay();
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Fire every timer due within `delta` of now.
    pub fn advance_by(&mut self, delta: Duration) -> usize {
        let target = self.scheduler.now() + delta;
        self.advance_to(target)
    }

    /// Fire every timer due at or before `target`, in deadline order.
    /// Returns how many fired.
    pub fn advance_to(&mut self, target: Duration) -> usize {
        self.process();
        let mut fired = 0;
        while let Some(event) = self.scheduler.pop_due(target) {
            self.dispatch(ControllerEvent::Timer(event));
            self.process();
            fired += 1;
        }
        self.scheduler.set_now(target);
        fired
    }

    /// Fire timers, jumping the clock from deadline to deadline, until none
    /// are left.
    pub fn run_until_idle(&mut self) -> usize {
        self.process();
        let mut fired = 0;
        while let Some(deadline) = self.scheduler.next_deadline() {
            fired += self.advance_to(deadline);
        }
        fired
    }

    fn pump_relay(&mut self) {
        if let Participant::Remote(protocol) = &mut self.participant {
            while let Some(event) = protocol.poll() {
                self.queue.push_back(ControllerEvent::Relay(event));
            }
        }
    }

    fn handle(&mut self, event: ControllerEvent) {
        let result = match event {
            ControllerEvent::Roll => self.on_roll(),
            ControllerEvent::ToggleKeep(index) => self.on_toggle_keep(index),
            ControllerEvent::Commit(category) => self.on_commit(category),
            ControllerEvent::Timer(timer) => self.on_timer(timer),
            ControllerEvent::Relay(relay) => self.on_relay(relay),
        };
        if let Err(err) = result {
            self.on_error(err);
        }
        self.refresh();
        self.check_end();
    }

    fn on_error(&mut self, err: GameError) {
        if err.is_ignorable() {
            debug!(error = %err, "event dropped");
            return;
        }
        match &err {
            GameError::PeerLost | GameError::Relay(_) => {
                warn!(error = %err, "peer unreachable");
                self.lose_peer();
            }
            GameError::Json(_) | GameError::Binary(_) => {
                warn!(error = %err, "malformed envelope dropped");
            }
            _ => warn!(error = %err, "event failed"),
        }
    }

    // === Handlers ===

    fn on_roll(&mut self) -> Result<()> {
        let outcome = self.machine.roll()?;
        if outcome.yacht_pending {
            let turn = self.machine.session().turn_number();
            info!(turn, "yacht! auto-scoring after celebration");
            self.scheduler.schedule(
                self.config.yacht_celebration_delay(),
                TimerEvent::YachtAutoScore { turn },
            );
        }
        self.refresh();
        self.propagate(&outcome.action)
    }

    fn on_toggle_keep(&mut self, index: usize) -> Result<()> {
        let action = self.machine.toggle_keep(index)?;
        self.refresh();
        self.propagate(&action)
    }

    fn on_commit(&mut self, category: Category) -> Result<()> {
        let action = self.machine.commit_score(category)?;
        self.refresh();
        self.propagate(&action)?;
        self.start_ai_turn();
        Ok(())
    }

    fn on_timer(&mut self, timer: TimerEvent) -> Result<()> {
        match timer {
            TimerEvent::YachtAutoScore { turn } => {
                let Some(action) = self.machine.auto_score_yacht(turn)? else {
                    return Ok(());
                };
                self.refresh();
                self.propagate(&action)?;
                self.start_ai_turn();
                Ok(())
            }
            TimerEvent::AiStep { turn } => self.ai_step(turn),
        }
    }

    fn on_relay(&mut self, event: RelayEvent) -> Result<()> {
        let Participant::Remote(protocol) = &mut self.participant else {
            return Ok(());
        };
        match event {
            RelayEvent::MatchFound { peer_id, starting } => {
                protocol.set_peer(peer_id);
                self.machine.start_match(starting);
                Ok(())
            }
            RelayEvent::Action(bytes) => {
                let action = protocol.receive(&bytes)?;
                self.machine.apply_peer_action(&action)
            }
            RelayEvent::PeerDisconnected => Err(GameError::PeerLost),
        }
    }

    // === Participants ===

    fn propagate(&mut self, action: &Action) -> Result<()> {
        match &mut self.participant {
            Participant::Remote(protocol) => protocol.publish(action),
            Participant::Ai(_) => Ok(()),
        }
    }

    /// Kick off the AI's turn if the turn just passed to it.
    fn start_ai_turn(&mut self) {
        let session = self.machine.session();
        if session.is_game_over() || session.turn_owner() != Seat::Opponent {
            return;
        }
        let turn = session.turn_number();
        if let Participant::Ai(ai) = &mut self.participant {
            ai.begin_turn();
            self.scheduler
                .schedule(self.config.ai_step_delay(), TimerEvent::AiStep { turn });
        }
    }

    fn ai_step(&mut self, turn: u32) -> Result<()> {
        let session = self.machine.session();
        if session.is_game_over()
            || session.turn_number() != turn
            || session.turn_owner() != Seat::Opponent
        {
            debug!(turn, "stale ai step dropped");
            return Ok(());
        }
        let Participant::Ai(ai) = &mut self.participant else {
            return Ok(());
        };
        let Some(step) = ai.step(self.machine.session().scorecard(Seat::Opponent)) else {
            return Ok(());
        };

        for action in &step.actions {
            self.machine.apply_peer_action(action)?;
        }
        if !step.done {
            self.scheduler
                .schedule(self.config.ai_step_delay(), TimerEvent::AiStep { turn });
        }
        Ok(())
    }

    fn lose_peer(&mut self) {
        if let Participant::Remote(protocol) = &mut self.participant {
            protocol.mark_peer_lost();
        }
        self.machine.end_by_peer_loss();
    }

    // === Display ===

    fn refresh(&mut self) {
        let dice = self.machine.session().dice();
        self.renderer.set_dice_values(dice.values());
        self.renderer.set_kept_mask(dice.kept_mask());
    }

    fn check_end(&mut self) {
        if self.end_notified {
            return;
        }
        let Some(reason) = self.machine.session().end_reason() else {
            return;
        };
        self.end_notified = true;
        self.scheduler.clear();
        if let Participant::Ai(ai) = &mut self.participant {
            ai.halt();
        }

        let notice = match reason {
            EndReason::PeerLost => Notice::PeerLost,
            EndReason::Completed => Notice::GameOver(self.machine.session().outcome()),
        };
        info!(?notice, "session ended");
        self.renderer.notify(&notice);
    }
}
