use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnding {
    Won,
    Lost { mine: Coord2 },
}

impl GameEnding {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Won => "You cleared the minefield!",
            Self::Lost { .. } => "You hit a mine!",
        }
    }
}

/// State changes a presentation layer has to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    NewGame { config: GameConfig, seed: u64 },
    CellsChanged(Vec<Coord2>),
    MinesLeft(i64),
    Tick(u32),
    PhaseChanged(Phase),
    Ended(GameEnding),
}

/// Receiver of [`GameEvent`]s, implemented by the host.
pub trait Notify {
    fn notify(&mut self, session: &Session, event: &GameEvent);
}

impl<F: FnMut(&Session, &GameEvent)> Notify for F {
    fn notify(&mut self, session: &Session, event: &GameEvent) {
        self(session, event)
    }
}

/// Owns the running session and reports every change of it to `N`.
#[derive(Debug)]
pub struct Controller<N> {
    session: Session,
    notifier: N,
}

impl<N: Notify> Controller<N> {
    pub fn new(session: Session, mut notifier: N) -> Self {
        notifier.notify(&session, &new_game_event(&session));
        Self { session, notifier }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// The session for reading alongside the notifier, for hosts that render on demand.
    pub fn split_mut(&mut self) -> (&Session, &mut N) {
        (&self.session, &mut self.notifier)
    }

    /// Replaces the running session; on error the current one stays in place.
    pub fn new_game(&mut self, config: GameConfig) -> Result<()> {
        self.replace(Session::new(config)?);
        Ok(())
    }

    pub fn new_game_with_seed(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        self.replace(Session::with_seed(config, seed)?);
        Ok(())
    }

    pub fn replace(&mut self, session: Session) {
        self.session = session;
        self.emit(new_game_event(&self.session));
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let before = self.session.phase();
        let result = self.session.reveal(coords)?;

        if !result.outcome.has_update() {
            return Ok(result);
        }

        self.emit(GameEvent::CellsChanged(result.changed.clone()));
        if result.phase != before {
            self.emit(GameEvent::PhaseChanged(result.phase));
        }
        match result.outcome {
            RevealOutcome::Won => self.emit(GameEvent::Ended(GameEnding::Won)),
            RevealOutcome::HitMine => {
                if let Some(mine) = result.triggered_mine {
                    self.emit(GameEvent::Ended(GameEnding::Lost { mine }));
                }
            }
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }

        Ok(result)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        let result = self.session.toggle_flag(coords)?;

        if result.outcome.has_update() {
            self.emit(GameEvent::CellsChanged(vec![coords]));
            self.emit(GameEvent::MinesLeft(result.mines_left));
        }

        Ok(result)
    }

    pub fn tick(&mut self) -> u32 {
        let before = self.session.elapsed_seconds();
        let elapsed = self.session.tick();
        if elapsed != before {
            self.emit(GameEvent::Tick(elapsed));
        }
        elapsed
    }

    fn emit(&mut self, event: GameEvent) {
        log::trace!("Event: {:?}", event);
        self.notifier.notify(&self.session, &event);
    }
}

fn new_game_event(session: &Session) -> GameEvent {
    GameEvent::NewGame {
        config: session.config(),
        seed: session.seed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder(Vec<GameEvent>);

    impl Notify for Recorder {
        fn notify(&mut self, _session: &Session, event: &GameEvent) {
            self.0.push(event.clone());
        }
    }

    fn controller(size: Coord2, mines: &[Coord2]) -> Controller<Recorder> {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        Controller::new(Session::from_layout(&layout).unwrap(), Recorder::default())
    }

    fn drain(controller: &mut Controller<Recorder>) -> Vec<GameEvent> {
        core::mem::take(&mut controller.notifier_mut().0)
    }

    #[test]
    fn announces_initial_session() {
        let mut controller = controller((2, 2), &[(0, 0)]);

        assert_eq!(
            drain(&mut controller),
            vec![GameEvent::NewGame {
                config: GameConfig::new_unchecked(2, 2, 1),
                seed: 0
            }]
        );
    }

    #[test]
    fn first_reveal_reports_cells_and_phase() {
        let mut controller = controller((1, 3), &[(0, 0)]);
        drain(&mut controller);

        controller.reveal((0, 1)).unwrap();

        assert_eq!(
            drain(&mut controller),
            vec![
                GameEvent::CellsChanged(vec![(0, 1)]),
                GameEvent::PhaseChanged(Phase::InProgress),
            ]
        );
    }

    #[test]
    fn loss_reports_ending_with_mine() {
        let mut controller = controller((2, 2), &[(1, 1)]);
        controller.reveal((0, 0)).unwrap();
        drain(&mut controller);

        controller.reveal((1, 1)).unwrap();

        let events = drain(&mut controller);
        assert_eq!(
            events.last(),
            Some(&GameEvent::Ended(GameEnding::Lost { mine: (1, 1) }))
        );
        assert!(events.contains(&GameEvent::PhaseChanged(Phase::Lost)));
        assert_eq!(GameEnding::Lost { mine: (1, 1) }.message(), "You hit a mine!");
    }

    #[test]
    fn first_reveal_on_laid_out_mine_loses_at_once() {
        let mut controller = controller((2, 2), &[(0, 0)]);
        drain(&mut controller);

        controller.reveal((0, 0)).unwrap();

        assert_eq!(
            drain(&mut controller),
            vec![
                GameEvent::CellsChanged(vec![(0, 0)]),
                GameEvent::PhaseChanged(Phase::Lost),
                GameEvent::Ended(GameEnding::Lost { mine: (0, 0) }),
            ]
        );
    }

    #[test]
    fn win_reports_ending() {
        let mut controller = controller((1, 3), &[(0, 0)]);
        drain(&mut controller);

        controller.reveal((0, 2)).unwrap();

        let events = drain(&mut controller);
        assert_eq!(events.last(), Some(&GameEvent::Ended(GameEnding::Won)));
        assert_eq!(GameEnding::Won.message(), "You cleared the minefield!");
    }

    #[test]
    fn no_op_commands_stay_silent() {
        let mut controller = controller((2, 2), &[(0, 0)]);
        controller.reveal((1, 1)).unwrap();
        drain(&mut controller);

        controller.reveal((1, 1)).unwrap();
        controller.toggle_flag((1, 1)).unwrap();

        assert!(drain(&mut controller).is_empty());
    }

    #[test]
    fn flag_reports_counter() {
        let mut controller = controller((2, 2), &[(0, 0)]);
        drain(&mut controller);

        controller.toggle_flag((0, 0)).unwrap();

        assert_eq!(
            drain(&mut controller),
            vec![
                GameEvent::CellsChanged(vec![(0, 0)]),
                GameEvent::MinesLeft(0)
            ]
        );
    }

    #[test]
    fn ticks_are_reported_only_while_running() {
        let mut controller = controller((2, 2), &[(0, 0)]);
        controller.tick();
        drain(&mut controller);

        controller.reveal((1, 1)).unwrap();
        drain(&mut controller);
        controller.tick();

        assert_eq!(drain(&mut controller), vec![GameEvent::Tick(1)]);
    }

    #[test]
    fn invalid_new_game_keeps_current_session() {
        let mut controller = controller((2, 2), &[(0, 0)]);
        controller.reveal((1, 1)).unwrap();
        drain(&mut controller);

        let err = controller.new_game(GameConfig::new_unchecked(9, 9, 81));

        assert!(matches!(err, Err(GameError::InvalidConfiguration { .. })));
        assert_eq!(controller.session().phase(), Phase::InProgress);
        assert!(drain(&mut controller).is_empty());
    }

    #[test]
    fn new_game_replaces_session() {
        let mut controller = controller((2, 2), &[(0, 0)]);
        controller.reveal((0, 0)).unwrap();

        controller
            .new_game_with_seed(GameConfig::beginner(), 11)
            .unwrap();

        assert_eq!(controller.session().phase(), Phase::NotStarted);
        assert_eq!(controller.session().size(), (9, 9));
        assert_eq!(
            drain(&mut controller).last(),
            Some(&GameEvent::NewGame {
                config: GameConfig::beginner(),
                seed: 11
            })
        );
    }

    #[test]
    fn closures_can_listen() {
        let mut count = 0;
        {
            let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
            let mut controller = Controller::new(
                Session::from_layout(&layout).unwrap(),
                |_: &Session, _: &GameEvent| count += 1,
            );
            controller.toggle_flag((0, 0)).unwrap();
        }
        assert_eq!(count, 3);
    }
}
