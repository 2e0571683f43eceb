//! Async driver that owns a [`BattleEngine`] and advances its clock in real time.
//!
//! The engine lives inside a tokio task. Callers talk to it through a
//! cloneable [`DriverHandle`]; dropping every handle, or calling
//! [`DriverHandle::shutdown`], stops the battle and ends the task.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::battle::{BattleEngine, BattleView};
use crate::character::SkillId;
use crate::combat::EnemyId;
use crate::core::error::BattleError;

const COMMAND_BUFFER: usize = 32;

/// Shortest real-time tick the driver accepts.
pub const MIN_TICK: Duration = Duration::from_millis(1);

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("battle driver command channel closed")]
    CommandChannelClosed,

    #[error("battle driver reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error(transparent)]
    Battle(#[from] BattleError),
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Player input forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    Attack,
    Defend,
    UseSkill(SkillId),
    Capture,
    UseItem(String),
    SelectTarget(EnemyId),
}

pub enum DriverCommand {
    Start {
        chain: bool,
        reply: oneshot::Sender<std::result::Result<(), BattleError>>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    Input {
        input: PlayerInput,
        reply: oneshot::Sender<std::result::Result<(), BattleError>>,
    },
    View {
        reply: oneshot::Sender<BattleView>,
    },
    Shutdown,
}

#[derive(Clone)]
pub struct DriverHandle {
    command_tx: mpsc::Sender<DriverCommand>,
}

impl DriverHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> DriverCommand) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| DriverError::CommandChannelClosed)?;
        reply_rx.await.map_err(DriverError::ReplyChannelClosed)
    }

    pub async fn start(&self, chain: bool) -> Result<()> {
        Ok(self
            .request(|reply| DriverCommand::Start { chain, reply })
            .await??)
    }

    /// Returns whether a battle was running.
    pub async fn stop(&self) -> Result<bool> {
        self.request(|reply| DriverCommand::Stop { reply }).await
    }

    pub async fn input(&self, input: PlayerInput) -> Result<()> {
        Ok(self
            .request(|reply| DriverCommand::Input { input, reply })
            .await??)
    }

    pub async fn view(&self) -> Result<BattleView> {
        self.request(|reply| DriverCommand::View { reply }).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(DriverCommand::Shutdown)
            .await
            .map_err(|_| DriverError::CommandChannelClosed)
    }
}

struct BattleDriver<R: Rng> {
    engine: BattleEngine<R>,
    command_rx: mpsc::Receiver<DriverCommand>,
    tick: Duration,
}

impl<R: Rng> BattleDriver<R> {
    async fn run(mut self) -> BattleEngine<R> {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let step_ms = self.tick.as_millis() as u64;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(DriverCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = ticker.tick() => {
                    self.engine.advance(step_ms);
                }
            }
        }

        if self.engine.stop_battle() {
            debug!("stopped running battle on shutdown");
        }
        info!(clock_ms = self.engine.clock_ms(), "battle driver finished");
        self.engine
    }

    fn handle_command(&mut self, cmd: DriverCommand) {
        match cmd {
            DriverCommand::Start { chain, reply } => {
                let _ = reply.send(self.engine.start_battle(chain));
            }
            DriverCommand::Stop { reply } => {
                let _ = reply.send(self.engine.stop_battle());
            }
            DriverCommand::Input { input, reply } => {
                let result = match input {
                    PlayerInput::Attack => self.engine.player_attack(),
                    PlayerInput::Defend => self.engine.player_defend(),
                    PlayerInput::UseSkill(id) => self.engine.player_use_skill(id),
                    PlayerInput::Capture => self.engine.player_capture(),
                    PlayerInput::UseItem(id) => self.engine.player_use_item(&id),
                    PlayerInput::SelectTarget(id) => self.engine.select_target(id),
                };
                let _ = reply.send(result);
            }
            DriverCommand::View { reply } => {
                let _ = reply.send(self.engine.view());
            }
            DriverCommand::Shutdown => {}
        }
    }
}

/// Moves `engine` into a background task that advances its clock by `tick`
/// on every real `tick`. Ticks shorter than [`MIN_TICK`] are raised to it.
/// The join handle yields the engine back once the driver shuts down.
pub fn spawn_battle_driver<R>(
    engine: BattleEngine<R>,
    tick: Duration,
) -> (DriverHandle, JoinHandle<BattleEngine<R>>)
where
    R: Rng + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let driver = BattleDriver {
        engine,
        command_rx,
        tick: tick.max(MIN_TICK),
    };
    let join = tokio::spawn(driver.run());
    (DriverHandle { command_tx }, join)
}
