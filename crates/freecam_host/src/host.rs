//! Executes script instructions against the freecam core.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use app::LOG_HOST;
use freecam::{
    AvatarHost, CommandError, FreecamSettings, PlayerId, Pose, Position, SessionController,
    SessionStore, ToggleOutcome, WorldAction, WorldInteractionGuard,
};

use crate::script::{self, Instruction, ScriptError};
use crate::world::SimWorld;

/// Where players spawn when `join` gives no position.
const SPAWN: Position = Position::new(0.0, 64.0, 0.0);

pub struct Host {
    world: Arc<SimWorld>,
    controller: SessionController<Arc<SimWorld>, Arc<SimWorld>>,
    guard: WorldInteractionGuard,
}

/// Counters for one script run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub lines: usize,
    pub errors: usize,
}

impl Host {
    pub fn new(settings: &FreecamSettings) -> Self {
        let world = Arc::new(SimWorld::new());
        let store = Arc::new(SessionStore::with_defaults(settings.session_defaults()));
        let controller = SessionController::new(
            store,
            Arc::clone(&world),
            Arc::clone(&world),
            settings.controller_config(),
        );
        let guard = controller.guard();
        Self {
            world,
            controller,
            guard,
        }
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn controller(&self) -> &SessionController<Arc<SimWorld>, Arc<SimWorld>> {
        &self.controller
    }

    fn player(&self, name: &str) -> Result<PlayerId, ScriptError> {
        self.world
            .id_of(name)
            .ok_or_else(|| ScriptError::UnknownPlayer(name.to_string()))
    }

    /// Runs one script line and returns the lines to print.
    pub fn run_line(&self, line: &str) -> Result<Vec<String>, ScriptError> {
        match script::parse_line(line)? {
            Some(instruction) => self.run(instruction),
            None => Ok(Vec::new()),
        }
    }

    pub fn run(&self, instruction: Instruction) -> Result<Vec<String>, ScriptError> {
        let replies = match instruction {
            Instruction::Join {
                name,
                position,
                rotation,
            } => {
                let pose = Pose::new(position.unwrap_or(SPAWN), rotation.unwrap_or_default());
                self.world
                    .join(&name, pose)
                    .ok_or_else(|| ScriptError::AlreadyJoined(name.clone()))?;
                vec![format!("{} joined at {}", name, pose)]
            }
            Instruction::Leave { name } => {
                let id = self.player(&name)?;
                self.controller.on_disconnect(id);
                self.world.leave(&name);
                vec![format!("{} left", name)]
            }
            Instruction::Move {
                name,
                position,
                rotation,
            } => {
                let id = self.player(&name)?;
                self.world.update(id, |avatar| {
                    avatar.pose.position = position;
                    if let Some(rotation) = rotation {
                        avatar.pose.rotation = rotation;
                    }
                });
                Vec::new()
            }
            Instruction::Command { name, args } => {
                let id = self.player(&name)?;
                match self.controller.execute(id, &args) {
                    Ok(outcome) => self.report(&name, outcome),
                    Err(err) => {
                        if let CommandError::PoseUnavailable(_) = err {
                            tracing::error!(target: LOG_HOST, "{}: {}", name, err);
                        }
                        vec![format!("[{}] {}", name, err)]
                    }
                }
            }
            Instruction::BreakBlock { name } => self.interact(&name, WorldAction::BreakBlock)?,
            Instruction::DamageBlock { name } => self.interact(&name, WorldAction::DamageBlock)?,
            Instruction::Hurt { name } => {
                let id = self.player(&name)?;
                match self.controller.on_avatar_damaged(id) {
                    Some(outcome) => self.report(&name, outcome),
                    None => vec![format!("{} took damage", name)],
                }
            }
            Instruction::Status { name: Some(name) } => {
                let id = self.player(&name)?;
                vec![self.status_line(&name, id)]
            }
            Instruction::Status { name: None } => {
                let mut lines: Vec<String> = self
                    .world
                    .players()
                    .into_iter()
                    .map(|(name, id)| self.status_line(&name, id))
                    .collect();
                lines.push(format!(
                    "{} player(s), {} in freecam",
                    self.controller.store().len(),
                    self.controller.store().active_count()
                ));
                lines
            }
            Instruction::DropPackets { name, on } => {
                let id = self.player(&name)?;
                self.world.update(id, |avatar| avatar.drop_packets = on);
                Vec::new()
            }
            Instruction::LegacyClient { name, on } => {
                let id = self.player(&name)?;
                self.world.update(id, |avatar| avatar.legacy_client = on);
                Vec::new()
            }
        };
        Ok(replies)
    }

    fn interact(&self, name: &str, action: WorldAction) -> Result<Vec<String>, ScriptError> {
        let id = self.player(name)?;
        let verdict = self.guard.check(id, action);
        let result = if verdict.is_cancelled() { "cancelled" } else { "allowed" };
        Ok(vec![format!("{} by {}: {}", action, name, result)])
    }

    fn report(&self, name: &str, outcome: ToggleOutcome) -> Vec<String> {
        if let Some(warning) = &outcome.warning {
            tracing::warn!(target: LOG_HOST, "{}: {}", name, warning);
        }
        tracing::info!(target: LOG_HOST, "{}: {}", name, outcome.outcome);
        outcome
            .feedback
            .iter()
            .map(|line| format!("[{}] {}", name, line))
            .collect()
    }

    fn status_line(&self, name: &str, id: PlayerId) -> String {
        let session = self.controller.store().snapshot(id);
        let pose = self
            .world
            .current_pose(id)
            .map(|pose| pose.to_string())
            .unwrap_or_else(|err| err.to_string());
        let packets = self
            .world
            .avatar(id)
            .map_or(0, |avatar| avatar.inbox.len());

        match session {
            Some(session) => format!(
                "{}: freecam {}, speed {}, show player {}, {} camera, {} packet(s), at {}",
                name,
                if session.is_enabled() { "on" } else { "off" },
                session.speed(),
                if session.show_player() { "on" } else { "off" },
                session.camera_mode(),
                packets,
                pose
            ),
            None => format!("{}: no freecam session, {} packet(s), at {}", name, packets, pose),
        }
    }

    /// Runs a whole script. Bad lines are reported and skipped.
    pub fn run_script<R: BufRead, W: Write>(&self, reader: R, mut out: W) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            summary.lines += 1;
            match self.run_line(&line) {
                Ok(replies) => {
                    for reply in replies {
                        writeln!(out, "{}", reply)?;
                    }
                }
                Err(err) => {
                    summary.errors += 1;
                    tracing::warn!(target: LOG_HOST, "line {}: {}", index + 1, err);
                    writeln!(out, "line {}: {}", index + 1, err)?;
                }
            }
        }
        Ok(summary)
    }
}
