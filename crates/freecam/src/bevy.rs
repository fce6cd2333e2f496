//! Bevy integration: exposes the freecam store, guard and settings as resources.
//!
//! The plugin only wires shared state into the ECS world. Command dispatch and
//! packet transport stay with the host, which builds its
//! [`SessionController`](crate::SessionController) from the same
//! [`FreecamSessions`] store.

use std::sync::Arc;

use bevy::prelude::*;

use crate::guard::WorldInteractionGuard;
use crate::session::SessionStore;
use crate::settings::FreecamSettings;

/// Shared session store.
#[derive(Resource, Clone)]
pub struct FreecamSessions(pub Arc<SessionStore>);

/// Guard for block break/damage handlers.
#[derive(Resource, Clone)]
pub struct FreecamGuard(pub WorldInteractionGuard);

/// Effective freecam settings.
#[derive(Resource, Clone)]
pub struct FreecamConfig(pub FreecamSettings);

#[derive(Default)]
pub struct FreecamPlugin {
    pub settings: FreecamSettings,
}

impl Plugin for FreecamPlugin {
    fn build(&self, app: &mut App) {
        let store = Arc::new(SessionStore::with_defaults(self.settings.session_defaults()));
        app.insert_resource(FreecamGuard(WorldInteractionGuard::new(Arc::clone(&store))))
            .insert_resource(FreecamSessions(store))
            .insert_resource(FreecamConfig(self.settings.clone()));
    }
}
