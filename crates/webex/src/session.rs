use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    api::WebexApi,
    error::Result,
    types::Room,
    upload::RetryPolicy,
};

/// Process-wide Webex state: the API client and the default room resolved
/// at start-up. Immutable after construction; share it behind an `Arc`.
pub struct WebexSession {
    api: Arc<dyn WebexApi>,
    room: Option<Room>,
    retry: RetryPolicy,
}

impl WebexSession {
    /// Build a session without resolving a room.
    pub fn new(api: Arc<dyn WebexApi>, room: Option<Room>) -> Self {
        Self {
            api,
            room,
            retry: RetryPolicy::default(),
        }
    }

    /// Build a session and bind `room_name` to a group room the bot belongs to.
    ///
    /// A missing room is not an error: the session starts without a default
    /// room and room-targeted sends are skipped. Failure to list rooms is.
    pub async fn connect(api: Arc<dyn WebexApi>, room_name: &str) -> Result<Self> {
        let room = resolve_room(api.as_ref(), room_name).await?;
        Ok(Self::new(api, room))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api(&self) -> &dyn WebexApi {
        self.api.as_ref()
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub(crate) fn default_room_id(&self) -> Option<&str> {
        self.room.as_ref().map(|r| r.id.as_str())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

/// First group room whose title equals `room_name` exactly.
pub async fn resolve_room(api: &dyn WebexApi, room_name: &str) -> Result<Option<Room>> {
    if room_name.is_empty() {
        debug!("no default room configured");
        return Ok(None);
    }

    let rooms = api.list_rooms("group").await?;
    let found = rooms.into_iter().find(|r| r.title == room_name);
    match found {
        Some(room) => {
            info!(room_name, room_id = %room.id, "bound default room");
            Ok(Some(Room {
                name: room.title,
                id: room.id,
            }))
        },
        None => {
            warn!(
                room_name,
                "default room not found among the bot's group rooms; room sends will be skipped"
            );
            Ok(None)
        },
    }
}
