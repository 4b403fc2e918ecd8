use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::realtime::protocol::VetoEvent;
use crate::repos::rooms::RoomId;

struct RoomChannel {
    sender: broadcast::Sender<VetoEvent>,
    /// Highest version sent on this channel.
    last_version: i32,
}

/// One broadcast channel per room.
///
/// The veto core never sees this type; services publish after a commit and
/// any transport subscribes here. Versions seen by a subscriber never go
/// backwards: an event older than one already sent is dropped, since the
/// newer snapshot supersedes it.
pub struct RoomHub {
    channels: DashMap<RoomId, RoomChannel>,
    capacity: usize,
}

impl RoomHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to a room whose stored state is at `current_version`.
    pub fn subscribe(&self, room_id: RoomId, current_version: i32) -> broadcast::Receiver<VetoEvent> {
        let mut channel = self.channels.entry(room_id).or_insert_with(|| RoomChannel {
            sender: broadcast::channel(self.capacity).0,
            last_version: current_version,
        });
        channel.last_version = channel.last_version.max(current_version);
        channel.sender.subscribe()
    }

    /// Deliver to current subscribers. Returns how many received it.
    pub fn publish(&self, event: VetoEvent) -> usize {
        let room_id = event.room_id();
        let version = event.version();

        // The entry guard serializes publishers of the same room.
        let sent = {
            let Some(mut channel) = self.channels.get_mut(&room_id) else {
                trace!(room_id = %room_id, "No subscribers for room");
                return 0;
            };
            if version < channel.last_version {
                debug!(
                    room_id = %room_id,
                    version,
                    last_version = channel.last_version,
                    "Dropping superseded room event"
                );
                return 0;
            }
            channel.last_version = version;
            channel.sender.send(event)
        };

        match sent {
            Ok(n) => n,
            Err(_) => {
                // Every receiver is gone; drop the channel so it can be recreated.
                self.channels
                    .remove_if(&room_id, |_, c| c.sender.receiver_count() == 0);
                debug!(room_id = %room_id, "Dropped room channel without receivers");
                0
            }
        }
    }
}
