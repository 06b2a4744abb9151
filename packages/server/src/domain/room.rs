//! Channel room membership.
//!
//! Maps each channel to the set of live connections currently in it.
//! Membership is ephemeral and never persisted.

use std::collections::{BTreeMap, HashMap};

use super::value_object::{ChannelId, ConnectionId, Username};

/// Live room membership for every channel
#[derive(Debug, Clone, Default)]
pub struct ChannelRooms {
    rooms: HashMap<ChannelId, BTreeMap<ConnectionId, Username>>,
}

impl ChannelRooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection` to the room of `channel_id`.
    ///
    /// Returns `false` if the connection was already a member.
    pub fn join(
        &mut self,
        connection: ConnectionId,
        username: Username,
        channel_id: ChannelId,
    ) -> bool {
        let members = self.rooms.entry(channel_id).or_default();
        if members.contains_key(&connection) {
            return false;
        }
        members.insert(connection, username);
        true
    }

    /// Remove `connection` from the room of `channel_id`.
    ///
    /// Returns `false` if it was not a member. Empty rooms are dropped.
    pub fn leave(&mut self, connection: &ConnectionId, channel_id: ChannelId) -> bool {
        let Some(members) = self.rooms.get_mut(&channel_id) else {
            return false;
        };
        let removed = members.remove(connection).is_some();
        if members.is_empty() {
            self.rooms.remove(&channel_id);
        }
        removed
    }

    pub fn members(&self, channel_id: ChannelId) -> Vec<ConnectionId> {
        self.rooms
            .get(&channel_id)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Usernames present in the room, sorted and deduplicated.
    pub fn member_names(&self, channel_id: ChannelId) -> Vec<Username> {
        let mut names: Vec<Username> = self
            .rooms
            .get(&channel_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names.dedup();
        names
    }

    #[cfg(test)]
    pub fn is_member(&self, connection: &ConnectionId, channel_id: ChannelId) -> bool {
        self.rooms
            .get(&channel_id)
            .is_some_and(|members| members.contains_key(connection))
    }

    pub fn count_members(&self, channel_id: ChannelId) -> usize {
        self.rooms.get(&channel_id).map_or(0, BTreeMap::len)
    }

    #[cfg(test)]
    pub fn count_rooms(&self) -> usize {
        self.rooms.len()
    }
}
