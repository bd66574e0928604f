use crate::RoomId;

/// Prefix shared by every room-scoped destination on the broker
pub const ROOM_CHANNEL_PREFIX: &str = "/queue/manager.room";

/// Destination which every participant of the given room subscribes to.
pub fn room_channel(room_id: RoomId) -> String {
    format!("{}.{}", ROOM_CHANNEL_PREFIX, room_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_channel_format() {
        assert_eq!(room_channel(7), "/queue/manager.room.7");
    }
}
