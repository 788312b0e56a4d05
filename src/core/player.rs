//! Player seats and per-player storage.
//!
//! The engine has no notion of a user account. A player is an opaque seat
//! index that attributes dice, wins and actions.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index of a player (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping around the table.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// Iterate over all seats of a `player_count` table.
    ///
    /// ```
    /// use dice_duel::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat, indexable by `PlayerId`.
///
/// ```
/// use dice_duel::core::{PlayerId, PlayerMap};
///
/// let mut wins: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// wins[PlayerId::new(1)] += 1;
/// assert_eq!(wins[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build a map by calling `factory` for each seat.
    ///
    /// # Panics
    ///
    /// When `player_count` is not in `1..=255`.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Build a map from one value per seat, in seat order. `None` unless
    /// there are between 1 and 255 seats.
    pub fn from_vec(data: Vec<T>) -> Option<Self> {
        (1..=255).contains(&data.len()).then_some(Self { data })
    }

    /// Every seat starts with a clone of `value`.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (seat, value) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }

    /// Whether `player` is a seat at this table.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_next_wraps() {
        assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
        assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
        assert_eq!(PlayerId::new(2).next(4), PlayerId::new(3));
        assert_eq!(format!("{}", PlayerId::new(1)), "Player 1");
    }

    #[test]
    fn test_player_map_from_vec() {
        let map = PlayerMap::from_vec(vec!["a", "b", "c"]).unwrap();

        assert_eq!(map.player_count(), 3);
        assert_eq!(map[PlayerId::new(2)], "c");
        assert!(map.contains(PlayerId::new(2)));
        assert!(!map.contains(PlayerId::new(3)));

        assert!(PlayerMap::<u8>::from_vec(Vec::new()).is_none());
        assert!(PlayerMap::from_vec(vec![0u8; 256]).is_none());
        assert!(PlayerMap::from_vec(vec![0u8; 255]).is_some());
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<Vec<u32>> = PlayerMap::with_default(2);

        map[PlayerId::new(0)].push(4);
        for value in map.values_mut() {
            value.push(6);
        }

        assert_eq!(map[PlayerId::new(0)], vec![4, 6]);
        assert_eq!(map[PlayerId::new(1)], vec![6]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
