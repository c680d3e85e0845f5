use std::fmt;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

/// Identifier for characters and plot-tool items.
///
/// Values are milliseconds since the Unix epoch at creation time, bumped when
/// two items are created within the same millisecond. On the wire the id is a
/// string, which is what the backend models declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(ItemId(value)),
            Raw::Text(text) => text.trim().parse().map(ItemId).map_err(serde::de::Error::custom),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest identifier the generator will move past. Anything above it leaves
/// too little room for new ids and is renumbered instead.
pub const MAX_OBSERVED_ID: u64 = u64::MAX - (1 << 32);

#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Next identifier. Strictly greater than anything returned or observed before.
    pub fn next_id(&mut self) -> ItemId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        // `observe` caps `last` at MAX_OBSERVED_ID, so this never saturates in practice.
        self.last = now.max(self.last.saturating_add(1));
        ItemId(self.last)
    }

    /// Advance past an identifier that came from elsewhere (a loaded draft).
    /// Returns `false` and leaves the generator alone when `id` is above
    /// [`MAX_OBSERVED_ID`]; the caller has to replace that id.
    pub fn observe(&mut self, id: ItemId) -> bool {
        if id.0 > MAX_OBSERVED_ID {
            return false;
        }
        self.last = self.last.max(id.0);
        true
    }
}
