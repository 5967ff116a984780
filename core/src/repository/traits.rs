use anyhow::Result;

/// The fixed set of keys the engine persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Footprints,
    Profile,
    Challenges,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Footprints, StoreKey::Profile, StoreKey::Challenges];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Footprints => "footprints",
            StoreKey::Profile => "profile",
            StoreKey::Challenges => "challenges",
        }
    }
}

pub trait KeyValueStore {
    /// `Ok(None)` means nothing has been stored under `key` yet.
    fn get(&self, key: StoreKey) -> Result<Option<String>>;
    fn put(&self, key: StoreKey, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: StoreKey, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
}
