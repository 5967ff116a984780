use anyhow::Result;

use crate::model::challenge::Challenge;
use crate::model::footprint::FootprintRecord;
use crate::model::profile::Profile;
use crate::repository::codec;
use crate::repository::traits::{KeyValueStore, StoreKey};

/// Typed access to the engine's persisted collections over any key-value store.
pub struct EcoRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> EcoRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_footprints(&self) -> Result<Option<Vec<FootprintRecord>>> {
        self.store
            .get(StoreKey::Footprints)?
            .map(|raw| codec::decode_footprints(&raw))
            .transpose()
    }

    pub fn save_footprints(&self, records: &[FootprintRecord]) -> Result<()> {
        self.store
            .put(StoreKey::Footprints, &codec::encode_footprints(records)?)
    }

    pub fn load_challenges(&self) -> Result<Option<Vec<Challenge>>> {
        self.store
            .get(StoreKey::Challenges)?
            .map(|raw| codec::decode_challenges(&raw))
            .transpose()
    }

    pub fn save_challenges(&self, challenges: &[Challenge]) -> Result<()> {
        self.store
            .put(StoreKey::Challenges, &codec::encode_challenges(challenges)?)
    }

    pub fn load_profile(&self) -> Result<Option<Profile>> {
        self.store
            .get(StoreKey::Profile)?
            .map(|raw| codec::decode_profile(&raw))
            .transpose()
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.store.put(StoreKey::Profile, &codec::encode_profile(profile)?)
    }
}
