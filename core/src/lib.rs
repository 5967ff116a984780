pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;
pub mod usecase;

pub use config::AppConfig;
pub use error::{EcoError, EcoResult};
pub use model::challenge::{Challenge, ChallengeCategory, ChallengeStatus};
pub use model::emission::{
    compute_category_emission, compute_total, EmissionCategory, EmissionFactor, EnergyEmission,
    FoodEmission, TransportationEmission, WasteEmission,
};
pub use model::footprint::{ActivityInput, CategoryBreakdown, FootprintRecord};
pub use model::profile::{
    level_for_points, level_title, Badge, BadgePolicy, Profile, ProfileIdentity, MAX_LEVEL,
    POINTS_PER_LEVEL,
};
pub use repository::{EcoRepository, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StoreKey};
pub use input::{parse_args, expand_key, parse_quantity, ParsedInput};
pub use time::{parse_human_date, Clock, FixedClock, SystemClock};
pub use service::aggregator::{AggregatorOptions, EngineState, FootprintAggregator, SeedOutcome};
pub use service::dto::{ChallengeDto, DailyHistory, WeeklyHistory};
pub use service::seed::SampleData;
pub use usecase::history::HistoryUseCase;
