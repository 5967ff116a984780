pub mod challenge;
pub mod emission;
pub mod footprint;
pub mod profile;
