pub mod control_hazards;
pub mod intra_bundle;
