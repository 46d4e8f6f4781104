// Domain layer - Core types, settings and policies

pub mod errors;
pub mod model;
pub mod rules;
pub mod settings;
