// Domain layer - Picture model and weighting rules

pub mod model;
pub mod rules;
