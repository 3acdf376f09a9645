//! Per-call context views

pub mod broker;

pub use broker::{
    evaluate_request, initial_analysis_request, preparation_request, refine_request,
    research_request, turn_request,
};
