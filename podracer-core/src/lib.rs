pub mod lap_info;
pub mod pod_state;
pub mod protocol;
pub mod vector_math;
mod settings;

pub use settings::GLOBAL_CONFIG;

pub type PodID = usize;
