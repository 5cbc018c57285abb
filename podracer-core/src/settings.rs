use config::{Config, ConfigError, Environment, File};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    // engine rules we predict against
    pub checkpoint_radius: f64,
    pub pod_radius: f64,
    pub max_turn_degrees: f64,
    pub friction: f64,
    pub max_thrust: i32,
    pub boost_thrust: f64,
    pub min_collision_impulse: f64,
    pub shield_mass_multiplier: f64,
    pub shield_mass_turns: u32,
    pub shield_lockout_turns: u32,
    pub max_collisions_per_turn: usize,

    // steering policy
    pub approach_radius_factor: f64,
    pub braking_radius_factor: f64,
    pub racing_line_offset_factor: f64,
    pub approach_thrust: i32,
    pub sharp_turn_degrees: f64,
    pub sharp_turn_thrust: i32,
    pub boost_alignment_degrees: f64,
    pub shield_enabled: bool,
    pub shield_min_impact_speed: f64,

    pub turn_budget_ms: u64,
}

impl Settings {
    fn new() -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("checkpoint_radius", 600.0)?
            .set_default("pod_radius", 400.0)?
            .set_default("max_turn_degrees", 18.0)?
            .set_default("friction", 0.85)?
            .set_default("max_thrust", 100)?
            .set_default("boost_thrust", 650.0)?
            .set_default("min_collision_impulse", 120.0)?
            .set_default("shield_mass_multiplier", 10.0)?
            .set_default("shield_mass_turns", 2)?
            .set_default("shield_lockout_turns", 3)?
            .set_default("max_collisions_per_turn", 16)?
            .set_default("approach_radius_factor", 4.0)?
            .set_default("braking_radius_factor", 2.0)?
            .set_default("racing_line_offset_factor", 0.6)?
            .set_default("approach_thrust", 75)?
            .set_default("sharp_turn_degrees", 70.0)?
            .set_default("sharp_turn_thrust", 20)?
            .set_default("boost_alignment_degrees", 20.0)?
            .set_default("shield_enabled", false)?
            .set_default("shield_min_impact_speed", 400.0)?
            .set_default("turn_budget_ms", 75)?
            .add_source(File::with_name("config.yaml").required(false))
            .add_source(Environment::with_prefix("PODRACER"))
            .build()?;

        config.try_deserialize()
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}

#[cfg(test)]
mod tests {
    use super::GLOBAL_CONFIG;

    #[test]
    fn defaults_match_engine_rules() {
        assert_eq!(GLOBAL_CONFIG.checkpoint_radius, 600.0);
        assert_eq!(GLOBAL_CONFIG.pod_radius, 400.0);
        assert_eq!(GLOBAL_CONFIG.max_turn_degrees, 18.0);
        assert_eq!(GLOBAL_CONFIG.boost_thrust, 650.0);
        assert_eq!(GLOBAL_CONFIG.max_thrust, 100);
        assert!(!GLOBAL_CONFIG.shield_enabled);
    }
}
