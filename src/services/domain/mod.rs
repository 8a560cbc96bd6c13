//! 领域层：位置模拟与演示数据生成

pub mod location_simulator;
pub mod seed_data;

pub use location_simulator::{
    distance, generate_random_position, simulate_entity_movement, FloorBounds, LocationSimulator, Position,
};
pub use seed_data::{seed_demo_data, SeedOptions, SeedSummary};
