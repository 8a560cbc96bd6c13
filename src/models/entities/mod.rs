//! SeaORM 实体定义
//!
//! 每个子模块对应数据库中的一张表，声明顺序即建表顺序（被引用的表在前）

pub mod users;
pub mod buildings;
pub mod floors;
pub mod zones;
pub mod cameras;
pub mod access_readers;
pub mod sensors;
pub mod wifi_access_points;
pub mod tracked_entities;
pub mod location_events;
pub mod events;
pub mod alerts;
pub mod incidents;
pub mod config_entries;
pub mod audit_logs;
pub mod demo_scenarios;

pub use buildings::Model as Building;
pub use floors::Model as Floor;
pub use zones::Model as Zone;
pub use cameras::Model as Camera;
pub use access_readers::Model as AccessReader;
pub use sensors::Model as Sensor;
pub use wifi_access_points::Model as WifiAccessPoint;
pub use tracked_entities::Model as TrackedEntity;
pub use location_events::Model as LocationEvent;
pub use events::Model as Event;
pub use alerts::Model as Alert;
pub use incidents::Model as Incident;
pub use config_entries::Model as ConfigEntry;
pub use audit_logs::Model as AuditLog;
pub use demo_scenarios::Model as DemoScenario;
