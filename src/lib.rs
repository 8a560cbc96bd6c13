/// ELI 校园安防演示平台 - Rust 后端核心库
pub mod utils;
pub mod logging;
pub mod models;
pub mod services;
pub mod interfaces;
pub mod error;

// 重新导出常用类型，方便使用
pub use models::*;
pub use utils::{AppError, AppResult, AppConfig};
pub use services::*;
pub use interfaces::{create_router, run_server, AppState};
