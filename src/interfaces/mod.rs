//! 接口适配层 (Interfaces Layer)
//! 负责对接外部协议：HTTP REST 健康检查、RPC 过程调用、单页应用静态文件

pub mod http;

pub use http::{create_router, run_server, AppState};
