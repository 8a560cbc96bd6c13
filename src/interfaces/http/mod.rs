//! # HTTP 接口
//!
//! 基于 axum 提供：
//! - `GET /api/health` 健康检查
//! - `/api/trpc/{procedure}` RPC 过程调用（query 走 GET，mutation 走 POST）
//! - 可选的单页应用静态文件，未知路径回退到 `index.html`

pub mod context;
pub mod error;
pub mod middleware;
pub mod procedures;
pub mod rpc;
pub mod server;
pub mod state;

pub use context::RequestContext;
pub use error::RpcError;
pub use rpc::{find_procedure, Access, ProcedureDef, ProcedureKind, PROCEDURES};
pub use server::{create_router, run_server};
pub use state::AppState;
