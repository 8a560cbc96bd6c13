//! RPC 错误响应
//!
//! 响应体格式：
//! ```json
//! {"error":{"message":"...","code":"NOT_FOUND","data":{"code":"NOT_FOUND","httpStatus":404,"path":"alerts.getById"}}}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use crate::utils::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcErrorData {
    pub code: &'static str,
    pub http_status: u16,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RpcErrorShape {
    pub message: String,
    pub code: &'static str,
    pub data: RpcErrorData,
}

#[derive(Debug, Serialize)]
pub struct RpcErrorBody {
    pub error: RpcErrorShape,
}

/// 某个过程调用失败的结果
#[derive(Debug)]
pub struct RpcError {
    pub error: AppError,
    pub path: String,
}

impl RpcError {
    pub fn new(error: AppError, path: impl Into<String>) -> Self {
        Self { error, path: path.into() }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn body(&self) -> RpcErrorBody {
        let code = self.error.rpc_code();
        RpcErrorBody {
            error: RpcErrorShape {
                message: self.error.client_message(),
                code,
                data: RpcErrorData {
                    code,
                    http_status: self.error.http_status(),
                    path: self.path.clone(),
                },
            },
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("❌ [RPC] {} 执行失败: {}", self.path, self.error);
        } else {
            log::debug!("[RPC] {} 返回 {}: {}", self.path, status.as_u16(), self.error);
        }
        (status, Json(self.body())).into_response()
    }
}
