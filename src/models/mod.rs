/// 核心枚举定义模块
pub mod enums;
/// 核心结构体定义模块（RPC 输入/输出）
pub mod structs;
/// SeaORM实体定义模块
pub mod entities;

#[cfg(test)]
mod tests;

// 重新导出所有类型，方便其他模块使用
pub use enums::*;
pub use structs::*;
