//! Reserve Server - 座位预订与可用性判定服务
//!
//! # 架构概述
//!
//! - **可用性判定** (`seating::availability`): 纯函数优先级规则
//! - **占位事务** (`seating::coordinator`): 预订原子创建 / 堂食补偿创建
//! - **生命周期** (`seating::lifecycle`): 取消与支付，失效关联记录
//! - **数据库** (`db`): 嵌入式 SQLite (WAL)
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! reserve-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── seating/       # 领域核心：判定、事务、生命周期
//! ├── services/      # 外部协作方 (积分)
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装与中间件
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志、时区工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod routes;
pub mod seating;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use seating::{LockLifecycle, OrderNoGenerator, ReservationCoordinator};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
