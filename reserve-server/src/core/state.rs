use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::seating::{LockLifecycle, OrderNoGenerator, ReservationCoordinator};
use crate::services::SimulatedLoyalty;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | coordinator | 预订/堂食下单事务 |
/// | lifecycle | 取消与支付 |
/// | loyalty | 积分协作方 (模拟) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub coordinator: Arc<ReservationCoordinator>,
    pub lifecycle: Arc<LockLifecycle>,
    pub loyalty: Arc<SimulatedLoyalty>,
}

impl ServerState {
    /// 初始化所有服务 (数据库、迁移、协调器)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::Internal(format!("Cannot create work dir: {e}")))?;

        let db = DbService::new(&config.database_path()).await?;

        let loyalty = Arc::new(SimulatedLoyalty::new());
        let coordinator = Arc::new(ReservationCoordinator::new(
            db.pool.clone(),
            config.venue_tz,
            OrderNoGenerator::new(config.order_no_max_attempts),
        ));
        let lifecycle = Arc::new(LockLifecycle::new(db.pool.clone(), loyalty.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            coordinator,
            lifecycle,
            loyalty,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
