use chrono_tz::Tz;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/reserve | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | VENUE_TZ | Asia/Shanghai | 营业时区 (IANA 名称) |
/// | BOOKING_GRACE_HOURS | 2 | 预订到店前保留期 (小时) |
/// | ORDER_NO_MAX_ATTEMPTS | 5 | 订单号生成重试上限 (≥5) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/reserve HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 营业时区 — 所有到店/清场/日桶计算都基于它
    pub venue_tz: Tz,
    /// 预订保留期：到店时间前多少小时座位进入独占
    pub grace_hours: i64,
    /// 订单号生成重试上限
    pub order_no_max_attempts: u32,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/reserve".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            venue_tz: std::env::var("VENUE_TZ")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::Asia::Shanghai),
            grace_hours: std::env::var("BOOKING_GRACE_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            order_no_max_attempts: std::env::var("ORDER_NO_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> String {
        format!("{}/reserve.db", self.work_dir)
    }

    /// 保留期长度 (毫秒)
    pub fn grace_ms(&self) -> i64 {
        self.grace_hours * 60 * 60 * 1000
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
