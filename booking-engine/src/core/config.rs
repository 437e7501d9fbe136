use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use legends_sms::{Branding, HttpSmsChannel, MockSmsChannel, SmsChannel, SmsError};

use crate::confirmation::FlowSettings;
use crate::confirmation::flow::{DEFAULT_BOOKING_TTL_SECS, DEFAULT_MAX_RESENDS, DEFAULT_ORDER_TTL_SECS};
use crate::utils::logger;

/// Database file name inside `work_dir`
const DB_FILE: &str = "booking.redb";

/// 短信通道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsProvider {
    /// 模拟发送 (日志 + 延迟)
    Mock,
    /// HTTP 短信网关
    Http,
}

impl FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(SmsProvider::Mock),
            "http" => Ok(SmsProvider::Http),
            other => Err(format!("unknown SMS provider: {}", other)),
        }
    }
}

/// 预订引擎配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 数据目录 (redb 文件) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | BOOKING_CODE_TTL_SECS | 300 | 订座确认时限 |
/// | ORDER_CODE_TTL_SECS | 900 | 订单确认时限 |
/// | MAX_RESENDS | 3 | 最多重发次数 |
/// | SMS_PROVIDER | mock | mock \| http |
/// | SMS_GATEWAY_URL | http://localhost:3000 | 短信网关地址 |
/// | SMS_MOCK_DELAY_MS | 1000 | 模拟发送延迟 |
/// | SMS_TIMEOUT_MS | 10000 | 网关请求超时 |
/// | RESTAURANT_NAME | Legends Rooftop | 短信署名 |
/// | RESTAURANT_PHONE | 031 123 4567 | 短信联系电话 |
///
/// 确认时限会被限制在 5-15 分钟内。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/tmp/legends SMS_PROVIDER=http SMS_GATEWAY_URL=https://sms.example.com cargo test
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 工作目录，存放 redb 数据库
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,

    pub booking_code_ttl_secs: i64,
    pub order_code_ttl_secs: i64,
    pub max_resends: u32,

    pub sms_provider: SmsProvider,
    pub sms_gateway_url: String,
    pub sms_mock_delay_ms: u64,
    pub sms_timeout_ms: u64,

    pub restaurant_name: String,
    pub restaurant_phone: String,
}

impl EngineConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置 (测试用)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let branding = Branding::default();

        Self {
            work_dir: get("WORK_DIR").unwrap_or_else(|| "./data".into()),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: get("LOG_DIR").filter(|d| !d.trim().is_empty()),

            booking_code_ttl_secs: parse_var(&get, "BOOKING_CODE_TTL_SECS").unwrap_or(DEFAULT_BOOKING_TTL_SECS),
            order_code_ttl_secs: parse_var(&get, "ORDER_CODE_TTL_SECS").unwrap_or(DEFAULT_ORDER_TTL_SECS),
            max_resends: parse_var(&get, "MAX_RESENDS").unwrap_or(DEFAULT_MAX_RESENDS),

            sms_provider: parse_var(&get, "SMS_PROVIDER").unwrap_or(SmsProvider::Mock),
            sms_gateway_url: get("SMS_GATEWAY_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            sms_mock_delay_ms: parse_var(&get, "SMS_MOCK_DELAY_MS").unwrap_or(1000),
            sms_timeout_ms: parse_var(&get, "SMS_TIMEOUT_MS").unwrap_or(10000),

            restaurant_name: get("RESTAURANT_NAME").unwrap_or(branding.restaurant_name),
            restaurant_phone: get("RESTAURANT_PHONE").unwrap_or(branding.restaurant_phone),
        }
    }

    /// 使用自定义工作目录 (常用于测试)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Flow windows and limits (clamped)
    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings::new(
            self.booking_code_ttl_secs,
            self.order_code_ttl_secs,
            self.max_resends,
        )
    }

    pub fn branding(&self) -> Branding {
        Branding {
            restaurant_name: self.restaurant_name.clone(),
            restaurant_phone: self.restaurant_phone.clone(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(DB_FILE)
    }

    /// Build the configured delivery channel
    pub fn build_channel(&self) -> Result<Arc<dyn SmsChannel>, SmsError> {
        match self.sms_provider {
            SmsProvider::Mock => Ok(Arc::new(MockSmsChannel::new(Duration::from_millis(
                self.sms_mock_delay_ms,
            )))),
            SmsProvider::Http => Ok(Arc::new(HttpSmsChannel::new(
                &self.sms_gateway_url,
                Duration::from_millis(self.sms_timeout_ms),
            )?)),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    get(key).and_then(|v| v.trim().parse().ok())
}

/// 设置运行环境: 加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> std::io::Result<EngineConfig> {
    dotenv::dotenv().ok();

    let config = EngineConfig::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        sms_provider = ?config.sms_provider,
        "Booking engine environment ready"
    );
    Ok(config)
}
