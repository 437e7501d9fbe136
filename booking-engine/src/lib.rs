//! Legends booking engine - phone confirmation of table bookings and orders
//!
//! # 架构概述
//!
//! A visitor fills in a booking (or food order), receives a six-digit code by
//! SMS and types it back before the window closes. This crate owns that flow:
//!
//! - **确认流程** (`confirmation`): pure state machine, code generation, countdown timer
//! - **会话** (`core::session`): explicit per-visitor context tying flow, timer,
//!   delivery channel and storage together
//! - **存储** (`storage`): redb persistence shim for reload-survival
//! - **订座目录与向导** (`catalog`, `wizard`): what can be booked and the
//!   four-step form that collects it
//!
//! # 模块结构
//!
//! ```text
//! booking-engine/src/
//! ├── core/          # 配置、会话
//! ├── confirmation/  # 状态机、验证码、倒计时、事件
//! ├── catalog.rs     # 日期、时段、桌台
//! ├── wizard.rs      # 订座向导
//! ├── storage.rs     # redb 持久化
//! └── utils/         # 日志、校验、时间
//! ```

pub mod catalog;
pub mod confirmation;
pub mod core;
pub mod storage;
pub mod utils;
pub mod wizard;

// Re-export 公共类型
pub use catalog::BookingCatalog;
pub use confirmation::{ConfirmationFlow, FlowError, FlowEvent, FlowPhase, FlowResult, FlowSettings};
pub use self::core::{BookingSession, EngineConfig, SmsProvider, setup_environment};
pub use storage::{DraftStorage, StorageError, StorageResult};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use wizard::{BookingWizard, WizardStep};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Analytics macro - 对应前端 trackEvent，输出到 "analytics" target
#[macro_export]
macro_rules! analytics_event {
    ($event:expr) => {
        ::tracing::info!(
            target: "analytics",
            event = $event,
            timestamp = ::chrono::Local::now().to_rfc3339()
        )
    };
    ($event:expr, $($arg:tt)*) => {
        ::tracing::info!(
            target: "analytics",
            event = $event,
            timestamp = ::chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
}
