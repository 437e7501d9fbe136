//! 核心模块 - 配置与会话
//!
//! # 模块结构
//!
//! - [`EngineConfig`] - 引擎配置
//! - [`BookingSession`] - 单个访客的确认会话

pub mod config;
pub mod session;

pub use config::{EngineConfig, SmsProvider, setup_environment};
pub use session::BookingSession;
