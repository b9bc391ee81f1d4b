//! 工具函数模块
//!
//! 此模块包含了项目中使用的通用工具：
//! - 有界轮询（固定间隔 + 截止时间）

pub mod wait;
