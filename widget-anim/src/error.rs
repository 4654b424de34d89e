//! # Error 模块
//!
//! 定义 widget-anim 中使用的错误类型。
//!
//! 触发分发本身从不返回错误；这里只覆盖配置文件的读写与校验。

use std::path::PathBuf;

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写文件失败
    #[error("配置 IO 错误: {path:?} - {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 解析失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(String),

    /// 描述符参数不合法
    #[error("分组 '{group}' 的第 {descriptor} 个描述符无效 - {source}")]
    InvalidDescriptor {
        group: String,
        descriptor: usize,
        #[source]
        source: DescriptorError,
    },

    /// 其他校验失败
    #[error("配置验证失败: {0}")]
    Invalid(String),
}

/// 描述符校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    /// 时长或延迟为负数、NaN 或无穷
    #[error("{field} 必须是非负有限数，实际为 {value}")]
    InvalidTime { field: &'static str, value: f32 },

    /// 透明度端点不在 [0, 1] 内
    #[error("{field} 必须在 0.0 - 1.0 之间，实际为 {value}")]
    AlphaOutOfRange { field: &'static str, value: f32 },
}

/// Result 类型别名
pub type AnimResult<T> = Result<T, ConfigError>;
