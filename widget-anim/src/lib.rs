//! # Widget Anim
//!
//! UI 控件的声明式动画编排引擎。
//!
//! ## 架构概述
//!
//! 控件上挂若干**动画分组**，每个分组绑定一个触发器并持有有序的**描述符**列表。
//! 触发器到来时，调度器为匹配分组中每个启用的描述符启动一次协作式运行：
//!
//! ```text
//! Host                            Orchestrator
//!   │                                  │
//!   │──── dispatch(TriggerKind) ─────►│ 启动运行（同步执行到第一个挂起点）
//!   │                                  │
//!   │──── tick(dt) ──────────────────►│ 每个运行恢复一次，写入 Animatable
//!   │◄─── Vec<AnimationEvent> ────────│
//!   │                                  │
//! ```
//!
//! 同一 `PropertyKind` 同时只有一个运行能写入：新运行签发更大的代号，
//! 旧运行在下一个继续点发现代号过期后自行停止。
//!
//! ## 核心类型
//!
//! - [`Orchestrator`]：调度器
//! - [`AnimationGroup`] / [`TriggerKind`]：分组与触发器
//! - [`AnimationDescriptor`] / [`PropertyKind`]：单个属性动画
//! - [`Animatable`] / [`WidgetTarget`]：动画目标
//! - [`EaseKind`]：缓动曲线
//! - [`AnimatorConfig`]：JSON 配置
//!
//! ## 使用示例
//!
//! ```ignore
//! use std::rc::Rc;
//! use widget_anim::*;
//!
//! let widget = WidgetTarget::new();
//! let mut animator = Orchestrator::new(Rc::new(widget.clone()));
//! animator.add_group(
//!     AnimationGroup::new("press", TriggerKind::OnClick)
//!         .with(AnimationDescriptor::fade(0.0, 1.0, 0.2))
//!         .with(AnimationDescriptor::punch_scale(0.2, 0.3)),
//! );
//!
//! animator.dispatch(TriggerKind::OnClick);
//! loop {
//!     for event in animator.tick(1.0 / 60.0) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动函数
//! - [`transform`]：`Vec2` / `Color`
//! - [`target`]：目标适配器与原始值快照
//! - [`descriptor`]：描述符
//! - [`group`]：分组与触发器
//! - [`event`]：回调表与事件
//! - [`generation`]：单飞代号表
//! - [`orchestrator`]：调度器
//! - [`config`]：配置
//! - [`error`]：错误类型

pub mod config;
pub mod descriptor;
pub mod easing;
pub mod error;
pub mod event;
pub mod generation;
pub mod group;
pub mod orchestrator;
pub mod rng;
mod run;
pub mod target;
pub mod transform;

// 重导出核心类型
pub use config::{AnimatorConfig, EngineSettings, GroupConfig};
pub use descriptor::{AnimationDescriptor, PropertyKind};
pub use easing::{EaseKind, ease};
pub use error::{AnimResult, ConfigError, DescriptorError};
pub use event::{AnimationEvent, EventSink, ListenerId};
pub use generation::{Generation, GenerationTable};
pub use group::{AnimationGroup, GroupId, TriggerKind};
pub use orchestrator::Orchestrator;
pub use rng::ShakeRng;
pub use target::{Animatable, RenderSurface, SurfaceKind, TargetSnapshot, WidgetState, WidgetTarget};
pub use transform::{Color, Vec2};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _ease = ease(EaseKind::InOutSine, 0.5);
        let _descriptor = AnimationDescriptor::new(PropertyKind::Bounce);
        let _group = AnimationGroup::new("idle", TriggerKind::Manual);
        let _config = AnimatorConfig::default();
        let _target = WidgetTarget::with_surface(RenderSurface::text());
    }
}
