//! # Group 模块
//!
//! 绑定到同一触发器的一组动画描述符。

use serde::{Deserialize, Serialize};

use crate::descriptor::AnimationDescriptor;
use crate::event::EventSink;

/// 触发器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// 控件激活
    OnEnable,
    /// 点击
    #[default]
    OnClick,
    /// 指针进入
    OnPointerEnter,
    /// 指针离开
    OnPointerLeave,
    /// 指针按下
    OnPointerDown,
    /// 指针抬起
    OnPointerUp,
    /// 外部脚本手动触发
    Manual,
}

impl TriggerKind {
    /// 全部触发器
    pub const ALL: [TriggerKind; 7] = [
        TriggerKind::OnEnable,
        TriggerKind::OnClick,
        TriggerKind::OnPointerEnter,
        TriggerKind::OnPointerLeave,
        TriggerKind::OnPointerDown,
        TriggerKind::OnPointerUp,
        TriggerKind::Manual,
    ];
}

impl std::str::FromStr for TriggerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "on_enable" | "enable" => Ok(Self::OnEnable),
            "on_click" | "click" => Ok(Self::OnClick),
            "on_pointer_enter" | "pointer_enter" | "enter" => Ok(Self::OnPointerEnter),
            "on_pointer_leave" | "pointer_leave" | "leave" => Ok(Self::OnPointerLeave),
            "on_pointer_down" | "pointer_down" | "down" => Ok(Self::OnPointerDown),
            "on_pointer_up" | "pointer_up" | "up" => Ok(Self::OnPointerUp),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("未知触发器 '{s}'")),
        }
    }
}

/// 分组标识
///
/// 由 `Orchestrator` 在加入分组时分配，重排或删除其他分组都不会改变它。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) u64);

impl GroupId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

/// 动画分组
#[derive(Debug)]
pub struct AnimationGroup {
    pub(crate) id: GroupId,
    /// 分组标签
    pub label: String,
    /// 触发器
    pub trigger: TriggerKind,
    /// 有序的描述符列表
    pub descriptors: Vec<AnimationDescriptor>,
    /// 分组开始时的回调
    pub on_group_start: EventSink,
    /// 分组全部运行结束时的回调
    pub on_group_end: EventSink,
}

impl AnimationGroup {
    /// 创建空分组
    pub fn new(label: impl Into<String>, trigger: TriggerKind) -> Self {
        Self {
            id: GroupId(0),
            label: label.into(),
            trigger,
            descriptors: Vec::new(),
            on_group_start: EventSink::new(),
            on_group_end: EventSink::new(),
        }
    }

    /// 追加描述符（构建器形式）
    pub fn with(mut self, descriptor: AnimationDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// 分组标识（加入 `Orchestrator` 之前为 0）
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// 是否至少有一个启用的描述符
    pub fn has_enabled(&self) -> bool {
        self.descriptors.iter().any(|d| d.enabled)
    }

    /// 启用的描述符
    pub fn enabled_descriptors(&self) -> impl Iterator<Item = &AnimationDescriptor> {
        self.descriptors.iter().filter(|d| d.enabled)
    }

    /// 追加描述符
    pub fn add_descriptor(&mut self, descriptor: AnimationDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// 移除描述符，越界时返回 `None`
    pub fn remove_descriptor(&mut self, index: usize) -> Option<AnimationDescriptor> {
        (index < self.descriptors.len()).then(|| self.descriptors.remove(index))
    }

    /// 把描述符从 `from` 移到 `to`，越界时不做任何事
    pub fn move_descriptor(&mut self, from: usize, to: usize) -> bool {
        let len = self.descriptors.len();
        if from >= len || to >= len {
            return false;
        }
        let descriptor = self.descriptors.remove(from);
        self.descriptors.insert(to, descriptor);
        true
    }

    /// 切换描述符启用状态，越界时不做任何事
    pub fn set_descriptor_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.descriptors.get_mut(index) {
            Some(descriptor) => {
                descriptor.enabled = enabled;
                true
            }
            None => false,
        }
    }
}
