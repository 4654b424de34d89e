//! # Event 模块
//!
//! 生命周期通知：多监听器回调表 `EventSink`，以及随 `tick` 返回的 `AnimationEvent`。

use crate::descriptor::PropertyKind;
use crate::group::GroupId;

/// 监听器标识，用于移除
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// 多监听器回调表
///
/// 事件不带负载，只表示"发生了"。监听器按注册顺序调用。
#[derive(Default)]
pub struct EventSink {
    listeners: Vec<(ListenerId, Box<dyn FnMut()>)>,
    next_id: u64,
}

impl EventSink {
    /// 创建空的回调表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册监听器
    pub fn add_listener(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// 移除监听器
    ///
    /// # 返回
    /// - `true`: 找到并移除
    /// - `false`: 监听器不存在
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// 移除全部监听器
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// 监听器数量
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// 是否没有监听器
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// 依次调用所有监听器
    pub fn invoke(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener();
        }
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// 动画事件
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// 分组因触发而开始
    GroupStarted(GroupId),
    /// 分组的在途计数归零
    GroupEnded(GroupId),
    /// 某次运行被同类型的新运行取代
    Superseded {
        group: GroupId,
        kind: PropertyKind,
    },
}
