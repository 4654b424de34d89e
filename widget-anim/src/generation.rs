//! # Generation 模块
//!
//! 每个属性类型的单飞表。
//!
//! 每次启动运行都会签发一个单调递增的代号并登记到对应类型的槽位，
//! 旧代号随之失效。运行在每个继续点比较自己持有的代号与槽位，
//! 不一致就自行停止，不再写任何状态。

use crate::descriptor::PropertyKind;

/// 运行代号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// 获取内部值
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 固定大小的单飞表，按 `PropertyKind` 索引
#[derive(Debug, Clone)]
pub struct GenerationTable {
    slots: [Option<Generation>; PropertyKind::COUNT],
    next: u64,
}

impl Default for GenerationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationTable {
    /// 创建空表
    pub fn new() -> Self {
        Self {
            slots: [None; PropertyKind::COUNT],
            next: 1,
        }
    }

    /// 签发新代号并登记为该类型的当前代号
    pub fn issue(&mut self, kind: PropertyKind) -> Generation {
        let generation = Generation(self.next);
        self.next += 1;
        self.slots[kind.index()] = Some(generation);
        generation
    }

    /// 该代号是否仍是该类型的当前代号
    pub fn is_current(&self, kind: PropertyKind, generation: Generation) -> bool {
        self.slots[kind.index()] == Some(generation)
    }

    /// 当前登记的代号
    pub fn current(&self, kind: PropertyKind) -> Option<Generation> {
        self.slots[kind.index()]
    }

    /// 代号仍为当前时清除登记，类型回到空闲
    ///
    /// # 返回
    /// - `true`: 已清除
    /// - `false`: 已被更新的代号取代，不做任何事
    pub fn release(&mut self, kind: PropertyKind, generation: Generation) -> bool {
        if self.is_current(kind, generation) {
            self.slots[kind.index()] = None;
            true
        } else {
            false
        }
    }

    /// 使所有登记失效
    ///
    /// 计数器不回退，之后签发的代号仍大于之前所有代号。
    pub fn invalidate_all(&mut self) {
        self.slots = [None; PropertyKind::COUNT];
    }

    /// 当前有登记的类型
    pub fn active_kinds(&self) -> Vec<PropertyKind> {
        PropertyKind::ALL
            .into_iter()
            .filter(|kind| self.slots[kind.index()].is_some())
            .collect()
    }

    /// 是否所有类型都空闲
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
