//! # Orchestrator 模块
//!
//! 单个控件的动画调度器。
//!
//! ## 职责
//!
//! - 把触发器分发到匹配的分组，为每个启用的描述符启动一次运行
//! - 按 `PropertyKind` 单飞：新运行签发新代号，旧运行在下一帧自行停止
//! - 维护每个分组的在途计数，归零时发出分组结束与全局结束事件
//! - 在首次动画前捕获原始状态，`reset_to_original` 时强制还原
//!
//! ## 驱动方式
//!
//! 宿主每帧调用一次 [`Orchestrator::tick`]，所有运行按启动顺序各恢复一次。
//! 整个引擎只在宿主的帧线程上运行，不需要任何同步原语。

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::EngineSettings;
use crate::descriptor::{AnimationDescriptor, PropertyKind};
use crate::event::{AnimationEvent, EventSink};
use crate::generation::GenerationTable;
use crate::group::{AnimationGroup, GroupId, TriggerKind};
use crate::rng::ShakeRng;
use crate::run::{DescriptorRun, FrameContext, RunOutcome};
use crate::target::{Animatable, TargetSnapshot};

/// 动画调度器
pub struct Orchestrator {
    target: Rc<dyn Animatable>,
    settings: EngineSettings,
    /// 首次动画前捕获的原始状态
    snapshot: Option<TargetSnapshot>,
    groups: Vec<AnimationGroup>,
    next_group_id: u64,
    generations: GenerationTable,
    /// 按启动顺序排列的活动运行
    runs: Vec<DescriptorRun>,
    /// 分组在途计数
    in_flight: HashMap<GroupId, usize>,
    rng: ShakeRng,
    /// 待取出的事件
    events: Vec<AnimationEvent>,
    /// 全局：任一分组开始
    pub on_animation_start: EventSink,
    /// 全局：任一分组的在途计数归零
    pub on_animation_end: EventSink,
}

impl Orchestrator {
    /// 以默认参数创建
    pub fn new(target: Rc<dyn Animatable>) -> Self {
        Self::with_settings(target, EngineSettings::default())
    }

    /// 以指定参数创建
    pub fn with_settings(target: Rc<dyn Animatable>, settings: EngineSettings) -> Self {
        let rng = ShakeRng::new(settings.shake_seed);
        Self {
            target,
            settings,
            snapshot: None,
            groups: Vec::new(),
            next_group_id: 1,
            generations: GenerationTable::new(),
            runs: Vec::new(),
            in_flight: HashMap::new(),
            rng,
            events: Vec::new(),
            on_animation_start: EventSink::new(),
            on_animation_end: EventSink::new(),
        }
    }

    /// 动画目标
    pub fn target(&self) -> &Rc<dyn Animatable> {
        &self.target
    }

    /// 引擎参数
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ========== 分组管理 ==========

    /// 追加分组并分配标识
    pub fn add_group(&mut self, mut group: AnimationGroup) -> GroupId {
        let id = self.allocate_group_id();
        group.id = id;
        self.groups.push(group);
        id
    }

    /// 在 `index` 处插入分组，越界时不做任何事
    pub fn insert_group(&mut self, index: usize, mut group: AnimationGroup) -> Option<GroupId> {
        if index > self.groups.len() {
            warn!(index, len = self.groups.len(), "插入分组越界，已忽略");
            return None;
        }
        let id = self.allocate_group_id();
        group.id = id;
        self.groups.insert(index, group);
        Some(id)
    }

    /// 移除分组
    ///
    /// 仍在运行的描述符照常播放并继续倒数在途计数，
    /// 归零时只发出全局结束事件，被移除分组自己的回调不再触发。
    pub fn remove_group(&mut self, index: usize) -> Option<AnimationGroup> {
        if index >= self.groups.len() {
            warn!(index, len = self.groups.len(), "移除分组越界，已忽略");
            return None;
        }
        let group = self.groups.remove(index);
        debug!(group = %group.id, label = %group.label, "分组已移除");
        Some(group)
    }

    /// 把分组从 `from` 移到 `to`
    pub fn move_group(&mut self, from: usize, to: usize) -> bool {
        let len = self.groups.len();
        if from >= len || to >= len {
            warn!(from, to, len, "移动分组越界，已忽略");
            return false;
        }
        let group = self.groups.remove(from);
        self.groups.insert(to, group);
        true
    }

    /// 全部分组
    pub fn groups(&self) -> &[AnimationGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&AnimationGroup> {
        self.groups.get(index)
    }

    /// 可变访问分组（编辑描述符、注册监听器）
    pub fn group_mut(&mut self, index: usize) -> Option<&mut AnimationGroup> {
        self.groups.get_mut(index)
    }

    pub fn group_by_id(&self, id: GroupId) -> Option<&AnimationGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// 按标签查找分组下标
    pub fn find_group(&self, label: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.label == label)
    }

    fn allocate_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        id
    }

    // ========== 原始状态 ==========

    /// 已捕获的原始状态
    pub fn snapshot(&self) -> Option<TargetSnapshot> {
        self.snapshot
    }

    /// 尚未捕获时捕获原始状态
    pub fn capture_original(&mut self) -> TargetSnapshot {
        match self.snapshot {
            Some(snapshot) => snapshot,
            None => self.recapture_original(),
        }
    }

    /// 以目标的当前状态覆盖原始状态
    pub fn recapture_original(&mut self) -> TargetSnapshot {
        let snapshot = TargetSnapshot::capture(self.target.as_ref());
        info!(?snapshot, "捕获原始状态");
        self.snapshot = Some(snapshot);
        snapshot
    }

    // ========== 生命周期 ==========

    /// 控件激活：捕获原始状态并分发 `OnEnable`
    pub fn on_enable(&mut self) -> usize {
        self.capture_original();
        self.dispatch(TriggerKind::OnEnable)
    }

    /// 控件停用：同步还原，任何动画都不跨越激活边界
    pub fn on_disable(&mut self) {
        self.reset_to_original();
    }

    /// 强制取消所有运行并还原原始状态
    ///
    /// 不发出任何事件；尚未捕获原始状态时只取消运行。
    pub fn reset_to_original(&mut self) {
        let cancelled = self.runs.len();
        self.runs.clear();
        self.generations.invalidate_all();
        self.in_flight.clear();

        match self.snapshot {
            Some(snapshot) => {
                snapshot.restore(self.target.as_ref());
                info!(cancelled, "重置到原始状态");
            }
            None => debug!(cancelled, "尚未捕获原始状态，仅取消运行"),
        }
    }

    // ========== 播放 ==========

    /// 分发触发器
    ///
    /// # 返回
    /// 启动的分组数量（没有启用描述符的分组不计入）
    pub fn dispatch(&mut self, trigger: TriggerKind) -> usize {
        let matching: Vec<usize> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.trigger == trigger && g.has_enabled())
            .map(|(index, _)| index)
            .collect();

        debug!(?trigger, groups = matching.len(), "分发触发器");

        for &index in &matching {
            self.start_group(index);
        }
        self.collect_finished();
        matching.len()
    }

    /// 按标签播放分组，不检查触发器
    pub fn play_group(&mut self, label: &str) -> bool {
        match self.find_group(label) {
            Some(index) => self.play_group_at(index),
            None => {
                warn!(label, "未找到分组");
                false
            }
        }
    }

    /// 按下标播放分组，不检查触发器
    pub fn play_group_at(&mut self, index: usize) -> bool {
        let Some(group) = self.groups.get(index) else {
            warn!(index, len = self.groups.len(), "播放分组越界，已忽略");
            return false;
        };
        if !group.has_enabled() {
            return false;
        }
        self.start_group(index);
        self.collect_finished();
        true
    }

    /// 单独播放一个描述符
    ///
    /// 计入分组的在途计数，但不发出分组开始事件。
    pub fn play_descriptor(&mut self, group_index: usize, descriptor_index: usize) -> bool {
        let Some(group) = self.groups.get(group_index) else {
            warn!(group_index, "播放描述符时分组越界，已忽略");
            return false;
        };
        let Some(descriptor) = group.descriptors.get(descriptor_index) else {
            warn!(group_index, descriptor_index, "播放描述符越界，已忽略");
            return false;
        };
        if !descriptor.enabled {
            return false;
        }

        let id = group.id;
        let descriptor = descriptor.clone();
        let snapshot = self.capture_original();
        self.launch(id, descriptor, snapshot);
        self.collect_finished();
        true
    }

    fn start_group(&mut self, index: usize) {
        let snapshot = self.capture_original();
        let group = &mut self.groups[index];
        let id = group.id;

        debug!(group = %id, label = %group.label, "分组开始");
        group.on_group_start.invoke();
        let descriptors: Vec<AnimationDescriptor> =
            group.enabled_descriptors().cloned().collect();

        self.events.push(AnimationEvent::GroupStarted(id));
        self.on_animation_start.invoke();

        for descriptor in descriptors {
            self.launch(id, descriptor, snapshot);
        }
    }

    /// 签发代号、计数并执行到第一个挂起点
    fn launch(&mut self, group: GroupId, descriptor: AnimationDescriptor, snapshot: TargetSnapshot) {
        let generation = self.generations.issue(descriptor.kind);
        *self.in_flight.entry(group).or_insert(0) += 1;

        let mut run = DescriptorRun::new(group, generation, descriptor);
        let mut ctx = FrameContext {
            target: self.target.as_ref(),
            snapshot,
            generations: &self.generations,
            rng: &mut self.rng,
            settings: &self.settings,
        };
        run.resume(0.0, &mut ctx);
        self.runs.push(run);
    }

    // ========== 帧驱动 ==========

    /// 推进一帧
    ///
    /// # 参数
    /// - `dt`: 距上一帧的秒数
    ///
    /// # 返回
    /// 本帧及之前尚未取出的事件
    pub fn tick(&mut self, dt: f32) -> Vec<AnimationEvent> {
        if let Some(snapshot) = self.snapshot {
            let mut ctx = FrameContext {
                target: self.target.as_ref(),
                snapshot,
                generations: &self.generations,
                rng: &mut self.rng,
                settings: &self.settings,
            };
            for run in self.runs.iter_mut().filter(|run| !run.is_finished()) {
                run.resume(dt, &mut ctx);
            }
        }

        self.collect_finished();
        self.drain_events()
    }

    /// 取出所有待处理事件
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect_finished(&mut self) {
        if !self.runs.iter().any(DescriptorRun::is_finished) {
            return;
        }

        let (finished, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.runs)
            .into_iter()
            .partition(DescriptorRun::is_finished);
        self.runs = live;

        for run in finished {
            let group = run.group();
            let kind = run.kind();
            if run.outcome() == Some(RunOutcome::Superseded) {
                debug!(group = %group, %kind, "运行被取代");
                self.events.push(AnimationEvent::Superseded { group, kind });
            }
            self.generations.release(kind, run.generation());
            self.finish_in_flight(group);
        }
    }

    fn finish_in_flight(&mut self, group: GroupId) {
        // 计数已被重置清空
        let Some(count) = self.in_flight.get_mut(&group) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return;
        }
        self.in_flight.remove(&group);

        // 分组可能已被移除
        match self.groups.iter_mut().find(|g| g.id == group) {
            Some(g) => {
                debug!(group = %group, label = %g.label, "分组结束");
                g.on_group_end.invoke();
            }
            None => debug!(group = %group, "已移除分组的运行全部结束"),
        }
        self.events.push(AnimationEvent::GroupEnded(group));
        self.on_animation_end.invoke();
    }

    // ========== 查询 ==========

    /// 是否有运行中的动画
    pub fn is_animating(&self) -> bool {
        !self.runs.is_empty()
    }

    /// 该类型是否有登记的运行
    pub fn is_kind_active(&self, kind: PropertyKind) -> bool {
        self.generations.current(kind).is_some()
    }

    /// 当前有登记运行的类型
    pub fn active_kinds(&self) -> Vec<PropertyKind> {
        self.generations.active_kinds()
    }

    /// 分组的在途运行数
    pub fn in_flight(&self, group: GroupId) -> usize {
        self.in_flight.get(&group).copied().unwrap_or(0)
    }

    /// 活动运行数（含已被取代、尚未察觉的运行）
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("groups", &self.groups.len())
            .field("runs", &self.runs.len())
            .field("snapshot", &self.snapshot)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
