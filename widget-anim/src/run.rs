//! # Run 模块
//!
//! 单个描述符的一次运行：由 `Orchestrator` 每帧恢复一次的协作式任务。
//!
//! ## 状态机
//!
//! ```text
//! Waiting(delay) ──► Playing ──► [反向段 Waiting ──► Playing] ──► 循环? ──► Waiting ...
//!                                                              └──► Restoring ──► Finished
//! ```
//!
//! 每个继续点都会先检查自己的代号是否仍是该属性类型的当前代号，
//! 被取代的运行直接结束，不再写任何状态。
//! 循环边界总是一个挂起点，同一帧内不会开始下一轮。

use std::f32::consts::PI;

use crate::config::EngineSettings;
use crate::descriptor::{AnimationDescriptor, PropertyKind};
use crate::generation::{Generation, GenerationTable};
use crate::group::GroupId;
use crate::rng::ShakeRng;
use crate::target::{Animatable, TargetSnapshot};
use crate::transform::{Color, Vec2};

/// 单帧执行所需的共享状态
pub(crate) struct FrameContext<'a> {
    pub target: &'a dyn Animatable,
    pub snapshot: TargetSnapshot,
    pub generations: &'a GenerationTable,
    pub rng: &'a mut ShakeRng,
    pub settings: &'a EngineSettings,
}

/// 运行的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    /// 正常播放完毕（含自动复位）
    Completed,
    /// 被同类型的新运行取代，或在等待期间失效
    Superseded,
}

/// 段开始时捕获的起始值
#[derive(Debug, Clone, Copy, PartialEq)]
enum StartValue {
    Alpha(f32),
    Scale(Vec2),
    Position(Vec2),
    Rotation(f32),
    /// 没有渲染表面时为 `None`，整段跳过写入
    Tint(Option<Color>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RunPhase {
    /// 延迟等待，尚未捕获起始值
    Waiting { remaining: f32 },
    /// 逐帧插值
    Playing { elapsed: f32 },
    /// 冲击/抖动/弹跳结束后的线性复位
    Restoring { elapsed: f32, from: Vec2 },
    Finished(RunOutcome),
}

/// 描述符的一次运行
#[derive(Debug, Clone)]
pub(crate) struct DescriptorRun {
    group: GroupId,
    generation: Generation,
    /// 原始描述符
    forward: AnimationDescriptor,
    /// 当前段使用的描述符（正向或反向副本）
    current: AnimationDescriptor,
    reversing: bool,
    start: StartValue,
    phase: RunPhase,
}

/// 一段播放结束后的去向
enum SegmentEnd {
    /// 同一帧内继续执行下一阶段
    Continue,
    /// 挂起到下一帧
    Suspend,
    Finish,
}

impl DescriptorRun {
    /// 创建运行，尚未执行任何一帧
    pub fn new(group: GroupId, generation: Generation, descriptor: AnimationDescriptor) -> Self {
        let phase = RunPhase::Waiting {
            remaining: descriptor.delay.max(0.0),
        };
        Self {
            group,
            generation,
            current: descriptor.clone(),
            forward: descriptor,
            reversing: false,
            start: StartValue::Alpha(0.0),
            phase,
        }
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn kind(&self) -> PropertyKind {
        self.forward.kind
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// 已结束时返回结束方式
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            RunPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    fn is_current(&self, ctx: &FrameContext<'_>) -> bool {
        ctx.generations.is_current(self.forward.kind, self.generation)
    }

    fn finish(&mut self, outcome: RunOutcome) -> bool {
        self.phase = RunPhase::Finished(outcome);
        false
    }

    fn enter_segment(&mut self, descriptor: AnimationDescriptor) {
        self.phase = RunPhase::Waiting {
            remaining: descriptor.delay.max(0.0),
        };
        self.current = descriptor;
    }

    /// 恢复执行，推进 `dt` 秒直到下一个挂起点
    ///
    /// # 返回
    /// - `true`: 仍在运行
    /// - `false`: 已结束
    pub fn resume(&mut self, dt: f32, ctx: &mut FrameContext<'_>) -> bool {
        // dt 只作用于本帧第一个挂起中的阶段
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        loop {
            match self.phase {
                RunPhase::Waiting { remaining } => {
                    let remaining = remaining - dt;
                    dt = 0.0;
                    if remaining > 0.0 {
                        self.phase = RunPhase::Waiting { remaining };
                        return true;
                    }
                    if !self.is_current(ctx) {
                        return self.finish(RunOutcome::Superseded);
                    }
                    self.start = capture_start(&self.current, ctx);
                    self.phase = RunPhase::Playing { elapsed: 0.0 };
                }
                RunPhase::Playing { elapsed } => {
                    let elapsed = elapsed + dt;
                    dt = 0.0;
                    if !self.is_current(ctx) {
                        return self.finish(RunOutcome::Superseded);
                    }

                    let duration = self.current.duration;
                    if elapsed < duration {
                        let t = (elapsed / duration).clamp(0.0, 1.0);
                        let eased = self.current.ease.apply(t);
                        apply_frame(&self.current, self.start, eased, ctx);
                        self.phase = RunPhase::Playing { elapsed };
                        return true;
                    }

                    // 可变帧长下也保证精确落在终点
                    apply_frame(&self.current, self.start, 1.0, ctx);
                    self.settle_segment(ctx);

                    match self.end_segment(ctx) {
                        SegmentEnd::Continue => {}
                        SegmentEnd::Suspend => return true,
                        SegmentEnd::Finish => return self.finish(RunOutcome::Completed),
                    }
                }
                RunPhase::Restoring { elapsed, from } => {
                    let elapsed = elapsed + dt;
                    dt = 0.0;
                    if !self.is_current(ctx) {
                        return self.finish(RunOutcome::Superseded);
                    }

                    let duration = ctx.settings.restore_duration;
                    let t = if duration > 0.0 {
                        (elapsed / duration).min(1.0)
                    } else {
                        1.0
                    };
                    self.write_restore(from, t, ctx);

                    if t >= 1.0 {
                        return self.finish(RunOutcome::Completed);
                    }
                    self.phase = RunPhase::Restoring { elapsed, from };
                    return true;
                }
                RunPhase::Finished(_) => return false,
            }
        }
    }

    /// 段结束后的附加写入
    fn settle_segment(&self, ctx: &mut FrameContext<'_>) {
        if self.current.kind == PropertyKind::Fade && ctx.settings.interaction_gating {
            ctx.target.set_interactable(self.current.fade_to > 0.0);
        }
    }

    fn end_segment(&mut self, ctx: &mut FrameContext<'_>) -> SegmentEnd {
        if self.forward.yoyo && !self.reversing {
            self.reversing = true;
            self.enter_segment(self.forward.reversed());
            return SegmentEnd::Continue;
        }

        if self.forward.looping {
            self.reversing = false;
            self.enter_segment(self.forward.clone());
            return SegmentEnd::Suspend;
        }

        if self.forward.kind.auto_restores() {
            let from = match self.forward.kind {
                PropertyKind::PunchScale => ctx.target.scale(),
                _ => ctx.target.position(),
            };
            self.phase = RunPhase::Restoring { elapsed: 0.0, from };
            return SegmentEnd::Continue;
        }

        SegmentEnd::Finish
    }

    fn write_restore(&self, from: Vec2, t: f32, ctx: &mut FrameContext<'_>) {
        match self.forward.kind {
            PropertyKind::PunchScale => {
                ctx.target
                    .set_scale(lerp_vec2(from, ctx.snapshot.scale, t));
            }
            _ => {
                ctx.target
                    .set_position(lerp_vec2(from, ctx.snapshot.position, t));
            }
        }
    }
}

/// 捕获段的起始值
///
/// `from_current == false` 时把属性强制设为 From 值；
/// 冲击/抖动/弹跳没有 From 值，以快照为锚点。
fn capture_start(d: &AnimationDescriptor, ctx: &mut FrameContext<'_>) -> StartValue {
    let target = ctx.target;
    match d.kind {
        PropertyKind::Fade => {
            if d.from_current {
                StartValue::Alpha(target.alpha())
            } else {
                target.set_alpha(d.fade_from);
                StartValue::Alpha(d.fade_from)
            }
        }
        PropertyKind::Scale => {
            if d.from_current {
                StartValue::Scale(target.scale())
            } else {
                target.set_scale(d.scale_from);
                StartValue::Scale(d.scale_from)
            }
        }
        PropertyKind::Slide => {
            if d.from_current {
                StartValue::Position(target.position())
            } else {
                let from = ctx.snapshot.position + d.slide_from;
                target.set_position(from);
                StartValue::Position(from)
            }
        }
        PropertyKind::Rotate => {
            if d.from_current {
                StartValue::Rotation(target.rotation())
            } else {
                target.set_rotation(d.rotate_from);
                StartValue::Rotation(d.rotate_from)
            }
        }
        PropertyKind::PunchScale => StartValue::Scale(if d.from_current {
            target.scale()
        } else {
            ctx.snapshot.scale
        }),
        PropertyKind::Shake | PropertyKind::Bounce => StartValue::Position(if d.from_current {
            target.position()
        } else {
            ctx.snapshot.position
        }),
        PropertyKind::ColorTint => {
            if d.from_current {
                StartValue::Tint(target.tint())
            } else if target.set_tint(d.tint_from) {
                StartValue::Tint(Some(d.tint_from))
            } else {
                StartValue::Tint(None)
            }
        }
    }
}

/// 按属性类型写入一帧
fn apply_frame(d: &AnimationDescriptor, start: StartValue, eased: f32, ctx: &mut FrameContext<'_>) {
    let target = ctx.target;
    match (d.kind, start) {
        (PropertyKind::Fade, StartValue::Alpha(from)) => {
            target.set_alpha(lerp_f32(from, d.fade_to, eased));
        }
        (PropertyKind::Scale, StartValue::Scale(from)) => {
            target.set_scale(lerp_vec2(from, d.scale_to, eased));
        }
        (PropertyKind::Slide, StartValue::Position(from)) => {
            let to = ctx.snapshot.position + d.slide_to;
            target.set_position(lerp_vec2(from, to, eased));
        }
        (PropertyKind::Rotate, StartValue::Rotation(from)) => {
            target.set_rotation(lerp_f32(from, d.rotate_to, eased));
        }
        (PropertyKind::PunchScale, StartValue::Scale(from)) => {
            target.set_scale(from * (1.0 + d.punch_intensity * arc(eased)));
        }
        (PropertyKind::Shake, StartValue::Position(from)) => {
            let offset = ctx.rng.next_offset() * (d.shake_intensity * (1.0 - eased));
            target.set_position(from + offset);
        }
        (PropertyKind::Bounce, StartValue::Position(from)) => {
            target.set_position(Vec2::new(from.x, from.y + d.bounce_height * arc(eased)));
        }
        (PropertyKind::ColorTint, StartValue::Tint(Some(from))) => {
            let color = if eased == 1.0 {
                d.tint_to
            } else {
                from.lerp(d.tint_to, eased)
            };
            target.set_tint(color);
        }
        // 缺少渲染表面，或起始值与类型不匹配
        _ => {}
    }
}

/// `sin(eased·π)`，终点处精确为 0
fn arc(eased: f32) -> f32 {
    if eased == 1.0 { 0.0 } else { (eased * PI).sin() }
}

fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    if t == 1.0 { to } else { from + (to - from) * t }
}

fn lerp_vec2(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    if t == 1.0 { to } else { from.lerp(to, t) }
}
