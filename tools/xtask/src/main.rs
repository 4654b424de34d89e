//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-lib`: 运行 widget-anim 覆盖率
//! - `config-check`: 检查动画配置文件（JSON 语法、字段取值）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use walkdir::WalkDir;
use widget_anim::{AnimatorConfig, ConfigError, PropertyKind};

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-lib" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "widget-anim", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p widget-anim --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "config-check" => {
            let path = args.next();
            config_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-lib         运行 widget-anim 覆盖率报告
  config-check    检查动画配置文件

CONFIG-CHECK:
  cargo xtask config-check [path]

  不带参数：检查 animations/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 语法与字段类型
    - 时长/延迟为非负有限数，透明度端点在 0.0 - 1.0 之间
    - 分组 label 非空
    - 同一分组内重复的属性类型（后者会取代前者）

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-lib       -> cargo xtask cov-lib
  cargo config-check  -> cargo xtask config-check
"#
    );
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 默认配置目录（相对于 workspace root）
const DEFAULT_CONFIG_DIR: &str = "animations";

/// 配置检查结果
#[derive(Default)]
struct ConfigCheckResult {
    /// 检查的文件数量
    files_checked: usize,
    /// 错误
    errors: Vec<String>,
    /// 警告
    warnings: Vec<String>,
}

/// 执行配置检查
fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let root = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_DIR));
    if !root.exists() {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定配置路径",
            root.display()
        );
    }

    let files = collect_config_files(&root);
    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let mut result = ConfigCheckResult::default();
    for file in &files {
        check_config_file(file, &mut result);
    }

    print_check_result(&result);

    if !result.errors.is_empty() {
        anyhow::bail!("配置检查发现错误");
    }
    Ok(())
}

/// 收集路径下的所有配置文件
fn collect_config_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个配置文件
fn check_config_file(file: &Path, result: &mut ConfigCheckResult) {
    let id = file.display().to_string();
    result.files_checked += 1;

    let config = match AnimatorConfig::load(file) {
        Ok(config) => config,
        Err(ConfigError::Io { source, .. }) => {
            result.errors.push(format!("{id}: 无法读取文件 - {source}"));
            return;
        }
        Err(e) => {
            result.errors.push(format!("{id}: {e}"));
            return;
        }
    };

    for group in &config.groups {
        if group.descriptors.iter().all(|d| !d.enabled) {
            result
                .warnings
                .push(format!("{id}: 分组 '{}' 没有启用的描述符", group.label));
        }

        let mut seen: Vec<PropertyKind> = Vec::new();
        for d in group.descriptors.iter().filter(|d| d.enabled) {
            if seen.contains(&d.kind) {
                result.warnings.push(format!(
                    "{id}: 分组 '{}' 中有多个 {} 描述符，只有最后一个生效",
                    group.label, d.kind
                ));
            } else {
                seen.push(d.kind);
            }
        }
    }

    let mut labels: Vec<&str> = config.groups.iter().map(|g| g.label.as_str()).collect();
    labels.sort_unstable();
    for pair in labels.windows(2) {
        if pair[0] == pair[1] {
            result
                .warnings
                .push(format!("{id}: 分组 label '{}' 重复", pair[0]));
        }
    }
}

/// 输出检查结果
fn print_check_result(result: &ConfigCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个配置文件", result.files_checked);
    eprintln!();

    for e in &result.errors {
        eprintln!("[ERROR] {e}");
    }
    for w in &result.warnings {
        eprintln!("[WARN] {w}");
    }

    eprintln!();
    if !result.errors.is_empty() {
        eprintln!(
            "❌ {} 个错误, {} 个警告",
            result.errors.len(),
            result.warnings.len()
        );
    } else if !result.warnings.is_empty() {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warnings.len());
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
