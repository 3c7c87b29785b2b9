//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或提取任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或提取任意文件。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出更详细的日志，可重复使用 (-v, -vv)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 只输出错误信息。
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// 根据 `-v` / `-q` 计算日志级别。
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// 可用的子命令：hide (隐藏)、extract (提取) 和 capacity (容量)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将任意文件隐藏到无损格式图像 (如 PNG, BMP) 中。
    Hide(HideArgs),

    /// 从经过隐写的图像中提取隐藏的文件。
    Extract(ExtractArgs),

    /// 显示图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的载体图像文件路径。
    pub cover: PathBuf,

    /// 要隐藏的文件路径。
    pub payload: PathBuf,

    /// 保存结果图像的输出路径，扩展名决定格式。
    /// 省略时在载体旁生成 `<名称>_stego.png`。
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// 已隐藏数据的图像文件路径。
    pub image: PathBuf,

    /// 保存提取内容的输出路径。
    /// 省略时在图像旁生成 `<名称>.payload`。
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要检查的载体图像文件路径。
    pub cover: PathBuf,
}
