//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::steganography::{Algorithm, REGISTRY};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB 与 Kutter-Jordan-Bossen 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB 与 Kutter-Jordan-Bossen 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 比较两幅图像，输出 MSE、RMSE 与 PSNR。
    Compare(CompareArgs),

    /// 显示图像在指定算法下最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 按名称解析算法，供 `--algorithm` 参数使用。
pub fn parse_algorithm(name: &str) -> Result<Algorithm, String> {
    Algorithm::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = REGISTRY.iter().map(|&(key, _)| key).collect();
        format!("unknown algorithm '{name}', expected one of: {}", known.join(", "))
    })
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 缺省为输入图像旁的 `<名称>[encoded,<算法>].png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 使用的隐写算法。
    #[arg(short, long, default_value = "LeastSignificantBit", value_parser = parse_algorithm)]
    pub algorithm: Algorithm,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 缺省为图像旁的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 隐藏文本时使用的算法。
    #[arg(short, long, default_value = "LeastSignificantBit", value_parser = parse_algorithm)]
    pub algorithm: Algorithm,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'compare' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// 原始图像文件路径。
    #[arg(short, long)]
    pub original: PathBuf,

    /// 修改后 (隐写后) 的图像文件路径。
    #[arg(short, long)]
    pub modified: PathBuf,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 使用的隐写算法。
    #[arg(short, long, default_value = "LeastSignificantBit", value_parser = parse_algorithm)]
    pub algorithm: Algorithm,
}
