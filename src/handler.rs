//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, CompareArgs, HideArgs, RecoverArgs};
use crate::metrics::{mean_squared_error, peak_signal_to_noise_ratio, root_mean_squared_error};
use crate::steganography::Algorithm;
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbaImage;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 读取图像并转换为 RGBA8。
fn load_image(path: &Path) -> Result<RgbaImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?
    .to_rgba8();
    debug!("loaded {} {:?}", path.display(), picture.dimensions());
    Ok(picture)
}

/// 未指定 `--force` 时拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 隐写结果图像的缺省路径：`<名称>[encoded,<算法>].png`。
pub fn default_hidden_path(image: &Path, algorithm: Algorithm) -> PathBuf {
    image.with_file_name(format!("{}[encoded,{}].png", file_stem(image), algorithm))
}

/// 恢复文本的缺省路径：`recovered_<名称>.txt`。
pub fn default_recovered_path(image: &Path) -> PathBuf {
    image.with_file_name(format!("recovered_{}.txt", file_stem(image)))
}

/// 打印两幅图像之间的 MSE、RMSE 与 PSNR。
fn report_fidelity(original: &RgbaImage, modified: &RgbaImage) {
    let mse = mean_squared_error(original, modified);
    let rmse = root_mean_squared_error(original, modified);
    let psnr = peak_signal_to_noise_ratio(original, modified);

    println!("{}", "Comparison of the original and encoded images".bold());
    println!("  MSE:  {}", format!("{mse:.6}").cyan());
    println!("  RMSE: {}", format!("{rmse:.6}").cyan());
    println!("  PSNR: {} dB", format!("{psnr:.4}").cyan());
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、调用所选算法隐藏文本，
/// 将结果写入目标图像文件，并报告图像失真程度。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与算法的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .unwrap_or_else(|| default_hidden_path(&args.image, args.algorithm));
    ensure_writable(&dest, args.force)?;

    let picture = load_image(&args.image)?;

    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let hidden = args.algorithm.encode(&text, &picture).with_context(|| {
        format!(
            "Not enough space in the image to hide the text with {}. \nCapacity: {} bytes",
            args.algorithm.to_string().red().bold(),
            args.algorithm
                .capacity(&picture)
                .unwrap_or(0)
                .to_string()
                .green()
                .bold()
        )
    })?;

    hidden.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    report_fidelity(&picture, &hidden);

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用所选算法恢复文本，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与算法的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像中没有隐藏文本或数据已损坏。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let picture = load_image(&args.image)?;

    let text = args.algorithm.decode(&picture).with_context(|| {
        format!(
            "Failed to recover the text from '{}' with {}. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold(),
            args.algorithm.to_string().red().bold()
        )
    })?;

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Compare' 命令的执行逻辑。
///
/// # Errors
///
/// 无法读取任一图像，或两幅图像尺寸不同时返回错误。
pub fn handle_compare(args: CompareArgs) -> Result<()> {
    let original = load_image(&args.original)?;
    let modified = load_image(&args.modified)?;

    anyhow::ensure!(
        original.dimensions() == modified.dimensions(),
        "Images must have the same dimensions. \nOriginal: {}, Modified: {}",
        format!("{:?}", original.dimensions()).green().bold(),
        format!("{:?}", modified.dimensions()).red().bold()
    );

    report_fidelity(&original, &modified);
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_image(&args.image)?;

    match args.algorithm.capacity(&picture) {
        Some(bytes) => println!(
            "{} can hide up to {} bytes with {}",
            args.image.to_string_lossy().green().bold(),
            bytes.to_string().green().bold(),
            args.algorithm
        ),
        None => println!(
            "{} is too small to hide any text with {}",
            args.image.to_string_lossy().red().bold(),
            args.algorithm
        ),
    }
    Ok(())
}
