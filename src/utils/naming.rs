//! # 文件名工具
//!
//! 防止意外覆盖：若目标路径已存在，在扩展名前插入递增计数器，
//! 返回第一个空闲的名字 (file.txt -> file.1.txt -> file.2.txt ...)。
//!
//! ## 依赖关系
//! - 被 `parsers/frcmod.rs` 和 `commands/` 使用

use std::path::{Path, PathBuf};

/// 返回一个不存在的路径变体
///
/// 路径不存在时原样返回；否则在扩展名前追加 `.N`，N 从 1 起递增，
/// 到第一个空闲值为止。
pub fn available_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = path.extension().and_then(|s| s.to_str());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1usize;
    loop {
        let name = match ext {
            Some(ext) => format!("{}.{}.{}", stem, counter, ext),
            None => format!("{}.{}", stem, counter),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
