//! 词表读取
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LoadError;

/// 逐行读取词表并去除首尾空白；保留空行与文件顺序
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, LoadError> {
    let io_err = |source| LoadError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_err)?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        words.push(line.map_err(io_err)?.trim().to_string());
    }
    Ok(words)
}
