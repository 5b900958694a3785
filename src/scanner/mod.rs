//! 投稿用画像の候補管理
//!
//! ファイル読込・形式判定・サイズ検証を行い、投稿前の候補（最大5枚）を保持する。

use crate::error::{FeedError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 1投稿あたりの画像上限
pub const MAX_IMAGES: usize = 5;

/// 1枚あたりのサイズ上限（5 MiB）
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// 投稿前の画像候補
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub id: String,
    pub path: Option<PathBuf>,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    /// ローカルプレビュー用URL
    pub preview_url: String,
}

impl ImageCandidate {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut candidate = Self::from_bytes(&file_name, data)?;
        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        candidate.preview_url = format!("file://{}", absolute.display());
        candidate.path = Some(path.to_path_buf());
        Ok(candidate)
    }

    /// バイト列から候補を作る（形式とサイズを検証）
    pub fn from_bytes(file_name: &str, data: Vec<u8>) -> Result<Self> {
        if data.len() > MAX_IMAGE_BYTES {
            return Err(FeedError::InvalidImage(format!(
                "{}: サイズ超過 ({} bytes)",
                file_name,
                data.len()
            )));
        }
        let format = image::guess_format(&data)
            .map_err(|_| FeedError::InvalidImage(format!("{}: 画像ではありません", file_name)))?;

        Ok(Self {
            id: candidate_id(file_name, &data),
            path: None,
            file_name: file_name.to_string(),
            mime_type: format.to_mime_type().to_string(),
            data,
            preview_url: format!("memory://{}", file_name),
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

fn candidate_id(file_name: &str, data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    format!("img-{}", &digest[..12])
}

/// 投稿前の候補リスト（上限付き）
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    items: Vec<ImageCandidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 上限を超える場合は追加せずエラー
    pub fn add(&mut self, candidate: ImageCandidate) -> Result<()> {
        if self.items.len() >= MAX_IMAGES {
            return Err(FeedError::TooManyImages(MAX_IMAGES));
        }
        self.items.push(candidate);
        Ok(())
    }

    pub fn add_path(&mut self, path: &Path) -> Result<()> {
        let candidate = ImageCandidate::from_path(path)?;
        self.add(candidate)
    }

    pub fn remove(&mut self, id: &str) -> Option<ImageCandidate> {
        let index = self.items.iter().position(|c| c.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[ImageCandidate] {
        &self.items
    }
}

/// フォルダ直下の画像ファイルをファイル名順に列挙
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(FeedError::FolderNotFound(folder.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_extension(p))
        .collect();

    paths.sort();
    Ok(paths)
}

fn is_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
