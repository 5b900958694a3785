//! 投稿の永続化ストア
//!
//! 投稿一覧をJSON配列として1ファイルに保存する。
//! 変更は複製に適用 → 一時ファイルへ書き込み → rename の順で行い、
//! 書き込みが成功した場合のみメモリ上の一覧を差し替える。

use crate::error::{FeedError, Result};
use edu_feed_common::Post;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PostStore {
    path: PathBuf,
    posts: Vec<Post>,
}

impl PostStore {
    /// ファイルから読み込み（無い場合は初期投稿）
    ///
    /// 読めないファイルは `.bak` に退避してから初期投稿を使う。
    /// 退避できなければ上書きを避けるためエラーを返す
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let posts = match read_posts(&path) {
            Ok(Some(posts)) => posts,
            Ok(None) => seed_posts(),
            Err(e) => {
                let backup = backup_unreadable(&path)?;
                warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "投稿ファイルを読めないため退避して初期投稿を使います"
                );
                seed_posts()
            }
        };
        debug!(count = posts.len(), "投稿を読み込みました");
        Ok(Self { path, posts })
    }

    /// 保存せずに任意の一覧で作る
    pub fn with_posts(path: impl Into<PathBuf>, posts: Vec<Post>) -> Self {
        Self {
            path: path.into(),
            posts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 現在の一覧を書き出す
    pub fn save(&self) -> Result<()> {
        write_posts(&self.path, &self.posts)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// 新しい投稿ID（時刻ミリ秒、ただし既存の最大IDより大きい）
    pub fn next_id(&self, now_ms: u64) -> u64 {
        let max_id = self.posts.iter().map(|p| p.id).max().unwrap_or(0);
        now_ms.max(max_id + 1)
    }

    /// 先頭に追加して保存
    pub fn prepend(&mut self, post: Post) -> Result<()> {
        self.mutate(|posts| {
            posts.insert(0, post);
            Ok(())
        })
    }

    pub fn toggle_like(&mut self, id: u64) -> Result<&Post> {
        self.mutate(|posts| {
            let post = posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(FeedError::PostNotFound(id))?;
            post.toggle_like();
            Ok(())
        })?;
        self.get(id).ok_or(FeedError::PostNotFound(id))
    }

    pub fn delete(&mut self, id: u64) -> Result<Post> {
        let mut removed = None;
        self.mutate(|posts| {
            let index = posts
                .iter()
                .position(|p| p.id == id)
                .ok_or(FeedError::PostNotFound(id))?;
            removed = Some(posts.remove(index));
            Ok(())
        })?;
        removed.ok_or(FeedError::PostNotFound(id))
    }

    /// 初期投稿に戻して保存
    pub fn reset(&mut self) -> Result<()> {
        self.mutate(|posts| {
            *posts = seed_posts();
            Ok(())
        })
    }

    fn mutate<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Post>) -> Result<()>,
    {
        let mut next = self.posts.clone();
        f(&mut next)?;
        write_posts(&self.path, &next)?;
        self.posts = next;
        Ok(())
    }
}

fn read_posts(path: &Path) -> Result<Option<Vec<Post>>> {
    if !path.exists() {
        return Ok(None);
    }
    let reader = BufReader::new(File::open(path)?);
    let posts = serde_json::from_reader(reader)?;
    Ok(Some(posts))
}

/// 読めないファイルを `posts.json.bak` へ移す（既存の退避は上書き）
fn backup_unreadable(path: &Path) -> Result<PathBuf> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    let backup = path.with_file_name(name);
    fs::rename(path, &backup)?;
    Ok(backup)
}

fn write_posts(path: &Path, posts: &[Post]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, posts)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    debug!(path = %path.display(), count = posts.len(), "投稿を保存しました");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: u64,
    author: &str,
    avatar: &str,
    time: &str,
    content: &str,
    likes: u32,
    comments: u32,
    liked: bool,
) -> Post {
    Post {
        id,
        author: author.into(),
        avatar: avatar.into(),
        time: time.into(),
        content: content.into(),
        likes,
        liked,
        comments,
        images: Vec::new(),
    }
}

/// 保存ファイルが無いときの初期投稿
pub fn seed_posts() -> Vec<Post> {
    vec![
        seed(1, "Marie Dubois", "MD", "Il y a 2 heures",
            "Super session de codage aujourd'hui ! J'ai enfin réussi à implémenter le système d'authentification avec JWT.",
            12, 3, false),
        seed(2, "Thomas Martin", "TM", "Il y a 4 heures",
            "Quelqu'un connaît un bon tutoriel sur React Hooks ? Je bloque sur useEffect avec les API.",
            8, 7, true),
        seed(3, "Jean Dupont", "JD", "Il y a 1 heure",
            "Le gouvernement a annoncé un nouveau plan pour réduire les émissions de gaz à effet de serre. Mais est-ce vraiment efficace ?",
            20, 10, false),
        seed(4, "Pierre Durand", "PD", "Il y a 3 heures",
            "La nouvelle loi sur la sécurité routière est-elle vraiment nécessaire ? Les conducteurs sont-ils vraiment responsables des accidents ?",
            15, 8, true),
        seed(5, "Tech Expert", "TE", "Il y a 30 minutes",
            "Les fichiers JavaScript s'exécutent directement côté serveur par défaut.",
            3, 1, false),
        seed(6, "History Buff", "HB", "Il y a 1 heure",
            "Saviez-vous que les Vikings portaient des casques à cornes ? C'est tellement iconique !",
            8, 2, false),
        seed(7, "Science Fan", "SF", "Il y a 2 heures",
            "Les chameaux stockent de l'eau dans leurs bosses pour survivre dans le désert. Fascinant !",
            12, 4, true),
        seed(8, "Geek Culture", "GC", "Il y a 45 minutes",
            "Les humains utilisent seulement 10 % de leur cerveau. Imaginez si on pouvait débloquer les 90 % restants !",
            25, 7, false),
    ]
}
