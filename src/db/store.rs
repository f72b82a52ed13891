use crate::db::{export, seed};
use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, NewCatalogItem};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 费率库仓库: 启动时加载, 显式 save() 落盘
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    items: Vec<CatalogItem>,
    dirty: bool,
}

impl CatalogStore {
    /// 打开费率库文件, 文件不存在时为空库
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            tracing::info!("Catalog file {} not found, starting empty", path.display());
            return Ok(Self::with_items(path, Vec::new()));
        }

        let raw = std::fs::read_to_string(&path)?;
        let items = export::parse_backup(&raw)?;
        tracing::info!("Loaded {} catalog items from {}", items.len(), path.display());
        Ok(Self::with_items(path, items))
    }

    /// 打开费率库文件, 文件不存在时写入内置费率表
    pub fn open_or_seed(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::open(path);
        }

        let items = seed::initial_catalog();
        tracing::info!("Seeding catalog with {} built-in rates", items.len());
        let mut store = Self::with_items(path.to_path_buf(), items);
        store.dirty = true;
        Ok(store)
    }

    pub fn with_items(path: PathBuf, items: Vec<CatalogItem>) -> Self {
        Self {
            path,
            items,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 当前内容的快照, 用于跨 await 的计算
    pub fn snapshot(&self) -> Vec<CatalogItem> {
        self.items.clone()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// 新增条目, 插入到最前
    pub fn add(&mut self, new: NewCatalogItem) -> CatalogItem {
        let item = CatalogItem::create(new);
        self.items.insert(0, item.clone());
        self.dirty = true;
        item
    }

    /// 批量新增, 保持输入顺序置于最前
    pub fn add_many(&mut self, news: Vec<NewCatalogItem>) -> Vec<CatalogItem> {
        let created: Vec<CatalogItem> = news.into_iter().map(CatalogItem::create).collect();
        if !created.is_empty() {
            let mut items = created.clone();
            items.append(&mut self.items);
            self.items = items;
            self.dirty = true;
        }
        created
    }

    pub fn update(&mut self, id: &str, new: NewCatalogItem) -> AppResult<CatalogItem> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("catalog item {}", id)))?;
        item.apply(new);
        self.dirty = true;
        Ok(item.clone())
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// 整体替换 (备份恢复)
    pub fn replace_all(&mut self, items: Vec<CatalogItem>) {
        self.items = items;
        self.dirty = true;
    }

    /// 写入磁盘: 先写临时文件再 rename
    pub async fn save(&mut self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = export::to_backup_json(&self.items)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = write_then_rename(&tmp, &self.path, body).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        self.dirty = false;
        tracing::debug!("Saved {} catalog items to {}", self.items.len(), self.path.display());
        Ok(())
    }

    /// 修改并落盘; 修改或写盘失败时内存恢复原状
    pub async fn commit<T>(&mut self, op: impl FnOnce(&mut Self) -> AppResult<T>) -> AppResult<T> {
        let before = self.items.clone();
        let was_dirty = self.dirty;

        let result = match op(self) {
            Ok(out) => self.save().await.map(|_| out),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.items = before;
            self.dirty = was_dirty;
        }
        result
    }
}

async fn write_then_rename(tmp: &Path, path: &Path, body: String) -> std::io::Result<()> {
    fs::write(tmp, body).await?;
    fs::rename(tmp, path).await
}
