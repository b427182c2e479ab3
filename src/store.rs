//! 当前歌词文档的共享槽位。
//!
//! 解析在后台完成后整体替换，读取方只会看到旧文档或新文档，
//! 不会看到构建到一半的文档。

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::{
    config::ParsingOptions, error::LyricsError, model::LyricsDocument, parser::parse_ttml,
};

/// 可在多个线程间克隆共享的歌词槽位。克隆得到的句柄指向同一个槽位。
#[derive(Debug, Clone, Default)]
pub struct LyricsSlot {
    current: Arc<RwLock<Option<Arc<LyricsDocument>>>>,
}

impl LyricsSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换为新文档，返回被替换的旧文档。
    pub fn publish(&self, document: LyricsDocument) -> Option<Arc<LyricsDocument>> {
        self.current.write().replace(Arc::new(document))
    }

    pub fn clear(&self) -> Option<Arc<LyricsDocument>> {
        self.current.write().take()
    }

    /// 当前文档的快照。持有快照期间槽位可以被替换，快照本身不受影响。
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<LyricsDocument>> {
        self.current.read().clone()
    }

    /// 解析并发布新文档。解析失败时清空槽位，宿主应当显示“无歌词”。
    pub fn load(
        &self,
        content: &str,
        options: &ParsingOptions,
    ) -> Result<Arc<LyricsDocument>, LyricsError> {
        match parse_ttml(content, options) {
            Ok(document) => {
                let document = Arc::new(document);
                *self.current.write() = Some(Arc::clone(&document));
                info!("已发布新的歌词文档，共 {} 行", document.len());
                Ok(document)
            }
            Err(err) => {
                warn!("歌词解析失败，已清空当前歌词: {err}");
                self.clear();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const ONE_LINE: &str = r#"<tt><body><p begin="0" end="1">one</p></body></tt>"#;
    const TWO_LINES: &str =
        r#"<tt><body><p begin="0" end="1">one</p><p begin="1" end="2">two</p></body></tt>"#;

    #[test]
    fn test_load_publishes_and_failure_clears() {
        let slot = LyricsSlot::new();
        assert!(slot.snapshot().is_none());

        let loaded = slot.load(ONE_LINE, &ParsingOptions::default()).unwrap();
        assert_eq!(slot.snapshot().unwrap().len(), 1);
        assert!(Arc::ptr_eq(&loaded, &slot.snapshot().unwrap()));

        let err = slot
            .load("<tt><head/></tt>", &ParsingOptions::default())
            .unwrap_err();
        assert_eq!(err, LyricsError::BodyNotFound);
        assert!(slot.snapshot().is_none());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let slot = LyricsSlot::new();
        slot.load(ONE_LINE, &ParsingOptions::default()).unwrap();
        let old = slot.snapshot().unwrap();

        let replaced = slot.publish(LyricsDocument::default());
        assert!(replaced.is_some_and(|doc| Arc::ptr_eq(&doc, &old)));
        assert_eq!(old.len(), 1);
        assert!(slot.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_readers_see_complete_documents() {
        let slot = LyricsSlot::new();
        slot.load(ONE_LINE, &ParsingOptions::default()).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let slot = slot.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let len = slot.snapshot().map_or(0, |doc| doc.len());
                        assert!(len == 1 || len == 2);
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let content = if i % 2 == 0 { TWO_LINES } else { ONE_LINE };
            slot.load(content, &ParsingOptions::default()).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
