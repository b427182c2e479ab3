use thiserror::Error;

/// 歌词解析过程中可能发生的错误。
///
/// 前三种是结构性错误，会让整次解析失败，调用方应当回退到“无歌词”状态。
/// 节点级别的问题（时间戳格式错误、未知的角色标记等）不会以错误的形式返回，
/// 只会记录日志并降级为“缺失”。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LyricsError {
    /// 输入文本无法构建出任何 XML 元素树。
    #[error("未找到有效的 TTML 文档: {0}")]
    DocumentNotFound(String),
    /// 文档中没有 `<body>` 元素。
    #[error("TTML 文档中缺少 <body> 元素")]
    BodyNotFound,
    /// 文档结构完整，但没有产生任何歌词行。
    #[error("TTML 文档中没有任何有效的歌词行")]
    EmptyResult,
    /// 无效的时间戳字符串。
    #[error("无效的时间格式: {0}")]
    InvalidTime(String),
}

impl LyricsError {
    /// 是否为让整次解析失败的结构性错误。
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound(_) | Self::BodyNotFound | Self::EmptyResult
        )
    }
}
