//! 解析后的歌词组后处理：先重建空格，再分析长元音。

pub mod spacing;
pub mod vowel;
