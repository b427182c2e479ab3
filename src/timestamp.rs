//! # 时间戳编解码
//!
//! 唯一了解 TTML 时间戳文本语法的地方。支持：
//!
//! - 时钟格式：`SS.fff`、`MM:SS.fff`、`HH:MM:SS.fff`
//! - 偏移格式：`12.345s`、`500ms`
//!
//! 解析结果统一为以秒为单位的 `f64`。

use crate::error::LyricsError;

/// 可输出的时间戳文本格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `12.345s`
    Seconds,
    /// `MM:SS.fff`，分钟部分不设上限。
    MinutesSeconds,
    /// `HH:MM:SS.fff`
    HoursMinutesSeconds,
}

/// 宽松解码：空字符串或格式错误时返回 `None`。
///
/// 元素上缺少时间戳是正常现象（例如装饰性的 span），因此这里不返回错误。
#[must_use]
pub fn decode(text: &str) -> Option<f64> {
    parse_timestamp(text).ok()
}

/// 严格解析 TTML 时间字符串到秒。
pub fn parse_timestamp(time_str: &str) -> Result<f64, LyricsError> {
    let time_str = time_str.trim();
    if time_str.is_empty() {
        return Err(LyricsError::InvalidTime("时间戳为空".to_string()));
    }
    if time_str.starts_with('-') {
        return Err(LyricsError::InvalidTime(format!(
            "时间戳不能为负: '{time_str}'"
        )));
    }

    // 格式："500ms"
    if let Some(stripped) = time_str.strip_suffix("ms") {
        return parse_seconds_part(stripped, time_str).map(|ms| ms / 1000.0);
    }

    // 格式："12.345s"
    if let Some(stripped) = time_str.strip_suffix('s') {
        return parse_seconds_part(stripped, time_str);
    }

    // 格式："HH:MM:SS.fff", "MM:SS.fff", "SS.fff"
    // 从后往前解析
    let mut parts_iter = time_str.split(':').rev();
    let part_count = time_str.split(':').count();
    if part_count > 3 {
        return Err(LyricsError::InvalidTime(format!(
            "时间格式 '{time_str}' 包含过多部分，格式无效。"
        )));
    }

    let seconds_str = parts_iter.next().unwrap_or_default();
    let seconds = parse_seconds_part(seconds_str, time_str)?;
    // 只有单独的 "SS.fff" 格式允许秒数大于 59
    if part_count > 1 && seconds >= 60.0 {
        return Err(LyricsError::InvalidTime(format!(
            "秒值 '{seconds_str}' (应 < 60) 在时间戳 '{time_str}' 中无效"
        )));
    }
    let mut total = seconds;

    if let Some(minutes_str) = parts_iter.next() {
        let minutes = parse_integer_part(minutes_str, time_str)?;
        // 最前面的分量不设上限，例如 "75:00.000"
        if part_count == 3 && minutes >= 60 {
            return Err(LyricsError::InvalidTime(format!(
                "分钟值 '{minutes}' (应 < 60) 在时间戳 '{time_str}' 中无效"
            )));
        }
        total += minutes as f64 * 60.0;
    }

    if let Some(hours_str) = parts_iter.next() {
        let hours = parse_integer_part(hours_str, time_str)?;
        total += hours as f64 * 3600.0;
    }

    Ok(total)
}

/// 把秒格式化为指定的时间戳文本，精确到毫秒。
#[must_use]
pub fn format(seconds: f64, format: TimestampFormat) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;

    match format {
        TimestampFormat::Seconds => format!("{total_secs}.{ms:03}s"),
        TimestampFormat::MinutesSeconds => {
            format!("{:02}:{:02}.{ms:03}", total_secs / 60, total_secs % 60)
        }
        TimestampFormat::HoursMinutesSeconds => format!(
            "{:02}:{:02}:{:02}.{ms:03}",
            total_secs / 3600,
            (total_secs % 3600) / 60,
            total_secs % 60
        ),
    }
}

/// 解析 "SS.fff" 或 "SS" 格式的字符串。小数部分位数不限。
fn parse_seconds_part(part: &str, original_time_str: &str) -> Result<f64, LyricsError> {
    let mut dot_parts = part.splitn(2, '.');
    let whole_str = dot_parts.next().unwrap_or_default();

    if whole_str.is_empty() {
        // 例如 ".5s" 或 "MM:.5"
        return Err(LyricsError::InvalidTime(format!(
            "时间格式 '{original_time_str}' 的秒部分为空"
        )));
    }
    let whole = parse_integer_part(whole_str, original_time_str)?;

    let fraction = match dot_parts.next() {
        Some(fraction_str) => {
            if fraction_str.is_empty() || !fraction_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(LyricsError::InvalidTime(format!(
                    "小数部分 '{fraction_str}' 在时间戳 '{original_time_str}' 中无效"
                )));
            }
            format!("0.{fraction_str}").parse::<f64>().map_err(|e| {
                LyricsError::InvalidTime(format!(
                    "无法解析时间戳 '{original_time_str}' 中的小数部分 '{fraction_str}': {e}"
                ))
            })?
        }
        None => 0.0,
    };

    Ok(whole as f64 + fraction)
}

fn parse_integer_part(part: &str, original_time_str: &str) -> Result<u64, LyricsError> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(LyricsError::InvalidTime(format!(
            "在时间戳 '{original_time_str}' 中解析 '{part}' 失败"
        )));
    }
    part.parse::<u64>().map_err(|e| {
        LyricsError::InvalidTime(format!(
            "在时间戳 '{original_time_str}' 中解析 '{part}' 失败: {e}"
        ))
    })
}
