//! 로그 포매터
//!
//! 운영 로그 한 줄 형식:
//! `2025-04-17T10:15:30.123,[Root=1-6800...                     ],[INFO ],메시지`
//!
//! 트레이스 ID는 요청마다 task-local로 보관되며, 요청 처리 중에 남긴 모든 로그에 붙습니다.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::future::Future;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

tokio::task_local! {
    static TRACE_ID: String;
}

/// 현재 요청의 트레이스 ID (요청 밖이면 빈 문자열)
pub fn current_trace_id() -> String {
    TRACE_ID.try_with(|id| id.clone()).unwrap_or_default()
}

/// 트레이스 ID를 설정한 상태로 future를 실행합니다.
pub async fn with_trace_id<F>(trace_id: String, fut: F) -> F::Output
where
    F: Future,
{
    TRACE_ID.scope(trace_id, fut).await
}

/// 로그 레벨 표시 (5자리 고정)
pub fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO ",
        Level::WARN => "WARN ",
        Level::ERROR => "ERROR",
    }
}

/// 오프셋을 더한 시각을 밀리초까지 출력합니다 (끝의 `Z` 없음).
pub fn format_timestamp(now: DateTime<Utc>, utc_offset_hours: i32) -> String {
    (now + Duration::hours(utc_offset_hours as i64))
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

/// 한 줄의 앞부분 (`시각,[트레이스 ID],[레벨],`)
pub fn format_prefix(
    now: DateTime<Utc>,
    utc_offset_hours: i32,
    trace_id: &str,
    trace_id_width: usize,
    level: &Level,
) -> String {
    format!(
        "{},[{:<width$}],[{}],",
        format_timestamp(now, utc_offset_hours),
        trace_id,
        level_label(level),
        width = trace_id_width
    )
}

/// tracing-subscriber용 이벤트 포매터
#[derive(Debug, Clone)]
pub struct JstFormatter {
    utc_offset_hours: i32,
    trace_id_width: usize,
}

impl JstFormatter {
    pub fn new(utc_offset_hours: i32, trace_id_width: usize) -> Self {
        Self {
            utc_offset_hours,
            trace_id_width,
        }
    }
}

impl Default for JstFormatter {
    fn default() -> Self {
        Self::new(9, 40)
    }
}

impl<S, N> FormatEvent<S, N> for JstFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let prefix = format_prefix(
            Utc::now(),
            self.utc_offset_hours,
            &current_trace_id(),
            self.trace_id_width,
            event.metadata().level(),
        );
        write!(writer, "{}", prefix)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_shifted_to_jst() {
        let now = Utc.with_ymd_and_hms(2025, 4, 17, 20, 0, 0).unwrap();
        assert_eq!(format_timestamp(now, 9), "2025-04-18T05:00:00.000");
    }

    #[test]
    fn test_prefix_pads_trace_id_and_level() {
        let now = Utc.with_ymd_and_hms(2025, 4, 17, 0, 0, 0).unwrap();
        let prefix = format_prefix(now, 0, "abc", 5, &Level::INFO);
        assert_eq!(prefix, "2025-04-17T00:00:00.000,[abc  ],[INFO ],");
    }

    #[tokio::test]
    async fn test_trace_id_scope() {
        assert_eq!(current_trace_id(), "");
        let inside = with_trace_id("Root=1-abc".to_string(), async { current_trace_id() }).await;
        assert_eq!(inside, "Root=1-abc");
        assert_eq!(current_trace_id(), "");
    }

    #[test]
    fn test_nested_trace_id_scope_restores_outer() {
        let (inner, outer) = tokio_test::block_on(with_trace_id("outer".to_string(), async {
            let inner = with_trace_id("inner".to_string(), async { current_trace_id() }).await;
            (inner, current_trace_id())
        }));
        assert_eq!(inner, "inner");
        assert_eq!(outer, "outer");
    }
}
