mod detail;
mod text;
mod time;

pub(crate) use detail::MemoDetail;
pub(crate) use text::format_memo_line;
pub(crate) use time::format_display_time;
