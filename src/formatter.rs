//! Log formatting that stamps every event with the simulation tick it happened on.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Ticks simulated so far, shared with the formatter.
static TICK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The tick is shown as four hex digits.
const TICK_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:4]");

/// Advances the tick shown in log lines. Called once per session tick.
pub fn increment_tick() {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed);
}

pub fn get_tick_count() -> u64 {
    TICK_COUNTER.load(Ordering::Relaxed)
}

#[derive(Clone, Copy)]
enum Style {
    Dim,
    Bold,
    Color(&'static str),
}

impl Style {
    fn paint(self, writer: &mut Writer<'_>, value: impl fmt::Display) -> fmt::Result {
        if !writer.has_ansi_escapes() {
            return write!(writer, "{}", value);
        }
        let code = match self {
            Style::Dim => "\x1b[2m",
            Style::Bold => "\x1b[1m",
            Style::Color(code) => code,
        };
        write!(writer, "{}{}\x1b[0m", code, value)
    }
}

fn level_style(level: &Level) -> (Style, &'static str) {
    match *level {
        Level::TRACE => (Style::Color("\x1b[35m"), "TRACE"),
        Level::DEBUG => (Style::Color("\x1b[34m"), "DEBUG"),
        Level::INFO => (Style::Color("\x1b[32m"), " INFO"),
        Level::WARN => (Style::Color("\x1b[33m"), " WARN"),
        Level::ERROR => (Style::Color("\x1b[31m"), "ERROR"),
    }
}

/// `HH:MM:SS.ssss 0xTICK LEVEL span{fields}: target: message fields`
#[derive(Debug, Clone, Copy)]
pub struct TickFormatter {
    pub show_target: bool,
}

impl Default for TickFormatter {
    fn default() -> Self {
        Self { show_target: true }
    }
}

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        Style::Dim.paint(&mut writer, timestamp)?;
        writer.write_char(' ')?;
        Style::Dim.paint(&mut writer, format_args!("0x{:04X}", get_tick_count() & TICK_DISPLAY_MASK))?;
        writer.write_char(' ')?;

        let (style, label) = level_style(meta.level());
        style.paint(&mut writer, label)?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                Style::Bold.paint(&mut writer, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|fields| !fields.is_empty()) {
                    Style::Bold.paint(&mut writer, "{")?;
                    write!(writer, "{}", fields)?;
                    Style::Bold.paint(&mut writer, "}")?;
                }
                Style::Dim.paint(&mut writer, ":")?;
                writer.write_char(' ')?;
            }
        }

        if self.show_target {
            Style::Dim.paint(&mut writer, format_args!("{}:", meta.target()))?;
            writer.write_char(' ')?;
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
