//! Мелкие утилиты (временные метки листингов, fsync каталога).

use chrono::{DateTime, Local};
use std::path::Path;
use std::time::SystemTime;

/// Формат времени в листингах: `YYYY-MM-DDTHH:MM:SS.ffffff±HH:MM`
/// (локальный часовой пояс, ровно шесть знаков микросекунд).
pub fn format_entry_time(t: SystemTime) -> String {
    let dt: DateTime<Local> = t.into();
    dt.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
}

/// fsync каталога после rename (публикация снапшота/форка).
/// На не-Unix платформах — no-op.
#[cfg(unix)]
pub fn fsync_dir(dir: &Path) -> std::io::Result<()> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub fn fsync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
