//! Общие константы хранилища (ветки, служебные каталоги, стриминг, HTTP).

// -------- Refs --------
/// Ветка по умолчанию. Существует всю жизнь репозитория; подставляется,
/// когда запрос не указывает commit/branch явно.
pub const DEFAULT_BRANCH: &str = "master";

// -------- Internal entries --------
// Записи верхнего уровня с точкой в начале имени — служебные:
// они не попадают в листинги и запрещены как имена веток.
pub const LOCKS_DIR: &str = ".locks";
pub const TMP_DIR: &str = ".tmp";
pub const LOCK_EXT: &str = "lock";

// -------- Streaming --------
/// Размер чанка по умолчанию (64 KiB). Переопределяется ARBOR_CHUNK_SIZE.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

// -------- Listings --------
/// Разделитель между именем и временем в текстовых листингах.
pub const LISTING_SEP: &str = "    ";

// -------- HTTP --------
pub const DEFAULT_LISTEN: &str = "0.0.0.0:9080";
