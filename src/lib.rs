#![allow(non_snake_case)]

//! ArborFS — path-addressable, version-controlled byte store.
//!
//! Клиенты пишут файлы в именованную изменяемую ветку и периодически
//! замораживают её состояние в неизменяемый коммит с уникальным id,
//! который можно читать бесконечно и использовать как источник новых веток.

// Базовые модули
pub mod consts;
pub mod errors;
pub mod util;
pub mod metrics;
pub mod config;

// Идентификаторы коммитов (uuid v4 + проверка формы)
pub mod ident;

// Шов к снапшот-примитиву
pub mod vfs; // src/vfs/{mod,local}.rs

// Ядро: резолвер путей, версии, блобы, стриминг
pub mod resolve;
pub mod repo;
pub mod blob;
pub mod stream;

// Пер-веточные блокировки (opt-in, config.branch_locks)
pub mod lock;

// HTTP-поверхность
pub mod server; // src/server/{mod,handlers,params}.rs

// Удобные реэкспорты
pub use config::ArborConfig;
pub use errors::{Result, StoreError};
pub use repo::{RefEntry, Repository};
pub use resolve::{RefScope, Resolved};
pub use vfs::{LocalVfs, Vfs};
