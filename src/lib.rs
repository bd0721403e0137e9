pub mod db;
pub mod export;
pub mod service;
pub mod settings;
pub mod timer;
pub mod utils;

pub use db::Store;
pub use service::Service;
pub use timer::{TimerEngine, TimerEvent};
