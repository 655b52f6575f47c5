// 歌词解析核心库

// 模块导出
pub mod app;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod utils;
