pub mod app;
pub mod config;
pub mod effects;
pub mod media;
pub mod render;
pub mod reveal;
pub mod scene;
pub mod terminal;
pub mod textfx;
pub mod timeline;
pub mod title;
