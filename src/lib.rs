pub mod app;
pub mod config;
pub mod decor;
pub mod embed;
pub mod logging;
pub mod paint;
pub mod playback;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod terminal;
pub mod timeline;
pub mod tracks;
pub mod turntable;
