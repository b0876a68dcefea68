mod app;
mod canvas;
mod config;
mod dom;
mod logging;
mod state;

pub use app::run;
pub use canvas::CanvasSurface;
