mod app;

pub use app::Application;
