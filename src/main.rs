mod config;
mod core;
mod domain;
mod layout;
mod navigation;
mod overlays;
mod render;
mod scene;
mod session;
mod zoom;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    core::app::run()
}
