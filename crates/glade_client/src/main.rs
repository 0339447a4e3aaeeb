mod app;
mod camera;
mod input;
mod renderer;
mod scene;
mod settings;
mod ui;

fn main() {
    app::run();
}
