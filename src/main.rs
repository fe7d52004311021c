use glade::{app, demo::DemoScene};

fn main() {
    if let Err(e) = app::run::<DemoScene>() {
        log::error!("{e:#}");
        eprintln!("glade: {e:#}");
        std::process::exit(1);
    }
}
