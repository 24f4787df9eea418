use blacklabel_engine::logging::{LoggingConfig, init_logging};
use blacklabel_page::Application;

fn main() {
    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║             EXOTIC  BLACK              ║");
    println!("  ║   Black Label  ·  luxury car rental    ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    init_logging(LoggingConfig::default());

    let mut app = Application::new()
        .title("EXOTIC BLACK · Black Label")
        .size(1280.0, 800.0)
        .page(include_str!("../ui/landing.blm"));

    match load_font() {
        Some(bytes) => app = app.font("body", bytes),
        None => log::warn!("no system font found; copy will not render"),
    }

    app.run();
}

fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
