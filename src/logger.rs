use chrono::Local;
use env_logger::fmt::Color;

use std::io::Write;

pub fn init_logger() {
    let mut bui = env_logger::builder();
    let bui = bui.format(|buf, record| {
        let dt = Local::now();

        let lvl = record.level();
        let targ = record.target();
        let msg = record.args();

        let mut level_style = buf.style();
        level_style
            .set_color(match record.level() {
                log::Level::Error => Color::Red,
                log::Level::Warn => Color::Yellow,
                log::Level::Info => Color::Green,
                log::Level::Debug => Color::Blue,
                log::Level::Trace => Color::Magenta,
            })
            .set_bold(true);

        let mut target_style = buf.style();
        target_style.set_color(Color::Rgb(128, 24, 60)).set_bold(true);

        writeln!(
            buf,
            "{} {} {}: {}",
            dt.format("%Y-%m-%d %H:%M:%S"),
            level_style.value(lvl),
            target_style.value(targ),
            msg
        )
    });

    if cfg!(debug_assertions) {
        bui.filter_level(log::LevelFilter::Debug).init();
    } else {
        bui.filter_level(log::LevelFilter::Info).init();
    }
}
