use log::LevelFilter;

pub fn setup() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message,
            ));
        })
        .level(LevelFilter::Info)
        .level_for("wgpu_core", LevelFilter::Warn)
        .level_for("wgpu_hal", LevelFilter::Warn)
        .level_for("naga", LevelFilter::Warn)
        .level_for("iced_wgpu", LevelFilter::Warn)
        .level_for("cosmic_text", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
