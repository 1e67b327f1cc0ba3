use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Enable raw mode and install a panic hook that puts the terminal back
/// before the default hook prints anything.
pub fn setup() -> anyhow::Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    Ok(())
}

pub fn restore() -> anyhow::Result<()> {
    disable_raw_mode()?;
    Ok(())
}
