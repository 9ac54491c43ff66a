//! File logging setup.
//!
//! The terminal itself is the UI, so nothing may be written to stdout or
//! stderr once the alternate screen is active; all diagnostics go to a log
//! file instead.

use std::fs;
use std::path::Path;

use anyhow::Result;
use log::LevelFilter;

/// Install the global logger, writing to `path`.
///
/// Our own records are kept at debug level; dependencies are capped at
/// warn to keep the file readable.
pub fn init(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("newsdeck", LevelFilter::Debug)
        .chain(fern::log_file(path)?)
        .apply()?;

    Ok(())
}
