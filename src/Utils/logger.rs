use crate::error::{OutputError, TaskError};
use crate::numerical::sampler::PlotData;
use csv::Writer;
use log::{info, warn};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::path::Path;

/// loglevel names accepted in task files and on the command line
pub const LOG_LEVELS: [&str; 7] = ["off", "none", "error", "warn", "info", "debug", "trace"];

/// `None` means logging is switched off
pub fn parse_loglevel(level: &str) -> Result<Option<LevelFilter>, TaskError> {
    let filter = match level.trim().to_lowercase().as_str() {
        "off" | "none" => None,
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        other => {
            return Err(TaskError::InvalidValue {
                key: "loglevel".to_string(),
                reason: format!("'{}' is not one of {}", other, LOG_LEVELS.join(", ")),
            });
        }
    };
    Ok(filter)
}

/// Sets up the terminal logger and, if `log_file` is given, a second logger writing into it.
/// Returns `false` when logging stays off or a logger was already installed.
pub fn init_logger(level: &str, log_file: Option<&str>) -> Result<bool, TaskError> {
    let Some(filter) = parse_loglevel(level)? else {
        return Ok(false);
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| TaskError::Io {
            path: path.to_string(),
            source,
        })?;
        loggers.push(WriteLogger::new(filter, Config::default(), file));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            info!("\n \n Program started with loglevel: {}", filter);
            Ok(true)
        }
        Err(_) => {
            warn!("logger already initialized, keeping the existing one");
            Ok(false)
        }
    }
}

/// Writes the chart data as rows `series,x,y`: series `function` is the dense curve,
/// series `trapezoid` the integration grid with its values.
pub fn save_plot_data_to_csv<P: AsRef<Path>>(plot: &PlotData, path: P) -> Result<(), OutputError> {
    let file = File::create(path.as_ref())?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["series", "x", "y"])?;
    let series = [
        ("function", &plot.dense_x, &plot.dense_y),
        ("trapezoid", &plot.trapezoid_x, &plot.trapezoid_y),
    ];
    for (name, xs, ys) in series {
        for (x, y) in xs.iter().zip(ys.iter()) {
            writer.write_record([name.to_string(), x.to_string(), y.to_string()])?;
        }
    }
    writer.flush()?;
    info!("plot data saved to {}", path.as_ref().display());
    Ok(())
}
