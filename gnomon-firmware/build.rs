//! Build script for gnomon-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml and turns it into compiled-in defaults

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    generate_display_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of display.toml
struct DisplayToml {
    splash_timeout_s: i64,
    idle_refresh_s: i64,
    layout: &'static str,
    invert: bool,
    show_seconds: bool,
    time_format: &'static str,
    date_format: &'static str,
}

/// Validate display.toml and write `display_config.rs` into OUT_DIR
fn generate_display_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the gnomon-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let display = validate(&config);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("display_config.rs")).unwrap();
    f.write_all(render(&display).as_bytes()).unwrap();

    println!("cargo:warning=display.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every section and field, collecting all errors before failing
fn validate(config: &toml::Value) -> DisplayToml {
    let mut errors = Vec::new();

    let display = section(config, "display", &mut errors);
    let idle = section(config, "idle", &mut errors);

    let splash_timeout_s = integer(display, "display", "splash_timeout_s", 1..=60, &mut errors);
    let idle_refresh_s = integer(display, "display", "idle_refresh_s", 1..=3600, &mut errors);

    let layout = choice(
        idle,
        "idle",
        "layout",
        &["watch_top", "phone_top"],
        &mut errors,
    );
    let invert = boolean(idle, "idle", "invert", &mut errors);
    let show_seconds = boolean(idle, "idle", "show_seconds", &mut errors);
    let time_format = choice(idle, "idle", "time_format", &["12h", "24h"], &mut errors);
    let date_format = choice(
        idle,
        "idle",
        "date_format",
        &["month_first", "day_first"],
        &mut errors,
    );

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid display configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    DisplayToml {
        splash_timeout_s,
        idle_refresh_s,
        layout,
        invert,
        show_seconds,
        time_format,
        date_format,
    }
}

fn section<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

fn integer(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let Some(table) = table else {
        return *range.start();
    };
    match table.get(key) {
        Some(toml::Value::Integer(v)) if range.contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            *range.start()
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            *range.start()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            *range.start()
        }
    }
}

fn boolean(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> bool {
    let Some(table) = table else {
        return false;
    };
    match table.get(key) {
        Some(toml::Value::Boolean(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            false
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            false
        }
    }
}

fn choice(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    allowed: &[&'static str],
    errors: &mut Vec<String>,
) -> &'static str {
    let fallback = allowed[0];
    let Some(table) = table else {
        return fallback;
    };
    match table.get(key) {
        Some(toml::Value::String(v)) => match allowed.iter().find(|a| **a == v.as_str()) {
            Some(a) => *a,
            None => {
                errors.push(format!(
                    "[{}] {} must be one of: {}",
                    section,
                    key,
                    allowed.join(", ")
                ));
                fallback
            }
        },
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            fallback
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            fallback
        }
    }
}

/// Rust source for the validated configuration
fn render(display: &DisplayToml) -> String {
    let layout = match display.layout {
        "phone_top" => "PhoneControlsTop",
        _ => "WatchControlsTop",
    };
    let time_format = match display.time_format {
        "24h" => "Hour24",
        _ => "Hour12",
    };
    let date_format = match display.date_format {
        "day_first" => "DayFirst",
        _ => "MonthFirst",
    };

    format!(
        "// Generated from display.toml by build.rs\n\
         pub const SPLASH_TIMEOUT_S: u16 = {};\n\
         pub const IDLE_REFRESH_S: u16 = {};\n\
         pub const IDLE_LAYOUT: gnomon_core::config::IdleLayout = gnomon_core::config::IdleLayout::{};\n\
         pub const IDLE_INVERT: bool = {};\n\
         pub const IDLE_SHOW_SECONDS: bool = {};\n\
         pub const IDLE_TIME_FORMAT: gnomon_core::config::TimeFormat = gnomon_core::config::TimeFormat::{};\n\
         pub const IDLE_DATE_FORMAT: gnomon_core::config::DateFormat = gnomon_core::config::DateFormat::{};\n",
        display.splash_timeout_s,
        display.idle_refresh_s,
        layout,
        display.invert,
        display.show_seconds,
        time_format,
        date_format,
    )
}
