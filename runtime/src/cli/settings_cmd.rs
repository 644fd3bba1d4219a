//! `toploader settings`: show the effective loader settings.

use crate::cli::output::{self, Styled};
use crate::settings::Settings;
use anyhow::Result;
use std::path::Path;

/// Print the settings as loaded, after defaults and clamping.
pub fn run(settings: &Settings, source: Option<&Path>) -> Result<()> {
    if output::is_json() {
        return output::print_json(settings);
    }
    if output::is_quiet() {
        return Ok(());
    }

    let s = Styled::new();
    output::print_header(&s);
    output::print_section(&s, "Settings");
    let source = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| s.dim("(defaults)"));
    println!("    {:<22} {}", "Source", source);

    let rows = [
        ("color", settings.color.clone()),
        ("initialPosition", settings.initial_position.to_string()),
        ("height", settings.height.to_string()),
        ("easing", settings.easing.clone()),
        ("speed", format!("{}ms", settings.speed)),
        ("zIndex", settings.z_index.to_string()),
        (
            "boxShadow",
            settings
                .box_shadow
                .clone()
                .unwrap_or_else(|| s.dim("(none)")),
        ),
        ("showSpinner", settings.show_spinner.to_string()),
        ("dir", format!("{:?}", settings.dir).to_lowercase()),
        ("ignoreSearchParams", settings.ignore_search_params.to_string()),
    ];
    for (name, value) in rows {
        println!("    {:<22} {}", name, s.cyan(&value));
    }
    Ok(())
}
