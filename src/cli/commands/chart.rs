use std::{fs, path::PathBuf};

use jar_core::{api_ring_chart, format_number, ArcGeometryRenderer};

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const EXPORT_FLAG: &str = "--export";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "chart",
        "List the ring chart arcs, or write them as SVG",
        "chart [file.svg|--export]",
        cmd_chart,
    )]
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let settings = &context.config.chart;
    let chart = api_ring_chart(&context.store, &settings.colors, settings.geometry());

    let target = match args.first() {
        None => None,
        Some(&EXPORT_FLAG) => {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            Some(
                context
                    .config
                    .resolve_default_export_root(&crate::config::base_dir())
                    .join(format!("jar-chart_{stamp}.svg")),
            )
        }
        Some(path) => Some(PathBuf::from(path)),
    };

    let Some(path) = target else {
        output::section(format!("Ring chart ({} arcs)", chart.arcs.len()));
        for arc in &chart.arcs {
            let label = context
                .store
                .jars()
                .get(arc.segment_index)
                .map(|jar| jar.label.as_str())
                .unwrap_or("?");
            output::line(format!(
                "  {:<14} {:>8} -> {:>8}  {}",
                label,
                format_number(arc.start_angle),
                format_number(arc.end_angle),
                arc.color
            ));
        }
        if chart.is_empty() {
            output::info("Nothing allocated yet; only the background ring is drawn.");
        }
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let svg = ArcGeometryRenderer::render_svg(&chart, &settings.background_color);
    fs::write(&path, svg)?;
    tracing::debug!(path = %path.display(), arcs = chart.arcs.len(), "chart written");
    output::success(format!("Chart written to {}.", path.display()));
    Ok(())
}
