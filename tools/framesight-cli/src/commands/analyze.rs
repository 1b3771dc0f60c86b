//! Analyze image files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;

use framesight_common::config::AppConfig;
use framesight_engine::export::{default_export_file_name, export_cache, export_result, to_json};
use framesight_engine::{AnalysisEngine, ImageFileSource};
use framesight_frame_model::{AnalysisResult, Priority};
use framesight_insight::LocalSummaryInsight;

pub struct AnalyzeArgs {
    pub images: Vec<PathBuf>,
    pub export: Option<PathBuf>,
    pub json: bool,
    pub grid_size: Option<usize>,
    pub stride: Option<usize>,
    pub no_cache: bool,
    pub offline_insight: bool,
    pub min_priority: PriorityArg,
}

/// Priority threshold for the printed summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

pub async fn run(mut config: AppConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    if let Some(grid_size) = args.grid_size {
        config.analysis.grid_size = grid_size;
    }
    if let Some(stride) = args.stride {
        config.analysis.color_sample_stride = stride;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let mut engine = AnalysisEngine::new(&config)
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    if args.offline_insight {
        engine = engine.with_insight_generator(Arc::new(LocalSummaryInsight::new()));
    }

    let mut failures = 0usize;
    for path in &args.images {
        let source = ImageFileSource::new(path);
        let result = match engine.analyze_from(&source).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Analysis failed");
                eprintln!("{}: {e}", path.display());
                failures += 1;
                continue;
            }
        };

        if args.json {
            println!("{}", to_json(&result)?);
        } else {
            print!("{}", format_summary(path, &result, args.min_priority.into()));
        }

        if let Some(dir) = &args.export {
            let out = dir.join(default_export_file_name(&result));
            export_result(&result, &out)
                .map_err(|e| anyhow::anyhow!("Failed to export {}: {e}", path.display()))?;
            if !args.json {
                println!("  Exported: {}", out.display());
            }
        }
    }

    if let Some(dir) = &args.export {
        if config.cache.enabled && engine.cache_len() > 0 {
            export_cache(&engine.cached_entries(), &dir.join("cache.json"))
                .map_err(|e| anyhow::anyhow!("Failed to export cache: {e}"))?;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} images failed", args.images.len());
    }
    Ok(())
}

fn format_summary(path: &Path, result: &AnalysisResult, min_priority: Priority) -> String {
    let f = &result.features;
    let mut out = String::new();

    let _ = writeln!(out, "{}", path.display());
    let _ = writeln!(
        out,
        "  Frame: {}x{}{}",
        result.frame.width,
        result.frame.height,
        if result.cache_hit { " (cached)" } else { "" }
    );
    let _ = writeln!(
        out,
        "  Composition: thirds {:.2}, imbalance {:.2}",
        f.composition.rule_of_thirds_score, f.composition.balance_horizontal
    );

    let palette = f
        .colors
        .palette
        .iter()
        .take(4)
        .map(|entry| format!("{} {:.0}%", entry.rgb.hex(), entry.percentage * 100.0))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        out,
        "  Color: contrast {:.2}, saturation {:.2} [{}]",
        f.colors.contrast, f.colors.saturation, palette
    );
    let _ = writeln!(
        out,
        "  Elements: edges {:.1}%{}{}",
        f.elements.edge_density,
        if f.elements.shapes_detected { ", shapes" } else { "" },
        if f.elements.text_detected { ", text" } else { "" }
    );
    let _ = writeln!(
        out,
        "  Effects: blur {:.3}, noise {:.2}, vignette {:.2}",
        f.effects.blur_strength, f.effects.noise_strength, f.effects.vignette_strength
    );

    if let Some(insight) = &result.insight {
        let _ = writeln!(out, "  Insight: {insight}");
    }

    let shown: Vec<_> = result.recommendations_at_least(min_priority).collect();
    if shown.is_empty() {
        let _ = writeln!(out, "  No recommendations");
    } else {
        let high = result.recommendations_at_least(Priority::High).count();
        let _ = writeln!(out, "  Recommendations ({high} high priority):");
        for rec in shown {
            let _ = writeln!(
                out,
                "    [{:?}] {}: {}",
                rec.priority, rec.message, rec.suggested_action
            );
        }
    }
    out.push('\n');
    out
}
