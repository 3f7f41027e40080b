use crate::adapters::{LocalStorage, ManualScheduler};
use crate::app::frame_loop::FrameLoop;
use crate::config::{AppConfig, CleanArgs};
use crate::core::count_up::CountUp;
use crate::core::engine::CleanupEngine;
use crate::core::normalizer::TextNormalizer;
use crate::core::pipeline::BenefitCleanupPipeline;
use crate::core::Pipeline;
use crate::utils::error::Result;
use serde_json::Value;
use std::io::Write;

/// `clean`: one cleaned line per input value.
pub fn run_clean<W: Write>(
    args: &CleanArgs,
    config: &AppConfig,
    inputs: &[String],
    out: &mut W,
) -> Result<()> {
    let normalizer = TextNormalizer::new(config.normalizer.max_iterations);

    for input in inputs {
        let value = if args.json {
            // 不是合法 JSON 時當作一般字串處理
            serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.clone()))
        } else {
            Value::String(input.clone())
        };

        let normalized = normalizer.clean_with_report(&value);
        if args.report {
            writeln!(
                out,
                "{}\t(passes={}, converged={})",
                normalized.text, normalized.passes, normalized.converged
            )?;
        } else {
            writeln!(out, "{}", normalized.text)?;
        }
    }

    Ok(())
}

/// `count-up`: redraws the value in place on every render.
pub async fn run_count_up<W: Write>(target: f64, config: &AppConfig, out: &mut W) -> Result<()> {
    let mut count_up = CountUp::new(target, config.count_up_options(), ManualScheduler::new())
        .with_formatter(config.count_up.format.formatter());

    write!(out, "\r{}", count_up.state().display_value)?;
    out.flush()?;

    let mut write_error = None;
    FrameLoop::from_millis(config.count_up.frame_interval_ms)
        .run(&mut count_up, |state| {
            let written = write!(out, "\r{}", state.display_value).and_then(|_| out.flush());
            if let Err(e) = written {
                write_error.get_or_insert(e);
            }
        })
        .await;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    writeln!(out)?;
    Ok(())
}

/// `cleanup`: runs the benefit cleanup pipeline, or only extract and
/// transform when `dry_run` is set.
pub async fn run_cleanup(config: AppConfig, dry_run: bool) -> Result<Vec<String>> {
    config.validate_cleanup()?;

    let storage = LocalStorage::new(".");
    let pipeline = BenefitCleanupPipeline::new(storage, config);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no output files will be written");
        let records = pipeline.extract().await?;
        let result = pipeline.transform(records).await?;
        tracing::info!(
            "Would clean {} fields across {} of {} records",
            result.changed_fields,
            result.changed_records,
            result.records.len()
        );
        return Ok(Vec::new());
    }

    CleanupEngine::new(pipeline).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_args(json: bool, report: bool) -> CleanArgs {
        CleanArgs {
            values: vec![],
            json,
            max_iterations: None,
            report,
        }
    }

    #[test]
    fn test_run_clean_plain_strings() {
        let inputs = vec!["\"hello\"".to_string(), "  spaced   out ".to_string()];
        let mut out = Vec::new();

        run_clean(&clean_args(false, false), &AppConfig::default(), &inputs, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "hello\nspaced out\n");
    }

    #[test]
    fn test_run_clean_json_values() {
        let inputs = vec![
            r#"{"text": "abc"}"#.to_string(),
            "null".to_string(),
            "not json [".to_string(),
        ];
        let mut out = Vec::new();

        run_clean(&clean_args(true, false), &AppConfig::default(), &inputs, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "abc\n\nnot json\n");
    }

    #[test]
    fn test_run_clean_report() {
        let inputs = vec!["plain".to_string()];
        let mut out = Vec::new();

        run_clean(&clean_args(false, true), &AppConfig::default(), &inputs, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "plain\t(passes=1, converged=true)\n"
        );
    }

    #[tokio::test]
    async fn test_run_count_up_without_animation() {
        let mut config = AppConfig::default();
        config.count_up.enabled = false;
        config.count_up.format = crate::core::format::NumberFormat::Indian;
        let mut out = Vec::new();

        run_count_up(1234567.0, &config, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "\r12,34,567\n");
    }

    #[tokio::test]
    async fn test_run_count_up_ends_on_target() {
        let mut config = AppConfig::default();
        config.count_up.duration_ms = 30.0;
        config.count_up.frame_interval_ms = 2;
        let mut out = Vec::new();

        run_count_up(500.0, &config, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\r0"));
        assert!(text.ends_with("\r500\n"));
    }

    #[tokio::test]
    async fn test_run_cleanup_requires_source() {
        let err = run_cleanup(AppConfig::default(), true).await.unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::KitError::MissingConfigError { .. }
        ));
    }
}
