/*!
 * Application controller orchestrating a full translation run.
 *
 * Resolves configuration into runtime settings, picks the file workflow from
 * the input extension (SRT subtitles or plain text lines), drives the session
 * scheduler with a progress bar and writes the merged output file.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::Config;
use crate::language_utils;
use crate::prompts;
use crate::providers::openai::OpenAI;
use crate::providers::ChatProvider;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::scheduler::{run_sessions, TranslationUnit, UnitResult};
use crate::translation::service::ServiceSettings;

/// Orchestrates a translation run end to end
#[derive(Debug)]
pub struct Controller {
    config: Config,
    provider: Arc<dyn ChatProvider>,
    settings: ServiceSettings,
}

impl Controller {
    /// Build a controller from a validated configuration.
    ///
    /// Configuration problems (missing API key, unknown language code, bad
    /// prompt file) are reported here, before any unit is touched.
    pub fn new(
        config: Config,
        system_prompt_file: Option<&Path>,
        additional_prompt: Option<String>,
    ) -> Result<Self> {
        config.validate()?;

        if config.translation.api_key.trim().is_empty() {
            return Err(anyhow!(
                "No API key configured. Set OPENAI_API_KEY or pass --api-key."
            ));
        }

        language_utils::validate_language_code(&config.target_language)?;

        if let Some(endpoint) = &config.translation.endpoint {
            url::Url::parse(endpoint)
                .with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;
        }

        let system_prompt = prompts::build_system_prompt(
            &config.target_language,
            system_prompt_file,
            additional_prompt.as_deref(),
        )?;
        let settings = ServiceSettings::from_config(&config, system_prompt, additional_prompt);

        let provider: Arc<dyn ChatProvider> = Arc::new(OpenAI::new(
            config.translation.api_key.clone(),
            config.translation.endpoint.clone(),
        ));

        Ok(Controller {
            config,
            provider,
            settings,
        })
    }

    /// Run the translation for one input file
    pub async fn run(&self, input: &Path, output: Option<PathBuf>) -> Result<()> {
        let output = output.unwrap_or_else(|| self.default_output_path(input));
        info!(
            "Translating {} to {} ({})",
            input.display(),
            language_utils::describe_language(&self.config.target_language),
            output.display()
        );

        self.provider
            .test_connection()
            .await
            .context("Provider connection test failed")?;

        let extension = input
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("srt") => self.translate_srt_file(input, &output).await,
            _ => self.translate_text_file(input, &output).await,
        }
    }

    /// Translate an SRT subtitle file, preserving sequence numbers and timing
    async fn translate_srt_file(&self, input: &Path, output: &Path) -> Result<()> {
        let collection = SubtitleCollection::parse_srt_file(input)?;
        let units: Vec<TranslationUnit> = collection
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| TranslationUnit::new(i + 1, entry.text.clone()))
            .collect();

        let results = self.translate_units(units).await?;

        let entries = collection
            .entries
            .iter()
            .zip(results.iter())
            .map(|(entry, result)| entry.with_text(result.text.clone()))
            .collect();
        let translated = SubtitleCollection::new(output.to_path_buf(), entries);
        translated.write_to_srt(output)?;

        self.report(&results, output);
        Ok(())
    }

    /// Translate a plain text file, one non-empty line per unit
    async fn translate_text_file(&self, input: &Path, output: &Path) -> Result<()> {
        let content = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read input file: {}", input.display()))?;

        let units: Vec<TranslationUnit> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| TranslationUnit::new(i + 1, line))
            .collect();

        if units.is_empty() {
            return Err(anyhow!(
                "No translatable lines found in {}",
                input.display()
            ));
        }

        let results = self.translate_units(units).await?;

        let mut body = String::new();
        for result in &results {
            body.push_str(&result.text);
            body.push('\n');
        }
        std::fs::write(output, body)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?;

        self.report(&results, output);
        Ok(())
    }

    /// Run the session scheduler over the units with a console progress bar
    async fn translate_units(&self, units: Vec<TranslationUnit>) -> Result<Vec<UnitResult>> {
        let total = units.len();
        let sessions = self.config.translation.sessions;
        info!("Processing {} units across {} sessions", total, sessions);

        let pb = progress_bar(total as u64);
        let bar = pb.clone();
        let results = run_sessions(
            self.provider.clone(),
            &self.settings,
            units,
            sessions,
            move |done, _total| bar.set_position(done as u64),
        )
        .await?;
        pb.finish_with_message("done");

        Ok(results)
    }

    /// Log the run summary
    fn report(&self, results: &[UnitResult], output: &Path) {
        let failed = results.iter().filter(|r| !r.translated).count();
        if failed > 0 {
            warn!(
                "{}/{} units kept their original text after permanent failures",
                failed,
                results.len()
            );
        }
        info!("Wrote {} units to {}", results.len(), output.display());
    }

    /// Default output path: `{stem}_{target_language}{extension}` next to the input
    fn default_output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let name = match input.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => format!("{}_{}.{}", stem, self.config.target_language, ext),
            None => format!("{}_{}", stem, self.config.target_language),
        };
        input.with_file_name(name)
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
