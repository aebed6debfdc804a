//! Command execution.
//!
//! Every subcommand runs against a [`Runner`] that owns the settings
//! session, the optional reload trigger and the URL probe. Command output
//! goes to a caller-supplied writer; diagnostics go through `tracing`.

use std::future::Future;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tokio::sync::mpsc;

use seerr_settings::config::{
    Command, ConfigError, FilterCommand, PresetCommand, SaveArgs, ValidatedConfig,
    write_default_config,
};
use seerr_settings::editor::{IgnoreReason, Outcome, PriorityListEditor};
use seerr_settings::env::{EnvChange, EnvStore, EnvVars, FileEnvStore, audit, diff, keys};
use seerr_settings::filter::{self, find_preset_for_pattern, match_sequence_to_preset_name};
use seerr_settings::preset::{self, FilePresetStore, Preset, PresetStore};
use seerr_settings::schedule::RefreshTask;
use seerr_settings::service::{
    HttpClient, HttpError, HttpReloadTrigger, ProbeOutcome, ReloadError, ReloadReport,
    ReloadTrigger, ReqwestClient, UrlProbe,
};
use seerr_settings::session::{FilterSnapshot, SessionError, SettingsSession};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Variables `check` probes as URLs.
const URL_KEYS: [&str; 1] = [keys::OVERSEERR_BASE];

/// Error type for command failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration was incomplete for this command.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading or writing settings failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The service could not be told to reload.
    #[error("Reload failed: {0}")]
    Reload(#[from] ReloadError),

    /// The reload endpoint could not be derived from the service URL.
    #[error("Invalid service URL: {0}")]
    ServiceUrl(#[source] HttpError),

    /// Writing command output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// A 1-based position does not exist in the list.
    #[error("No pattern at position {position} (the list has {len})")]
    PositionOutOfRange {
        /// Requested position, 1-based
        position: usize,
        /// Length of the list
        len: usize,
    },

    /// A move would go past the top or bottom of the list.
    #[error("Pattern {position} cannot move further in that direction")]
    AtBoundary {
        /// Requested position, 1-based
        position: usize,
    },

    /// The editor refused the edit for another reason.
    #[error("Edit not applied: {0:?}")]
    EditIgnored(IgnoreReason),

    /// No preset has this name or id.
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    /// The variable to probe is not set.
    #[error("Variable {0} is not set")]
    UnknownVariable(String),

    /// The result has problems and `--force` was not given.
    #[error("Refusing to save: {count} problem(s) found (use --force to save anyway)")]
    Rejected {
        /// Number of problems
        count: usize,
    },

    /// `check` found problems.
    #[error("Check found {count} problem(s)")]
    CheckFailed {
        /// Number of problems
        count: usize,
    },

    /// The shutdown signal handler could not be installed.
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[source] io::Error),
}

/// Executes one command with the production stores and HTTP client.
///
/// # Errors
///
/// Returns the first error the command hits.
///
/// Excluded from coverage - requires real files, network and signals.
#[cfg(not(tarpaulin_include))]
pub async fn execute(command: Command, config: ValidatedConfig) -> Result<(), RunError> {
    if matches!(command, Command::Reload) {
        config.require_service_url()?;
    }

    let client = ReqwestClient::new();

    let reloader = match config.service_url {
        Some(ref url) => Some(
            HttpReloadTrigger::new(client.clone(), url)
                .map_err(RunError::ServiceUrl)?
                .with_headers(config.headers.clone())
                .with_retry_policy(config.retry_policy.clone()),
        ),
        None => None,
    };

    let session = SettingsSession::new(
        FileEnvStore::new(&config.env_file),
        FilePresetStore::new(&config.presets_file),
    );
    let probe = UrlProbe::new(client).with_timeout(config.probe_timeout);

    let runner = Runner::new(session, probe)
        .with_reloader(reloader)
        .with_service_url(config.service_url.as_ref().map(ToString::to_string))
        .with_watch_interval(config.watch_interval);

    if matches!(command, Command::Watch { .. }) {
        tracing::info!(
            "Watching {} every {}s (Ctrl+C to stop)",
            config.env_file.display(),
            config.watch_interval.as_secs()
        );
    }

    runner.run(command, &mut io::stdout()).await
}

/// Writes the configuration template to `output`.
///
/// # Errors
///
/// Returns [`RunError::Config`] if the file exists or cannot be written.
pub fn init<W: Write>(output: &Path, out: &mut W) -> Result<(), RunError> {
    write_default_config(output)?;
    writeln!(
        out,
        "Configuration template written to: {}",
        output.display()
    )?;
    Ok(())
}

/// Runs commands against a settings session.
pub struct Runner<E, P, R, H> {
    session: SettingsSession<E, P>,
    reloader: Option<R>,
    probe: UrlProbe<H>,
    service_url: Option<String>,
    watch_interval: Duration,
}

impl<E, P, R, H> Runner<E, P, R, H> {
    /// Creates a runner without a reload trigger.
    #[must_use]
    pub fn new(session: SettingsSession<E, P>, probe: UrlProbe<H>) -> Self {
        Self {
            session,
            reloader: None,
            probe,
            service_url: None,
            watch_interval: Duration::from_secs(
                seerr_settings::config::defaults::WATCH_INTERVAL_SECS,
            ),
        }
    }

    /// Sets the reload trigger. `None` makes `reload` fail.
    #[must_use]
    pub fn with_reloader(mut self, reloader: Option<R>) -> Self {
        self.reloader = reloader;
        self
    }

    /// Sets the service URL probed by `check`.
    #[must_use]
    pub fn with_service_url(mut self, url: Option<String>) -> Self {
        self.service_url = url;
        self
    }

    /// Sets the `watch` refresh period.
    #[must_use]
    pub const fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval;
        self
    }
}

impl<E, P, R, H> Runner<E, P, R, H>
where
    E: EnvStore,
    P: PresetStore,
    R: ReloadTrigger,
    H: HttpClient,
{
    /// Runs `command`, writing its output to `out`.
    ///
    /// `watch` runs until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns the first error the command hits.
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<(), RunError> {
        match command {
            Command::Init { output } => init(&output, out),
            Command::Show => self.show(out),
            Command::Filter { action } => self.filter(action, out).await,
            Command::Set { key, value, save } => self.set(&key, value, save, out).await,
            Command::Unset { key, save } => self.unset(&key, save, out).await,
            Command::Preset { action } => self.preset(action, out).await,
            Command::Check { key } => self.check(key.as_deref(), out).await,
            Command::Reload => self.reload(out).await,
            Command::Watch { .. } => self.watch(shutdown_signal(), out).await,
        }
    }

    fn show<W: Write>(&self, out: &mut W) -> Result<(), RunError> {
        let loaded = self.session.load()?;

        for (key, value) in loaded.vars.iter() {
            if key != keys::TORRENT_FILTER_REGEX {
                writeln!(out, "{key}={value}")?;
            }
        }
        writeln!(out)?;
        write_filter(out, &loaded.filter, &self.session.presets())?;

        let issues = audit(&loaded.vars);
        if !issues.is_empty() {
            writeln!(out, "\nProblems:")?;
            for issue in &issues {
                writeln!(out, "  {issue}")?;
            }
        }
        Ok(())
    }

    async fn filter<W: Write>(&self, action: FilterCommand, out: &mut W) -> Result<(), RunError> {
        let loaded = self.session.load()?;
        let presets = self.session.presets();

        if matches!(action, FilterCommand::List) {
            return write_filter(out, &loaded.filter, &presets);
        }

        // An unreadable array has no patterns to carry over, so saving loses it
        let unreadable = loaded.filter.parsed.error.is_some();
        if let Some(ref error) = loaded.filter.parsed.error {
            tracing::warn!("Stored filter is invalid ({error}), editing starts from an empty list");
        }

        let mut editor = PriorityListEditor::new(loaded.filter.patterns, log_list_change);
        let save = apply_filter_edit(&mut editor, action, &presets)?;

        write_patterns(out, editor.patterns(), &presets)?;
        if unreadable {
            writeln!(out, "  ! Stored value is unreadable and would be replaced")?;
        }
        refuse_unless_forced(editor.errors().len() + usize::from(unreadable), save)?;

        let mut vars = loaded.vars;
        let changes = self.session.save_filter(&mut vars, editor.patterns()).await?;
        self.finish_save(&changes, save, out).await
    }

    async fn set<W: Write>(
        &self,
        key: &str,
        value: String,
        save: SaveArgs,
        out: &mut W,
    ) -> Result<(), RunError> {
        let mut vars = self.session.load()?.vars;

        let mut candidate = vars.clone();
        candidate.set(key, value.as_str());
        check_key(&candidate, key, save, out)?;

        let changes = self.session.set_var(&mut vars, key, value).await?;
        self.finish_save(&changes, save, out).await
    }

    async fn unset<W: Write>(&self, key: &str, save: SaveArgs, out: &mut W) -> Result<(), RunError> {
        let mut vars = self.session.load()?.vars;

        let mut candidate = vars.clone();
        candidate.remove(key);
        check_key(&candidate, key, save, out)?;

        let changes = self.session.unset_var(&mut vars, key).await?;
        self.finish_save(&changes, save, out).await
    }

    async fn finish_save<W: Write>(
        &self,
        changes: &[EnvChange],
        save: SaveArgs,
        out: &mut W,
    ) -> Result<(), RunError> {
        if changes.is_empty() {
            writeln!(out, "No changes")?;
        }
        for change in changes {
            write_change(out, change)?;
        }

        if save.reload {
            self.reload(out).await?;
        }
        Ok(())
    }

    async fn preset<W: Write>(&self, action: PresetCommand, out: &mut W) -> Result<(), RunError> {
        let presets = self.session.presets();

        match action {
            PresetCommand::List => write_presets(out, &presets)?,
            PresetCommand::Add {
                name,
                pattern,
                description,
                id,
            } => {
                if !filter::validate_pattern(&pattern) {
                    tracing::warn!("Pattern for preset '{name}' is not a valid regex");
                }

                let id = id.or_else(|| {
                    presets
                        .iter()
                        .find(|p| p.name == name && !p.is_default)
                        .map(|p| p.id.clone())
                });
                let mut preset = match id {
                    Some(id) => Preset::new(id, name, pattern),
                    None => Preset::custom(name, pattern),
                };
                if let Some(description) = description {
                    preset = preset.with_description(description);
                }

                let id = preset.id.clone();
                self.session.save_preset(preset).await?;
                writeln!(out, "Saved preset {id}")?;
            }
            PresetCommand::Remove { preset } => {
                let id = find_preset(&presets, &preset)?.id.clone();
                self.session.delete_preset(&id).await?;
                writeln!(out, "Deleted preset {id}")?;
            }
        }
        Ok(())
    }

    async fn check<W: Write>(&self, key: Option<&str>, out: &mut W) -> Result<(), RunError> {
        let vars = self.session.load()?.vars;

        if let Some(key) = key {
            let value = vars
                .get(key)
                .ok_or_else(|| RunError::UnknownVariable(key.to_string()))?;
            let count = usize::from(!self.probe_and_report(key, value, out).await?);
            return check_result(count);
        }

        let issues = audit(&vars);
        for issue in &issues {
            writeln!(out, "{issue}")?;
        }
        let mut count = issues.len();

        for key in URL_KEYS {
            if let Some(value) = vars.get(key).filter(|v| !v.trim().is_empty()) {
                count += usize::from(!self.probe_and_report(key, value, out).await?);
            }
        }
        if let Some(ref url) = self.service_url {
            count += usize::from(!self.probe_and_report("service", url, out).await?);
        }

        if count == 0 {
            writeln!(out, "No problems found")?;
        }
        check_result(count)
    }

    async fn probe_and_report<W: Write>(
        &self,
        label: &str,
        url: &str,
        out: &mut W,
    ) -> Result<bool, RunError> {
        let outcome = self.probe.probe(url).await;
        writeln!(out, "{label} ({}): {outcome}", url.trim())?;
        Ok(matches!(outcome, ProbeOutcome::Reachable { .. }))
    }

    async fn reload<W: Write>(&self, out: &mut W) -> Result<(), RunError> {
        let reloader = self.reloader.as_ref().ok_or(ReloadError::NotConfigured)?;
        let report = reloader.reload().await?;
        write_report(out, &report)?;
        Ok(())
    }

    /// Re-reads the variables every `watch_interval` and reports what
    /// changed, until `shutdown` completes.
    async fn watch<W, F>(&self, shutdown: F, out: &mut W) -> Result<(), RunError>
    where
        W: Write,
        F: Future<Output = Result<(), RunError>>,
    {
        let mut previous = self.session.load()?.vars;

        let (tx, mut rx) = mpsc::channel(1);
        let task = RefreshTask::spawn(self.watch_interval, move || {
            let tx = tx.clone();
            async move {
                tx.send(()).await.ok();
            }
        });
        tracing::info!("Watching for changes every {:?}", task.period());

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                result = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping...");
                    return result;
                }

                tick = rx.recv() => {
                    if tick.is_none() {
                        return Ok(());
                    }
                    match self.session.env_store().load() {
                        Ok(current) => {
                            refresh(&mut previous, current, out)?;
                        }
                        Err(e) => tracing::warn!("Failed to re-read settings: {e}"),
                    }
                }
            }
        }
    }
}

/// Reports the difference between `previous` and `current`, then makes
/// `current` the new baseline.
fn refresh<W: Write>(
    previous: &mut EnvVars,
    current: EnvVars,
    out: &mut W,
) -> Result<Vec<EnvChange>, RunError> {
    let changes = diff(previous, &current);

    if changes.is_empty() {
        tracing::debug!("No settings changed");
    } else {
        tracing::info!("Detected {} change(s)", changes.len());
        for change in &changes {
            write_change(out, change)?;
        }
        for issue in audit(&current) {
            if changes.iter().any(|c| c.key == issue.key()) {
                tracing::warn!("{issue}");
            }
        }
    }

    *previous = current;
    Ok(changes)
}

fn log_list_change(patterns: &[String]) {
    tracing::debug!(count = patterns.len(), "Priority list updated");
}

/// Applies one filter mutation and returns the save options that came with it.
fn apply_filter_edit<N: FnMut(&[String])>(
    editor: &mut PriorityListEditor<N>,
    action: FilterCommand,
    presets: &[Preset],
) -> Result<SaveArgs, RunError> {
    let len = editor.patterns().len();

    let save = match action {
        FilterCommand::List => SaveArgs::default(),
        FilterCommand::Add { pattern, save } => {
            accepted(editor.append(), len, len)?;
            accepted(editor.set_draft(pattern), len, len)?;
            accepted(editor.save_edit(), len, len)?;
            save
        }
        FilterCommand::Set {
            position,
            pattern,
            save,
        } => {
            accepted(editor.begin_edit(position), position, len)?;
            accepted(editor.set_draft(pattern), position, len)?;
            accepted(editor.save_edit(), position, len)?;
            save
        }
        FilterCommand::Remove { position, save } => {
            accepted(editor.remove(position), position, len)?;
            save
        }
        FilterCommand::Up { position, save } => {
            accepted(editor.move_up(position), position, len)?;
            save
        }
        FilterCommand::Down { position, save } => {
            accepted(editor.move_down(position), position, len)?;
            save
        }
        FilterCommand::ApplyPreset { preset, at, save } => {
            let pattern = find_preset(presets, &preset)?.pattern.clone();
            match at {
                Some(index) => accepted(editor.apply_preset_at(index, pattern), index, len)?,
                None => accepted(editor.apply_preset(pattern), 0, len)?,
            }
            save
        }
        FilterCommand::InsertPreset {
            after,
            preset,
            save,
        } => {
            let pattern = find_preset(presets, &preset)?.pattern.clone();
            accepted(editor.insert_preset_after(after, pattern), after, len)?;
            save
        }
        FilterCommand::Reset { save } => {
            let mut defaults = filter::default_patterns().into_iter();
            if let Some(first) = defaults.next() {
                accepted(editor.apply_preset(first), 0, len)?;
            }
            for (index, pattern) in defaults.enumerate() {
                accepted(editor.insert_preset_after(index, pattern), index, len)?;
            }
            save
        }
    };

    Ok(save)
}

/// Maps an editor outcome to an error for the 0-based `index`.
fn accepted(outcome: Outcome, index: usize, len: usize) -> Result<(), RunError> {
    match outcome {
        Outcome::Mutated | Outcome::ModeChanged => Ok(()),
        Outcome::Ignored(IgnoreReason::OutOfRange) => Err(RunError::PositionOutOfRange {
            position: index + 1,
            len,
        }),
        Outcome::Ignored(IgnoreReason::AtBoundary) => Err(RunError::AtBoundary {
            position: index + 1,
        }),
        Outcome::Ignored(reason) => Err(RunError::EditIgnored(reason)),
    }
}

fn find_preset<'a>(presets: &'a [Preset], key: &str) -> Result<&'a Preset, RunError> {
    preset::find_by_name_or_id(presets, key).ok_or_else(|| RunError::UnknownPreset(key.to_string()))
}

/// Fails with [`RunError::Rejected`] when there are problems and `--force`
/// was not given.
fn refuse_unless_forced(count: usize, save: SaveArgs) -> Result<(), RunError> {
    if count == 0 {
        return Ok(());
    }
    if save.force {
        tracing::warn!("Saving despite {count} problem(s)");
        return Ok(());
    }
    Err(RunError::Rejected { count })
}

/// Prints the audit issues `candidate` has for `key` and refuses the save
/// unless forced.
fn check_key<W: Write>(
    candidate: &EnvVars,
    key: &str,
    save: SaveArgs,
    out: &mut W,
) -> Result<(), RunError> {
    let issues: Vec<_> = audit(candidate)
        .into_iter()
        .filter(|issue| issue.key() == key)
        .collect();

    for issue in &issues {
        writeln!(out, "{issue}")?;
    }
    refuse_unless_forced(issues.len(), save)
}

const fn check_result(count: usize) -> Result<(), RunError> {
    if count == 0 {
        Ok(())
    } else {
        Err(RunError::CheckFailed { count })
    }
}

fn write_filter<W: Write>(
    out: &mut W,
    snapshot: &FilterSnapshot,
    presets: &[Preset],
) -> Result<(), RunError> {
    write!(
        out,
        "{} ({}",
        keys::TORRENT_FILTER_REGEX,
        snapshot.format.as_str()
    )?;
    if snapshot.seeded_defaults {
        write!(out, ", not set; showing defaults")?;
    }
    writeln!(out, ")")?;

    if let Some(ref error) = snapshot.parsed.error {
        writeln!(out, "  invalid: {error}")?;
        writeln!(out, "  stored: {}", snapshot.parsed.raw)?;
    }

    write_patterns(out, &snapshot.patterns, presets)
}

/// Writes the numbered list with preset names and diagnostics.
fn write_patterns<W: Write>(
    out: &mut W,
    patterns: &[String],
    presets: &[Preset],
) -> Result<(), RunError> {
    let validation = filter::validate_pattern_list(patterns);

    if patterns.is_empty() {
        writeln!(out, "  (no patterns)")?;
    }
    for (index, pattern) in patterns.iter().enumerate() {
        write!(out, "{:>3}. {pattern}", index + 1)?;
        if let Some(name) = find_preset_for_pattern(pattern, preset::name_pattern_pairs(presets)) {
            write!(out, "  [{name}]")?;
        }
        if let Some(issue) = validation.issue_at(index) {
            write!(out, "  ! {issue}")?;
        }
        writeln!(out)?;
    }

    if let Some(name) = match_sequence_to_preset_name(patterns, preset::name_pattern_pairs(presets))
    {
        writeln!(out, "Preset: {name}")?;
    }
    Ok(())
}

fn write_presets<W: Write>(out: &mut W, presets: &[Preset]) -> io::Result<()> {
    for preset in presets {
        let origin = if preset.is_default { "default" } else { "custom" };
        writeln!(out, "{} ({}, {origin})", preset.name, preset.id)?;
        writeln!(out, "    {}", preset.pattern)?;
        if let Some(ref description) = preset.description {
            writeln!(out, "    {description}")?;
        }
    }
    Ok(())
}

fn write_change<W: Write>(out: &mut W, change: &EnvChange) -> io::Result<()> {
    match (&change.old, &change.new) {
        (None, Some(new)) => writeln!(out, "+ {}={new}", change.key),
        (Some(_), None) => writeln!(out, "- {}", change.key),
        (Some(old), Some(new)) => writeln!(out, "~ {}: {old} -> {new}", change.key),
        (None, None) => Ok(()),
    }
}

fn write_report<W: Write>(out: &mut W, report: &ReloadReport) -> io::Result<()> {
    let summary = report
        .message
        .as_deref()
        .or(report.status.as_deref())
        .unwrap_or("ok");
    writeln!(out, "Service reloaded: {summary}")?;

    if !report.changes.is_empty() {
        writeln!(out, "Service picked up: {}", report.changes.join(", "))?;
    }
    Ok(())
}

/// Returns a future that completes when a shutdown signal is received.
async fn shutdown_signal() -> Result<(), RunError> {
    let ctrl_c = async { signal::ctrl_c().await.map_err(RunError::Signal) };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(RunError::Signal)?
            .recv()
            .await;
        Ok(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<(), RunError>>();

    tokio::select! {
        result = ctrl_c => result,
        result = terminate => result,
    }
}
