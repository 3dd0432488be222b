use crate::{Config, Destination, OutputFormat};
use anyhow::{Context, Result, bail};
use hara_core::analysis::{Analyzer, SummaryAnalyzer};
use hara_core::har::HarReader;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::JoinSet;

/// One HAR file and where its summary goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub destination: Destination,
    pub format: OutputFormat,
}

/// Summarise raw HAR text in the requested format
pub fn summarize_har(content: &str, format: OutputFormat) -> Result<String> {
    let summary = hara_core::parse_har(content)?;
    format.render(&summary)
}

pub fn execute(config: &Config) -> Result<()> {
    let mut jobs = Vec::new();

    if let Some(folder) = &config.folder {
        let output = config
            .outputs
            .first()
            .cloned()
            .unwrap_or_else(|| folder.clone());
        jobs.extend(folder_jobs(config, folder, &output)?);
    }

    if config.reads_stdin() {
        process_stdin(config)?;
    } else {
        jobs.extend(plan(config)?);
    }

    if jobs.is_empty() {
        return Ok(());
    }

    run_jobs(jobs, config.quiet)
}

/// Pair every file input with its destination, expanding directories
pub fn plan(config: &Config) -> Result<Vec<Job>> {
    let outputs = output_paths(config);
    let mut jobs = Vec::new();

    for (input, output) in config.inputs.iter().zip(outputs) {
        if input.is_dir() {
            jobs.extend(folder_jobs(config, input, &output)?);
        } else if !input.exists() {
            bail!("no such file or directory '{}'.", input.display());
        } else {
            let destination = Destination::from_path(&output);
            jobs.push(Job {
                input: input.clone(),
                format: config.format_for(&destination),
                destination,
            });
        }
    }

    Ok(jobs)
}

/// A single output directory receives every input; otherwise outputs pair up
/// with inputs by position and missing ones take the default name.
fn output_paths(config: &Config) -> Vec<PathBuf> {
    if let [dir] = config.outputs.as_slice()
        && dir.is_dir()
    {
        return config
            .inputs
            .iter()
            .map(|input| {
                if input.is_dir() {
                    dir.clone()
                } else {
                    let name = config.default_output(input);
                    dir.join(name.file_name().unwrap_or_default())
                }
            })
            .collect();
    }

    config
        .inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| match config.outputs.get(idx) {
            Some(output) => output.clone(),
            None if input.is_dir() => input.clone(),
            None => config.default_output(input),
        })
        .collect()
}

/// Collect the HAR files of a folder, recursing when configured
pub fn folder_jobs(config: &Config, dir: &Path, output: &Path) -> Result<Vec<Job>> {
    if !config.quiet {
        println!("Processing directory '{}':\n", dir.display());
    }

    let jobs = scan_folder(config, dir, output)?;
    if jobs.is_empty() {
        bail!("No HAR files have been found in '{}' directory.", dir.display());
    }

    Ok(jobs)
}

fn scan_folder(config: &Config, dir: &Path, output: &Path) -> Result<Vec<Job>> {
    tracing::debug!("Scanning {} for HAR files", dir.display());

    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut jobs = Vec::new();
    let mut sub_folders = Vec::new();

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            sub_folders.push((path, name));
        } else if config.accepts(&name) {
            let destination = Destination::File(config.default_output(&output.join(&name)));
            jobs.push(Job {
                input: path,
                format: config.format_for(&destination),
                destination,
            });
        } else {
            tracing::debug!("Skipping {}", path.display());
        }
    }

    if config.recursive {
        for (path, name) in sub_folders {
            jobs.extend(scan_folder(config, &path, &output.join(name))?);
        }
    }

    Ok(jobs)
}

fn process_stdin(config: &Config) -> Result<()> {
    tracing::debug!("Reading HAR from stdin");

    let content = io::read_to_string(io::stdin()).context("Failed to read stdin")?;
    let destination = config
        .outputs
        .first()
        .map(|path| Destination::from_path(path))
        .unwrap_or(Destination::Stdout);
    let format = config.format_for(&destination);

    let start = Instant::now();
    let rendered = summarize_har(&content, format)?;
    let elapsed = start.elapsed();

    write_output(&destination, &rendered)?;

    if !config.quiet && destination != Destination::Stdout {
        print_done(None, elapsed.as_millis());
    }

    Ok(())
}

/// Process every job on its own blocking task
fn run_jobs(jobs: Vec<Job>, quiet: bool) -> Result<()> {
    let total = jobs.len();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut failures = runtime.block_on(async {
        let mut set = JoinSet::new();
        for job in jobs {
            set.spawn_blocking(move || process_file(&job, quiet));
        }

        let mut failures = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(e) => failures.push(anyhow::Error::from(e)),
            }
        }
        failures
    });

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        n => {
            for failure in &failures {
                tracing::error!("{:#}", failure);
            }
            bail!("{} of {} HAR files failed", n, total)
        }
    }
}

fn process_file(job: &Job, quiet: bool) -> Result<()> {
    let start = Instant::now();

    let har = HarReader::from_file(&job.input)
        .with_context(|| format!("File: {}", job.input.display()))?;
    let summary = SummaryAnalyzer
        .analyze(&har)
        .with_context(|| format!("File: {}", job.input.display()))?;
    let rendered = job.format.render(&summary)?;
    let elapsed = start.elapsed();

    write_output(&job.destination, &rendered)?;

    if !quiet && job.destination != Destination::Stdout {
        print_done(job.input.file_name().map(|n| n.to_string_lossy()), elapsed.as_millis());
    }

    Ok(())
}

fn write_output(destination: &Destination, data: &str) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data.as_bytes())?;
            stdout.flush()?;
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    // A file somewhere along the path blocks the directory
                    let blocked = parent
                        .ancestors()
                        .find(|p| p.exists())
                        .is_some_and(|p| !p.is_dir());
                    if blocked {
                        format!("Error: output '{}' is not a directory.", parent.display())
                    } else {
                        format!("Failed to create '{}'", parent.display())
                    }
                })?;
            }
            fs::write(path, data)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            tracing::debug!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_done(file_name: Option<std::borrow::Cow<'_, str>>, millis: u128) {
    use console::style;

    let done = style(format!("Done in {} ms!", millis)).green();
    // Tasks finish concurrently; one call keeps each file's lines together.
    match file_name {
        Some(name) => println!("{}\n{}\n", style(format!("{}:", name)).bold(), done),
        None => println!("{}\n", done),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HAR: &str = r#"{
        "log": {
            "pages": [{"title": "https://example.com/", "pageTimings": {"onLoad": 420}}],
            "entries": [{
                "time": 35.2,
                "request": {"url": "https://example.com/"},
                "response": {"content": {"size": 2048}, "_transferSize": 812},
                "timings": {"blocked": 1, "wait": 30, "receive": 4, "connect": 0},
                "_resourceType": "document"
            }]
        }
    }"#;

    fn config(inputs: Vec<PathBuf>, outputs: Vec<PathBuf>) -> Config {
        Config::new(inputs, outputs, None, false, false, true, &[]).unwrap()
    }

    #[test]
    fn test_summarize_har_json() {
        let json = summarize_har(HAR, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(json.ends_with('\n'));
        assert_eq!(value["requests"]["all"]["noOfRequests"], 1);
        assert_eq!(value["requests"]["document"]["bytesTransferred"], 812);
        assert_eq!(value["pages"]["medianOnLoad"], 420);
    }

    #[test]
    fn test_summarize_har_csv() {
        let csv = summarize_har(HAR, OutputFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 9);
        assert!(csv.contains("document,1,35,35,812"));
    }

    #[test]
    fn test_plan_default_outputs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("home.har");
        fs::write(&input, HAR).unwrap();

        let jobs = plan(&config(vec![input.clone()], vec![])).unwrap();
        assert_eq!(
            jobs,
            vec![Job {
                input,
                destination: Destination::File(dir.path().join("home.json")),
                format: OutputFormat::Json,
            }]
        );
    }

    #[test]
    fn test_plan_into_output_directory() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let a = dir.path().join("a.har");
        let b = dir.path().join("b.har");
        fs::write(&a, HAR).unwrap();
        fs::write(&b, HAR).unwrap();

        let jobs = plan(&config(vec![a, b], vec![out.path().to_path_buf()])).unwrap();
        let destinations: Vec<_> = jobs.into_iter().map(|j| j.destination).collect();
        assert_eq!(
            destinations,
            vec![
                Destination::File(out.path().join("a.json")),
                Destination::File(out.path().join("b.json")),
            ]
        );
    }

    #[test]
    fn test_plan_pads_missing_outputs() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.har");
        let b = dir.path().join("b.har");
        fs::write(&a, HAR).unwrap();
        fs::write(&b, HAR).unwrap();
        let custom = dir.path().join("custom.csv");

        let jobs = plan(&config(vec![a, b], vec![custom.clone()])).unwrap();
        assert_eq!(jobs[0].destination, Destination::File(custom));
        assert_eq!(jobs[0].format, OutputFormat::Csv);
        assert_eq!(
            jobs[1].destination,
            Destination::File(dir.path().join("b.json"))
        );
        assert_eq!(jobs[1].format, OutputFormat::Json);
    }

    #[test]
    fn test_write_output_under_file_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let destination = Destination::File(blocker.join("out.json"));
        let err = write_output(&destination, "{}").unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_write_output_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("out.json");

        write_output(&Destination::File(path.clone()), "{}").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn test_plan_missing_input() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.har");

        let err = plan(&config(vec![missing], vec![])).unwrap_err();
        assert!(err.to_string().contains("no such file or directory"));
    }

    #[test]
    fn test_folder_jobs_recursive_with_exclude() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("home.har"), HAR).unwrap();
        fs::write(dir.path().join("skip-me.har"), HAR).unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("nested").join("deep.HAR"), HAR).unwrap();

        let mut config = Config::new(
            vec![],
            vec![],
            Some(dir.path().to_path_buf()),
            true,
            true,
            true,
            &["^skip".to_string()],
        )
        .unwrap();

        let jobs = folder_jobs(&config, dir.path(), out.path()).unwrap();
        let destinations: Vec<_> = jobs.iter().map(|j| j.destination.clone()).collect();
        assert_eq!(
            destinations,
            vec![
                Destination::File(out.path().join("home.csv")),
                Destination::File(out.path().join("nested").join("deep.csv")),
            ]
        );

        config.recursive = false;
        let jobs = folder_jobs(&config, dir.path(), out.path()).unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_folder_without_har_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let config = config(vec![], vec![]);

        let err = folder_jobs(&config, dir.path(), dir.path()).unwrap_err();
        assert!(err.to_string().contains("No HAR files have been found"));
    }

    #[test]
    fn test_run_jobs_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("home.har");
        fs::write(&input, HAR).unwrap();
        let output = dir.path().join("out").join("home.json");

        run_jobs(
            vec![Job {
                input,
                destination: Destination::File(output.clone()),
                format: OutputFormat::Json,
            }],
            true,
        )
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written["requests"]["all"]["largest"]["bytes"], 2048);
    }

    #[test]
    fn test_run_jobs_reports_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.har");
        let bad = dir.path().join("bad.har");
        fs::write(&good, HAR).unwrap();
        fs::write(&bad, "{ not json").unwrap();

        let jobs = vec![
            Job {
                input: good,
                destination: Destination::File(dir.path().join("good.json")),
                format: OutputFormat::Json,
            },
            Job {
                input: bad.clone(),
                destination: Destination::File(dir.path().join("bad.json")),
                format: OutputFormat::Json,
            },
        ];

        let err = run_jobs(jobs, true).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Malformed HAR input"));
        assert!(message.contains(&bad.display().to_string()));
        assert!(dir.path().join("good.json").exists());
        assert!(!dir.path().join("bad.json").exists());
    }
}
