use anyhow::{Context, Result, bail};
use metaform_scaffold::{Generation, Scaffold};
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{TestCase, TestFailure, TestResults};

pub struct TestRunner {
    cases_dir: PathBuf,
    filter: Option<String>,
}

impl TestRunner {
    pub fn new(cases_dir: impl Into<PathBuf>) -> Self {
        Self {
            cases_dir: cases_dir.into(),
            filter: None,
        }
    }

    /// Only run cases whose name contains `filter`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Discover and run all test cases
    pub fn run_all(&self) -> Result<TestResults> {
        let mut results = TestResults::default();

        for test_file in self.discover_test_files()? {
            let name = self.case_name(&test_file);
            if let Some(filter) = &self.filter
                && !name.contains(filter.as_str())
            {
                continue;
            }

            let content = fs::read_to_string(&test_file)
                .with_context(|| format!("Failed to read test file: {:?}", test_file))?;

            match TestCase::parse(name.clone(), &content) {
                Ok(test_case) => match run_test_case(&test_case) {
                    Ok(()) => results.add_pass(),
                    Err(e) => results.add_failure(TestFailure::new(name, format!("{e:#}"))),
                },
                Err(e) => {
                    results.add_failure(TestFailure::new(
                        name,
                        format!("Failed to parse test case: {}", e),
                    ));
                }
            }
        }

        Ok(results)
    }

    /// Discover all .yaml test files
    fn discover_test_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk_directory(&self.cases_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn walk_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.walk_directory(&path, files)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("yaml") {
                files.push(path);
            }
        }

        Ok(())
    }

    fn case_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.cases_dir)
            .unwrap_or(path)
            .with_extension("")
            .display()
            .to_string()
    }
}

/// Run a single test case
pub fn run_test_case(test_case: &TestCase) -> Result<()> {
    let generation = match Scaffold::new(&test_case.schema, test_case.rules.clone()) {
        Ok(scaffold) => scaffold.generate(),
        Err(e) => return check_error(test_case, &e.to_string()),
    };

    match generation.failures.first() {
        Some(failure) => check_error(test_case, &failure.to_string())?,
        None if test_case.expects_error() => {
            bail!("Expected error containing {:?}, but generation succeeded", test_case.error)
        }
        None => {}
    }

    for (file_name, expected) in &test_case.expected {
        let actual = artifact(&generation, file_name)?
            .with_context(|| format!("Artifact {file_name} was not generated"))?;
        let expected = serde_json::to_string_pretty(expected)?;
        if actual != expected {
            let diff = TextDiff::from_lines(&expected, &actual)
                .unified_diff()
                .header("expected", "actual")
                .to_string();
            bail!("{file_name} mismatch:\n{diff}");
        }
    }

    for file_name in &test_case.absent {
        if artifact(&generation, file_name)?.is_some() {
            bail!("Artifact {file_name} should not be generated");
        }
    }

    Ok(())
}

fn check_error(test_case: &TestCase, message: &str) -> Result<()> {
    match &test_case.error {
        Some(expected) if message.contains(expected.as_str()) => Ok(()),
        Some(expected) => bail!("Expected error containing {expected:?}, got: {message}"),
        None => bail!("Unexpected error: {message}"),
    }
}

/// Rendered artifact with the given file name, if generated
fn artifact(generation: &Generation, file_name: &str) -> Result<Option<String>> {
    for form in &generation.forms {
        if form.form_file_name() == file_name {
            return Ok(Some(form.form_json()?));
        }
        if form.locales_file_name() == file_name {
            return Ok(Some(form.locales_json()?));
        }
    }
    Ok(None)
}
