use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions, Pattern};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// One survey workbook picked for a `<country>/<year>` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyFile {
    pub country: String,
    pub year: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<SurveyFile>,
    /// Year directories without any candidate file.
    pub empty_dirs: Vec<PathBuf>,
}

/// Immediate subdirectories of `dir` as `(name, path)`, sorted by name.
pub fn sorted_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        out.push((entry.file_name().to_string_lossy().into_owned(), path));
    }
    out.sort();
    Ok(out)
}

/// Candidate survey files in `dir`: regular files with `extension`
/// (case-insensitive), spreadsheet lock files (`~$…`) excluded, sorted by name.
pub fn candidate_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension.trim_start_matches('.'))
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..Default::default()
    };

    let matched = glob_with(&pattern, options)
        .with_context(|| format!("invalid glob pattern '{}'", pattern))?
        .collect::<Result<Vec<PathBuf>, _>>()
        .with_context(|| format!("reading directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = matched
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| !n.to_string_lossy().starts_with("~$"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Walk `root/<country>/<year>/` and pick the first candidate file per year
/// directory.
pub fn discover_survey_files(root: &Path, extension: &str) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    for (country, country_path) in sorted_subdirs(root)? {
        for (year, year_path) in sorted_subdirs(&country_path)? {
            let mut candidates = candidate_files(&year_path, extension)?;
            if candidates.is_empty() {
                debug!(dir = %year_path.display(), "no survey file, skipping");
                discovery.empty_dirs.push(year_path);
                continue;
            }
            if candidates.len() > 1 {
                warn!(
                    dir = %year_path.display(),
                    using = %candidates[0].display(),
                    ignored = candidates.len() - 1,
                    "multiple survey files; using the first by name"
                );
            }
            discovery.files.push(SurveyFile {
                country: country.clone(),
                year,
                path: candidates.swap_remove(0),
            });
        }
    }

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};
    use tempfile::tempdir;

    fn touch(path: &Path) {
        create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    #[test]
    fn test_discovery_is_sorted_and_first_file_wins() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        touch(&root.join("Kenya/2021/survey_b.xlsx"));
        touch(&root.join("Kenya/2021/survey_a.XLSX"));
        touch(&root.join("Kenya/2019/data.xlsx"));
        touch(&root.join("Benin/2020/fies.xlsx"));
        touch(&root.join("Benin/2020/~$fies.xlsx"));
        touch(&root.join("README.txt"));

        let found = discover_survey_files(root, "xlsx")?;
        let got: Vec<(&str, &str, String)> = found
            .files
            .iter()
            .map(|f| {
                (
                    f.country.as_str(),
                    f.year.as_str(),
                    f.path.file_name().unwrap().to_string_lossy().into_owned(),
                )
            })
            .collect();
        assert_eq!(
            got,
            vec![
                ("Benin", "2020", "fies.xlsx".to_string()),
                ("Kenya", "2019", "data.xlsx".to_string()),
                ("Kenya", "2021", "survey_a.XLSX".to_string()),
            ]
        );
        assert!(found.empty_dirs.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_year_dirs_are_skipped() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        create_dir_all(root.join("Chad/2018"))?;
        touch(&root.join("Chad/2019/notes.csv"));
        touch(&root.join("Chad/2020/survey.xlsx"));
        touch(&root.join("Chad/stray.xlsx"));

        let found = discover_survey_files(root, "xlsx")?;
        assert_eq!(found.files.len(), 1);
        assert_eq!(found.files[0].year, "2020");
        assert_eq!(
            found.empty_dirs,
            vec![root.join("Chad/2018"), root.join("Chad/2019")]
        );
        Ok(())
    }

    #[test]
    fn test_candidate_files_with_custom_extension() -> Result<()> {
        let tmp = tempdir()?;
        touch(&tmp.path().join("b.xlsm"));
        touch(&tmp.path().join("a.xlsx"));
        create_dir_all(tmp.path().join("dir.xlsm"))?;

        let files = candidate_files(tmp.path(), ".xlsm")?;
        assert_eq!(files, vec![tmp.path().join("b.xlsm")]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_year_dir_aborts() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir()?;
        let root = tmp.path();
        touch(&root.join("A/2020/s.xlsx"));
        touch(&root.join("B/2020/s.xlsx"));
        let locked = root.join("B/2020");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        // root ignores directory permissions
        let readable = fs::read_dir(&locked).is_ok();
        let outcome = discover_survey_files(root, "xlsx");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        if readable {
            return Ok(());
        }

        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("reading directory"));
        assert!(err.to_string().contains("2020"));
        Ok(())
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = discover_survey_files(&tmp.path().join("nope"), "xlsx").unwrap_err();
        assert!(err.to_string().contains("reading directory"));
    }
}
